//! Typed failures for board input and search execution.

use crate::node::NodeId;

/// A board that cannot be searched because it is not a well-formed
/// square permutation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// No tiles at all
    #[error("board has no tiles")]
    Empty,

    /// Tile count is not a perfect square
    #[error("board has {len} tiles, which is not a square grid")]
    NotSquare { len: usize },

    /// Grid is square but outside the supported range
    #[error("board dimension {dimension} is unsupported (expected 2..=5)")]
    UnsupportedDimension { dimension: usize },

    /// A tile number does not fit on this board
    #[error("tile {tile} is out of range (largest tile is {max})")]
    TileOutOfRange { tile: u8, max: u8 },

    /// The same tile appears twice
    #[error("tile {tile} appears more than once")]
    DuplicateTile { tile: u8 },
}

/// Failures reported by the search engine.
///
/// Input problems are caught before the first expansion. The remaining
/// variants end a run that has already started.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Start or goal failed validation
    #[error("invalid board: {0}")]
    InvalidBoard(#[from] BoardError),

    /// Start and goal are different sizes
    #[error("start is {start}x{start} but goal is {goal}x{goal}")]
    DimensionMismatch { start: usize, goal: usize },

    /// The open set emptied before the goal was reached
    #[error("no solution: open set exhausted after {generated} generated, {expanded} expanded")]
    Unsolvable { generated: usize, expanded: usize },

    /// The configured node budget ran out first
    #[error("node budget of {budget} exceeded ({generated} generated, {expanded} expanded)")]
    NodeBudgetExceeded {
        budget: usize,
        generated: usize,
        expanded: usize,
    },

    /// Cost propagation reached the same node twice. Only corrupted parent
    /// links produce this.
    #[error("parent links form a cycle through node {node}")]
    PropagationCycle { node: NodeId },

    /// Walking parent links from the goal never reached the start
    #[error("parent chain from node {node} does not terminate")]
    PathCycle { node: NodeId },
}

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_converts_into_search_error() {
        let err: SearchError = BoardError::DuplicateTile { tile: 3 }.into();
        assert_eq!(err, SearchError::InvalidBoard(BoardError::DuplicateTile { tile: 3 }));
        assert_eq!(err.to_string(), "invalid board: tile 3 appears more than once");
    }

    #[test]
    fn test_unsolvable_message_names_counters() {
        let err = SearchError::Unsolvable {
            generated: 10,
            expanded: 4,
        };
        assert!(err.to_string().contains("10 generated"));
        assert!(err.to_string().contains("4 expanded"));
    }
}
