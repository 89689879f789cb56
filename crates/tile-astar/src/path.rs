//! Solution path extraction from parent links.

use crate::error::{Result, SearchError};
use crate::moves::move_between;
use crate::node::{NodeArena, NodeId};
use crate::puzzle::{Board, Direction};

/// Boards from the start to `goal`, following `parent` links and
/// reversing. A start that is already the goal yields a single board.
pub fn reconstruct(arena: &NodeArena, goal: NodeId) -> Result<Vec<Board>> {
    let mut path = Vec::new();
    let mut current = Some(goal);

    while let Some(id) = current {
        // A chain longer than the arena must revisit a node.
        if path.len() >= arena.len() {
            return Err(SearchError::PathCycle { node: goal });
        }
        let node = arena.get(id);
        path.push(node.board.clone());
        current = node.parent;
    }

    path.reverse();
    Ok(path)
}

/// The blank moves between consecutive boards of a path
pub fn moves_along(path: &[Board]) -> Vec<Direction> {
    path.windows(2)
        .filter_map(|pair| move_between(&pair[0], &pair[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_node_path() {
        let mut arena = NodeArena::new();
        let root = arena.alloc(Board::default_goal(), 0, 0, None);
        let path = reconstruct(&arena, root).unwrap();
        assert_eq!(path, vec![Board::default_goal()]);
        assert!(moves_along(&path).is_empty());
    }

    #[test]
    fn test_path_runs_start_to_goal() {
        let start = Board::default_goal();
        let one = start.apply(Direction::Up).unwrap();
        let two = one.apply(Direction::Left).unwrap();

        let mut arena = NodeArena::new();
        let a = arena.alloc(start.clone(), 0, 0, None);
        let b = arena.alloc(one.clone(), 1, 0, Some(a));
        let c = arena.alloc(two.clone(), 2, 0, Some(b));

        let path = reconstruct(&arena, c).unwrap();
        assert_eq!(path, vec![start, one, two]);
        assert_eq!(moves_along(&path), vec![Direction::Up, Direction::Left]);
    }

    #[test]
    fn test_parent_cycle_is_reported() {
        let start = Board::default_goal();
        let one = start.apply(Direction::Up).unwrap();

        let mut arena = NodeArena::new();
        let a = arena.alloc(start, 0, 0, None);
        let b = arena.alloc(one, 1, 0, Some(a));
        arena.reparent(a, b, 2);

        assert_eq!(
            reconstruct(&arena, b),
            Err(SearchError::PathCycle { node: b })
        );
    }
}
