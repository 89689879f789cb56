//! Successor generation: every legal blank move, each at unit cost.

use smallvec::SmallVec;

use crate::puzzle::{Board, Direction};

/// Cost of sliding one tile
pub const MOVE_COST: u32 = 1;

/// All boards one blank move away, in [`Direction::ALL`] order.
pub fn successors(board: &Board) -> SmallVec<[(Direction, Board); 4]> {
    Direction::ALL
        .iter()
        .filter_map(|&direction| board.apply(direction).map(|next| (direction, next)))
        .collect()
}

/// The blank move that turns `from` into `to`, if there is one
pub fn move_between(from: &Board, to: &Board) -> Option<Direction> {
    Direction::ALL
        .iter()
        .copied()
        .find(|&direction| from.apply(direction).as_ref() == Some(to))
}

/// Whether `to` is exactly one legal blank move from `from`
pub fn is_single_move(from: &Board, to: &Board) -> bool {
    move_between(from, to).is_some()
}
