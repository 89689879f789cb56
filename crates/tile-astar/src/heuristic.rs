//! Admissible cost-to-goal estimate: Manhattan distance plus a blocked
//! corner correction.
//!
//! A corner is blocked when the tile that belongs there is elsewhere while
//! both tiles that belong next to the corner already sit in place. The
//! corner tile has to enter through one of those two cells, so one of the
//! in-place neighbours must step out and back, two moves Manhattan
//! distance never charges for. Each neighbour cell pays for at most one
//! corner, which keeps the sum admissible.

use smallvec::SmallVec;

use crate::puzzle::{Board, BLANK};

/// Extra moves charged per blocked corner
const CORNER_PENALTY: u32 = 2;

/// A corner cell with its two goal-adjacent cells
#[derive(Debug, Clone, Copy)]
struct CornerCheck {
    cell: usize,
    tile: u8,
    neighbours: [(usize, u8); 2],
}

/// Heuristic bound to one goal board
#[derive(Debug, Clone)]
pub struct Heuristic {
    dimension: usize,
    /// Goal cell of each tile, indexed by tile value
    goal_cell: SmallVec<[usize; 16]>,
    corners: SmallVec<[CornerCheck; 4]>,
}

impl Heuristic {
    pub fn new(goal: &Board) -> Self {
        let dimension = goal.dimension();
        let mut goal_cell: SmallVec<[usize; 16]> = SmallVec::from_elem(0, goal.len());
        for (cell, &tile) in goal.tiles().iter().enumerate() {
            goal_cell[tile as usize] = cell;
        }

        let last = dimension - 1;
        let layout = [
            ((0, 0), (0, 1), (1, 0)),
            ((0, last), (0, last - 1), (1, last)),
            ((last, 0), (last, 1), (last - 1, 0)),
            ((last, last), (last, last - 1), (last - 1, last)),
        ];

        let index = |(row, col): (usize, usize)| row * dimension + col;
        let tile = |cell: usize| goal.tiles()[cell];

        let corners = layout
            .iter()
            .map(|&(corner, a, b)| CornerCheck {
                cell: index(corner),
                tile: tile(index(corner)),
                neighbours: [(index(a), tile(index(a))), (index(b), tile(index(b)))],
            })
            .filter(|check| {
                check.tile != BLANK && check.neighbours.iter().all(|&(_, t)| t != BLANK)
            })
            .collect();

        Self {
            dimension,
            goal_cell,
            corners,
        }
    }

    /// Lower bound on the number of moves from `board` to the goal
    pub fn estimate(&self, board: &Board) -> u32 {
        self.manhattan(board) + self.corner_conflicts(board)
    }

    /// Sum of grid distances from each non-blank tile to its goal cell
    pub fn manhattan(&self, board: &Board) -> u32 {
        let n = self.dimension;
        board
            .tiles()
            .iter()
            .enumerate()
            .filter(|&(_, &tile)| tile != BLANK)
            .map(|(cell, &tile)| {
                let goal = self.goal_cell[tile as usize];
                ((cell / n).abs_diff(goal / n) + (cell % n).abs_diff(goal % n)) as u32
            })
            .sum()
    }

    /// Blocked-corner penalty, at most one per corner
    pub fn corner_conflicts(&self, board: &Board) -> u32 {
        let tiles = board.tiles();
        // One bit per cell; 25 cells fit.
        let mut claimed: u32 = 0;
        let mut penalty = 0;

        for check in &self.corners {
            if tiles[check.cell] == check.tile {
                continue;
            }
            let blocked = check
                .neighbours
                .iter()
                .all(|&(cell, tile)| tiles[cell] == tile && claimed & (1 << cell) == 0);
            if blocked {
                for &(cell, _) in &check.neighbours {
                    claimed |= 1 << cell;
                }
                penalty += CORNER_PENALTY;
            }
        }

        penalty
    }
}
