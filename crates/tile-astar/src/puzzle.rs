//! Board representation for square sliding-tile puzzles.
//!
//! A [`Board`] is an immutable row-major permutation of `0..n*n` where `0`
//! is the blank. Boards serialize as a flat tile list and every
//! deserialized board goes through the same validation as [`Board::new`].

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::BoardError;

/// Largest supported side length. Keeps [`BoardKey`] within a `u128`.
pub const MAX_DIMENSION: usize = 5;

/// Bits per cell in the packed key (tiles are at most 24).
const KEY_BITS: u32 = 5;

/// Tile value of the blank cell
pub const BLANK: u8 = 0;

/// Direction the blank moves in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Successor generation order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// `(row, column)` offset of the blank
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Up => "Up",
            Direction::Right => "Right",
            Direction::Down => "Down",
            Direction::Left => "Left",
        };
        write!(f, "{}", s)
    }
}

/// Canonical integer encoding of a board.
///
/// The side length sits in the top bits and each cell takes five bits
/// below it, so two boards share a key exactly when they are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoardKey(u128);

/// An immutable puzzle configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Board {
    dimension: usize,
    tiles: SmallVec<[u8; 16]>,
}

impl Board {
    /// Build a board from row-major tiles, rejecting anything that is not
    /// a permutation of `0..n*n` on a supported square grid.
    pub fn new(tiles: &[u8]) -> Result<Self, BoardError> {
        if tiles.is_empty() {
            return Err(BoardError::Empty);
        }

        let len = tiles.len();
        let dimension = integer_sqrt(len);
        if dimension * dimension != len {
            return Err(BoardError::NotSquare { len });
        }
        if !(2..=MAX_DIMENSION).contains(&dimension) {
            return Err(BoardError::UnsupportedDimension { dimension });
        }

        let max = (len - 1) as u8;
        let mut seen = [false; MAX_DIMENSION * MAX_DIMENSION];
        for &tile in tiles {
            if tile > max {
                return Err(BoardError::TileOutOfRange { tile, max });
            }
            if seen[tile as usize] {
                return Err(BoardError::DuplicateTile { tile });
            }
            seen[tile as usize] = true;
        }

        Ok(Self {
            dimension,
            tiles: SmallVec::from_slice(tiles),
        })
    }

    /// `[1, 2, 3, 8, 0, 4, 7, 6, 5]`: tiles spiral clockwise around a
    /// centred blank.
    pub fn default_goal() -> Self {
        Self {
            dimension: 3,
            tiles: SmallVec::from_slice(&[1, 2, 3, 8, 0, 4, 7, 6, 5]),
        }
    }

    /// Side length of the grid
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Row-major tiles
    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile at a cell (row-major index)
    pub fn get(&self, index: usize) -> Option<u8> {
        self.tiles.get(index).copied()
    }

    /// Tile at a grid coordinate
    pub fn tile_at(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.dimension || col >= self.dimension {
            return None;
        }
        self.get(row * self.dimension + col)
    }

    /// Cell index currently holding `tile`
    pub fn position_of(&self, tile: u8) -> Option<usize> {
        self.tiles.iter().position(|&t| t == tile)
    }

    /// Cell index of the blank
    pub fn blank_index(&self) -> usize {
        // Construction guarantees a blank.
        self.position_of(BLANK).unwrap_or(0)
    }

    pub fn key(&self) -> BoardKey {
        let seed = self.dimension as u128;
        let packed = self
            .tiles
            .iter()
            .fold(seed, |acc, &tile| (acc << KEY_BITS) | tile as u128);
        BoardKey(packed)
    }

    /// Move the blank one cell, or `None` when the grid edge is in the way.
    pub fn apply(&self, direction: Direction) -> Option<Board> {
        let blank = self.blank_index();
        let (dr, dc) = direction.delta();
        let row = (blank / self.dimension) as isize + dr;
        let col = (blank % self.dimension) as isize + dc;

        let bound = self.dimension as isize;
        if row < 0 || row >= bound || col < 0 || col >= bound {
            return None;
        }

        let target = row as usize * self.dimension + col as usize;
        let mut tiles = self.tiles.clone();
        tiles.swap(blank, target);
        Some(Board {
            dimension: self.dimension,
            tiles,
        })
    }

    /// Whether `goal` lies in the same permutation class as this board,
    /// i.e. whether any sequence of blank moves can reach it.
    ///
    /// Every move is one transposition involving the blank and shifts the
    /// blank by one cell, so the permutation parity must match the parity
    /// of the blank's taxicab distance.
    pub fn is_solvable_towards(&self, goal: &Board) -> bool {
        if self.dimension != goal.dimension {
            return false;
        }

        let mut goal_index = [0usize; MAX_DIMENSION * MAX_DIMENSION];
        for (i, &tile) in goal.tiles.iter().enumerate() {
            goal_index[tile as usize] = i;
        }

        let permutation: Vec<usize> = self
            .tiles
            .iter()
            .map(|&tile| goal_index[tile as usize])
            .collect();
        let permutation_odd = (permutation.len() - count_cycles(&permutation)) % 2 == 1;

        let n = self.dimension;
        let (from, to) = (self.blank_index(), goal.blank_index());
        let blank_distance = (from / n).abs_diff(to / n) + (from % n).abs_diff(to % n);

        permutation_odd == (blank_distance % 2 == 1)
    }
}

impl TryFrom<Vec<u8>> for Board {
    type Error = BoardError;

    fn try_from(tiles: Vec<u8>) -> Result<Self, Self::Error> {
        Board::new(&tiles)
    }
}

impl From<Board> for Vec<u8> {
    fn from(board: Board) -> Self {
        board.tiles.into_vec()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "+----".repeat(self.dimension) + "+";
        writeln!(f, "{}", rule)?;
        for row in self.tiles.chunks(self.dimension) {
            for &tile in row {
                if tile == BLANK {
                    write!(f, "|    ")?;
                } else {
                    write!(f, "| {:>2} ", tile)?;
                }
            }
            writeln!(f, "|")?;
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}

/// Built-in start configurations for the default goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    One,
    Two,
}

impl Preset {
    pub fn from_number(number: u8) -> Option<Preset> {
        match number {
            1 => Some(Preset::One),
            2 => Some(Preset::Two),
            _ => None,
        }
    }

    pub fn start(self) -> Board {
        let tiles: [u8; 9] = match self {
            Preset::One => [2, 8, 3, 1, 6, 4, 0, 7, 5],
            Preset::Two => [2, 1, 6, 4, 0, 8, 7, 5, 3],
        };
        Board {
            dimension: 3,
            tiles: SmallVec::from_slice(&tiles),
        }
    }
}

fn integer_sqrt(n: usize) -> usize {
    let mut root = 0;
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}

fn count_cycles(permutation: &[usize]) -> usize {
    let mut visited = vec![false; permutation.len()];
    let mut cycles = 0;
    for start in 0..permutation.len() {
        if visited[start] {
            continue;
        }
        cycles += 1;
        let mut i = start;
        while !visited[i] {
            visited[i] = true;
            i = permutation[i];
        }
    }
    cycles
}
