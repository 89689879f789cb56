//! Graph-search A* solver for square sliding-tile puzzles.
//!
//! Given a start board and a goal board, the solver finds a minimum-cost
//! sequence of blank moves together with search statistics. One node is
//! kept per distinct board; cheaper routes found later re-parent that node
//! and propagate the saving to its descendants.

pub mod error;
pub mod frontier;
pub mod heuristic;
pub mod moves;
pub mod node;
pub mod path;
pub mod propagation;
pub mod puzzle;
pub mod solver;

// Re-export main types
pub use error::{BoardError, Result, SearchError};
pub use heuristic::Heuristic;
pub use moves::successors;
pub use node::{NodeArena, NodeId, SearchNode};
pub use puzzle::{Board, BoardKey, Direction, Preset};
pub use solver::{solve, SearchEngine, SearchStats, Solution, SolverConfig, StepOutcome};
