//! Graph-search A* over sliding-tile boards.
//!
//! Exactly one node exists per distinct board across the open and closed
//! sets. When a cheaper route reaches a board that is already known, its
//! node is re-parented in place; if it was already expanded the
//! improvement is pushed down to its descendants. Closed nodes are never
//! re-opened.

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::error::{Result, SearchError};
use crate::frontier::{ClosedSet, FrontierKey, OpenSet};
use crate::heuristic::Heuristic;
use crate::moves::{successors, MOVE_COST};
use crate::node::{NodeArena, NodeId, SearchNode};
use crate::path::{moves_along, reconstruct};
use crate::propagation::propagate;
use crate::puzzle::{Board, BoardKey, Direction};

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Board the search must reach
    pub goal: Board,
    /// Stop with an error once this many nodes have been generated
    pub node_budget: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            goal: Board::default_goal(),
            node_budget: None,
        }
    }
}

/// Counters collected during a search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    /// Nodes created, including the start
    pub generated: usize,
    /// Nodes moved to the closed set
    pub expanded: usize,
    /// Cost of the solution
    pub depth: u32,
    /// Known nodes that received a cheaper parent
    pub reparented: usize,
    /// Descendant costs lowered by propagation
    pub propagated: usize,
}

impl SearchStats {
    /// `generated / depth`, or `0.0` for a zero-length solution
    pub fn effective_branching_factor(&self) -> f64 {
        if self.depth == 0 {
            0.0
        } else {
            self.generated as f64 / self.depth as f64
        }
    }
}

/// An optimal move sequence and the statistics of the run that found it
#[derive(Debug, Clone)]
pub struct Solution {
    /// Boards from start to goal, both included
    pub path: Vec<Board>,
    pub stats: SearchStats,
}

impl Solution {
    /// Blank moves along the path
    pub fn moves(&self) -> Vec<Direction> {
        moves_along(&self.path)
    }
}

/// Result of a single engine step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A node was expanded; the search continues
    Running,
    /// The goal node was popped
    Solved(NodeId),
    /// The open set is empty
    Exhausted,
}

/// The A* engine. Owns every node for the duration of the search.
#[derive(Debug)]
pub struct SearchEngine {
    goal_key: BoardKey,
    heuristic: Heuristic,
    node_budget: Option<usize>,
    arena: NodeArena,
    open: OpenSet,
    closed: ClosedSet,
    stats: SearchStats,
    finished: Option<StepOutcome>,
    halted: Option<SearchError>,
}

impl SearchEngine {
    /// Seed the open set with `start`.
    pub fn new(start: Board, config: &SolverConfig) -> Result<Self> {
        if start.dimension() != config.goal.dimension() {
            return Err(SearchError::DimensionMismatch {
                start: start.dimension(),
                goal: config.goal.dimension(),
            });
        }

        let heuristic = Heuristic::new(&config.goal);
        let h = heuristic.estimate(&start);
        debug!(start = ?start.tiles(), goal = ?config.goal.tiles(), h, "search started");

        let mut arena = NodeArena::new();
        let mut open = OpenSet::new();
        let root = arena.alloc(start, 0, h, None);
        let node = arena.get(root);
        open.push(root, node.key, frontier_key(node));

        Ok(Self {
            goal_key: config.goal.key(),
            heuristic,
            node_budget: config.node_budget,
            arena,
            open,
            closed: ClosedSet::new(),
            stats: SearchStats {
                generated: 1,
                ..SearchStats::default()
            },
            finished: None,
            halted: None,
        })
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn open(&self) -> &OpenSet {
        &self.open
    }

    pub fn closed(&self) -> &ClosedSet {
        &self.closed
    }

    /// Pop the best open node and either finish or expand it.
    ///
    /// Once the search has finished or failed, further calls return the
    /// same outcome and leave the open and closed sets untouched.
    pub fn step(&mut self) -> Result<StepOutcome> {
        if let Some(err) = &self.halted {
            return Err(err.clone());
        }
        if let Some(outcome) = self.finished {
            return Ok(outcome);
        }

        let result = self.advance();
        if let Err(err) = &result {
            self.halted = Some(err.clone());
        }
        result
    }

    fn advance(&mut self) -> Result<StepOutcome> {
        let Some(best) = self.open.pop_min() else {
            debug!(
                generated = self.stats.generated,
                expanded = self.stats.expanded,
                "open set exhausted"
            );
            self.finished = Some(StepOutcome::Exhausted);
            return Ok(StepOutcome::Exhausted);
        };

        let node = self.arena.get(best);
        if node.key == self.goal_key {
            self.stats.depth = node.g;
            self.finished = Some(StepOutcome::Solved(best));
            return Ok(StepOutcome::Solved(best));
        }

        let board = node.board.clone();
        let tentative_g = node.g + MOVE_COST;
        let inserted = self.closed.insert(node.key, best);
        debug_assert!(inserted, "board expanded twice");
        self.stats.expanded += 1;

        for (_, next) in successors(&board) {
            let key = next.key();

            if let Some(existing) = self.open.get(&key) {
                if tentative_g < self.arena.get(existing).g {
                    self.arena.reparent(existing, best, tentative_g);
                    let priority = frontier_key(self.arena.get(existing));
                    let lowered = self.open.decrease_key(existing, priority);
                    debug_assert!(lowered);
                    self.stats.reparented += 1;
                    trace!(node = %existing, parent = %best, g = tentative_g, "re-parented open node");
                }
            } else if let Some(existing) = self.closed.get(&key) {
                if tentative_g < self.arena.get(existing).g {
                    self.arena.reparent(existing, best, tentative_g);
                    self.stats.reparented += 1;
                    trace!(node = %existing, parent = %best, g = tentative_g, "re-parented closed node");
                    self.stats.propagated +=
                        propagate(&mut self.arena, &mut self.open, existing)?;
                }
            } else {
                self.check_budget()?;
                let h = self.heuristic.estimate(&next);
                let id = self.arena.alloc(next, tentative_g, h, Some(best));
                let created = self.arena.get(id);
                self.open.push(id, key, frontier_key(created));
                self.stats.generated += 1;
            }
        }

        Ok(StepOutcome::Running)
    }

    /// Step until the goal is reached or the open set runs dry.
    pub fn run(&mut self) -> Result<Solution> {
        loop {
            match self.step()? {
                StepOutcome::Running => continue,
                StepOutcome::Solved(goal) => {
                    let path = reconstruct(&self.arena, goal)?;
                    info!(
                        depth = self.stats.depth,
                        generated = self.stats.generated,
                        expanded = self.stats.expanded,
                        "solution found"
                    );
                    return Ok(Solution {
                        path,
                        stats: self.stats.clone(),
                    });
                }
                StepOutcome::Exhausted => {
                    return Err(SearchError::Unsolvable {
                        generated: self.stats.generated,
                        expanded: self.stats.expanded,
                    });
                }
            }
        }
    }

    fn check_budget(&self) -> Result<()> {
        match self.node_budget {
            Some(budget) if self.stats.generated >= budget => {
                warn!(budget, expanded = self.stats.expanded, "node budget exceeded");
                Err(SearchError::NodeBudgetExceeded {
                    budget,
                    generated: self.stats.generated,
                    expanded: self.stats.expanded,
                })
            }
            _ => Ok(()),
        }
    }
}

fn frontier_key(node: &SearchNode) -> FrontierKey {
    FrontierKey {
        f: node.f(),
        creation_order: node.creation_order,
    }
}

/// Find a minimum-cost path from `start` to the configured goal.
pub fn solve(start: &Board, config: &SolverConfig) -> Result<Solution> {
    SearchEngine::new(start.clone(), config)?.run()
}
