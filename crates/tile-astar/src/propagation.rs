//! Pushing a cost improvement down the search tree.
//!
//! When a cheaper path reaches a node that was already expanded, every
//! descendant whose cost was derived through it is now too expensive.
//! [`propagate`] walks the subtree with an explicit stack and lowers those
//! costs, following only children that still name the current node as
//! their parent.

use rustc_hash::FxHashSet;
use tracing::trace;

use crate::error::{Result, SearchError};
use crate::frontier::{FrontierKey, OpenSet};
use crate::moves::MOVE_COST;
use crate::node::{NodeArena, NodeId};

/// Restore `child.g == parent.g + MOVE_COST` below `root`.
///
/// Children that are still open are re-prioritised in `open`. Returns the
/// number of nodes whose cost changed; running it again on an unchanged
/// subtree returns `0`.
pub fn propagate(arena: &mut NodeArena, open: &mut OpenSet, root: NodeId) -> Result<usize> {
    let mut improved: FxHashSet<NodeId> = FxHashSet::default();
    improved.insert(root);

    let mut stack = vec![root];
    let mut updated = 0;

    while let Some(node) = stack.pop() {
        let g = arena.get(node).g;
        let children = arena.get(node).children.clone();

        for child in children {
            let candidate = g + MOVE_COST;
            let current = arena.get(child);
            if current.parent != Some(node) || candidate >= current.g {
                continue;
            }
            // Unreachable while every move costs the same: a loop can
            // never lower a node twice. Only corrupted parent links get here.
            if !improved.insert(child) {
                return Err(SearchError::PropagationCycle { node: child });
            }

            let entry = arena.get_mut(child);
            trace!(node = %child, from = entry.g, to = candidate, "propagated cost");
            entry.g = candidate;
            let key = FrontierKey {
                f: entry.f(),
                creation_order: entry.creation_order,
            };
            open.decrease_key(child, key);

            updated += 1;
            stack.push(child);
        }
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{Board, Direction};

    struct Tree {
        arena: NodeArena,
        root: NodeId,
        a: NodeId,
        b: NodeId,
        c: NodeId,
        other: NodeId,
        stray: NodeId,
    }

    /// root -> a -> b -> c with stale costs below `a`, plus `stray`, listed
    /// under `b` but re-parented onto `other`.
    fn tree() -> Tree {
        let mut arena = NodeArena::new();
        let mut board = Board::default_goal();
        let mut next = |d: Direction| {
            board = board.apply(d).expect("legal move");
            board.clone()
        };

        let root = arena.alloc(next(Direction::Up), 0, 0, None);
        let a = arena.alloc(next(Direction::Left), 5, 0, Some(root));
        let b = arena.alloc(next(Direction::Down), 6, 0, Some(a));
        let c = arena.alloc(next(Direction::Down), 7, 0, Some(b));
        let other = arena.alloc(next(Direction::Right), 1, 0, Some(root));
        let stray = arena.alloc(next(Direction::Right), 2, 0, Some(other));
        // Stale entry: `b` still lists `stray` although its parent is `other`
        arena.get_mut(b).children.push(stray);

        Tree {
            arena,
            root,
            a,
            b,
            c,
            other,
            stray,
        }
    }

    #[test]
    fn test_propagate_lowers_descendant_costs() {
        let mut t = tree();
        let mut open = OpenSet::new();
        t.arena.reparent(t.a, t.root, 1);

        let updated = propagate(&mut t.arena, &mut open, t.a).unwrap();

        assert_eq!(updated, 2);
        assert_eq!(t.arena.get(t.b).g, 2);
        assert_eq!(t.arena.get(t.c).g, 3);
    }

    #[test]
    fn test_propagate_skips_reparented_children() {
        let mut t = tree();
        let mut open = OpenSet::new();
        t.arena.get_mut(t.a).g = 1;

        propagate(&mut t.arena, &mut open, t.a).unwrap();

        // b is now at 2, but `stray` belongs to `other` and keeps its cost
        assert_eq!(t.arena.get(t.stray).g, 2);
        assert_eq!(t.arena.get(t.stray).parent, Some(t.other));
    }

    #[test]
    fn test_propagate_is_idempotent() {
        let mut t = tree();
        let mut open = OpenSet::new();
        t.arena.get_mut(t.a).g = 1;
        propagate(&mut t.arena, &mut open, t.a).unwrap();

        let before: Vec<u32> = t.arena.iter().map(|(_, n)| n.g).collect();
        assert_eq!(propagate(&mut t.arena, &mut open, t.a).unwrap(), 0);
        assert_eq!(propagate(&mut t.arena, &mut open, t.root).unwrap(), 0);
        let after: Vec<u32> = t.arena.iter().map(|(_, n)| n.g).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_propagate_reprioritises_open_descendants() {
        let mut t = tree();
        let mut open = OpenSet::new();
        let c = t.arena.get(t.c);
        let c_key = c.key;
        let c_order = c.creation_order;
        open.push(
            t.c,
            c_key,
            FrontierKey {
                f: 7,
                creation_order: c_order,
            },
        );
        let other = t.arena.get(t.other);
        open.push(
            t.other,
            other.key,
            FrontierKey {
                f: 4,
                creation_order: other.creation_order,
            },
        );
        assert_eq!(open.peek().map(|(id, _)| id), Some(t.other));

        t.arena.get_mut(t.a).g = 1;
        propagate(&mut t.arena, &mut open, t.a).unwrap();

        let (top, key) = open.peek().unwrap();
        assert_eq!(top, t.c);
        assert_eq!(key.f, 3);
    }
}
