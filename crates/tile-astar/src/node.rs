//! Search nodes and the arena that owns them.
//!
//! Nodes refer to each other by [`NodeId`] rather than by pointer, so a
//! node can be re-parented and have its cost lowered in place while it is
//! still reachable from Open, Closed and other nodes' child lists. The
//! arena only grows; everything is released together when the engine is
//! dropped.

use std::fmt;

use smallvec::SmallVec;

use crate::puzzle::{Board, BoardKey};

/// Stable index of a node in its [`NodeArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One distinct board together with its best known path cost.
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub board: Board,
    pub key: BoardKey,
    /// Cost of the best known path from the start
    pub g: u32,
    /// Heuristic estimate, fixed at creation
    pub h: u32,
    /// Predecessor on the best known path (`None` only for the start)
    pub parent: Option<NodeId>,
    /// Nodes whose `parent` is (or was) this node
    pub children: SmallVec<[NodeId; 4]>,
    /// Allocation counter, used to break `f` ties
    pub creation_order: u64,
}

impl SearchNode {
    /// `f = g + h`, the frontier priority
    pub fn f(&self) -> u32 {
        self.g + self.h
    }
}

#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node and, when `parent` is given, record it as that
    /// parent's child.
    pub fn alloc(&mut self, board: Board, g: u32, h: u32, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let key = board.key();
        self.nodes.push(SearchNode {
            board,
            key,
            g,
            h,
            parent,
            children: SmallVec::new(),
            creation_order: id.0 as u64,
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        id
    }

    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Move `child` under `new_parent` with cost `g`.
    ///
    /// The child leaves its old parent's child list and joins the new one,
    /// so a node is listed under exactly its current parent.
    pub fn reparent(&mut self, child: NodeId, new_parent: NodeId, g: u32) {
        if let Some(old) = self.nodes[child.index()].parent {
            self.nodes[old.index()].children.retain(|c| *c != child);
        }

        let node = &mut self.nodes[child.index()];
        node.parent = Some(new_parent);
        node.g = g;

        let siblings = &mut self.nodes[new_parent.index()].children;
        if !siblings.contains(&child) {
            siblings.push(child);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SearchNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Direction;

    fn boards() -> (Board, Board, Board) {
        let root = Board::default_goal();
        let a = root.apply(Direction::Up).unwrap();
        let b = root.apply(Direction::Down).unwrap();
        (root, a, b)
    }

    #[test]
    fn test_alloc_links_parent_and_child() {
        let (root_board, a_board, _) = boards();
        let mut arena = NodeArena::new();
        let root = arena.alloc(root_board, 0, 0, None);
        let a = arena.alloc(a_board, 1, 1, Some(root));

        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a).parent, Some(root));
        assert_eq!(arena.get(root).children.as_slice(), &[a]);
        assert_eq!(arena.get(a).f(), 2);
        assert!(arena.get(root).creation_order < arena.get(a).creation_order);
    }

    #[test]
    fn test_reparent_moves_child_between_lists() {
        let (root_board, a_board, b_board) = boards();
        let mut arena = NodeArena::new();
        let root = arena.alloc(root_board.clone(), 0, 0, None);
        let a = arena.alloc(a_board, 1, 0, Some(root));
        let b = arena.alloc(b_board, 5, 0, Some(a));

        arena.reparent(b, root, 1);

        assert_eq!(arena.get(b).parent, Some(root));
        assert_eq!(arena.get(b).g, 1);
        assert!(arena.get(a).children.is_empty());
        assert_eq!(arena.get(root).children.as_slice(), &[a, b]);

        // Re-parenting onto the same parent does not duplicate the entry
        arena.reparent(b, root, 1);
        assert_eq!(arena.get(root).children.as_slice(), &[a, b]);
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId(7).to_string(), "#7");
    }
}
