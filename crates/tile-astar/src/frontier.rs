//! Open and closed sets.
//!
//! The open set is an indexed binary min-heap: besides the heap array it
//! keeps each open node's heap slot and a board lookup, so membership is a
//! hash probe and lowering a node's priority is a single sift-up instead
//! of a drain-and-rebuild.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use crate::node::NodeId;
use crate::puzzle::BoardKey;

/// Frontier ordering: lower `f` first, then older nodes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrontierKey {
    pub f: u32,
    pub creation_order: u64,
}

#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    key: FrontierKey,
    node: NodeId,
    board: BoardKey,
}

/// Generated but not yet expanded nodes
#[derive(Debug, Default)]
pub struct OpenSet {
    heap: Vec<HeapEntry>,
    /// Heap slot of every open node
    slots: FxHashMap<NodeId, usize>,
    index: FxHashMap<BoardKey, NodeId>,
}

impl OpenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Open node holding this board
    pub fn get(&self, board: &BoardKey) -> Option<NodeId> {
        self.index.get(board).copied()
    }

    pub fn contains(&self, board: &BoardKey) -> bool {
        self.index.contains_key(board)
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.slots.contains_key(&node)
    }

    /// Insert a node. Returns `false` (and changes nothing) when the board
    /// already has an open node.
    pub fn push(&mut self, node: NodeId, board: BoardKey, key: FrontierKey) -> bool {
        if self.index.contains_key(&board) {
            return false;
        }
        let slot = self.heap.len();
        self.heap.push(HeapEntry { key, node, board });
        self.slots.insert(node, slot);
        self.index.insert(board, node);
        self.sift_up(slot);
        true
    }

    /// Remove and return the node with the smallest key
    pub fn pop_min(&mut self) -> Option<NodeId> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let entry = self.heap.pop()?;
        self.slots.remove(&entry.node);
        self.index.remove(&entry.board);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(entry.node)
    }

    /// Smallest key without removing it
    pub fn peek(&self) -> Option<(NodeId, FrontierKey)> {
        self.heap.first().map(|entry| (entry.node, entry.key))
    }

    /// Lower an open node's priority. Returns `false` when the node is not
    /// open or the new key is not smaller.
    pub fn decrease_key(&mut self, node: NodeId, key: FrontierKey) -> bool {
        let Some(&slot) = self.slots.get(&node) else {
            return false;
        };
        if key >= self.heap[slot].key {
            return false;
        }
        self.heap[slot].key = key;
        self.sift_up(slot);
        true
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.heap[slot].key >= self.heap[parent].key {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < len && self.heap[left].key < self.heap[smallest].key {
                smallest = left;
            }
            if right < len && self.heap[right].key < self.heap[smallest].key {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        self.slots.insert(self.heap[a].node, a);
        self.slots.insert(self.heap[b].node, b);
    }
}

/// Expanded nodes, one per distinct board
#[derive(Debug, Default)]
pub struct ClosedSet {
    index: FxHashMap<BoardKey, NodeId>,
}

impl ClosedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an expanded node. A board that is already closed keeps its
    /// original node and `false` is returned.
    pub fn insert(&mut self, board: BoardKey, node: NodeId) -> bool {
        match self.index.entry(board) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(node);
                true
            }
        }
    }

    pub fn get(&self, board: &BoardKey) -> Option<NodeId> {
        self.index.get(board).copied()
    }

    pub fn contains(&self, board: &BoardKey) -> bool {
        self.index.contains_key(board)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
