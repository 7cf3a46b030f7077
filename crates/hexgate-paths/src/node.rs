use std::collections::HashMap;

use hexgate_core::Point;

/// Identity of a time-extended state. The same cell at two different turns
/// is two different states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct StateKey {
    pub(crate) pos: Point,
    pub(crate) turn: u32,
}

/// Handle into a [`NodeArena`].
pub(crate) type NodeId = usize;

// ---------------------------------------------------------------------------
// Search node
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub(crate) struct SearchNode {
    pub(crate) pos: Point,
    /// Edges traversed from the origin.
    pub(crate) turn: u32,
    pub(crate) g: i32,
    pub(crate) h: i32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) settled: bool,
}

impl SearchNode {
    #[inline]
    pub(crate) fn f(&self) -> i32 {
        self.g + self.h
    }

    #[inline]
    pub(crate) fn key(&self) -> StateKey {
        StateKey {
            pos: self.pos,
            turn: self.turn,
        }
    }
}

/// Heap entry for the best-first open set.
///
/// Ordered so that `BinaryHeap` (a max-heap) pops the smallest `f` first,
/// then the smallest `h`, then the oldest node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct OpenEntry {
    pub(crate) id: NodeId,
    pub(crate) f: i32,
    pub(crate) h: i32,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// Arena
// ---------------------------------------------------------------------------

/// Every node created by one search call, addressed by handle.
///
/// Handles are allocation order, which doubles as the final tie-break of
/// the open set. The arena lives on the stack of the search call and is
/// dropped whole when the call returns.
#[derive(Default)]
pub(crate) struct NodeArena {
    nodes: Vec<SearchNode>,
    index: HashMap<StateKey, NodeId>,
}

impl NodeArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Store a new node. The caller guarantees its state is not present yet.
    pub(crate) fn alloc(&mut self, node: SearchNode) -> NodeId {
        let id = self.nodes.len();
        debug_assert!(!self.index.contains_key(&node.key()));
        self.index.insert(node.key(), id);
        self.nodes.push(node);
        id
    }

    #[inline]
    pub(crate) fn lookup(&self, pos: Point, turn: u32) -> Option<NodeId> {
        self.index.get(&StateKey { pos, turn }).copied()
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id]
    }

    /// Number of nodes ever created (open and settled).
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Walk the parent chain from `end` to the origin and return the
    /// positions in start-to-end order.
    pub(crate) fn reconstruct(&self, end: NodeId) -> Vec<Point> {
        let mut path = Vec::with_capacity(self.nodes[end].turn as usize + 1);
        let mut cur = Some(end);
        while let Some(id) = cur {
            let node = &self.nodes[id];
            path.push(node.pos);
            cur = node.parent;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    fn node(x: i32, y: i32, turn: u32, parent: Option<NodeId>) -> SearchNode {
        SearchNode {
            pos: Point::new(x, y),
            turn,
            g: turn as i32,
            h: 0,
            parent,
            settled: false,
        }
    }

    #[test]
    fn same_cell_different_turns_are_distinct() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(node(1, 1, 2, None));
        let b = arena.alloc(node(1, 1, 4, None));
        assert_ne!(a, b);
        assert_eq!(arena.lookup(Point::new(1, 1), 2), Some(a));
        assert_eq!(arena.lookup(Point::new(1, 1), 4), Some(b));
        assert_eq!(arena.lookup(Point::new(1, 1), 3), None);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn reconstruct_orders_start_first() {
        let mut arena = NodeArena::new();
        let o = arena.alloc(node(0, 0, 0, None));
        let a = arena.alloc(node(1, 0, 1, Some(o)));
        let b = arena.alloc(node(0, 0, 2, Some(a)));
        let c = arena.alloc(node(0, 1, 3, Some(b)));
        assert_eq!(
            arena.reconstruct(c),
            vec![
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(0, 0),
                Point::new(0, 1)
            ]
        );
        assert_eq!(arena.reconstruct(o), vec![Point::new(0, 0)]);
    }

    #[test]
    fn open_entries_pop_by_f_then_h_then_age() {
        let mut heap = BinaryHeap::new();
        heap.push(OpenEntry { id: 0, f: 5, h: 1 });
        heap.push(OpenEntry { id: 1, f: 4, h: 3 });
        heap.push(OpenEntry { id: 2, f: 4, h: 2 });
        heap.push(OpenEntry { id: 3, f: 4, h: 2 });
        let order: Vec<NodeId> = std::iter::from_fn(|| heap.pop().map(|e| e.id)).collect();
        assert_eq!(order, vec![2, 3, 1, 0]);
    }
}
