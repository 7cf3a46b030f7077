use hexgate_core::{Point, Range};

/// Minimal pathfinding interface: neighbor enumeration.
pub trait Pather {
    /// Append the in-bounds neighbors of `p` into `buf`. The caller clears
    /// `buf` before calling.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);
}

/// Pather whose cells open and close as turns go by.
///
/// The board must not change while a search borrows it; passability is a
/// pure function of position and absolute turn.
pub trait TimedPather: Pather {
    /// Positions that exist on the board.
    fn bounds(&self) -> Range;

    /// Whether a move may end on `p` at absolute turn `turn`.
    fn passable_at(&self, p: Point, turn: u32) -> bool;
}
