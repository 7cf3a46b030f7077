//! [`HexGrid`] as a search target.

use hexgate_core::{HexGrid, Point, Range};

use crate::traits::{Pather, TimedPather};

impl Pather for HexGrid {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        buf.extend(HexGrid::neighbors(self, p));
    }
}

impl TimedPather for HexGrid {
    #[inline]
    fn bounds(&self) -> Range {
        HexGrid::bounds(self)
    }

    #[inline]
    fn passable_at(&self, p: Point, turn: u32) -> bool {
        self.is_passable_at(p, turn)
    }
}
