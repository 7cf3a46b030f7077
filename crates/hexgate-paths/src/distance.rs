use hexgate_core::{Point, hex};

/// Manhattan (L1) distance on offset coordinates.
///
/// This is the best-first estimate. It ignores the hex layout, so it can
/// overestimate the number of moves, and it knows nothing about gates.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// True move count between two cells on an open board.
#[inline]
pub fn hex_distance(a: Point, b: Point) -> i32 {
    hex::distance(a, b)
}
