//! Hex adjacency for offset coordinates.
//!
//! The board uses an "odd-q" layout: columns are vertical, odd columns sit
//! half a cell lower than even ones. Which six cells touch a position
//! therefore depends on the parity of its column, and two fixed offset
//! tables cover both cases.

use crate::geom::Point;

/// Neighbor offsets for a cell in an even column.
pub const EVEN_COLUMN_OFFSETS: [Point; 6] = [
    Point::new(0, -1),
    Point::new(1, -1),
    Point::new(1, 0),
    Point::new(0, 1),
    Point::new(-1, 0),
    Point::new(-1, -1),
];

/// Neighbor offsets for a cell in an odd column.
pub const ODD_COLUMN_OFFSETS: [Point; 6] = [
    Point::new(0, -1),
    Point::new(1, 0),
    Point::new(1, 1),
    Point::new(0, 1),
    Point::new(-1, 1),
    Point::new(-1, 0),
];

/// The offset table that applies to `p`.
#[inline]
pub fn offsets(p: Point) -> &'static [Point; 6] {
    if p.is_even_column() {
        &EVEN_COLUMN_OFFSETS
    } else {
        &ODD_COLUMN_OFFSETS
    }
}

/// The six positions around `p`, unfiltered, in table order.
#[inline]
pub fn neighbors(p: Point) -> [Point; 6] {
    offsets(p).map(|d| p + d)
}

/// Whether `a` and `b` share an edge.
pub fn are_adjacent(a: Point, b: Point) -> bool {
    offsets(a).iter().any(|&d| a + d == b)
}

/// Convert to cube coordinates `(q, r, s)` with `q + r + s == 0`.
#[inline]
pub fn to_cube(p: Point) -> (i32, i32, i32) {
    let q = p.x;
    let r = p.y - (p.x - (p.x & 1)) / 2;
    (q, r, -q - r)
}

/// Number of moves between two cells on an unobstructed board.
pub fn distance(a: Point, b: Point) -> i32 {
    let (aq, ar, as_) = to_cube(a);
    let (bq, br, bs) = to_cube(b);
    ((aq - bq).abs() + (ar - br).abs() + (as_ - bs).abs()) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_entry_is_one_step_away() {
        for p in [Point::new(0, 0), Point::new(1, 0), Point::new(4, 3), Point::new(-3, 2)] {
            for n in neighbors(p) {
                assert_eq!(distance(p, n), 1, "{n} should touch {p}");
            }
        }
    }

    #[test]
    fn adjacency_is_symmetric() {
        for p in [Point::new(2, 2), Point::new(3, 2), Point::new(-1, -1)] {
            for n in neighbors(p) {
                assert!(are_adjacent(p, n));
                assert!(are_adjacent(n, p), "{p} missing from the table of {n}");
            }
        }
    }

    #[test]
    fn parity_selects_table() {
        assert!(neighbors(Point::new(0, 1)).contains(&Point::new(1, 0)));
        assert!(!neighbors(Point::new(0, 1)).contains(&Point::new(1, 2)));
        assert!(neighbors(Point::new(1, 1)).contains(&Point::new(2, 2)));
        assert!(!neighbors(Point::new(1, 1)).contains(&Point::new(2, 0)));
    }

    #[test]
    fn not_adjacent_to_self_or_far_cells() {
        let p = Point::new(2, 2);
        assert!(!are_adjacent(p, p));
        assert!(!are_adjacent(p, Point::new(4, 2)));
    }

    #[test]
    fn distance_across_columns() {
        assert_eq!(distance(Point::new(0, 0), Point::new(2, 2)), 3);
        assert_eq!(distance(Point::new(0, 0), Point::new(4, 0)), 4);
        assert_eq!(distance(Point::new(0, 0), Point::new(0, 3)), 3);
        assert_eq!(distance(Point::new(1, 1), Point::new(1, 1)), 0);
    }
}
