//! Checking a path against the board it was computed for.

use std::fmt;

use hexgate_core::{Point, hex};

use crate::traits::TimedPather;

/// The first rule a path breaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathViolation {
    /// The path has no positions.
    Empty,
    /// The first position is not the start.
    WrongStart { expected: Point, found: Point },
    /// The last position is not the goal.
    WrongGoal { expected: Point, found: Point },
    /// Step `step` leaves the board.
    OutOfBounds { step: usize, pos: Point },
    /// Step `step` jumps between cells that do not touch.
    NotAdjacent { step: usize, from: Point, to: Point },
    /// Step `step` lands on a cell closed at absolute turn `turn`.
    Blocked { step: usize, pos: Point, turn: u32 },
}

impl fmt::Display for PathViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "path is empty"),
            Self::WrongStart { expected, found } => {
                write!(f, "path starts at {found}, expected {expected}")
            }
            Self::WrongGoal { expected, found } => {
                write!(f, "path ends at {found}, expected {expected}")
            }
            Self::OutOfBounds { step, pos } => write!(f, "step {step} leaves the board at {pos}"),
            Self::NotAdjacent { step, from, to } => {
                write!(f, "step {step} jumps from {from} to {to}")
            }
            Self::Blocked { step, pos, turn } => {
                write!(f, "step {step} enters {pos} while it is closed (turn {turn})")
            }
        }
    }
}

impl std::error::Error for PathViolation {}

/// Check that `path` walks from `start` to `goal` one hex at a time and that
/// every step lands on a cell open at its arrival turn.
///
/// Step `k` moves from `path[k]` to `path[k + 1]` and arrives at absolute
/// turn `origin + k + 1`. The start cell itself is not checked.
pub fn verify_path<P: TimedPather>(
    pather: &P,
    path: &[Point],
    start: Point,
    goal: Point,
    origin: u32,
) -> Result<(), PathViolation> {
    let (&first, &last) = match (path.first(), path.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(PathViolation::Empty),
    };
    if first != start {
        return Err(PathViolation::WrongStart {
            expected: start,
            found: first,
        });
    }
    if last != goal {
        return Err(PathViolation::WrongGoal {
            expected: goal,
            found: last,
        });
    }

    let bounds = pather.bounds();
    for (step, pair) in path.windows(2).enumerate() {
        let (from, to) = (pair[0], pair[1]);
        if !bounds.contains(to) {
            return Err(PathViolation::OutOfBounds { step, pos: to });
        }
        if !hex::are_adjacent(from, to) {
            return Err(PathViolation::NotAdjacent { step, from, to });
        }
        let turn = origin.saturating_add(step as u32 + 1);
        if !pather.passable_at(to, turn) {
            return Err(PathViolation::Blocked { step, pos: to, turn });
        }
    }
    Ok(())
}
