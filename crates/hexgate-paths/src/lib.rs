//! Bounded path search through time on a hex board.
//!
//! Cells of a [`HexGrid`](hexgate_core::HexGrid) may open and close as turns
//! pass, so a search state is a `(position, turn)` pair rather than a bare
//! position. Two strategies are provided through [`PathFinder`]:
//!
//! - **Best-first** ([`PathFinder::best_first`]), guided by the Manhattan
//!   estimate. Fast, but the path is not always the shortest.
//! - **Breadth-first** ([`PathFinder::breadth_first`]), which finds the
//!   fewest-turns path whenever one exists within its depth cap.
//!
//! Every search runs under [`SearchLimits`] (depth, iterations, wall-clock
//! time and node count) and returns a [`SearchReport`] carrying either the
//! path or a [`SearchFailure`], together with [`SearchStats`] counters.
//!
//! # Trait hierarchy
//!
//! | Trait | Provides |
//! |---|---|
//! | [`Pather`] | neighbor enumeration |
//! | [`TimedPather`] : [`Pather`] | bounds and turn-dependent passability |

mod best_first;
mod bounds;
mod breadth_first;
mod distance;
mod finder;
mod grid;
mod node;
mod report;
mod traits;
mod verify;

pub use bounds::{Bound, SearchLimits};
pub use distance::{hex_distance, manhattan};
pub use finder::{ParseStrategyError, PathFinder, SearchConfig, Strategy, solve};
pub use report::{SearchFailure, SearchReport, SearchStats};
pub use traits::{Pather, TimedPather};
pub use verify::{PathViolation, verify_path};
