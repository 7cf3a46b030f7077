//! **hexgate-core**: the board of a turn-based hex puzzle.
//!
//! This crate provides the types shared across *hexgate*: offset hex
//! geometry, cell kinds whose passability depends on the turn (walls, gates,
//! temporal walls), and the [`HexGrid`] board that answers neighbor and
//! passability queries for the path finders in `hexgate-paths`.

pub mod cell;
pub mod geom;
pub mod grid;
pub mod hex;

pub use cell::{CellKind, GateSchedule};
pub use geom::{Point, Range};
pub use grid::{DEFAULT_TURN_CYCLE, GridError, HexGrid};
