//! The [`HexGrid`] type: a rectangular board of hex cells.
//!
//! A grid owns its cells, the start and goal positions, and a registry of
//! named gate patterns that share the board-wide turn cycle. It is built up
//! front (from a text layout or with the setters) and then only queried.

use std::collections::BTreeMap;
use std::fmt;

use crate::cell::{CellKind, GateSchedule, parse_bits};
use crate::geom::{Point, Range};
use crate::hex;

/// Turn cycle applied to named gate patterns unless the level overrides it.
pub const DEFAULT_TURN_CYCLE: u32 = 8;

/// A rectangular hex board with turn-dependent cells.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawHexGrid"))]
pub struct HexGrid {
    width: i32,
    height: i32,
    cells: Vec<CellKind>,
    start: Point,
    goal: Point,
    patterns: BTreeMap<String, Vec<bool>>,
    turn_cycle: u32,
}

/// Number of cells of a `width` x `height` board, if both are positive and
/// the product fits in an `i32`.
fn cell_count(width: i32, height: i32) -> Option<usize> {
    if width <= 0 || height <= 0 {
        return None;
    }
    width.checked_mul(height).map(|n| n as usize)
}

/// Unchecked serialized form of a [`HexGrid`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawHexGrid {
    width: i32,
    height: i32,
    cells: Vec<CellKind>,
    start: Point,
    goal: Point,
    patterns: BTreeMap<String, Vec<bool>>,
    turn_cycle: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawHexGrid> for HexGrid {
    type Error = GridError;

    fn try_from(raw: RawHexGrid) -> Result<Self, GridError> {
        let RawHexGrid {
            width,
            height,
            cells,
            start,
            goal,
            patterns,
            turn_cycle,
        } = raw;
        let len = cell_count(width, height).ok_or(GridError::BadSize { width, height })?;
        if cells.len() != len {
            return Err(GridError::CellCount {
                expected: len,
                found: cells.len(),
            });
        }
        if turn_cycle == 0 {
            return Err(GridError::ZeroCycle);
        }
        let grid = Self {
            width,
            height,
            cells,
            start,
            goal,
            patterns,
            turn_cycle,
        };
        for p in [start, goal] {
            if !grid.contains(p) {
                return Err(GridError::OutOfBounds(p));
            }
        }
        Ok(grid)
    }
}

impl HexGrid {
    /// Create a board of free cells. Start is the top-left cell and goal the
    /// bottom-right one until set otherwise.
    ///
    /// Both sides must be positive and the cell count must fit in an `i32`.
    pub fn new(width: i32, height: i32) -> Result<Self, GridError> {
        let len = cell_count(width, height).ok_or(GridError::BadSize { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![CellKind::Free; len],
            start: Point::ZERO,
            goal: Point::new(width - 1, height - 1),
            patterns: BTreeMap::new(),
            turn_cycle: DEFAULT_TURN_CYCLE,
        })
    }

    /// Build a board from a text layout, one line per row.
    ///
    /// `.` is free, `#` a wall, `*` an item, `S` the start and `G` the goal.
    /// Whitespace around the whole layout is ignored; every row must have the
    /// same width and exactly one `S` and one `G` must appear. Gates and
    /// temporal walls are placed afterwards with the setters.
    pub fn from_layout(layout: &str) -> Result<Self, GridError> {
        let rows: Vec<&str> = layout.trim().lines().map(str::trim).collect();
        let width = rows.first().map_or(0, |r| r.chars().count());
        if width == 0 {
            return Err(GridError::EmptyLayout);
        }
        if let Some((y, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.chars().count() != width)
        {
            return Err(GridError::RaggedRow {
                row: y,
                expected: width,
                found: row.chars().count(),
            });
        }

        let (Ok(width), Ok(height)) = (i32::try_from(width), i32::try_from(rows.len())) else {
            return Err(GridError::LayoutTooLarge);
        };
        let mut grid = Self::new(width, height)?;
        let mut start = None;
        let mut goal = None;
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let p = Point::new(x as i32, y as i32);
                let kind = match ch {
                    '.' => CellKind::Free,
                    '#' => CellKind::Wall,
                    '*' => CellKind::Item,
                    'S' => {
                        if start.replace(p).is_some() {
                            return Err(GridError::DuplicateEndpoint { ch, pos: p });
                        }
                        CellKind::Start
                    }
                    'G' => {
                        if goal.replace(p).is_some() {
                            return Err(GridError::DuplicateEndpoint { ch, pos: p });
                        }
                        CellKind::Goal
                    }
                    _ => return Err(GridError::InvalidGlyph { ch, pos: p }),
                };
                let i = grid.index(p).ok_or(GridError::OutOfBounds(p))?;
                grid.cells[i] = kind;
            }
        }
        grid.start = start.ok_or(GridError::MissingEndpoint('S'))?;
        grid.goal = goal.ok_or(GridError::MissingEndpoint('G'))?;

        log::debug!("grid loaded: {}x{} cells", grid.width, grid.height);
        Ok(grid)
    }

    /// Width in cells.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The range of valid positions.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::with_size(self.width, self.height)
    }

    /// Whether `p` lies on the board.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        self.contains(p)
            .then(|| (p.y * self.width + p.x) as usize)
    }

    /// The cell at `p`, or `None` off the board.
    pub fn cell(&self, p: Point) -> Option<&CellKind> {
        self.index(p).map(|i| &self.cells[i])
    }

    /// Replace the cell at `p`.
    pub fn set(&mut self, p: Point, kind: CellKind) -> Result<(), GridError> {
        let i = self.index(p).ok_or(GridError::OutOfBounds(p))?;
        self.cells[i] = kind;
        Ok(())
    }

    /// Place a gate with its own schedule.
    pub fn set_gate(&mut self, p: Point, schedule: GateSchedule) -> Result<(), GridError> {
        self.set(p, CellKind::Gate(schedule))
    }

    /// Place a wall that opens at absolute turn `opens_at`.
    pub fn set_temporal_wall(&mut self, p: Point, opens_at: u32) -> Result<(), GridError> {
        self.set(p, CellKind::TemporalWall { opens_at })
    }

    /// Start position.
    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    /// Goal position.
    #[inline]
    pub fn goal(&self) -> Point {
        self.goal
    }

    /// Move the start marker. The previous start cell becomes free.
    pub fn set_start(&mut self, p: Point) -> Result<(), GridError> {
        self.index(p).ok_or(GridError::OutOfBounds(p))?;
        self.move_marker(self.start, p, CellKind::Start);
        self.start = p;
        Ok(())
    }

    /// Move the goal marker. The previous goal cell becomes free.
    pub fn set_goal(&mut self, p: Point) -> Result<(), GridError> {
        self.index(p).ok_or(GridError::OutOfBounds(p))?;
        self.move_marker(self.goal, p, CellKind::Goal);
        self.goal = p;
        Ok(())
    }

    fn move_marker(&mut self, old: Point, new: Point, marker: CellKind) {
        if let Some(i) = self.index(old) {
            if self.cells[i] == marker {
                self.cells[i] = CellKind::Free;
            }
        }
        if let Some(i) = self.index(new) {
            self.cells[i] = marker;
        }
    }

    // -----------------------------------------------------------------------
    // Named gate patterns
    // -----------------------------------------------------------------------

    /// Turn cycle used by named gate patterns.
    #[inline]
    pub fn turn_cycle(&self) -> u32 {
        self.turn_cycle
    }

    /// Change the turn cycle for named patterns. Gates already placed keep
    /// the schedule they were created with.
    pub fn set_turn_cycle(&mut self, cycle_len: u32) -> Result<(), GridError> {
        if cycle_len == 0 {
            return Err(GridError::ZeroCycle);
        }
        self.turn_cycle = cycle_len;
        Ok(())
    }

    /// Register (or replace) a named pattern such as `"A" => "11110000"`.
    pub fn define_pattern(&mut self, name: &str, bits: &str) -> Result<(), GridError> {
        let pattern = parse_bits(bits)?;
        self.patterns.insert(name.to_string(), pattern);
        Ok(())
    }

    /// Place a gate that follows the named pattern on the board's turn cycle.
    pub fn set_named_gate(&mut self, p: Point, name: &str) -> Result<(), GridError> {
        let pattern = self
            .patterns
            .get(name)
            .ok_or_else(|| GridError::UnknownPattern(name.to_string()))?
            .clone();
        let schedule = GateSchedule::new(pattern, self.turn_cycle)?;
        self.set_gate(p, schedule)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// In-bounds hex neighbors of `p`, in offset-table order.
    pub fn neighbors(&self, p: Point) -> impl Iterator<Item = Point> + '_ {
        hex::neighbors(p).into_iter().filter(|&n| self.contains(n))
    }

    /// Whether a move may end on `p` at absolute turn `turn`. Off-board
    /// positions are never passable.
    #[inline]
    pub fn is_passable_at(&self, p: Point, turn: u32) -> bool {
        self.cell(p).is_some_and(|c| c.is_passable_at(turn))
    }

    /// Whether stepping from `from` to `to`, arriving at absolute turn
    /// `turn`, is legal.
    pub fn is_valid_move(&self, from: Point, to: Point, turn: u32) -> bool {
        self.contains(from) && hex::are_adjacent(from, to) && self.is_passable_at(to, turn)
    }

    /// Iterate over every position and its cell, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &CellKind)> + '_ {
        self.bounds().iter().zip(self.cells.iter())
    }
}

/// Errors raised while building a [`HexGrid`] or a [`GateSchedule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The layout has no rows or an empty first row.
    EmptyLayout,
    /// The layout has more rows or columns than an `i32` can index.
    LayoutTooLarge,
    /// A layout row differs in width from the first one.
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A character with no cell meaning.
    InvalidGlyph { ch: char, pos: Point },
    /// `S` or `G` appears more than once.
    DuplicateEndpoint { ch: char, pos: Point },
    /// `S` or `G` does not appear.
    MissingEndpoint(char),
    /// A position outside the board.
    OutOfBounds(Point),
    /// A board side is not positive or the board has too many cells.
    BadSize { width: i32, height: i32 },
    /// Serialized cells do not match the board size.
    CellCount { expected: usize, found: usize },
    /// A gate pattern contains something other than `0` and `1`.
    InvalidPatternBit {
        ch: char,
        index: usize,
        pattern: String,
    },
    /// A gate cycle of zero turns.
    ZeroCycle,
    /// A named gate refers to a pattern that was never defined.
    UnknownPattern(String),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLayout => write!(f, "grid: empty layout"),
            Self::LayoutTooLarge => write!(f, "grid: layout too large"),
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "grid: row {row} has width {found}, expected {expected}"),
            Self::InvalidGlyph { ch, pos } => {
                write!(f, "grid: invalid cell \u{201c}{ch}\u{201d} at {pos}")
            }
            Self::DuplicateEndpoint { ch, pos } => {
                write!(f, "grid: second \u{201c}{ch}\u{201d} at {pos}")
            }
            Self::MissingEndpoint(ch) => write!(f, "grid: no \u{201c}{ch}\u{201d} in layout"),
            Self::OutOfBounds(p) => write!(f, "grid: position {p} is outside the board"),
            Self::BadSize { width, height } => {
                write!(f, "grid: cannot build a {width}x{height} board")
            }
            Self::CellCount { expected, found } => {
                write!(f, "grid: {found} cells for a board of {expected}")
            }
            Self::InvalidPatternBit { ch, index, pattern } => write!(
                f,
                "gate pattern \u{201c}{pattern}\u{201d}: invalid bit \u{201c}{ch}\u{201d} at {index}"
            ),
            Self::ZeroCycle => write!(f, "gate cycle length must be at least 1"),
            Self::UnknownPattern(name) => write!(f, "gate pattern \u{201c}{name}\u{201d} is not defined"),
        }
    }
}

impl std::error::Error for GridError {}
