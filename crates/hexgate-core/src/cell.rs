//! Cell kinds and their turn-dependent passability.

use std::fmt;

use crate::grid::GridError;

/// Open/closed schedule of a gate, repeating every `cycle_len` turns.
///
/// Turns whose position in the cycle lies past the end of `pattern` count as
/// open.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGateSchedule"))]
pub struct GateSchedule {
    pattern: Vec<bool>,
    cycle_len: u32,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGateSchedule {
    pattern: Vec<bool>,
    cycle_len: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGateSchedule> for GateSchedule {
    type Error = GridError;

    fn try_from(raw: RawGateSchedule) -> Result<Self, GridError> {
        Self::new(raw.pattern, raw.cycle_len)
    }
}

impl GateSchedule {
    /// Create a schedule from an explicit pattern and cycle length.
    pub fn new(pattern: Vec<bool>, cycle_len: u32) -> Result<Self, GridError> {
        if cycle_len == 0 {
            return Err(GridError::ZeroCycle);
        }
        Ok(Self { pattern, cycle_len })
    }

    /// Parse a bit string such as `"0011"` (`1` = open). The cycle length is
    /// the length of the string.
    pub fn parse(bits: &str) -> Result<Self, GridError> {
        let pattern = parse_bits(bits)?;
        let cycle_len = pattern.len() as u32;
        Self::new(pattern, cycle_len)
    }

    /// Parse a bit string and repeat it on a cycle of `cycle_len` turns.
    pub fn parse_with_cycle(bits: &str, cycle_len: u32) -> Result<Self, GridError> {
        Self::new(parse_bits(bits)?, cycle_len)
    }

    /// The raw pattern.
    pub fn pattern(&self) -> &[bool] {
        &self.pattern
    }

    /// Number of turns after which the schedule repeats.
    pub fn cycle_len(&self) -> u32 {
        self.cycle_len
    }

    /// Whether the gate is open at absolute turn `turn`.
    #[inline]
    pub fn is_open_at(&self, turn: u32) -> bool {
        let slot = (turn % self.cycle_len) as usize;
        self.pattern.get(slot).copied().unwrap_or(true)
    }
}

impl fmt::Display for GateSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &open in &self.pattern {
            f.write_str(if open { "1" } else { "0" })?;
        }
        write!(f, "/{}", self.cycle_len)
    }
}

pub(crate) fn parse_bits(bits: &str) -> Result<Vec<bool>, GridError> {
    bits.chars()
        .enumerate()
        .map(|(i, ch)| match ch {
            '1' => Ok(true),
            '0' => Ok(false),
            _ => Err(GridError::InvalidPatternBit {
                ch,
                index: i,
                pattern: bits.to_string(),
            }),
        })
        .collect()
}

/// What occupies a grid cell.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    #[default]
    Free,
    Wall,
    Start,
    Goal,
    Item,
    /// Passable on the turns its schedule marks open.
    Gate(GateSchedule),
    /// Impassable until `opens_at`, passable from then on.
    TemporalWall { opens_at: u32 },
}

impl CellKind {
    /// Whether a move may end on this cell at absolute turn `turn`.
    #[inline]
    pub fn is_passable_at(&self, turn: u32) -> bool {
        match self {
            Self::Free | Self::Start | Self::Goal | Self::Item => true,
            Self::Wall => false,
            Self::Gate(schedule) => schedule.is_open_at(turn),
            Self::TemporalWall { opens_at } => turn >= *opens_at,
        }
    }

    /// Whether passability never changes with the turn.
    pub fn is_static(&self) -> bool {
        !matches!(self, Self::Gate(_) | Self::TemporalWall { .. })
    }

    /// Single-character form used by text layouts.
    pub fn glyph(&self) -> char {
        match self {
            Self::Free => '.',
            Self::Wall => '#',
            Self::Start => 'S',
            Self::Goal => 'G',
            Self::Item => '*',
            Self::Gate(_) => '|',
            Self::TemporalWall { .. } => 'T',
        }
    }
}
