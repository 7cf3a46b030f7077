//! Effort ceilings shared by both search strategies.

use std::fmt;
use std::time::{Duration, Instant};

/// Ceilings for one search strategy.
///
/// The time, iteration and node ceilings abort a search. The depth ceiling
/// only stops expansion: a node whose turn has reached `max_depth` is
/// settled but produces no successors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchLimits {
    /// Highest turn (relative to the origin) any node may reach.
    pub max_depth: u32,
    /// Most nodes a search may pop before giving up.
    pub max_iterations: usize,
    /// Wall-clock budget in milliseconds.
    pub max_time_ms: u64,
    /// Most nodes (pending plus explored) a search may hold.
    pub max_nodes: usize,
    /// Iterations between wall-clock checks.
    pub check_interval: usize,
}

impl SearchLimits {
    /// Limits for best-first search.
    pub const BEST_FIRST: Self = Self {
        max_depth: 100,
        max_iterations: 10_000,
        max_time_ms: 5_000,
        max_nodes: 10_000,
        check_interval: 100,
    };

    /// Limits for breadth-first search.
    pub const BREADTH_FIRST: Self = Self {
        max_depth: 50,
        max_iterations: 5_000,
        max_time_ms: 3_000,
        max_nodes: 5_000,
        check_interval: 100,
    };

    /// Wall-clock budget as a [`Duration`].
    #[inline]
    pub fn max_time(&self) -> Duration {
        Duration::from_millis(self.max_time_ms)
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::BEST_FIRST
    }
}

/// Some fields of a [`SearchLimits`], as read from a config file.
#[cfg(feature = "serde")]
#[derive(Clone, Copy, Debug, Default, serde::Deserialize)]
pub(crate) struct LimitsOverride {
    max_depth: Option<u32>,
    max_iterations: Option<usize>,
    max_time_ms: Option<u64>,
    max_nodes: Option<usize>,
    check_interval: Option<usize>,
}

#[cfg(feature = "serde")]
impl LimitsOverride {
    /// `base` with every present field replaced.
    pub(crate) fn apply(self, base: SearchLimits) -> SearchLimits {
        SearchLimits {
            max_depth: self.max_depth.unwrap_or(base.max_depth),
            max_iterations: self.max_iterations.unwrap_or(base.max_iterations),
            max_time_ms: self.max_time_ms.unwrap_or(base.max_time_ms),
            max_nodes: self.max_nodes.unwrap_or(base.max_nodes),
            check_interval: self.check_interval.unwrap_or(base.check_interval),
        }
    }
}

/// The ceiling that stopped a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bound {
    /// Wall-clock budget exhausted.
    Time { limit_ms: u64, elapsed_ms: u64 },
    /// Too many iterations.
    Iterations { limit: usize },
    /// Too many nodes held at once.
    Nodes { limit: usize, held: usize },
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Time {
                limit_ms,
                elapsed_ms,
            } => write!(f, "time limit of {limit_ms}ms exceeded after {elapsed_ms}ms"),
            Self::Iterations { limit } => write!(f, "iteration limit of {limit} exceeded"),
            Self::Nodes { limit, held } => write!(f, "node limit of {limit} exceeded ({held} held)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Guard
// ---------------------------------------------------------------------------

/// Per-call bookkeeping that turns runaway searches into clean failures.
pub(crate) struct BoundsGuard {
    limits: SearchLimits,
    started: Instant,
    iterations: usize,
}

impl BoundsGuard {
    pub(crate) fn start(limits: SearchLimits) -> Self {
        Self {
            limits,
            started: Instant::now(),
            iterations: 0,
        }
    }

    /// Count one iteration. Fails instead when the iteration ceiling has
    /// already been reached, and on every `check_interval`-th iteration if
    /// the clock has run out.
    pub(crate) fn tick(&mut self) -> Result<(), Bound> {
        if self.iterations >= self.limits.max_iterations {
            return Err(Bound::Iterations {
                limit: self.limits.max_iterations,
            });
        }
        self.iterations += 1;
        if self.is_checkpoint() {
            let elapsed = self.started.elapsed();
            if elapsed > self.limits.max_time() {
                return Err(Bound::Time {
                    limit_ms: self.limits.max_time_ms,
                    elapsed_ms: elapsed.as_millis() as u64,
                });
            }
        }
        Ok(())
    }

    /// Whether the current iteration is a periodic checkpoint.
    #[inline]
    pub(crate) fn is_checkpoint(&self) -> bool {
        let every = self.limits.check_interval.max(1);
        self.iterations % every == 0
    }

    /// Fail if more than `max_nodes` nodes are held.
    pub(crate) fn check_nodes(&self, held: usize) -> Result<(), Bound> {
        if held > self.limits.max_nodes {
            return Err(Bound::Nodes {
                limit: self.limits.max_nodes,
                held,
            });
        }
        Ok(())
    }

    /// Whether a node at relative turn `turn` may still be expanded.
    #[inline]
    pub(crate) fn can_expand(&self, turn: u32) -> bool {
        turn < self.limits.max_depth
    }

    #[inline]
    pub(crate) fn iterations(&self) -> usize {
        self.iterations
    }

    #[inline]
    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
