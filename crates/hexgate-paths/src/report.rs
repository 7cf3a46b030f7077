//! Search results and failure diagnostics.

use std::fmt;
use std::time::Duration;

use hexgate_core::Point;

use crate::bounds::Bound;
use crate::finder::Strategy;

/// Counters collected during one search call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Nodes popped from the frontier.
    pub iterations: usize,
    /// Settled (best-first) or visited (breadth-first) states.
    pub explored: usize,
    /// States still waiting in the frontier when the search ended.
    pub pending: usize,
    /// Nodes settled without expansion because they reached the depth cap.
    pub depth_pruned: usize,
    /// Highest relative turn among created nodes.
    pub deepest_turn: u32,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

/// Why a search returned no path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchFailure {
    /// Start or goal lies off the board; nothing was searched.
    InvalidEndpoints { start: Point, goal: Point },
    /// The frontier emptied without reaching the goal.
    Exhausted,
    /// A ceiling stopped the search before it resolved.
    BoundsExceeded(Bound),
}

impl SearchFailure {
    /// Whether the failure came from an effort ceiling rather than from the
    /// board itself.
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::BoundsExceeded(_))
    }
}

impl fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEndpoints { start, goal } => {
                write!(f, "invalid endpoints: start {start}, goal {goal}")
            }
            Self::Exhausted => write!(f, "no path: search space exhausted"),
            Self::BoundsExceeded(bound) => write!(f, "no path: {bound}"),
        }
    }
}

impl std::error::Error for SearchFailure {}

/// Outcome of one search call.
///
/// `path` is empty exactly when `failure` is set. The path holds plain
/// positions, start first and goal last.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchReport {
    pub strategy: Strategy,
    pub path: Vec<Point>,
    pub stats: SearchStats,
    pub failure: Option<SearchFailure>,
}

impl SearchReport {
    pub(crate) fn found(strategy: Strategy, path: Vec<Point>, stats: SearchStats) -> Self {
        Self {
            strategy,
            path,
            stats,
            failure: None,
        }
    }

    pub(crate) fn failed(strategy: Strategy, failure: SearchFailure, stats: SearchStats) -> Self {
        Self {
            strategy,
            path: Vec::new(),
            stats,
            failure: Some(failure),
        }
    }

    /// Whether a path was found.
    #[inline]
    pub fn is_found(&self) -> bool {
        self.failure.is_none()
    }

    /// Number of moves in the path (one less than its length).
    pub fn moves(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Human-readable summary with the diagnostic counters.
    pub fn reason(&self) -> String {
        let s = &self.stats;
        let head = match &self.failure {
            None => format!("{}: path of {} moves", self.strategy, self.moves()),
            Some(failure) => format!("{}: {failure}", self.strategy),
        };
        format!(
            "{head} ({} iterations, {} explored, {} pending, {} depth-pruned, {}ms)",
            s.iterations,
            s.explored,
            s.pending,
            s.depth_pruned,
            s.elapsed.as_millis()
        )
    }

    /// Convert into the path, or the failure.
    pub fn into_result(self) -> Result<Vec<Point>, SearchFailure> {
        match self.failure {
            None => Ok(self.path),
            Some(failure) => Err(failure),
        }
    }
}
