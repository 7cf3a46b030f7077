use std::fmt;
use std::str::FromStr;

use hexgate_core::{HexGrid, Point};

#[cfg(feature = "serde")]
use crate::bounds::LimitsOverride;
use crate::bounds::SearchLimits;
use crate::report::{SearchFailure, SearchReport};
use crate::traits::TimedPather;

/// Which search to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// Heuristic-guided, fast, not guaranteed shortest.
    #[default]
    BestFirst,
    /// Uniform-cost, turn-optimal when it completes.
    BreadthFirst,
    /// Best-first, then one breadth-first attempt if it finds nothing.
    BestFirstWithFallback,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BestFirst => "best-first",
            Self::BreadthFirst => "breadth-first",
            Self::BestFirstWithFallback => "best-first+fallback",
        })
    }
}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "best-first" | "astar" | "a*" => Ok(Self::BestFirst),
            "breadth-first" | "bfs" => Ok(Self::BreadthFirst),
            "fallback" | "best-first+fallback" => Ok(Self::BestFirstWithFallback),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

/// Unrecognised strategy name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseStrategyError(pub String);

impl fmt::Display for ParseStrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown strategy \u{201c}{}\u{201d} (expected best-first, breadth-first or fallback)",
            self.0
        )
    }
}

impl std::error::Error for ParseStrategyError {}

/// Ceilings for each strategy. The two sets are independent.
///
/// When deserialized, each strategy's missing fields are taken from that
/// strategy's own constant ([`SearchLimits::BEST_FIRST`] or
/// [`SearchLimits::BREADTH_FIRST`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RawSearchConfig"))]
pub struct SearchConfig {
    pub best_first: SearchLimits,
    pub breadth_first: SearchLimits,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawSearchConfig {
    #[serde(default)]
    best_first: LimitsOverride,
    #[serde(default)]
    breadth_first: LimitsOverride,
}

#[cfg(feature = "serde")]
impl From<RawSearchConfig> for SearchConfig {
    fn from(raw: RawSearchConfig) -> Self {
        Self {
            best_first: raw.best_first.apply(SearchLimits::BEST_FIRST),
            breadth_first: raw.breadth_first.apply(SearchLimits::BREADTH_FIRST),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            best_first: SearchLimits::BEST_FIRST,
            breadth_first: SearchLimits::BREADTH_FIRST,
        }
    }
}

// ---------------------------------------------------------------------------
// PathFinder
// ---------------------------------------------------------------------------

/// Runs bounded searches over a board borrowed for the finder's lifetime.
///
/// Every search call allocates its own node storage and frees it before
/// returning; nothing is cached between calls, so a finder can be reused
/// freely and results depend only on the arguments.
pub struct PathFinder<'a, P> {
    pub(crate) pather: &'a P,
    pub(crate) config: SearchConfig,
}

impl<'a, P: TimedPather> PathFinder<'a, P> {
    /// Create a finder with the default limits.
    pub fn new(pather: &'a P) -> Self {
        Self::with_config(pather, SearchConfig::default())
    }

    /// Create a finder with explicit limits.
    pub fn with_config(pather: &'a P, config: SearchConfig) -> Self {
        Self { pather, config }
    }

    /// The limits in use.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search from `start` to `goal` with the given strategy.
    ///
    /// `origin` is the game turn at the moment of the call; relative turn
    /// `t` of the search is evaluated against the board at `origin + t`.
    pub fn find(&self, strategy: Strategy, start: Point, goal: Point, origin: u32) -> SearchReport {
        match strategy {
            Strategy::BestFirst => self.best_first(start, goal, origin),
            Strategy::BreadthFirst => self.breadth_first(start, goal, origin),
            Strategy::BestFirstWithFallback => {
                let report = self.best_first(start, goal, origin);
                match report.failure {
                    None | Some(SearchFailure::InvalidEndpoints { .. }) => report,
                    Some(failure) => {
                        log::debug!("best-first gave up ({failure}); trying breadth-first");
                        self.breadth_first(start, goal, origin)
                    }
                }
            }
        }
    }

    pub(crate) fn check_endpoints(&self, start: Point, goal: Point) -> Result<(), SearchFailure> {
        let bounds = self.pather.bounds();
        if bounds.contains(start) && bounds.contains(goal) {
            Ok(())
        } else {
            Err(SearchFailure::InvalidEndpoints { start, goal })
        }
    }
}

/// Solve a [`HexGrid`] from its own start to its own goal.
pub fn solve(grid: &HexGrid, strategy: Strategy, origin: u32) -> SearchReport {
    PathFinder::new(grid).find(strategy, grid.start(), grid.goal(), origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::hex_distance;
    use crate::report::SearchStats;
    use crate::verify::verify_path;
    use crate::Bound;
    use hexgate_core::{CellKind, GateSchedule};
    use rand::rngs::SmallRng;
    use rand::{RngExt, SeedableRng};

    const BOTH: [Strategy; 2] = [Strategy::BestFirst, Strategy::BreadthFirst];

    /// A one-row board: every cell touches only its left and right cells.
    fn line(len: i32) -> HexGrid {
        HexGrid::new(len, 1).unwrap()
    }

    fn check(grid: &HexGrid, report: &SearchReport, origin: u32) {
        assert!(report.is_found(), "{}", report.reason());
        verify_path(grid, &report.path, grid.start(), grid.goal(), origin)
            .unwrap_or_else(|e| panic!("{}: {e}", report.strategy));
    }

    /// Relative turn at which the path first enters `p`.
    fn arrival(report: &SearchReport, p: Point) -> u32 {
        report.path.iter().position(|&q| q == p).expect("cell not on path") as u32
    }

    // -----------------------------------------------------------------------
    // Scenarios
    // -----------------------------------------------------------------------

    #[test]
    fn open_board_path_matches_hex_distance() {
        let grid = HexGrid::new(3, 3).unwrap();
        for strategy in BOTH {
            let report = solve(&grid, strategy, 0);
            check(&grid, &report, 0);
            assert_eq!(report.path.first(), Some(&Point::new(0, 0)));
            assert_eq!(report.path.last(), Some(&Point::new(2, 2)));
            assert_eq!(
                report.moves() as i32,
                hex_distance(Point::new(0, 0), Point::new(2, 2))
            );
        }
    }

    #[test]
    fn always_closed_gate_exhausts() {
        let mut grid = line(5);
        grid.set_gate(Point::new(2, 0), GateSchedule::parse("0000").unwrap())
            .unwrap();
        for strategy in BOTH {
            let report = solve(&grid, strategy, 0);
            assert!(report.path.is_empty());
            assert_eq!(report.failure, Some(SearchFailure::Exhausted), "{strategy}");
            assert!(report.stats.depth_pruned > 0);
        }
    }

    #[test]
    fn gate_crossing_waits_for_open_slot() {
        let mut grid = line(5);
        let gate = Point::new(2, 0);
        let schedule = GateSchedule::parse("0011").unwrap();
        grid.set_gate(gate, schedule.clone()).unwrap();
        // At origin 2 the first possible arrival (relative turn 2, absolute
        // 4) hits a closed slot, so the walker has to pace first.
        let origin = 2;
        for strategy in BOTH {
            let report = solve(&grid, strategy, origin);
            check(&grid, &report, origin);
            let t = arrival(&report, gate);
            assert!(t > 2, "{strategy} crossed at {t}");
            assert!(schedule.is_open_at(origin + t));
        }
        let bfs = solve(&grid, Strategy::BreadthFirst, origin);
        assert_eq!(bfs.moves(), 6);
    }

    #[test]
    fn turn_origin_shifts_gate_schedule() {
        let mut grid = line(5);
        grid.set_gate(Point::new(2, 0), GateSchedule::parse("0011").unwrap())
            .unwrap();
        assert_eq!(solve(&grid, Strategy::BreadthFirst, 0).moves(), 4);
        assert_eq!(solve(&grid, Strategy::BreadthFirst, 2).moves(), 6);
    }

    #[test]
    fn temporal_wall_crossed_after_it_opens() {
        let mut grid = line(5);
        let wall = Point::new(2, 0);
        grid.set_temporal_wall(wall, 5).unwrap();
        for strategy in BOTH {
            let report = solve(&grid, strategy, 0);
            check(&grid, &report, 0);
            assert!(arrival(&report, wall) >= 5, "{strategy}");
        }
        assert_eq!(solve(&grid, Strategy::BreadthFirst, 0).moves(), 8);
        // Three turns already played: the wall opens in time for a direct walk.
        assert_eq!(solve(&grid, Strategy::BreadthFirst, 3).moves(), 4);
    }

    #[test]
    fn enclosed_goal_exhausts_without_bound() {
        let mut grid = HexGrid::new(5, 5).unwrap();
        let goal = Point::new(2, 2);
        grid.set_goal(goal).unwrap();
        let ring: Vec<Point> = grid.neighbors(goal).collect();
        assert_eq!(ring.len(), 6);
        for p in ring {
            grid.set(p, CellKind::Wall).unwrap();
        }
        for strategy in BOTH {
            let report = solve(&grid, strategy, 0);
            assert!(report.path.is_empty());
            let failure = report.failure.expect("goal is walled in");
            assert_eq!(failure, SearchFailure::Exhausted, "{}", report.reason());
            assert!(!failure.is_bound());
            assert_eq!(report.stats.pending, 0);
        }
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    #[test]
    fn walls_only_corridor_lengths_agree() {
        let grid = HexGrid::from_layout(
            "
            S###G
            .###.
            .###.
            .###.
            .....
            ",
        )
        .unwrap();
        let best = solve(&grid, Strategy::BestFirst, 0);
        let bfs = solve(&grid, Strategy::BreadthFirst, 0);
        check(&grid, &best, 0);
        check(&grid, &bfs, 0);
        assert_eq!(best.moves(), 12);
        assert_eq!(bfs.moves(), best.moves());
    }

    #[test]
    fn random_wall_boards() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        for _ in 0..40 {
            let mut grid = HexGrid::new(6, 6).unwrap();
            for p in grid.bounds() {
                if p != grid.start() && p != grid.goal() && rng.random_range(0..100) < 30 {
                    grid.set(p, CellKind::Wall).unwrap();
                }
            }
            let best = solve(&grid, Strategy::BestFirst, 0);
            let bfs = solve(&grid, Strategy::BreadthFirst, 0);
            // Both searches cover every state of a board this small.
            assert_eq!(best.is_found(), bfs.is_found());
            if bfs.is_found() {
                check(&grid, &best, 0);
                check(&grid, &bfs, 0);
                assert!(bfs.moves() <= best.moves());
                assert!(bfs.moves() as i32 >= hex_distance(grid.start(), grid.goal()));
            } else {
                assert_eq!(best.failure, Some(SearchFailure::Exhausted));
                assert_eq!(bfs.failure, Some(SearchFailure::Exhausted));
            }
        }
    }

    #[test]
    fn repeated_calls_are_identical() {
        let mut grid = HexGrid::new(7, 5).unwrap();
        grid.set_gate(Point::new(3, 2), GateSchedule::parse("0110").unwrap())
            .unwrap();
        grid.set_temporal_wall(Point::new(3, 1), 4).unwrap();
        grid.set(Point::new(3, 3), CellKind::Wall).unwrap();
        for strategy in BOTH {
            let a = solve(&grid, strategy, 1);
            let b = solve(&grid, strategy, 1);
            check(&grid, &a, 1);
            assert_eq!(a.path, b.path);
        }
    }

    // -----------------------------------------------------------------------
    // Bounds and failures
    // -----------------------------------------------------------------------

    #[test]
    fn off_board_endpoints_rejected_before_search() {
        let grid = HexGrid::new(3, 3).unwrap();
        let finder = PathFinder::new(&grid);
        for strategy in [Strategy::BestFirst, Strategy::BreadthFirst, Strategy::BestFirstWithFallback] {
            let report = finder.find(strategy, Point::new(-1, 0), Point::new(2, 2), 0);
            assert_eq!(
                report.failure,
                Some(SearchFailure::InvalidEndpoints {
                    start: Point::new(-1, 0),
                    goal: Point::new(2, 2)
                })
            );
            assert_eq!(report.stats, SearchStats::default());
        }
    }

    #[test]
    fn start_on_goal_is_single_cell_path() {
        let grid = HexGrid::new(3, 3).unwrap();
        let finder = PathFinder::new(&grid);
        for strategy in BOTH {
            let report = finder.find(strategy, Point::new(1, 1), Point::new(1, 1), 0);
            assert_eq!(report.path, vec![Point::new(1, 1)]);
        }
    }

    #[test]
    fn iteration_ceiling_aborts_with_counters() {
        let grid = HexGrid::new(10, 10).unwrap();
        let mut config = SearchConfig::default();
        config.breadth_first.max_iterations = 10;
        let report = PathFinder::with_config(&grid, config).find(
            Strategy::BreadthFirst,
            grid.start(),
            grid.goal(),
            0,
        );
        assert!(report.path.is_empty());
        assert_eq!(
            report.failure,
            Some(SearchFailure::BoundsExceeded(Bound::Iterations { limit: 10 }))
        );
        assert_eq!(report.stats.iterations, 10);
        assert!(report.stats.pending > 0);
    }

    #[test]
    fn time_ceiling_aborts_both_strategies() {
        let grid = HexGrid::new(30, 30).unwrap();
        let expired = SearchLimits {
            max_time_ms: 0,
            check_interval: 1,
            ..SearchLimits::BEST_FIRST
        };
        let config = SearchConfig {
            best_first: expired,
            breadth_first: expired,
        };
        let finder = PathFinder::with_config(&grid, config);
        for strategy in BOTH {
            let report = finder.find(strategy, grid.start(), grid.goal(), 0);
            assert!(report.path.is_empty());
            assert!(
                matches!(
                    report.failure,
                    Some(SearchFailure::BoundsExceeded(Bound::Time { limit_ms: 0, .. }))
                ),
                "{}",
                report.reason()
            );
        }
    }

    #[test]
    fn node_ceiling_aborts() {
        let grid = HexGrid::new(10, 10).unwrap();
        let mut config = SearchConfig::default();
        config.best_first.max_nodes = 5;
        let report = PathFinder::with_config(&grid, config).find(
            Strategy::BestFirst,
            grid.start(),
            grid.goal(),
            0,
        );
        assert!(matches!(
            report.failure,
            Some(SearchFailure::BoundsExceeded(Bound::Nodes { limit: 5, .. }))
        ));
        assert!(report.stats.explored + report.stats.pending > 5);
    }

    #[test]
    fn depth_cap_limits_breadth_first_only() {
        let grid = line(60);
        let bfs = solve(&grid, Strategy::BreadthFirst, 0);
        assert_eq!(bfs.failure, Some(SearchFailure::Exhausted));
        assert!(bfs.stats.depth_pruned > 0);
        assert!(bfs.stats.deepest_turn <= SearchLimits::BREADTH_FIRST.max_depth);

        let best = solve(&grid, Strategy::BestFirst, 0);
        check(&grid, &best, 0);
        assert_eq!(best.moves(), 59);
        assert!(best.stats.deepest_turn <= SearchLimits::BEST_FIRST.max_depth);
    }

    #[test]
    fn fallback_runs_breadth_first_after_failure() {
        let grid = HexGrid::new(3, 3).unwrap();
        let mut config = SearchConfig::default();
        config.best_first.max_iterations = 3;
        let finder = PathFinder::with_config(&grid, config);

        let alone = finder.find(Strategy::BestFirst, grid.start(), grid.goal(), 0);
        assert!(alone.failure.is_some_and(|f| f.is_bound()));

        let report = finder.find(Strategy::BestFirstWithFallback, grid.start(), grid.goal(), 0);
        assert_eq!(report.strategy, Strategy::BreadthFirst);
        check(&grid, &report, 0);
        assert_eq!(report.moves(), 3);
    }

    #[test]
    fn fallback_keeps_best_first_success() {
        let grid = line(8);
        let report = solve(&grid, Strategy::BestFirstWithFallback, 0);
        assert_eq!(report.strategy, Strategy::BestFirst);
        assert_eq!(report.moves(), 7);
    }

    #[test]
    fn strategy_names_parse() {
        assert_eq!("bfs".parse::<Strategy>(), Ok(Strategy::BreadthFirst));
        assert_eq!("Best-First".parse::<Strategy>(), Ok(Strategy::BestFirst));
        assert_eq!(
            "fallback".parse::<Strategy>(),
            Ok(Strategy::BestFirstWithFallback)
        );
        assert!("dfs".parse::<Strategy>().is_err());
        for s in [Strategy::BestFirst, Strategy::BreadthFirst, Strategy::BestFirstWithFallback] {
            assert_eq!(s.to_string().parse::<Strategy>(), Ok(s));
        }
    }
}
