use std::collections::BinaryHeap;

use hexgate_core::Point;

use crate::bounds::BoundsGuard;
use crate::distance::manhattan;
use crate::finder::{PathFinder, Strategy};
use crate::node::{NodeArena, OpenEntry, SearchNode};
use crate::report::{SearchFailure, SearchReport, SearchStats};
use crate::traits::TimedPather;

impl<P: TimedPather> PathFinder<'_, P> {
    /// Heuristic best-first search over `(position, turn)` states.
    ///
    /// Nodes are ordered by `f = g + h` where `g` is the turn count and `h`
    /// the Manhattan distance to the goal on offset coordinates. The
    /// estimate can overshoot the true hex distance, so the result is not
    /// guaranteed to be the fewest-turns path; use
    /// [`breadth_first`](Self::breadth_first) when that matters.
    ///
    /// The goal test happens when a node is popped, before the depth cap is
    /// consulted, so a goal reached exactly at the cap is still returned.
    pub fn best_first(&self, start: Point, goal: Point, origin: u32) -> SearchReport {
        const STRATEGY: Strategy = Strategy::BestFirst;
        if let Err(failure) = self.check_endpoints(start, goal) {
            return SearchReport::failed(STRATEGY, failure, SearchStats::default());
        }
        log::debug!("{STRATEGY}: {start} -> {goal} from turn {origin}");

        let mut guard = BoundsGuard::start(self.config.best_first);
        let mut stats = SearchStats::default();
        let mut arena = NodeArena::new();
        let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
        // Heap entries that still refer to an unsettled node.
        let mut open_len = 0usize;
        let mut settled = 0usize;

        let h0 = manhattan(start, goal);
        let root = arena.alloc(SearchNode {
            pos: start,
            turn: 0,
            g: 0,
            h: h0,
            parent: None,
            settled: false,
        });
        open.push(OpenEntry { id: root, f: h0, h: h0 });
        open_len += 1;

        let bounds = self.pather.bounds();
        let mut nbuf = Vec::with_capacity(6);

        let outcome: Result<usize, SearchFailure> = 'search: loop {
            if open_len == 0 {
                break 'search Err(SearchFailure::Exhausted);
            }
            if let Err(bound) = guard.tick() {
                break 'search Err(SearchFailure::BoundsExceeded(bound));
            }
            if guard.is_checkpoint() {
                log::trace!(
                    "{STRATEGY}: {} iterations, {open_len} open, {settled} settled",
                    guard.iterations()
                );
            }

            // Skip entries superseded by a later reparenting.
            let current = loop {
                match open.pop() {
                    Some(e) if arena.get(e.id).settled => continue,
                    Some(e) if arena.get(e.id).f() != e.f => continue,
                    Some(e) => break Some(e.id),
                    None => break None,
                }
            };
            let Some(ci) = current else {
                break 'search Err(SearchFailure::Exhausted);
            };

            arena.get_mut(ci).settled = true;
            open_len -= 1;
            settled += 1;

            let (cp, turn, g) = {
                let n = arena.get(ci);
                (n.pos, n.turn, n.g)
            };
            if cp == goal {
                break 'search Ok(ci);
            }
            if !guard.can_expand(turn) {
                stats.depth_pruned += 1;
                continue;
            }

            let next_turn = turn + 1;
            let arrival = origin.saturating_add(next_turn);
            nbuf.clear();
            self.pather.neighbors(cp, &mut nbuf);

            for &np in nbuf.iter() {
                if !bounds.contains(np) || !self.pather.passable_at(np, arrival) {
                    continue;
                }
                let tentative_g = g + 1;
                match arena.lookup(np, next_turn) {
                    Some(ni) => {
                        let n = arena.get_mut(ni);
                        if n.settled || tentative_g >= n.g {
                            continue;
                        }
                        n.g = tentative_g;
                        n.parent = Some(ci);
                        open.push(OpenEntry {
                            id: ni,
                            f: n.f(),
                            h: n.h,
                        });
                    }
                    None => {
                        let h = manhattan(np, goal);
                        let ni = arena.alloc(SearchNode {
                            pos: np,
                            turn: next_turn,
                            g: tentative_g,
                            h,
                            parent: Some(ci),
                            settled: false,
                        });
                        open.push(OpenEntry {
                            id: ni,
                            f: tentative_g + h,
                            h,
                        });
                        open_len += 1;
                        stats.deepest_turn = stats.deepest_turn.max(next_turn);
                    }
                }
            }

            if let Err(bound) = guard.check_nodes(arena.len()) {
                break 'search Err(SearchFailure::BoundsExceeded(bound));
            }
        };

        stats.iterations = guard.iterations();
        stats.explored = settled;
        stats.pending = open_len;
        stats.elapsed = guard.elapsed();

        match outcome {
            Ok(end) => {
                let path = arena.reconstruct(end);
                log::debug!(
                    "{STRATEGY}: found {} moves after {} iterations",
                    path.len() - 1,
                    stats.iterations
                );
                SearchReport::found(STRATEGY, path, stats)
            }
            Err(failure) => {
                if failure.is_bound() {
                    log::warn!("{STRATEGY}: {start} -> {goal} aborted: {failure}");
                } else {
                    log::debug!("{STRATEGY}: {start} -> {goal}: {failure}");
                }
                SearchReport::failed(STRATEGY, failure, stats)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use hexgate_core::{CellKind, HexGrid, Point};

    use crate::{PathFinder, SearchFailure};

    #[test]
    fn straight_line_follows_heuristic() {
        let grid = HexGrid::new(6, 1).unwrap();
        let report = PathFinder::new(&grid).best_first(Point::new(0, 0), Point::new(5, 0), 0);
        assert_eq!(report.moves(), 5);
        // Nothing but the path itself gets settled on an open line.
        assert_eq!(report.stats.explored, 6);
        assert_eq!(report.stats.depth_pruned, 0);
        assert_eq!(report.stats.deepest_turn, 5);
    }

    #[test]
    fn dead_end_runs_to_depth_cap() {
        let mut grid = HexGrid::new(4, 1).unwrap();
        grid.set(Point::new(2, 0), CellKind::Wall).unwrap();
        let report = PathFinder::new(&grid).best_first(Point::new(0, 0), Point::new(3, 0), 0);
        assert_eq!(report.failure, Some(SearchFailure::Exhausted));
        // Two cells alternate parity: one state per turn up to the cap.
        assert_eq!(report.stats.explored, 101);
        assert_eq!(report.stats.depth_pruned, 1);
        assert_eq!(report.stats.deepest_turn, 100);
    }
}
