use std::collections::VecDeque;

use hexgate_core::Point;

use crate::bounds::BoundsGuard;
use crate::finder::{PathFinder, Strategy};
use crate::node::{NodeArena, NodeId, SearchNode};
use crate::report::{SearchFailure, SearchReport, SearchStats};
use crate::traits::TimedPather;

impl<P: TimedPather> PathFinder<'_, P> {
    /// Uniform-cost search over `(position, turn)` states.
    ///
    /// Every move costs one turn, so a FIFO queue visits states in turn
    /// order and the first goal state dequeued uses the fewest turns
    /// possible within the depth cap.
    pub fn breadth_first(&self, start: Point, goal: Point, origin: u32) -> SearchReport {
        const STRATEGY: Strategy = Strategy::BreadthFirst;
        if let Err(failure) = self.check_endpoints(start, goal) {
            return SearchReport::failed(STRATEGY, failure, SearchStats::default());
        }
        log::debug!("{STRATEGY}: {start} -> {goal} from turn {origin}");

        let mut guard = BoundsGuard::start(self.config.breadth_first);
        let mut stats = SearchStats::default();
        let mut arena = NodeArena::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();

        queue.push_back(arena.alloc(SearchNode {
            pos: start,
            turn: 0,
            g: 0,
            h: 0,
            parent: None,
            settled: false,
        }));

        let bounds = self.pather.bounds();
        let mut nbuf = Vec::with_capacity(6);

        let outcome: Result<NodeId, SearchFailure> = 'search: loop {
            if queue.is_empty() {
                break 'search Err(SearchFailure::Exhausted);
            }
            if let Err(bound) = guard.tick() {
                break 'search Err(SearchFailure::BoundsExceeded(bound));
            }
            if guard.is_checkpoint() {
                log::trace!(
                    "{STRATEGY}: {} iterations, {} queued, {} visited",
                    guard.iterations(),
                    queue.len(),
                    arena.len()
                );
            }
            let Some(ci) = queue.pop_front() else {
                break 'search Err(SearchFailure::Exhausted);
            };

            let (cp, turn) = {
                let n = arena.get_mut(ci);
                n.settled = true;
                (n.pos, n.turn)
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
                if !bounds.contains(np) || arena.lookup(np, next_turn).is_some() {
                    continue;
                }
                if !self.pather.passable_at(np, arrival) {
                    continue;
                }
                queue.push_back(arena.alloc(SearchNode {
                    pos: np,
                    turn: next_turn,
                    g: next_turn as i32,
                    h: 0,
                    parent: Some(ci),
                    settled: false,
                }));
                stats.deepest_turn = next_turn;
            }

            if let Err(bound) = guard.check_nodes(arena.len()) {
                break 'search Err(SearchFailure::BoundsExceeded(bound));
            }
        };

        stats.iterations = guard.iterations();
        stats.explored = arena.len();
        stats.pending = queue.len();
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
