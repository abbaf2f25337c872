//! PT_Most: worker-seeded routing with incumbent keeping.
//!
//! # Algorithm
//!
//! Runs at most `W + 1` rounds. Each round starts from the locked routes,
//! then repeatedly picks a random unlocked worker with spare capacity and
//! a reachable task, assigns its nearest task and extends the route. The
//! completion fill closes the pass. A complete pass cheaper than the
//! incumbent replaces it. The longest unlocked route of the pass is then
//! locked and the rest discarded; the search ends when there is nothing
//! left to lock.

use rand::seq::IndexedRandom;
use rand::RngCore;
use tracing::debug;

use super::greedy::GreedyState;
use super::{AssignMap, AssignmentAlgorithm, AssignmentProblem};
use crate::interrupt::CancelToken;

#[derive(Debug, Clone, Copy, Default)]
pub struct PtMost;

impl PtMost {
    fn pass(
        problem: &AssignmentProblem,
        locked_routes: &AssignMap,
        locked: &[bool],
        rng: &mut dyn RngCore,
        cancel: &CancelToken,
    ) -> Option<AssignMap> {
        let mut state = GreedyState::with_routes(problem, locked_routes);
        loop {
            if cancel.is_cancelled() {
                return None;
            }
            if state.all_filled() {
                break;
            }
            let candidates: Vec<usize> = (0..problem.worker_count())
                .filter(|&w| !locked[w] && state.has_reachable_task(w))
                .collect();
            let Some(&w) = candidates.choose(rng) else {
                break;
            };
            let Some(t) = state.nearest_task(w) else {
                break;
            };
            state.assign(w, t);
            state.extend_route(w, cancel);
        }
        state.complete(cancel);
        state.report("PTMost");
        Some(state.into_map())
    }
}

impl AssignmentAlgorithm for PtMost {
    fn name(&self) -> &'static str {
        "PTMost"
    }

    fn solve(
        &self,
        problem: &AssignmentProblem,
        rng: &mut dyn RngCore,
        cancel: &CancelToken,
    ) -> AssignMap {
        let workers = problem.worker_count();
        let mut locked = vec![false; workers];
        let mut locked_routes = AssignMap::new(workers);
        let mut best: Option<(AssignMap, f64)> = None;
        let mut last = AssignMap::new(workers);

        for round in 0..=workers {
            let Some(map) = Self::pass(problem, &locked_routes, &locked, rng, cancel) else {
                debug!(round, "cancelled, returning partial map");
                break;
            };

            if map.is_complete(problem) {
                let cost = map.total_cost(problem);
                if best.as_ref().map_or(true, |(_, b)| cost < *b) {
                    debug!(round, cost, "new incumbent");
                    best = Some((map.clone(), cost));
                }
            }

            // longest unlocked route, lowest index on ties
            let longest = (0..workers)
                .filter(|&w| !locked[w] && !map.route(w).is_empty())
                .min_by_key(|&w| (std::cmp::Reverse(map.load(w)), w));
            let Some(keep) = longest else {
                last = map;
                break;
            };
            locked[keep] = true;
            for w in (0..workers).filter(|&w| locked[w]) {
                locked_routes.set_route(w, map.route(w).to_vec());
            }
            last = map;
        }

        best.map(|(map, _)| map).unwrap_or(last)
    }

    fn description(&self) -> &'static str {
        "Worker-seeded routing with incumbent keeping"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn line_problem(workers: usize, tasks: usize, p: usize, q: usize) -> AssignmentProblem {
        // workers and tasks on a line; squared distances
        let d = (0..workers)
            .map(|w| {
                (0..tasks)
                    .map(|t| {
                        let dx = w as f64 * 2.0 - t as f64;
                        dx * dx
                    })
                    .collect()
            })
            .collect();
        let c = (0..tasks)
            .map(|a| {
                (0..tasks)
                    .map(|b| {
                        let dx = a as f64 - b as f64;
                        dx * dx
                    })
                    .collect()
            })
            .collect();
        AssignmentProblem::uniform(d, c, p, q).unwrap()
    }

    #[test]
    fn test_complete_map() {
        let problem = line_problem(4, 6, 1, 2);
        let mut rng = SmallRng::seed_from_u64(42);
        let map = PtMost.solve(&problem, &mut rng, &CancelToken::new());
        assert!(map.is_complete(&problem));
    }

    #[test]
    fn test_multiple_workers_per_task() {
        let problem = line_problem(5, 4, 2, 2);
        let mut rng = SmallRng::seed_from_u64(42);
        let map = PtMost.solve(&problem, &mut rng, &CancelToken::new());
        assert!(map.is_complete(&problem));
        for t in 0..4 {
            assert_eq!(map.assigned_count(t), 2);
        }
    }

    #[test]
    fn test_no_worse_than_first_pass() {
        let problem = line_problem(3, 5, 1, 2);
        let mut rng = SmallRng::seed_from_u64(42);
        let workers = problem.worker_count();
        let first = PtMost::pass(
            &problem,
            &AssignMap::new(workers),
            &vec![false; workers],
            &mut rng,
            &CancelToken::new(),
        )
        .unwrap();
        assert!(first.is_complete(&problem));

        let mut rng = SmallRng::seed_from_u64(42);
        let best = PtMost.solve(&problem, &mut rng, &CancelToken::new());
        assert!(best.total_cost(&problem) <= first.total_cost(&problem) + 1e-9);
    }

    #[test]
    fn test_cancelled_before_start() {
        let problem = line_problem(2, 2, 1, 1);
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut rng = SmallRng::seed_from_u64(42);
        let map = PtMost.solve(&problem, &mut rng, &cancel);
        assert!(map.is_empty());
    }
}
