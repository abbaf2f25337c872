//! T_Most: most-demanding task first.

use rand::RngCore;

use super::greedy::run_task_seeded;
use super::{AssignMap, AssignmentAlgorithm, AssignmentProblem};
use crate::interrupt::CancelToken;

/// Seeds each round with the task that still needs the most workers,
/// lowest index on ties, then chains further tasks onto its nearest
/// worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct TMost;

impl AssignmentAlgorithm for TMost {
    fn name(&self) -> &'static str {
        "T_Most"
    }

    fn solve(
        &self,
        problem: &AssignmentProblem,
        _rng: &mut dyn RngCore,
        cancel: &CancelToken,
    ) -> AssignMap {
        run_task_seeded(problem, self.name(), cancel, |state| {
            let mut best: Option<(usize, usize)> = None;
            for t in state.open_tasks() {
                let r = state.remaining(t);
                if best.map_or(true, |(_, b)| r > b) {
                    best = Some((t, r));
                }
            }
            best.map(|(t, _)| t)
        })
    }

    fn description(&self) -> &'static str {
        "Largest remaining requirement first"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn solve(problem: &AssignmentProblem) -> AssignMap {
        let mut rng = SmallRng::seed_from_u64(42);
        TMost.solve(problem, &mut rng, &CancelToken::new())
    }

    #[test]
    fn test_minimal_cost_pairing() {
        let problem = AssignmentProblem::new(
            vec![vec![1.0, 5.0], vec![5.0, 1.0], vec![3.0, 3.0]],
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
            vec![1, 1],
            1,
        )
        .unwrap();
        let map = solve(&problem);
        assert_eq!(map.route(0), &[0]);
        assert_eq!(map.route(1), &[1]);
        assert!(map.route(2).is_empty());
        assert!(map.is_complete(&problem));
    }

    #[test]
    fn test_largest_remaining_seeded_first() {
        // t1 needs two workers, so it is seeded first and takes w0; the
        // tie that follows goes to t0
        let problem = AssignmentProblem::new(
            vec![vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0]],
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
            vec![1, 2],
            1,
        )
        .unwrap();
        let map = solve(&problem);
        assert_eq!(map.route(0), &[1]);
        assert_eq!(map.workers_for(0), vec![1]);
        assert_eq!(map.workers_for(1), vec![0, 2]);
    }

    #[test]
    fn test_complete_with_routes() {
        let problem = AssignmentProblem::uniform(
            vec![vec![1.0, 2.0, 3.0, 4.0], vec![4.0, 3.0, 2.0, 1.0]],
            vec![
                vec![0.0, 1.0, 2.0, 3.0],
                vec![1.0, 0.0, 1.0, 2.0],
                vec![2.0, 1.0, 0.0, 1.0],
                vec![3.0, 2.0, 1.0, 0.0],
            ],
            1,
            2,
        )
        .unwrap();
        let map = solve(&problem);
        assert!(map.is_complete(&problem));
        assert_eq!(map.route(0), &[0, 1]);
        assert_eq!(map.route(1), &[2, 3]);
    }
}
