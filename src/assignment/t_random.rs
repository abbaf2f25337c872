//! T_Random: uniform-random task seeding.

use rand::seq::IndexedRandom;
use rand::RngCore;

use super::greedy::run_task_seeded;
use super::{AssignMap, AssignmentAlgorithm, AssignmentProblem};
use crate::interrupt::CancelToken;

/// Seeds each round with a uniformly random unfilled task.
#[derive(Debug, Clone, Copy, Default)]
pub struct TRandom;

impl AssignmentAlgorithm for TRandom {
    fn name(&self) -> &'static str {
        "T_Random"
    }

    fn solve(
        &self,
        problem: &AssignmentProblem,
        rng: &mut dyn RngCore,
        cancel: &CancelToken,
    ) -> AssignMap {
        run_task_seeded(problem, self.name(), cancel, |state| {
            let open: Vec<usize> = state.open_tasks().collect();
            open.choose(rng).copied()
        })
    }

    fn description(&self) -> &'static str {
        "Random unfilled task first"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn grid_problem(workers: usize, tasks: usize, p: usize, q: usize) -> AssignmentProblem {
        let d = (0..workers)
            .map(|w| (0..tasks).map(|t| ((w * 7 + t * 3) % 11) as f64 + 1.0).collect())
            .collect();
        let c = (0..tasks)
            .map(|a| (0..tasks).map(|b| (a as f64 - b as f64).abs()).collect())
            .collect();
        AssignmentProblem::uniform(d, c, p, q).unwrap()
    }

    #[test]
    fn test_complete_when_capacity_suffices() {
        let problem = grid_problem(5, 8, 2, 4);
        assert!(problem.is_feasible());
        let mut rng = SmallRng::seed_from_u64(42);
        let map = TRandom.solve(&problem, &mut rng, &CancelToken::new());
        assert!(map.is_complete(&problem));
    }

    #[test]
    fn test_reproducible_with_seed() {
        let problem = grid_problem(4, 6, 1, 2);
        let a = TRandom.solve(
            &problem,
            &mut SmallRng::seed_from_u64(42),
            &CancelToken::new(),
        );
        let b = TRandom.solve(
            &problem,
            &mut SmallRng::seed_from_u64(42),
            &CancelToken::new(),
        );
        assert_eq!(a, b);
    }
}
