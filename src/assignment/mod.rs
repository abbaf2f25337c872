//! Worker–task assignment algorithms.
//!
//! All strategies share one input shape, the [`AssignmentProblem`]
//! (`D`, `C`, `p`, `q`), and one output shape, the [`AssignMap`].
//!
//! # Strategies
//!
//! - [`TMost`]: task-seeded, largest remaining requirement first
//! - [`TRandom`]: task-seeded, uniform-random seed
//! - [`PtMost`]: worker-seeded with incumbent keeping
//! - [`NearestFirst`]: global cheapest pair, seeds the GA
//!
//! The genetic strategy lives in [`crate::ga`].
//!
//! # Usage
//!
//! ```
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//! use u_crowd::assignment::{AssignmentAlgorithm, AssignmentProblem, TMost};
//! use u_crowd::interrupt::CancelToken;
//!
//! let problem = AssignmentProblem::new(
//!     vec![vec![1.0, 5.0], vec![5.0, 1.0], vec![3.0, 3.0]],
//!     vec![vec![0.0, 1.0], vec![1.0, 0.0]],
//!     vec![1, 1],
//!     1,
//! )
//! .unwrap();
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let map = TMost.solve(&problem, &mut rng, &CancelToken::new());
//! assert_eq!(map.route(0), &[0]);
//! assert_eq!(map.route(1), &[1]);
//! ```
//!
//! # Reference
//! Tong et al. (2020), "Spatial crowdsourcing: a survey", VLDB Journal 29

pub(crate) mod greedy;
mod kpi;
mod nearest_first;
mod problem;
mod pt_most;
mod t_most;
mod t_random;

pub use kpi::AssignmentKpi;
pub use nearest_first::NearestFirst;
pub use problem::{AssignMap, AssignmentProblem};
pub use pt_most::PtMost;
pub use t_most::TMost;
pub use t_random::TRandom;

use rand::RngCore;
use std::fmt::Debug;

use crate::interrupt::CancelToken;

/// A strategy producing an [`AssignMap`] for a problem.
///
/// Strategies never fail: unreachable seeds are skipped and an incomplete
/// map is returned when the problem admits no complete one. A cancelled
/// run returns the partial map built so far.
pub trait AssignmentAlgorithm: Send + Sync + Debug {
    /// Strategy name (e.g., "T_Most", "GGA_I").
    fn name(&self) -> &'static str;

    /// Solves the problem, drawing randomness from `rng`.
    fn solve(
        &self,
        problem: &AssignmentProblem,
        rng: &mut dyn RngCore,
        cancel: &CancelToken,
    ) -> AssignMap;

    /// Strategy description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn algorithms() -> Vec<Box<dyn AssignmentAlgorithm>> {
        vec![
            Box::new(TMost),
            Box::new(TRandom),
            Box::new(PtMost),
            Box::new(NearestFirst),
        ]
    }

    fn scattered(workers: usize, tasks: usize, p: usize, q: usize) -> AssignmentProblem {
        let wpos: Vec<(f64, f64)> = (0..workers)
            .map(|w| ((w * 37 % 17) as f64, (w * 11 % 13) as f64))
            .collect();
        let tpos: Vec<(f64, f64)> = (0..tasks)
            .map(|t| ((t * 23 % 19) as f64, (t * 7 % 11) as f64))
            .collect();
        let sq = |a: (f64, f64), b: (f64, f64)| (a.0 - b.0).powi(2) + (a.1 - b.1).powi(2);
        let d = wpos
            .iter()
            .map(|&w| tpos.iter().map(|&t| sq(w, t)).collect())
            .collect();
        let c = tpos
            .iter()
            .map(|&a| tpos.iter().map(|&b| sq(a, b)).collect())
            .collect();
        AssignmentProblem::uniform(d, c, p, q).unwrap()
    }

    #[test]
    fn test_all_complete_when_capacity_suffices() {
        for (workers, tasks, p, q) in [(3, 3, 1, 1), (4, 10, 1, 3), (6, 5, 3, 3), (5, 12, 2, 5)] {
            let problem = scattered(workers, tasks, p, q);
            assert!(problem.is_feasible());
            for algo in algorithms() {
                let mut rng = SmallRng::seed_from_u64(42);
                let map = algo.solve(&problem, &mut rng, &CancelToken::new());
                assert!(
                    map.is_complete(&problem),
                    "{} incomplete on {workers}x{tasks}",
                    algo.name()
                );
            }
        }
    }

    #[test]
    fn test_forbidden_pairs_never_used() {
        let mut problem_d = vec![vec![1.0; 4]; 3];
        problem_d[0][0] = f64::INFINITY;
        problem_d[1][2] = f64::INFINITY;
        let problem = AssignmentProblem::uniform(problem_d, vec![vec![1.0; 4]; 4], 1, 2).unwrap();
        for algo in algorithms() {
            let mut rng = SmallRng::seed_from_u64(42);
            let map = algo.solve(&problem, &mut rng, &CancelToken::new());
            assert!(!map.serves(0, 0), "{}", algo.name());
            assert!(!map.serves(1, 2), "{}", algo.name());
            assert!(map.is_complete(&problem));
        }
    }

    #[test]
    fn test_infeasible_never_exceeds_limits() {
        // demand 6 against capacity 2
        let problem = scattered(2, 3, 2, 1);
        for algo in algorithms() {
            let mut rng = SmallRng::seed_from_u64(42);
            let map = algo.solve(&problem, &mut rng, &CancelToken::new());
            for w in 0..2 {
                assert!(map.load(w) <= 1);
            }
            for t in 0..3 {
                assert!(map.assigned_count(t) <= 2);
            }
        }
    }

    #[test]
    fn test_unreachable_task_skipped() {
        let d = vec![vec![f64::INFINITY, 1.0], vec![f64::INFINITY, 2.0]];
        let problem = AssignmentProblem::uniform(d, vec![vec![1.0; 2]; 2], 1, 1).unwrap();
        for algo in algorithms() {
            let mut rng = SmallRng::seed_from_u64(42);
            let map = algo.solve(&problem, &mut rng, &CancelToken::new());
            assert_eq!(map.assigned_count(0), 0);
            assert_eq!(map.assigned_count(1), 1);
        }
    }
}
