//! NearestFirst: global cheapest-pair greedy.

use rand::RngCore;

use super::greedy::GreedyState;
use super::{AssignMap, AssignmentAlgorithm, AssignmentProblem};
use crate::interrupt::CancelToken;

/// Repeatedly assigns the globally cheapest open pair, `(worker, task)`
/// order on ties, with no route extension. Seeds the genetic algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestFirst;

impl AssignmentAlgorithm for NearestFirst {
    fn name(&self) -> &'static str {
        "NearestFirst"
    }

    fn solve(
        &self,
        problem: &AssignmentProblem,
        _rng: &mut dyn RngCore,
        cancel: &CancelToken,
    ) -> AssignMap {
        let mut state = GreedyState::new(problem);
        while let Some((w, t)) = state.nearest_pair() {
            if cancel.is_cancelled() {
                return state.into_map();
            }
            state.assign(w, t);
        }
        state.complete(cancel);
        state.report(self.name());
        state.into_map()
    }

    fn description(&self) -> &'static str {
        "Globally cheapest pair first"
    }
}
