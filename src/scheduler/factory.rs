//! Algorithm factories.
//!
//! An [`AlgoFactory`] answers the three scheduling questions for a task or
//! a batch: candidate selection, recommendation and assignment. Every
//! method defaults to the availability and constraint filter
//! ([`eligible_participants`]); [`MatchingFactory`] overrides assignment
//! with distance-matrix matching.

use std::fmt::Debug;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use super::matrix::{build_problem, matching_candidates, task_locations};
use super::{AssignmentConfig, AssignmentContext, DistanceMetric, SquaredEuclidean};
use crate::assignment::{AssignmentAlgorithm, AssignmentKpi};
use crate::models::{Participant, Task};

/// Participants that are available and pass `task.can_assign_to`.
pub fn eligible_participants(task: &Task, participants: &[Participant]) -> Vec<Participant> {
    participants
        .iter()
        .filter(|p| p.available() && task.can_assign_to(p))
        .cloned()
        .collect()
}

/// A named family of scheduling strategies.
///
/// `None` means the strategy's precondition does not hold for the input;
/// no default filter is substituted in that case.
pub trait AlgoFactory: Send + Sync + Debug {
    /// Registry name (e.g., "T_Most", "DefaultAlgo").
    fn name(&self) -> &'static str;

    /// Participants that could take `task`.
    fn select_candidates(&self, task: &Task, context: &AssignmentContext) -> Option<Vec<Participant>> {
        Some(eligible_participants(task, &context.participants))
    }

    fn select_candidates_batch(
        &self,
        tasks: &[Task],
        context: &AssignmentContext,
    ) -> Option<Vec<Vec<Participant>>> {
        tasks
            .iter()
            .map(|t| self.select_candidates(t, context))
            .collect()
    }

    /// Participants `task` should be recommended to.
    fn recommend(&self, task: &Task, context: &AssignmentContext) -> Option<Vec<Participant>> {
        Some(eligible_participants(task, &context.participants))
    }

    fn recommend_batch(
        &self,
        tasks: &[Task],
        context: &AssignmentContext,
    ) -> Option<Vec<Vec<Participant>>> {
        tasks.iter().map(|t| self.recommend(t, context)).collect()
    }

    /// Participants assigned to `task`.
    fn assign(&self, task: &Task, context: &AssignmentContext) -> Option<Vec<Participant>> {
        Some(eligible_participants(task, &context.participants))
    }

    /// Per-task assignments, in task order.
    fn assign_batch(
        &self,
        tasks: &[Task],
        context: &AssignmentContext,
    ) -> Option<Vec<Vec<Participant>>> {
        tasks.iter().map(|t| self.assign(t, context)).collect()
    }

    /// Factory description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// Filter-only factory used when no matching strategy is selected.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFactory;

impl AlgoFactory for DefaultFactory {
    fn name(&self) -> &'static str {
        "DefaultAlgo"
    }

    fn description(&self) -> &'static str {
        "Every available participant that meets the task's constraints"
    }
}

/// Distance-matrix matching with one [`AssignmentAlgorithm`].
///
/// Tasks must each carry exactly one POI constraint. Candidates are the
/// available participants with a location that can take at least one task
/// of the batch; a candidate failing a task's constraints is forbidden
/// from that task. Recommendation and candidate selection keep the
/// default filter.
///
/// # Example
/// ```
/// use u_crowd::assignment::TMost;
/// use u_crowd::constraint::PoiConstraint;
/// use u_crowd::models::{Coordinate, Participant, Task};
/// use u_crowd::scheduler::{AlgoFactory, AssignmentContext, MatchingFactory};
///
/// let factory = MatchingFactory::new(TMost);
/// let tasks = vec![
///     Task::assignment().with_constraint(PoiConstraint::new(Coordinate::new(0.0, 0.0))),
///     Task::assignment().with_constraint(PoiConstraint::new(Coordinate::new(5.0, 5.0))),
/// ];
/// let context = AssignmentContext::new(vec![
///     Participant::new("a").with_location(0.0, 1.0),
///     Participant::new("b").with_location(5.0, 4.0),
/// ]);
///
/// let scheme = factory.assign_batch(&tasks, &context).unwrap();
/// assert_eq!(scheme[0][0].id, "a");
/// assert_eq!(scheme[1][0].id, "b");
/// ```
#[derive(Debug, Clone)]
pub struct MatchingFactory {
    algorithm: Arc<dyn AssignmentAlgorithm>,
    metric: Arc<dyn DistanceMetric>,
    config: AssignmentConfig,
}

impl MatchingFactory {
    /// Wraps an algorithm with the default metric and config.
    pub fn new(algorithm: impl AssignmentAlgorithm + 'static) -> Self {
        Self::from_arc(Arc::new(algorithm))
    }

    pub fn from_arc(algorithm: Arc<dyn AssignmentAlgorithm>) -> Self {
        Self {
            algorithm,
            metric: Arc::new(SquaredEuclidean),
            config: AssignmentConfig::default(),
        }
    }

    pub fn with_metric(mut self, metric: Arc<dyn DistanceMetric>) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_config(mut self, config: AssignmentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn algorithm(&self) -> &dyn AssignmentAlgorithm {
        self.algorithm.as_ref()
    }

    pub fn config(&self) -> &AssignmentConfig {
        &self.config
    }

    fn rng(&self) -> SmallRng {
        match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        }
    }
}

impl AlgoFactory for MatchingFactory {
    fn name(&self) -> &'static str {
        self.algorithm.name()
    }

    fn assign(&self, task: &Task, context: &AssignmentContext) -> Option<Vec<Participant>> {
        self.assign_batch(std::slice::from_ref(task), context)
            .and_then(|mut scheme| scheme.pop())
    }

    fn assign_batch(
        &self,
        tasks: &[Task],
        context: &AssignmentContext,
    ) -> Option<Vec<Vec<Participant>>> {
        let algorithm = self.algorithm.name();
        let Some(locations) = task_locations(tasks) else {
            warn!(algorithm, "every task needs exactly one POI constraint");
            return None;
        };

        let candidates = matching_candidates(tasks, &context.participants);
        let problem = match build_problem(
            tasks,
            &locations,
            &candidates,
            self.metric.as_ref(),
            &self.config,
        ) {
            Ok(problem) => problem,
            Err(errors) => {
                warn!(algorithm, errors = errors.len(), "cannot build matching problem");
                return None;
            }
        };
        debug!(
            algorithm,
            metric = self.metric.name(),
            workers = problem.worker_count(),
            tasks = problem.task_count(),
            "built matching problem"
        );

        let mut rng = self.rng();
        let map = self.algorithm.solve(&problem, &mut rng, &context.cancel);

        let kpi = AssignmentKpi::calculate(&map, &problem);
        debug!(
            algorithm,
            total_cost = kpi.total_cost,
            coverage = kpi.coverage,
            complete = kpi.complete,
            "matching finished"
        );

        Some(
            map.by_task(tasks.len())
                .into_iter()
                .map(|workers| workers.into_iter().map(|w| candidates[w].clone()).collect())
                .collect(),
        )
    }

    fn description(&self) -> &'static str {
        self.algorithm.description()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::{NearestFirst, PtMost, TMost, TRandom};
    use crate::constraint::{PoiConstraint, SpatioPoint};
    use crate::ga::{Gga, GgaConfig};
    use crate::interrupt::CancelToken;
    use crate::models::{Coordinate, ParticipantStatus};

    fn poi_task(x: f64, y: f64) -> Task {
        Task::assignment().with_constraint(PoiConstraint::new(Coordinate::new(x, y)))
    }

    fn context() -> AssignmentContext {
        AssignmentContext::new(vec![
            Participant::new("a").with_location(0.0, 1.0),
            Participant::new("b").with_location(6.0, 5.0),
            Participant::new("c").with_location(3.0, 3.0),
        ])
    }

    fn ids(ps: &[Participant]) -> Vec<&str> {
        ps.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_default_filter() {
        let task = Task::assignment()
            .with_constraint(SpatioPoint::new(Coordinate::new(0.0, 0.0), 2.0).unwrap());
        let context = context()
            .with_participant(Participant::new("busy").with_location(0.0, 0.0).with_status(ParticipantStatus::Busy))
            .with_participant(Participant::new("anywhere"));

        let picked = DefaultFactory.select_candidates(&task, &context).unwrap();
        // "anywhere" declares no location, so the point is vacuous
        assert_eq!(ids(&picked), vec!["a", "anywhere"]);
        assert_eq!(DefaultFactory.recommend(&task, &context).unwrap(), picked);
        assert_eq!(DefaultFactory.assign(&task, &context).unwrap(), picked);
    }

    #[test]
    fn test_default_batch_maps_single() {
        let tasks = vec![poi_task(0.0, 0.0), poi_task(100.0, 100.0)];
        let scheme = DefaultFactory.assign_batch(&tasks, &context()).unwrap();
        assert_eq!(scheme.len(), 2);
        assert_eq!(scheme[0].len(), 3);
        assert!(scheme[1].is_empty());
    }

    #[test]
    fn test_matching_assigns_nearest() {
        let tasks = vec![poi_task(0.0, 0.0), poi_task(6.0, 6.0)];
        let factory = MatchingFactory::new(TMost).with_config(AssignmentConfig::default().with_seed(42));
        let scheme = factory.assign_batch(&tasks, &context()).unwrap();
        assert_eq!(ids(&scheme[0]), vec!["a"]);
        assert_eq!(ids(&scheme[1]), vec!["b"]);
    }

    #[test]
    fn test_matching_single_task() {
        let factory = MatchingFactory::new(NearestFirst);
        let picked = factory.assign(&poi_task(3.0, 4.0), &context()).unwrap();
        assert_eq!(ids(&picked), vec!["c"]);
    }

    #[test]
    fn test_matching_precondition_failure() {
        let factory = MatchingFactory::new(TMost);
        let tasks = vec![poi_task(0.0, 0.0), Task::assignment()];
        assert!(factory.assign_batch(&tasks, &context()).is_none());
        assert!(factory.assign(&Task::assignment(), &context()).is_none());

        // recommendation keeps the default filter
        assert!(factory.recommend(&Task::assignment(), &context()).is_some());
    }

    #[test]
    fn test_matching_respects_constraints() {
        // only "b" is inside the point disc around the second task
        let tight = poi_task(6.0, 6.0)
            .with_constraint(SpatioPoint::new(Coordinate::new(6.0, 6.0), 1.5).unwrap());
        let tasks = vec![poi_task(3.0, 3.0), tight];
        let factory = MatchingFactory::new(TRandom).with_config(AssignmentConfig::default().with_seed(42));
        let scheme = factory.assign_batch(&tasks, &context()).unwrap();
        assert_eq!(ids(&scheme[1]), vec!["b"]);
        assert_eq!(scheme[0].len(), 1);
    }

    #[test]
    fn test_every_strategy_completes() {
        let tasks = vec![poi_task(0.0, 0.0), poi_task(6.0, 6.0), poi_task(3.0, 2.0)];
        let config = AssignmentConfig::default().with_seed(42);
        let factories = vec![
            MatchingFactory::new(TMost),
            MatchingFactory::new(TRandom),
            MatchingFactory::new(PtMost),
            MatchingFactory::new(NearestFirst),
            MatchingFactory::new(Gga::new(
                GgaConfig::default().with_population_size(10).with_max_generations(10),
            )),
        ];
        for factory in factories {
            let factory = factory.with_config(config.clone());
            let scheme = factory.assign_batch(&tasks, &context()).unwrap();
            assert_eq!(scheme.len(), 3, "{}", factory.name());
            let mut all: Vec<&str> = scheme.iter().flat_map(|s| ids(s)).collect();
            assert!(scheme.iter().all(|s| s.len() == 1), "{}", factory.name());
            all.sort_unstable();
            all.dedup();
            assert_eq!(all.len(), 3, "{}", factory.name());
        }
    }

    #[test]
    fn test_cancelled_context() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let context = context().with_cancel(cancel);
        let factory = MatchingFactory::new(TMost);
        let scheme = factory.assign_batch(&[poi_task(0.0, 0.0)], &context).unwrap();
        assert!(scheme[0].is_empty());
    }
}
