//! Strategy registry and scheduler.
//!
//! The [`Scheduler`] binds one named [`AlgoFactory`] from an
//! [`AlgorithmRegistry`] and delegates candidate selection, recommendation
//! and assignment to it, single-task and batch. It holds no state beyond
//! the active factory; every call reads the given [`AssignmentContext`].
//!
//! # Factories
//!
//! | Name | Assignment |
//! |------|-----------|
//! | `DefaultAlgo` | availability and constraint filter |
//! | `T_Most` | largest-remaining-first greedy |
//! | `T_Random` | random-seed greedy |
//! | `PTMost` | worker-seeded greedy with incumbent keeping |
//! | `GGA_I` | genetic algorithm |
//!
//! Matching factories need every task to carry exactly one POI
//! constraint and return `None` otherwise.
//!
//! # Usage
//!
//! ```
//! use u_crowd::ga::GgaConfig;
//! use u_crowd::scheduler::{AlgorithmRegistry, AssignmentConfig, Scheduler};
//!
//! let registry = AlgorithmRegistry::with_defaults(AssignmentConfig::default(), GgaConfig::default());
//! let scheduler = Scheduler::new(registry).unwrap();
//! assert_eq!(scheduler.active_algorithm(), "DefaultAlgo");
//!
//! scheduler.select_algorithm("T_Most").unwrap();
//! assert_eq!(scheduler.active_algorithm(), "T_Most");
//! assert!(scheduler.select_algorithm("Magic").is_err());
//! ```

mod config;
mod context;
mod factory;
mod matrix;
mod registry;

pub use config::AssignmentConfig;
pub use context::AssignmentContext;
pub use factory::{eligible_participants, AlgoFactory, DefaultFactory, MatchingFactory};
pub use matrix::{
    build_problem, matching_candidates, task_locations, DistanceMetric, Haversine,
    SquaredEuclidean, EARTH_RADIUS_KM,
};
pub use registry::AlgorithmRegistry;

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::error::SchedulerError;
use crate::models::{Participant, Task};

/// Name of the factory a new scheduler starts with.
pub const DEFAULT_ALGORITHM: &str = "DefaultAlgo";

/// Delegates scheduling calls to the active factory.
#[derive(Debug)]
pub struct Scheduler {
    registry: AlgorithmRegistry,
    active: RwLock<Arc<dyn AlgoFactory>>,
}

impl Scheduler {
    /// Starts with [`DEFAULT_ALGORITHM`].
    pub fn new(registry: AlgorithmRegistry) -> Result<Self, SchedulerError> {
        Self::with_algorithm(registry, DEFAULT_ALGORITHM)
    }

    /// Starts with the named factory.
    pub fn with_algorithm(registry: AlgorithmRegistry, name: &str) -> Result<Self, SchedulerError> {
        let active = registry.get(name)?;
        Ok(Self {
            registry,
            active: RwLock::new(active),
        })
    }

    /// Swaps the active factory.
    pub fn select_algorithm(&self, name: &str) -> Result<(), SchedulerError> {
        let factory = self.registry.get(name)?;
        let previous = std::mem::replace(&mut *self.active.write(), factory);
        info!(from = previous.name(), to = name, "algorithm selected");
        Ok(())
    }

    /// Name of the active factory.
    pub fn active_algorithm(&self) -> &'static str {
        self.active.read().name()
    }

    pub fn registry(&self) -> &AlgorithmRegistry {
        &self.registry
    }

    fn factory(&self) -> Arc<dyn AlgoFactory> {
        Arc::clone(&self.active.read())
    }

    pub fn participant_selection(&self, task: &Task, context: &AssignmentContext) -> Option<Vec<Participant>> {
        self.factory().select_candidates(task, context)
    }

    pub fn participant_selection_batch(
        &self,
        tasks: &[Task],
        context: &AssignmentContext,
    ) -> Option<Vec<Vec<Participant>>> {
        self.factory().select_candidates_batch(tasks, context)
    }

    pub fn task_recommendation(&self, task: &Task, context: &AssignmentContext) -> Option<Vec<Participant>> {
        self.factory().recommend(task, context)
    }

    pub fn task_recommendation_batch(
        &self,
        tasks: &[Task],
        context: &AssignmentContext,
    ) -> Option<Vec<Vec<Participant>>> {
        self.factory().recommend_batch(tasks, context)
    }

    pub fn task_assignment(&self, task: &Task, context: &AssignmentContext) -> Option<Vec<Participant>> {
        self.factory().assign(task, context)
    }

    pub fn task_assignment_batch(
        &self,
        tasks: &[Task],
        context: &AssignmentContext,
    ) -> Option<Vec<Vec<Participant>>> {
        self.factory().assign_batch(tasks, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::PoiConstraint;
    use crate::ga::GgaConfig;
    use crate::models::Coordinate;

    fn scheduler() -> Scheduler {
        let config = AssignmentConfig::default().with_seed(42);
        Scheduler::new(AlgorithmRegistry::with_defaults(config, GgaConfig::default())).unwrap()
    }

    #[test]
    fn test_starts_with_default() {
        assert_eq!(scheduler().active_algorithm(), "DefaultAlgo");
    }

    #[test]
    fn test_unknown_algorithm_keeps_active() {
        let s = scheduler();
        s.select_algorithm("T_Random").unwrap();
        match s.select_algorithm("Nope") {
            Err(SchedulerError::UnknownAlgorithm { available, .. }) => {
                assert!(available.contains(&"PTMost".to_string()));
            }
            _ => panic!("expected UnknownAlgorithm"),
        }
        assert_eq!(s.active_algorithm(), "T_Random");
    }

    #[test]
    fn test_missing_default_rejected() {
        assert!(Scheduler::new(AlgorithmRegistry::new()).is_err());
    }

    #[test]
    fn test_delegates_to_active() {
        let s = scheduler();
        let bare = Task::assignment();
        let context = AssignmentContext::new(vec![Participant::new("a").with_location(0.0, 0.0)]);

        // default filter accepts a task without POI
        assert_eq!(s.task_assignment(&bare, &context).map(|v| v.len()), Some(1));

        s.select_algorithm("T_Most").unwrap();
        assert!(s.task_assignment(&bare, &context).is_none());
        assert_eq!(s.task_recommendation(&bare, &context).map(|v| v.len()), Some(1));
        assert_eq!(s.participant_selection(&bare, &context).map(|v| v.len()), Some(1));

        let poi = Task::assignment().with_constraint(PoiConstraint::new(Coordinate::new(1.0, 0.0)));
        let scheme = s.task_assignment_batch(&[poi], &context).unwrap();
        assert_eq!(scheme[0][0].id, "a");
    }
}
