//! Crowdsourcing kernel.
//!
//! The [`Kernel`] owns the task and participant pools, the [`Scheduler`]
//! and the [`InterruptManager`]. Scheduling calls take a snapshot of the
//! participant pool under a read lock and run against it, so submissions
//! and registrations never block on a running match.
//!
//! # Usage
//!
//! ```
//! use u_crowd::constraint::PoiConstraint;
//! use u_crowd::kernel::Kernel;
//! use u_crowd::models::{Coordinate, Participant, Task};
//!
//! let kernel = Kernel::builder().with_algorithm("T_Most").build().unwrap();
//! kernel.register_participant(Participant::new("w1").with_location(0.0, 0.0)).unwrap();
//! kernel.register_participant(Participant::new("w2").with_location(8.0, 8.0)).unwrap();
//!
//! kernel.submit_task(Task::assignment().with_constraint(PoiConstraint::new(Coordinate::new(1.0, 1.0))));
//! kernel.submit_task(Task::assignment().with_constraint(PoiConstraint::new(Coordinate::new(7.0, 7.0))));
//!
//! let scheme = kernel.assign_all().unwrap();
//! assert_eq!(scheme[0][0].id, "w1");
//! assert_eq!(scheme[1][0].id, "w2");
//! ```

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::{KernelError, SchedulerError};
use crate::ga::GgaConfig;
use crate::interrupt::InterruptManager;
use crate::models::{Participant, ParticipantStatus, Task, TaskId};
use crate::scheduler::{
    AlgoFactory, AlgorithmRegistry, AssignmentConfig, AssignmentContext, DistanceMetric,
    Scheduler, SquaredEuclidean, DEFAULT_ALGORITHM,
};
use crate::validation::{validate_participants, validate_tasks, ValidationResult};

/// Builds a [`Kernel`].
#[derive(Debug)]
pub struct KernelBuilder {
    assignment: AssignmentConfig,
    gga: GgaConfig,
    metric: Arc<dyn DistanceMetric>,
    factories: Vec<Arc<dyn AlgoFactory>>,
    algorithm: String,
}

impl Default for KernelBuilder {
    fn default() -> Self {
        Self {
            assignment: AssignmentConfig::default(),
            gga: GgaConfig::default(),
            metric: Arc::new(SquaredEuclidean),
            factories: Vec::new(),
            algorithm: DEFAULT_ALGORITHM.to_string(),
        }
    }
}

impl KernelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requirement, capacity and seed for the matching factories.
    pub fn with_assignment_config(mut self, config: AssignmentConfig) -> Self {
        self.assignment = config;
        self
    }

    /// Parameters for the `GGA_I` factory.
    pub fn with_gga_config(mut self, config: GgaConfig) -> Self {
        self.gga = config;
        self
    }

    /// Distance metric for the matching factories.
    pub fn with_metric(mut self, metric: Arc<dyn DistanceMetric>) -> Self {
        self.metric = metric;
        self
    }

    /// Registers an extra factory next to the defaults.
    pub fn with_factory(mut self, factory: Arc<dyn AlgoFactory>) -> Self {
        self.factories.push(factory);
        self
    }

    /// Initial active algorithm, `DefaultAlgo` if unset.
    pub fn with_algorithm(mut self, name: impl Into<String>) -> Self {
        self.algorithm = name.into();
        self
    }

    /// Fails on a duplicate factory name or an unknown initial algorithm.
    pub fn build(self) -> Result<Kernel, SchedulerError> {
        let mut registry =
            AlgorithmRegistry::with_defaults_and_metric(self.assignment, self.gga, self.metric);
        for factory in self.factories {
            registry.register(factory)?;
        }
        let scheduler = Scheduler::with_algorithm(registry, &self.algorithm)?;
        info!(
            algorithm = %self.algorithm,
            algorithms = scheduler.registry().len(),
            "kernel initialized"
        );
        Ok(Kernel {
            tasks: RwLock::new(Vec::new()),
            participants: RwLock::new(Vec::new()),
            scheduler,
            interrupts: InterruptManager::new(),
        })
    }
}

/// Task and participant pools plus the scheduler.
#[derive(Debug)]
pub struct Kernel {
    tasks: RwLock<Vec<Task>>,
    participants: RwLock<Vec<Participant>>,
    scheduler: Scheduler,
    interrupts: InterruptManager,
}

impl Kernel {
    pub fn builder() -> KernelBuilder {
        KernelBuilder::new()
    }

    /// Adds a task to the pool; returns its id.
    pub fn submit_task(&self, task: Task) -> TaskId {
        let id = task.id();
        self.tasks.write().push(task);
        debug!(task = %id, "task submitted");
        id
    }

    /// Adds a participant; ids must be unique.
    pub fn register_participant(&self, participant: Participant) -> Result<(), KernelError> {
        let mut pool = self.participants.write();
        if pool.iter().any(|p| p.id == participant.id) {
            return Err(KernelError::DuplicateParticipant(participant.id));
        }
        debug!(participant = %participant.id, "participant registered");
        pool.push(participant);
        Ok(())
    }

    /// Updates a participant's status; returns whether it was found.
    pub fn set_participant_status(&self, id: &str, status: ParticipantStatus) -> bool {
        match self.participants.write().iter_mut().find(|p| p.id == id) {
            Some(p) => {
                p.set_status(status);
                true
            }
            None => false,
        }
    }

    /// Snapshot of the task pool, in submission order.
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.read().clone()
    }

    /// Snapshot of the participant pool, in registration order.
    pub fn participants(&self) -> Vec<Participant> {
        self.participants.read().clone()
    }

    pub fn select_algorithm(&self, name: &str) -> Result<(), KernelError> {
        Ok(self.scheduler.select_algorithm(name)?)
    }

    pub fn active_algorithm(&self) -> &'static str {
        self.scheduler.active_algorithm()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn interrupts(&self) -> &InterruptManager {
        &self.interrupts
    }

    /// Runs `call` with a context whose token is registered under `ids`.
    fn with_context<T>(&self, ids: &[TaskId], call: impl FnOnce(&AssignmentContext) -> T) -> T {
        let registration = self.interrupts.register(ids);
        let context = AssignmentContext::new(self.participants()).with_cancel(registration.token());
        call(&context)
    }

    fn with_batch_context<T>(&self, tasks: &[Task], call: impl FnOnce(&AssignmentContext) -> T) -> T {
        let ids: Vec<TaskId> = tasks.iter().map(Task::id).collect();
        self.with_context(&ids, call)
    }

    /// Participants assigned to `task` by the active algorithm.
    pub fn assignment_scheme(&self, task: &Task) -> Option<Vec<Participant>> {
        self.with_context(&[task.id()], |context| self.scheduler.task_assignment(task, context))
    }

    pub fn assignment_scheme_batch(&self, tasks: &[Task]) -> Option<Vec<Vec<Participant>>> {
        self.with_batch_context(tasks, |context| {
            self.scheduler.task_assignment_batch(tasks, context)
        })
    }

    pub fn recommendation_scheme(&self, task: &Task) -> Option<Vec<Participant>> {
        self.with_context(&[task.id()], |context| {
            self.scheduler.task_recommendation(task, context)
        })
    }

    pub fn recommendation_scheme_batch(&self, tasks: &[Task]) -> Option<Vec<Vec<Participant>>> {
        self.with_batch_context(tasks, |context| {
            self.scheduler.task_recommendation_batch(tasks, context)
        })
    }

    pub fn participant_selection(&self, task: &Task) -> Option<Vec<Participant>> {
        self.with_context(&[task.id()], |context| {
            self.scheduler.participant_selection(task, context)
        })
    }

    pub fn participant_selection_batch(&self, tasks: &[Task]) -> Option<Vec<Vec<Participant>>> {
        self.with_batch_context(tasks, |context| {
            self.scheduler.participant_selection_batch(tasks, context)
        })
    }

    /// Assigns the whole task pool as one batch.
    pub fn assign_all(&self) -> Option<Vec<Vec<Participant>>> {
        self.assignment_scheme_batch(&self.tasks())
    }

    /// Recommends for the whole task pool as one batch.
    pub fn recommend_all(&self) -> Option<Vec<Vec<Participant>>> {
        self.recommendation_scheme_batch(&self.tasks())
    }

    /// Checks both pools: duplicate ids, unknown prerequisites and
    /// dependence cycles.
    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        if let Err(e) = validate_tasks(&self.tasks.read()) {
            errors.extend(e);
        }
        if let Err(e) = validate_participants(&self.participants.read()) {
            errors.extend(e);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Crate version.
    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
