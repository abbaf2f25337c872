//! Task model.
//!
//! A task is a unit of crowd work carrying an ordered list of constraints.
//! A participant may be assigned a task when every constraint whose
//! condition kind the participant declares is satisfied.
//!
//! Task ids come from a process-wide counter, so they strictly increase
//! with creation order. The status cell is shared between clones and with
//! [`TaskHandle`]s held by dependence constraints.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Condition, ConditionKind, Coordinate, Participant};
use crate::constraint::Constraint;
use crate::decompose::Decomposer;
use crate::error::DecomposeError;

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Monotonic task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl TaskId {
    fn next() -> Self {
        TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the task reaches participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistributionType {
    /// The platform decides who performs the task.
    #[default]
    Assignment,
    /// Participants are offered the task and choose.
    Recommendation,
}

/// Task lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Ready,
    InProgress,
    Finished,
}

/// A shared view of a task's id and status.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    status: Arc<RwLock<TaskStatus>>,
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn status(&self) -> TaskStatus {
        *self.status.read()
    }

    pub fn finished(&self) -> bool {
        self.status() == TaskStatus::Finished
    }
}

impl PartialEq for TaskHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// A crowd task.
#[derive(Debug, Clone)]
pub struct Task {
    id: TaskId,
    constraints: Vec<Constraint>,
    distribution: DistributionType,
    status: Arc<RwLock<TaskStatus>>,
}

impl Task {
    /// Creates a ready task with no constraints and a fresh id.
    pub fn new(distribution: DistributionType) -> Self {
        Self {
            id: TaskId::next(),
            constraints: Vec::new(),
            distribution,
            status: Arc::new(RwLock::new(TaskStatus::Ready)),
        }
    }

    /// Creates an assignment task.
    pub fn assignment() -> Self {
        Self::new(DistributionType::Assignment)
    }

    /// Creates a recommendation task.
    pub fn recommendation() -> Self {
        Self::new(DistributionType::Recommendation)
    }

    /// Appends a constraint.
    pub fn with_constraint(mut self, constraint: impl Into<Constraint>) -> Self {
        self.constraints.push(constraint.into());
        self
    }

    /// Appends several constraints in order.
    pub fn with_constraints(mut self, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn distribution_type(&self) -> DistributionType {
        self.distribution
    }

    pub fn status(&self) -> TaskStatus {
        *self.status.read()
    }

    /// Updates the status, visible to every clone and handle.
    pub fn set_status(&self, status: TaskStatus) {
        *self.status.write() = status;
    }

    /// Whether the task is ready to be handed out.
    pub fn assignable(&self) -> bool {
        self.status() == TaskStatus::Ready
    }

    pub fn finished(&self) -> bool {
        self.status() == TaskStatus::Finished
    }

    /// A handle for dependence constraints.
    pub fn handle(&self) -> TaskHandle {
        TaskHandle {
            id: self.id,
            status: Arc::clone(&self.status),
        }
    }

    /// Whether the participant meets every constraint it declares an
    /// ability for.
    ///
    /// Constraints the participant has no ability for are vacuously
    /// satisfied. Constraints of kind [`ConditionKind::Empty`] need no
    /// ability and are always evaluated.
    pub fn can_assign_to(&self, participant: &Participant) -> bool {
        self.constraints.iter().all(|c| match c.condition_kind() {
            ConditionKind::Empty => c.satisfy(&Condition::Empty),
            kind => participant
                .ability(kind)
                .map_or(true, |ability| c.satisfy(ability)),
        })
    }

    /// Location of the task's single point-of-interest constraint.
    ///
    /// `None` when the task carries zero or several POI constraints.
    pub fn poi(&self) -> Option<Coordinate> {
        let mut pois = self.constraints.iter().filter_map(|c| match c {
            Constraint::Poi(poi) => Some(poi.location()),
            _ => None,
        });
        match (pois.next(), pois.next()) {
            (Some(location), None) => Some(location),
            _ => None,
        }
    }

    /// The task as a [`Decomposer`].
    pub fn decomposer(&self) -> &dyn Decomposer<Task> {
        self
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Decomposer<Task> for Task {
    fn trivial_decompose(&self) -> Vec<Task> {
        vec![self.clone()]
    }

    /// Cartesian product of every constraint's decomposition, in order.
    ///
    /// Each combination becomes a new task with a fresh id. With `k`
    /// divisible constraints this yields `scale^k` sub-tasks.
    fn scale_decompose(&self, scale: i32) -> Result<Vec<Task>, DecomposeError> {
        if scale == 1 {
            return Ok(self.trivial_decompose());
        }

        let mut parts = Vec::with_capacity(self.constraints.len());
        for constraint in &self.constraints {
            let pieces = constraint
                .decomposer()
                .scale_decompose(scale)
                .map_err(|e| DecomposeError::Task {
                    task: self.id,
                    source: Box::new(e),
                })?;
            parts.push(pieces);
        }

        let mut combos: Vec<Vec<Constraint>> = vec![Vec::new()];
        for options in &parts {
            let mut next = Vec::with_capacity(combos.len() * options.len());
            for prefix in &combos {
                for option in options {
                    let mut combo = prefix.clone();
                    combo.push(option.clone());
                    next.push(combo);
                }
            }
            combos = next;
        }

        debug!(task = %self.id, scale, sub_tasks = combos.len(), "task decomposed");
        Ok(combos
            .into_iter()
            .map(|constraints| Task::new(self.distribution).with_constraints(constraints))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{DependenceConstraint, PoiConstraint, SpatioLine, TimeRange};
    use chrono::NaiveDate;

    fn dt(h: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 1, 1)
            .and_then(|d| d.and_hms_opt(h, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_ids_increase() {
        let a = Task::assignment();
        let b = Task::recommendation();
        assert!(b.id() > a.id());
        assert_eq!(b.distribution_type(), DistributionType::Recommendation);
        assert!(a.assignable());
    }

    #[test]
    fn test_status_shared_with_clone_and_handle() {
        let task = Task::assignment();
        let copy = task.clone();
        let handle = task.handle();
        task.set_status(TaskStatus::Finished);
        assert!(copy.finished());
        assert!(handle.finished());
        assert_eq!(handle.id(), task.id());
    }

    #[test]
    fn test_can_assign_to_vacuous_without_ability() {
        let task = Task::assignment()
            .with_constraint(PoiConstraint::new(Coordinate::new(0.0, 0.0)));
        let no_location = Participant::new("w0");
        let near = Participant::new("w1").with_location(1.0, 1.0);
        let far = Participant::new("w2").with_location(50.0, 50.0);

        assert!(task.can_assign_to(&no_location));
        assert!(task.can_assign_to(&near));
        assert!(!task.can_assign_to(&far));
    }

    #[test]
    fn test_dependence_always_evaluated() {
        let first = Task::assignment();
        let second = Task::assignment()
            .with_constraint(DependenceConstraint::new(vec![first.handle()]));
        let worker = Participant::new("w1");

        assert!(!second.can_assign_to(&worker));
        first.set_status(TaskStatus::Finished);
        assert!(second.can_assign_to(&worker));
    }

    #[test]
    fn test_poi_requires_exactly_one() {
        let poi = || PoiConstraint::new(Coordinate::new(3.0, 4.0));
        assert_eq!(Task::assignment().poi(), None);
        assert_eq!(
            Task::assignment().with_constraint(poi()).poi(),
            Some(Coordinate::new(3.0, 4.0))
        );
        assert_eq!(
            Task::assignment().with_constraint(poi()).with_constraint(poi()).poi(),
            None
        );
    }

    #[test]
    fn test_scale_one_is_trivial() {
        let task = Task::assignment().with_constraint(TimeRange::new(dt(8), dt(12)).unwrap());
        let parts = task.decomposer().scale_decompose(1).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].id(), task.id());
    }

    #[test]
    fn test_cartesian_product_size() {
        let task = Task::recommendation()
            .with_constraint(TimeRange::new(dt(0), dt(12)).unwrap())
            .with_constraint(
                SpatioLine::new(Coordinate::new(0.0, 0.0), Coordinate::new(9.0, 0.0), 1.0)
                    .unwrap(),
            )
            .with_constraint(PoiConstraint::new(Coordinate::new(1.0, 1.0)));

        let subs = task.decomposer().scale_decompose(3).unwrap();
        // two divisible constraints, one indivisible
        assert_eq!(subs.len(), 9);
        for sub in &subs {
            assert_eq!(sub.constraints().len(), 3);
            assert_eq!(sub.distribution_type(), DistributionType::Recommendation);
            assert!(sub.id() > task.id());
            assert!(sub.assignable());
        }
        match (&subs[0].constraints()[0], &subs[1].constraints()[0]) {
            (Constraint::TimeRange(a), Constraint::TimeRange(b)) => assert_eq!(a, b),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_failure_is_wrapped() {
        let task = Task::assignment().with_constraint(TimeRange::new(dt(8), dt(9)).unwrap());
        match task.decomposer().scale_decompose(-2) {
            Err(DecomposeError::Task { task: id, source }) => {
                assert_eq!(id, task.id());
                assert_eq!(*source, DecomposeError::InvalidScale(-2));
            }
            _ => panic!("expected wrapped error"),
        }
    }
}
