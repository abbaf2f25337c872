//! Distance metrics and cost-matrix construction.
//!
//! Matching factories turn a task batch and a candidate list into an
//! [`AssignmentProblem`]: `D` from candidate to task POI, `C` between task
//! POIs, both through one [`DistanceMetric`]. A candidate that fails a
//! task's `can_assign_to` gets `+∞` for that pair.

use std::fmt::Debug;

use crate::assignment::AssignmentProblem;
use crate::models::{Coordinate, Participant, Task};
use crate::validation::ValidationError;

use super::AssignmentConfig;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A distance between two coordinates.
pub trait DistanceMetric: Send + Sync + Debug {
    /// Metric name (e.g., "SquaredEuclidean").
    fn name(&self) -> &'static str;

    /// Non-negative distance from `a` to `b`.
    fn distance(&self, a: &Coordinate, b: &Coordinate) -> f64;
}

/// Squared planar distance. The default matching metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredEuclidean;

impl DistanceMetric for SquaredEuclidean {
    fn name(&self) -> &'static str {
        "SquaredEuclidean"
    }

    fn distance(&self, a: &Coordinate, b: &Coordinate) -> f64 {
        a.distance_squared(b)
    }
}

/// Great-circle distance in kilometres, reading coordinates as degrees.
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl DistanceMetric for Haversine {
    fn name(&self) -> &'static str {
        "Haversine"
    }

    fn distance(&self, a: &Coordinate, b: &Coordinate) -> f64 {
        let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (b.longitude - a.longitude).to_radians();
        let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
    }
}

/// POI of every task, in order; `None` if any task lacks exactly one.
pub fn task_locations(tasks: &[Task]) -> Option<Vec<Coordinate>> {
    tasks.iter().map(Task::poi).collect()
}

/// Participants eligible for matching against `tasks`: available, with a
/// declared location, and assignable to at least one task.
pub fn matching_candidates(tasks: &[Task], participants: &[Participant]) -> Vec<Participant> {
    participants
        .iter()
        .filter(|p| p.available() && p.location().is_some())
        .filter(|p| tasks.iter().any(|t| t.can_assign_to(p)))
        .cloned()
        .collect()
}

/// Builds the matching instance for a batch.
///
/// `locations` must be the tasks' POIs from [`task_locations`].
pub fn build_problem(
    tasks: &[Task],
    locations: &[Coordinate],
    candidates: &[Participant],
    metric: &dyn DistanceMetric,
    config: &AssignmentConfig,
) -> Result<AssignmentProblem, Vec<ValidationError>> {
    let worker_task = candidates
        .iter()
        .map(|p| {
            tasks
                .iter()
                .zip(locations)
                .map(|(task, poi)| match p.location() {
                    Some(at) if task.can_assign_to(p) => metric.distance(&at, poi),
                    _ => f64::INFINITY,
                })
                .collect()
        })
        .collect();

    let task_task = locations
        .iter()
        .map(|a| locations.iter().map(|b| metric.distance(a, b)).collect())
        .collect();

    AssignmentProblem::uniform(
        worker_task,
        task_task,
        config.workers_per_task,
        config.tasks_per_worker,
    )
}
