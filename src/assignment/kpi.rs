//! Assignment quality metrics (KPIs).
//!
//! Computes matching indicators from an [`AssignMap`] and its problem.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total Cost | Σ route cost over workers |
//! | Coverage | Assigned pairs / Σp |
//! | Filled Tasks | Tasks with exactly p[t] workers |
//! | Utilization | Assigned pairs / (W·q) |
//! | Idle Workers | Workers with an empty route |
//! | Longest Route | Max tasks on one worker |

use super::{AssignMap, AssignmentProblem};

/// Assignment performance indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentKpi {
    /// Objective value of the map.
    pub total_cost: f64,
    /// Number of (worker, task) pairs.
    pub assigned_pairs: usize,
    /// Fraction of the total demand met (0.0..1.0).
    pub coverage: f64,
    /// Tasks served by exactly their required number of workers.
    pub filled_tasks: usize,
    /// Fraction of total worker capacity used (0.0..1.0).
    pub utilization: f64,
    /// Workers with no tasks.
    pub idle_workers: usize,
    /// Length of the longest route.
    pub longest_route: usize,
    /// Whether the map satisfies every requirement and capacity.
    pub complete: bool,
}

impl AssignmentKpi {
    /// Computes KPIs for a map.
    pub fn calculate(map: &AssignMap, problem: &AssignmentProblem) -> Self {
        let assigned_pairs = map.pair_count();
        let demand = problem.total_demand();
        let capacity = problem.worker_count() * problem.capacity();

        let filled_tasks = (0..problem.task_count())
            .filter(|&t| map.assigned_count(t) == problem.requirement(t))
            .count();

        // empty demand or capacity counts as fully covered / unused
        let coverage = if demand == 0 {
            1.0
        } else {
            (assigned_pairs as f64 / demand as f64).min(1.0)
        };
        let utilization = if capacity == 0 {
            0.0
        } else {
            assigned_pairs as f64 / capacity as f64
        };

        Self {
            total_cost: map.total_cost(problem),
            assigned_pairs,
            coverage,
            filled_tasks,
            utilization,
            idle_workers: map.routes().iter().filter(|r| r.is_empty()).count(),
            longest_route: map.routes().iter().map(Vec::len).max().unwrap_or(0),
            complete: map.is_complete(problem),
        }
    }

    /// Whether the map meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_cost: f64, min_coverage: f64) -> bool {
        self.total_cost <= max_cost && self.coverage >= min_coverage
    }
}
