//! Assignment working set and result map.

use serde::{Deserialize, Serialize};

use crate::validation::{validate_problem, ValidationError};

/// A worker–task matching instance.
///
/// - `D[w][t]`: cost of worker `w` travelling to task `t`; `+∞` forbids
///   the pair.
/// - `C[a][b]`: cost of moving from task `a` to task `b`; the diagonal is
///   forced to `+∞`.
/// - `p[t]`: number of workers task `t` needs.
/// - `q`: maximum number of tasks per worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentProblem {
    worker_task: Vec<Vec<f64>>,
    task_task: Vec<Vec<f64>>,
    requirements: Vec<usize>,
    capacity: usize,
}

impl AssignmentProblem {
    /// Creates a validated problem.
    ///
    /// Fails when the matrices do not match `requirements.len()` tasks,
    /// when a cost is NaN or negative, or when a task requires zero
    /// workers. A capacity of 0 is allowed and makes every worker full.
    pub fn new(
        worker_task: Vec<Vec<f64>>,
        mut task_task: Vec<Vec<f64>>,
        requirements: Vec<usize>,
        capacity: usize,
    ) -> Result<Self, Vec<ValidationError>> {
        validate_problem(&worker_task, &task_task, &requirements)?;
        for (t, row) in task_task.iter_mut().enumerate() {
            row[t] = f64::INFINITY;
        }
        Ok(Self {
            worker_task,
            task_task,
            requirements,
            capacity,
        })
    }

    /// Like [`new`](Self::new) with the same requirement for every task.
    pub fn uniform(
        worker_task: Vec<Vec<f64>>,
        task_task: Vec<Vec<f64>>,
        workers_per_task: usize,
        capacity: usize,
    ) -> Result<Self, Vec<ValidationError>> {
        let tasks = task_task.len();
        Self::new(worker_task, task_task, vec![workers_per_task; tasks], capacity)
    }

    pub fn worker_count(&self) -> usize {
        self.worker_task.len()
    }

    pub fn task_count(&self) -> usize {
        self.requirements.len()
    }

    /// `D[w][t]`.
    pub fn cost(&self, worker: usize, task: usize) -> f64 {
        self.worker_task[worker][task]
    }

    /// `C[a][b]`.
    pub fn task_cost(&self, from: usize, to: usize) -> f64 {
        self.task_task[from][to]
    }

    pub(crate) fn worker_task(&self) -> &[Vec<f64>] {
        &self.worker_task
    }

    /// Whether worker and task may be paired.
    pub fn reachable(&self, worker: usize, task: usize) -> bool {
        self.worker_task[worker][task].is_finite()
    }

    /// `p[t]`.
    pub fn requirement(&self, task: usize) -> usize {
        self.requirements[task]
    }

    pub fn requirements(&self) -> &[usize] {
        &self.requirements
    }

    /// `q`.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `Σp`.
    pub fn total_demand(&self) -> usize {
        self.requirements.iter().sum()
    }

    /// Whether the counts admit a complete map: `Σp ≤ W·q` and no task
    /// needs more workers than exist. Reachability is not considered.
    pub fn is_feasible(&self) -> bool {
        let workers = self.worker_count();
        self.total_demand() <= workers * self.capacity
            && self.requirements.iter().all(|&p| p <= workers)
    }

    /// Cost of one worker's route: out to the first task, along
    /// consecutive tasks, back from the last. Empty routes cost 0.
    pub fn route_cost(&self, worker: usize, route: &[usize]) -> f64 {
        let (Some(&first), Some(&last)) = (route.first(), route.last()) else {
            return 0.0;
        };
        let along: f64 = route
            .windows(2)
            .map(|pair| self.task_cost(pair[0], pair[1]))
            .sum();
        self.cost(worker, first) + along + self.cost(worker, last)
    }
}

/// Worker → ordered route of task indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignMap {
    routes: Vec<Vec<usize>>,
}

impl AssignMap {
    /// Empty routes for `workers` workers.
    pub fn new(workers: usize) -> Self {
        Self {
            routes: vec![Vec::new(); workers],
        }
    }

    /// Builds a map from explicit routes.
    pub fn from_routes(routes: Vec<Vec<usize>>) -> Self {
        Self { routes }
    }

    pub fn worker_count(&self) -> usize {
        self.routes.len()
    }

    pub fn route(&self, worker: usize) -> &[usize] {
        &self.routes[worker]
    }

    pub fn routes(&self) -> &[Vec<usize>] {
        &self.routes
    }

    pub(crate) fn route_mut(&mut self, worker: usize) -> &mut Vec<usize> {
        &mut self.routes[worker]
    }

    /// Replaces one worker's route.
    pub fn set_route(&mut self, worker: usize, route: Vec<usize>) {
        self.routes[worker] = route;
    }

    /// Appends `task` to the worker's route.
    pub fn push(&mut self, worker: usize, task: usize) {
        self.routes[worker].push(task);
    }

    /// Removes `task` from the worker's route; returns whether it was there.
    pub fn remove(&mut self, worker: usize, task: usize) -> bool {
        let route = &mut self.routes[worker];
        match route.iter().position(|&t| t == task) {
            Some(i) => {
                route.remove(i);
                true
            }
            None => false,
        }
    }

    /// Number of workers serving `task`.
    pub fn assigned_count(&self, task: usize) -> usize {
        self.routes.iter().filter(|r| r.contains(&task)).count()
    }

    /// Workers serving `task`, ascending.
    pub fn workers_for(&self, task: usize) -> Vec<usize> {
        (0..self.routes.len())
            .filter(|&w| self.routes[w].contains(&task))
            .collect()
    }

    pub fn serves(&self, worker: usize, task: usize) -> bool {
        self.routes[worker].contains(&task)
    }

    /// Route length of `worker`.
    pub fn load(&self, worker: usize) -> usize {
        self.routes[worker].len()
    }

    /// Total number of (worker, task) pairs.
    pub fn pair_count(&self) -> usize {
        self.routes.iter().map(Vec::len).sum()
    }

    /// Whether every route is empty.
    pub fn is_empty(&self) -> bool {
        self.routes.iter().all(Vec::is_empty)
    }

    /// Objective: the sum of [`AssignmentProblem::route_cost`] over workers.
    pub fn total_cost(&self, problem: &AssignmentProblem) -> f64 {
        self.routes
            .iter()
            .enumerate()
            .map(|(w, route)| problem.route_cost(w, route))
            .sum()
    }

    /// Every task served by exactly `p[t]` workers, no route over `q`, no
    /// duplicated or forbidden pair.
    pub fn is_complete(&self, problem: &AssignmentProblem) -> bool {
        let mut counts = vec![0usize; problem.task_count()];
        for (w, route) in self.routes.iter().enumerate() {
            if route.len() > problem.capacity() {
                return false;
            }
            for (i, &t) in route.iter().enumerate() {
                if t >= counts.len() || route[..i].contains(&t) || !problem.reachable(w, t) {
                    return false;
                }
                counts[t] += 1;
            }
        }
        counts
            .iter()
            .zip(problem.requirements())
            .all(|(&have, &need)| have == need)
    }

    /// Per-task worker lists, ascending by worker.
    pub fn by_task(&self, task_count: usize) -> Vec<Vec<usize>> {
        let mut out = vec![Vec::new(); task_count];
        for (w, route) in self.routes.iter().enumerate() {
            for &t in route {
                if let Some(workers) = out.get_mut(t) {
                    workers.push(w);
                }
            }
        }
        out
    }
}
