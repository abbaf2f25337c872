//! Shared greedy primitives.
//!
//! Every greedy strategy works on a [`GreedyState`]: a working copy of `D`
//! whose cells are poisoned to `+∞` as pairs become unusable. A row is
//! poisoned once its worker is full, a column once its task is filled,
//! and single cells once assigned.

use tracing::{debug, warn};

use super::problem::{AssignMap, AssignmentProblem};
use crate::interrupt::CancelToken;

pub(crate) struct GreedyState<'a> {
    problem: &'a AssignmentProblem,
    d: Vec<Vec<f64>>,
    map: AssignMap,
    task_load: Vec<usize>,
    stuck: Vec<bool>,
}

impl<'a> GreedyState<'a> {
    pub(crate) fn new(problem: &'a AssignmentProblem) -> Self {
        let mut state = Self {
            problem,
            d: problem.worker_task().to_vec(),
            map: AssignMap::new(problem.worker_count()),
            task_load: vec![0; problem.task_count()],
            stuck: vec![false; problem.task_count()],
        };
        for w in 0..problem.worker_count() {
            state.is_worker_full(w);
        }
        state
    }

    /// Starts from existing routes, poisoning every pair they use.
    pub(crate) fn with_routes(problem: &'a AssignmentProblem, map: &AssignMap) -> Self {
        let mut state = Self::new(problem);
        for (w, route) in map.routes().iter().enumerate() {
            for &t in route {
                state.assign(w, t);
            }
        }
        state
    }

    pub(crate) fn map(&self) -> &AssignMap {
        &self.map
    }

    pub(crate) fn into_map(self) -> AssignMap {
        self.map
    }

    /// True once the worker's route reaches `q`; poisons its row.
    pub(crate) fn is_worker_full(&mut self, w: usize) -> bool {
        if self.map.load(w) >= self.problem.capacity() {
            self.d[w].fill(f64::INFINITY);
            true
        } else {
            false
        }
    }

    /// True once the task has `p[t]` workers; poisons its column.
    pub(crate) fn is_task_filled(&mut self, t: usize) -> bool {
        if self.task_load[t] >= self.problem.requirement(t) {
            for row in &mut self.d {
                row[t] = f64::INFINITY;
            }
            true
        } else {
            false
        }
    }

    fn filled(&self, t: usize) -> bool {
        self.task_load[t] >= self.problem.requirement(t)
    }

    /// `p[t] − assigned_count(t)`.
    pub(crate) fn remaining(&self, t: usize) -> usize {
        self.problem.requirement(t).saturating_sub(self.task_load[t])
    }

    pub(crate) fn mark_stuck(&mut self, t: usize) {
        self.stuck[t] = true;
    }

    /// Tasks still eligible as seeds: unfilled and not stuck.
    pub(crate) fn open_tasks(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.problem.task_count()).filter(|&t| !self.filled(t) && !self.stuck[t])
    }

    pub(crate) fn all_filled(&self) -> bool {
        (0..self.problem.task_count()).all(|t| self.filled(t))
    }

    /// Worker with the smallest finite working cost for `t`, lowest index
    /// on ties.
    pub(crate) fn nearest_worker(&self, t: usize) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (w, row) in self.d.iter().enumerate() {
            let cost = row[t];
            if cost.is_finite() && best.map_or(true, |(_, b)| cost < b) {
                best = Some((w, cost));
            }
        }
        best.map(|(w, _)| w)
    }

    /// Task with the smallest finite working cost for `w`, lowest index on
    /// ties.
    pub(crate) fn nearest_task(&self, w: usize) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (t, &cost) in self.d[w].iter().enumerate() {
            if cost.is_finite() && best.map_or(true, |(_, b)| cost < b) {
                best = Some((t, cost));
            }
        }
        best.map(|(t, _)| t)
    }

    /// Globally smallest finite working cell, `(worker, task)` order on ties.
    pub(crate) fn nearest_pair(&self) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize, f64)> = None;
        for (w, row) in self.d.iter().enumerate() {
            for (t, &cost) in row.iter().enumerate() {
                if cost.is_finite() && best.map_or(true, |(_, _, b)| cost < b) {
                    best = Some((w, t, cost));
                }
            }
        }
        best.map(|(w, t, _)| (w, t))
    }

    pub(crate) fn has_reachable_task(&self, w: usize) -> bool {
        self.d[w].iter().any(|c| c.is_finite())
    }

    /// Records `(w, t)` and poisons the cell, plus the row or column if
    /// that made the worker full or the task filled.
    pub(crate) fn assign(&mut self, w: usize, t: usize) {
        self.map.push(w, t);
        self.task_load[t] += 1;
        self.d[w][t] = f64::INFINITY;
        self.is_worker_full(w);
        self.is_task_filled(t);
    }

    /// Chains further tasks onto `w` from its last task.
    ///
    /// Each step takes the nearest (ascending `C` row, lowest index on
    /// ties) task that `w` can still reach in the working matrix. Stops at
    /// capacity, when nothing is eligible, or after `taskNum − 1` steps.
    pub(crate) fn extend_route(&mut self, w: usize, cancel: &CancelToken) {
        let limit = self.problem.task_count().saturating_sub(1);
        for _ in 0..limit {
            if cancel.is_cancelled() || self.is_worker_full(w) {
                return;
            }
            let Some(&last) = self.map.route(w).last() else {
                return;
            };
            let next = (0..self.problem.task_count())
                .filter(|&t| self.d[w][t].is_finite() && self.problem.task_cost(last, t).is_finite())
                .min_by(|&a, &b| {
                    self.problem
                        .task_cost(last, a)
                        .total_cmp(&self.problem.task_cost(last, b))
                        .then(a.cmp(&b))
                });
            match next {
                Some(t) => self.assign(w, t),
                None => return,
            }
        }
    }

    /// Completion fill for every task still short of workers.
    ///
    /// Gives each short task the cheapest reachable worker with spare
    /// capacity that does not already serve it, then falls back to
    /// [`move_augment`]. Uses the original costs, not the working matrix.
    pub(crate) fn complete(&mut self, cancel: &CancelToken) {
        for t in 0..self.problem.task_count() {
            while self.remaining(t) > 0 {
                if cancel.is_cancelled() {
                    return;
                }
                if let Some(w) = cheapest_spare_worker(self.problem, &self.map, t) {
                    self.assign(w, t);
                } else if move_augment(self.problem, &mut self.map, t) {
                    self.task_load[t] += 1;
                    self.is_task_filled(t);
                } else {
                    break;
                }
            }
        }
        for w in 0..self.problem.worker_count() {
            self.is_worker_full(w);
        }
    }

    /// Logs when the map is incomplete.
    pub(crate) fn report(&self, algorithm: &str) {
        let short: Vec<usize> = (0..self.problem.task_count())
            .filter(|&t| !self.filled(t))
            .collect();
        if short.is_empty() {
            debug!(algorithm, pairs = self.map.pair_count(), "assignment complete");
        } else {
            warn!(algorithm, tasks = ?short, "assignment incomplete");
        }
    }
}

/// Reachable worker with spare capacity not already serving `t`, cheapest
/// first, lowest index on ties.
pub(crate) fn cheapest_spare_worker(
    problem: &AssignmentProblem,
    map: &AssignMap,
    t: usize,
) -> Option<usize> {
    (0..problem.worker_count())
        .filter(|&w| eligible(problem, map, w, t))
        .min_by(|&a, &b| problem.cost(a, t).total_cmp(&problem.cost(b, t)).then(a.cmp(&b)))
}

/// Whether `w` could take `t` directly.
pub(crate) fn eligible(problem: &AssignmentProblem, map: &AssignMap, w: usize, t: usize) -> bool {
    map.load(w) < problem.capacity() && problem.reachable(w, t) && !map.serves(w, t)
}

/// Frees room on a full worker for unfilled task `t`.
///
/// Finds a full worker `w` that can reach `t`, a task `t'` on its route,
/// and a worker `s` with spare capacity that can take `t'`; moves `t'`
/// from `w` to `s` and appends `t` to `w`. Among all such moves the one
/// with the lowest added out-and-back cost wins. Returns whether a move
/// was made.
pub(crate) fn move_augment(problem: &AssignmentProblem, map: &mut AssignMap, t: usize) -> bool {
    let workers = problem.worker_count();
    let mut best: Option<(usize, usize, usize, f64)> = None;

    for w in 0..workers {
        if map.load(w) < problem.capacity() || map.serves(w, t) || !problem.reachable(w, t) {
            continue;
        }
        for &moved in map.route(w) {
            for s in 0..workers {
                if s == w || !eligible(problem, map, s, moved) {
                    continue;
                }
                let delta = problem.cost(s, moved) + problem.cost(w, t) - problem.cost(w, moved);
                if best.map_or(true, |(_, _, _, b)| delta < b) {
                    best = Some((w, moved, s, delta));
                }
            }
        }
    }

    match best {
        Some((w, moved, s, _)) => {
            map.remove(w, moved);
            map.push(s, moved);
            map.push(w, t);
            debug!(task = t, from = w, to = s, moved, "move-augment");
            true
        }
        None => false,
    }
}

/// Task-seeded main loop shared by T_Most and T_Random.
///
/// `select` picks the next seed among [`GreedyState::open_tasks`]. A seed
/// with no reachable worker is marked stuck and skipped, so every
/// iteration either consumes a cell or retires a task.
pub(crate) fn run_task_seeded<F>(
    problem: &AssignmentProblem,
    algorithm: &str,
    cancel: &CancelToken,
    mut select: F,
) -> AssignMap
where
    F: FnMut(&GreedyState<'_>) -> Option<usize>,
{
    let mut state = GreedyState::new(problem);
    loop {
        if cancel.is_cancelled() {
            debug!(algorithm, "cancelled, returning partial map");
            return state.into_map();
        }
        let Some(seed) = select(&state) else {
            break;
        };
        match state.nearest_worker(seed) {
            Some(w) => {
                state.assign(w, seed);
                state.extend_route(w, cancel);
            }
            None => {
                warn!(algorithm, task = seed, "no reachable worker, skipping seed");
                state.mark_stuck(seed);
            }
        }
    }
    state.complete(cancel);
    state.report(algorithm);
    state.into_map()
}
