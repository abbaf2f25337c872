//! Route-map chromosome for the assignment GA.
//!
//! # Encoding
//!
//! A chromosome is an [`AssignMap`]: one ordered route of task indices per
//! worker. Task-to-worker membership and visiting order are both encoded,
//! so crossover exchanges memberships and mutation reorders routes.
//!
//! Fitness is `1 / total_cost` with the cost floored at `1e-9`; an
//! individual with every route empty scores 0. Higher is better.

use rand::prelude::IndexedRandom;
use rand::seq::SliceRandom;
use rand::Rng;

use super::operators::repair;
use crate::assignment::{AssignMap, AssignmentProblem};

const MIN_COST: f64 = 1e-9;

/// Fitness of a map for `problem`.
pub fn fitness_of(map: &AssignMap, problem: &AssignmentProblem) -> f64 {
    if map.is_empty() {
        return 0.0;
    }
    1.0 / map.total_cost(problem).max(MIN_COST)
}

/// An assignment individual with cached fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentChromosome {
    assignment: AssignMap,
    fitness: f64,
}

impl AssignmentChromosome {
    /// Wraps a map and evaluates it.
    pub fn new(assignment: AssignMap, problem: &AssignmentProblem) -> Self {
        let fitness = fitness_of(&assignment, problem);
        Self {
            assignment,
            fitness,
        }
    }

    /// Builds a random repaired individual.
    ///
    /// Draws reachable `(worker, task)` pairs uniformly, keeping a draw
    /// only when the worker has spare capacity, the task still needs
    /// workers and the pair is new. Every route is then shuffled.
    pub fn random<R: Rng + ?Sized>(problem: &AssignmentProblem, rng: &mut R) -> Self {
        let workers = problem.worker_count();
        let tasks = problem.task_count();
        let pairs: Vec<(usize, usize)> = (0..workers)
            .flat_map(|w| (0..tasks).map(move |t| (w, t)))
            .filter(|&(w, t)| problem.reachable(w, t))
            .collect();

        let mut map = AssignMap::new(workers);
        let mut task_load = vec![0usize; tasks];
        let mut open = problem.total_demand();
        let mut attempts = pairs.len() * 4;

        while open > 0 && attempts > 0 {
            attempts -= 1;
            let Some(&(w, t)) = pairs.choose(rng) else {
                break;
            };
            if map.load(w) < problem.capacity()
                && task_load[t] < problem.requirement(t)
                && !map.serves(w, t)
            {
                map.push(w, t);
                task_load[t] += 1;
                open -= 1;
            }
        }

        for w in 0..workers {
            map.route_mut(w).shuffle(rng);
        }
        repair(problem, &mut map, rng);
        Self::new(map, problem)
    }

    pub fn assignment(&self) -> &AssignMap {
        &self.assignment
    }

    pub(crate) fn assignment_mut(&mut self) -> &mut AssignMap {
        &mut self.assignment
    }

    pub fn into_assignment(self) -> AssignMap {
        self.assignment
    }

    /// Cached fitness (higher = better).
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Recomputes the cached fitness.
    pub fn evaluate(&mut self, problem: &AssignmentProblem) {
        self.fitness = fitness_of(&self.assignment, problem);
    }
}
