//! Genetic operators for route-map chromosomes.
//!
//! - **Crossover**: swap the full worker set serving one random task
//!   between two parents, then repair both children.
//! - **Mutation**: shuffle one random route; memberships are left
//!   untouched.
//! - **Repair**: restore the capacity and requirement limits after a
//!   swap.

use rand::prelude::IndexedRandom;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::assignment::greedy::{eligible, move_augment};
use crate::assignment::{AssignMap, AssignmentProblem};

/// Task-membership swap crossover.
///
/// Picks one task uniformly and exchanges the set of workers serving it
/// between the two parents. Children are repaired before returning.
pub fn crossover<R: Rng + ?Sized>(
    problem: &AssignmentProblem,
    first: &AssignMap,
    second: &AssignMap,
    rng: &mut R,
) -> (AssignMap, AssignMap) {
    let tasks = problem.task_count();
    if tasks == 0 {
        return (first.clone(), second.clone());
    }
    let t = rng.random_range(0..tasks);
    let from_first = first.workers_for(t);
    let from_second = second.workers_for(t);

    let mut a = first.clone();
    let mut b = second.clone();
    rebind(&mut a, t, &from_second);
    rebind(&mut b, t, &from_first);
    repair(problem, &mut a, rng);
    repair(problem, &mut b, rng);
    (a, b)
}

/// Makes `workers` the exact set serving `task`.
fn rebind(map: &mut AssignMap, task: usize, workers: &[usize]) {
    for w in 0..map.worker_count() {
        map.remove(w, task);
    }
    for &w in workers {
        map.push(w, task);
    }
}

/// Shuffles one random route in place.
///
/// Only routes with at least two tasks are drawn.
pub fn mutate<R: Rng + ?Sized>(map: &mut AssignMap, rng: &mut R) {
    let busy: Vec<usize> = (0..map.worker_count())
        .filter(|&w| map.load(w) > 1)
        .collect();
    if let Some(&w) = busy.choose(rng) {
        map.route_mut(w).shuffle(rng);
    }
}

/// Restores feasibility after crossover.
///
/// 1. Drops forbidden pairs and duplicate visits.
/// 2. Drops random surplus tasks from workers over `q`.
/// 3. Drops random surplus workers from tasks over `p[t]`.
/// 4. Gives short tasks random eligible spare workers, falling back to a
///    move-augment when none is left.
pub fn repair<R: Rng + ?Sized>(problem: &AssignmentProblem, map: &mut AssignMap, rng: &mut R) {
    let workers = map.worker_count();
    let tasks = problem.task_count();

    for w in 0..workers {
        let route = map.route_mut(w);
        let mut seen = vec![false; tasks];
        route.retain(|&t| {
            let keep = t < tasks && !seen[t] && problem.reachable(w, t);
            if keep {
                seen[t] = true;
            }
            keep
        });
    }

    for w in 0..workers {
        while map.load(w) > problem.capacity() {
            let i = rng.random_range(0..map.load(w));
            map.route_mut(w).remove(i);
        }
    }

    for t in 0..tasks {
        let mut serving = map.workers_for(t);
        while serving.len() > problem.requirement(t) {
            let i = rng.random_range(0..serving.len());
            map.remove(serving.swap_remove(i), t);
        }
    }

    for t in 0..tasks {
        let mut missing = problem.requirement(t).saturating_sub(map.assigned_count(t));
        while missing > 0 {
            let spare: Vec<usize> = (0..workers)
                .filter(|&w| eligible(problem, map, w, t))
                .collect();
            let placed = match spare.choose(rng) {
                Some(&w) => {
                    map.push(w, t);
                    true
                }
                None => move_augment(problem, map, t),
            };
            if !placed {
                break;
            }
            missing -= 1;
        }
    }
}
