//! GGA_I generational loop.
//!
//! # Algorithm
//!
//! 1. Seed individual 0 with [`NearestFirst`]; build the rest randomly.
//! 2. Per generation:
//!    - **Selection**: keep `clone_count` copies of the best individual,
//!      fill the rest by roulette over `fitness / (Σfitness − best)`.
//!    - **Crossover**: once, with probability `crossover_rate`, between
//!      two distinct individuals.
//!    - **Mutation**: each individual with probability `mutation_rate`.
//! 3. Track the best individual seen in any generation.
//!
//! The token is polled between generations; a cancelled run returns the
//! best individual found so far.

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::chromosome::AssignmentChromosome;
use super::operators::{crossover, mutate};
use crate::assignment::{AssignMap, AssignmentAlgorithm, AssignmentProblem, NearestFirst};
use crate::interrupt::CancelToken;

/// GGA_I parameters.
///
/// # Example
/// ```
/// use u_crowd::ga::GgaConfig;
///
/// let config = GgaConfig::default()
///     .with_population_size(40)
///     .with_max_generations(50)
///     .with_seed(42);
/// assert_eq!(config.clone_count, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GgaConfig {
    /// Individuals per generation.
    pub population_size: usize,
    /// Generations to run.
    pub max_generations: usize,
    /// Probability of the per-generation crossover.
    pub crossover_rate: f64,
    /// Per-individual mutation probability.
    pub mutation_rate: f64,
    /// Elite copies carried into each generation.
    pub clone_count: usize,
    /// Fixed RNG seed; `None` uses the caller's RNG.
    pub seed: Option<u64>,
}

impl Default for GgaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 300,
            crossover_rate: 0.98,
            mutation_rate: 0.4,
            clone_count: 3,
            seed: None,
        }
    }
}

/// Clamps a probability to [0, 1]; non-finite values take `fallback`.
fn probability(rate: f64, fallback: f64) -> f64 {
    if rate.is_finite() {
        rate.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

impl GgaConfig {
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the crossover probability, clamped to [0, 1].
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = probability(rate, Self::default().crossover_rate);
        self
    }

    /// Sets the mutation probability, clamped to [0, 1].
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = probability(rate, Self::default().mutation_rate);
        self
    }

    pub fn with_clone_count(mut self, count: usize) -> Self {
        self.clone_count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Outcome of a GGA_I run.
#[derive(Debug, Clone)]
pub struct GgaResult {
    /// Best individual seen across all generations.
    pub best: AssignMap,
    /// Fitness of `best`.
    pub best_fitness: f64,
    /// Generations completed.
    pub generations: usize,
    /// Best-so-far fitness after each generation; non-decreasing.
    pub history: Vec<f64>,
    /// Whether the run stopped on the cancel token.
    pub cancelled: bool,
}

/// Runs GGA_I.
pub struct GgaRunner;

impl GgaRunner {
    /// Runs with the config's seed when set, else with `rng`.
    pub fn run(
        problem: &AssignmentProblem,
        config: &GgaConfig,
        rng: &mut dyn RngCore,
        cancel: &CancelToken,
    ) -> GgaResult {
        match config.seed {
            Some(seed) => Self::evolve(problem, config, &mut SmallRng::seed_from_u64(seed), cancel),
            None => Self::evolve(problem, config, rng, cancel),
        }
    }

    fn evolve<R: Rng + ?Sized>(
        problem: &AssignmentProblem,
        config: &GgaConfig,
        rng: &mut R,
        cancel: &CancelToken,
    ) -> GgaResult {
        let size = config.population_size.max(1);
        let defaults = GgaConfig::default();
        // deserialized configs bypass the builders
        let crossover_rate = probability(config.crossover_rate, defaults.crossover_rate);
        let mutation_rate = probability(config.mutation_rate, defaults.mutation_rate);
        let mut population = Self::initial_population(problem, size, rng, cancel);

        let mut best = Self::fittest(&population).clone();
        let mut history = Vec::with_capacity(config.max_generations);
        let mut cancelled = false;

        for generation in 0..config.max_generations {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            population = Self::select(&population, size, config.clone_count, rng);

            if population.len() >= 2 && rng.random_bool(crossover_rate) {
                let i = rng.random_range(0..population.len());
                let mut j = rng.random_range(0..population.len() - 1);
                if j >= i {
                    j += 1;
                }
                let (a, b) = crossover(
                    problem,
                    population[i].assignment(),
                    population[j].assignment(),
                    rng,
                );
                population[i] = AssignmentChromosome::new(a, problem);
                population[j] = AssignmentChromosome::new(b, problem);
            }

            for individual in &mut population {
                if rng.random_bool(mutation_rate) {
                    mutate(individual.assignment_mut(), rng);
                    individual.evaluate(problem);
                }
            }

            let fittest = Self::fittest(&population);
            if fittest.fitness() > best.fitness() {
                debug!(generation, fitness = fittest.fitness(), "new best individual");
                best = fittest.clone();
            }
            history.push(best.fitness());
        }

        debug!(
            generations = history.len(),
            best_fitness = best.fitness(),
            cancelled,
            "GGA_I finished"
        );
        let best_fitness = best.fitness();
        GgaResult {
            best: best.into_assignment(),
            best_fitness,
            generations: history.len(),
            history,
            cancelled,
        }
    }

    fn initial_population<R: Rng + ?Sized>(
        problem: &AssignmentProblem,
        size: usize,
        rng: &mut R,
        cancel: &CancelToken,
    ) -> Vec<AssignmentChromosome> {
        // NearestFirst draws no randomness
        let mut unused = SmallRng::seed_from_u64(0);
        let seed = NearestFirst.solve(problem, &mut unused, cancel);

        let mut population = Vec::with_capacity(size);
        population.push(AssignmentChromosome::new(seed, problem));
        while population.len() < size {
            population.push(AssignmentChromosome::random(problem, rng));
        }
        population
    }

    /// Highest fitness, lowest index on ties.
    fn fittest(population: &[AssignmentChromosome]) -> &AssignmentChromosome {
        let mut best = &population[0];
        for individual in &population[1..] {
            if individual.fitness() > best.fitness() {
                best = individual;
            }
        }
        best
    }

    /// Elitist roulette selection.
    fn select<R: Rng + ?Sized>(
        population: &[AssignmentChromosome],
        size: usize,
        clone_count: usize,
        rng: &mut R,
    ) -> Vec<AssignmentChromosome> {
        let best_index = (0..population.len())
            .fold(0, |b, i| if population[i].fitness() > population[b].fitness() { i } else { b });
        let best = &population[best_index];
        let rest: Vec<&AssignmentChromosome> = population
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != best_index)
            .map(|(_, c)| c)
            .collect();
        let total: f64 = rest.iter().map(|c| c.fitness()).sum();

        let mut next = Vec::with_capacity(size);
        for _ in 0..clone_count.min(size) {
            next.push(best.clone());
        }
        while next.len() < size {
            let pick = match rest.last() {
                None => best,
                Some(_) if total <= 0.0 => rest[rng.random_range(0..rest.len())],
                Some(&last) => {
                    let r: f64 = rng.random();
                    let mut cumulative = 0.0;
                    rest.iter()
                        .copied()
                        .find(|c| {
                            cumulative += c.fitness() / total;
                            r < cumulative
                        })
                        .unwrap_or(last)
                }
            };
            next.push(pick.clone());
        }
        next
    }
}

/// GGA_I as an [`AssignmentAlgorithm`].
#[derive(Debug, Clone, Default)]
pub struct Gga {
    config: GgaConfig,
}

impl Gga {
    pub fn new(config: GgaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GgaConfig {
        &self.config
    }
}

impl AssignmentAlgorithm for Gga {
    fn name(&self) -> &'static str {
        "GGA_I"
    }

    fn solve(
        &self,
        problem: &AssignmentProblem,
        rng: &mut dyn RngCore,
        cancel: &CancelToken,
    ) -> AssignMap {
        GgaRunner::run(problem, &self.config, rng, cancel).best
    }

    fn description(&self) -> &'static str {
        "Genetic assignment with elitist roulette selection"
    }
}
