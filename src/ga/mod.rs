//! GGA_I: genetic worker–task assignment.
//!
//! Individuals are [`AssignMap`](crate::assignment::AssignMap)s. The
//! population is seeded with one NearestFirst map and random repaired
//! maps, then evolved with elitist roulette selection, task-membership
//! crossover and route-shuffle mutation.
//!
//! # Submodules
//!
//! - [`operators`]: crossover, mutation and feasibility repair
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization, and
//!   Machine Learning"
//! - Tong et al. (2020), "Spatial crowdsourcing: a survey", VLDB Journal 29

mod chromosome;
pub mod operators;
mod runner;

pub use chromosome::{fitness_of, AssignmentChromosome};
pub use runner::{Gga, GgaConfig, GgaResult, GgaRunner};
