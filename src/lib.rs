//! Crowdsourcing task assignment for the U-Engine ecosystem.
//!
//! Provides the constraint model and its decomposition engine, greedy and
//! genetic worker–task matching, and a scheduler that binds one named
//! strategy at a time.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `Participant`, `Condition`, `Coordinate`
//! - **`constraint`**: Spatial, temporal, dependence and registered custom
//!   constraints
//! - **`decompose`**: The `Decomposer` trait and even range splitting
//! - **`assignment`**: `AssignmentProblem`, `AssignMap` and the greedy
//!   strategies (T_Most, T_Random, PT_Most, NearestFirst)
//! - **`ga`**: GGA_I genetic assignment
//! - **`scheduler`**: Algorithm factories, registry and `Scheduler`
//! - **`kernel`**: Task and participant pools behind one handle
//! - **`interrupt`**: Cooperative cancellation tokens
//! - **`validation`**: Input integrity checks (duplicate IDs, dependence
//!   cycles, matrix shapes)
//!
//! # Architecture
//!
//! Control flows from `Kernel` to the active `AlgoFactory`, which builds
//! distance matrices from task POIs and participant locations and runs one
//! assignment strategy over them. Constraints are evaluated against
//! participant abilities through `Task::can_assign_to`.
//!
//! # References
//!
//! - Tong et al. (2020), "Spatial crowdsourcing: a survey", VLDB Journal 29
//! - Kazemi & Shahabi (2012), "GeoCrowd: Enabling Query Answering with
//!   Spatial Crowdsourcing"

pub mod assignment;
pub mod constraint;
pub mod decompose;
pub mod error;
pub mod ga;
pub mod interrupt;
pub mod kernel;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{ConstraintError, DecomposeError, KernelError, SchedulerError};
pub use kernel::{Kernel, KernelBuilder};
