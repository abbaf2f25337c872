//! Error types.
//!
//! Construction-time validation failures are [`ConstraintError`]s and are
//! never retried. Splitting failures are surfaced as a single
//! [`DecomposeError`] kind that wraps the underlying cause, so callers can
//! retry with another scale or fall back to `trivial_decompose()`.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::TaskId;

/// A constraint could not be constructed from the given parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstraintError {
    /// Radius must be strictly positive.
    #[error("radius must be positive, got {0}")]
    NonPositiveRadius(f64),

    /// Corridor width must be strictly positive.
    #[error("corridor width must be positive, got {0}")]
    NonPositiveWidth(f64),

    /// Rectangle corners share a longitude or latitude.
    #[error("rectangle corners {0} and {1} are in line")]
    DegenerateRectangle(String, String),

    /// Line start and end coincide.
    #[error("line endpoints coincide at {0}")]
    DegenerateLine(String),

    /// Not enough points to describe the shape.
    #[error("{shape} needs at least {min} points, got {got}")]
    TooFewPoints {
        shape: &'static str,
        min: usize,
        got: usize,
    },

    /// Two consecutive polygon vertices are equal.
    #[error("polygon repeats vertex {index} consecutively")]
    DuplicateVertex { index: usize },

    /// All polygon vertices are collinear.
    #[error("polygon has zero area")]
    ZeroArea,

    /// Two non-adjacent polygon edges cross.
    #[error("polygon edges {first} and {second} intersect")]
    SelfIntersecting { first: usize, second: usize },

    /// Range bounds are out of order.
    #[error("invalid range {start} .. {end}")]
    InvertedRange { start: String, end: String },

    /// Deadline lies before the issue date.
    #[error("deadline {end} is before {today}")]
    DeadlineInPast { end: NaiveDate, today: NaiveDate },

    /// A time-of-day tolerance window crosses midnight.
    #[error("window {time} ± {shift_minutes}min wraps around midnight")]
    WindowWrapsDay { time: String, shift_minutes: i64 },

    /// A date or time string could not be parsed.
    #[error("cannot parse '{input}': {reason}")]
    Parse { input: String, reason: String },

    /// No builder is registered under this custom type name.
    #[error("unknown constraint type '{0}'")]
    UnknownType(String),

    /// A registered validator rejected the argument list.
    #[error("invalid arguments for '{type_name}': {reason}")]
    InvalidArguments { type_name: String, reason: String },
}

/// A constraint or task could not be split at the requested scale.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecomposeError {
    /// Scale must be at least 1.
    #[error("invalid decompose scale {0}")]
    InvalidScale(i32),

    /// The range is too short for the requested number of parts.
    #[error("cannot split into {scale} parts: {reason}")]
    InvalidSubRange { scale: i32, reason: String },

    /// A produced sub-constraint failed validation.
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    /// A custom constraint could not be rebuilt from its descriptor.
    #[error("cannot reconstruct '{type_name}': {source}")]
    Reconstruct {
        type_name: String,
        #[source]
        source: ConstraintError,
    },

    /// One of the task's constraints failed to decompose.
    #[error("task {task} decomposition failed: {source}")]
    Task {
        task: TaskId,
        #[source]
        source: Box<DecomposeError>,
    },
}

/// Strategy lookup and registration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// No factory is registered under this name.
    #[error("unknown algorithm '{name}', choose one of: {}", .available.join(", "))]
    UnknownAlgorithm {
        name: String,
        available: Vec<String>,
    },

    /// A factory with this name is already registered.
    #[error("algorithm '{0}' is already registered")]
    DuplicateAlgorithm(String),
}

/// Kernel-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// A participant with this id is already registered.
    #[error("participant '{0}' is already registered")]
    DuplicateParticipant(String),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}
