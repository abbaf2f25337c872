//! Input validation for assignment problems.
//!
//! Checks structural integrity of task pools, participant pools, and cost
//! matrices before matching. Detects:
//! - Duplicate IDs
//! - Prerequisites outside the pool
//! - Circular task dependencies (DAG validation)
//! - Cost matrices with mismatched dimensions, NaN or negative entries
//! - Zero worker requirements
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{HashMap, HashSet};

use crate::constraint::Constraint;
use crate::models::{Participant, Task, TaskHandle, TaskId};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A dependence constraint names an unfinished task outside the pool.
    UnknownPrerequisite,
    /// Dependence graph contains a cycle.
    CyclicDependency,
    /// A cost matrix does not match the worker and task counts.
    DimensionMismatch,
    /// A cost is NaN or negative.
    InvalidCost,
    /// A task requires zero workers.
    InvalidRequirement,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn prerequisites(task: &Task) -> impl Iterator<Item = &TaskHandle> {
    task.constraints().iter().flat_map(|c| match c {
        Constraint::Dependence(dep) => dep.prerequisites(),
        _ => &[][..],
    })
}

/// Validates a task pool.
///
/// Checks:
/// 1. No duplicate task IDs
/// 2. Every unfinished prerequisite is in the pool
/// 3. No circular dependencies
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_tasks(tasks: &[Task]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut task_ids = HashSet::new();
    for task in tasks {
        if !task_ids.insert(task.id()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id()),
            ));
        }
    }

    for task in tasks {
        for pre in prerequisites(task) {
            if !task_ids.contains(&pre.id()) && !pre.finished() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownPrerequisite,
                    format!(
                        "Task '{}' depends on unknown task '{}'",
                        task.id(),
                        pre.id()
                    ),
                ));
            }
        }
    }

    if let Some(cycle_err) = detect_cycles(tasks) {
        errors.push(cycle_err);
    }

    finish(errors)
}

/// Validates a participant pool: IDs must be unique.
pub fn validate_participants(participants: &[Participant]) -> ValidationResult {
    let mut seen = HashSet::new();
    let errors = participants
        .iter()
        .filter(|p| !seen.insert(p.id.as_str()))
        .map(|p| {
            ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate participant ID: {}", p.id),
            )
        })
        .collect();
    finish(errors)
}

/// Validates an assignment working set.
///
/// `worker_task` must be `W × T` and `task_task` must be `T × T`, where
/// `T = requirements.len()`. Costs may be `+∞` (unreachable) but never
/// NaN or negative. Diagonal entries of `task_task` are not checked.
pub fn validate_problem(
    worker_task: &[Vec<f64>],
    task_task: &[Vec<f64>],
    requirements: &[usize],
) -> ValidationResult {
    let mut errors = Vec::new();
    let tasks = requirements.len();

    for (w, row) in worker_task.iter().enumerate() {
        if row.len() != tasks {
            errors.push(ValidationError::new(
                ValidationErrorKind::DimensionMismatch,
                format!("Worker row {w} has {} costs, expected {tasks}", row.len()),
            ));
        }
        check_costs(&mut errors, "worker", w, row, None);
    }

    if task_task.len() != tasks {
        errors.push(ValidationError::new(
            ValidationErrorKind::DimensionMismatch,
            format!("Task matrix has {} rows, expected {tasks}", task_task.len()),
        ));
    }
    for (t, row) in task_task.iter().enumerate() {
        if row.len() != tasks {
            errors.push(ValidationError::new(
                ValidationErrorKind::DimensionMismatch,
                format!("Task row {t} has {} costs, expected {tasks}", row.len()),
            ));
        }
        check_costs(&mut errors, "task", t, row, Some(t));
    }

    for (t, &p) in requirements.iter().enumerate() {
        if p == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidRequirement,
                format!("Task {t} requires zero workers"),
            ));
        }
    }

    finish(errors)
}

fn check_costs(
    errors: &mut Vec<ValidationError>,
    label: &str,
    row_index: usize,
    row: &[f64],
    skip: Option<usize>,
) {
    for (col, &cost) in row.iter().enumerate() {
        if Some(col) == skip {
            continue;
        }
        if cost.is_nan() || cost < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCost,
                format!("Invalid cost {cost} at {label} row {row_index}, column {col}"),
            ));
        }
    }
}

/// Detects cycles in the dependence graph using DFS.
///
/// # Algorithm
/// Topological sort via DFS. If a back-edge is found (visiting a node
/// currently in the recursion stack), a cycle exists.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
fn detect_cycles(tasks: &[Task]) -> Option<ValidationError> {
    // prerequisite → dependents
    let mut adj: HashMap<TaskId, Vec<TaskId>> = HashMap::new();
    let mut all_ids: Vec<TaskId> = Vec::new();

    for task in tasks {
        all_ids.push(task.id());
        for pre in prerequisites(task) {
            adj.entry(pre.id()).or_default().push(task.id());
        }
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for &node in &all_ids {
        if !visited.contains(&node) && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency detected involving task '{node}'"),
            ));
        }
    }

    None
}

fn has_cycle_dfs(
    node: TaskId,
    adj: &HashMap<TaskId, Vec<TaskId>>,
    visited: &mut HashSet<TaskId>,
    in_stack: &mut HashSet<TaskId>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(&node) {
        for &next in neighbors {
            if in_stack.contains(&next) {
                return true; // Back edge → cycle
            }
            if !visited.contains(&next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(&node);
    false
}
