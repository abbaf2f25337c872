//! Matching configuration.

use serde::{Deserialize, Serialize};

/// Requirement and capacity settings for matching factories.
///
/// # Example
/// ```
/// use u_crowd::scheduler::AssignmentConfig;
///
/// let config = AssignmentConfig::default()
///     .with_workers_per_task(2)
///     .with_seed(7);
/// assert_eq!(config.tasks_per_worker, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentConfig {
    /// `p[t]` for every task.
    pub workers_per_task: usize,
    /// `q`: maximum route length per worker.
    pub tasks_per_worker: usize,
    /// Fixed RNG seed for reproducible matching; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            workers_per_task: 1,
            tasks_per_worker: 1,
            seed: None,
        }
    }
}

impl AssignmentConfig {
    pub fn with_workers_per_task(mut self, workers: usize) -> Self {
        self.workers_per_task = workers;
        self
    }

    pub fn with_tasks_per_worker(mut self, tasks: usize) -> Self {
        self.tasks_per_worker = tasks;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = AssignmentConfig::default();
        assert_eq!(c.workers_per_task, 1);
        assert_eq!(c.tasks_per_worker, 1);
        assert_eq!(c.seed, None);
    }

    #[test]
    fn test_serde_partial() {
        let c: AssignmentConfig = serde_json::from_str(r#"{"tasks_per_worker": 3}"#).unwrap();
        assert_eq!(c, AssignmentConfig::default().with_tasks_per_worker(3));
    }
}
