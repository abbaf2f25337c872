//! Task dependence.

use std::fmt;

use super::{indivisible, Constraint};
use crate::decompose::Decomposer;
use crate::error::DecomposeError;
use crate::models::{Condition, TaskHandle};

/// Satisfied once every prerequisite task has finished.
///
/// Needs no participant ability: it is evaluated against
/// [`Condition::Empty`] for every candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct DependenceConstraint {
    prerequisites: Vec<TaskHandle>,
}

impl DependenceConstraint {
    pub fn new(prerequisites: Vec<TaskHandle>) -> Self {
        Self { prerequisites }
    }

    pub fn prerequisites(&self) -> &[TaskHandle] {
        &self.prerequisites
    }

    pub fn satisfy(&self, _condition: &Condition) -> bool {
        self.prerequisites.iter().all(TaskHandle::finished)
    }
}

impl Decomposer<Constraint> for DependenceConstraint {
    fn trivial_decompose(&self) -> Vec<Constraint> {
        vec![Constraint::Dependence(self.clone())]
    }

    fn scale_decompose(&self, scale: i32) -> Result<Vec<Constraint>, DecomposeError> {
        Ok(indivisible(self, scale))
    }
}

impl fmt::Display for DependenceConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DependsOn[")?;
        for (i, h) in self.prerequisites.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", h.id())?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Task, TaskStatus};

    #[test]
    fn test_all_prerequisites_finished() {
        let a = Task::assignment();
        let b = Task::assignment();
        let dep = DependenceConstraint::new(vec![a.handle(), b.handle()]);

        assert!(!dep.satisfy(&Condition::Empty));
        a.set_status(TaskStatus::Finished);
        assert!(!dep.satisfy(&Condition::Empty));
        b.set_status(TaskStatus::Finished);
        assert!(dep.satisfy(&Condition::Empty));
    }

    #[test]
    fn test_no_prerequisites() {
        let dep = DependenceConstraint::new(Vec::new());
        assert!(dep.satisfy(&Condition::Empty));
        assert_eq!(dep.to_string(), "DependsOn[]");
    }

    #[test]
    fn test_indivisible() {
        let a = Task::assignment();
        let dep = DependenceConstraint::new(vec![a.handle()]);
        for scale in [-1, 0, 1, 2, 16] {
            let parts = dep.scale_decompose(scale).unwrap();
            assert_eq!(parts, dep.trivial_decompose());
        }
    }
}
