//! User-extension constraints.
//!
//! Callers register a constraint type by name with a predicate (and an
//! optional argument validator) in a [`ConstraintRegistry`]. Instances
//! carry their argument list and a reference to the registered type, so
//! decomposing one reconstructs a fresh instance from that descriptor.
//! Custom constraints are never split.
//!
//! # Usage
//!
//! ```
//! use u_crowd::constraint::{ConstraintArg, ConstraintRegistry};
//! use u_crowd::models::{Condition, ConditionKind};
//!
//! let mut registry = ConstraintRegistry::new();
//! registry.register("min_rating", ConditionKind::Scalar, |args, condition| {
//!     match (args.first().and_then(ConstraintArg::as_float), condition.as_scalar()) {
//!         (Some(min), Some(rating)) => rating >= min,
//!         _ => false,
//!     }
//! });
//!
//! let c = registry.build("min_rating", vec![ConstraintArg::Float(4.0)]).unwrap();
//! assert!(c.satisfy(&Condition::Scalar(4.5)));
//! assert!(!c.satisfy(&Condition::Scalar(3.0)));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Constraint;
use crate::decompose::Decomposer;
use crate::error::{ConstraintError, DecomposeError};
use crate::models::{Condition, ConditionKind, Coordinate};

/// One constructor argument of a custom constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstraintArg {
    Int(i64),
    Float(f64),
    Text(String),
    Location(Coordinate),
    Time(NaiveDateTime),
}

impl ConstraintArg {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConstraintArg::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Floats, and integers widened to float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ConstraintArg::Float(v) => Some(*v),
            ConstraintArg::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConstraintArg::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_location(&self) -> Option<&Coordinate> {
        match self {
            ConstraintArg::Location(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&NaiveDateTime> {
        match self {
            ConstraintArg::Time(t) => Some(t),
            _ => None,
        }
    }
}

type Predicate = dyn Fn(&[ConstraintArg], &Condition) -> bool + Send + Sync;
type Validator = dyn Fn(&[ConstraintArg]) -> Result<(), String> + Send + Sync;

/// A registered custom constraint type.
struct CustomType {
    name: String,
    kind: ConditionKind,
    predicate: Arc<Predicate>,
    validator: Option<Arc<Validator>>,
}

impl CustomType {
    fn instantiate(
        self: &Arc<Self>,
        args: Vec<ConstraintArg>,
    ) -> Result<CustomConstraint, ConstraintError> {
        if let Some(validate) = &self.validator {
            validate(&args).map_err(|reason| ConstraintError::InvalidArguments {
                type_name: self.name.clone(),
                reason,
            })?;
        }
        Ok(CustomConstraint {
            descriptor: Arc::clone(self),
            args,
        })
    }
}

/// An instance of a registered custom constraint type.
#[derive(Clone)]
pub struct CustomConstraint {
    descriptor: Arc<CustomType>,
    args: Vec<ConstraintArg>,
}

impl CustomConstraint {
    pub fn type_name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn args(&self) -> &[ConstraintArg] {
        &self.args
    }

    pub fn condition_kind(&self) -> ConditionKind {
        self.descriptor.kind
    }

    pub fn satisfy(&self, condition: &Condition) -> bool {
        (self.descriptor.predicate)(&self.args, condition)
    }
}

impl PartialEq for CustomConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.name == other.descriptor.name && self.args == other.args
    }
}

impl fmt::Debug for CustomConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomConstraint")
            .field("type_name", &self.descriptor.name)
            .field("kind", &self.descriptor.kind)
            .field("args", &self.args)
            .finish()
    }
}

impl fmt::Display for CustomConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?}", self.descriptor.name, self.args)
    }
}

impl Decomposer<Constraint> for CustomConstraint {
    fn trivial_decompose(&self) -> Vec<Constraint> {
        vec![Constraint::Custom(self.clone())]
    }

    /// Rebuilds one instance from the registered descriptor.
    fn scale_decompose(&self, scale: i32) -> Result<Vec<Constraint>, DecomposeError> {
        debug!(type_name = %self.descriptor.name, scale, "custom constraint is not divisible");
        let rebuilt = self
            .descriptor
            .instantiate(self.args.clone())
            .map_err(|source| DecomposeError::Reconstruct {
                type_name: self.descriptor.name.clone(),
                source,
            })?;
        Ok(vec![Constraint::Custom(rebuilt)])
    }
}

/// Name-keyed builders for custom constraint types.
#[derive(Default, Clone)]
pub struct ConstraintRegistry {
    types: BTreeMap<String, Arc<CustomType>>,
}

impl ConstraintRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type with a predicate; replaces any type of that name.
    pub fn register<P>(&mut self, name: impl Into<String>, kind: ConditionKind, predicate: P)
    where
        P: Fn(&[ConstraintArg], &Condition) -> bool + Send + Sync + 'static,
    {
        self.insert(name.into(), kind, Arc::new(predicate), None);
    }

    /// Registers a type whose argument lists are checked on every build.
    pub fn register_validated<P, V>(
        &mut self,
        name: impl Into<String>,
        kind: ConditionKind,
        predicate: P,
        validator: V,
    ) where
        P: Fn(&[ConstraintArg], &Condition) -> bool + Send + Sync + 'static,
        V: Fn(&[ConstraintArg]) -> Result<(), String> + Send + Sync + 'static,
    {
        self.insert(name.into(), kind, Arc::new(predicate), Some(Arc::new(validator)));
    }

    fn insert(
        &mut self,
        name: String,
        kind: ConditionKind,
        predicate: Arc<Predicate>,
        validator: Option<Arc<Validator>>,
    ) {
        let ty = CustomType {
            name: name.clone(),
            kind,
            predicate,
            validator,
        };
        self.types.insert(name, Arc::new(ty));
    }

    /// Builds a constraint of a registered type.
    pub fn build(
        &self,
        name: &str,
        args: Vec<ConstraintArg>,
    ) -> Result<Constraint, ConstraintError> {
        let ty = self
            .types
            .get(name)
            .ok_or_else(|| ConstraintError::UnknownType(name.to_string()))?;
        Ok(Constraint::Custom(ty.instantiate(args)?))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

impl fmt::Debug for ConstraintRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintRegistry")
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn registry() -> ConstraintRegistry {
        let mut r = ConstraintRegistry::new();
        r.register_validated(
            "max_speed",
            ConditionKind::Scalar,
            |args, condition| match (args[0].as_float(), condition.as_scalar()) {
                (Some(max), Some(v)) => v <= max,
                _ => false,
            },
            |args| match args {
                [arg] if arg.as_float().is_some() => Ok(()),
                _ => Err("expected one numeric argument".into()),
            },
        );
        r
    }

    #[test]
    fn test_build_and_satisfy() {
        let c = registry()
            .build("max_speed", vec![ConstraintArg::Int(30)])
            .unwrap();
        assert_eq!(c.condition_kind(), ConditionKind::Scalar);
        assert!(c.satisfy(&Condition::Scalar(29.0)));
        assert!(!c.satisfy(&Condition::Scalar(31.0)));
        assert!(c.description().starts_with("max_speed"));
    }

    #[test]
    fn test_unknown_type() {
        assert_eq!(
            registry().build("teleport", vec![]),
            Err(ConstraintError::UnknownType("teleport".into()))
        );
    }

    #[test]
    fn test_validator_rejects() {
        match registry().build("max_speed", vec![ConstraintArg::Text("fast".into())]) {
            Err(ConstraintError::InvalidArguments { type_name, .. }) => {
                assert_eq!(type_name, "max_speed")
            }
            _ => panic!("expected invalid arguments"),
        }
    }

    #[test]
    fn test_decompose_reconstructs() {
        let c = registry()
            .build("max_speed", vec![ConstraintArg::Float(10.0)])
            .unwrap();
        let parts = c.decomposer().scale_decompose(8).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts, c.decomposer().trivial_decompose());
        assert_eq!(c.decomposer().scale_decompose(-4).unwrap().len(), 1);
    }

    #[test]
    fn test_reconstruction_failure_wrapped() {
        let strict = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&strict);
        let mut r = ConstraintRegistry::new();
        r.register_validated(
            "gate",
            ConditionKind::Scalar,
            |_, _| true,
            move |_| {
                if flag.load(Ordering::SeqCst) {
                    Err("closed".into())
                } else {
                    Ok(())
                }
            },
        );
        let c = r.build("gate", vec![]).unwrap();
        strict.store(true, Ordering::SeqCst);
        match c.decomposer().scale_decompose(2) {
            Err(DecomposeError::Reconstruct { type_name, .. }) => assert_eq!(type_name, "gate"),
            _ => panic!("expected reconstruction error"),
        }
    }

    #[test]
    fn test_type_names_sorted() {
        let mut r = registry();
        r.register("alpha", ConditionKind::Location, |_, _| true);
        let names: Vec<&str> = r.type_names().collect();
        assert_eq!(names, vec!["alpha", "max_speed"]);
        assert!(r.contains("alpha"));
    }
}
