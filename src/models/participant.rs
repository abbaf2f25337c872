//! Participant (worker) model.
//!
//! Participants are the crowd members tasks are matched to. Each one
//! declares a sparse set of abilities, at most one condition per
//! [`ConditionKind`], that constraints are evaluated against.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Condition, ConditionKind, Coordinate};

/// A crowd worker that can be assigned tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique participant identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Current availability.
    pub status: ParticipantStatus,
    /// Declared abilities keyed by condition type.
    abilities: BTreeMap<ConditionKind, Condition>,
}

/// Participant availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParticipantStatus {
    /// Ready to accept tasks.
    #[default]
    Available,
    /// Currently working.
    Busy,
    /// Removed from matching.
    Disabled,
}

impl Participant {
    /// Creates an available participant with no abilities.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            status: ParticipantStatus::Available,
            abilities: BTreeMap::new(),
        }
    }

    /// Sets the participant name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: ParticipantStatus) -> Self {
        self.status = status;
        self
    }

    /// Declares an ability, replacing any previous one of the same kind.
    pub fn with_ability(mut self, condition: impl Into<Condition>) -> Self {
        self.set_ability(condition.into());
        self
    }

    /// Declares a location ability.
    pub fn with_location(self, longitude: f64, latitude: f64) -> Self {
        self.with_ability(Coordinate::new(longitude, latitude))
    }

    /// Declares or replaces an ability in place.
    pub fn set_ability(&mut self, condition: Condition) {
        self.abilities.insert(condition.kind(), condition);
    }

    /// Updates the status.
    pub fn set_status(&mut self, status: ParticipantStatus) {
        self.status = status;
    }

    /// Whether the participant declares an ability of this kind.
    pub fn has_ability(&self, kind: ConditionKind) -> bool {
        self.abilities.contains_key(&kind)
    }

    /// The declared ability of this kind, if any.
    pub fn ability(&self, kind: ConditionKind) -> Option<&Condition> {
        self.abilities.get(&kind)
    }

    /// The declared location, if any.
    pub fn location(&self) -> Option<Coordinate> {
        self.ability(ConditionKind::Location)
            .and_then(|c| c.as_location())
            .copied()
    }

    /// All declared abilities.
    pub fn abilities(&self) -> impl Iterator<Item = &Condition> {
        self.abilities.values()
    }

    /// Whether the participant can accept work.
    pub fn available(&self) -> bool {
        self.status == ParticipantStatus::Available
    }
}
