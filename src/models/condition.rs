//! Conditions: typed facts a participant declares and constraints test.
//!
//! A [`Condition`] is one value (a location, a point in time, a scalar).
//! Its [`ConditionKind`] is the closed tag used to key participant
//! abilities, replacing open-ended runtime type lookup.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A planar (longitude, latitude) position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    /// Creates a coordinate.
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Squared Euclidean distance.
    ///
    /// This is the "distance" used throughout matching; radius and width
    /// checks square their threshold to compare against it.
    pub fn distance_squared(&self, other: &Coordinate) -> f64 {
        let dx = self.longitude - other.longitude;
        let dy = self.latitude - other.latitude;
        dx * dx + dy * dy
    }

    /// Euclidean distance.
    pub fn distance(&self, other: &Coordinate) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Whether the two points share a longitude or a latitude.
    pub fn in_line(&self, other: &Coordinate) -> bool {
        self.longitude == other.longitude || self.latitude == other.latitude
    }

    /// Linear interpolation: `self + (other - self) * t`.
    pub fn lerp(&self, other: &Coordinate, t: f64) -> Coordinate {
        Coordinate::new(
            self.longitude + (other.longitude - self.longitude) * t,
            self.latitude + (other.latitude - self.latitude) * t,
        )
    }

    /// Translates by (dx, dy).
    pub fn offset(&self, dx: f64, dy: f64) -> Coordinate {
        Coordinate::new(self.longitude + dx, self.latitude + dy)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.longitude, self.latitude)
    }
}

/// A location whose components were encoded by an additively homomorphic
/// scheme outside this crate.
///
/// Only sums of components are compared; the plain position is never
/// recovered here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncryptedCoordinate {
    pub longitude: i64,
    pub latitude: i64,
}

impl EncryptedCoordinate {
    pub const fn new(longitude: i64, latitude: i64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Homomorphic sum of the encoded components.
    pub fn encoded_sum(&self) -> i128 {
        self.longitude as i128 + self.latitude as i128
    }
}

impl fmt::Display for EncryptedCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Enc({}, {})", self.longitude, self.latitude)
    }
}

/// Type tag of a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConditionKind {
    /// Planar location.
    Location,
    /// Encoded location.
    EncryptedLocation,
    /// Date and time.
    Time,
    /// Numeric attribute for custom constraints.
    Scalar,
    /// No fact needed (e.g. task dependence).
    Empty,
}

/// A typed fact evaluated against constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    Location(Coordinate),
    EncryptedLocation(EncryptedCoordinate),
    Time(NaiveDateTime),
    Scalar(f64),
    Empty,
}

impl Condition {
    /// The type tag of this condition.
    pub fn kind(&self) -> ConditionKind {
        match self {
            Condition::Location(_) => ConditionKind::Location,
            Condition::EncryptedLocation(_) => ConditionKind::EncryptedLocation,
            Condition::Time(_) => ConditionKind::Time,
            Condition::Scalar(_) => ConditionKind::Scalar,
            Condition::Empty => ConditionKind::Empty,
        }
    }

    pub fn as_location(&self) -> Option<&Coordinate> {
        match self {
            Condition::Location(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_encrypted_location(&self) -> Option<&EncryptedCoordinate> {
        match self {
            Condition::EncryptedLocation(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&NaiveDateTime> {
        match self {
            Condition::Time(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Condition::Scalar(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<Coordinate> for Condition {
    fn from(c: Coordinate) -> Self {
        Condition::Location(c)
    }
}

impl From<NaiveDateTime> for Condition {
    fn from(t: NaiveDateTime) -> Self {
        Condition::Time(t)
    }
}
