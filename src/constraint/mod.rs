//! Task constraints.
//!
//! A [`Constraint`] is a predicate over one participant [`Condition`] and is
//! decomposable at a caller-chosen scale. The closed set of families:
//!
//! | Family | Variant | Kind | Divisible |
//! |--------|---------|------|-----------|
//! | Point of interest | [`Constraint::Poi`] | Location | no |
//! | Disc | [`Constraint::Point`] | Location | no |
//! | Rectangle | [`Constraint::Rectangle`] | Location | no |
//! | Polygon | [`Constraint::Polygon`] | Location | grid |
//! | Corridor | [`Constraint::Line`] | Location | segments |
//! | Encrypted rectangle | [`Constraint::EncryptedSpatio`] | EncryptedLocation | no |
//! | Timestamp range | [`Constraint::TimeRange`] | Time | equal parts |
//! | Time-of-day tolerance | [`Constraint::TemporalPoint`] | Time | equal parts |
//! | Time-of-day window | [`Constraint::TemporalInterval`] | Time | equal parts |
//! | Deadline | [`Constraint::DateDeadline`] | Time | day intervals |
//! | Date window | [`Constraint::DateInterval`] | Time | day intervals |
//! | Prerequisites | [`Constraint::Dependence`] | Empty | no |
//! | Registered extension | [`Constraint::Custom`] | declared | no |
//!
//! A constraint only inspects the condition kind it declares; given a
//! condition of any other kind it is unsatisfied.

mod custom;
mod dependence;
mod spatial;
mod temporal;

pub use custom::{ConstraintArg, ConstraintRegistry, CustomConstraint};
pub use dependence::DependenceConstraint;
pub use spatial::{
    EncryptedSpatio, PoiConstraint, SpatioLine, SpatioPoint, SpatioPolygon, SpatioRectangle,
    DEFAULT_POI_RADIUS,
};
pub use temporal::{DateDeadline, DateInterval, TemporalInterval, TemporalPoint, TimeRange};

use std::fmt;

use tracing::debug;

use crate::decompose::Decomposer;
use crate::models::{Condition, ConditionKind};

/// A predicate over a participant condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Poi(PoiConstraint),
    Point(SpatioPoint),
    Rectangle(SpatioRectangle),
    Polygon(SpatioPolygon),
    Line(SpatioLine),
    EncryptedSpatio(EncryptedSpatio),
    TimeRange(TimeRange),
    TemporalPoint(TemporalPoint),
    TemporalInterval(TemporalInterval),
    DateDeadline(DateDeadline),
    DateInterval(DateInterval),
    Dependence(DependenceConstraint),
    Custom(CustomConstraint),
}

impl Constraint {
    /// Whether `condition` meets this constraint.
    pub fn satisfy(&self, condition: &Condition) -> bool {
        match self {
            Constraint::Poi(c) => c.satisfy(condition),
            Constraint::Point(c) => c.satisfy(condition),
            Constraint::Rectangle(c) => c.satisfy(condition),
            Constraint::Polygon(c) => c.satisfy(condition),
            Constraint::Line(c) => c.satisfy(condition),
            Constraint::EncryptedSpatio(c) => c.satisfy(condition),
            Constraint::TimeRange(c) => c.satisfy(condition),
            Constraint::TemporalPoint(c) => c.satisfy(condition),
            Constraint::TemporalInterval(c) => c.satisfy(condition),
            Constraint::DateDeadline(c) => c.satisfy(condition),
            Constraint::DateInterval(c) => c.satisfy(condition),
            Constraint::Dependence(c) => c.satisfy(condition),
            Constraint::Custom(c) => c.satisfy(condition),
        }
    }

    /// The condition kind this constraint evaluates.
    pub fn condition_kind(&self) -> ConditionKind {
        match self {
            Constraint::Poi(_)
            | Constraint::Point(_)
            | Constraint::Rectangle(_)
            | Constraint::Polygon(_)
            | Constraint::Line(_) => ConditionKind::Location,
            Constraint::EncryptedSpatio(_) => ConditionKind::EncryptedLocation,
            Constraint::TimeRange(_)
            | Constraint::TemporalPoint(_)
            | Constraint::TemporalInterval(_)
            | Constraint::DateDeadline(_)
            | Constraint::DateInterval(_) => ConditionKind::Time,
            Constraint::Dependence(_) => ConditionKind::Empty,
            Constraint::Custom(c) => c.condition_kind(),
        }
    }

    /// The decomposer for this constraint's family.
    pub fn decomposer(&self) -> &dyn Decomposer<Constraint> {
        match self {
            Constraint::Poi(c) => c,
            Constraint::Point(c) => c,
            Constraint::Rectangle(c) => c,
            Constraint::Polygon(c) => c,
            Constraint::Line(c) => c,
            Constraint::EncryptedSpatio(c) => c,
            Constraint::TimeRange(c) => c,
            Constraint::TemporalPoint(c) => c,
            Constraint::TemporalInterval(c) => c,
            Constraint::DateDeadline(c) => c,
            Constraint::DateInterval(c) => c,
            Constraint::Dependence(c) => c,
            Constraint::Custom(c) => c,
        }
    }

    /// Human-readable rendering, same as `Display`.
    pub fn description(&self) -> String {
        self.to_string()
    }

    /// Whether this constraint is location-based.
    pub fn is_spatial(&self) -> bool {
        self.condition_kind() == ConditionKind::Location
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Poi(c) => fmt::Display::fmt(c, f),
            Constraint::Point(c) => fmt::Display::fmt(c, f),
            Constraint::Rectangle(c) => fmt::Display::fmt(c, f),
            Constraint::Polygon(c) => fmt::Display::fmt(c, f),
            Constraint::Line(c) => fmt::Display::fmt(c, f),
            Constraint::EncryptedSpatio(c) => fmt::Display::fmt(c, f),
            Constraint::TimeRange(c) => fmt::Display::fmt(c, f),
            Constraint::TemporalPoint(c) => fmt::Display::fmt(c, f),
            Constraint::TemporalInterval(c) => fmt::Display::fmt(c, f),
            Constraint::DateDeadline(c) => fmt::Display::fmt(c, f),
            Constraint::DateInterval(c) => fmt::Display::fmt(c, f),
            Constraint::Dependence(c) => fmt::Display::fmt(c, f),
            Constraint::Custom(c) => fmt::Display::fmt(c, f),
        }
    }
}

macro_rules! impl_from_family {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Constraint {
                fn from(c: $ty) -> Self {
                    Constraint::$variant(c)
                }
            }
        )*
    };
}

impl_from_family! {
    PoiConstraint => Poi,
    SpatioPoint => Point,
    SpatioRectangle => Rectangle,
    SpatioPolygon => Polygon,
    SpatioLine => Line,
    EncryptedSpatio => EncryptedSpatio,
    TimeRange => TimeRange,
    TemporalPoint => TemporalPoint,
    TemporalInterval => TemporalInterval,
    DateDeadline => DateDeadline,
    DateInterval => DateInterval,
    DependenceConstraint => Dependence,
    CustomConstraint => Custom,
}

/// Scale decomposition of an indivisible family: the trivial split,
/// whatever the scale.
pub(crate) fn indivisible<D>(c: &D, scale: i32) -> Vec<Constraint>
where
    D: Decomposer<Constraint> + fmt::Display,
{
    if scale != 1 {
        debug!(constraint = %c, scale, "indivisible constraint, ignoring scale");
    }
    c.trivial_decompose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> Condition {
        Condition::Time(
            NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_kind_mismatch_unsatisfied() {
        let poi: Constraint = PoiConstraint::new(Coordinate::new(0.0, 0.0)).into();
        let window: Constraint = TemporalInterval::parse("09:00", "17:00").unwrap().into();

        assert_eq!(poi.condition_kind(), ConditionKind::Location);
        assert!(poi.satisfy(&Condition::Location(Coordinate::new(1.0, 1.0))));
        assert!(!poi.satisfy(&at(10, 0)));
        assert!(!poi.satisfy(&Condition::Empty));

        assert_eq!(window.condition_kind(), ConditionKind::Time);
        assert!(window.satisfy(&at(10, 0)));
        assert!(!window.satisfy(&Condition::Location(Coordinate::new(1.0, 1.0))));
    }

    #[test]
    fn test_dispatch_decomposer() {
        let line: Constraint =
            SpatioLine::new(Coordinate::new(0.0, 0.0), Coordinate::new(4.0, 0.0), 1.0)
                .unwrap()
                .into();
        assert_eq!(line.decomposer().scale_decompose(4).unwrap().len(), 4);
        assert_eq!(line.decomposer().scale_decompose(1).unwrap(), vec![line.clone()]);
        assert_eq!(line.decomposer().trivial_decompose(), vec![line.clone()]);
        assert!(line.decomposer().scale_decompose(0).is_err());
        assert!(line.is_spatial());
    }

    #[test]
    fn test_description_matches_display() {
        let rect: Constraint =
            SpatioRectangle::new(Coordinate::new(0.0, 0.0), Coordinate::new(2.0, 2.0))
                .unwrap()
                .into();
        assert_eq!(rect.description(), rect.to_string());
        assert!(!rect.description().is_empty());
    }
}
