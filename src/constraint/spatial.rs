//! Spatial constraint families.
//!
//! All radius and width checks compare squared distances, matching
//! [`Coordinate::distance_squared`] used by the matching algorithms.
//! Only the line corridor and the polygon are divisible.
//!
//! # Reference
//! O'Rourke (1998), "Computational Geometry in C", Ch. 1 (area,
//! segment intersection) and Ch. 7 (point in polygon)

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{indivisible, Constraint};
use crate::decompose::{check_scale, Decomposer};
use crate::error::{ConstraintError, DecomposeError};
use crate::models::{Condition, Coordinate, EncryptedCoordinate};

/// Default POI acceptance radius.
pub const DEFAULT_POI_RADIUS: f64 = 10.0;

fn check_radius(radius: f64) -> Result<(), ConstraintError> {
    if radius > 0.0 && radius.is_finite() {
        Ok(())
    } else {
        Err(ConstraintError::NonPositiveRadius(radius))
    }
}

/// The task's point of interest: where the work happens.
///
/// Matching factories take a task's single POI as its location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPoi")]
pub struct PoiConstraint {
    location: Coordinate,
    radius: f64,
}

#[derive(Deserialize)]
struct RawPoi {
    location: Coordinate,
    radius: f64,
}

impl TryFrom<RawPoi> for PoiConstraint {
    type Error = ConstraintError;

    fn try_from(raw: RawPoi) -> Result<Self, Self::Error> {
        Self::new(raw.location).with_radius(raw.radius)
    }
}

impl PoiConstraint {
    /// Creates a POI with the default radius.
    pub fn new(location: Coordinate) -> Self {
        Self {
            location,
            radius: DEFAULT_POI_RADIUS,
        }
    }

    /// Sets the acceptance radius.
    pub fn with_radius(mut self, radius: f64) -> Result<Self, ConstraintError> {
        check_radius(radius)?;
        self.radius = radius;
        Ok(self)
    }

    pub fn location(&self) -> Coordinate {
        self.location
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn satisfy(&self, condition: &Condition) -> bool {
        condition
            .as_location()
            .is_some_and(|c| c.distance_squared(&self.location) <= self.radius * self.radius)
    }
}

impl Decomposer<Constraint> for PoiConstraint {
    fn trivial_decompose(&self) -> Vec<Constraint> {
        vec![Constraint::Poi(self.clone())]
    }

    fn scale_decompose(&self, scale: i32) -> Result<Vec<Constraint>, DecomposeError> {
        Ok(indivisible(self, scale))
    }
}

impl fmt::Display for PoiConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "POI{} r={}", self.location, self.radius)
    }
}

/// A disc around a center point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPoint")]
pub struct SpatioPoint {
    center: Coordinate,
    radius: f64,
}

#[derive(Deserialize)]
struct RawPoint {
    center: Coordinate,
    radius: f64,
}

impl TryFrom<RawPoint> for SpatioPoint {
    type Error = ConstraintError;

    fn try_from(raw: RawPoint) -> Result<Self, Self::Error> {
        Self::new(raw.center, raw.radius)
    }
}

impl SpatioPoint {
    pub fn new(center: Coordinate, radius: f64) -> Result<Self, ConstraintError> {
        check_radius(radius)?;
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn satisfy(&self, condition: &Condition) -> bool {
        condition
            .as_location()
            .is_some_and(|c| c.distance_squared(&self.center) <= self.radius * self.radius)
    }
}

impl Decomposer<Constraint> for SpatioPoint {
    fn trivial_decompose(&self) -> Vec<Constraint> {
        vec![Constraint::Point(self.clone())]
    }

    fn scale_decompose(&self, scale: i32) -> Result<Vec<Constraint>, DecomposeError> {
        Ok(indivisible(self, scale))
    }
}

impl fmt::Display for SpatioPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point{} r={}", self.center, self.radius)
    }
}

/// An axis-aligned rectangle, half-open on its upper bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRectangle")]
pub struct SpatioRectangle {
    min: Coordinate,
    max: Coordinate,
}

#[derive(Deserialize)]
struct RawRectangle {
    min: Coordinate,
    max: Coordinate,
}

impl TryFrom<RawRectangle> for SpatioRectangle {
    type Error = ConstraintError;

    /// Stored corners must already be ordered.
    fn try_from(raw: RawRectangle) -> Result<Self, Self::Error> {
        if raw.min.longitude > raw.max.longitude || raw.min.latitude > raw.max.latitude {
            return Err(ConstraintError::InvertedRange {
                start: raw.min.to_string(),
                end: raw.max.to_string(),
            });
        }
        Self::new(raw.min, raw.max)
    }
}

impl SpatioRectangle {
    /// Creates a rectangle from two opposite corners, in any order.
    ///
    /// Corners sharing a longitude or latitude are rejected.
    pub fn new(a: Coordinate, b: Coordinate) -> Result<Self, ConstraintError> {
        if a.in_line(&b) {
            return Err(ConstraintError::DegenerateRectangle(
                a.to_string(),
                b.to_string(),
            ));
        }
        Ok(Self {
            min: Coordinate::new(a.longitude.min(b.longitude), a.latitude.min(b.latitude)),
            max: Coordinate::new(a.longitude.max(b.longitude), a.latitude.max(b.latitude)),
        })
    }

    pub fn min(&self) -> Coordinate {
        self.min
    }

    pub fn max(&self) -> Coordinate {
        self.max
    }

    /// `min <= c < max` on both axes.
    pub fn contains(&self, c: &Coordinate) -> bool {
        self.min.longitude <= c.longitude
            && c.longitude < self.max.longitude
            && self.min.latitude <= c.latitude
            && c.latitude < self.max.latitude
    }

    pub fn satisfy(&self, condition: &Condition) -> bool {
        condition.as_location().is_some_and(|c| self.contains(c))
    }
}

impl Decomposer<Constraint> for SpatioRectangle {
    fn trivial_decompose(&self) -> Vec<Constraint> {
        vec![Constraint::Rectangle(self.clone())]
    }

    fn scale_decompose(&self, scale: i32) -> Result<Vec<Constraint>, DecomposeError> {
        Ok(indivisible(self, scale))
    }
}

impl fmt::Display for SpatioRectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rect[{} .. {})", self.min, self.max)
    }
}

/// Orientation of the triple (a, b, c): positive when counter-clockwise.
fn cross(a: &Coordinate, b: &Coordinate, c: &Coordinate) -> f64 {
    (b.longitude - a.longitude) * (c.latitude - a.latitude)
        - (b.latitude - a.latitude) * (c.longitude - a.longitude)
}

/// Whether segments ab and cd cross at a single interior point.
fn segments_cross(a: &Coordinate, b: &Coordinate, c: &Coordinate, d: &Coordinate) -> bool {
    cross(a, b, c) * cross(a, b, d) < 0.0 && cross(c, d, a) * cross(c, d, b) < 0.0
}

/// A simple polygon given by its vertices; the ring closes implicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPolygon")]
pub struct SpatioPolygon {
    points: Vec<Coordinate>,
}

#[derive(Deserialize)]
struct RawPolygon {
    points: Vec<Coordinate>,
}

impl TryFrom<RawPolygon> for SpatioPolygon {
    type Error = ConstraintError;

    fn try_from(raw: RawPolygon) -> Result<Self, Self::Error> {
        Self::new(raw.points)
    }
}

impl SpatioPolygon {
    /// Creates a polygon after checking it is simple and non-degenerate.
    ///
    /// # Errors
    /// - fewer than 3 vertices
    /// - equal consecutive vertices (including last to first)
    /// - two non-adjacent edges crossing
    /// - zero area (all vertices collinear)
    pub fn new(points: Vec<Coordinate>) -> Result<Self, ConstraintError> {
        let n = points.len();
        if n < 3 {
            return Err(ConstraintError::TooFewPoints {
                shape: "polygon",
                min: 3,
                got: n,
            });
        }
        for i in 0..n {
            if points[i] == points[(i + 1) % n] {
                return Err(ConstraintError::DuplicateVertex { index: i });
            }
        }
        let polygon = Self { points };
        for i in 0..n {
            for j in (i + 2)..n {
                if i == 0 && j == n - 1 {
                    continue; // adjacent through the closing edge
                }
                let (a, b) = polygon.edge(i);
                let (c, d) = polygon.edge(j);
                if segments_cross(a, b, c, d) {
                    return Err(ConstraintError::SelfIntersecting {
                        first: i,
                        second: j,
                    });
                }
            }
        }
        if polygon.area().abs() < 1e-12 {
            return Err(ConstraintError::ZeroArea);
        }
        Ok(polygon)
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    fn edge(&self, i: usize) -> (&Coordinate, &Coordinate) {
        (&self.points[i], &self.points[(i + 1) % self.points.len()])
    }

    /// Signed shoelace area.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        (0..n)
            .map(|i| {
                let (a, b) = self.edge(i);
                a.longitude * b.latitude - b.longitude * a.latitude
            })
            .sum::<f64>()
            / 2.0
    }

    /// Bounding box as (min, max) corners.
    pub fn bounding_box(&self) -> (Coordinate, Coordinate) {
        let mut min = self.points[0];
        let mut max = self.points[0];
        for p in &self.points[1..] {
            min.longitude = min.longitude.min(p.longitude);
            min.latitude = min.latitude.min(p.latitude);
            max.longitude = max.longitude.max(p.longitude);
            max.latitude = max.latitude.max(p.latitude);
        }
        (min, max)
    }

    /// Ray-casting point-in-polygon test.
    ///
    /// Counts edges crossed by an upward ray from `c`. Vertical edges are
    /// skipped and each edge's longitude span is half-open, so a ray
    /// through a vertex is counted once.
    pub fn contains(&self, c: &Coordinate) -> bool {
        let mut crossings = 0;
        for i in 0..self.points.len() {
            let (a, b) = self.edge(i);
            if a.longitude == b.longitude {
                continue;
            }
            let lo = a.longitude.min(b.longitude);
            let hi = a.longitude.max(b.longitude);
            if c.longitude < lo || c.longitude >= hi {
                continue;
            }
            let slope = (b.latitude - a.latitude) / (b.longitude - a.longitude);
            let y = a.latitude + (c.longitude - a.longitude) * slope;
            if y > c.latitude {
                crossings += 1;
            }
        }
        crossings % 2 == 1
    }

    pub fn satisfy(&self, condition: &Condition) -> bool {
        condition.as_location().is_some_and(|c| self.contains(c))
    }
}

impl Decomposer<Constraint> for SpatioPolygon {
    fn trivial_decompose(&self) -> Vec<Constraint> {
        vec![Constraint::Polygon(self.clone())]
    }

    /// Grid approximation over the bounding box.
    ///
    /// The box is cut into a ⌊√scale⌋ × ⌊√scale⌋ grid. For every cell whose
    /// center lies inside the polygon, each of its four corners `c` emits the
    /// triangle `(c, c + (0, ys), c + (xs, ys))`. The triangles neither
    /// tile the polygon nor stay inside it. When no cell center is inside,
    /// the polygon is returned whole.
    fn scale_decompose(&self, scale: i32) -> Result<Vec<Constraint>, DecomposeError> {
        check_scale(scale)?;
        if scale == 1 {
            return Ok(self.trivial_decompose());
        }

        let k = (scale as f64).sqrt().floor() as usize;
        let (min, max) = self.bounding_box();
        let xs = (max.longitude - min.longitude) / k as f64;
        let ys = (max.latitude - min.latitude) / k as f64;

        let mut parts = Vec::new();
        for i in 0..k {
            for j in 0..k {
                let corner = min.offset(i as f64 * xs, j as f64 * ys);
                let center = corner.offset(xs / 2.0, ys / 2.0);
                if !self.contains(&center) {
                    continue;
                }
                let corners = [
                    corner,
                    corner.offset(xs, 0.0),
                    corner.offset(0.0, ys),
                    corner.offset(xs, ys),
                ];
                for c in corners {
                    let triangle = vec![c, c.offset(0.0, ys), c.offset(xs, ys)];
                    parts.push(Constraint::Polygon(SpatioPolygon::new(triangle)?));
                }
            }
        }

        if parts.is_empty() {
            debug!(scale, "no grid cell inside polygon, keeping it whole");
            return Ok(self.trivial_decompose());
        }
        Ok(parts)
    }
}

impl fmt::Display for SpatioPolygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Polygon[")?;
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{p}")?;
        }
        write!(f, "]")
    }
}

/// A corridor of given width along a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLine")]
pub struct SpatioLine {
    start: Coordinate,
    end: Coordinate,
    width: f64,
}

#[derive(Deserialize)]
struct RawLine {
    start: Coordinate,
    end: Coordinate,
    width: f64,
}

impl TryFrom<RawLine> for SpatioLine {
    type Error = ConstraintError;

    fn try_from(raw: RawLine) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end, raw.width)
    }
}

impl SpatioLine {
    pub fn new(start: Coordinate, end: Coordinate, width: f64) -> Result<Self, ConstraintError> {
        if !(width > 0.0 && width.is_finite()) {
            return Err(ConstraintError::NonPositiveWidth(width));
        }
        if start == end {
            return Err(ConstraintError::DegenerateLine(start.to_string()));
        }
        Ok(Self { start, end, width })
    }

    /// Splits a polyline into consecutive corridor segments of one width.
    pub fn from_polyline(width: f64, points: &[Coordinate]) -> Result<Vec<Self>, ConstraintError> {
        if points.len() < 2 {
            return Err(ConstraintError::TooFewPoints {
                shape: "polyline",
                min: 2,
                got: points.len(),
            });
        }
        points
            .windows(2)
            .map(|w| Self::new(w[0], w[1], width))
            .collect()
    }

    pub fn start(&self) -> Coordinate {
        self.start
    }

    pub fn end(&self) -> Coordinate {
        self.end
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// True length of the center line.
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// Squared distance from `c` to the nearest point on the center line.
    pub fn distance_squared_to(&self, c: &Coordinate) -> f64 {
        let dx = self.end.longitude - self.start.longitude;
        let dy = self.end.latitude - self.start.latitude;
        let len2 = dx * dx + dy * dy;
        let t = ((c.longitude - self.start.longitude) * dx
            + (c.latitude - self.start.latitude) * dy)
            / len2;
        c.distance_squared(&self.start.lerp(&self.end, t.clamp(0.0, 1.0)))
    }

    pub fn satisfy(&self, condition: &Condition) -> bool {
        let half = self.width / 2.0;
        condition
            .as_location()
            .is_some_and(|c| self.distance_squared_to(c) <= half * half)
    }
}

impl Decomposer<Constraint> for SpatioLine {
    fn trivial_decompose(&self) -> Vec<Constraint> {
        vec![Constraint::Line(self.clone())]
    }

    /// `scale` equal-length sub-segments with the same width.
    fn scale_decompose(&self, scale: i32) -> Result<Vec<Constraint>, DecomposeError> {
        check_scale(scale)?;
        if scale == 1 {
            return Ok(self.trivial_decompose());
        }
        let n = scale as f64;
        (0..scale)
            .map(|i| {
                let from = self.start.lerp(&self.end, i as f64 / n);
                let to = if i == scale - 1 {
                    self.end
                } else {
                    self.start.lerp(&self.end, (i + 1) as f64 / n)
                };
                Ok(Constraint::Line(SpatioLine::new(from, to, self.width)?))
            })
            .collect()
    }
}

impl fmt::Display for SpatioLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line{} -> {} w={}", self.start, self.end, self.width)
    }
}

/// A rectangle test over encoded coordinates.
///
/// The participant's encoded component sum must lie strictly between
/// the corners' sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncryptedSpatio {
    top_left: EncryptedCoordinate,
    bottom_right: EncryptedCoordinate,
}

impl EncryptedSpatio {
    pub fn new(top_left: EncryptedCoordinate, bottom_right: EncryptedCoordinate) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    pub fn satisfy(&self, condition: &Condition) -> bool {
        condition.as_encrypted_location().is_some_and(|c| {
            let sum = c.encoded_sum();
            self.top_left.encoded_sum() < sum && sum < self.bottom_right.encoded_sum()
        })
    }
}

impl Decomposer<Constraint> for EncryptedSpatio {
    fn trivial_decompose(&self) -> Vec<Constraint> {
        vec![Constraint::EncryptedSpatio(self.clone())]
    }

    fn scale_decompose(&self, scale: i32) -> Result<Vec<Constraint>, DecomposeError> {
        Ok(indivisible(self, scale))
    }
}

impl fmt::Display for EncryptedSpatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptedRect[{} .. {}]", self.top_left, self.bottom_right)
    }
}
