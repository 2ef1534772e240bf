//! Shared geometric primitives used across Mesh construction and the later
//! stages that reason about positions (latitude, shore distance, river
//! rendering).

use serde::{Deserialize, Serialize};

pub type Polygon = geo::Polygon<f64>;
pub type LineString = geo::LineString<f64>;
pub type GeoPoint = geo::Point<f64>;

/// A bare 2D point, used where we don't need the rest of `geo`'s machinery
/// (point sampling, triangulation input, bearing math).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (*self - *other).length()
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Bearing from `self` to `other`, in radians, 0 = +x axis, increasing
    /// counter-clockwise.
    pub fn bearing_to(&self, other: &Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<Point> for GeoPoint {
    fn from(p: Point) -> Self {
        geo::point!(x: p.x, y: p.y)
    }
}

impl From<delaunator::Point> for Point {
    fn from(p: delaunator::Point) -> Self {
        Point::new(p.x, p.y)
    }
}

impl From<Point> for delaunator::Point {
    fn from(p: Point) -> Self {
        delaunator::Point { x: p.x, y: p.y }
    }
}

/// Axis-aligned rectangle `[0, width] x [0, height]` that all cell sites are
/// generated within and clipped to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }

    pub fn clamp(&self, p: Point) -> Point {
        Point::new(p.x.clamp(0.0, self.width), p.y.clamp(0.0, self.height))
    }

    /// Maps a `y` coordinate to a latitude in `[-90, 90]`, with `y = 0` the
    /// north pole and `y = height` the south pole. Stage code takes
    /// `|latitude|` almost everywhere, so the hemisphere sign mostly matters
    /// for display layers, not pipeline math.
    pub fn latitude_of(&self, y: f64) -> f64 {
        90.0 - (y / self.height) * 180.0
    }

    /// The four anchor points placed well outside the extent so triangles
    /// near the boundary are well-formed (spec §4.1).
    pub fn infinity_anchors(&self) -> [Point; 4] {
        let w = self.width;
        let h = self.height;
        [
            Point::new(-w, -h),
            Point::new(-w, 2.0 * h),
            Point::new(2.0 * w, 2.0 * h),
            Point::new(2.0 * w, -h),
        ]
    }
}

/// Shoelace-formula polygon area. Negative rings (clockwise) yield a negative
/// value; callers that need unsigned area should take `.abs()`.
pub fn signed_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::new(0.0, 0.0);
    }
    let n = points.len() as f64;
    let sum = points
        .iter()
        .fold(Point::new(0.0, 0.0), |acc, p| acc + *p);
    Point::new(sum.x / n, sum.y / n)
}

/// Round to `n` decimal digits. Centralized per spec §9's determinism note:
/// every floating-point rounding in the pipeline goes through this routine so
/// behavior is consistent and easy to audit.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_area_is_positive_for_ccw_winding() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        assert_approx_eq::assert_approx_eq!(signed_area(&square), 1.0);
    }

    #[test]
    fn latitude_runs_pole_to_pole() {
        let extent = Extent::new(100.0, 100.0);
        assert_approx_eq::assert_approx_eq!(extent.latitude_of(0.0), 90.0);
        assert_approx_eq::assert_approx_eq!(extent.latitude_of(100.0), -90.0);
        assert_approx_eq::assert_approx_eq!(extent.latitude_of(50.0), 0.0);
    }

    #[test]
    fn round_to_truncates_as_expected() {
        assert_approx_eq::assert_approx_eq!(round_to(1.23456, 2), 1.23);
    }
}
