use crate::math::polygon_2d::signed_area_2d;

use super::{Envelope, LineString};

/// A planar area bounded by one shell ring and zero or more hole rings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub shell: LineString,
    pub holes: Vec<LineString>,
}

impl Polygon {
    /// Creates a polygon from a shell and holes. Rings are expected to be
    /// closed.
    #[must_use]
    pub fn new(shell: LineString, holes: Vec<LineString>) -> Self {
        Self { shell, holes }
    }

    /// The polygon with no points.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a hole-free polygon from `(x, y)` pairs, closing the ring.
    #[must_use]
    pub fn from_xy(coords: &[(f64, f64)]) -> Self {
        Self::new(LineString::ring_from_xy(coords), Vec::new())
    }

    /// Creates an axis-aligned rectangle.
    #[must_use]
    pub fn rectangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::from_xy(&[(min_x, min_y), (max_x, min_y), (max_x, max_y), (min_x, max_y)])
    }

    /// Returns `true` if the shell has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shell.is_empty()
    }

    /// Enclosed area: shell area minus hole areas.
    #[must_use]
    pub fn area(&self) -> f64 {
        let shell = signed_area_2d(&self.shell.points).abs();
        let holes: f64 = self.holes.iter().map(|h| signed_area_2d(&h.points).abs()).sum();
        shell - holes
    }

    /// Bounding box of the shell.
    #[must_use]
    pub fn envelope(&self) -> Envelope {
        self.shell.envelope()
    }

    /// Iterates the shell followed by the holes.
    pub fn rings(&self) -> impl Iterator<Item = &LineString> {
        std::iter::once(&self.shell).chain(self.holes.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_area() {
        let r = Polygon::rectangle(0.0, 0.0, 4.0, 3.0);
        assert!((r.area() - 12.0).abs() < 1e-12);
        assert!(r.shell.is_closed());
    }

    #[test]
    fn area_subtracts_holes() {
        let mut p = Polygon::rectangle(0.0, 0.0, 10.0, 10.0);
        p.holes.push(LineString::ring_from_xy(&[(2.0, 2.0), (2.0, 4.0), (4.0, 4.0), (4.0, 2.0)]));
        assert!((p.area() - 96.0).abs() < 1e-12);
        assert_eq!(p.rings().count(), 2);
    }

    #[test]
    fn empty_polygon() {
        let p = Polygon::empty();
        assert!(p.is_empty());
        assert!(p.area().abs() < f64::EPSILON);
        assert!(p.envelope().is_null());
    }
}
