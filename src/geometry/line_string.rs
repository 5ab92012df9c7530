use crate::math::{same_point, Point2};

use super::Envelope;

/// An ordered sequence of points joined by straight segments.
///
/// A ring is a line string whose first and last points coincide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineString {
    pub points: Vec<Point2>,
}

impl LineString {
    /// Creates a line string from its points.
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Creates a line string from `(x, y)` pairs.
    #[must_use]
    pub fn from_xy(coords: &[(f64, f64)]) -> Self {
        Self {
            points: coords.iter().map(|&(x, y)| Point2::new(x, y)).collect(),
        }
    }

    /// Creates a closed ring from `(x, y)` pairs, appending the closing point
    /// when it is missing.
    #[must_use]
    pub fn ring_from_xy(coords: &[(f64, f64)]) -> Self {
        let mut ring = Self::from_xy(coords);
        ring.close();
        ring
    }

    /// Returns `true` if the line string has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns `true` if the first and last points coincide.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) => same_point(a, b),
            _ => false,
        }
    }

    /// Appends the first point if the line string is not already closed.
    pub fn close(&mut self) {
        if let Some(&first) = self.points.first() {
            if !self.is_closed() {
                self.points.push(first);
            }
        }
    }

    /// Returns the number of segments in this line string.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Returns a copy of the points with consecutive duplicates removed.
    #[must_use]
    pub fn without_repeated_points(&self) -> Vec<Point2> {
        remove_repeated_points(&self.points)
    }

    /// Bounding box of the points.
    #[must_use]
    pub fn envelope(&self) -> Envelope {
        Envelope::from_points(&self.points)
    }

}

/// Removes consecutive duplicate points.
#[must_use]
pub fn remove_repeated_points(points: &[Point2]) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().is_some_and(|last| same_point(last, p)) {
            continue;
        }
        out.push(*p);
    }
    out
}
