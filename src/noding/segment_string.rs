use std::cmp::Ordering;

use crate::geometry::{remove_repeated_points, Envelope};
use crate::math::intersect_2d::SegmentIntersection;
use crate::math::{same_point, Point2};
use crate::topology::Label;

/// A node recorded on a segment string: a point lying on segment
/// `segment_index`.
#[derive(Debug, Clone, Copy)]
struct SegmentNode {
    point: Point2,
    segment_index: usize,
    /// Squared distance from the segment start, for ordering along it.
    dist: f64,
}

/// A labelled coordinate sequence that accumulates the nodes where it must
/// be split.
#[derive(Debug, Clone)]
pub struct SegmentString {
    points: Vec<Point2>,
    label: Label,
    nodes: Vec<SegmentNode>,
}

impl SegmentString {
    /// Creates a segment string with no nodes.
    #[must_use]
    pub fn new(points: Vec<Point2>, label: Label) -> Self {
        Self {
            points,
            label,
            nodes: Vec::new(),
        }
    }

    /// The coordinates.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// The topology label carried from the input curve.
    #[must_use]
    pub fn label(&self) -> Label {
        self.label
    }

    /// Consumes the string, returning its coordinates.
    #[must_use]
    pub fn into_points(self) -> Vec<Point2> {
        self.points
    }

    /// Number of segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Returns `true` if the first and last points coincide.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) => self.points.len() > 1 && same_point(a, b),
            _ => false,
        }
    }

    /// Bounding box of segment `i`.
    #[must_use]
    pub fn segment_envelope(&self, i: usize) -> Envelope {
        Envelope::from_points(&self.points[i..=i + 1])
    }

    /// Records a node at `point` on segment `segment_index`.
    ///
    /// A point equal to the segment's end vertex is recorded on the next
    /// segment, so every vertex maps to exactly one segment index.
    pub fn add_intersection(&mut self, point: Point2, segment_index: usize) {
        let mut index = segment_index;
        if let Some(next) = self.points.get(index + 1) {
            if same_point(next, &point) {
                index += 1;
            }
        }
        let dist = self
            .points
            .get(index)
            .map_or(0.0, |start| (point - start).norm_squared());
        self.nodes.push(SegmentNode {
            point,
            segment_index: index,
            dist,
        });
    }

    /// Records every point of an intersection on segment `segment_index`.
    pub fn add_intersections(&mut self, intersection: &SegmentIntersection, segment_index: usize) {
        for point in intersection.points() {
            self.add_intersection(point, segment_index);
        }
    }

    /// Splits the string at every recorded node (and at both end points).
    ///
    /// Each substring keeps the parent's label. Consecutive repeated points
    /// are removed; a substring collapsing to a single point is still
    /// returned as a two-point string so that callers can decide to drop it.
    #[must_use]
    pub fn noded_substrings(mut self) -> Vec<SegmentString> {
        let n = self.points.len();
        if n < 2 {
            return Vec::new();
        }
        self.add_intersection(self.points[0], 0);
        self.add_intersection(self.points[n - 1], n - 1);

        self.nodes.sort_by(|a, b| {
            a.segment_index
                .cmp(&b.segment_index)
                .then(a.dist.partial_cmp(&b.dist).unwrap_or(Ordering::Equal))
        });
        self.nodes
            .dedup_by(|b, a| a.segment_index == b.segment_index && same_point(&a.point, &b.point));

        let mut out = Vec::with_capacity(self.nodes.len().saturating_sub(1));
        for pair in self.nodes.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            let mut pts = Vec::with_capacity(end.segment_index - start.segment_index + 2);
            pts.push(start.point);
            pts.extend_from_slice(&self.points[start.segment_index + 1..=end.segment_index]);
            let last_seg_start = self.points[end.segment_index];
            let end_is_interior = !same_point(&end.point, &last_seg_start);
            if end_is_interior || pts.len() == 1 {
                pts.push(end.point);
            }
            let mut pts = remove_repeated_points(&pts);
            if pts.len() == 1 {
                pts.push(pts[0]);
            }
            out.push(SegmentString::new(pts, self.label));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Location;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn label() -> Label {
        Label::new(Location::Boundary, Location::Exterior, Location::Interior)
    }

    #[test]
    fn unnoded_string_is_returned_whole() {
        let ss = SegmentString::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)], label());
        let parts = ss.noded_substrings();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].points().len(), 3);
    }

    #[test]
    fn split_at_interior_node() {
        let mut ss = SegmentString::new(vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0)], label());
        ss.add_intersection(p(2.0, 0.0), 0);
        let parts = ss.noded_substrings();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].points(), &[p(0.0, 0.0), p(2.0, 0.0)]);
        assert_eq!(parts[1].points(), &[p(2.0, 0.0), p(4.0, 0.0), p(4.0, 4.0)]);
        assert_eq!(parts[1].label(), label());
    }

    #[test]
    fn node_at_vertex_splits_there() {
        let mut ss = SegmentString::new(vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0)], label());
        ss.add_intersection(p(4.0, 0.0), 0);
        let parts = ss.noded_substrings();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].points(), &[p(0.0, 0.0), p(4.0, 0.0)]);
        assert_eq!(parts[1].points(), &[p(4.0, 0.0), p(4.0, 4.0)]);
    }

    #[test]
    fn multiple_nodes_on_one_segment_are_ordered() {
        let mut ss = SegmentString::new(vec![p(0.0, 0.0), p(10.0, 0.0)], label());
        ss.add_intersection(p(7.0, 0.0), 0);
        ss.add_intersection(p(3.0, 0.0), 0);
        ss.add_intersection(p(3.0, 0.0), 0);
        let parts = ss.noded_substrings();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].points(), &[p(3.0, 0.0), p(7.0, 0.0)]);
    }

    #[test]
    fn closed_string() {
        let ss = SegmentString::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(0.0, 0.0)], label());
        assert!(ss.is_closed());
        assert_eq!(ss.segment_count(), 3);
    }
}
