use crate::math::distance_2d::point_to_segment_dist;
use crate::math::{orientation_index, Orientation, Point2};

/// Number of vertices sampled along a deleted span to confirm it is shallow.
const NUM_PTS_TO_CHECK: usize = 10;

/// Removes shallow concavities from a line before offsetting it.
///
/// The sign of `distance_tol` selects the side whose concavities are
/// removed: positive removes counter-clockwise turns (concave on the left),
/// negative removes clockwise turns. A vertex is deleted when it turns
/// towards that side and lies within `|distance_tol|` of the chord joining
/// its neighbours. Deletion repeats until nothing changes. The first two
/// vertices and the last one are never removed.
#[must_use]
pub fn simplify(points: &[Point2], distance_tol: f64) -> Vec<Point2> {
    let mut simplifier = Simplifier {
        points,
        tol: distance_tol.abs(),
        concave: if distance_tol < 0.0 {
            Orientation::Clockwise
        } else {
            Orientation::CounterClockwise
        },
        deleted: vec![false; points.len()],
    };
    while simplifier.delete_shallow_concavities() {}
    points
        .iter()
        .zip(&simplifier.deleted)
        .filter(|(_, &deleted)| !deleted)
        .map(|(p, _)| *p)
        .collect()
}

struct Simplifier<'a> {
    points: &'a [Point2],
    tol: f64,
    concave: Orientation,
    deleted: Vec<bool>,
}

impl Simplifier<'_> {
    /// One pass over the vertex triples. Returns `true` if any vertex was
    /// deleted.
    fn delete_shallow_concavities(&mut self) -> bool {
        let mut index = 1;
        let mut mid = self.next_index(index);
        let mut last = self.next_index(mid);
        let mut changed = false;
        while last < self.points.len() {
            if self.is_deletable(index, mid, last) {
                self.deleted[mid] = true;
                changed = true;
                index = last;
            } else {
                index = mid;
            }
            mid = self.next_index(index);
            last = self.next_index(mid);
        }
        changed
    }

    fn next_index(&self, index: usize) -> usize {
        let mut next = index + 1;
        while next < self.points.len() && self.deleted[next] {
            next += 1;
        }
        next
    }

    fn is_deletable(&self, i0: usize, i1: usize, i2: usize) -> bool {
        let (p0, p1, p2) = (&self.points[i0], &self.points[i1], &self.points[i2]);
        orientation_index(p0, p1, p2) == self.concave
            && self.is_shallow(p0, p1, p2)
            && self.is_shallow_sampled(p0, p2, i0, i2)
    }

    fn is_shallow(&self, p0: &Point2, p1: &Point2, p2: &Point2) -> bool {
        point_to_segment_dist(p1, p0, p2) < self.tol
    }

    /// Checks a sample of the original vertices between `i0` and `i2`
    /// against the chord `p0 p2`.
    fn is_shallow_sampled(&self, p0: &Point2, p2: &Point2, i0: usize, i2: usize) -> bool {
        let step = ((i2 - i0) / NUM_PTS_TO_CHECK).max(1);
        (i0..i2)
            .step_by(step)
            .all(|i| self.is_shallow(p0, &self.points[i], p2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn notched() -> Vec<Point2> {
        vec![p(0.0, 0.0), p(1.0, 0.0), p(2.5, -0.005), p(4.0, 0.0), p(5.0, 0.0)]
    }

    #[test]
    fn removes_shallow_concavity_on_selected_side() {
        let out = simplify(&notched(), 0.01);
        assert_eq!(out, vec![p(0.0, 0.0), p(1.0, 0.0), p(4.0, 0.0), p(5.0, 0.0)]);
    }

    #[test]
    fn keeps_notch_when_simplifying_other_side() {
        let out = simplify(&notched(), -0.01);
        assert!(out.contains(&p(2.5, -0.005)));
        assert_eq!(out.first(), Some(&p(0.0, 0.0)));
        assert_eq!(out.last(), Some(&p(5.0, 0.0)));
    }

    #[test]
    fn keeps_deep_concavity() {
        let pts = vec![p(0.0, 0.0), p(1.0, 0.0), p(2.5, -1.0), p(4.0, 0.0), p(5.0, 0.0)];
        assert_eq!(simplify(&pts, 0.01), pts);
    }

    #[test]
    fn repeats_until_fixpoint() {
        let pts = vec![
            p(0.0, 0.0),
            p(1.0, 0.0),
            p(2.0, -0.004),
            p(3.0, -0.006),
            p(4.0, -0.004),
            p(5.0, 0.0),
            p(6.0, 0.0),
        ];
        let out = simplify(&pts, 0.01);
        assert_eq!(out.first(), Some(&p(0.0, 0.0)));
        assert_eq!(out.last(), Some(&p(6.0, 0.0)));
        assert!(out.len() < pts.len());
    }

    #[test]
    fn short_lines_are_untouched() {
        let pts = vec![p(0.0, 0.0), p(1.0, 1.0)];
        assert_eq!(simplify(&pts, 0.5), pts);
    }
}
