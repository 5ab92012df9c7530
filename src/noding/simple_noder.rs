use crate::error::BufferError;
use crate::geometry::PrecisionModel;
use crate::math::intersect_2d::{segment_intersection, SegmentIntersection};

use super::{for_each_segment_pair, Noder, SegmentString};

/// Fast, non-robust noder: all-pairs segment intersection in floating point.
///
/// Intersection points are rounded to the working precision model. With
/// floating precision the result may contain near-coincident nodes that
/// later fail topology assembly; the caller retries with snap rounding.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleNoder {
    precision: PrecisionModel,
}

impl SimpleNoder {
    /// Creates a noder that rounds intersection points to `precision`.
    #[must_use]
    pub fn new(precision: PrecisionModel) -> Self {
        Self { precision }
    }
}

/// Adjacent segments of one string meeting in their shared vertex do not
/// need a node.
fn is_trivial(ss: &SegmentString, i: usize, j: usize, intersection: &SegmentIntersection) -> bool {
    if intersection.count() != 1 {
        return false;
    }
    if i.abs_diff(j) == 1 {
        return true;
    }
    let last = ss.segment_count().saturating_sub(1);
    ss.is_closed() && ((i == 0 && j == last) || (j == 0 && i == last))
}

impl Noder for SimpleNoder {
    fn compute_nodes(&mut self, mut strings: Vec<SegmentString>) -> Result<Vec<SegmentString>, BufferError> {
        let mut found: Vec<(usize, usize, usize, usize, SegmentIntersection)> = Vec::new();
        for_each_segment_pair(&strings, |a, i, b, j| {
            let pa = strings[a].points();
            let pb = strings[b].points();
            let intersection = segment_intersection(&pa[i], &pa[i + 1], &pb[j], &pb[j + 1]);
            if intersection == SegmentIntersection::None {
                return;
            }
            if a == b && is_trivial(&strings[a], i, j, &intersection) {
                return;
            }
            found.push((a, i, b, j, intersection));
        });

        for (a, i, b, j, intersection) in found {
            let rounded = match intersection {
                SegmentIntersection::Point { point, proper } => SegmentIntersection::Point {
                    point: self.precision.make_precise(point),
                    proper,
                },
                SegmentIntersection::Collinear(p, q) => {
                    SegmentIntersection::Collinear(self.precision.make_precise(p), self.precision.make_precise(q))
                }
                SegmentIntersection::None => continue,
            };
            strings[a].add_intersections(&rounded, i);
            strings[b].add_intersections(&rounded, j);
        }

        Ok(strings.into_iter().flat_map(SegmentString::noded_substrings).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use crate::topology::{Label, Location};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn label() -> Label {
        Label::new(Location::Boundary, Location::Exterior, Location::Interior)
    }

    #[test]
    fn crossing_lines_are_split() {
        let strings = vec![
            SegmentString::new(vec![p(0.0, 0.0), p(2.0, 2.0)], label()),
            SegmentString::new(vec![p(0.0, 2.0), p(2.0, 0.0)], label()),
        ];
        let noded = SimpleNoder::default().compute_nodes(strings).unwrap();
        assert_eq!(noded.len(), 4);
        for ss in &noded {
            assert!(ss.points().iter().any(|q| (q - p(1.0, 1.0)).norm() < 1e-12));
        }
    }

    #[test]
    fn self_crossing_ring_is_split() {
        // Bow tie: the ring crosses itself once.
        let ring = vec![p(0.0, 0.0), p(2.0, 2.0), p(2.0, 0.0), p(0.0, 2.0), p(0.0, 0.0)];
        let noded = SimpleNoder::default()
            .compute_nodes(vec![SegmentString::new(ring, label())])
            .unwrap();
        assert_eq!(noded.len(), 3);
    }

    #[test]
    fn simple_ring_is_untouched() {
        let ring = vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(0.0, 0.0)];
        let noded = SimpleNoder::default()
            .compute_nodes(vec![SegmentString::new(ring.clone(), label())])
            .unwrap();
        assert_eq!(noded.len(), 1);
        assert_eq!(noded[0].points(), ring.as_slice());
    }

    #[test]
    fn fixed_precision_rounds_nodes() {
        let strings = vec![
            SegmentString::new(vec![p(0.0, 0.0), p(3.0, 1.0)], label()),
            SegmentString::new(vec![p(1.0, 1.0), p(1.0, -1.0)], label()),
        ];
        let pm = PrecisionModel::fixed(10.0).unwrap();
        let noded = SimpleNoder::new(pm).compute_nodes(strings).unwrap();
        assert!(noded
            .iter()
            .flat_map(SegmentString::points)
            .any(|q| (q - p(1.0, 0.3)).norm() < 1e-12));
    }
}
