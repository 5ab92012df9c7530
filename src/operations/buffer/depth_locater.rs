use std::cmp::Ordering;

use crate::error::BufferResult;
use crate::math::{compare_points, orientation_index, Point2};
use crate::topology::{PlanarGraph, Position};

use super::subgraph::BufferSubgraph;

/// A subgraph segment crossed by the stabbing ray, normalized to point
/// upward, with the depth on its left side.
#[derive(Debug, Clone, Copy)]
struct DepthSegment {
    p0: Point2,
    p1: Point2,
    left_depth: i32,
}

impl DepthSegment {
    fn min_x(&self) -> f64 {
        self.p0.x.min(self.p1.x)
    }

    fn max_x(&self) -> f64 {
        self.p0.x.max(self.p1.x)
    }

    /// Orientation of `other` relative to this segment: 1 if it lies
    /// entirely to the left, -1 if entirely to the right, 0 otherwise.
    fn orientation_of(&self, other: &Self) -> i32 {
        let o0 = orientation_index(&self.p0, &self.p1, &other.p0).signum();
        let o1 = orientation_index(&self.p0, &self.p1, &other.p1).signum();
        if o0 >= 0 && o1 >= 0 {
            o0.max(o1)
        } else if o0 <= 0 && o1 <= 0 {
            o0.min(o1)
        } else {
            0
        }
    }

    /// Orders segments left to right along the ray; the leftmost is the
    /// one closest to the query point.
    fn compare(&self, other: &Self) -> Ordering {
        if self.min_x() >= other.max_x() {
            return Ordering::Greater;
        }
        if self.max_x() <= other.min_x() {
            return Ordering::Less;
        }
        let orient = self.orientation_of(other);
        if orient != 0 {
            return orient.cmp(&0);
        }
        let orient = -other.orientation_of(self);
        if orient != 0 {
            return orient.cmp(&0);
        }
        compare_points(&self.p0, &other.p0).then_with(|| compare_points(&self.p1, &other.p1))
    }
}

/// Finds the depth of a point from already-labelled subgraphs, by casting a
/// ray to the right and taking the depth beside the nearest crossed
/// segment.
pub(crate) struct SubgraphDepthLocater<'a> {
    graph: &'a PlanarGraph,
    subgraphs: &'a [BufferSubgraph],
}

impl<'a> SubgraphDepthLocater<'a> {
    pub fn new(graph: &'a PlanarGraph, subgraphs: &'a [BufferSubgraph]) -> Self {
        Self { graph, subgraphs }
    }

    /// Depth of the region containing `p`, or 0 if no subgraph lies to its
    /// right.
    ///
    /// # Errors
    ///
    /// Returns an error if a subgraph edge is missing from the graph.
    pub fn depth(&self, p: &Point2) -> BufferResult<i32> {
        Ok(self
            .stabbed_segments(p)?
            .into_iter()
            .min_by(DepthSegment::compare)
            .map_or(0, |seg| seg.left_depth))
    }

    fn stabbed_segments(&self, p: &Point2) -> BufferResult<Vec<DepthSegment>> {
        let mut segments = Vec::new();
        for subgraph in self.subgraphs {
            let env = subgraph.envelope();
            if p.y < env.min_y() || p.y > env.max_y() {
                continue;
            }
            for &de in subgraph.directed_edges() {
                let data = self.graph.directed_edge(de)?;
                if !data.forward {
                    continue;
                }
                let left = data.depth(Position::Left).unwrap_or(0);
                let right = data.depth(Position::Right).unwrap_or(0);
                for w in self.graph.edge(data.edge)?.points.windows(2) {
                    if let Some(seg) = stab(p, w[0], w[1], left, right) {
                        segments.push(seg);
                    }
                }
            }
        }
        Ok(segments)
    }
}

#[allow(clippy::float_cmp)]
fn stab(p: &Point2, a: Point2, b: Point2, left: i32, right: i32) -> Option<DepthSegment> {
    // Upward orientation swaps the sides of a downward segment.
    let (p0, p1, depth) = if a.y > b.y { (b, a, right) } else { (a, b, left) };
    if p0.x.max(p1.x) < p.x || p0.y == p1.y || p.y < p0.y || p.y > p1.y {
        return None;
    }
    if orientation_index(&p0, &p1, p) == crate::math::Orientation::Clockwise {
        return None;
    }
    Some(DepthSegment {
        p0,
        p1,
        left_depth: depth,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::topology::{Label, Location};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn labelled_square(graph: &mut PlanarGraph, min: f64, max: f64) -> BufferSubgraph {
        let label = Label::new(Location::Boundary, Location::Exterior, Location::Interior);
        let edge = graph.insert_unique_edge(
            vec![p(min, min), p(min, max), p(max, max), p(max, min), p(min, min)],
            label,
        );
        let node = graph.directed_edge(graph.edge(edge).unwrap().forward).unwrap().node;
        let sub = BufferSubgraph::create(graph, node).unwrap();
        sub.compute_depth(graph, 0).unwrap();
        sub
    }

    #[test]
    fn point_inside_square_has_depth_one() {
        let mut g = PlanarGraph::new();
        let sub = labelled_square(&mut g, 0.0, 10.0);
        let subs = [sub];
        let locater = SubgraphDepthLocater::new(&g, &subs);
        assert_eq!(locater.depth(&p(5.0, 5.0)).unwrap(), 1);
        assert_eq!(locater.depth(&p(-5.0, 5.0)).unwrap(), 0);
        assert_eq!(locater.depth(&p(15.0, 5.0)).unwrap(), 0);
        assert_eq!(locater.depth(&p(5.0, 20.0)).unwrap(), 0);
    }

    #[test]
    fn nearest_segment_wins() {
        let a = DepthSegment {
            p0: p(1.0, 0.0),
            p1: p(1.0, 2.0),
            left_depth: 3,
        };
        let b = DepthSegment {
            p0: p(4.0, 0.0),
            p1: p(4.0, 2.0),
            left_depth: 7,
        };
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(b.compare(&a), Ordering::Greater);

        // Overlapping x ranges fall back to orientation.
        let c = DepthSegment {
            p0: p(0.0, 0.0),
            p1: p(2.0, 2.0),
            left_depth: 0,
        };
        let d = DepthSegment {
            p0: p(1.0, 0.0),
            p1: p(3.0, 2.0),
            left_depth: 0,
        };
        assert_eq!(c.compare(&d), Ordering::Less);
    }

    #[test]
    fn collinear_segments_order_by_points() {
        let seg = |x0: f64, y0: f64, x1: f64, y1: f64| DepthSegment {
            p0: p(x0, y0),
            p1: p(x1, y1),
            left_depth: 0,
        };
        let a = seg(0.0, 0.0, 2.0, 2.0);
        let b = seg(1.0, 1.0, 3.0, 3.0);
        assert_eq!(a.orientation_of(&b), 0);
        assert_eq!(b.orientation_of(&a), 0);
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(b.compare(&a), Ordering::Greater);

        // Same start point: the end point decides.
        let c = seg(0.0, 0.0, 3.0, 3.0);
        assert_eq!(a.compare(&c), Ordering::Less);
        assert_eq!(c.compare(&a), Ordering::Greater);
        assert_eq!(a.compare(&a), Ordering::Equal);
    }
}
