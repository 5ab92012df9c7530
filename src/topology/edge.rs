use crate::math::{coord_key, same_point, CoordKey, Point2};

use super::directed_edge::DirectedEdgeId;
use super::label::Label;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the planar graph.
    pub struct EdgeId;
}

/// Data associated with an undirected graph edge.
///
/// An edge is a noded coordinate sequence carrying the merged label of every
/// input curve that produced it.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Coordinates from the start node to the end node.
    pub points: Vec<Point2>,
    /// Topology label in the direction of `points`.
    pub label: Label,
    /// Depth change when crossing the edge from right to left.
    pub depth_delta: i32,
    /// Directed edge running along `points`.
    pub forward: DirectedEdgeId,
    /// Directed edge running against `points`.
    pub backward: DirectedEdgeId,
}

impl EdgeData {
    /// Creates an unlinked edge; directed edges are attached by the graph.
    #[must_use]
    pub fn new(points: Vec<Point2>, label: Label) -> Self {
        let depth_delta = label.depth_delta();
        Self {
            points,
            label,
            depth_delta,
            forward: DirectedEdgeId::default(),
            backward: DirectedEdgeId::default(),
        }
    }

    /// Returns `true` if both edges have the same points in the same order.
    #[must_use]
    pub fn is_pointwise_equal(&self, points: &[Point2]) -> bool {
        self.points.len() == points.len()
            && self.points.iter().zip(points).all(|(a, b)| same_point(a, b))
    }
}

/// Direction-independent identity of a coordinate sequence.
///
/// A sequence and its reverse produce the same key: the key is built in the
/// direction whose first differing end point is lexicographically smaller.
#[must_use]
pub fn oriented_key(points: &[Point2]) -> Vec<CoordKey> {
    let n = points.len();
    let mut increasing = true;
    for i in 0..n / 2 {
        match crate::math::compare_points(&points[i], &points[n - 1 - i]) {
            std::cmp::Ordering::Less => break,
            std::cmp::Ordering::Greater => {
                increasing = false;
                break;
            }
            std::cmp::Ordering::Equal => {}
        }
    }
    if increasing {
        points.iter().map(coord_key).collect()
    } else {
        points.iter().rev().map(coord_key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn reversed_sequences_share_key() {
        let a = [p(0.0, 0.0), p(1.0, 1.0), p(2.0, 0.0)];
        let b = [p(2.0, 0.0), p(1.0, 1.0), p(0.0, 0.0)];
        assert_eq!(oriented_key(&a), oriented_key(&b));
    }

    #[test]
    fn distinct_sequences_differ() {
        let a = [p(0.0, 0.0), p(1.0, 1.0), p(2.0, 0.0)];
        let b = [p(0.0, 0.0), p(1.0, -1.0), p(2.0, 0.0)];
        assert_ne!(oriented_key(&a), oriented_key(&b));
    }

    #[test]
    fn closed_loop_key_is_stable() {
        let a = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 0.0)];
        let b = [p(0.0, 0.0), p(1.0, 1.0), p(1.0, 0.0), p(0.0, 0.0)];
        assert_eq!(oriented_key(&a), oriented_key(&b));
    }
}
