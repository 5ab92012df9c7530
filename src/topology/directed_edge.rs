use std::cmp::Ordering;

use crate::error::TopologyError;
use crate::math::{orientation_index, Orientation, Point2};

use super::edge::EdgeId;
use super::label::Position;
use super::node::NodeId;

slotmap::new_key_type! {
    /// Unique identifier for a directed edge in the planar graph.
    pub struct DirectedEdgeId;
}

/// Quadrant of a direction vector, numbered counter-clockwise from +x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quadrant {
    NorthEast = 0,
    NorthWest = 1,
    SouthWest = 2,
    SouthEast = 3,
}

impl Quadrant {
    /// Quadrant of the vector `(dx, dy)`. Zero components count as
    /// non-negative.
    #[must_use]
    pub fn of(dx: f64, dy: f64) -> Self {
        match (dx >= 0.0, dy >= 0.0) {
            (true, true) => Self::NorthEast,
            (true, false) => Self::SouthEast,
            (false, true) => Self::NorthWest,
            (false, false) => Self::SouthWest,
        }
    }

    /// Returns `true` for the two quadrants above the x axis.
    #[must_use]
    pub fn is_northern(self) -> bool {
        matches!(self, Self::NorthEast | Self::NorthWest)
    }
}

/// One traversal direction of an edge, leaving from a node.
#[derive(Debug, Clone)]
pub struct DirectedEdgeData {
    /// The underlying edge.
    pub edge: EdgeId,
    /// `true` if this runs along the edge's point order.
    pub forward: bool,
    /// The directed edge running the other way.
    pub sym: DirectedEdgeId,
    /// Node this directed edge leaves from.
    pub node: NodeId,
    /// Next directed edge in a result ring.
    pub next: Option<DirectedEdgeId>,
    /// Start point (the node coordinate).
    pub p0: Point2,
    /// Second point, giving the leaving direction.
    pub p1: Point2,
    /// `p1.x - p0.x`.
    pub dx: f64,
    /// `p1.y - p0.y`.
    pub dy: f64,
    /// Quadrant of `(dx, dy)`.
    pub quadrant: Quadrant,
    depth_left: Option<i32>,
    depth_right: Option<i32>,
    /// Part of the buffer boundary.
    pub in_result: bool,
    /// Depth already assigned during propagation.
    pub visited: bool,
}

impl DirectedEdgeData {
    /// Creates a directed edge with unset depths.
    #[must_use]
    pub fn new(edge: EdgeId, forward: bool, node: NodeId, p0: Point2, p1: Point2) -> Self {
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        Self {
            edge,
            forward,
            sym: DirectedEdgeId::default(),
            node,
            next: None,
            p0,
            p1,
            dx,
            dy,
            quadrant: Quadrant::of(dx, dy),
            depth_left: None,
            depth_right: None,
            in_result: false,
            visited: false,
        }
    }

    /// Depth on the given side, if assigned.
    #[must_use]
    pub fn depth(&self, position: Position) -> Option<i32> {
        match position {
            Position::Left => self.depth_left,
            Position::Right => self.depth_right,
            Position::On => None,
        }
    }

    /// Assigns a depth, failing if a different depth was already assigned.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ConflictingDepth` on a mismatch.
    pub fn set_depth(&mut self, position: Position, depth: i32) -> Result<(), TopologyError> {
        let slot = match position {
            Position::Left => &mut self.depth_left,
            Position::Right => &mut self.depth_right,
            Position::On => return Ok(()),
        };
        match *slot {
            Some(existing) if existing != depth => Err(TopologyError::ConflictingDepth(self.p0)),
            _ => {
                *slot = Some(depth);
                Ok(())
            }
        }
    }

    /// Assigns the depth on one side and derives the other side from the
    /// edge's depth delta.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ConflictingDepth` on a mismatch.
    pub fn set_edge_depths(
        &mut self,
        position: Position,
        depth: i32,
        edge_depth_delta: i32,
    ) -> Result<(), TopologyError> {
        let mut delta = if self.forward { edge_depth_delta } else { -edge_depth_delta };
        if position == Position::Left {
            delta = -delta;
        }
        self.set_depth(position, depth)?;
        self.set_depth(position.opposite(), depth + delta)
    }

    /// Angular order around the shared start node, counter-clockwise from +x.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn compare_direction(&self, other: &Self) -> Ordering {
        if self.dx == other.dx && self.dy == other.dy {
            return Ordering::Equal;
        }
        match self.quadrant.cmp(&other.quadrant) {
            Ordering::Equal => match orientation_index(&other.p0, &other.p1, &self.p1) {
                Orientation::CounterClockwise => Ordering::Greater,
                Orientation::Clockwise => Ordering::Less,
                Orientation::Collinear => Ordering::Equal,
            },
            ord => ord,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn de(p1: Point2) -> DirectedEdgeData {
        DirectedEdgeData::new(
            EdgeId::default(),
            true,
            NodeId::default(),
            Point2::new(0.0, 0.0),
            p1,
        )
    }

    #[test]
    fn quadrant_boundaries() {
        assert_eq!(Quadrant::of(1.0, 0.0), Quadrant::NorthEast);
        assert_eq!(Quadrant::of(0.0, 1.0), Quadrant::NorthEast);
        assert_eq!(Quadrant::of(-1.0, 0.0), Quadrant::NorthWest);
        assert_eq!(Quadrant::of(0.0, -1.0), Quadrant::SouthEast);
        assert_eq!(Quadrant::of(-1.0, -1.0), Quadrant::SouthWest);
    }

    #[test]
    fn direction_order_is_counter_clockwise() {
        let east = de(Point2::new(1.0, 0.0));
        let ne = de(Point2::new(1.0, 1.0));
        let west = de(Point2::new(-1.0, 0.0));
        let south = de(Point2::new(0.0, -1.0));
        assert_eq!(east.compare_direction(&ne), Ordering::Less);
        assert_eq!(ne.compare_direction(&west), Ordering::Less);
        assert_eq!(west.compare_direction(&south), Ordering::Less);
        assert_eq!(south.compare_direction(&east), Ordering::Greater);
    }

    #[test]
    fn edge_depths_follow_delta() {
        let mut d = de(Point2::new(1.0, 0.0));
        d.set_edge_depths(Position::Right, 0, 1).unwrap();
        assert_eq!(d.depth(Position::Right), Some(0));
        assert_eq!(d.depth(Position::Left), Some(1));

        let mut back = de(Point2::new(1.0, 0.0));
        back.forward = false;
        back.set_edge_depths(Position::Right, 1, 1).unwrap();
        assert_eq!(back.depth(Position::Left), Some(0));
    }

    #[test]
    fn conflicting_depth_is_rejected() {
        let mut d = de(Point2::new(1.0, 0.0));
        d.set_depth(Position::Left, 1).unwrap();
        assert!(d.set_depth(Position::Left, 1).is_ok());
        assert!(matches!(
            d.set_depth(Position::Left, 2),
            Err(TopologyError::ConflictingDepth(_))
        ));
    }
}
