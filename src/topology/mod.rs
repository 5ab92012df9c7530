pub mod directed_edge;
pub mod edge;
pub mod label;
pub mod node;

pub use directed_edge::{DirectedEdgeData, DirectedEdgeId, Quadrant};
pub use edge::{oriented_key, EdgeData, EdgeId};
pub use label::{Label, Location, Position};
pub use node::{NodeData, NodeId};

use std::collections::HashMap;

use crate::error::TopologyError;
use crate::math::{compare_points, coord_key, CoordKey, Point2};
use slotmap::SlotMap;

/// Arena that owns the nodes, edges and directed edges of a planar graph.
///
/// Entities reference each other via typed IDs (generational indices). Every
/// ID handed out by a graph stays valid for the graph's lifetime; looking up
/// an ID from another graph returns `TopologyError::EntityNotFound`.
#[derive(Debug, Default)]
pub struct PlanarGraph {
    nodes: SlotMap<NodeId, NodeData>,
    edges: SlotMap<EdgeId, EdgeData>,
    directed_edges: SlotMap<DirectedEdgeId, DirectedEdgeData>,
    node_index: HashMap<CoordKey, NodeId>,
    edge_index: HashMap<Vec<CoordKey>, EdgeId>,
}

impl PlanarGraph {
    /// Creates a new, empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Node operations ---

    /// Returns the node at `point`, creating it if needed.
    pub fn add_node(&mut self, point: Point2) -> NodeId {
        let key = coord_key(&point);
        if let Some(&id) = self.node_index.get(&key) {
            return id;
        }
        let id = self.nodes.insert(NodeData::new(point));
        self.node_index.insert(key, id);
        id
    }

    /// Looks up the node at exactly `point`.
    #[must_use]
    pub fn find_node(&self, point: &Point2) -> Option<NodeId> {
        self.node_index.get(&coord_key(point)).copied()
    }

    /// Returns the node data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not in this graph.
    pub fn node(&self, id: NodeId) -> Result<&NodeData, TopologyError> {
        self.nodes
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("node".into()))
    }

    /// Returns the node data mutably, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not in this graph.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData, TopologyError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("node".into()))
    }

    /// All node IDs in lexicographic coordinate order.
    #[must_use]
    pub fn sorted_node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().collect();
        ids.sort_by(|&a, &b| compare_points(&self.nodes[a].point, &self.nodes[b].point));
        ids
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // --- Edge operations ---

    /// Inserts an edge unless a geometrically identical one (in either
    /// direction) already exists.
    ///
    /// On a duplicate the incoming label is flipped if it runs the other
    /// way, merged into the existing label, and its depth delta is added to
    /// the existing edge's depth delta. Returns the ID of the stored edge.
    ///
    /// `points` must hold at least two points.
    pub fn insert_unique_edge(&mut self, points: Vec<Point2>, label: Label) -> EdgeId {
        let key = oriented_key(&points);
        if let Some(&existing) = self.edge_index.get(&key) {
            let edge = &mut self.edges[existing];
            let to_merge = if edge.is_pointwise_equal(&points) {
                label
            } else {
                label.flipped()
            };
            edge.label.merge(&to_merge);
            edge.depth_delta += to_merge.depth_delta();
            return existing;
        }
        let id = self.add_edge(points, label);
        self.edge_index.insert(key, id);
        id
    }

    /// Adds an edge with its two directed edges and links them into the
    /// stars of the end nodes.
    fn add_edge(&mut self, points: Vec<Point2>, label: Label) -> EdgeId {
        let n = points.len();
        let (start, second, penult, end) = (points[0], points[1], points[n - 2], points[n - 1]);
        let edge = self.edges.insert(EdgeData::new(points, label));

        let start_node = self.add_node(start);
        let end_node = self.add_node(end);
        let forward = self
            .directed_edges
            .insert(DirectedEdgeData::new(edge, true, start_node, start, second));
        let backward = self
            .directed_edges
            .insert(DirectedEdgeData::new(edge, false, end_node, end, penult));
        self.directed_edges[forward].sym = backward;
        self.directed_edges[backward].sym = forward;
        self.edges[edge].forward = forward;
        self.edges[edge].backward = backward;

        self.insert_into_star(forward);
        self.insert_into_star(backward);
        edge
    }

    /// Returns the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not in this graph.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, TopologyError> {
        self.edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // --- Directed edge operations ---

    /// Returns the directed edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the directed edge is not in this graph.
    pub fn directed_edge(&self, id: DirectedEdgeId) -> Result<&DirectedEdgeData, TopologyError> {
        self.directed_edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("directed edge".into()))
    }

    /// Returns the directed edge data mutably, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the directed edge is not in this graph.
    pub fn directed_edge_mut(&mut self, id: DirectedEdgeId) -> Result<&mut DirectedEdgeData, TopologyError> {
        self.directed_edges
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("directed edge".into()))
    }

    /// The opposite directed edge.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not in this graph.
    pub fn sym(&self, id: DirectedEdgeId) -> Result<DirectedEdgeId, TopologyError> {
        Ok(self.directed_edge(id)?.sym)
    }

    /// Points of a directed edge in traversal order.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not in this graph.
    pub fn directed_points(&self, id: DirectedEdgeId) -> Result<Vec<Point2>, TopologyError> {
        let de = self.directed_edge(id)?;
        let points = &self.edge(de.edge)?.points;
        Ok(if de.forward {
            points.clone()
        } else {
            points.iter().rev().copied().collect()
        })
    }

    /// Assigns a side depth and derives the opposite side from the edge's
    /// depth delta.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ConflictingDepth` on a mismatch.
    pub fn set_edge_depths(&mut self, id: DirectedEdgeId, position: Position, depth: i32) -> Result<(), TopologyError> {
        let delta = self.edge(self.directed_edge(id)?.edge)?.depth_delta;
        self.directed_edge_mut(id)?.set_edge_depths(position, depth, delta)
    }

    /// Mirrors the depths of `id` onto its sym: left becomes right and right
    /// becomes left.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ConflictingDepth` if the sym already carries
    /// different depths.
    pub fn copy_sym_depths(&mut self, id: DirectedEdgeId) -> Result<(), TopologyError> {
        let de = self.directed_edge(id)?;
        let (left, right, sym) = (de.depth(Position::Left), de.depth(Position::Right), de.sym);
        let sym_de = self.directed_edge_mut(sym)?;
        if let Some(right) = right {
            sym_de.set_depth(Position::Left, right)?;
        }
        if let Some(left) = left {
            sym_de.set_depth(Position::Right, left)?;
        }
        Ok(())
    }

    /// Returns `true` if both sides of the edge are interior.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not in this graph.
    pub fn is_interior_area_edge(&self, id: DirectedEdgeId) -> Result<bool, TopologyError> {
        Ok(self.edge(self.directed_edge(id)?.edge)?.label.is_interior_area())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn exterior_left() -> Label {
        Label::new(Location::Boundary, Location::Exterior, Location::Interior)
    }

    #[test]
    fn edge_creates_nodes_and_syms() {
        let mut g = PlanarGraph::new();
        let e = g.insert_unique_edge(vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 1.0)], exterior_left());
        assert_eq!(g.node_count(), 2);
        let edge = g.edge(e).unwrap();
        assert_eq!(g.sym(edge.forward).unwrap(), edge.backward);
        assert_eq!(g.sym(edge.backward).unwrap(), edge.forward);
        assert!((g.directed_edge(edge.backward).unwrap().dx + 1.0).abs() < f64::EPSILON);
        assert_eq!(g.directed_points(edge.backward).unwrap()[0], p(2.0, 1.0));
    }

    #[test]
    fn duplicate_edges_merge_depth_delta() {
        let mut g = PlanarGraph::new();
        let pts = vec![p(0.0, 0.0), p(1.0, 0.0)];
        let a = g.insert_unique_edge(pts.clone(), exterior_left());
        assert_eq!(g.edge(a).unwrap().depth_delta, -1);

        let b = g.insert_unique_edge(pts.clone(), exterior_left());
        assert_eq!(a, b);
        assert_eq!(g.edge(a).unwrap().depth_delta, -2);

        // The same curve traversed the other way with the same side labels
        // describes the opposite situation and cancels out.
        let reversed: Vec<Point2> = pts.iter().rev().copied().collect();
        g.insert_unique_edge(reversed.clone(), exterior_left());
        g.insert_unique_edge(reversed, exterior_left());
        assert_eq!(g.edge(a).unwrap().depth_delta, 0);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn depths_mirror_onto_sym() {
        let mut g = PlanarGraph::new();
        let e = g.insert_unique_edge(vec![p(0.0, 0.0), p(1.0, 0.0)], exterior_left());
        let fwd = g.edge(e).unwrap().forward;
        g.set_edge_depths(fwd, Position::Right, 1).unwrap();
        g.copy_sym_depths(fwd).unwrap();
        let sym = g.sym(fwd).unwrap();
        assert_eq!(g.directed_edge(fwd).unwrap().depth(Position::Left), Some(0));
        assert_eq!(g.directed_edge(sym).unwrap().depth(Position::Left), Some(1));
        assert_eq!(g.directed_edge(sym).unwrap().depth(Position::Right), Some(0));
    }

    #[test]
    fn nodes_sorted_lexicographically() {
        let mut g = PlanarGraph::new();
        g.insert_unique_edge(vec![p(5.0, 0.0), p(1.0, 3.0)], exterior_left());
        g.insert_unique_edge(vec![p(1.0, 3.0), p(1.0, -2.0)], exterior_left());
        let pts: Vec<Point2> = g.sorted_node_ids().into_iter().map(|n| g.node(n).unwrap().point).collect();
        assert_eq!(pts, vec![p(1.0, -2.0), p(1.0, 3.0), p(5.0, 0.0)]);
    }

    #[test]
    fn foreign_ids_are_reported_not_panicking() {
        let mut other = PlanarGraph::new();
        let e = other.insert_unique_edge(vec![p(0.0, 0.0), p(1.0, 0.0)], exterior_left());
        let fwd = other.edge(e).unwrap().forward;
        let node = other.directed_edge(fwd).unwrap().node;

        let g = PlanarGraph::new();
        assert!(matches!(g.edge(e), Err(TopologyError::EntityNotFound(_))));
        assert!(matches!(g.directed_edge(fwd), Err(TopologyError::EntityNotFound(_))));
        assert!(matches!(g.node(node), Err(TopologyError::EntityNotFound(_))));
        assert!(g.sym(fwd).is_err());
        assert!(g.directed_points(fwd).is_err());
    }
}
