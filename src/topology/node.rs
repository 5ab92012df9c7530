use std::cmp::Ordering;

use crate::error::TopologyError;
use crate::math::Point2;

use super::directed_edge::DirectedEdgeId;
use super::label::Position;
use super::PlanarGraph;

slotmap::new_key_type! {
    /// Unique identifier for a node in the planar graph.
    pub struct NodeId;
}

/// A graph vertex with its star of outgoing directed edges.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Node coordinate.
    pub point: Point2,
    /// Outgoing directed edges, sorted counter-clockwise from +x.
    pub star: Vec<DirectedEdgeId>,
    /// Reached by a subgraph traversal.
    pub visited: bool,
}

impl NodeData {
    /// Creates a node with an empty star.
    #[must_use]
    pub fn new(point: Point2) -> Self {
        Self {
            point,
            star: Vec::new(),
            visited: false,
        }
    }
}

impl PlanarGraph {
    /// Inserts a directed edge into its start node's star, keeping the star
    /// in angular order. Edges with equal direction keep insertion order.
    pub(crate) fn insert_into_star(&mut self, de: DirectedEdgeId) {
        let node = self.directed_edges[de].node;
        let new_de = &self.directed_edges[de];
        let star = &self.nodes[node].star;
        let pos = star
            .iter()
            .position(|&other| {
                self.directed_edges[other].compare_direction(new_de) == Ordering::Greater
            })
            .unwrap_or(star.len());
        self.nodes[node].star.insert(pos, de);
    }

    /// The star edge leaving closest to the +x direction from the right.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::HorizontalStar` if the only candidates are
    /// horizontal edges in opposite hemispheres.
    #[allow(clippy::float_cmp)]
    pub fn rightmost_star_edge(&self, node: NodeId) -> Result<Option<DirectedEdgeId>, TopologyError> {
        let star = &self.node(node)?.star;
        let (Some(&first), Some(&last)) = (star.first(), star.last()) else {
            return Ok(None);
        };
        if star.len() == 1 {
            return Ok(Some(first));
        }
        let de0 = &self.directed_edges[first];
        let de1 = &self.directed_edges[last];
        match (de0.quadrant.is_northern(), de1.quadrant.is_northern()) {
            (true, true) => Ok(Some(first)),
            (false, false) => Ok(Some(last)),
            _ if de0.dy != 0.0 => Ok(Some(first)),
            _ if de1.dy != 0.0 => Ok(Some(last)),
            _ => Err(TopologyError::HorizontalStar(self.nodes[node].point)),
        }
    }

    /// Walks the star counter-clockwise from `start`, assigning right depths
    /// from the left depth of the previous edge.
    ///
    /// `start` must already have both depths assigned.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::DepthMismatch` if the walk does not return to
    /// the starting edge's right depth, or `ConflictingDepth` if an edge
    /// already carries a different depth.
    pub fn compute_star_depths(&mut self, start: DirectedEdgeId) -> Result<(), TopologyError> {
        let node = self.directed_edge(start)?.node;
        let node_data = self.node(node)?;
        let (star, point) = (node_data.star.clone(), node_data.point);
        let Some(index) = star.iter().position(|&d| d == start) else {
            return Err(TopologyError::DepthMismatch(point));
        };
        let (Some(start_depth), Some(target)) = (
            self.directed_edges[start].depth(Position::Left),
            self.directed_edges[start].depth(Position::Right),
        ) else {
            return Err(TopologyError::DepthMismatch(point));
        };

        let mut depth = start_depth;
        for &de in star[index + 1..].iter().chain(&star[..index]) {
            let delta = self.edges[self.directed_edges[de].edge].depth_delta;
            let data = &mut self.directed_edges[de];
            data.set_edge_depths(Position::Right, depth, delta)?;
            depth = data.depth(Position::Left).unwrap_or(depth);
        }
        if depth != target {
            return Err(TopologyError::DepthMismatch(point));
        }
        Ok(())
    }

    /// Links each incoming result edge at `node` to the next outgoing result
    /// edge in counter-clockwise order.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::UnlinkedEdge` if an incoming result edge has no
    /// outgoing partner.
    pub fn link_result_edges(&mut self, node: NodeId) -> Result<(), TopologyError> {
        let area_edges: Vec<DirectedEdgeId> = self
            .node(node)?
            .star
            .iter()
            .copied()
            .filter(|&de| {
                self.directed_edges[de].in_result
                    || self.directed_edges[self.directed_edges[de].sym].in_result
            })
            .collect();

        let mut first_out = None;
        let mut incoming: Option<DirectedEdgeId> = None;
        for out in area_edges {
            let out_in_result = self.directed_edges[out].in_result;
            let sym = self.directed_edges[out].sym;
            if first_out.is_none() && out_in_result {
                first_out = Some(out);
            }
            match incoming {
                None => {
                    if self.directed_edges[sym].in_result {
                        incoming = Some(sym);
                    }
                }
                Some(inc) => {
                    if out_in_result {
                        self.directed_edges[inc].next = Some(out);
                        incoming = None;
                    }
                }
            }
        }
        if let Some(inc) = incoming {
            let Some(out) = first_out else {
                return Err(TopologyError::UnlinkedEdge(self.nodes[node].point));
            };
            self.directed_edges[inc].next = Some(out);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::topology::{Label, Location};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn area_label() -> Label {
        Label::new(Location::Boundary, Location::Exterior, Location::Interior)
    }

    #[test]
    fn star_is_sorted_counter_clockwise() {
        let mut g = PlanarGraph::new();
        let origin = p(0.0, 0.0);
        g.insert_unique_edge(vec![origin, p(0.0, -1.0)], area_label());
        g.insert_unique_edge(vec![origin, p(-1.0, 0.0)], area_label());
        g.insert_unique_edge(vec![origin, p(1.0, 0.0)], area_label());
        g.insert_unique_edge(vec![origin, p(0.0, 1.0)], area_label());

        let node = g.find_node(&origin).unwrap();
        let dirs: Vec<(f64, f64)> = g
            .node(node)
            .unwrap()
            .star
            .iter()
            .map(|&d| g.directed_edge(d).unwrap())
            .map(|d| (d.dx, d.dy))
            .collect();
        assert_eq!(dirs, vec![(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)]);
    }

    #[test]
    fn rightmost_edge_prefers_non_horizontal() {
        let mut g = PlanarGraph::new();
        let origin = p(0.0, 0.0);
        g.insert_unique_edge(vec![origin, p(-1.0, 1.0)], area_label());
        g.insert_unique_edge(vec![origin, p(-1.0, -1.0)], area_label());
        let node = g.find_node(&origin).unwrap();
        let de = g.rightmost_star_edge(node).unwrap().unwrap();
        // NW first, SW last: the first edge is taken since it is not horizontal.
        assert!((g.directed_edge(de).unwrap().dy - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rightmost_edge_skips_horizontal_first_edge() {
        let mut g = PlanarGraph::new();
        let origin = p(0.0, 0.0);
        g.insert_unique_edge(vec![origin, p(1.0, 0.0)], area_label());
        g.insert_unique_edge(vec![origin, p(1.0, -1.0)], area_label());
        g.insert_unique_edge(vec![origin, p(-1.0, 0.0)], area_label());
        let node = g.find_node(&origin).unwrap();
        // NE (east) first, SE last: different hemispheres, east is horizontal,
        // so the south-east edge is used.
        let de = g.rightmost_star_edge(node).unwrap().unwrap();
        assert!((g.directed_edge(de).unwrap().dy + 1.0).abs() < f64::EPSILON);
    }
}
