use std::collections::{HashSet, VecDeque};

use crate::error::{BufferError, BufferResult};
use crate::geometry::Envelope;
use crate::math::Point2;
use crate::topology::{DirectedEdgeId, NodeId, PlanarGraph, Position};

use super::rightmost::find_rightmost_edge;

/// A connected component of the buffer graph.
///
/// Depths are computed per subgraph, starting from its rightmost edge whose
/// right side is known to lie outside the subgraph.
#[derive(Debug, Clone)]
pub(crate) struct BufferSubgraph {
    nodes: Vec<NodeId>,
    directed_edges: Vec<DirectedEdgeId>,
    rightmost_edge: DirectedEdgeId,
    rightmost_point: Point2,
    envelope: Envelope,
}

impl BufferSubgraph {
    /// Collects every node and directed edge reachable from `seed` and
    /// marks the nodes visited.
    ///
    /// # Errors
    ///
    /// Returns an error if no rightmost edge can be found.
    pub fn create(graph: &mut PlanarGraph, seed: NodeId) -> BufferResult<Self> {
        let mut nodes = Vec::new();
        let mut directed_edges = Vec::new();
        let mut stack = vec![seed];
        while let Some(node) = stack.pop() {
            if graph.node(node)?.visited {
                continue;
            }
            graph.node_mut(node)?.visited = true;
            nodes.push(node);
            for &de in &graph.node(node)?.star {
                directed_edges.push(de);
                let adjacent = graph.directed_edge(graph.sym(de)?)?.node;
                if !graph.node(adjacent)?.visited {
                    stack.push(adjacent);
                }
            }
        }

        let rightmost = find_rightmost_edge(graph, &directed_edges)?;
        let mut envelope = Envelope::null();
        for &de in &directed_edges {
            let data = graph.directed_edge(de)?;
            if data.forward {
                for p in &graph.edge(data.edge)?.points {
                    envelope.expand_to_include(p);
                }
            }
        }
        Ok(Self {
            nodes,
            directed_edges,
            rightmost_edge: rightmost.edge,
            rightmost_point: rightmost.point,
            envelope,
        })
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn directed_edges(&self) -> &[DirectedEdgeId] {
        &self.directed_edges
    }

    pub fn rightmost_point(&self) -> Point2 {
        self.rightmost_point
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Assigns depths to every directed edge, given the depth of the region
    /// just outside the subgraph's rightmost edge.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::Invariant` if a node is reached without any
    /// edge carrying a depth, and a topology error if depths disagree.
    pub fn compute_depth(&self, graph: &mut PlanarGraph, outside_depth: i32) -> BufferResult<()> {
        for &de in &self.directed_edges {
            graph.directed_edge_mut(de)?.visited = false;
        }
        let seed = self.rightmost_edge;
        graph.set_edge_depths(seed, Position::Right, outside_depth)?;
        graph.copy_sym_depths(seed)?;
        graph.directed_edge_mut(seed)?.visited = true;

        let start = graph.directed_edge(seed)?.node;
        let mut seen: HashSet<NodeId> = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            self.compute_node_depth(graph, node)?;
            for &de in &graph.node(node)?.star {
                let sym = graph.directed_edge(graph.sym(de)?)?;
                if sym.visited {
                    continue;
                }
                let adjacent = sym.node;
                if seen.insert(adjacent) {
                    queue.push_back(adjacent);
                }
            }
        }
        Ok(())
    }

    fn compute_node_depth(&self, graph: &mut PlanarGraph, node: NodeId) -> BufferResult<()> {
        let star = graph.node(node)?.star.clone();
        let mut start = None;
        for &de in &star {
            if graph.directed_edge(de)?.visited || graph.directed_edge(graph.sym(de)?)?.visited {
                start = Some(de);
                break;
            }
        }
        let Some(start) = start else {
            let p = graph.node(node)?.point;
            return Err(BufferError::Invariant(format!(
                "no edge with known depth at node ({}, {})",
                p.x, p.y
            )));
        };
        graph.compute_star_depths(start)?;
        for de in star {
            graph.directed_edge_mut(de)?.visited = true;
            graph.copy_sym_depths(de)?;
        }
        Ok(())
    }

    /// Marks the directed edges bounding the buffer: interior on the right,
    /// exterior on the left, and not interior on both sides.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge of the subgraph is missing from `graph`.
    pub fn find_result_edges(&self, graph: &mut PlanarGraph) -> BufferResult<()> {
        for &de in &self.directed_edges {
            let data = graph.directed_edge(de)?;
            let right = data.depth(Position::Right).unwrap_or(0);
            let left = data.depth(Position::Left).unwrap_or(0);
            if right >= 1 && left <= 0 && !graph.is_interior_area_edge(de)? {
                graph.directed_edge_mut(de)?.in_result = true;
            }
        }
        Ok(())
    }
}

/// Sorts subgraphs by decreasing rightmost x, so outer subgraphs come
/// before the ones they enclose.
pub(crate) fn sort_rightmost_first(subgraphs: &mut [BufferSubgraph]) {
    subgraphs.sort_by(|a, b| b.rightmost_point.x.total_cmp(&a.rightmost_point.x));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::topology::{Label, Location};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    /// Clockwise square with the interior on the right.
    fn square(graph: &mut PlanarGraph, min: f64, max: f64) {
        let label = Label::new(Location::Boundary, Location::Exterior, Location::Interior);
        graph.insert_unique_edge(
            vec![p(min, min), p(min, max), p(max, max), p(max, min), p(min, min)],
            label,
        );
    }

    fn subgraphs(graph: &mut PlanarGraph) -> Vec<BufferSubgraph> {
        let mut out = Vec::new();
        for node in graph.sorted_node_ids() {
            if !graph.node(node).unwrap().visited {
                out.push(BufferSubgraph::create(graph, node).unwrap());
            }
        }
        sort_rightmost_first(&mut out);
        out
    }

    #[test]
    fn disjoint_rings_form_separate_subgraphs() {
        let mut g = PlanarGraph::new();
        square(&mut g, 0.0, 1.0);
        square(&mut g, 5.0, 6.0);
        let subs = subgraphs(&mut g);
        assert_eq!(subs.len(), 2);
        assert!((subs[0].rightmost_point().x - 6.0).abs() < f64::EPSILON);
        assert!((subs[1].rightmost_point().x - 1.0).abs() < f64::EPSILON);
        assert!((subs[0].envelope().min_x() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn depths_mirror_and_result_edges_are_marked() {
        let mut g = PlanarGraph::new();
        square(&mut g, 0.0, 1.0);
        let subs = subgraphs(&mut g);
        subs[0].compute_depth(&mut g, 0).unwrap();
        subs[0].find_result_edges(&mut g).unwrap();

        for &de in subs[0].directed_edges() {
            let d = g.directed_edge(de).unwrap();
            let sym = g.directed_edge(d.sym).unwrap();
            assert_eq!(d.depth(Position::Left), sym.depth(Position::Right));
            assert_eq!(d.depth(Position::Right), sym.depth(Position::Left));
        }
        let in_result: Vec<bool> = subs[0]
            .directed_edges()
            .iter()
            .map(|&de| g.directed_edge(de).unwrap().in_result)
            .collect();
        assert_eq!(in_result.iter().filter(|&&r| r).count(), 1);
        let forward = subs[0]
            .directed_edges()
            .iter()
            .find(|&&de| g.directed_edge(de).unwrap().forward)
            .unwrap();
        assert!(g.directed_edge(*forward).unwrap().in_result);
        assert_eq!(g.directed_edge(*forward).unwrap().depth(Position::Right), Some(1));
    }

    #[test]
    fn overlapping_region_gets_depth_two() {
        // Two overlapping clockwise squares, noded by hand at (1, 2) and (2, 1).
        let mut g = PlanarGraph::new();
        let label = Label::new(Location::Boundary, Location::Exterior, Location::Interior);
        // First square (0,0)-(2,2), split at its crossings with the second.
        g.insert_unique_edge(vec![p(0.0, 0.0), p(0.0, 2.0), p(1.0, 2.0)], label);
        g.insert_unique_edge(vec![p(1.0, 2.0), p(2.0, 2.0), p(2.0, 1.0)], label);
        g.insert_unique_edge(vec![p(2.0, 1.0), p(2.0, 0.0), p(0.0, 0.0)], label);
        // Second square (1,1)-(3,3).
        g.insert_unique_edge(vec![p(1.0, 2.0), p(1.0, 3.0), p(3.0, 3.0), p(3.0, 1.0), p(2.0, 1.0)], label);
        g.insert_unique_edge(vec![p(2.0, 1.0), p(1.0, 1.0), p(1.0, 2.0)], label);

        let subs = subgraphs(&mut g);
        assert_eq!(subs.len(), 1);
        subs[0].compute_depth(&mut g, 0).unwrap();
        subs[0].find_result_edges(&mut g).unwrap();

        let inner = g.find_node(&p(1.0, 2.0)).unwrap();
        let max_depth = g
            .node(inner)
            .unwrap()
            .star
            .iter()
            .filter_map(|&de| g.directed_edge(de).unwrap().depth(Position::Right))
            .max()
            .unwrap();
        assert_eq!(max_depth, 2);
    }
}
