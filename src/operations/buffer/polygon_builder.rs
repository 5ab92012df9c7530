use std::collections::{HashMap, HashSet};

use crate::error::{BufferResult, TopologyError};
use crate::geometry::{Envelope, GeometryFactory, LineString, Polygon};
use crate::math::polygon_2d::{point_in_ring, signed_area_2d};
use crate::math::{same_point, Point2};
use crate::topology::{DirectedEdgeId, NodeId, PlanarGraph};

use super::subgraph::BufferSubgraph;

#[derive(Debug, Clone)]
struct Ring {
    points: Vec<Point2>,
    envelope: Envelope,
}

impl Ring {
    fn new(points: Vec<Point2>) -> Self {
        let envelope = Envelope::from_points(&points);
        Self { points, envelope }
    }
}

/// Assembles the result edges of labelled subgraphs into polygons.
#[derive(Debug, Default)]
pub(crate) struct PolygonBuilder {
    shells: Vec<Ring>,
    holes: Vec<Ring>,
}

impl PolygonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links and traces the result edges of one subgraph into rings.
    ///
    /// # Errors
    ///
    /// Returns a topology error if a result edge cannot be linked or a ring
    /// does not close.
    pub fn add(&mut self, graph: &mut PlanarGraph, subgraph: &BufferSubgraph) -> BufferResult<()> {
        for &node in subgraph.nodes() {
            graph.link_result_edges(node)?;
        }
        let mut traced = HashSet::new();
        for &start in subgraph.directed_edges() {
            if !graph.directed_edge(start)?.in_result || traced.contains(&start) {
                continue;
            }
            let walk = trace_ring(graph, start, &mut traced)?;
            for edges in split_at_repeated_nodes(graph, &walk)? {
                self.add_ring(ring_points(graph, &edges)?);
            }
        }
        Ok(())
    }

    fn add_ring(&mut self, points: Vec<Point2>) {
        // Result rings have the interior on their right.
        let area = signed_area_2d(&points);
        if area < 0.0 {
            self.shells.push(Ring::new(points));
        } else if area > 0.0 {
            self.holes.push(Ring::new(points));
        }
    }

    /// Places every hole into its shell and emits the polygons.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::UnplacedHole` if a hole lies in no shell.
    pub fn build(self, factory: &GeometryFactory) -> BufferResult<Vec<Polygon>> {
        let mut shell_holes: Vec<Vec<LineString>> = vec![Vec::new(); self.shells.len()];
        for hole in self.holes {
            let Some(index) = containing_shell(&self.shells, &hole) else {
                return Err(TopologyError::UnplacedHole(hole.points[0]).into());
            };
            shell_holes[index].push(LineString::new(hole.points));
        }
        Ok(self
            .shells
            .into_iter()
            .zip(shell_holes)
            .map(|(shell, holes)| factory.create_polygon(LineString::new(shell.points), holes))
            .collect())
    }
}

/// Follows `next` links from `start` until the ring closes.
fn trace_ring(
    graph: &PlanarGraph,
    start: DirectedEdgeId,
    traced: &mut HashSet<DirectedEdgeId>,
) -> BufferResult<Vec<DirectedEdgeId>> {
    let mut walk = Vec::new();
    let mut current = start;
    loop {
        walk.push(current);
        traced.insert(current);
        let data = graph.directed_edge(current)?;
        let Some(next) = data.next else {
            return Err(TopologyError::OpenRing(data.p0).into());
        };
        if next == start {
            return Ok(walk);
        }
        if traced.contains(&next) {
            return Err(TopologyError::OpenRing(graph.directed_edge(next)?.p0).into());
        }
        current = next;
    }
}

/// Splits a closed walk into simple rings wherever it passes through a node
/// more than once.
fn split_at_repeated_nodes(graph: &PlanarGraph, walk: &[DirectedEdgeId]) -> BufferResult<Vec<Vec<DirectedEdgeId>>> {
    let mut rings = Vec::new();
    let mut stack: Vec<DirectedEdgeId> = Vec::new();
    let mut on_path: HashMap<NodeId, usize> = HashMap::new();
    if let Some(&first) = walk.first() {
        on_path.insert(graph.directed_edge(first)?.node, 0);
    }
    for &de in walk {
        stack.push(de);
        let end = graph.directed_edge(graph.sym(de)?)?.node;
        if let Some(&index) = on_path.get(&end) {
            let ring: Vec<DirectedEdgeId> = stack.drain(index..).collect();
            for &popped in &ring[1..] {
                on_path.remove(&graph.directed_edge(popped)?.node);
            }
            rings.push(ring);
        } else {
            on_path.insert(end, stack.len());
        }
    }
    Ok(rings)
}

fn ring_points(graph: &PlanarGraph, edges: &[DirectedEdgeId]) -> BufferResult<Vec<Point2>> {
    let mut points: Vec<Point2> = Vec::new();
    for &de in edges {
        let edge_points = graph.directed_points(de)?;
        let skip = usize::from(points.last().is_some_and(|last| same_point(last, &edge_points[0])));
        points.extend(edge_points.into_iter().skip(skip));
    }
    Ok(points)
}

/// Index of the smallest shell containing `hole`.
fn containing_shell(shells: &[Ring], hole: &Ring) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, shell) in shells.iter().enumerate() {
        if !shell.envelope.contains_envelope(&hole.envelope) {
            continue;
        }
        let test_point = hole
            .points
            .iter()
            .find(|p| !shell.points.iter().any(|q| same_point(p, q)));
        let Some(test_point) = test_point else {
            continue;
        };
        if !point_in_ring(test_point, &shell.points) {
            continue;
        }
        if best.is_none_or(|b| shells[b].envelope.contains_envelope(&shell.envelope)) {
            best = Some(i);
        }
    }
    best
}
