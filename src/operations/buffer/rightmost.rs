use crate::error::{BufferError, BufferResult};
use crate::math::{orientation_index, Orientation, Point2};
use crate::topology::{DirectedEdgeId, PlanarGraph, Position};

/// The rightmost point of a subgraph together with a directed edge touching
/// it that has the outside of the subgraph on its right.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RightmostEdge {
    pub edge: DirectedEdgeId,
    pub point: Point2,
}

/// Finds the rightmost edge of a connected set of directed edges.
///
/// The rightmost vertex lies on the outer boundary of the subgraph, so the
/// right side of the edge found here is guaranteed to face the exterior.
///
/// # Errors
///
/// Returns `BufferError::Invariant` if `directed_edges` holds no forward
/// edge, and a topology error if the node star at the rightmost point is
/// inconsistent.
pub(crate) fn find_rightmost_edge(
    graph: &PlanarGraph,
    directed_edges: &[DirectedEdgeId],
) -> BufferResult<RightmostEdge> {
    let mut found: Option<(DirectedEdgeId, usize, Point2)> = None;
    for &de in directed_edges {
        let data = graph.directed_edge(de)?;
        if !data.forward {
            continue;
        }
        let points = &graph.edge(data.edge)?.points;
        for (i, p) in points[..points.len() - 1].iter().enumerate() {
            if found.is_none_or(|(_, _, best)| p.x > best.x) {
                found = Some((de, i, *p));
            }
        }
    }
    let Some((mut edge, mut index, point)) = found else {
        return Err(BufferError::Invariant("subgraph has no forward edges".into()));
    };

    if index == 0 {
        let node = graph.directed_edge(edge)?.node;
        let Some(star_edge) = graph.rightmost_star_edge(node)? else {
            return Err(BufferError::Invariant("rightmost node has an empty star".into()));
        };
        edge = star_edge;
        if !graph.directed_edge(edge)?.forward {
            edge = graph.sym(edge)?;
            index = graph.edge(graph.directed_edge(edge)?.edge)?.points.len() - 1;
        }
    } else {
        let points = &graph.edge(graph.directed_edge(edge)?.edge)?.points;
        if use_previous_segment(&points[index - 1], &point, &points[index + 1]) {
            index -= 1;
        }
    }

    let points = &graph.edge(graph.directed_edge(edge)?.edge)?.points;
    let side = segment_side(points, index).or_else(|| index.checked_sub(1).and_then(|i| segment_side(points, i)));
    if side == Some(Position::Left) {
        edge = graph.sym(edge)?;
    }
    Ok(RightmostEdge { edge, point })
}

/// At an interior rightmost vertex, picks the segment that is not hidden
/// behind the other one when seen from the right.
fn use_previous_segment(prev: &Point2, vertex: &Point2, next: &Point2) -> bool {
    let orientation = orientation_index(vertex, next, prev);
    (prev.y < vertex.y && next.y < vertex.y && orientation == Orientation::CounterClockwise)
        || (prev.y > vertex.y && next.y > vertex.y && orientation == Orientation::Clockwise)
}

/// Side of segment `i` facing right: `Right` for an upward segment, `Left`
/// for a downward one, `None` if horizontal or out of range.
#[allow(clippy::float_cmp)]
fn segment_side(points: &[Point2], i: usize) -> Option<Position> {
    let (p0, p1) = (points.get(i)?, points.get(i + 1)?);
    if p0.y == p1.y {
        return None;
    }
    Some(if p0.y < p1.y { Position::Right } else { Position::Left })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::topology::{Label, Location};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn label() -> Label {
        Label::new(Location::Boundary, Location::Exterior, Location::Interior)
    }

    fn all_directed_edges(graph: &PlanarGraph) -> Vec<DirectedEdgeId> {
        graph
            .sorted_node_ids()
            .into_iter()
            .flat_map(|n| graph.node(n).unwrap().star.clone())
            .collect()
    }

    #[test]
    fn interior_vertex_of_clockwise_ring() {
        // Clockwise diamond as one closed edge; the rightmost vertex (2, 0)
        // is interior to the edge.
        let mut g = PlanarGraph::new();
        g.insert_unique_edge(vec![p(0.0, 1.0), p(1.0, 2.0), p(2.0, 0.0), p(1.0, -2.0), p(0.0, 1.0)], label());
        let found = find_rightmost_edge(&g, &all_directed_edges(&g)).unwrap();
        assert_eq!(found.point, p(2.0, 0.0));
        // The ring runs downward at the right, so the outside is on its left
        // when walked forward: the sym is chosen.
        assert!(!g.directed_edge(found.edge).unwrap().forward);
    }

    #[test]
    fn rightmost_at_node_keeps_outside_on_right() {
        // Upward edge at the right side of the graph.
        let mut g = PlanarGraph::new();
        g.insert_unique_edge(vec![p(0.0, 0.0), p(5.0, 0.0)], label());
        g.insert_unique_edge(vec![p(5.0, 0.0), p(5.0, 5.0)], label());
        g.insert_unique_edge(vec![p(5.0, 5.0), p(0.0, 0.0)], label());
        let found = find_rightmost_edge(&g, &all_directed_edges(&g)).unwrap();
        assert_eq!(found.point, p(5.0, 0.0));
        let de = g.directed_edge(found.edge).unwrap();
        // Walking (5,0) -> (5,5) upward has the +x side on its right.
        assert_eq!(de.p0, p(5.0, 0.0));
        assert_eq!(de.p1, p(5.0, 5.0));
    }

    #[test]
    fn previous_segment_is_used_when_next_hides_it() {
        let vertex = p(0.0, 0.0);
        assert!(use_previous_segment(&p(-1.0, -1.0), &vertex, &p(-2.0, -1.0)));
        assert!(!use_previous_segment(&p(-2.0, -1.0), &vertex, &p(-1.0, -1.0)));
    }

    #[test]
    fn horizontal_segment_has_no_side() {
        let pts = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)];
        assert_eq!(segment_side(&pts, 0), None);
        assert_eq!(segment_side(&pts, 1), Some(Position::Right));
        assert_eq!(segment_side(&pts, 2), None);
    }
}
