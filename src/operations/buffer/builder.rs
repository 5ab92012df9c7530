use tracing::{debug, trace};

use crate::error::BufferResult;
use crate::geometry::{Geometry, GeometryFactory, PrecisionModel};
use crate::math::same_point;
use crate::noding::{Noder, SegmentString, SimpleNoder};
use crate::topology::PlanarGraph;

use super::curve_set::OffsetCurveSetBuilder;
use super::depth_locater::SubgraphDepthLocater;
use super::offset_curve::OffsetCurveBuilder;
use super::parameters::BufferParameters;
use super::polygon_builder::PolygonBuilder;
use super::subgraph::{sort_rightmost_first, BufferSubgraph};

/// Computes the buffer of a geometry in a single attempt at one precision.
///
/// The steps are:
/// 1. Compute the labelled raw offset curves of every component.
/// 2. Node the curves and insert them as edges of a planar graph.
/// 3. Split the graph into connected subgraphs and assign each directed
///    edge the depth of the region to its left and right.
/// 4. Trace the edges with interior on the right and exterior on the left
///    into polygons.
///
/// Robustness failures surface as `BufferError::Topology`; see
/// [`BufferOp`](super::BufferOp) for retrying at lower precision.
///
/// # Example
///
/// ```
/// use geobuffer::geometry::{Geometry, GeometryFactory};
/// use geobuffer::operations::buffer::{BufferBuilder, BufferParameters};
///
/// let factory = GeometryFactory::default();
/// let square = Geometry::polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
/// let result = BufferBuilder::new(BufferParameters::default())
///     .build(&square, -3.0, &factory)
///     .unwrap();
/// assert!((result.area() - 16.0).abs() < 1e-9);
/// ```
pub struct BufferBuilder {
    params: BufferParameters,
    precision: Option<PrecisionModel>,
    noder: Option<Box<dyn Noder>>,
}

impl std::fmt::Debug for BufferBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferBuilder")
            .field("params", &self.params)
            .field("precision", &self.precision)
            .field("custom_noder", &self.noder.is_some())
            .finish()
    }
}

impl BufferBuilder {
    /// Creates a builder that works at the factory's precision with the
    /// simple noder.
    #[must_use]
    pub fn new(params: BufferParameters) -> Self {
        Self {
            params,
            precision: None,
            noder: None,
        }
    }

    /// Overrides the working precision used for offset vertices and noding.
    #[must_use]
    pub fn with_precision(mut self, precision: PrecisionModel) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Uses the given noder instead of a simple noder at working precision.
    #[must_use]
    pub fn with_noder(mut self, noder: Box<dyn Noder>) -> Self {
        self.noder = Some(noder);
        self
    }

    /// Computes the buffer of `geometry` at `distance`.
    ///
    /// Returns the empty polygon if nothing remains.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::Topology` if noding or graph labelling fails at
    /// this precision, `BufferError::Invariant` on an internal
    /// inconsistency, and `BufferError::UnsupportedGeometry` for an unclosed
    /// polygon ring.
    pub fn build(&mut self, geometry: &Geometry, distance: f64, factory: &GeometryFactory) -> BufferResult<Geometry> {
        let precision = self.precision.unwrap_or_else(|| factory.precision_model());
        let curve_builder = OffsetCurveBuilder::new(precision, self.params);
        let curves = OffsetCurveSetBuilder::new(geometry, distance, curve_builder).curves()?;
        debug!(curves = curves.len(), "computed offset curves");
        if curves.is_empty() {
            return Ok(factory.create_empty_polygon());
        }

        let noded = match self.noder.as_mut() {
            Some(noder) => noder.compute_nodes(curves)?,
            None => SimpleNoder::new(precision).compute_nodes(curves)?,
        };
        let mut graph = PlanarGraph::new();
        insert_edges(&mut graph, noded);
        debug!(edges = graph.edge_count(), nodes = graph.node_count(), "built buffer graph");

        let mut subgraphs = Vec::new();
        for node in graph.sorted_node_ids() {
            if !graph.node(node)?.visited {
                subgraphs.push(BufferSubgraph::create(&mut graph, node)?);
            }
        }
        sort_rightmost_first(&mut subgraphs);
        debug!(subgraphs = subgraphs.len(), "decomposed buffer graph");

        let mut polygon_builder = PolygonBuilder::new();
        for i in 0..subgraphs.len() {
            let (processed, rest) = subgraphs.split_at(i);
            let subgraph = &rest[0];
            let outside_depth = SubgraphDepthLocater::new(&graph, processed).depth(&subgraph.rightmost_point())?;
            trace!(outside_depth, "labelling subgraph");
            subgraph.compute_depth(&mut graph, outside_depth)?;
            subgraph.find_result_edges(&mut graph)?;
            polygon_builder.add(&mut graph, subgraph)?;
        }

        let polygons = polygon_builder.build(factory)?;
        debug!(polygons = polygons.len(), "assembled buffer polygons");
        Ok(factory.build_geometry(polygons))
    }
}

/// Inserts the noded curves as graph edges, merging duplicates.
fn insert_edges(graph: &mut PlanarGraph, noded: Vec<SegmentString>) {
    for ss in noded {
        let label = ss.label();
        let points = ss.into_points();
        if points.len() < 2 || (points.len() == 2 && same_point(&points[0], &points[1])) {
            continue;
        }
        graph.insert_unique_edge(points, label);
    }
}
