use super::{Geometry, LineString, Polygon, PrecisionModel};

/// Builds result geometries under a given precision model.
///
/// The factory is handed to the buffer operation explicitly; its precision
/// model is also the precision the input geometry is considered to have.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeometryFactory {
    precision: PrecisionModel,
}

impl GeometryFactory {
    /// Creates a factory with the given precision model.
    #[must_use]
    pub fn new(precision: PrecisionModel) -> Self {
        Self { precision }
    }

    /// Returns the precision model of geometries built by this factory.
    #[must_use]
    pub fn precision_model(&self) -> PrecisionModel {
        self.precision
    }

    /// The empty polygon.
    #[must_use]
    pub fn create_empty_polygon(&self) -> Geometry {
        Geometry::Polygon(Polygon::empty())
    }

    /// Creates a polygon from a shell and holes.
    #[must_use]
    pub fn create_polygon(&self, shell: LineString, holes: Vec<LineString>) -> Polygon {
        Polygon::new(shell, holes)
    }

    /// Wraps a list of polygons as the smallest fitting geometry: the empty
    /// polygon, a single polygon, or a collection.
    #[must_use]
    pub fn build_geometry(&self, mut polygons: Vec<Polygon>) -> Geometry {
        match polygons.len() {
            0 => self.create_empty_polygon(),
            1 => Geometry::Polygon(polygons.remove(0)),
            _ => Geometry::Multi(polygons.into_iter().map(Geometry::Polygon).collect()),
        }
    }
}
