mod envelope;
mod factory;
mod line_string;
mod polygon;
mod precision;

pub use envelope::Envelope;
pub use factory::GeometryFactory;
pub use line_string::{remove_repeated_points, LineString};
pub use polygon::Polygon;
pub use precision::PrecisionModel;

use crate::math::Point2;

/// A 2D geometry.
///
/// The set of kinds is closed: every consumer matches exhaustively instead of
/// dispatching on runtime type.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A single point.
    Point(Point2),
    /// An open or closed line string.
    LineString(LineString),
    /// A polygon with optional holes.
    Polygon(Polygon),
    /// A heterogeneous collection (multi-point, multi-line, multi-polygon).
    Multi(Vec<Geometry>),
}

impl Geometry {
    /// Convenience constructor for a point.
    #[must_use]
    pub fn point(x: f64, y: f64) -> Self {
        Self::Point(Point2::new(x, y))
    }

    /// Convenience constructor for a line string from `(x, y)` pairs.
    #[must_use]
    pub fn line_string(coords: &[(f64, f64)]) -> Self {
        Self::LineString(LineString::from_xy(coords))
    }

    /// Convenience constructor for a hole-free polygon from `(x, y)` pairs.
    #[must_use]
    pub fn polygon(coords: &[(f64, f64)]) -> Self {
        Self::Polygon(Polygon::from_xy(coords))
    }

    /// Returns `true` if the geometry contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Point(_) => false,
            Self::LineString(ls) => ls.is_empty(),
            Self::Polygon(p) => p.is_empty(),
            Self::Multi(parts) => parts.iter().all(Geometry::is_empty),
        }
    }

    /// Bounding box of all points.
    #[must_use]
    pub fn envelope(&self) -> Envelope {
        match self {
            Self::Point(p) => Envelope::from_points(std::slice::from_ref(p)),
            Self::LineString(ls) => ls.envelope(),
            Self::Polygon(p) => p.envelope(),
            Self::Multi(parts) => {
                let mut env = Envelope::null();
                for part in parts {
                    env.expand_to_include_envelope(&part.envelope());
                }
                env
            }
        }
    }

    /// Iterates every coordinate, descending into rings and collections.
    pub fn coordinates(&self) -> Box<dyn Iterator<Item = &Point2> + '_> {
        match self {
            Self::Point(p) => Box::new(std::iter::once(p)),
            Self::LineString(ls) => Box::new(ls.points.iter()),
            Self::Polygon(p) => Box::new(p.rings().flat_map(|ring| ring.points.iter())),
            Self::Multi(parts) => Box::new(parts.iter().flat_map(Geometry::coordinates)),
        }
    }

    /// Total enclosed area of all polygonal parts.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.polygons().map(Polygon::area).sum()
    }

    /// Iterates all non-empty polygons, descending into collections.
    pub fn polygons(&self) -> Box<dyn Iterator<Item = &Polygon> + '_> {
        match self {
            Self::Polygon(p) if !p.is_empty() => Box::new(std::iter::once(p)),
            Self::Point(_) | Self::LineString(_) | Self::Polygon(_) => Box::new(std::iter::empty()),
            Self::Multi(parts) => Box::new(parts.iter().flat_map(Geometry::polygons)),
        }
    }

    /// Number of non-empty polygons.
    #[must_use]
    pub fn num_polygons(&self) -> usize {
        self.polygons().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_of_collection() {
        let g = Geometry::Multi(vec![
            Geometry::point(-1.0, 2.0),
            Geometry::line_string(&[(0.0, 0.0), (5.0, 1.0)]),
        ]);
        let env = g.envelope();
        assert!((env.min_x() + 1.0).abs() < f64::EPSILON);
        assert!((env.max_x() - 5.0).abs() < f64::EPSILON);
        assert!((env.max_y() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn polygons_descends_into_collections() {
        let g = Geometry::Multi(vec![
            Geometry::polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]),
            Geometry::Multi(vec![Geometry::polygon(&[(5.0, 5.0), (7.0, 5.0), (7.0, 7.0), (5.0, 7.0)])]),
            Geometry::point(3.0, 3.0),
            Geometry::Polygon(Polygon::empty()),
        ]);
        assert_eq!(g.num_polygons(), 2);
        assert!((g.area() - 4.5).abs() < 1e-12);
    }

    #[test]
    fn coordinates_cover_every_part() {
        let mut square = Polygon::rectangle(0.0, 0.0, 4.0, 4.0);
        square
            .holes
            .push(LineString::ring_from_xy(&[(1.0, 1.0), (1.0, 2.0), (2.0, 2.0)]));
        let g = Geometry::Multi(vec![
            Geometry::point(-1.0, 2.0),
            Geometry::line_string(&[(0.0, 0.0), (5.0, 1.0)]),
            Geometry::Polygon(square),
        ]);
        // 1 point, 2 line vertices, 5 shell and 4 hole vertices.
        assert_eq!(g.coordinates().count(), 12);
        assert_eq!(g.coordinates().next(), Some(&Point2::new(-1.0, 2.0)));
    }

    #[test]
    fn emptiness() {
        assert!(Geometry::Polygon(Polygon::empty()).is_empty());
        assert!(Geometry::Multi(Vec::new()).is_empty());
        assert!(!Geometry::point(0.0, 0.0).is_empty());
    }
}
