use crate::error::{BufferError, BufferResult};
use crate::geometry::{remove_repeated_points, Envelope, Geometry, LineString, Polygon};
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::polygon_2d::{is_ccw, triangle_incentre};
use crate::math::Point2;
use crate::noding::SegmentString;
use crate::topology::{Label, Location, Position};

use super::offset_curve::OffsetCurveBuilder;

/// Collects the labelled raw offset curves of every component of a
/// geometry.
pub(crate) struct OffsetCurveSetBuilder<'a> {
    geometry: &'a Geometry,
    distance: f64,
    curve_builder: OffsetCurveBuilder,
    curves: Vec<SegmentString>,
}

impl<'a> OffsetCurveSetBuilder<'a> {
    pub fn new(geometry: &'a Geometry, distance: f64, curve_builder: OffsetCurveBuilder) -> Self {
        Self {
            geometry,
            distance,
            curve_builder,
            curves: Vec::new(),
        }
    }

    /// Computes the curves. Each carries the topological locations to its
    /// left and right.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::UnsupportedGeometry` if a polygon ring is not
    /// closed.
    pub fn curves(mut self) -> BufferResult<Vec<SegmentString>> {
        let geometry = self.geometry;
        self.add(geometry)?;
        Ok(self.curves)
    }

    fn add_curve(&mut self, points: Option<Vec<Point2>>, left: Location, right: Location) {
        let Some(points) = points else { return };
        if points.len() < 2 {
            return;
        }
        let label = Label::new(Location::Boundary, left, right);
        self.curves.push(SegmentString::new(points, label));
    }

    fn add(&mut self, geometry: &Geometry) -> BufferResult<()> {
        if geometry.is_empty() {
            return Ok(());
        }
        match geometry {
            Geometry::Point(p) => self.add_point(*p),
            Geometry::LineString(line) => self.add_line_string(line),
            Geometry::Polygon(polygon) => self.add_polygon(polygon)?,
            Geometry::Multi(parts) => {
                for part in parts {
                    self.add(part)?;
                }
            }
        }
        Ok(())
    }

    fn add_point(&mut self, p: Point2) {
        // A point has no interior to erode.
        if self.distance <= 0.0 {
            return;
        }
        let curve = self.curve_builder.line_curve(&[p], self.distance);
        self.add_curve(curve, Location::Exterior, Location::Interior);
    }

    fn add_line_string(&mut self, line: &LineString) {
        if self.curve_builder.is_line_offset_empty(self.distance) {
            return;
        }
        let points = line.without_repeated_points();
        let curve = self.curve_builder.line_curve(&points, self.distance);
        self.add_curve(curve, Location::Exterior, Location::Interior);
    }

    fn add_polygon(&mut self, polygon: &Polygon) -> BufferResult<()> {
        for ring in polygon.rings() {
            if !ring.is_empty() && !ring.is_closed() {
                let p = ring.points[0];
                return Err(BufferError::UnsupportedGeometry(format!(
                    "polygon ring starting at ({}, {}) is not closed",
                    p.x, p.y
                )));
            }
        }

        let mut offset_distance = self.distance;
        let mut offset_side = Position::Left;
        if self.distance < 0.0 {
            offset_distance = -self.distance;
            offset_side = Position::Right;
        }

        let shell = remove_repeated_points(&polygon.shell.points);
        if self.distance < 0.0 && is_eroded_completely(&shell, self.distance) {
            return Ok(());
        }
        if self.distance <= 0.0 && shell.len() < 3 {
            return Ok(());
        }
        self.add_ring_side(&shell, offset_distance, offset_side, Location::Exterior, Location::Interior);

        for hole in &polygon.holes {
            let hole = remove_repeated_points(&hole.points);
            // A positive buffer grows the polygon and so shrinks its holes.
            if self.distance > 0.0 && is_eroded_completely(&hole, -self.distance) {
                continue;
            }
            self.add_ring_side(
                &hole,
                offset_distance,
                offset_side.opposite(),
                Location::Interior,
                Location::Exterior,
            );
        }
        Ok(())
    }

    /// Adds the offset curve of one ring side. The locations are given for
    /// a clockwise ring and swapped for a counter-clockwise one.
    fn add_ring_side(&mut self, ring: &[Point2], distance: f64, side: Position, cw_left: Location, cw_right: Location) {
        // A flat ring offset by zero adds nothing.
        if distance == 0.0 && ring.len() < 4 {
            return;
        }
        let (mut left, mut right, mut side) = (cw_left, cw_right, side);
        if ring.len() >= 4 && is_ccw(ring) {
            left = cw_right;
            right = cw_left;
            side = side.opposite();
        }
        let curve = self.curve_builder.ring_curve(ring, side, distance);
        self.add_curve(curve, left, right);
    }
}

/// Returns `true` if a negative offset is known to erode the ring away.
///
/// Triangles use the exact inradius test. Larger rings use the envelope
/// heuristic, which may miss some eroded rings; those are resolved by the
/// full computation.
fn is_eroded_completely(ring: &[Point2], distance: f64) -> bool {
    if ring.len() < 4 {
        return distance < 0.0;
    }
    if ring.len() == 4 {
        return is_triangle_eroded(ring, distance);
    }
    let env = Envelope::from_points(ring);
    let min_dimension = env.width().min(env.height());
    distance < 0.0 && 2.0 * distance.abs() > min_dimension
}

fn is_triangle_eroded(triangle: &[Point2], distance: f64) -> bool {
    let centre = triangle_incentre(&triangle[0], &triangle[1], &triangle[2]);
    point_to_segment_dist(&centre, &triangle[0], &triangle[1]) < distance.abs()
}
