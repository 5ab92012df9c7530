use crate::geometry::PrecisionModel;
use crate::math::Point2;
use crate::topology::Position;

use super::offset_segment::OffsetSegmentGenerator;
use super::parameters::{BufferParameters, EndCapStyle};
use super::simplify::simplify;

/// Computes the raw offset curve of a single point sequence.
///
/// The curve is a closed coordinate sequence around the input at the given
/// distance. It may self-intersect; noding and graph assembly resolve that
/// later.
///
/// # Example
///
/// ```
/// use geobuffer::geometry::PrecisionModel;
/// use geobuffer::math::Point2;
/// use geobuffer::operations::buffer::{BufferParameters, EndCapStyle, OffsetCurveBuilder};
///
/// let params = BufferParameters::default().with_end_cap(EndCapStyle::Flat);
/// let builder = OffsetCurveBuilder::new(PrecisionModel::Floating, params);
/// let line = [Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)];
/// let curve = builder.line_curve(&line, 2.0).unwrap();
/// assert_eq!(curve.len(), 5);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OffsetCurveBuilder {
    precision: PrecisionModel,
    params: BufferParameters,
}

impl OffsetCurveBuilder {
    /// Creates a builder emitting vertices rounded to `precision`.
    #[must_use]
    pub fn new(precision: PrecisionModel, params: BufferParameters) -> Self {
        Self { precision, params }
    }

    /// Returns `true` if lines produce no curve at this distance.
    #[must_use]
    pub fn is_line_offset_empty(&self, distance: f64) -> bool {
        distance == 0.0 || (distance < 0.0 && !self.params.is_single_sided())
    }

    fn generator(&self, distance: f64) -> OffsetSegmentGenerator {
        OffsetSegmentGenerator::new(self.precision, self.params, distance)
    }

    fn simplify_tolerance(&self, distance: f64) -> f64 {
        distance * self.params.simplify_factor()
    }

    /// Offset curve of a point or an open line.
    ///
    /// Returns `None` for a zero distance, for a negative distance unless the
    /// buffer is single-sided, and for a point with a flat end cap.
    /// `points` must be free of repeated points.
    #[must_use]
    pub fn line_curve(&self, points: &[Point2], distance: f64) -> Option<Vec<Point2>> {
        if self.is_line_offset_empty(distance) || points.is_empty() {
            return None;
        }
        let mut gen = self.generator(distance.abs());
        if points.len() == 1 {
            match self.params.end_cap() {
                EndCapStyle::Round => gen.create_circle(points[0]),
                EndCapStyle::Square => gen.create_square(points[0]),
                EndCapStyle::Flat => return None,
            }
        } else if self.params.is_single_sided() {
            self.single_sided_curve(points, distance, &mut gen);
        } else {
            self.line_buffer_curve(points, distance, &mut gen);
        }
        let curve = gen.into_points();
        (!curve.is_empty()).then_some(curve)
    }

    fn line_buffer_curve(&self, points: &[Point2], distance: f64, gen: &mut OffsetSegmentGenerator) {
        let tol = self.simplify_tolerance(distance);

        // Left side, walking forward.
        let simp = simplify(points, tol);
        let n = simp.len() - 1;
        gen.init_side_segments(simp[0], simp[1], Position::Left);
        for p in &simp[2..] {
            gen.add_next_segment(*p, true);
        }
        gen.add_last_segment();
        gen.add_line_end_cap(simp[n - 1], simp[n]);

        // Right side, as the left side of the reversed line.
        let simp = simplify(points, -tol);
        let n = simp.len() - 1;
        gen.init_side_segments(simp[n], simp[n - 1], Position::Left);
        for p in simp[..n - 1].iter().rev() {
            gen.add_next_segment(*p, true);
        }
        gen.add_last_segment();
        gen.add_line_end_cap(simp[1], simp[0]);
        gen.close_ring();
    }

    /// One-sided curve closed against the input line: left of the line for
    /// a positive distance, right of it for a negative one.
    fn single_sided_curve(&self, points: &[Point2], distance: f64, gen: &mut OffsetSegmentGenerator) {
        let tol = self.simplify_tolerance(distance);
        if distance < 0.0 {
            gen.add_segments(points, true);
            let simp = simplify(points, -tol);
            let n = simp.len() - 1;
            gen.init_side_segments(simp[n], simp[n - 1], Position::Left);
            gen.add_first_segment();
            for p in simp[..n - 1].iter().rev() {
                gen.add_next_segment(*p, true);
            }
        } else {
            gen.add_segments(points, false);
            let simp = simplify(points, tol);
            gen.init_side_segments(simp[0], simp[1], Position::Left);
            gen.add_first_segment();
            for p in &simp[2..] {
                gen.add_next_segment(*p, true);
            }
        }
        gen.add_last_segment();
        gen.close_ring();
    }

    /// Offset curve of a closed ring on the given side.
    ///
    /// Rings of at most two points are treated as lines; a zero distance
    /// returns a copy of the ring.
    #[must_use]
    pub fn ring_curve(&self, points: &[Point2], side: Position, distance: f64) -> Option<Vec<Point2>> {
        if points.len() <= 2 {
            return self.line_curve(points, distance);
        }
        if distance == 0.0 {
            return Some(points.to_vec());
        }
        let mut tol = self.simplify_tolerance(distance);
        if side == Position::Right {
            tol = -tol;
        }
        let simp = simplify(points, tol);
        let n = simp.len() - 1;
        let mut gen = self.generator(distance);
        gen.init_side_segments(simp[n - 1], simp[0], side);
        for (i, p) in simp.iter().enumerate().skip(1) {
            gen.add_next_segment(*p, i != 1);
        }
        gen.close_ring();
        Some(gen.into_points())
    }
}
