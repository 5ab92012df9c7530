use std::f64::consts::{FRAC_PI_2, PI};

use crate::geometry::PrecisionModel;
use crate::math::angle::{angle, angle_between_oriented, normalize};
use crate::math::intersect_2d::{line_line_intersection, segment_intersection, SegmentIntersection};
use crate::math::{orientation_index, same_point, Orientation, Point2};
use crate::topology::Position;

use super::parameters::{BufferParameters, EndCapStyle, JoinStyle};

/// Offset vertices closer than `distance * factor` to the previous vertex
/// are dropped.
const CURVE_VERTEX_SNAP_DISTANCE_FACTOR: f64 = 1.0e-6;

/// Outside-turn offset end points closer than `distance * factor` are
/// merged into one vertex.
const OFFSET_SEGMENT_SEPARATION_FACTOR: f64 = 1.0e-3;

/// Inside-turn offset end points closer than `distance * factor` are merged
/// into one vertex.
const INSIDE_TURN_VERTEX_SNAP_DISTANCE_FACTOR: f64 = 1.0e-3;

/// Closing segments at inside turns are shortened by this factor when round
/// joins are fine enough.
const MAX_CLOSING_SEG_LEN_FACTOR: f64 = 80.0;

/// A straight segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Segment {
    pub p0: Point2,
    pub p1: Point2,
}

impl Segment {
    pub fn new(p0: Point2, p1: Point2) -> Self {
        Self { p0, p1 }
    }

    /// The parallel segment at `distance` on `side`.
    pub fn offset(&self, side: Position, distance: f64) -> Self {
        let sign = if side == Position::Left { 1.0 } else { -1.0 };
        let dx = self.p1.x - self.p0.x;
        let dy = self.p1.y - self.p0.y;
        let len = dx.hypot(dy);
        let ux = sign * distance * dx / len;
        let uy = sign * distance * dy / len;
        Self {
            p0: Point2::new(self.p0.x - uy, self.p0.y + ux),
            p1: Point2::new(self.p1.x - uy, self.p1.y + ux),
        }
    }

    /// Point at fraction `f` along the segment, shifted `offset` to its left.
    #[allow(clippy::float_cmp)]
    fn point_along_offset(&self, f: f64, offset: f64) -> Point2 {
        let dx = self.p1.x - self.p0.x;
        let dy = self.p1.y - self.p0.y;
        let seg_x = self.p0.x + f * dx;
        let seg_y = self.p0.y + f * dy;
        let len = dx.hypot(dy);
        if offset == 0.0 || len <= 0.0 {
            return Point2::new(seg_x, seg_y);
        }
        let ux = offset * dx / len;
        let uy = offset * dy / len;
        Point2::new(seg_x - uy, seg_y + ux)
    }
}

/// Growing list of offset curve vertices.
///
/// Every vertex is rounded to the precision model, and vertices too close to
/// the previous one are skipped.
#[derive(Debug)]
struct OffsetPoints {
    points: Vec<Point2>,
    precision: PrecisionModel,
    min_vertex_distance: f64,
}

impl OffsetPoints {
    fn add(&mut self, p: Point2) {
        let p = self.precision.make_precise(p);
        if let Some(last) = self.points.last() {
            if (p - last).norm() < self.min_vertex_distance {
                return;
            }
        }
        self.points.push(p);
    }

    fn close_ring(&mut self) {
        if let (Some(&first), Some(last)) = (self.points.first(), self.points.last()) {
            if !same_point(&first, last) {
                self.points.push(first);
            }
        }
    }
}

/// Generates the vertices of an offset curve one input segment at a time.
///
/// The generator keeps a sliding window of three input points and emits
/// the join geometry at the middle one: fillets, mitres or bevels on
/// outside turns, offset-line intersections on inside turns. It also emits
/// line end caps and the offset shapes of single points.
#[derive(Debug)]
pub(crate) struct OffsetSegmentGenerator {
    params: BufferParameters,
    distance: f64,
    fillet_angle_quantum: f64,
    closing_seg_length_factor: f64,
    points: OffsetPoints,
    s0: Point2,
    s1: Point2,
    s2: Point2,
    seg0: Segment,
    seg1: Segment,
    offset0: Segment,
    offset1: Segment,
    side: Position,
}

impl OffsetSegmentGenerator {
    /// Creates a generator for a non-negative `distance`.
    pub fn new(precision: PrecisionModel, params: BufferParameters, distance: f64) -> Self {
        let quadrant_segments = f64::from(params.quadrant_segments().max(1));
        let closing_seg_length_factor =
            if params.quadrant_segments() >= 8 && params.join() == JoinStyle::Round {
                MAX_CLOSING_SEG_LEN_FACTOR
            } else {
                1.0
            };
        let origin = Point2::origin();
        let zero = Segment::new(origin, origin);
        Self {
            params,
            distance,
            fillet_angle_quantum: FRAC_PI_2 / quadrant_segments,
            closing_seg_length_factor,
            points: OffsetPoints {
                points: Vec::new(),
                precision,
                min_vertex_distance: distance * CURVE_VERTEX_SNAP_DISTANCE_FACTOR,
            },
            s0: origin,
            s1: origin,
            s2: origin,
            seg0: zero,
            seg1: zero,
            offset0: zero,
            offset1: zero,
            side: Position::Left,
        }
    }

    /// Consumes the generator, returning the emitted vertices.
    pub fn into_points(self) -> Vec<Point2> {
        self.points.points
    }

    /// Starts a new side with the segment `s1 s2`.
    pub fn init_side_segments(&mut self, s1: Point2, s2: Point2, side: Position) {
        self.s1 = s1;
        self.s2 = s2;
        self.side = side;
        self.seg1 = Segment::new(s1, s2);
        self.offset1 = self.seg1.offset(side, self.distance);
    }

    /// Appends the input points themselves, forward or reversed.
    pub fn add_segments(&mut self, pts: &[Point2], forward: bool) {
        if forward {
            pts.iter().for_each(|p| self.points.add(*p));
        } else {
            pts.iter().rev().for_each(|p| self.points.add(*p));
        }
    }

    /// Emits the start of the current offset segment.
    pub fn add_first_segment(&mut self) {
        self.points.add(self.offset1.p0);
    }

    /// Emits the end of the current offset segment.
    pub fn add_last_segment(&mut self) {
        self.points.add(self.offset1.p1);
    }

    /// Closes the emitted curve into a ring.
    pub fn close_ring(&mut self) {
        self.points.close_ring();
    }

    /// Advances the window to `p` and emits the join at the previous point.
    pub fn add_next_segment(&mut self, p: Point2, add_start_point: bool) {
        self.s0 = self.s1;
        self.s1 = self.s2;
        self.s2 = p;
        self.seg0 = Segment::new(self.s0, self.s1);
        self.offset0 = self.seg0.offset(self.side, self.distance);
        self.seg1 = Segment::new(self.s1, self.s2);
        self.offset1 = self.seg1.offset(self.side, self.distance);

        if same_point(&self.s1, &self.s2) {
            return;
        }
        let orientation = orientation_index(&self.s0, &self.s1, &self.s2);
        let outside_turn = (orientation == Orientation::Clockwise && self.side == Position::Left)
            || (orientation == Orientation::CounterClockwise && self.side == Position::Right);

        if orientation == Orientation::Collinear {
            self.add_collinear(add_start_point);
        } else if outside_turn {
            self.add_outside_turn(orientation, add_start_point);
        } else {
            self.add_inside_turn();
        }
    }

    fn add_collinear(&mut self, add_start_point: bool) {
        // Only a reversal needs a join; a straight continuation needs nothing.
        let overlap = segment_intersection(&self.s0, &self.s1, &self.s1, &self.s2);
        if overlap.count() < 2 {
            return;
        }
        match self.params.join() {
            JoinStyle::Bevel | JoinStyle::Mitre => {
                if add_start_point {
                    self.points.add(self.offset0.p1);
                }
                self.points.add(self.offset1.p0);
            }
            JoinStyle::Round => {
                self.add_corner_fillet(self.s1, self.offset0.p1, self.offset1.p0, Orientation::Clockwise);
            }
        }
    }

    fn add_outside_turn(&mut self, orientation: Orientation, add_start_point: bool) {
        if (self.offset0.p1 - self.offset1.p0).norm() < self.distance * OFFSET_SEGMENT_SEPARATION_FACTOR {
            self.points.add(self.offset0.p1);
            return;
        }
        match self.params.join() {
            JoinStyle::Mitre => self.add_mitre_join(),
            JoinStyle::Bevel => {
                self.points.add(self.offset0.p1);
                self.points.add(self.offset1.p0);
            }
            JoinStyle::Round => {
                if add_start_point {
                    self.points.add(self.offset0.p1);
                }
                self.add_corner_fillet(self.s1, self.offset0.p1, self.offset1.p0, orientation);
                self.points.add(self.offset1.p0);
            }
        }
    }

    fn add_inside_turn(&mut self) {
        let crossing = segment_intersection(
            &self.offset0.p0,
            &self.offset0.p1,
            &self.offset1.p0,
            &self.offset1.p1,
        );
        match crossing {
            SegmentIntersection::Point { point, .. } | SegmentIntersection::Collinear(point, _) => {
                self.points.add(point);
            }
            SegmentIntersection::None => {
                // The offset segments do not meet: join them through points
                // close to the input vertex so the curve stays on the
                // correct side of it.
                if (self.offset0.p1 - self.offset1.p0).norm()
                    < self.distance * INSIDE_TURN_VERTEX_SNAP_DISTANCE_FACTOR
                {
                    self.points.add(self.offset0.p1);
                    return;
                }
                self.points.add(self.offset0.p1);
                let f = self.closing_seg_length_factor;
                let toward_vertex = |q: Point2| {
                    Point2::new((f * q.x + self.s1.x) / (f + 1.0), (f * q.y + self.s1.y) / (f + 1.0))
                };
                let mid0 = toward_vertex(self.offset0.p1);
                let mid1 = toward_vertex(self.offset1.p0);
                self.points.add(mid0);
                self.points.add(mid1);
                self.points.add(self.offset1.p0);
            }
        }
    }

    fn add_mitre_join(&mut self) {
        let within_limit = line_line_intersection(
            &self.offset0.p0,
            &self.offset0.p1,
            &self.offset1.p0,
            &self.offset1.p1,
        )
        .filter(|p| self.distance <= 0.0 || (p - self.s1).norm() / self.distance <= self.params.mitre_limit());
        match within_limit {
            Some(p) => self.points.add(p),
            None => self.add_limited_mitre_join(),
        }
    }

    /// Bevels a mitre at `mitre_limit * distance` from the vertex.
    fn add_limited_mitre_join(&mut self) {
        let base = self.seg0.p1;
        let ang0 = angle(&base, &self.seg0.p0);
        let half_diff = angle_between_oriented(&self.seg0.p0, &base, &self.seg1.p1) / 2.0;
        let mid_ang = normalize(ang0 + half_diff);
        let mitre_mid_ang = normalize(mid_ang + PI);

        let mitre_dist = self.params.mitre_limit() * self.distance;
        let bevel_delta = mitre_dist * half_diff.sin().abs();
        let bevel_half_len = self.distance - bevel_delta;

        let bevel_mid = Point2::new(
            base.x + mitre_dist * mitre_mid_ang.cos(),
            base.y + mitre_dist * mitre_mid_ang.sin(),
        );
        let mitre_mid_line = Segment::new(base, bevel_mid);
        let left = mitre_mid_line.point_along_offset(1.0, bevel_half_len);
        let right = mitre_mid_line.point_along_offset(1.0, -bevel_half_len);
        if self.side == Position::Left {
            self.points.add(left);
            self.points.add(right);
        } else {
            self.points.add(right);
            self.points.add(left);
        }
    }

    /// Emits an arc around `p` from `p0` to `p1`, turning in `direction`.
    fn add_corner_fillet(&mut self, p: Point2, p0: Point2, p1: Point2, direction: Orientation) {
        let mut start_angle = angle(&p, &p0);
        let end_angle = angle(&p, &p1);
        if direction == Orientation::Clockwise {
            if start_angle <= end_angle {
                start_angle += 2.0 * PI;
            }
        } else if start_angle >= end_angle {
            start_angle -= 2.0 * PI;
        }
        self.points.add(p0);
        self.add_directed_fillet(p, start_angle, end_angle, direction);
        self.points.add(p1);
    }

    /// Emits arc vertices around `p` from `start_angle` towards `end_angle`,
    /// excluding the end.
    fn add_directed_fillet(&mut self, p: Point2, start_angle: f64, end_angle: f64, direction: Orientation) {
        let direction_factor = if direction == Orientation::Clockwise { -1.0 } else { 1.0 };
        let total_angle = (start_angle - end_angle).abs();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n_segs = (total_angle / self.fillet_angle_quantum + 0.5) as u32;
        if n_segs < 1 {
            return;
        }
        let angle_inc = total_angle / f64::from(n_segs);
        for i in 0..n_segs {
            let a = start_angle + direction_factor * f64::from(i) * angle_inc;
            self.points.add(Point2::new(
                p.x + self.distance * a.cos(),
                p.y + self.distance * a.sin(),
            ));
        }
    }

    /// Emits the end cap of the segment `p0 p1` at `p1`.
    pub fn add_line_end_cap(&mut self, p0: Point2, p1: Point2) {
        let seg = Segment::new(p0, p1);
        let offset_left = seg.offset(Position::Left, self.distance);
        let offset_right = seg.offset(Position::Right, self.distance);
        let ang = (p1.y - p0.y).atan2(p1.x - p0.x);

        match self.params.end_cap() {
            EndCapStyle::Round => {
                self.points.add(offset_left.p1);
                self.add_directed_fillet(p1, ang + FRAC_PI_2, ang - FRAC_PI_2, Orientation::Clockwise);
                self.points.add(offset_right.p1);
            }
            EndCapStyle::Flat => {
                self.points.add(offset_left.p1);
                self.points.add(offset_right.p1);
            }
            EndCapStyle::Square => {
                let (sx, sy) = (self.distance.abs() * ang.cos(), self.distance.abs() * ang.sin());
                self.points
                    .add(Point2::new(offset_left.p1.x + sx, offset_left.p1.y + sy));
                self.points
                    .add(Point2::new(offset_right.p1.x + sx, offset_right.p1.y + sy));
            }
        }
    }

    /// Emits a clockwise circle of radius `distance` around `p`.
    pub fn create_circle(&mut self, p: Point2) {
        self.points.add(Point2::new(p.x + self.distance, p.y));
        self.add_directed_fillet(p, 0.0, 2.0 * PI, Orientation::Clockwise);
        self.points.close_ring();
    }

    /// Emits a clockwise axis-aligned square of half-width `distance` around `p`.
    pub fn create_square(&mut self, p: Point2) {
        let d = self.distance;
        self.points.add(Point2::new(p.x + d, p.y + d));
        self.points.add(Point2::new(p.x + d, p.y - d));
        self.points.add(Point2::new(p.x - d, p.y - d));
        self.points.add(Point2::new(p.x - d, p.y + d));
        self.points.close_ring();
    }
}
