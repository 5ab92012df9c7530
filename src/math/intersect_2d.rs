use super::orientation::{orientation_index, Orientation};
use super::{same_point, Point2};

/// Result of intersecting two bounded segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection {
    /// The segments are disjoint.
    None,
    /// The segments meet in a single point.
    ///
    /// `proper` is `true` when the point is interior to both segments.
    Point { point: Point2, proper: bool },
    /// The segments are collinear and overlap between two points.
    Collinear(Point2, Point2),
}

impl SegmentIntersection {
    /// Number of intersection points (0, 1 or 2).
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Point { .. } => 1,
            Self::Collinear(..) => 2,
        }
    }

    /// The intersection points, in no particular order.
    #[must_use]
    pub fn points(&self) -> Vec<Point2> {
        match *self {
            Self::None => Vec::new(),
            Self::Point { point, .. } => vec![point],
            Self::Collinear(a, b) => vec![a, b],
        }
    }
}

/// Parametric 2D line-line intersection.
///
/// Given lines through `p1 -> p2` and `q1 -> q2`, returns the intersection
/// point if they are not parallel. Coordinates are translated near the
/// origin before solving to keep the products well-conditioned.
#[must_use]
pub fn line_line_intersection(p1: &Point2, p2: &Point2, q1: &Point2, q2: &Point2) -> Option<Point2> {
    let mid_x = (p1.x.min(p2.x).min(q1.x).min(q2.x) + p1.x.max(p2.x).max(q1.x).max(q2.x)) * 0.5;
    let mid_y = (p1.y.min(p2.y).min(q1.y).min(q2.y) + p1.y.max(p2.y).max(q1.y).max(q2.y)) * 0.5;

    let (ax, ay) = (p1.x - mid_x, p1.y - mid_y);
    let (bx, by) = (p2.x - mid_x, p2.y - mid_y);
    let (cx, cy) = (q1.x - mid_x, q1.y - mid_y);
    let (dx, dy) = (q2.x - mid_x, q2.y - mid_y);

    let d1x = bx - ax;
    let d1y = by - ay;
    let d2x = dx - cx;
    let d2y = dy - cy;
    let cross = d1x * d2y - d1y * d2x;
    if cross == 0.0 || !cross.is_finite() {
        return None;
    }
    let t = ((cx - ax) * d2y - (cy - ay) * d2x) / cross;
    let x = ax + t * d1x + mid_x;
    let y = ay + t * d1y + mid_y;
    if x.is_finite() && y.is_finite() {
        Some(Point2::new(x, y))
    } else {
        None
    }
}

/// Bounded segment-segment intersection in 2D.
///
/// Uses the robust orientation predicate to classify the configuration, so
/// the topology of the answer (disjoint / touching / crossing / overlapping)
/// is exact even when the computed crossing point is not.
#[must_use]
pub fn segment_intersection(p1: &Point2, p2: &Point2, q1: &Point2, q2: &Point2) -> SegmentIntersection {
    if !envelopes_intersect(p1, p2, q1, q2) {
        return SegmentIntersection::None;
    }

    let pq1 = orientation_index(p1, p2, q1);
    let pq2 = orientation_index(p1, p2, q2);
    if same_side(pq1, pq2) {
        return SegmentIntersection::None;
    }

    let qp1 = orientation_index(q1, q2, p1);
    let qp2 = orientation_index(q1, q2, p2);
    if same_side(qp1, qp2) {
        return SegmentIntersection::None;
    }

    let collinear = pq1 == Orientation::Collinear
        && pq2 == Orientation::Collinear
        && qp1 == Orientation::Collinear
        && qp2 == Orientation::Collinear;
    if collinear {
        return collinear_intersection(p1, p2, q1, q2);
    }

    // An endpoint of one segment lies on the other: report that endpoint
    // verbatim instead of a computed (inexact) point.
    if pq1 == Orientation::Collinear
        || pq2 == Orientation::Collinear
        || qp1 == Orientation::Collinear
        || qp2 == Orientation::Collinear
    {
        let point = if same_point(p1, q1) || same_point(p1, q2) {
            *p1
        } else if same_point(p2, q1) || same_point(p2, q2) {
            *p2
        } else if pq1 == Orientation::Collinear {
            *q1
        } else if pq2 == Orientation::Collinear {
            *q2
        } else if qp1 == Orientation::Collinear {
            *p1
        } else {
            *p2
        };
        return SegmentIntersection::Point {
            point,
            proper: false,
        };
    }

    let point = match line_line_intersection(p1, p2, q1, q2) {
        Some(pt) if in_segment_envelope(&pt, p1, p2) && in_segment_envelope(&pt, q1, q2) => pt,
        _ => nearest_endpoint(p1, p2, q1, q2),
    };
    SegmentIntersection::Point {
        point,
        proper: true,
    }
}

fn same_side(a: Orientation, b: Orientation) -> bool {
    (a == Orientation::CounterClockwise && b == Orientation::CounterClockwise)
        || (a == Orientation::Clockwise && b == Orientation::Clockwise)
}

fn collinear_intersection(p1: &Point2, p2: &Point2, q1: &Point2, q2: &Point2) -> SegmentIntersection {
    let q1_in_p = in_segment_envelope(q1, p1, p2);
    let q2_in_p = in_segment_envelope(q2, p1, p2);
    let p1_in_q = in_segment_envelope(p1, q1, q2);
    let p2_in_q = in_segment_envelope(p2, q1, q2);

    let pair = if q1_in_p && q2_in_p {
        Some((*q1, *q2))
    } else if p1_in_q && p2_in_q {
        Some((*p1, *p2))
    } else if q1_in_p && p1_in_q {
        Some((*q1, *p1))
    } else if q1_in_p && p2_in_q {
        Some((*q1, *p2))
    } else if q2_in_p && p1_in_q {
        Some((*q2, *p1))
    } else if q2_in_p && p2_in_q {
        Some((*q2, *p2))
    } else {
        None
    };

    match pair {
        None => SegmentIntersection::None,
        Some((a, b)) if same_point(&a, &b) => SegmentIntersection::Point {
            point: a,
            proper: false,
        },
        Some((a, b)) => SegmentIntersection::Collinear(a, b),
    }
}

fn envelopes_intersect(p1: &Point2, p2: &Point2, q1: &Point2, q2: &Point2) -> bool {
    p1.x.min(p2.x) <= q1.x.max(q2.x)
        && q1.x.min(q2.x) <= p1.x.max(p2.x)
        && p1.y.min(p2.y) <= q1.y.max(q2.y)
        && q1.y.min(q2.y) <= p1.y.max(p2.y)
}

fn in_segment_envelope(p: &Point2, a: &Point2, b: &Point2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// The endpoint closest to the other segment, used when the computed
/// crossing point falls outside the segments because of round-off.
fn nearest_endpoint(p1: &Point2, p2: &Point2, q1: &Point2, q2: &Point2) -> Point2 {
    use super::distance_2d::point_to_segment_dist;

    let candidates = [
        (*p1, point_to_segment_dist(p1, q1, q2)),
        (*p2, point_to_segment_dist(p2, q1, q2)),
        (*q1, point_to_segment_dist(q1, p1, p2)),
        (*q2, point_to_segment_dist(q2, p1, p2)),
    ];
    let mut best = candidates[0];
    for c in &candidates[1..] {
        if c.1 < best.1 {
            best = *c;
        }
    }
    best.0
}
