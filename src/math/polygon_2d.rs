use super::orientation::{orientation_index, Orientation};
use super::{same_point, Point2};

/// Computes the signed area of a ring in the XY plane (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. The ring may be
/// given with or without its closing point.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let x0 = points[0].x;
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        // Shifting by x0 keeps the products small for far-from-origin rings.
        sum += (points[i].x - x0) * points[j].y - (points[j].x - x0) * points[i].y;
    }
    sum * 0.5
}

/// Tests whether a closed ring is oriented counter-clockwise.
///
/// Looks at the turn made at the highest vertex, which is robust to
/// self-touching and slightly invalid rings where the signed area is not.
/// Rings with fewer than three distinct points report `false`.
#[must_use]
pub fn is_ccw(ring: &[Point2]) -> bool {
    if ring.len() < 4 {
        return false;
    }
    let n = ring.len() - 1;

    let mut hi_index = 0;
    for i in 1..=n {
        if ring[i].y > ring[hi_index].y {
            hi_index = i;
        }
    }
    let hi = ring[hi_index];

    let mut prev = hi_index;
    loop {
        prev = if prev == 0 { n } else { prev - 1 };
        if !same_point(&ring[prev], &hi) || prev == hi_index {
            break;
        }
    }

    let mut next = hi_index;
    loop {
        next = (next + 1) % n;
        if !same_point(&ring[next], &hi) || next == hi_index {
            break;
        }
    }

    let p_prev = ring[prev];
    let p_next = ring[next];
    if same_point(&p_prev, &hi) || same_point(&p_next, &hi) || same_point(&p_prev, &p_next) {
        return false;
    }

    match orientation_index(&p_prev, &hi, &p_next) {
        // Collinear: the ring folds back on itself at the top vertex.
        Orientation::Collinear => p_prev.x > p_next.x,
        o => o == Orientation::CounterClockwise,
    }
}

/// Tests whether `p` lies strictly inside a closed ring (crossing number).
#[must_use]
pub fn point_in_ring(p: &Point2, ring: &[Point2]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Centre of the circle inscribed in the triangle `p0 p1 p2`.
#[must_use]
pub fn triangle_incentre(p0: &Point2, p1: &Point2, p2: &Point2) -> Point2 {
    let len0 = (p1 - p2).norm();
    let len1 = (p0 - p2).norm();
    let len2 = (p0 - p1).norm();
    let circum = len0 + len1 + len2;
    if circum == 0.0 {
        return *p0;
    }
    let x = (len0 * p0.x + len1 * p1.x + len2 * p2.x) / circum;
    let y = (len0 * p0.y + len1 * p1.y + len2 * p2.y) / circum;
    Point2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn ccw_square() -> Vec<Point2> {
        vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(0.0, 0.0)]
    }

    #[test]
    fn signed_area_ccw_square() {
        let area = signed_area_2d(&ccw_square());
        assert!((area - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = ccw_square();
        pts.reverse();
        let area = signed_area_2d(&pts);
        assert!((area + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!((signed_area_2d(&[p(0.0, 0.0)])).abs() < TOLERANCE);
        assert!((signed_area_2d(&[])).abs() < TOLERANCE);
    }

    #[test]
    fn orientation_of_rings() {
        let ring = ccw_square();
        assert!(is_ccw(&ring));
        let mut cw = ring.clone();
        cw.reverse();
        assert!(!is_ccw(&cw));
    }

    #[test]
    fn orientation_with_repeated_top_vertex() {
        let ring = vec![
            p(0.0, 0.0),
            p(4.0, 0.0),
            p(4.0, 4.0),
            p(4.0, 4.0),
            p(0.0, 4.0),
            p(0.0, 0.0),
        ];
        assert!(is_ccw(&ring));
    }

    #[test]
    fn point_in_ring_basic() {
        let ring = ccw_square();
        assert!(point_in_ring(&p(0.5, 0.5), &ring));
        assert!(!point_in_ring(&p(1.5, 0.5), &ring));
    }

    #[test]
    fn incentre_of_right_triangle() {
        // Legs 3 and 4, hypotenuse 5: inradius (3 + 4 - 5) / 2 = 1.
        let c = triangle_incentre(&p(0.0, 0.0), &p(4.0, 0.0), &p(0.0, 3.0));
        assert!((c.x - 1.0).abs() < TOLERANCE);
        assert!((c.y - 1.0).abs() < TOLERANCE);
    }
}
