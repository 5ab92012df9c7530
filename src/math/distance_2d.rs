use super::Point2;

/// Returns the minimum distance from `p` to the segment `a`-`b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return (p - a).norm();
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq;
    if t <= 0.0 {
        return (p - a).norm();
    }
    if t >= 1.0 {
        return (p - b).norm();
    }

    // Perpendicular distance via the cross product, which is more accurate
    // than measuring to the interpolated foot point.
    let cross = ((a.y - p.y) * dx - (a.x - p.x) * dy) / len_sq;
    cross.abs() * len_sq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perpendicular_foot_inside() {
        let d = point_to_segment_dist(
            &Point2::new(5.0, 3.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(10.0, 0.0),
        );
        assert_relative_eq!(d, 3.0);
    }

    #[test]
    fn beyond_endpoint_measures_to_endpoint() {
        let d = point_to_segment_dist(
            &Point2::new(13.0, 4.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(10.0, 0.0),
        );
        assert_relative_eq!(d, 5.0);
    }

    #[test]
    fn zero_length_segment() {
        let a = Point2::new(1.0, 1.0);
        let d = point_to_segment_dist(&Point2::new(4.0, 5.0), &a, &a);
        assert_relative_eq!(d, 5.0);
    }
}
