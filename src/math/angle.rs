use std::f64::consts::PI;

use super::Point2;

/// Angle of the vector `p0 -> p1` in `(-pi, pi]`.
#[must_use]
pub fn angle(p0: &Point2, p1: &Point2) -> f64 {
    (p1.y - p0.y).atan2(p1.x - p0.x)
}

/// Normalizes an angle to `(-pi, pi]`.
#[must_use]
pub fn normalize(mut a: f64) -> f64 {
    while a > PI {
        a -= 2.0 * PI;
    }
    while a <= -PI {
        a += 2.0 * PI;
    }
    a
}

/// Oriented angle from `tip0 - tail` to `tip1 - tail`, in `(-pi, pi]`.
///
/// Positive when the turn from the first to the second vector is
/// counter-clockwise.
#[must_use]
pub fn angle_between_oriented(tip0: &Point2, tail: &Point2, tip1: &Point2) -> f64 {
    normalize(angle(tail, tip1) - angle(tail, tip0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn normalize_wraps_into_range() {
        assert_relative_eq!(normalize(3.0 * PI), PI);
        assert_relative_eq!(normalize(-3.0 * FRAC_PI_2), FRAC_PI_2);
    }

    #[test]
    fn oriented_angle_sign() {
        let tail = Point2::new(0.0, 0.0);
        let east = Point2::new(1.0, 0.0);
        let north = Point2::new(0.0, 1.0);
        assert_relative_eq!(angle_between_oriented(&east, &tail, &north), FRAC_PI_2);
        assert_relative_eq!(angle_between_oriented(&north, &tail, &east), -FRAC_PI_2);
    }
}
