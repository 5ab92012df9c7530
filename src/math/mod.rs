pub mod angle;
pub mod distance_2d;
pub mod intersect_2d;
pub mod orientation;
pub mod polygon_2d;

use std::cmp::Ordering;

pub use orientation::{orientation_index, Orientation};

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Hashable bit pattern of a coordinate, with `-0.0` folded onto `0.0`.
pub type CoordKey = (u64, u64);

/// Returns the exact hash key of a point.
#[must_use]
pub fn coord_key(p: &Point2) -> CoordKey {
    let fold = |v: f64| if v == 0.0 { 0.0_f64 } else { v };
    (fold(p.x).to_bits(), fold(p.y).to_bits())
}

/// Lexicographic (x, then y) ordering of points.
#[must_use]
pub fn compare_points(a: &Point2, b: &Point2) -> Ordering {
    a.x.partial_cmp(&b.x)
        .unwrap_or(Ordering::Equal)
        .then(a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
}

/// Exact 2D equality (no tolerance).
#[must_use]
#[allow(clippy::float_cmp)]
pub fn same_point(a: &Point2, b: &Point2) -> bool {
    a.x == b.x && a.y == b.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_zero_shares_key() {
        assert_eq!(coord_key(&Point2::new(-0.0, 1.0)), coord_key(&Point2::new(0.0, 1.0)));
    }

    #[test]
    fn lexicographic_order() {
        let a = Point2::new(1.0, 5.0);
        let b = Point2::new(1.0, 6.0);
        let c = Point2::new(0.0, 9.0);
        assert_eq!(compare_points(&a, &b), Ordering::Less);
        assert_eq!(compare_points(&a, &c), Ordering::Greater);
        assert_eq!(compare_points(&a, &a), Ordering::Equal);
    }
}
