//! Robust orientation predicate.
//!
//! The sign of the 2x2 determinant is first evaluated in plain `f64` with a
//! forward error bound. Only when the bound cannot certify the sign is the
//! determinant recomputed in double-double arithmetic.

use super::Point2;

/// Relative error bound of the floating-point filter.
const DP_SAFE_EPSILON: f64 = 1e-15;

/// Turn direction of a point relative to a directed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Orientation {
    /// The point lies to the right (clockwise turn).
    Clockwise,
    /// The point lies on the line.
    Collinear,
    /// The point lies to the left (counter-clockwise turn).
    CounterClockwise,
}

impl Orientation {
    /// Returns `-1`, `0` or `1`.
    #[must_use]
    pub fn signum(self) -> i32 {
        match self {
            Self::Clockwise => -1,
            Self::Collinear => 0,
            Self::CounterClockwise => 1,
        }
    }

    fn from_sign(v: f64) -> Self {
        if v > 0.0 {
            Self::CounterClockwise
        } else if v < 0.0 {
            Self::Clockwise
        } else {
            Self::Collinear
        }
    }
}

/// Returns the orientation of `q` relative to the directed line `p1 -> p2`.
#[must_use]
pub fn orientation_index(p1: &Point2, p2: &Point2, q: &Point2) -> Orientation {
    if let Some(o) = orientation_filter(p1, p2, q) {
        return o;
    }
    let dx1 = DoubleDouble::diff(p2.x, p1.x);
    let dy1 = DoubleDouble::diff(p2.y, p1.y);
    let dx2 = DoubleDouble::diff(q.x, p2.x);
    let dy2 = DoubleDouble::diff(q.y, p2.y);
    let det = dx1.mul(dy2).sub(dy1.mul(dx2));
    Orientation::from_sign(det.signum())
}

/// Fast path: returns `None` when the rounding error may flip the sign.
fn orientation_filter(pa: &Point2, pb: &Point2, pc: &Point2) -> Option<Orientation> {
    let det_left = (pa.x - pc.x) * (pb.y - pc.y);
    let det_right = (pa.y - pc.y) * (pb.x - pc.x);
    let det = det_left - det_right;

    let det_sum = if det_left > 0.0 {
        if det_right <= 0.0 {
            return Some(Orientation::from_sign(det));
        }
        det_left + det_right
    } else if det_left < 0.0 {
        if det_right >= 0.0 {
            return Some(Orientation::from_sign(det));
        }
        -det_left - det_right
    } else {
        return Some(Orientation::from_sign(det));
    };

    let err_bound = DP_SAFE_EPSILON * det_sum;
    if det >= err_bound || -det >= err_bound {
        return Some(Orientation::from_sign(det));
    }
    None
}

/// Unevaluated sum `hi + lo` carrying roughly 106 bits of mantissa.
#[derive(Debug, Clone, Copy)]
struct DoubleDouble {
    hi: f64,
    lo: f64,
}

impl DoubleDouble {
    /// Exact difference `a - b`.
    fn diff(a: f64, b: f64) -> Self {
        let (hi, lo) = two_sum(a, -b);
        Self { hi, lo }
    }

    fn mul(self, other: Self) -> Self {
        let (p, mut e) = two_prod(self.hi, other.hi);
        e += self.hi * other.lo + self.lo * other.hi;
        let (hi, lo) = quick_two_sum(p, e);
        Self { hi, lo }
    }

    fn sub(self, other: Self) -> Self {
        let (s, mut e) = two_sum(self.hi, -other.hi);
        let (t, f) = two_sum(self.lo, -other.lo);
        e += t;
        let (s, e) = quick_two_sum(s, e);
        let (hi, lo) = quick_two_sum(s, e + f);
        Self { hi, lo }
    }

    fn signum(self) -> f64 {
        if self.hi != 0.0 {
            self.hi
        } else {
            self.lo
        }
    }
}

fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    (s, err)
}

fn quick_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let err = b - (s - a);
    (s, err)
}

fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    let err = a.mul_add(b, -p);
    (p, err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn left_right_collinear() {
        let a = p(0.0, 0.0);
        let b = p(10.0, 0.0);
        assert_eq!(orientation_index(&a, &b, &p(5.0, 1.0)), Orientation::CounterClockwise);
        assert_eq!(orientation_index(&a, &b, &p(5.0, -1.0)), Orientation::Clockwise);
        assert_eq!(orientation_index(&a, &b, &p(20.0, 0.0)), Orientation::Collinear);
    }

    #[test]
    fn near_degenerate_is_consistent() {
        // Points almost on a long, steep line: the filter cannot decide, the
        // double-double path must still give antisymmetric answers.
        let a = p(0.1, 0.1);
        let b = p(1e8 + 0.1, 3e8 + 0.1);
        let q = p(1.1, 3.1);
        let o1 = orientation_index(&a, &b, &q);
        let o2 = orientation_index(&b, &a, &q);
        assert_eq!(o1.signum(), -o2.signum());
    }

    #[test]
    fn ordering_matches_signum() {
        assert!(Orientation::Clockwise < Orientation::Collinear);
        assert!(Orientation::Collinear < Orientation::CounterClockwise);
        assert_eq!(Orientation::CounterClockwise.signum(), 1);
    }
}
