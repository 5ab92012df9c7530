use crate::error::GeometryError;
use crate::math::Point2;

/// How coordinates are rounded when geometries are built.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PrecisionModel {
    /// Full double precision; coordinates are kept as computed.
    #[default]
    Floating,
    /// Coordinates snap to a grid with `1 / scale` spacing.
    Fixed { scale: f64 },
}

impl PrecisionModel {
    /// Creates a fixed precision model.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidScale` if `scale` is not a positive
    /// finite number.
    pub fn fixed(scale: f64) -> Result<Self, GeometryError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(GeometryError::InvalidScale(scale));
        }
        Ok(Self::Fixed { scale })
    }

    /// Returns `true` for a fixed-grid model.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed { .. })
    }

    /// The grid scale, or `None` for floating precision.
    #[must_use]
    pub fn scale(&self) -> Option<f64> {
        match *self {
            Self::Floating => None,
            Self::Fixed { scale } => Some(scale),
        }
    }

    /// Rounds a single ordinate to this model.
    ///
    /// Halves round towards positive infinity, so every point lands in the
    /// half-open grid cell `[c - h, c + h)` around its rounded value.
    #[must_use]
    pub fn make_precise_value(&self, v: f64) -> f64 {
        match *self {
            Self::Floating => v,
            Self::Fixed { scale } => (v * scale + 0.5).floor() / scale,
        }
    }

    /// Rounds a point to this model.
    #[must_use]
    pub fn make_precise(&self, p: Point2) -> Point2 {
        match self {
            Self::Floating => p,
            Self::Fixed { .. } => Point2::new(self.make_precise_value(p.x), self.make_precise_value(p.y)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn floating_keeps_values() {
        let pm = PrecisionModel::Floating;
        let p = pm.make_precise(Point2::new(1.234_567_89, -9.876_543_21));
        assert!((p.x - 1.234_567_89).abs() < f64::EPSILON);
        assert!(!pm.is_fixed());
        assert!(pm.scale().is_none());
    }

    #[test]
    fn fixed_snaps_to_grid() {
        let pm = PrecisionModel::fixed(100.0).unwrap();
        let p = pm.make_precise(Point2::new(1.234_56, -2.005_1));
        assert!((p.x - 1.23).abs() < 1e-12);
        assert!((p.y + 2.01).abs() < 1e-12);
        assert_eq!(pm.scale(), Some(100.0));
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn halves_round_up() {
        let pm = PrecisionModel::fixed(2.0).unwrap();
        assert_eq!(pm.make_precise_value(-0.25), 0.0);
        assert_eq!(pm.make_precise_value(0.25), 0.5);
        assert_eq!(pm.make_precise_value(-0.75), -0.5);
    }

    #[test]
    fn invalid_scale_is_rejected() {
        assert!(PrecisionModel::fixed(0.0).is_err());
        assert!(PrecisionModel::fixed(-1.0).is_err());
        assert!(PrecisionModel::fixed(f64::NAN).is_err());
    }
}
