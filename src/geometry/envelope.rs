use crate::math::Point2;

/// Axis-aligned bounding box. A null envelope covers no points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::null()
    }
}

impl Envelope {
    /// An envelope containing nothing.
    #[must_use]
    pub fn null() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Smallest envelope containing all `points`.
    #[must_use]
    pub fn from_points(points: &[Point2]) -> Self {
        let mut env = Self::null();
        for p in points {
            env.expand_to_include(p);
        }
        env
    }

    /// Returns `true` if the envelope covers no points.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.min_x > self.max_x
    }

    /// Grows the envelope to contain `p`.
    pub fn expand_to_include(&mut self, p: &Point2) {
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_y = self.max_y.max(p.y);
    }

    /// Grows the envelope to contain `other`.
    pub fn expand_to_include_envelope(&mut self, other: &Envelope) {
        if other.is_null() {
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.max_x = self.max_x.max(other.max_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_y = self.max_y.max(other.max_y);
    }

    #[must_use]
    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    #[must_use]
    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    /// Extent along x, or 0 for a null envelope.
    #[must_use]
    pub fn width(&self) -> f64 {
        if self.is_null() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    /// Extent along y, or 0 for a null envelope.
    #[must_use]
    pub fn height(&self) -> f64 {
        if self.is_null() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    /// Returns `true` if `other` lies entirely inside this envelope.
    #[must_use]
    pub fn contains_envelope(&self, other: &Envelope) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// Returns `true` if the envelopes share at least one point.
    #[must_use]
    pub fn intersects(&self, other: &Envelope) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        other.min_x <= self.max_x
            && other.max_x >= self.min_x
            && other.min_y <= self.max_y
            && other.max_y >= self.min_y
    }

    /// Largest absolute ordinate value, or 0 for a null envelope.
    #[must_use]
    pub fn max_abs_ordinate(&self) -> f64 {
        if self.is_null() {
            return 0.0;
        }
        self.min_x
            .abs()
            .max(self.max_x.abs())
            .max(self.min_y.abs())
            .max(self.max_y.abs())
    }
}
