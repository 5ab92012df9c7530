use crate::error::BufferError;

/// Number of segments used to approximate a quarter circle by default.
pub const DEFAULT_QUADRANT_SEGMENTS: i32 = 8;

/// Default ratio of mitre length to buffer distance before bevelling.
pub const DEFAULT_MITRE_LIMIT: f64 = 5.0;

/// Default fraction of the buffer distance used as simplification tolerance.
pub const DEFAULT_SIMPLIFY_FACTOR: f64 = 0.01;

/// Shape of the buffer at the ends of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndCapStyle {
    /// Semicircle around the end point.
    #[default]
    Round,
    /// Cut off square at the end point.
    Flat,
    /// Square extended past the end point by the buffer distance.
    Square,
}

/// Shape of the buffer at outside corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinStyle {
    /// Circular arc around the vertex.
    #[default]
    Round,
    /// Sharp corner, bevelled beyond the mitre limit.
    Mitre,
    /// Straight cut between the two offset segments.
    Bevel,
}

/// Configuration of a buffer computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferParameters {
    quadrant_segments: i32,
    end_cap: EndCapStyle,
    join: JoinStyle,
    mitre_limit: f64,
    single_sided: bool,
    simplify_factor: f64,
}

impl Default for BufferParameters {
    fn default() -> Self {
        Self {
            quadrant_segments: DEFAULT_QUADRANT_SEGMENTS,
            end_cap: EndCapStyle::Round,
            join: JoinStyle::Round,
            mitre_limit: DEFAULT_MITRE_LIMIT,
            single_sided: false,
            simplify_factor: DEFAULT_SIMPLIFY_FACTOR,
        }
    }
}

impl BufferParameters {
    /// Parameters with the given quadrant segment count and end cap style.
    ///
    /// The quadrant segment count follows the rules of
    /// [`with_quadrant_segments`](Self::with_quadrant_segments).
    #[must_use]
    pub fn new(quadrant_segments: i32, end_cap: EndCapStyle) -> Self {
        Self::default()
            .with_quadrant_segments(quadrant_segments)
            .with_end_cap(end_cap)
    }

    /// Sets the number of segments per quarter circle.
    ///
    /// A value of 0 selects bevel joins; a negative value selects mitre joins
    /// with a mitre limit of its absolute value. Non-positive values are
    /// stored as 1, and any non-round join resets the count to the default.
    #[must_use]
    pub fn with_quadrant_segments(mut self, quadrant_segments: i32) -> Self {
        self.quadrant_segments = quadrant_segments;
        if quadrant_segments == 0 {
            self.join = JoinStyle::Bevel;
        }
        if quadrant_segments < 0 {
            self.join = JoinStyle::Mitre;
            self.mitre_limit = f64::from(quadrant_segments.unsigned_abs());
        }
        if quadrant_segments <= 0 {
            self.quadrant_segments = 1;
        }
        if self.join != JoinStyle::Round {
            self.quadrant_segments = DEFAULT_QUADRANT_SEGMENTS;
        }
        self
    }

    /// Sets the end cap style.
    #[must_use]
    pub fn with_end_cap(mut self, end_cap: EndCapStyle) -> Self {
        self.end_cap = end_cap;
        self
    }

    /// Sets the join style.
    #[must_use]
    pub fn with_join(mut self, join: JoinStyle) -> Self {
        self.join = join;
        self
    }

    /// Sets the mitre limit.
    #[must_use]
    pub fn with_mitre_limit(mut self, mitre_limit: f64) -> Self {
        self.mitre_limit = mitre_limit;
        self
    }

    /// Buffers lines on one side only: left for positive distances, right
    /// for negative ones.
    #[must_use]
    pub fn with_single_sided(mut self, single_sided: bool) -> Self {
        self.single_sided = single_sided;
        self
    }

    /// Sets the simplification tolerance as a fraction of the distance.
    #[must_use]
    pub fn with_simplify_factor(mut self, simplify_factor: f64) -> Self {
        self.simplify_factor = simplify_factor;
        self
    }

    #[must_use]
    pub fn quadrant_segments(&self) -> i32 {
        self.quadrant_segments
    }

    #[must_use]
    pub fn end_cap(&self) -> EndCapStyle {
        self.end_cap
    }

    #[must_use]
    pub fn join(&self) -> JoinStyle {
        self.join
    }

    #[must_use]
    pub fn mitre_limit(&self) -> f64 {
        self.mitre_limit
    }

    #[must_use]
    pub fn is_single_sided(&self) -> bool {
        self.single_sided
    }

    #[must_use]
    pub fn simplify_factor(&self) -> f64 {
        self.simplify_factor
    }

    /// Checks that the parameters describe a computable buffer.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::InvalidArgument` for a negative or non-finite
    /// simplify factor, or a non-positive mitre limit.
    pub fn validate(&self) -> Result<(), BufferError> {
        if !(self.simplify_factor.is_finite() && self.simplify_factor >= 0.0) {
            return Err(BufferError::InvalidArgument(format!(
                "simplify factor must be non-negative, got {}",
                self.simplify_factor
            )));
        }
        if !(self.mitre_limit.is_finite() && self.mitre_limit > 0.0) {
            return Err(BufferError::InvalidArgument(format!(
                "mitre limit must be positive, got {}",
                self.mitre_limit
            )));
        }
        Ok(())
    }
}
