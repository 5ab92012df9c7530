use tracing::{info, warn};

use crate::error::{BufferError, BufferResult, Result};
use crate::geometry::{Geometry, GeometryFactory, PrecisionModel};
use crate::noding::SnapRoundingNoder;

use super::builder::BufferBuilder;
use super::parameters::BufferParameters;

/// Number of significant decimal digits tried first when retrying at fixed
/// precision.
const MAX_PRECISION_DIGITS: i32 = 12;

/// One way of running the buffer computation.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Attempt {
    /// The factory's own precision with the simple noder.
    Native,
    /// A fixed grid of `1 / scale` with snap rounding.
    Fixed { scale: f64 },
}

/// Computes the buffer of a geometry, retrying at reduced precision when the
/// full-precision computation is not robust enough.
///
/// # Example
///
/// ```
/// use geobuffer::geometry::{Geometry, GeometryFactory};
/// use geobuffer::operations::buffer::{BufferOp, BufferParameters, EndCapStyle};
///
/// let line = Geometry::line_string(&[(0.0, 0.0), (10.0, 0.0)]);
/// let params = BufferParameters::default().with_end_cap(EndCapStyle::Flat);
/// let result = BufferOp::new(&line, 2.0)
///     .with_params(params)
///     .execute(&GeometryFactory::default())
///     .unwrap();
/// assert!((result.area() - 40.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BufferOp<'a> {
    geometry: &'a Geometry,
    distance: f64,
    params: BufferParameters,
}

impl<'a> BufferOp<'a> {
    /// Creates a buffer operation with default parameters.
    #[must_use]
    pub fn new(geometry: &'a Geometry, distance: f64) -> Self {
        Self {
            geometry,
            distance,
            params: BufferParameters::default(),
        }
    }

    /// Sets the buffer parameters.
    #[must_use]
    pub fn with_params(mut self, params: BufferParameters) -> Self {
        self.params = params;
        self
    }

    /// Executes the operation, building the result with `factory`.
    ///
    /// A positive distance dilates the geometry, a negative one erodes
    /// polygons. The result is always polygonal and may be empty.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::InvalidArgument` for a non-finite distance or
    /// coordinate, for a result extent too large to compute with, or for
    /// invalid parameters. Returns `BufferError::Topology` if every precision
    /// failed, and any other `BufferError` raised by the computation.
    pub fn execute(&self, factory: &GeometryFactory) -> Result<Geometry> {
        self.check_input()?;
        self.params.validate()?;
        let result = self.with_retries(factory, |attempt| self.run(attempt, factory))?;
        Ok(result)
    }

    /// Rejects input whose buffer cannot be computed in double precision.
    fn check_input(&self) -> BufferResult<()> {
        if !self.distance.is_finite() {
            return Err(BufferError::InvalidArgument(format!(
                "buffer distance must be finite, got {}",
                self.distance
            )));
        }
        if let Some(p) = self
            .geometry
            .coordinates()
            .find(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(BufferError::InvalidArgument(format!(
                "coordinates must be finite, got ({}, {})",
                p.x, p.y
            )));
        }
        // Offset and intersection arithmetic squares ordinates of the result.
        let extent = self.geometry.envelope().max_abs_ordinate() + 2.0 * self.distance.abs();
        if !extent.is_finite() || extent >= f64::MAX.sqrt() {
            return Err(BufferError::InvalidArgument(format!(
                "buffer extent {extent:e} is too large"
            )));
        }
        Ok(())
    }

    fn run(&self, attempt: Attempt, factory: &GeometryFactory) -> BufferResult<Geometry> {
        let builder = BufferBuilder::new(self.params);
        let mut builder = match attempt {
            Attempt::Native => builder,
            Attempt::Fixed { scale } => builder
                .with_precision(PrecisionModel::Fixed { scale })
                .with_noder(Box::new(SnapRoundingNoder::new(scale)?)),
        };
        builder.build(self.geometry, self.distance, factory)
    }

    /// Runs `attempt` at native precision, then at decreasing fixed
    /// precisions while it fails with a topology error.
    fn with_retries<F>(&self, factory: &GeometryFactory, mut attempt: F) -> BufferResult<Geometry>
    where
        F: FnMut(Attempt) -> BufferResult<Geometry>,
    {
        let mut last_error = match attempt(Attempt::Native) {
            Err(err) if err.is_topology() => err,
            other => return other,
        };
        warn!(error = %last_error, "buffer failed at native precision");

        let scales: Vec<(i32, f64)> = match factory.precision_model() {
            PrecisionModel::Fixed { scale } => vec![(-1, scale)],
            PrecisionModel::Floating => (0..=MAX_PRECISION_DIGITS)
                .rev()
                .map(|digits| (digits, precision_scale_factor(self.geometry, self.distance, digits)))
                .collect(),
        };
        for (digits, scale) in scales {
            info!(digits, scale, "retrying buffer with snap rounding");
            match attempt(Attempt::Fixed { scale }) {
                Ok(geometry) => {
                    info!(digits, scale, "buffer succeeded at reduced precision");
                    return Ok(geometry);
                }
                Err(err) if err.is_topology() => {
                    warn!(digits, scale, error = %err, "buffer failed at reduced precision");
                    last_error = err;
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_error)
    }
}

/// Scale factor of a fixed precision model keeping `digits` significant
/// decimal digits for the largest ordinate of the buffer result.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn precision_scale_factor(geometry: &Geometry, distance: f64, digits: i32) -> f64 {
    let env_max = geometry.envelope().max_abs_ordinate();
    let buf_env_max = env_max + 2.0 * distance.max(0.0);
    let env_digits = if buf_env_max > 0.0 {
        (buf_env_max.log10() + 1.0) as i32
    } else {
        0
    };
    10f64.powi(digits - env_digits)
}

/// Computes the buffer of `geometry` at `distance` with default parameters.
///
/// # Errors
///
/// See [`BufferOp::execute`].
pub fn buffer(factory: &GeometryFactory, geometry: &Geometry, distance: f64) -> Result<Geometry> {
    BufferOp::new(geometry, distance).execute(factory)
}
