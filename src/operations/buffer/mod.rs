//! Polygonal buffers of points, lines and polygons.
//!
//! [`BufferOp`] is the main entry point. It runs [`BufferBuilder`] at the
//! factory's precision and falls back to snap-rounded fixed precision when
//! the computation is not robust.

mod builder;
mod curve_set;
mod depth_locater;
mod offset_curve;
mod offset_segment;
mod op;
mod parameters;
mod polygon_builder;
mod rightmost;
mod simplify;
mod subgraph;

pub use builder::BufferBuilder;
pub use offset_curve::OffsetCurveBuilder;
pub use op::{buffer, precision_scale_factor, BufferOp};
pub use parameters::{
    BufferParameters, EndCapStyle, JoinStyle, DEFAULT_MITRE_LIMIT, DEFAULT_QUADRANT_SEGMENTS,
    DEFAULT_SIMPLIFY_FACTOR,
};
pub use simplify::simplify;
