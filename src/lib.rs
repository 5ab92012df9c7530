pub mod error;
pub mod geometry;
pub mod math;
pub mod noding;
pub mod operations;
pub mod topology;

pub use error::{GeobufferError, Result};
pub use geometry::{Geometry, GeometryFactory, PrecisionModel};
pub use operations::buffer::{buffer, BufferOp, BufferParameters};
