use thiserror::Error;

use crate::math::Point2;

/// Top-level error type for the buffer engine.
#[derive(Debug, Error)]
pub enum GeobufferError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Errors related to the geometry model.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("precision scale must be positive and finite, got {0}")]
    InvalidScale(f64),
}

/// Errors raised while computing a buffer.
///
/// Only [`BufferError::Topology`] is recoverable: the precision retry loop in
/// [`BufferOp`](crate::operations::buffer::BufferOp) catches it and tries again
/// at a coarser precision. Every other variant is returned to the caller as is.
#[derive(Debug, Error)]
pub enum BufferError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error("internal invariant violated: {0}")]
    Invariant(String),

    #[error("unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl BufferError {
    /// Returns `true` if a retry at reduced precision may succeed.
    ///
    /// A lookup of an entity missing from the graph is a programming error
    /// that no precision can fix.
    #[must_use]
    pub fn is_topology(&self) -> bool {
        matches!(self, Self::Topology(err) if !matches!(err, TopologyError::EntityNotFound(_)))
    }
}

/// Inconsistent or non-convergent arrangement produced by noding or graph
/// assembly.
#[derive(Debug, Clone, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("depth mismatch at ({}, {})", .0.x, .0.y)]
    DepthMismatch(Point2),

    #[error("assigned depths do not match at ({}, {})", .0.x, .0.y)]
    ConflictingDepth(Point2),

    #[error("found two horizontal edges incident on node at ({}, {})", .0.x, .0.y)]
    HorizontalStar(Point2),

    #[error("no outgoing result edge found at ({}, {})", .0.x, .0.y)]
    UnlinkedEdge(Point2),

    #[error("result ring is not closed at ({}, {})", .0.x, .0.y)]
    OpenRing(Point2),

    #[error("unable to assign hole to a shell at ({}, {})", .0.x, .0.y)]
    UnplacedHole(Point2),

    #[error("noding did not converge: {0}")]
    NonConvergent(String),
}

/// Convenience type alias for results using [`GeobufferError`].
pub type Result<T> = std::result::Result<T, GeobufferError>;

/// Result type used inside the buffer pipeline.
pub type BufferResult<T> = std::result::Result<T, BufferError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_arrangement_errors_are_retryable() {
        let depth: BufferError = TopologyError::ConflictingDepth(Point2::new(1.0, 2.0)).into();
        assert!(depth.is_topology());
        let missing: BufferError = TopologyError::EntityNotFound("node".into()).into();
        assert!(!missing.is_topology());
        assert!(!BufferError::Invariant("seed".into()).is_topology());
    }
}
