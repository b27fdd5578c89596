use thiserror::Error;

/// Top-level error type for the B-Rep Boolean kernel.
#[derive(Debug, Error)]
pub enum BrepError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Boolean(#[from] BooleanError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("point ({x}, {y}, {z}) is not on the curve")]
    NotOnCurve { x: f64, y: f64, z: f64 },
}

/// Errors related to topological structure.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("loop is not closed at edge {index}")]
    LoopNotClosed { index: usize },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Failures of a Boolean operation.
///
/// Every variant aborts the whole operation; no partial solid is returned.
#[derive(Debug, Error)]
pub enum BooleanError {
    /// A decision point could not be resolved within the working tolerance.
    #[error("tolerance ambiguity: {0}")]
    ToleranceAmbiguity(String),

    /// Retained boundary pieces of a face could not be walked into closed loops.
    #[error("loop on face {face} left {} stray endpoints", points.len())]
    UnclosedLoop {
        /// Debug name of the face being reconstructed.
        face: String,
        /// Endpoints of the edges left outside every closed loop.
        points: Vec<crate::math::Point3>,
    },

    /// The sweep over one intersection curve ended inside a face.
    #[error("unbalanced sweep: inside flags ({in_a}, {in_b}) at end of curve")]
    UnbalancedSweep { in_a: bool, in_b: bool },

    /// No intersection routine exists for this pair of surface kinds.
    #[error("unsupported surface pair: {first} / {second}")]
    UnsupportedSurfacePair {
        first: &'static str,
        second: &'static str,
    },

    /// The operation was called with arguments that violate its contract.
    #[error("precondition violated: {0}")]
    Precondition(String),
}

/// Convenience type alias for results using [`BrepError`].
pub type Result<T> = std::result::Result<T, BrepError>;
