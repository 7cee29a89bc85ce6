use thiserror::Error;

/// Failures of the matrix exponential engine
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExpmError {
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("expected dimension {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("lifted generator must have even dimension, got {0}")]
    OddDimension(usize),

    /// The generator is not the real lift of a skew-Hermitian matrix, so
    /// the eigen strategy does not apply
    #[error("generator is not the lift of a skew-Hermitian matrix (relative deviation {deviation:e})")]
    NotSkewHermitian { deviation: f64 },

    #[error("Hermitian eigendecomposition of a {dim}x{dim} matrix failed to converge")]
    EigenConvergence { dim: usize },

    #[error("matrix exponential produced non-finite entries")]
    NonFinite,
}
