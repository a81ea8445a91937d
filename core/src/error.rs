use thiserror::Error;

/// Error kinds produced by the draw engine (spec.md §7).
#[derive(Debug, Error)]
pub enum DrawError {
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    #[error("attempted to push into a quiz cell that already holds 3 teams")]
    CapacityExceeded,

    #[error("attempted to remove a team that is not present at the given placement")]
    MissingPlacement,

    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),

    #[error("draw is unsatisfiable: final energy {energy:.3} exceeds threshold {threshold:.3}")]
    Unsatisfiable { energy: f64, threshold: f64 },
}

pub type DrawResult<T> = Result<T, DrawError>;
