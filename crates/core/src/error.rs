use thiserror::Error;

/// Errors surfaced by the world generation pipeline.
///
/// Every variant maps to one of the four error categories from the pipeline's
/// error handling design, which in turn maps to a CLI exit code:
/// missing-input (2), degenerate-geometry and convergence-failure are
/// recovered internally and only logged, and invariant violations are
/// fatal (3).
#[derive(Debug, Error)]
pub enum WorldError {
    /// A stage was asked to run without an attribute a prior stage should
    /// have populated.
    #[error("stage `{stage}` requires attribute `{attribute}`, which has not been computed yet")]
    MissingAttribute {
        stage: &'static str,
        attribute: &'static str,
    },

    /// A cell id was referenced that doesn't exist in the graph.
    #[error("cell id {0} is out of bounds")]
    CellOutOfBounds(usize),

    /// An internal invariant (neighbor symmetry, river connectivity, culture
    /// id bounds, ...) was violated. This should never happen with correct
    /// inputs; it indicates a bug in the pipeline itself.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// The extent or point configuration could not produce any cells at all.
    #[error("mesh generation produced zero cells for the given extent/density")]
    EmptyMesh,

    /// A config value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The pipeline was cancelled cooperatively via the cancellation flag.
    #[error("generation cancelled")]
    Cancelled,
}

pub type WorldResult<T> = Result<T, WorldError>;
