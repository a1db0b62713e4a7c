use thiserror::Error;

/// Errors reported by the pipeline for inputs it cannot process.
///
/// Degenerate but valid inputs (uniform images, no foreground, no tumor) are
/// not errors; they flow through the stages and end as
/// [`ClassificationResult::NoTumor`](crate::ClassificationResult::NoTumor).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// An image or contour frame does not match the atlas coordinate space.
    /// Dimensions are `(width, height)`.
    #[error("resolution mismatch: expected {expected:?}, got {actual:?}")]
    ResolutionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// The atlas is not `working_resolution x working_resolution`.
    #[error("atlas must be {expected}x{expected}, got {actual:?}")]
    AtlasResolution {
        expected: usize,
        actual: (usize, usize),
    },

    #[error("input image has no pixels")]
    EmptyImage,
}

pub type PipelineResult<T> = Result<T, PipelineError>;
