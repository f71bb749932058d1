use thiserror::Error;
use tus_model::ModelError;

/// Failures that stop a run from producing any table.
///
/// Everything short of this is recorded as a diagnostic instead.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Layout(#[from] ModelError),

    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("no module produced a linkable table")]
    NoOutput,
}

pub type Result<T> = std::result::Result<T, TransformError>;
