//! Error types for the render path.

use thiserror::Error;

use crate::backend::BackendError;

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised by the render queue and frame orchestrator.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The queue was full; the command was dropped and counted.
    #[error("Render queue full ({capacity} commands), draw command dropped")]
    DrawSubmissionFailure {
        /// Queue capacity.
        capacity: usize,
    },

    /// The consuming side of the queue is gone.
    #[error("Render queue closed")]
    QueueClosed,

    /// Flush attempted from a thread other than the bound presenter.
    #[error("Flush called off the presenter thread")]
    PresenterViolation,

    /// A presenter was already bound to this queue.
    #[error("Presenter already bound")]
    PresenterAlreadyBound,

    /// The drawing backend could not be brought up.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}
