use gd_core::CoreError;
use gd_session::SessionError;
use thiserror::Error;

use crate::EngineError;

/// Errors surfaced to [`GuidanceHandle`](crate::GuidanceHandle) callers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("navigation rejected: {0}")]
    Session(#[from] SessionError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("invalid configuration: {0}")]
    Config(#[from] CoreError),

    /// The start request was superseded by a stop or a newer start.
    #[error("navigation request cancelled")]
    Cancelled,

    /// The service task has exited.
    #[error("guidance service closed")]
    Closed,
}

pub type ServiceResult<T> = Result<T, ServiceError>;
