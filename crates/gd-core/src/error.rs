//! Shared error type.
//!
//! Sub-crates define their own error enums; this one covers the concerns
//! that live in `gd-core` itself (configuration and its I/O).

use thiserror::Error;

/// The error type for `gd-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `gd-core`.
pub type CoreResult<T> = Result<T, CoreError>;
