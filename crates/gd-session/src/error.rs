use gd_core::GeoPoint;
use thiserror::Error;

/// Reasons a navigation start is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("start and destination are {distance_m:.1} m apart, minimum is {min_m:.1} m")]
    TooClose { distance_m: f64, min_m: f64 },

    #[error("navigation engine returned no route")]
    NoRoute,

    #[error("invalid coordinate {0}")]
    InvalidPoint(GeoPoint),
}

pub type SessionResult<T> = Result<T, SessionError>;
