//! Session lifecycle states.

use std::fmt;

use serde::Serialize;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    /// Waiting for the engine's route computation.
    Calculating,
    Guiding,
    /// The engine is replacing the route; commands are not applied.
    Recalculating,
    /// Destination reached; the confirmation is shown until the grace delay
    /// runs out.
    Arrived,
    /// Terminal.  Behaves as `Idle` for a new start.
    Stopped,
}

impl SessionState {
    /// States that own engine-side work and must be stopped before reuse.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Calculating | Self::Guiding | Self::Recalculating | Self::Arrived)
    }

    /// States in which guidance is on screen.
    #[inline]
    pub fn is_guiding(self) -> bool {
        matches!(self, Self::Guiding | Self::Recalculating | Self::Arrived)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle          => "idle",
            Self::Calculating   => "calculating",
            Self::Guiding       => "guiding",
            Self::Recalculating => "recalculating",
            Self::Arrived       => "arrived",
            Self::Stopped       => "stopped",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
