//! The published guidance state.

use gd_core::RouteGeneration;
use gd_route::ManeuverIcon;
use serde::Serialize;

use crate::SessionState;

/// Read-only view of everything the rendering layer may show.
///
/// A snapshot is a value: holding one never blocks the session.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GuidanceSnapshot {
    pub state:                    SessionState,
    pub generation:               RouteGeneration,
    pub is_guiding:               bool,
    pub current_instruction_text: Option<String>,
    pub current_icon:             Option<ManeuverIcon>,
    pub maneuver_distance_text:   Option<String>,
    pub remaining_distance_text:  Option<String>,
    pub eta_text:                 Option<String>,
}

impl GuidanceSnapshot {
    /// `true` when no guidance field is set.
    pub fn is_blank(&self) -> bool {
        self.current_instruction_text.is_none()
            && self.current_icon.is_none()
            && self.maneuver_distance_text.is_none()
            && self.remaining_distance_text.is_none()
            && self.eta_text.is_none()
    }
}
