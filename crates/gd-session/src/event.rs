//! Engine-originated inputs to the session.

use gd_core::RouteGeneration;
use gd_route::NavigationResult;

use crate::SessionError;

// ── NavigationCommand ─────────────────────────────────────────────────────────

/// A live "next maneuver" notification from the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationCommand {
    /// Free-text maneuver description, often an upper-snake code.
    pub description:            String,
    pub distance_to_maneuver_m: f64,
    /// The command's own estimate of the time left to the destination.
    pub remaining_time_secs:    f64,
    /// Time to the maneuver itself, when the engine reports it.
    pub time_to_maneuver_secs:  Option<f64>,
}

impl NavigationCommand {
    pub fn new(description: impl Into<String>, distance_to_maneuver_m: f64, remaining_time_secs: f64) -> Self {
        Self {
            description: description.into(),
            distance_to_maneuver_m,
            remaining_time_secs,
            time_to_maneuver_secs: None,
        }
    }

    pub fn with_time_to_maneuver(mut self, secs: f64) -> Self {
        self.time_to_maneuver_secs = Some(secs);
        self
    }
}

// ── EngineState ───────────────────────────────────────────────────────────────

/// Engine-side navigation state polled alongside an event.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct EngineState {
    pub remaining_time_secs:  Option<f64>,
    pub distance_to_target_m: Option<f64>,
}

// ── GuidanceEvent ─────────────────────────────────────────────────────────────

/// Everything the engine can tell the session, tagged with the generation it
/// was produced for.
#[derive(Clone, Debug, PartialEq)]
pub enum GuidanceEvent {
    /// The initial route computation finished.  Empty `results` means no route.
    RouteReady {
        generation: RouteGeneration,
        results:    Vec<NavigationResult>,
    },
    NavigationStarted {
        generation: RouteGeneration,
    },
    Command {
        generation: RouteGeneration,
        command:    NavigationCommand,
        engine:     EngineState,
    },
    /// Emitted with the revision the engine moves to.
    WillRecalculate {
        generation: RouteGeneration,
    },
    /// `result` is `None` when the engine kept its current route.
    Recalculated {
        generation: RouteGeneration,
        result:     Option<NavigationResult>,
        engine:     EngineState,
    },
    NavigationStopped {
        generation: RouteGeneration,
    },
}

impl GuidanceEvent {
    pub fn generation(&self) -> RouteGeneration {
        match self {
            Self::RouteReady { generation, .. }
            | Self::NavigationStarted { generation }
            | Self::Command { generation, .. }
            | Self::WillRecalculate { generation }
            | Self::Recalculated { generation, .. }
            | Self::NavigationStopped { generation } => *generation,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::RouteReady { .. }        => "route_ready",
            Self::NavigationStarted { .. } => "navigation_started",
            Self::Command { .. }           => "command",
            Self::WillRecalculate { .. }   => "will_recalculate",
            Self::Recalculated { .. }      => "recalculated",
            Self::NavigationStopped { .. } => "navigation_stopped",
        }
    }
}

// ── EventOutcome ──────────────────────────────────────────────────────────────

/// What the session did with an input.
#[derive(Clone, Debug, PartialEq)]
pub enum EventOutcome {
    Applied,
    /// Stale generation, or a state that cannot accept the input.
    Discarded,
    /// Applied, and the session reports a failure to the caller.
    Failed(SessionError),
}

impl EventOutcome {
    #[inline]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}
