//! Session observer trait for rendering and data collection.

use gd_core::RouteGeneration;

use crate::{GuidanceSnapshot, SessionState};

/// Callbacks invoked by [`GuidanceSession`][crate::GuidanceSession] as it
/// changes state.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — transition logger
///
/// ```rust,ignore
/// struct Transitions(Vec<(SessionState, SessionState)>);
///
/// impl GuidanceObserver for Transitions {
///     fn on_transition(&mut self, from: SessionState, to: SessionState, _g: RouteGeneration) {
///         self.0.push((from, to));
///     }
/// }
/// ```
pub trait GuidanceObserver {
    /// Called after every state change.
    fn on_transition(&mut self, _from: SessionState, _to: SessionState, _generation: RouteGeneration) {}

    /// Called whenever a published field changes.
    fn on_snapshot(&mut self, _snapshot: &GuidanceSnapshot) {}

    /// Called when a command could not be located in the instruction list.
    fn on_unmatched_command(&mut self, _description: &str) {}
}

/// A [`GuidanceObserver`] that does nothing.
pub struct NoopObserver;

impl GuidanceObserver for NoopObserver {}

impl<O: GuidanceObserver + ?Sized> GuidanceObserver for Box<O> {
    fn on_transition(&mut self, from: SessionState, to: SessionState, generation: RouteGeneration) {
        (**self).on_transition(from, to, generation);
    }

    fn on_snapshot(&mut self, snapshot: &GuidanceSnapshot) {
        (**self).on_snapshot(snapshot);
    }

    fn on_unmatched_command(&mut self, description: &str) {
        (**self).on_unmatched_command(description);
    }
}
