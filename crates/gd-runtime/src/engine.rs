//! The navigation engine seam.
//!
//! # Pluggability
//!
//! The service talks to routing and live navigation only through
//! [`NavigationEngine`], so a vendor SDK binding, a remote service client or
//! the scripted engine in `gd-sim` can be swapped without touching the
//! session.

use std::future::Future;
use std::pin::Pin;

use gd_core::GeoPoint;
use gd_route::NavigationResult;
use thiserror::Error;

use crate::EngineSink;

/// A boxed, sendable future, as returned by engine methods.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("route computation failed: {0}")]
    Routing(String),

    #[error("navigation engine unavailable: {0}")]
    Unavailable(String),

    /// The guidance service is gone; events can no longer be delivered.
    #[error("guidance service disconnected")]
    Disconnected,
}

/// A turn-by-turn navigation engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` because the service shares them
/// with the spawned route-computation task.
pub trait NavigationEngine: Send + Sync + 'static {
    /// Compute routes from `from` to `to` and begin live navigation on the
    /// first one.
    ///
    /// Live events for this run must be delivered through `sink`.  An empty
    /// result list means no route exists.
    fn start_navigation(
        &self,
        from: GeoPoint,
        to: GeoPoint,
        sink: EngineSink,
    ) -> BoxFuture<Result<Vec<NavigationResult>, EngineError>>;

    /// Abandon the current run.  Must be idempotent.
    fn stop_navigation(&self);

    /// Engine-side remaining time, polled after every command.
    fn remaining_time_secs(&self) -> Option<f64>;

    /// Engine-side remaining distance, polled after every command.
    fn distance_to_target_m(&self) -> Option<f64>;
}
