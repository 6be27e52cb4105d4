//! `gd-runtime` — runs a `GuidanceSession` against a live navigation engine.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`engine`]  | `NavigationEngine` trait, `BoxFuture`, `EngineError`       |
//! | [`sink`]    | `EngineSink` — generation-tagged engine → session events   |
//! | [`service`] | `GuidanceService` — the single consumer task               |
//! | [`handle`]  | `GuidanceHandle` — caller-side API                         |
//! | [`logging`] | `init_logging`                                             |
//! | [`error`]   | `ServiceError`, `ServiceResult<T>`                         |
//!
//! # Task model
//!
//! ```text
//!  GuidanceHandle ──┐
//!  EngineSink ──────┤ mpsc ┌──────────────────────────────┐ watch
//!  route task ──────┘─────▶│ GuidanceService (one task)   │──────▶ snapshots
//!                          │  owns GuidanceSession        │
//!        1 s interval ────▶│  select! { shutdown,         │
//!        arrival sleep ───▶│    requests, arrival, tick } │
//!                          └──────────────────────────────┘
//! ```
//!
//! Nothing but the service task touches the session; the timer and the
//! engine are both just inputs to it.

pub mod engine;
pub mod error;
pub mod handle;
pub mod logging;
pub mod service;
pub mod sink;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use engine::{BoxFuture, EngineError, NavigationEngine};
pub use error::{ServiceError, ServiceResult};
pub use handle::GuidanceHandle;
pub use logging::init_logging;
pub use service::GuidanceService;
pub use sink::EngineSink;
