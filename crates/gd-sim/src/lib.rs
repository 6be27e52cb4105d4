//! `gd-sim` — drives the guidance engine without a real router.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`scenario`] | `build_timeline` — per-second command stream for a route   |
//! | [`noise`]    | `NoiseConfig`, `perturb` — seeded duplicate/drop/swap      |
//! | [`engine`]   | `ScriptedEngine` — `NavigationEngine` that replays a route |
//! | [`trace`]    | `TraceRecorder` — CSV trace of published snapshots         |
//! | [`error`]    | `SimError`, `SimResult<T>`                                 |
//!
//! # Example
//!
//! ```rust,ignore
//! let engine = Arc::new(ScriptedEngine::new(route, "REACHED_YOUR_DESTINATION"));
//! let recorder = TraceRecorder::create(Path::new("trace.csv"))?;
//! let (handle, task) = GuidanceService::spawn(config, engine, recorder)?;
//! handle.start(from, to).await?;
//! ```

pub mod engine;
pub mod error;
pub mod noise;
pub mod scenario;
pub mod trace;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use engine::{Recalculation, ScriptedEngine};
pub use error::{SimError, SimResult};
pub use noise::{NoiseConfig, perturb};
pub use scenario::{ScriptedStep, build_timeline};
pub use trace::TraceRecorder;
