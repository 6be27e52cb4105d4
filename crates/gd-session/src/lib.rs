//! `gd-session` — the guidance state machine.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`state`]    | `SessionState`                                                  |
//! | [`event`]    | `NavigationCommand`, `EngineState`, `GuidanceEvent`, `EventOutcome` |
//! | [`snapshot`] | `GuidanceSnapshot` — the only state visible outside the session |
//! | [`observer`] | `GuidanceObserver` trait, `NoopObserver`                        |
//! | [`session`]  | `GuidanceSession`, `StartRequest`                               |
//! | [`error`]    | `SessionError`, `SessionResult<T>`                              |
//!
//! # Lifecycle
//!
//! ```text
//!        start                route_ready
//! Idle ─────────▶ Calculating ───────────▶ Guiding ◀──────────┐
//!  ▲                  │ (no route)          │  │ recalculate   │ route_recalculated
//!  └──────────────────┘                     │  └──▶ Recalculating
//!                                           │ reached marker
//!                                           ▼
//!                        Stopped ◀────── Arrived   (after the grace delay)
//! ```
//!
//! `stop()` moves any active state to `Stopped`.  Every engine-originated
//! event carries the [`RouteGeneration`](gd_core::RouteGeneration) it was
//! produced for; events from another generation are discarded unseen.

pub mod error;
pub mod event;
pub mod observer;
pub mod session;
pub mod snapshot;
pub mod state;


pub use error::{SessionError, SessionResult};
pub use event::{EngineState, EventOutcome, GuidanceEvent, NavigationCommand};
pub use observer::{GuidanceObserver, NoopObserver};
pub use session::{GuidanceSession, StartRequest};
pub use snapshot::GuidanceSnapshot;
pub use state::SessionState;
