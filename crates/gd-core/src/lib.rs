//! `gd-core` — foundational types for the guidance state engine.
//!
//! This crate is a dependency of every other `gd-*` crate.  It has no `gd-*`
//! dependencies and few external ones (`thiserror`, `serde`, `serde_json`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `RouteGeneration`                                     |
//! | [`geo`]         | `GeoPoint`, haversine distance                        |
//! | [`format`]      | countdown and distance display strings                |
//! | [`config`]      | `GuidanceConfig` (JSON-loadable)                      |
//! | [`error`]       | `CoreError`, `CoreResult`                             |

pub mod config;
pub mod error;
pub mod format;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::GuidanceConfig;
pub use error::{CoreError, CoreResult};
pub use format::{format_countdown, format_maneuver_distance, format_remaining_distance};
pub use geo::GeoPoint;
pub use ids::RouteGeneration;
