//! `gd-eta` — one trustworthy remaining-time figure and its countdown.
//!
//! # Crate layout
//!
//! | Module        | Contents                                          |
//! |---------------|---------------------------------------------------|
//! | [`estimator`] | `UpdateSignals`, `EtaEstimate`, `EtaEstimator`    |
//! | [`countdown`] | `CountdownClock`                                  |
//!
//! The estimator decides *what* the remaining time is whenever a new signal
//! arrives; the clock turns that figure into an absolute deadline and renders
//! it on every tick, so the display keeps moving while the engine is silent.

pub mod countdown;
pub mod estimator;

#[cfg(test)]
mod tests;

pub use countdown::CountdownClock;
pub use estimator::{EtaEstimate, EtaEstimator, UpdateSignals};
