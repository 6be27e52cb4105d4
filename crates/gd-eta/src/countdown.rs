//! `CountdownClock` — absolute-deadline countdown rendering.
//!
//! The clock holds no timer of its own: the owner calls [`tick`] on its
//! periodic schedule and passes `now`, which keeps the clock testable
//! without sleeping.
//!
//! [`tick`]: CountdownClock::tick

use std::time::{Duration, Instant};

use gd_core::format_countdown;

#[derive(Clone, Debug, Default)]
pub struct CountdownClock {
    deadline: Option<Instant>,
    text:     Option<String>,
}

impl CountdownClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the deadline at `now + remaining_secs` and re-render.
    ///
    /// Non-finite, non-positive and unrepresentable values are ignored and
    /// `false` is returned; a clock that was never retargeted shows no text.
    pub fn retarget(&mut self, remaining_secs: f64, now: Instant) -> bool {
        if !remaining_secs.is_finite() || remaining_secs <= 0.0 {
            return false;
        }
        let Ok(remaining) = Duration::try_from_secs_f64(remaining_secs) else {
            return false;
        };
        let Some(deadline) = now.checked_add(remaining) else {
            return false;
        };
        self.deadline = Some(deadline);
        self.tick(now);
        true
    }

    /// Re-render against `now`.  Returns the new text, or `None` when stopped.
    pub fn tick(&mut self, now: Instant) -> Option<&str> {
        let remaining = self.remaining_secs(now)?;
        self.text = Some(format_countdown(remaining));
        self.text.as_deref()
    }

    /// Clear the deadline and the rendered text.
    pub fn stop(&mut self) {
        self.deadline = None;
        self.text = None;
    }

    /// Seconds until the deadline, floored at zero.
    pub fn remaining_secs(&self, now: Instant) -> Option<f64> {
        self.deadline
            .map(|d| d.saturating_duration_since(now).as_secs_f64())
    }

    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }
}
