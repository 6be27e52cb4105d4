//! Remaining-time fusion.
//!
//! Several sources report the time left to the destination and they rarely
//! agree.  [`EtaEstimator::update`] takes the smallest sane candidate, caps
//! it at the route's total duration and, while guiding, at the previously
//! published value, so the countdown never jumps upward on a noise spike.
//!
//! | Candidate          | Source                                              |
//! |--------------------|-----------------------------------------------------|
//! | `to_next + rest`   | live command + instruction durations after cursor   |
//! | `command_reported` | the live command's own destination estimate          |
//! | `engine_reported`  | the engine's polled navigation state                |

use tracing::trace;

// ── UpdateSignals ─────────────────────────────────────────────────────────────

/// The remaining-time readings available for one update.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct UpdateSignals {
    /// Time to the next maneuver.  Enables the summed candidate.
    pub to_next_maneuver_secs: Option<f64>,
    /// Sum of instruction durations after the active one.
    pub rest_of_route_secs:    Option<f64>,
    pub command_reported_secs: Option<f64>,
    pub engine_reported_secs:  Option<f64>,
}

impl UpdateSignals {
    /// Candidates in table order; absent ones are `None`.
    fn candidates(&self) -> [Option<f64>; 3] {
        let summed = self
            .to_next_maneuver_secs
            .map(|next| next + self.rest_of_route_secs.unwrap_or(0.0));
        [summed, self.command_reported_secs, self.engine_reported_secs]
    }

    /// The smallest finite, strictly positive candidate.
    pub fn fused(&self) -> Option<f64> {
        self.candidates()
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite() && *v > 0.0)
            .min_by(f64::total_cmp)
    }
}

// ── EtaEstimate ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct EtaEstimate {
    pub target_remaining_secs: f64,
    /// Upper bound for the next update while guiding.  `None` after a reset.
    pub last_published_secs:   Option<f64>,
}

// ── EtaEstimator ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct EtaEstimator {
    estimate: EtaEstimate,
    has_target: bool,
}

impl EtaEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fuse `signals` into a new estimate.
    ///
    /// Returns the new value, or `None` when no candidate survives
    /// filtering.  `None` means "no new value": the previous estimate is
    /// kept unchanged and stays readable through [`estimate`](Self::estimate)
    /// and [`target`](Self::target), and a countdown already running from it
    /// should not be restarted.  `total_duration_secs` caps the value when
    /// positive.  With `monotonic` set the value is also capped at the last
    /// published figure.
    pub fn update(
        &mut self,
        signals: &UpdateSignals,
        total_duration_secs: f64,
        monotonic: bool,
    ) -> Option<f64> {
        let fused = signals.fused()?;
        let mut value = fused;

        if total_duration_secs.is_finite() && total_duration_secs > 0.0 {
            value = value.min(total_duration_secs);
        }
        if monotonic {
            if let Some(last) = self.estimate.last_published_secs {
                value = value.min(last);
            }
        }

        trace!(fused, value, monotonic, "eta update");

        self.estimate = EtaEstimate {
            target_remaining_secs: value,
            last_published_secs:   Some(value),
        };
        self.has_target = true;
        Some(value)
    }

    /// Forget the monotonic bound.  The current target is kept.
    pub fn reset(&mut self) {
        self.estimate.last_published_secs = None;
    }

    /// Forget everything, as for a fresh session.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn estimate(&self) -> &EtaEstimate {
        &self.estimate
    }

    /// The current target, or `None` before the first successful update.
    #[inline]
    pub fn target(&self) -> Option<f64> {
        self.has_target.then_some(self.estimate.target_remaining_secs)
    }

    #[inline]
    pub fn last_published(&self) -> Option<f64> {
        self.estimate.last_published_secs
    }
}
