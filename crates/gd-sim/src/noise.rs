//! Seeded perturbation of a timeline.
//!
//! Live engines repeat commands, skip some when the position fix jumps, and
//! occasionally deliver two out of order.  [`perturb`] reproduces those
//! three faults with independent probabilities.  The same seed always yields
//! the same output for the same input.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{SimError, SimResult};

// ── NoiseConfig ───────────────────────────────────────────────────────────────

/// Fault probabilities, each applied independently per step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub seed:           u64,
    /// Chance that a step is emitted twice.
    pub duplicate_prob: f64,
    /// Chance that a step is never emitted.
    pub drop_prob:      f64,
    /// Chance that a step swaps places with its successor.
    pub swap_prob:      f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed:           0,
            duplicate_prob: 0.0,
            drop_prob:      0.0,
            swap_prob:      0.0,
        }
    }
}

impl NoiseConfig {
    /// No faults at all.
    pub fn is_quiet(&self) -> bool {
        self.duplicate_prob == 0.0 && self.drop_prob == 0.0 && self.swap_prob == 0.0
    }

    pub fn validate(&self) -> SimResult<()> {
        for (name, p) in [
            ("duplicate_prob", self.duplicate_prob),
            ("drop_prob", self.drop_prob),
            ("swap_prob", self.swap_prob),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::Config(format!("{name} must be within [0, 1], got {p}")));
            }
        }
        Ok(())
    }
}

// ── perturb ───────────────────────────────────────────────────────────────────

/// Apply the configured faults to `items`.
///
/// The final element is never dropped, duplicated or moved, so a timeline
/// that ends in the arrival marker still ends in it.
pub fn perturb<T: Clone>(items: Vec<T>, config: &NoiseConfig) -> Vec<T> {
    if config.is_quiet() || items.len() < 2 {
        return items;
    }

    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut items = items;
    let Some(last) = items.pop() else {
        return items;
    };

    let mut out = Vec::with_capacity(items.len() + 1);
    for item in items {
        if chance(&mut rng, config.drop_prob) {
            continue;
        }
        if chance(&mut rng, config.duplicate_prob) {
            out.push(item.clone());
        }
        out.push(item);
    }

    let mut i = 0;
    while i + 1 < out.len() {
        if chance(&mut rng, config.swap_prob) {
            out.swap(i, i + 1);
            i += 2;
        } else {
            i += 1;
        }
    }

    out.push(last);
    out
}

/// `true` with probability `p`; out-of-range `p` is clamped, NaN never fires.
#[inline]
fn chance(rng: &mut SmallRng, p: f64) -> bool {
    p > 0.0 && rng.gen_bool(p.min(1.0))
}
