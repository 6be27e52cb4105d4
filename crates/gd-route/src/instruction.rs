//! Route instructions and the computed route that carries them.

use gd_core::GeoPoint;
use serde::{Deserialize, Serialize};

// ── Instruction ───────────────────────────────────────────────────────────────

/// One precomputed maneuver step of a route.
///
/// Identity is positional: two instructions with the same text at different
/// indices are different steps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Maneuver text as produced by the routing engine.
    pub text: String,
    /// Expected travel time of the segment that ends at this maneuver.
    pub segment_duration_secs: f64,
    /// Length of the segment that ends at this maneuver.
    pub segment_distance_m: f64,
}

impl Instruction {
    pub fn new(text: impl Into<String>, segment_duration_secs: f64, segment_distance_m: f64) -> Self {
        Self {
            text: text.into(),
            segment_duration_secs,
            segment_distance_m,
        }
    }

    /// Duration usable in sums: negative and non-finite values count as zero.
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        sanitize(self.segment_duration_secs)
    }
}

// ── NavigationResult ──────────────────────────────────────────────────────────

/// A route computed by the navigation engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationResult {
    pub total_distance_m: f64,
    pub total_time_secs:  f64,
    pub instructions:     Vec<Instruction>,
    /// Route polyline.  Not interpreted by guidance; kept for consumers.
    pub points:           Vec<GeoPoint>,
}

impl NavigationResult {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        let total_time_secs  = instructions.iter().map(Instruction::duration_secs).sum();
        let total_distance_m = instructions.iter().map(|i| sanitize(i.segment_distance_m)).sum();
        Self {
            total_distance_m,
            total_time_secs,
            instructions,
            points: Vec::new(),
        }
    }

    /// Sum of the instruction segment durations.
    pub fn instruction_duration_secs(&self) -> f64 {
        self.instructions.iter().map(Instruction::duration_secs).sum()
    }

    /// The larger of the engine-reported total and the instruction sum.
    ///
    /// Engines occasionally report a total that omits the final segment, so
    /// the countdown is primed with whichever is longer.
    pub fn effective_total_secs(&self) -> f64 {
        sanitize(self.total_time_secs).max(self.instruction_duration_secs())
    }
}

#[inline]
fn sanitize(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}
