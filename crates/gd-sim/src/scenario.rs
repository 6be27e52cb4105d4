//! Command timelines generated from a computed route.
//!
//! A timeline walks the route one simulated second at a time.  Every step
//! names the instruction being driven towards and counts down the time and
//! distance to that maneuver, so the session sees the same kind of stream a
//! live engine produces:
//!
//! ```text
//!  Head north   30 s ─▶ 30, 29, … 1        (30 steps)
//!  Turn right  120 s ─▶ 120, 119, … 1      (120 steps)
//!  <marker>          ─▶ 0                  (1 step)
//! ```

use gd_route::{Instruction, NavigationResult, is_destination_reached};
use gd_session::NavigationCommand;

/// One command the simulated engine emits, with the engine-side distance it
/// reports while that command is current.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptedStep {
    pub command:              NavigationCommand,
    pub distance_to_target_m: f64,
}

impl ScriptedStep {
    /// The engine-side remaining time while this step is current.
    #[inline]
    pub fn remaining_time_secs(&self) -> f64 {
        self.command.remaining_time_secs
    }
}

/// Build the timeline for `route`, ending with a single `marker` step.
///
/// Each instruction contributes `ceil(duration)` steps (at least one).
/// Generation stops at the first instruction that already carries the
/// marker, so the arrival step is emitted exactly once.
pub fn build_timeline(route: &NavigationResult, marker: &str) -> Vec<ScriptedStep> {
    let instructions = &route.instructions;
    let mut steps = Vec::new();

    for (i, instruction) in instructions.iter().enumerate() {
        if is_destination_reached(&instruction.text, marker) {
            break;
        }

        let rest = &instructions[i + 1..];
        let time_after: f64 = rest.iter().map(Instruction::duration_secs).sum();
        let dist_after: f64 = rest.iter().map(|r| non_negative(r.segment_distance_m)).sum();

        let duration = instruction.duration_secs();
        let distance = non_negative(instruction.segment_distance_m);
        let count = (duration.ceil() as usize).max(1);

        for k in 0..count {
            let to_maneuver_secs = (duration - k as f64).max(0.0);
            let to_maneuver_m = distance * (1.0 - k as f64 / count as f64);
            let command = NavigationCommand::new(
                instruction.text.clone(),
                to_maneuver_m,
                to_maneuver_secs + time_after,
            )
            .with_time_to_maneuver(to_maneuver_secs);

            steps.push(ScriptedStep {
                command,
                distance_to_target_m: to_maneuver_m + dist_after,
            });
        }
    }

    steps.push(ScriptedStep {
        command:              NavigationCommand::new(marker, 0.0, 0.0),
        distance_to_target_m: 0.0,
    });
    steps
}

#[inline]
fn non_negative(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}
