//! Display strings published to the rendering layer.
//!
//! None of these functions ever show seconds: the countdown is rounded up to
//! whole minutes so the traveller is never told they will arrive earlier than
//! the estimate.

/// Text shown when the countdown has (almost) run out or a maneuver is due.
pub const NOW: &str = "Now";

/// Render a remaining duration as a countdown.
///
/// | Remaining          | Output          |
/// |--------------------|-----------------|
/// | `<= 1 s`           | `Now`           |
/// | `< 60 min`         | `N min` (ceil)  |
/// | otherwise          | `H h M min`     |
///
/// Non-finite or negative input is treated as zero.
pub fn format_countdown(remaining_secs: f64) -> String {
    let remaining = if remaining_secs.is_finite() { remaining_secs.max(0.0) } else { 0.0 };
    if remaining <= 1.0 {
        return NOW.to_string();
    }

    let minutes = ((remaining / 60.0).ceil() as u64).max(1);
    if minutes < 60 {
        format!("{minutes} min")
    } else {
        format!("{} h {} min", minutes / 60, minutes % 60)
    }
}

/// Distance to the next maneuver.
///
/// Below one kilometre the value is floored to a 10 m step (never below
/// 10 m) so the label does not flicker on every GPS fix.
pub fn format_maneuver_distance(meters: f64) -> String {
    if !meters.is_finite() || meters <= 0.0 {
        return NOW.to_string();
    }
    if meters >= 1_000.0 {
        return format!("{:.1} km", meters / 1_000.0);
    }
    let rounded = ((meters / 10.0) as u32 * 10).max(10);
    format!("{rounded} m")
}

/// Remaining distance to the destination.
pub fn format_remaining_distance(meters: f64) -> String {
    let meters = if meters.is_finite() { meters.max(0.0) } else { 0.0 };
    if meters < 1_000.0 {
        format!("{meters:.0} m")
    } else {
        format!("{:.1} km", meters / 1_000.0)
    }
}
