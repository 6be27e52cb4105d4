//! Maneuver classification: icon and English text for a live description.
//!
//! Engines embed upper-snake maneuver codes (`TURN_RIGHT_SHARP`,
//! `TAKE_THIRD_EXIT_ON_ROUNDABOUT`, …) in their descriptions.  Codes are
//! matched by substring on the uppercased description, most specific first,
//! so `TURN_RIGHT_SHARP` wins over `TURN_RIGHT`.

use std::fmt;

use serde::Serialize;

use crate::normalize::normalize_key;

/// Text shown when the engine has nothing to announce.
pub const CONTINUE_TEXT: &str = "Continue";

const NO_COMMAND: &str = "NO_COMMAND";

// ── ManeuverIcon ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManeuverIcon {
    TurnRight,
    TurnRightSharp,
    TurnFarRight,
    TurnSecondRight,
    TurnThirdRight,
    TurnRightAtEndOfRoad,
    TurnLeft,
    TurnLeftSharp,
    TurnFarLeft,
    TurnSecondLeft,
    TurnThirdLeft,
    TurnLeftAtEndOfRoad,
    RoundaboutExit1,
    RoundaboutExit2,
    RoundaboutExit3,
    RoundaboutExit4,
    RoundaboutExit5,
    RoundaboutExit6,
    KeepRight,
    KeepLeft,
    ContinueRight,
    ContinueLeft,
    ContinueMiddle,
    #[default]
    GoStraight,
    UTurn,
    EnterTunnel,
    InTunnel,
    AfterTunnel,
    Overpass,
    Underpass,
    PedestrianRoad,
    ServiceRoad,
    SpeedLimitExceeded,
    ApproachingDestination,
    DestinationReached,
}

impl ManeuverIcon {
    /// Stable snake-case identifier, suitable for asset lookup.
    pub fn as_str(self) -> &'static str {
        use ManeuverIcon::*;
        match self {
            TurnRight              => "turn_right",
            TurnRightSharp         => "turn_right_sharp",
            TurnFarRight           => "turn_far_right",
            TurnSecondRight        => "turn_second_right",
            TurnThirdRight         => "turn_third_right",
            TurnRightAtEndOfRoad   => "turn_right_at_end_of_road",
            TurnLeft               => "turn_left",
            TurnLeftSharp          => "turn_left_sharp",
            TurnFarLeft            => "turn_far_left",
            TurnSecondLeft         => "turn_second_left",
            TurnThirdLeft          => "turn_third_left",
            TurnLeftAtEndOfRoad    => "turn_left_at_end_of_road",
            RoundaboutExit1        => "roundabout_exit_1",
            RoundaboutExit2        => "roundabout_exit_2",
            RoundaboutExit3        => "roundabout_exit_3",
            RoundaboutExit4        => "roundabout_exit_4",
            RoundaboutExit5        => "roundabout_exit_5",
            RoundaboutExit6        => "roundabout_exit_6",
            KeepRight              => "keep_right",
            KeepLeft               => "keep_left",
            ContinueRight          => "continue_right",
            ContinueLeft           => "continue_left",
            ContinueMiddle         => "continue_middle",
            GoStraight             => "go_straight",
            UTurn                  => "u_turn",
            EnterTunnel            => "enter_tunnel",
            InTunnel               => "in_tunnel",
            AfterTunnel            => "after_tunnel",
            Overpass               => "overpass",
            Underpass              => "underpass",
            PedestrianRoad         => "pedestrian_road",
            ServiceRoad            => "service_road",
            SpeedLimitExceeded     => "speed_limit_exceeded",
            ApproachingDestination => "approaching_destination",
            DestinationReached     => "destination_reached",
        }
    }
}

impl fmt::Display for ManeuverIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Code table ────────────────────────────────────────────────────────────────

struct Maneuver {
    code: &'static str,
    icon: ManeuverIcon,
    text: &'static str,
}

const fn m(code: &'static str, icon: ManeuverIcon, text: &'static str) -> Maneuver {
    Maneuver { code, icon, text }
}

// Order matters: a code must precede every code it is a substring of.
const MANEUVERS: &[Maneuver] = {
    use ManeuverIcon::*;
    &[
        m("TAKE_FIRST_EXIT_ON_ROUNDABOUT",  RoundaboutExit1, "Take the first exit at the roundabout"),
        m("TAKE_SECOND_EXIT_ON_ROUNDABOUT", RoundaboutExit2, "Take the second exit at the roundabout"),
        m("TAKE_THIRD_EXIT_ON_ROUNDABOUT",  RoundaboutExit3, "Take the third exit at the roundabout"),
        m("TAKE_FOURTH_EXIT_ON_ROUNDABOUT", RoundaboutExit4, "Take the fourth exit at the roundabout"),
        m("TAKE_FIFTH_EXIT_ON_ROUNDABOUT",  RoundaboutExit5, "Take the fifth exit at the roundabout"),
        m("TAKE_SIXTH_EXIT_ON_ROUNDABOUT",  RoundaboutExit6, "Take the sixth exit at the roundabout"),

        m("TURN_RIGHT_SHARP",              TurnRightSharp,       "Turn sharply right"),
        m("TURN_FAR_RIGHT",                TurnFarRight,         "Turn far right"),
        m("TURN_SECOND_RIGHT",             TurnSecondRight,      "Take the second right"),
        m("TURN_THIRD_RIGHT",              TurnThirdRight,       "Take the third right"),
        m("TURN_RIGHT_AT_THE_END_OF_ROAD", TurnRightAtEndOfRoad, "Turn right at the end of the road"),
        m("TURN_RIGHT_ONTO_ACCOMODATION",  TurnRight,            "Turn right towards the accommodation"),
        m("TURN_RIGHT",                    TurnRight,            "Turn right"),

        m("TURN_LEFT_SHARP",               TurnLeftSharp,        "Turn sharply left"),
        m("TURN_FAR_LEFT",                 TurnFarLeft,          "Turn far left"),
        m("TURN_SECOND_LEFT",              TurnSecondLeft,       "Take the second left"),
        m("TURN_THIRD_LEFT",               TurnThirdLeft,        "Take the third left"),
        m("TURN_LEFT_AT_THE_END_OF_ROAD",  TurnLeftAtEndOfRoad,  "Turn left at the end of the road"),
        m("TURN_LEFT_ONTO_ACCOMODATION",   TurnLeft,             "Turn left towards the accommodation"),
        m("TURN_LEFT",                     TurnLeft,             "Turn left"),

        m("STAY_RIGHT",      KeepRight,      "Keep right"),
        m("STAY_LEFT",       KeepLeft,       "Keep left"),
        m("CONTINUE_RIGHT",  ContinueRight,  "Continue right"),
        m("CONTINUE_LEFT",   ContinueLeft,   "Continue left"),
        m("CONTINUE_MIDDLE", ContinueMiddle, "Continue straight (middle)"),

        m("UTURN", UTurn, "Make a U-turn"),

        m("ABOUT_THE_ENTER_TUNNEL", EnterTunnel, "You are about to enter a tunnel"),
        m("IN_TUNNEL",              InTunnel,    "You are inside a tunnel"),
        m("AFTER_TUNNEL",           AfterTunnel, "Continue after the tunnel"),
        m("UNDERPASS",              Underpass,   "Go through the underpass"),
        m("OVERPASS",               Overpass,    "Go over the overpass"),

        m("PEDESTRIAN_ROAD",             PedestrianRoad,         "Watch out for pedestrian road"),
        m("SERVICE_ROAD",                ServiceRoad,            "Enter the service road"),
        m("EXCEEDED_THE_SPEED_LIMIT",    SpeedLimitExceeded,     "You exceeded the speed limit"),
        m("WILL_REACH_YOUR_DESTINATION", ApproachingDestination, "You are about to reach your destination"),
        m("REACHED_YOUR_DESTINATION",    DestinationReached,     "You have reached your destination"),
        m("GO_STRAIGHT",                 GoStraight,             "Go straight"),
    ]
};

fn lookup(description: &str) -> Option<&'static Maneuver> {
    let upper = description.to_uppercase();
    MANEUVERS.iter().find(|m| upper.contains(m.code))
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Icon for a live description.  Unknown maneuvers show [`ManeuverIcon::GoStraight`].
pub fn classify(description: &str) -> ManeuverIcon {
    lookup(description).map(|m| m.icon).unwrap_or_default()
}

/// Display text for a live description.
///
/// Known codes map to a fixed English phrase.  `NO_COMMAND` and blank input
/// become [`CONTINUE_TEXT`].  Anything else is shown as-is with whitespace
/// collapsed, cut at `max_chars` characters with a trailing `…`.
pub fn direction_text(description: &str, max_chars: usize) -> String {
    if let Some(m) = lookup(description) {
        return m.text.to_string();
    }

    let collapsed = description.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() || collapsed.to_uppercase().contains(NO_COMMAND) {
        return CONTINUE_TEXT.to_string();
    }

    match collapsed.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &collapsed[..cut]),
        None => collapsed,
    }
}

/// `true` if the normalized description contains the normalized `marker`.
///
/// Comparison is on [`normalize_key`] output, so both
/// `"REACHED_YOUR_DESTINATION"` and `"You have reached your destination"`
/// match the default marker.
pub fn is_destination_reached(description: &str, marker: &str) -> bool {
    let marker = normalize_key(marker);
    !marker.is_empty() && normalize_key(description).contains(&marker)
}
