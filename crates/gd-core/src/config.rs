//! Guidance configuration.
//!
//! Every field has a default, so a JSON file only needs to name the values
//! it overrides:
//!
//! ```json
//! { "arrival_grace_ms": 3000, "extended_window": 8 }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Tunables for a guidance session and the service that drives it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    /// Countdown re-render period.  Default: 1000 ms.
    pub tick_interval_ms: u64,

    /// How long the arrival confirmation stays up before the session stops.
    /// Default: 2000 ms.
    pub arrival_grace_ms: u64,

    /// Start requests whose endpoints are closer than this are rejected.
    /// Default: 5 m.
    pub min_route_distance_m: f64,

    /// Instructions searched starting at the cursor (current + next two).
    pub forward_window: usize,

    /// Further instructions searched after the forward window, to tolerate
    /// skipped or merged maneuvers.
    pub extended_window: usize,

    /// Already-passed instructions searched before the cursor, to tolerate
    /// late events.
    pub backward_window: usize,

    /// Normalized substring that marks a reached-destination command.
    pub reached_marker: String,

    /// Fallback instruction text is truncated to this many characters.
    pub max_instruction_chars: usize,

    /// Capacity of the service's request channel.
    pub channel_capacity: usize,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms:      1_000,
            arrival_grace_ms:      2_000,
            min_route_distance_m:  5.0,
            forward_window:        3,
            extended_window:       6,
            backward_window:       2,
            reached_marker:        "REACHED_YOUR_DESTINATION".to_string(),
            max_instruction_chars: 120,
            channel_capacity:      64,
        }
    }
}

impl GuidanceConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let config: GuidanceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_path(path: &Path) -> CoreResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(CoreError::Config("tick_interval_ms must be > 0".into()));
        }
        if self.channel_capacity == 0 {
            return Err(CoreError::Config("channel_capacity must be > 0".into()));
        }
        if self.forward_window == 0 {
            return Err(CoreError::Config("forward_window must be > 0".into()));
        }
        if !self.min_route_distance_m.is_finite() || self.min_route_distance_m < 0.0 {
            return Err(CoreError::Config(format!(
                "min_route_distance_m must be a non-negative number, got {}",
                self.min_route_distance_m
            )));
        }
        if self.reached_marker.trim().is_empty() {
            return Err(CoreError::Config("reached_marker must not be empty".into()));
        }
        Ok(())
    }

    #[inline]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[inline]
    pub fn arrival_grace(&self) -> Duration {
        Duration::from_millis(self.arrival_grace_ms)
    }
}
