//! CSV route loader.
//!
//! # CSV format
//!
//! One row per instruction, in route order:
//!
//! ```csv
//! text,duration_secs,distance_m
//! Head north,30,400
//! TURN_RIGHT,120,1800
//! REACHED_YOUR_DESTINATION,0,0
//! ```
//!
//! The resulting [`NavigationResult`] totals are the column sums; it carries
//! no polyline.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::instruction::{Instruction, NavigationResult};
use crate::{RouteError, RouteResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct InstructionRecord {
    text:          String,
    duration_secs: f64,
    distance_m:    f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a route from a CSV file.
pub fn load_instructions_csv(path: &Path) -> RouteResult<NavigationResult> {
    let file = std::fs::File::open(path).map_err(RouteError::Io)?;
    let route = load_instructions_reader(file)?;
    debug!(path = %path.display(), instructions = route.instructions.len(), "route loaded");
    Ok(route)
}

/// Like [`load_instructions_csv`] but accepts any `Read` source.
pub fn load_instructions_reader<R: Read>(reader: R) -> RouteResult<NavigationResult> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut instructions = Vec::new();

    for (row, result) in csv_reader.deserialize::<InstructionRecord>().enumerate() {
        let r = result?;
        if !r.duration_secs.is_finite() || r.duration_secs < 0.0 {
            return Err(RouteError::Parse(format!(
                "row {}: duration_secs must be a non-negative number, got {}",
                row + 1,
                r.duration_secs
            )));
        }
        if !r.distance_m.is_finite() || r.distance_m < 0.0 {
            return Err(RouteError::Parse(format!(
                "row {}: distance_m must be a non-negative number, got {}",
                row + 1,
                r.distance_m
            )));
        }
        instructions.push(Instruction::new(r.text, r.duration_secs, r.distance_m));
    }

    Ok(NavigationResult::new(instructions))
}
