//! `TraceRecorder` — writes every published snapshot as a CSV row.
//!
//! Columns:
//!
//! | Column               | Source                                  |
//! |----------------------|-----------------------------------------|
//! | `seq`                | running snapshot count, from 0          |
//! | `state`              | `SessionState::as_str`                  |
//! | `generation`         | `R{run}.{revision}`                     |
//! | `instruction`        | current instruction text                |
//! | `icon`               | `ManeuverIcon::as_str`                  |
//! | `maneuver_distance`  | distance-to-maneuver text               |
//! | `remaining_distance` | remaining-distance text                 |
//! | `eta`                | countdown text                          |
//!
//! Unset fields are written as empty cells.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use gd_core::RouteGeneration;
use gd_session::{GuidanceObserver, GuidanceSnapshot, SessionState};
use serde::Serialize;

use crate::{SimError, SimResult};

#[derive(Serialize)]
struct TraceRow<'a> {
    seq:                usize,
    state:              &'static str,
    generation:         String,
    instruction:        Option<&'a str>,
    icon:               Option<&'static str>,
    maneuver_distance:  Option<&'a str>,
    remaining_distance: Option<&'a str>,
    eta:                Option<&'a str>,
}

/// A [`GuidanceObserver`] that records a CSV trace.
///
/// Observer callbacks cannot fail, so the first write error is kept and
/// reported by [`take_error`](Self::take_error) or [`finish`](Self::finish).
pub struct TraceRecorder<W: Write> {
    writer:      csv::Writer<W>,
    rows:        usize,
    transitions: Vec<(SessionState, SessionState)>,
    unmatched:   Vec<String>,
    last_error:  Option<SimError>,
}

impl TraceRecorder<File> {
    /// Create (or truncate) a trace file at `path`.
    pub fn create(path: &Path) -> SimResult<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> TraceRecorder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer:      csv::Writer::from_writer(writer),
            rows:        0,
            transitions: Vec::new(),
            unmatched:   Vec::new(),
            last_error:  None,
        }
    }

    /// Snapshot rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Every state change seen, in order.
    pub fn transitions(&self) -> &[(SessionState, SessionState)] {
        &self.transitions
    }

    /// Command descriptions that matched no instruction.
    pub fn unmatched(&self) -> &[String] {
        &self.unmatched
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<SimError> {
        self.last_error.take()
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> SimResult<W> {
        if let Some(e) = self.last_error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        self.writer.into_inner().map_err(|e| SimError::Io(e.into_error()))
    }
}

impl<W: Write> GuidanceObserver for TraceRecorder<W> {
    fn on_transition(&mut self, from: SessionState, to: SessionState, _generation: RouteGeneration) {
        self.transitions.push((from, to));
    }

    fn on_snapshot(&mut self, snapshot: &GuidanceSnapshot) {
        let row = TraceRow {
            seq:                self.rows,
            state:              snapshot.state.as_str(),
            generation:         snapshot.generation.to_string(),
            instruction:        snapshot.current_instruction_text.as_deref(),
            icon:               snapshot.current_icon.map(|i| i.as_str()),
            maneuver_distance:  snapshot.maneuver_distance_text.as_deref(),
            remaining_distance: snapshot.remaining_distance_text.as_deref(),
            eta:                snapshot.eta_text.as_deref(),
        };
        match self.writer.serialize(row) {
            Ok(()) => self.rows += 1,
            Err(e) => {
                // Keep only the first error.
                if self.last_error.is_none() {
                    self.last_error = Some(e.into());
                }
            }
        }
    }

    fn on_unmatched_command(&mut self, description: &str) {
        self.unmatched.push(description.to_string());
    }
}
