//! `ScriptedEngine` — a deterministic stand-in for a live navigation engine.
//!
//! `start_navigation` answers immediately with the configured route and
//! spawns a playback task that feeds the route's timeline through the
//! [`EngineSink`], one step per interval:
//!
//! ```text
//!  step ─▶ navigation_started
//!  step ─▶ command #1 ─ step ─▶ command #2 ─ … ─▶ marker
//!                      └─ (scripted) will_recalculate ─ step ─▶ recalculated
//! ```
//!
//! `stop_navigation` cancels the playback.  The remaining time and distance
//! reported to the service are those of the last emitted step.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use gd_core::GeoPoint;
use gd_route::NavigationResult;
use gd_runtime::{BoxFuture, EngineError, EngineSink, NavigationEngine};

use crate::noise::{NoiseConfig, perturb};
use crate::scenario::{ScriptedStep, build_timeline};

/// A recalculation the engine announces partway through playback.
#[derive(Clone, Debug)]
pub struct Recalculation {
    /// Announce after this many commands have been emitted.
    pub after_commands: usize,
    /// The replacement route.  `None` keeps the current one.
    pub route:          Option<NavigationResult>,
}

#[derive(Clone, Copy, Debug, Default)]
struct Progress {
    remaining_time_secs:  Option<f64>,
    distance_to_target_m: Option<f64>,
}

impl Progress {
    fn of_route(route: &NavigationResult) -> Self {
        Self {
            remaining_time_secs:  Some(route.effective_total_secs()),
            distance_to_target_m: Some(route.total_distance_m),
        }
    }

    fn of_step(step: &ScriptedStep) -> Self {
        Self {
            remaining_time_secs:  Some(step.remaining_time_secs()),
            distance_to_target_m: Some(step.distance_to_target_m),
        }
    }
}

// ── ScriptedEngine ────────────────────────────────────────────────────────────

pub struct ScriptedEngine {
    route:         NavigationResult,
    marker:        String,
    step:          Duration,
    noise:         NoiseConfig,
    recalculation: Option<Recalculation>,
    progress:      Arc<Mutex<Progress>>,
    playback:      Mutex<Option<CancellationToken>>,
    emitted:       Arc<AtomicUsize>,
}

impl ScriptedEngine {
    /// An engine that always computes `route` and ends playback with
    /// `marker`.  Steps default to one second, without noise.
    pub fn new(route: NavigationResult, marker: impl Into<String>) -> Self {
        Self {
            route,
            marker:        marker.into(),
            step:          Duration::from_secs(1),
            noise:         NoiseConfig::default(),
            recalculation: None,
            progress:      Arc::new(Mutex::new(Progress::default())),
            playback:      Mutex::new(None),
            emitted:       Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Interval between emitted events.
    pub fn step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    pub fn noise(mut self, noise: NoiseConfig) -> Self {
        self.noise = noise;
        self
    }

    pub fn recalculation(mut self, recalculation: Recalculation) -> Self {
        self.recalculation = Some(recalculation);
        self
    }

    /// Commands emitted so far, across all runs.
    pub fn emitted(&self) -> usize {
        self.emitted.load(Ordering::Relaxed)
    }

    /// `true` while a playback task is running.
    pub fn is_playing(&self) -> bool {
        self.playback
            .lock()
            .ok()
            .is_some_and(|slot| slot.as_ref().is_some_and(|t| !t.is_cancelled()))
    }

    fn set_progress(&self, progress: Progress) {
        if let Ok(mut p) = self.progress.lock() {
            *p = progress;
        }
    }
}

impl NavigationEngine for ScriptedEngine {
    fn start_navigation(
        &self,
        from: GeoPoint,
        to: GeoPoint,
        sink: EngineSink,
    ) -> BoxFuture<Result<Vec<NavigationResult>, EngineError>> {
        let route = self.route.clone();
        if route.instructions.is_empty() {
            return Box::pin(async { Ok(Vec::new()) });
        }

        let token = CancellationToken::new();
        if let Ok(mut slot) = self.playback.lock() {
            if let Some(previous) = slot.replace(token.clone()) {
                previous.cancel();
            }
        }
        self.set_progress(Progress::of_route(&route));

        let timeline = perturb(build_timeline(&route, &self.marker), &self.noise);
        debug!(
            %from,
            %to,
            generation = %sink.generation(),
            steps = timeline.len(),
            "scripted playback starting"
        );

        let playback = Playback {
            sink,
            queue:         timeline.into(),
            step:          self.step,
            marker:        self.marker.clone(),
            noise:         self.noise,
            recalculation: self.recalculation.clone(),
            progress:      Arc::clone(&self.progress),
            emitted:       Arc::clone(&self.emitted),
        };
        tokio::spawn(playback.run(token));

        Box::pin(async move { Ok(vec![route]) })
    }

    fn stop_navigation(&self) {
        if let Ok(slot) = self.playback.lock() {
            if let Some(token) = slot.as_ref() {
                token.cancel();
            }
        }
        self.set_progress(Progress::default());
    }

    fn remaining_time_secs(&self) -> Option<f64> {
        self.progress.lock().ok()?.remaining_time_secs
    }

    fn distance_to_target_m(&self) -> Option<f64> {
        self.progress.lock().ok()?.distance_to_target_m
    }
}

// ── Playback ──────────────────────────────────────────────────────────────────

struct Playback {
    sink:          EngineSink,
    queue:         VecDeque<ScriptedStep>,
    step:          Duration,
    marker:        String,
    noise:         NoiseConfig,
    recalculation: Option<Recalculation>,
    progress:      Arc<Mutex<Progress>>,
    emitted:       Arc<AtomicUsize>,
}

impl Playback {
    async fn run(mut self, token: CancellationToken) {
        match self.play(&token).await {
            Ok(sent) => debug!(sent, "scripted playback finished"),
            Err(e) => debug!(error = %e, "scripted playback ended early"),
        }
    }

    async fn play(&mut self, token: &CancellationToken) -> Result<usize, EngineError> {
        let mut sent = 0usize;

        if !pause(self.step, token).await {
            return Ok(sent);
        }
        self.sink.navigation_started().await?;

        while let Some(step) = self.queue.pop_front() {
            if !pause(self.step, token).await {
                return Ok(sent);
            }
            self.report(Progress::of_step(&step));
            self.sink.command(step.command).await?;
            sent += 1;
            self.emitted.fetch_add(1, Ordering::Relaxed);

            let due = self.recalculation.take_if(|r| r.after_commands == sent);
            if let Some(recalculation) = due {
                self.sink.will_recalculate().await?;
                if !pause(self.step, token).await {
                    return Ok(sent);
                }
                if let Some(route) = &recalculation.route {
                    self.queue = perturb(build_timeline(route, &self.marker), &self.noise).into();
                    self.report(Progress::of_route(route));
                }
                self.sink.recalculated(recalculation.route).await?;
            }
        }
        Ok(sent)
    }

    fn report(&self, progress: Progress) {
        if let Ok(mut p) = self.progress.lock() {
            *p = progress;
        }
    }
}

/// Sleep one step; `false` if cancelled first.
async fn pause(step: Duration, token: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(step) => true,
    }
}
