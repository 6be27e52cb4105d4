//! The `GuidanceSession` state machine.

use std::time::Instant;

use tracing::{debug, info};

use gd_core::{GeoPoint, GuidanceConfig, RouteGeneration, format_maneuver_distance, format_remaining_distance};
use gd_eta::{CountdownClock, EtaEstimator, UpdateSignals};
use gd_route::{
    InstructionIndex, ManeuverIcon, NavigationResult, SearchWindows, classify, direction_text,
    is_destination_reached,
};

use crate::{
    EngineState, EventOutcome, GuidanceEvent, GuidanceObserver, GuidanceSnapshot, NavigationCommand,
    NoopObserver, SessionError, SessionResult, SessionState,
};

pub const NAVIGATION_STARTED_TEXT: &str = "Navigation started";
pub const RECALCULATING_TEXT: &str = "Recalculating route…";
pub const ROUTE_UPDATED_TEXT: &str = "Route updated";
pub const ARRIVED_TEXT: &str = "You have reached your destination";

// ── StartRequest ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StartRequest {
    pub from: GeoPoint,
    pub to:   GeoPoint,
}

impl StartRequest {
    pub fn new(from: GeoPoint, to: GeoPoint) -> Self {
        Self { from, to }
    }
}

// ── Published fields ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
struct Published {
    instruction_text:        Option<String>,
    icon:                    Option<ManeuverIcon>,
    maneuver_distance_text:  Option<String>,
    remaining_distance_text: Option<String>,
}

// ── GuidanceSession ───────────────────────────────────────────────────────────

/// One guidance session: lifecycle, route position, ETA and published state.
///
/// The session is a plain owned value.  It never reads a clock: every
/// time-dependent operation takes `now`, and the owner decides when to call
/// [`tick`](Self::tick).  In production that owner is the single consumer
/// task in `gd-runtime`.
///
/// Every mutating call that changes a published field ends by handing a fresh
/// [`GuidanceSnapshot`] to the observer.
pub struct GuidanceSession<O: GuidanceObserver = NoopObserver> {
    config:           GuidanceConfig,
    state:            SessionState,
    generation:       RouteGeneration,
    index:            InstructionIndex,
    estimator:        EtaEstimator,
    clock:            CountdownClock,
    published:        Published,
    arrival_deadline: Option<Instant>,
    observer:         O,
}

impl GuidanceSession<NoopObserver> {
    pub fn new(config: GuidanceConfig) -> Self {
        Self::with_observer(config, NoopObserver)
    }
}

impl<O: GuidanceObserver> GuidanceSession<O> {
    pub fn with_observer(config: GuidanceConfig, observer: O) -> Self {
        let windows = SearchWindows {
            forward:  config.forward_window,
            extended: config.extended_window,
            backward: config.backward_window,
        };
        Self {
            config,
            state:            SessionState::Idle,
            generation:       RouteGeneration::INITIAL,
            index:            InstructionIndex::with_windows(windows),
            estimator:        EtaEstimator::new(),
            clock:            CountdownClock::new(),
            published:        Published::default(),
            arrival_deadline: None,
            observer,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    pub fn generation(&self) -> RouteGeneration {
        self.generation
    }

    pub fn config(&self) -> &GuidanceConfig {
        &self.config
    }

    pub fn index(&self) -> &InstructionIndex {
        &self.index
    }

    pub fn estimator(&self) -> &EtaEstimator {
        &self.estimator
    }

    pub fn clock(&self) -> &CountdownClock {
        &self.clock
    }

    /// When the arrival confirmation expires, while `Arrived`.
    pub fn arrival_deadline(&self) -> Option<Instant> {
        self.arrival_deadline
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Consume the session, returning its observer.
    pub fn into_observer(self) -> O {
        self.observer
    }

    pub fn snapshot(&self) -> GuidanceSnapshot {
        GuidanceSnapshot {
            state:                    self.state,
            generation:               self.generation,
            is_guiding:               self.state.is_guiding(),
            current_instruction_text: self.published.instruction_text.clone(),
            current_icon:             self.published.icon,
            maneuver_distance_text:   self.published.maneuver_distance_text.clone(),
            remaining_distance_text:  self.published.remaining_distance_text.clone(),
            eta_text:                 self.clock.text().map(str::to_owned),
        }
    }

    // ── Caller operations ─────────────────────────────────────────────────

    /// Begin a new session and return its generation.
    ///
    /// The request is validated first; a rejected request leaves the current
    /// session untouched.  An accepted request implicitly stops any active
    /// session before entering `Calculating`.
    pub fn start(&mut self, request: StartRequest) -> SessionResult<RouteGeneration> {
        for p in [request.from, request.to] {
            if !p.is_valid() {
                return Err(SessionError::InvalidPoint(p));
            }
        }
        let distance_m = request.from.distance_m(request.to);
        let min_m = self.config.min_route_distance_m;
        if request.from.is_within(request.to, min_m) {
            debug!(distance_m, min_m, "start rejected: endpoints too close");
            return Err(SessionError::TooClose { distance_m, min_m });
        }

        if self.state.is_active() {
            self.stop();
        }

        self.generation = self.generation.next_run();
        info!(generation = %self.generation, from = %request.from, to = %request.to, distance_m, "navigation requested");
        self.transition(SessionState::Calculating);
        Ok(self.generation)
    }

    /// Stop the session from any state.  Returns `false` if there was
    /// nothing to stop.
    ///
    /// Bumps the run, so every in-flight result and event of the stopped
    /// session is discarded on arrival.
    pub fn stop(&mut self) -> bool {
        if !self.state.is_active() {
            return false;
        }
        self.generation = self.generation.next_run();
        self.index.clear();
        self.estimator.clear();
        self.clock.stop();
        self.published = Published::default();
        self.arrival_deadline = None;
        self.transition(SessionState::Stopped);
        self.publish();
        true
    }

    // ── Engine inputs ─────────────────────────────────────────────────────

    /// Apply any engine-originated event.
    pub fn handle_event(&mut self, event: GuidanceEvent, now: Instant) -> EventOutcome {
        match event {
            GuidanceEvent::RouteReady { generation, results } => self.route_ready(generation, results, now),
            GuidanceEvent::NavigationStarted { generation } => self.navigation_started(generation),
            GuidanceEvent::Command { generation, command, engine } => self.on_command(generation, &command, engine, now),
            GuidanceEvent::WillRecalculate { generation } => self.recalculate_requested(generation),
            GuidanceEvent::Recalculated { generation, result, engine } => {
                self.route_recalculated(generation, result, engine, now)
            }
            GuidanceEvent::NavigationStopped { generation } => self.navigation_stopped(generation),
        }
    }

    /// The initial route computation finished.
    ///
    /// The result is tagged with the first revision of its run and stays
    /// valid across recalculations announced while it was being computed.
    pub fn route_ready(
        &mut self,
        generation: RouteGeneration,
        results: Vec<NavigationResult>,
        now: Instant,
    ) -> EventOutcome {
        let in_run = generation.same_run(self.generation) && generation <= self.generation;
        if !self.admits(in_run, generation, &[SessionState::Calculating], "route_ready") {
            return EventOutcome::Discarded;
        }
        let Some(route) = results.into_iter().next() else {
            info!(generation = %self.generation, "no route; back to idle");
            self.transition(SessionState::Idle);
            self.publish();
            return EventOutcome::Failed(SessionError::NoRoute);
        };

        self.load_route(route, now);
        self.transition(SessionState::Guiding);
        self.publish();
        EventOutcome::Applied
    }

    pub fn navigation_started(&mut self, generation: RouteGeneration) -> EventOutcome {
        if !self.accepts(generation, &[SessionState::Calculating, SessionState::Guiding], "navigation_started") {
            return EventOutcome::Discarded;
        }
        self.published.instruction_text = Some(NAVIGATION_STARTED_TEXT.to_string());
        self.published.maneuver_distance_text = None;
        self.publish();
        EventOutcome::Applied
    }

    /// Apply a live command.
    ///
    /// A command carrying the reached-destination marker moves the session to
    /// `Arrived` instead of normal processing.
    pub fn on_command(
        &mut self,
        generation: RouteGeneration,
        command: &NavigationCommand,
        engine: EngineState,
        now: Instant,
    ) -> EventOutcome {
        if !self.accepts(generation, &[SessionState::Guiding], "command") {
            return EventOutcome::Discarded;
        }

        if is_destination_reached(&command.description, &self.config.reached_marker) {
            self.arrive(now);
            return EventOutcome::Applied;
        }

        let located = self.index.locate(&command.description);
        if located.is_none() && !self.index.is_empty() {
            debug!(
                description = %command.description,
                cursor = self.index.cursor(),
                "command not found in instruction windows"
            );
            self.observer.on_unmatched_command(&command.description);
        }

        let to_next = located.map(|_| {
            let t = command.time_to_maneuver_secs.unwrap_or(command.remaining_time_secs);
            if t.is_finite() { t.max(0.0) } else { 0.0 }
        });
        let signals = UpdateSignals {
            to_next_maneuver_secs: to_next,
            rest_of_route_secs:    to_next.map(|_| self.index.remaining_duration_from_cursor(self.index.cursor())),
            command_reported_secs: Some(command.remaining_time_secs),
            engine_reported_secs:  engine.remaining_time_secs,
        };
        self.refresh_eta(&signals, now);

        self.published.instruction_text = Some(direction_text(&command.description, self.config.max_instruction_chars));
        self.published.icon = Some(classify(&command.description));
        self.published.maneuver_distance_text = Some(format_maneuver_distance(command.distance_to_maneuver_m));
        if let Some(d) = engine.distance_to_target_m {
            self.published.remaining_distance_text = Some(format_remaining_distance(d));
        }
        self.publish();
        EventOutcome::Applied
    }

    /// The engine is about to replace the route.
    ///
    /// `generation` is the revision the engine moves to.  Any newer revision
    /// of the current run is adopted, so back-to-back announcements keep the
    /// session in step with the engine and later events for the abandoned
    /// route no longer match.  Before the first route has arrived the
    /// revision is adopted without leaving `Calculating`.
    pub fn recalculate_requested(&mut self, generation: RouteGeneration) -> EventOutcome {
        let newer = generation.same_run(self.generation) && generation > self.generation;
        let states = [SessionState::Calculating, SessionState::Guiding, SessionState::Recalculating];
        if !self.admits(newer, generation, &states, "will_recalculate") {
            return EventOutcome::Discarded;
        }
        self.generation = generation;
        if self.state == SessionState::Calculating {
            debug!(generation = %generation, "recalculation announced before the first route");
            return EventOutcome::Applied;
        }
        self.published.instruction_text = Some(RECALCULATING_TEXT.to_string());
        self.published.maneuver_distance_text = None;
        self.transition(SessionState::Recalculating);
        self.publish();
        EventOutcome::Applied
    }

    /// The engine finished recalculating.  `None` keeps the current
    /// instructions; the ETA bound is reset either way.
    ///
    /// Also accepted in `Guiding` and `Calculating` when the announcement
    /// came before the first route.  In `Calculating` only a new route is
    /// applied; `None` leaves the session waiting for the initial result.
    pub fn route_recalculated(
        &mut self,
        generation: RouteGeneration,
        result: Option<NavigationResult>,
        engine: EngineState,
        now: Instant,
    ) -> EventOutcome {
        let states = [SessionState::Calculating, SessionState::Guiding, SessionState::Recalculating];
        if !self.accepts(generation, &states, "recalculated") {
            return EventOutcome::Discarded;
        }
        if self.state == SessionState::Calculating && result.is_none() {
            debug!(generation = %generation, "route kept before the first route; still calculating");
            return EventOutcome::Discarded;
        }

        match result {
            Some(route) => self.load_route(route, now),
            None => self.estimator.reset(),
        }

        // No command yet: the active segment counts in full.
        let to_next = self.index.current().map(|i| i.duration_secs());
        let signals = UpdateSignals {
            to_next_maneuver_secs: to_next,
            rest_of_route_secs:    to_next.map(|_| self.index.remaining_duration_from_cursor(self.index.cursor())),
            command_reported_secs: None,
            engine_reported_secs:  engine.remaining_time_secs,
        };
        self.refresh_eta(&signals, now);

        if let Some(d) = engine.distance_to_target_m {
            self.published.remaining_distance_text = Some(format_remaining_distance(d));
        }
        self.published.instruction_text = Some(ROUTE_UPDATED_TEXT.to_string());
        self.published.maneuver_distance_text = None;
        self.transition(SessionState::Guiding);
        self.publish();
        EventOutcome::Applied
    }

    /// The engine stopped on its own.  Treated as [`stop`](Self::stop) when it
    /// belongs to the current session.
    pub fn navigation_stopped(&mut self, generation: RouteGeneration) -> EventOutcome {
        let active = [
            SessionState::Calculating,
            SessionState::Guiding,
            SessionState::Recalculating,
            SessionState::Arrived,
        ];
        if !self.accepts(generation, &active, "navigation_stopped") {
            return EventOutcome::Discarded;
        }
        self.stop();
        EventOutcome::Applied
    }

    // ── Time ──────────────────────────────────────────────────────────────

    /// Leave `Arrived` once the grace delay has passed.  Returns `true` if the
    /// session stopped.
    pub fn complete_arrival(&mut self, now: Instant) -> bool {
        match (self.state, self.arrival_deadline) {
            (SessionState::Arrived, Some(deadline)) if now >= deadline => {
                info!(generation = %self.generation, "arrival confirmed; stopping");
                self.stop()
            }
            _ => false,
        }
    }

    /// Advance the countdown.  Returns `true` if the snapshot changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.complete_arrival(now) {
            return true;
        }
        let before = self.clock.text().map(str::to_owned);
        let after = self.clock.tick(now);
        if after == before.as_deref() {
            return false;
        }
        self.publish();
        true
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn accepts(&self, generation: RouteGeneration, states: &[SessionState], kind: &'static str) -> bool {
        self.admits(generation == self.generation, generation, states, kind)
    }

    /// `current` says whether `generation` is acceptable for this event kind.
    fn admits(
        &self,
        current: bool,
        generation: RouteGeneration,
        states: &[SessionState],
        kind: &'static str,
    ) -> bool {
        if !current {
            debug!(event = kind, generation = %generation, current = %self.generation, "discarding stale event");
            return false;
        }
        if !states.contains(&self.state) {
            debug!(event = kind, state = %self.state, "discarding event not valid in state");
            return false;
        }
        true
    }

    fn load_route(&mut self, route: NavigationResult, now: Instant) {
        let total = route.effective_total_secs();
        info!(
            generation = %self.generation,
            instructions = route.instructions.len(),
            total_secs = total,
            distance_m = route.total_distance_m,
            "route loaded"
        );
        self.published.remaining_distance_text = Some(format_remaining_distance(route.total_distance_m));
        self.index.load(route.instructions);
        self.estimator.reset();
        self.clock.retarget(total, now);
    }

    fn refresh_eta(&mut self, signals: &UpdateSignals, now: Instant) {
        let monotonic = self.state == SessionState::Guiding;
        if let Some(secs) = self.estimator.update(signals, self.index.total_duration(), monotonic) {
            self.clock.retarget(secs, now);
        }
    }

    fn arrive(&mut self, now: Instant) {
        self.published.instruction_text = Some(ARRIVED_TEXT.to_string());
        self.published.icon = Some(ManeuverIcon::DestinationReached);
        self.published.maneuver_distance_text = None;
        self.arrival_deadline = Some(now + self.config.arrival_grace());
        self.transition(SessionState::Arrived);
        self.publish();
    }

    fn transition(&mut self, to: SessionState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        info!(from = %from, to = %to, generation = %self.generation, "session transition");
        self.observer.on_transition(from, to, self.generation);
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot();
        self.observer.on_snapshot(&snapshot);
    }
}
