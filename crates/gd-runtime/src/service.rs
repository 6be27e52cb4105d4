//! `GuidanceService` — the single task that owns the session.
//!
//! The run loop uses `tokio::select!` with biased polling:
//! 1. Shutdown (highest priority)
//! 2. Requests: caller commands, engine events, route results, in channel
//!    order
//! 3. Arrival grace deadline
//! 4. Countdown tick
//!
//! After every branch the session snapshot is pushed to the watch channel if
//! it changed.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use gd_core::{GuidanceConfig, RouteGeneration};
use gd_session::{
    EngineState, EventOutcome, GuidanceEvent, GuidanceObserver, GuidanceSession, GuidanceSnapshot,
    NoopObserver, SessionState, StartRequest,
};

use crate::{EngineError, EngineSink, GuidanceHandle, NavigationEngine, ServiceError, ServiceResult};

type StartReply = oneshot::Sender<ServiceResult<RouteGeneration>>;

// ── Request ───────────────────────────────────────────────────────────────────

/// Everything that can reach the service task through its channel.
#[derive(Debug)]
pub(crate) enum Request {
    Start {
        request: StartRequest,
        reply:   StartReply,
    },
    Stop {
        reply: oneshot::Sender<bool>,
    },
    Event(GuidanceEvent),
    RouteFailed {
        generation: RouteGeneration,
        error:      EngineError,
    },
}

// ── GuidanceService ───────────────────────────────────────────────────────────

pub struct GuidanceService<E: NavigationEngine, O: GuidanceObserver + Send + 'static = NoopObserver> {
    session:       GuidanceSession<O>,
    engine:        Arc<E>,
    requests:      mpsc::Receiver<Request>,
    /// Weak, so the loop ends once every handle and sink is dropped.
    requests_tx:   mpsc::WeakSender<Request>,
    snapshots:     watch::Sender<GuidanceSnapshot>,
    shutdown:      CancellationToken,
    /// Reply for the start request whose route is still being computed.
    pending_start: Option<(RouteGeneration, StartReply)>,
}

impl<E: NavigationEngine> GuidanceService<E, NoopObserver> {
    pub fn new(config: GuidanceConfig, engine: Arc<E>) -> ServiceResult<(Self, GuidanceHandle)> {
        Self::with_observer(config, engine, NoopObserver)
    }
}

impl<E: NavigationEngine, O: GuidanceObserver + Send + 'static> GuidanceService<E, O> {
    /// Build the service and its first handle.  Nothing runs until
    /// [`run`](Self::run) is polled.
    pub fn with_observer(
        config: GuidanceConfig,
        engine: Arc<E>,
        observer: O,
    ) -> ServiceResult<(Self, GuidanceHandle)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.channel_capacity);
        let session = GuidanceSession::with_observer(config, observer);
        let (snapshots, snapshot_rx) = watch::channel(session.snapshot());
        let shutdown = CancellationToken::new();

        let service = Self {
            session,
            engine,
            requests:      rx,
            requests_tx:   tx.downgrade(),
            snapshots,
            shutdown:      shutdown.clone(),
            pending_start: None,
        };
        let handle = GuidanceHandle::new(tx, snapshot_rx, shutdown);
        Ok((service, handle))
    }

    /// Build the service and spawn its loop on the current runtime.
    pub fn spawn(
        config: GuidanceConfig,
        engine: Arc<E>,
        observer: O,
    ) -> ServiceResult<(GuidanceHandle, JoinHandle<O>)> {
        let (service, handle) = Self::with_observer(config, engine, observer)?;
        let task = tokio::spawn(service.run());
        Ok((handle, task))
    }

    /// Run until shutdown is signalled or every handle and sink is dropped,
    /// then hand back the observer.
    pub async fn run(mut self) -> O {
        let tick = self.session.config().tick_interval();
        info!(tick_ms = tick.as_millis() as u64, "guidance service started");

        let mut interval = tokio::time::interval(tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // Skip the first immediate tick
        interval.tick().await;

        loop {
            let arrival = self.session.arrival_deadline().map(Instant::from_std);

            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    info!("guidance service shutting down");
                    break;
                }

                request = self.requests.recv() => {
                    let Some(request) = request else {
                        info!("all guidance handles dropped");
                        break;
                    };
                    self.handle_request(request);
                }

                _ = sleep_until_opt(arrival) => {
                    if self.session.complete_arrival(now()) {
                        self.engine.stop_navigation();
                    }
                }

                _ = interval.tick() => {
                    let before = self.session.state();
                    self.session.tick(now());
                    if before == SessionState::Arrived && self.session.state() == SessionState::Stopped {
                        self.engine.stop_navigation();
                    }
                }
            }

            self.settle_pending();
            self.publish();
        }

        if self.session.stop() {
            self.engine.stop_navigation();
        }
        self.settle_pending();
        self.publish();
        info!("guidance service stopped");
        self.session.into_observer()
    }

    // ── Request handling ──────────────────────────────────────────────────

    fn handle_request(&mut self, request: Request) {
        match request {
            Request::Start { request, reply } => self.start(request, reply),
            Request::Stop { reply } => {
                let stopped = self.session.stop();
                if stopped {
                    self.engine.stop_navigation();
                }
                let _ = reply.send(stopped);
            }
            Request::Event(event) => self.apply_event(event),
            Request::RouteFailed { generation, error } => self.route_failed(generation, error),
        }
    }

    fn start(&mut self, request: StartRequest, reply: StartReply) {
        let was_active = self.session.state().is_active();

        let generation = match self.session.start(request) {
            Ok(generation) => generation,
            Err(e) => {
                let _ = reply.send(Err(e.into()));
                return;
            }
        };
        if was_active {
            self.engine.stop_navigation();
        }
        // Any older pending start was superseded.
        self.settle_pending();

        let Some(tx) = self.requests_tx.upgrade() else {
            self.session.stop();
            let _ = reply.send(Err(ServiceError::Closed));
            return;
        };

        let sink = EngineSink::new(tx.clone(), generation);
        let route = self.engine.start_navigation(request.from, request.to, sink);
        tokio::spawn(async move {
            let message = match route.await {
                Ok(results) => Request::Event(GuidanceEvent::RouteReady { generation, results }),
                Err(error) => Request::RouteFailed { generation, error },
            };
            // The service may be gone; the result is then moot.
            let _ = tx.send(message).await;
        });

        self.pending_start = Some((generation, reply));
    }

    fn apply_event(&mut self, mut event: GuidanceEvent) {
        if let GuidanceEvent::Command { engine, .. } | GuidanceEvent::Recalculated { engine, .. } = &mut event {
            *engine = self.poll_engine();
        }

        let generation = event.generation();
        let is_route = matches!(event, GuidanceEvent::RouteReady { .. });
        let kind = event.kind();

        let outcome = self.session.handle_event(event, now());
        debug!(event = kind, generation = %generation, outcome = ?outcome, "engine event");

        if is_route {
            self.resolve_pending(generation, outcome);
        }
    }

    fn route_failed(&mut self, generation: RouteGeneration, error: EngineError) {
        warn!(generation = %generation, error = %error, "route computation failed");
        // Reverts Calculating to Idle when the generation is still current.
        let outcome = self.session.route_ready(generation, Vec::new(), now());
        if matches!(outcome, EventOutcome::Failed(_)) {
            if let Some((_, reply)) = self.take_pending(generation) {
                let _ = reply.send(Err(error.into()));
            }
        }
    }

    fn resolve_pending(&mut self, generation: RouteGeneration, outcome: EventOutcome) {
        let result = match outcome {
            EventOutcome::Applied => Ok(self.session.generation()),
            EventOutcome::Failed(e) => Err(e.into()),
            EventOutcome::Discarded => return,
        };
        if let Some((_, reply)) = self.take_pending(generation) {
            let _ = reply.send(result);
        }
    }

    fn take_pending(&mut self, generation: RouteGeneration) -> Option<(RouteGeneration, StartReply)> {
        match &self.pending_start {
            Some((g, _)) if *g == generation => self.pending_start.take(),
            _ => None,
        }
    }

    /// Settle the pending start once the session has moved past
    /// `Calculating`: resolved if its run reached guidance, cancelled
    /// otherwise.  Revisions announced during the computation keep it open.
    fn settle_pending(&mut self) {
        let current = self.session.generation();
        let state = self.session.state();
        let (same_run, started) = match &self.pending_start {
            Some((g, _)) => (g.same_run(current), *g),
            None => return,
        };
        if same_run && state == SessionState::Calculating {
            return;
        }
        let Some((_, reply)) = self.pending_start.take() else {
            return;
        };
        if same_run && state.is_guiding() {
            debug!(generation = %current, "pending start resolved by recalculated route");
            let _ = reply.send(Ok(current));
        } else {
            debug!(generation = %started, "pending start cancelled");
            let _ = reply.send(Err(ServiceError::Cancelled));
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn poll_engine(&self) -> EngineState {
        EngineState {
            remaining_time_secs:  self.engine.remaining_time_secs(),
            distance_to_target_m: self.engine.distance_to_target_m(),
        }
    }

    fn publish(&self) {
        let snapshot = self.session.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
    }
}

#[inline]
fn now() -> std::time::Instant {
    Instant::now().into_std()
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(d) => tokio::time::sleep_until(d).await,
        None => std::future::pending().await,
    }
}
