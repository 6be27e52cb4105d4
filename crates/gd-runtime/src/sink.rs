//! `EngineSink` — the engine's channel into the service.
//!
//! A sink is created for exactly one engine run and stamps every event with
//! that run's [`RouteGeneration`].  When the engine announces a
//! recalculation the sink moves to the next revision in lockstep with the
//! session, so events for the abandoned route and events for its replacement
//! stay distinguishable.

use gd_core::RouteGeneration;
use gd_route::NavigationResult;
use gd_session::{EngineState, GuidanceEvent, NavigationCommand};
use tokio::sync::mpsc;

use crate::EngineError;
use crate::service::Request;

#[derive(Debug)]
pub struct EngineSink {
    tx:         mpsc::Sender<Request>,
    generation: RouteGeneration,
}

impl EngineSink {
    pub(crate) fn new(tx: mpsc::Sender<Request>, generation: RouteGeneration) -> Self {
        Self { tx, generation }
    }

    /// The generation the next event will carry.
    #[inline]
    pub fn generation(&self) -> RouteGeneration {
        self.generation
    }

    /// `true` once the service has exited.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub async fn command(&self, command: NavigationCommand) -> Result<(), EngineError> {
        self.send(GuidanceEvent::Command {
            generation: self.generation,
            command,
            engine: EngineState::default(),
        })
        .await
    }

    pub async fn navigation_started(&self) -> Result<(), EngineError> {
        self.send(GuidanceEvent::NavigationStarted { generation: self.generation }).await
    }

    /// Advance to the next revision and announce it.
    pub async fn will_recalculate(&mut self) -> Result<(), EngineError> {
        self.generation = self.generation.next_revision();
        self.send(GuidanceEvent::WillRecalculate { generation: self.generation }).await
    }

    /// `None` means the engine kept its current route.
    pub async fn recalculated(&self, result: Option<NavigationResult>) -> Result<(), EngineError> {
        self.send(GuidanceEvent::Recalculated {
            generation: self.generation,
            result,
            engine: EngineState::default(),
        })
        .await
    }

    pub async fn navigation_stopped(&self) -> Result<(), EngineError> {
        self.send(GuidanceEvent::NavigationStopped { generation: self.generation }).await
    }

    async fn send(&self, event: GuidanceEvent) -> Result<(), EngineError> {
        self.tx
            .send(Request::Event(event))
            .await
            .map_err(|_| EngineError::Disconnected)
    }
}
