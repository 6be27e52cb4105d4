//! `GuidanceHandle` — the caller-side API of a running service.

use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

use gd_core::{GeoPoint, RouteGeneration};
use gd_session::{GuidanceSnapshot, StartRequest};

use crate::service::Request;
use crate::{ServiceError, ServiceResult};

/// Cheap to clone; every clone talks to the same service task.
#[derive(Clone, Debug)]
pub struct GuidanceHandle {
    tx:        mpsc::Sender<Request>,
    snapshots: watch::Receiver<GuidanceSnapshot>,
    shutdown:  CancellationToken,
}

impl GuidanceHandle {
    pub(crate) fn new(
        tx: mpsc::Sender<Request>,
        snapshots: watch::Receiver<GuidanceSnapshot>,
        shutdown: CancellationToken,
    ) -> Self {
        Self { tx, snapshots, shutdown }
    }

    /// Start navigating from `from` to `to`.
    ///
    /// Resolves once the session reaches `Guiding`, with the generation of
    /// the new run.  Rejected requests fail immediately; a request overtaken
    /// by [`stop`](Self::stop) or another start fails with
    /// [`ServiceError::Cancelled`].
    pub async fn start(&self, from: GeoPoint, to: GeoPoint) -> ServiceResult<RouteGeneration> {
        let (reply, rx) = oneshot::channel();
        let request = StartRequest::new(from, to);
        self.tx
            .send(Request::Start { request, reply })
            .await
            .map_err(|_| ServiceError::Closed)?;
        rx.await.map_err(|_| ServiceError::Closed)?
    }

    /// Stop the current session.  Returns `false` if nothing was running.
    pub async fn stop(&self) -> ServiceResult<bool> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request::Stop { reply })
            .await
            .map_err(|_| ServiceError::Closed)?;
        rx.await.map_err(|_| ServiceError::Closed)
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> GuidanceSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that is notified on every snapshot change.
    pub fn subscribe(&self) -> watch::Receiver<GuidanceSnapshot> {
        self.snapshots.clone()
    }

    /// Ask the service to stop the session and exit.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// `true` once the service task has exited.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
