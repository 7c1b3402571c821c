use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::location::LocationState;

/// Owner's handle on a mounted view. Dropping it unmounts the view.
#[derive(Debug)]
pub struct ViewHandle<S> {
    token: CancellationToken,
    state: watch::Receiver<S>,
    task: JoinHandle<()>,
}

impl<S: Clone> ViewHandle<S> {
    pub(crate) fn new(
        token: CancellationToken,
        state: watch::Receiver<S>,
        task: JoinHandle<()>,
    ) -> Self {
        Self { token, state, task }
    }

    /// Latest published state.
    pub fn state(&self) -> S {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.state.clone()
    }

    /// Unmount: stop scheduling work and drop any result still in flight.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Cancel and wait for the scheduling loop to exit.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Err(e) = (&mut self.task).await {
            tracing::warn!("view task ended abnormally: {e}");
        }
    }
}

impl<S> Drop for ViewHandle<S> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// What a fetch needs to publish into a view without racing a newer location.
#[derive(Debug)]
pub(crate) struct ViewContext<S> {
    pub location: LocationState,
    pub token: CancellationToken,
    panel: Arc<watch::Sender<S>>,
}

impl<S> Clone for ViewContext<S> {
    fn clone(&self) -> Self {
        Self {
            location: self.location.clone(),
            token: self.token.clone(),
            panel: Arc::clone(&self.panel),
        }
    }
}

impl<S> ViewContext<S> {
    pub fn new(location: LocationState, initial: S) -> (Self, watch::Receiver<S>) {
        let (tx, rx) = watch::channel(initial);
        let ctx = Self {
            location,
            token: CancellationToken::new(),
            panel: Arc::new(tx),
        };
        (ctx, rx)
    }

    /// Apply `update` only while the view is mounted and `generation` is the current location.
    /// Returns whether it was applied.
    pub fn commit(&self, generation: u64, update: impl FnOnce(&mut S)) -> bool {
        let applied = self.panel.send_if_modified(|panel| {
            if self.token.is_cancelled() || !self.location.is_current(generation) {
                return false;
            }
            update(panel);
            true
        });

        if !applied {
            tracing::debug!(generation, "discarding stale result");
        }
        applied
    }

    /// Apply `update` while mounted, whatever the location.
    pub fn commit_mounted(&self, update: impl FnOnce(&mut S)) -> bool {
        self.panel.send_if_modified(|panel| {
            if self.token.is_cancelled() {
                return false;
            }
            update(panel);
            true
        })
    }
}
