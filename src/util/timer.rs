//! Cancellable fixed-delay timers.

use std::future::Future;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{AcademyError, Result};

/// A spawned timer task, aborted when the handle is dropped.
#[derive(Debug)]
pub struct TimerHandle {
    handle: JoinHandle<()>,
}

impl TimerHandle {
    /// Spawn `task` on the current runtime.
    pub fn spawn<F>(task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(task),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Sleep until `deadline`. Returns `false` if `cancel` fired first.
pub async fn delay_until(deadline: Instant, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep_until(deadline) => true,
    }
}

/// Outcome of a delayed action that callers may await or ignore.
#[derive(Debug)]
pub struct Pending<T> {
    action: &'static str,
    rx: oneshot::Receiver<T>,
}

impl<T> Pending<T> {
    pub(crate) fn channel(action: &'static str) -> (oneshot::Sender<T>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { action, rx })
    }

    /// Wait for the action to complete.
    ///
    /// Fails with [`AcademyError::Canceled`] if the owning screen was torn
    /// down before the timer fired.
    pub async fn wait(self) -> Result<T> {
        let action = self.action;
        self.rx
            .await
            .map_err(|_| AcademyError::Canceled(action.to_string()))
    }
}
