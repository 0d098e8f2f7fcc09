//! Per-call cancellation and deadlines

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::TransportFailure;

/// Cancellation signal and optional deadline threaded through one call
///
/// Cloning is cheap; clones observe the same signal. A context without a
/// deadline or cancel handle never interrupts a call.
#[derive(Clone, Debug, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Fires the cancellation signal of the contexts created with it
#[derive(Clone, Debug)]
pub struct CancelHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

impl Context {
    /// Context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self::default()
    }

    /// Context that expires after `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().timeout(timeout)
    }

    /// Context that expires at `deadline`
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::background().deadline(deadline)
    }

    /// Context paired with a handle that cancels it
    pub fn with_cancel() -> (Self, CancelHandle) {
        Self::background().cancellable()
    }

    /// Derive a context with an earlier-or-equal deadline
    pub fn timeout(self, timeout: Duration) -> Self {
        self.deadline(Instant::now() + timeout)
    }

    /// Derive a context whose deadline is the earlier of the two
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        });
        self
    }

    /// Derive a cancellable context; the returned handle cancels only it
    pub fn cancellable(mut self) -> (Self, CancelHandle) {
        let (sender, receiver) = watch::channel(false);
        self.cancel = Some(receiver);
        (
            self,
            CancelHandle {
                sender: Arc::new(sender),
            },
        )
    }

    pub fn deadline_at(&self) -> Option<Instant> {
        self.deadline
    }

    /// Reason this context is already done, if it is
    pub fn check(&self) -> Option<TransportFailure> {
        if let Some(ref rx) = self.cancel {
            if *rx.borrow() {
                return Some(TransportFailure::Cancelled);
            }
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(TransportFailure::TimedOut),
            _ => None,
        }
    }

    /// Resolves when the context is cancelled or its deadline passes
    ///
    /// Pending forever for a background context.
    pub async fn done(&self) -> TransportFailure {
        let cancelled = async {
            match self.cancel.clone() {
                Some(mut rx) => {
                    if rx.wait_for(|cancelled| *cancelled).await.is_ok() {
                        return;
                    }
                    // every handle dropped without cancelling
                    std::future::pending::<()>().await
                }
                None => std::future::pending::<()>().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = cancelled => TransportFailure::Cancelled,
            _ = expired => TransportFailure::TimedOut,
        }
    }
}
