//! Cancellation and deadlines for client calls.
//!
//! A `Context` is passed by reference into every operation that may touch the
//! network. `Client::execute` checks it before each round trip and races the
//! in-flight request against it, so a cancelled enumeration stops before the
//! next page is requested.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::ApiError;

#[derive(Debug, Clone, Default)]
pub struct Context {
    cancel: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

/// Cancels every `Context` cloned from the one it was created with.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_cancel() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            cancel: Some(rx),
            deadline: None,
        };
        (ctx, CancelHandle { tx })
    }

    /// Attach a deadline. An earlier deadline already on the context wins.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        });
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Fails if the context is already cancelled or past its deadline.
    pub fn check(&self) -> Result<(), ApiError> {
        if self.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ApiError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Resolves once the context is cancelled or its deadline passes.
    ///
    /// Never resolves for a background context, or when the `CancelHandle`
    /// was dropped without cancelling and there is no deadline.
    pub async fn done(&self) -> ApiError {
        let cancelled = async {
            if let Some(mut rx) = self.cancel.clone() {
                let fired = rx.wait_for(|cancelled| *cancelled).await.is_ok();
                if fired {
                    return;
                }
            }
            std::future::pending::<()>().await
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => ApiError::Cancelled,
            _ = expired => ApiError::DeadlineExceeded,
        }
    }
}
