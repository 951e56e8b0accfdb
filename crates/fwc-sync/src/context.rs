//! Cancellation and deadline context
//!
//! A convergence invocation carries a [`SyncContext`]; every control-plane
//! call runs under it, so cancellation or deadline expiry aborts the
//! in-progress loop at the next call boundary.

use crate::error::{RemoteCallError, SyncError};
use std::future::Future;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation token plus optional deadline for one invocation
#[derive(Debug, Clone, Default)]
pub struct SyncContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl SyncContext {
    /// Context with no deadline and a fresh cancellation token
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context that expires at the given instant
    #[inline]
    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Context that expires after the given duration
    #[inline]
    #[must_use]
    pub fn with_timeout(timeout: std::time::Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Context driven by an externally owned cancellation token
    #[inline]
    #[must_use]
    pub fn with_token(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    /// Handle on the cancellation token
    #[inline]
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancel the invocation
    #[inline]
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the invocation has been cancelled
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run one remote call under this context
    ///
    /// # Errors
    /// - [`SyncError::Cancelled`] if the token fires first
    /// - [`SyncError::DeadlineExceeded`] if the deadline passes first
    /// - the call's own error otherwise
    pub async fn run<T, F>(&self, call: F) -> Result<T, SyncError>
    where
        F: Future<Output = Result<T, RemoteCallError>>,
    {
        let guarded = async {
            match self.deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, call)
                    .await
                    .map_err(|_| SyncError::DeadlineExceeded)?
                    .map_err(SyncError::from),
                None => call.await.map_err(SyncError::from),
            }
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(SyncError::Cancelled),
            result = guarded => result,
        }
    }
}
