//! Error types for the convergence layer
//!
//! Provides the taxonomy the outer reconciliation loop dispatches on:
//! - encoding failures (fatal to the current diff, never retried here)
//! - remote-call failures, wrapped with the stage they occurred in
//! - cancellation and deadline expiry (retryable)
//!
//! This layer performs exactly one attempt per remote call; retry and
//! backoff policy belong to the caller.

use fwc_model::EncodingError;

/// Failure of a single control-plane call
#[derive(Debug, thiserror::Error)]
pub enum RemoteCallError {
    /// The control plane rejected the request
    #[error("{operation} rejected: {message}")]
    Service {
        /// Call name the rejection came from
        operation: String,
        /// Service-provided reason
        message: String,
    },

    /// The request never completed
    #[error("transport failure during {operation}: {message}")]
    Transport {
        /// Call name the failure occurred in
        operation: String,
        /// Underlying transport reason
        message: String,
    },

    /// The addressed resource does not exist
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The control plane asked the caller to slow down
    #[error("throttled during {0}")]
    Throttled(String),
}

impl RemoteCallError {
    /// Whether a retry of the same call may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Throttled(_))
    }
}

/// Main convergence error type
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Canonical-key computation failed
    #[error("canonical encoding failed: {0}")]
    Encoding(#[from] EncodingError),

    /// A control-plane call failed
    #[error("remote call failed: {0}")]
    RemoteCall(#[from] RemoteCallError),

    /// Marker: the failure occurred while syncing the logging collection
    #[error("error syncing logging configuration: {0}")]
    LoggingSync(#[source] Box<SyncError>),

    /// Marker: the failure occurred while updating the policy association
    #[error("error associating firewall policy: {0}")]
    Association(#[source] Box<SyncError>),

    /// The invocation's cancellation token fired
    #[error("operation cancelled")]
    Cancelled,

    /// The invocation's deadline passed
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl SyncError {
    /// Wrap an error with the logging-sync stage marker
    #[inline]
    #[must_use]
    pub fn logging_sync(err: SyncError) -> Self {
        Self::LoggingSync(Box::new(err))
    }

    /// Wrap an error with the policy-association stage marker
    #[inline]
    #[must_use]
    pub fn association(err: SyncError) -> Self {
        Self::Association(Box::new(err))
    }

    /// Whether the outer loop should retry the whole convergence pass
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Encoding(_) => false,
            Self::RemoteCall(err) => err.is_retryable(),
            Self::LoggingSync(inner) | Self::Association(inner) => inner.is_retryable(),
            Self::Cancelled | Self::DeadlineExceeded => true,
        }
    }

    /// Whether this is a logging-collection sync failure
    #[inline]
    #[must_use]
    pub fn is_logging_sync(&self) -> bool {
        matches!(self, Self::LoggingSync(_))
    }

    /// Whether this is a cancellation or deadline error
    #[inline]
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

/// Tag an error with the logging-sync marker, leaving cancellation untouched
///
/// Cancellation is its own outcome; burying it under a stage marker would
/// hide it from the outer loop's retry policy.
pub(crate) fn wrap_logging(err: SyncError) -> SyncError {
    if err.is_cancellation() {
        err
    } else {
        SyncError::logging_sync(err)
    }
}

/// Tag an error with the association marker, leaving cancellation untouched
pub(crate) fn wrap_association(err: SyncError) -> SyncError {
    if err.is_cancellation() {
        err
    } else {
        SyncError::association(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_error() -> RemoteCallError {
        RemoteCallError::Service {
            operation: "UpdateLoggingConfiguration".to_string(),
            message: "invalid token".to_string(),
        }
    }

    #[test]
    fn remote_retryability() {
        assert!(RemoteCallError::Throttled("UpdateLoggingConfiguration".to_string()).is_retryable());
        assert!(RemoteCallError::Transport {
            operation: "DescribeLoggingConfiguration".to_string(),
            message: "connection reset".to_string(),
        }
        .is_retryable());
        assert!(!service_error().is_retryable());
        assert!(!RemoteCallError::NotFound("edge-fw".to_string()).is_retryable());
    }

    #[test]
    fn sync_retryability_follows_inner_error() {
        let retryable = SyncError::logging_sync(SyncError::RemoteCall(RemoteCallError::Throttled(
            "UpdateLoggingConfiguration".to_string(),
        )));
        assert!(retryable.is_retryable());

        let fatal = SyncError::logging_sync(SyncError::RemoteCall(service_error()));
        assert!(!fatal.is_retryable());

        assert!(SyncError::Cancelled.is_retryable());
        assert!(SyncError::DeadlineExceeded.is_retryable());
    }

    #[test]
    fn wrapping_preserves_cancellation() {
        assert!(matches!(wrap_logging(SyncError::Cancelled), SyncError::Cancelled));
        assert!(matches!(
            wrap_association(SyncError::DeadlineExceeded),
            SyncError::DeadlineExceeded
        ));

        let wrapped = wrap_logging(SyncError::RemoteCall(service_error()));
        assert!(wrapped.is_logging_sync());
    }

    #[test]
    fn display_carries_stage_marker() {
        let err = SyncError::logging_sync(SyncError::RemoteCall(service_error()));
        let text = err.to_string();
        assert!(text.contains("error syncing logging configuration"));
    }
}
