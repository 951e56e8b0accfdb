//! Control-plane interface
//!
//! Defines the seam between the convergence engine and the transport that
//! performs authenticated calls against the remote control plane:
//! - [`FirewallApi`]: the three calls this layer issues
//! - [`UpdateLoggingRequest`] / [`UpdateLoggingResponse`]: the mutate
//!   round-trip, including the update token the control plane threads
//!   through consecutive mutations
//! - [`ApiMetrics`]: observer notified of every call

use crate::error::{RemoteCallError, SyncError};
use async_trait::async_trait;
use fwc_model::{FirewallSnapshot, LoggingConfiguration};
use serde::{Deserialize, Serialize};

/// Payload of one logging mutation
///
/// Carries the full collection snapshot, but the control plane accepts only
/// one logical change (one destination added or removed) per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateLoggingRequest {
    /// Stable firewall name the mutation targets
    pub firewall_name: String,
    /// Full collection as it should look after this call
    pub logging_configuration: LoggingConfiguration,
    /// Token from the previous response, if any
    pub update_token: Option<String>,
}

impl UpdateLoggingRequest {
    /// Seed a payload from a snapshot's identity and declared collection
    #[inline]
    #[must_use]
    pub fn for_snapshot(snapshot: &FirewallSnapshot) -> Self {
        Self {
            firewall_name: snapshot.spec.firewall_name.clone(),
            logging_configuration: snapshot.spec.logging_configuration.clone().unwrap_or_default(),
            update_token: None,
        }
    }

    /// Replace this payload's state with the authoritative post-state
    ///
    /// The control plane may enrich or reorder what it echoes back; its
    /// response is the truth the next call must build on.
    #[inline]
    pub fn absorb(&mut self, response: UpdateLoggingResponse) {
        self.firewall_name = response.firewall_name;
        self.logging_configuration = response.logging_configuration;
        self.update_token = response.update_token;
    }
}

/// Authoritative post-mutation state echoed by the control plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateLoggingResponse {
    /// Firewall name as the control plane reports it
    pub firewall_name: String,
    /// Full collection after the mutation
    pub logging_configuration: LoggingConfiguration,
    /// Token the next mutation must present
    pub update_token: Option<String>,
}

/// Result of a logging read-back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeLoggingResponse {
    /// Firewall name as the control plane reports it
    pub firewall_name: String,
    /// Collection currently live on the firewall
    pub logging_configuration: LoggingConfiguration,
    /// Token a subsequent mutation must present
    pub update_token: Option<String>,
}

/// The control-plane calls issued by this layer
///
/// Implementations perform authenticated HTTP against the remote system;
/// tests substitute an in-memory fake. Every method performs exactly one
/// attempt; retry policy lives with the outer reconciliation loop.
#[async_trait]
pub trait FirewallApi: Send + Sync {
    /// Read the logging collection currently live on a firewall
    async fn describe_logging(
        &self,
        firewall_name: &str,
    ) -> Result<DescribeLoggingResponse, RemoteCallError>;

    /// Apply one logical logging change and return the authoritative
    /// post-state
    async fn update_logging(
        &self,
        request: UpdateLoggingRequest,
    ) -> Result<UpdateLoggingResponse, RemoteCallError>;

    /// Associate a policy with a firewall
    async fn associate_policy(
        &self,
        firewall_arn: &str,
        policy_arn: &str,
    ) -> Result<(), RemoteCallError>;
}

/// Kind of control-plane call, for metrics labelling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Read-only call
    Read,
    /// Mutating call
    Update,
}

impl CallKind {
    /// Label value for this kind
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CallKind::Read => "READ",
            CallKind::Update => "UPDATE",
        }
    }
}

/// Observer notified of every control-plane call
///
/// Invoked exactly once per issued call, after it settles, with the error if
/// one occurred.
pub trait ApiMetrics: Send + Sync {
    /// Record one settled call
    fn record_api_call(&self, kind: CallKind, name: &str, error: Option<&SyncError>);
}

/// Metrics observer that records nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl ApiMetrics for NoopMetrics {
    fn record_api_call(&self, _kind: CallKind, _name: &str, _error: Option<&SyncError>) {}
}

/// Metrics observer backed by the `metrics` facade
///
/// Emits one counter per settled call, labelled with the call name, kind,
/// and outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterMetrics;

impl CounterMetrics {
    /// Create a counter-backed observer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ApiMetrics for CounterMetrics {
    fn record_api_call(&self, kind: CallKind, name: &str, error: Option<&SyncError>) {
        let outcome = if error.is_some() { "error" } else { "ok" };
        metrics::counter!(
            "fwc_api_calls_total",
            "call" => name.to_string(),
            "kind" => kind.as_str(),
            "outcome" => outcome
        )
        .increment(1);
    }
}
