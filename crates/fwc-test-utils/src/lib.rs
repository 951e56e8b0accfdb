//! Testing utilities for the FWC workspace
//!
//! Shared fixtures, a recording metrics observer, and an in-memory fake
//! control plane that enforces the remote system's one-logical-change-per-
//! call contract and echoes authoritative post-state.

#![allow(missing_docs)]

use async_trait::async_trait;
use fwc_model::{
    CanonicalKey, FirewallSnapshot, FirewallSpec, FirewallStatus, LogDestinationConfig,
    LogDestinationType, LogType, LoggingConfiguration,
};
use fwc_sync::{
    ApiMetrics, CallKind, DescribeLoggingResponse, FirewallApi, RemoteCallError, SyncError,
    UpdateLoggingRequest, UpdateLoggingResponse,
};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

/// One call as the fake control plane saw it
#[derive(Debug, Clone)]
pub enum RecordedCall {
    DescribeLogging {
        firewall_name: String,
    },
    UpdateLogging {
        collection: Vec<LogDestinationConfig>,
    },
    AssociatePolicy {
        firewall_arn: String,
        policy_arn: String,
    },
}

#[derive(Debug, Default)]
struct FakeState {
    firewall_name: String,
    firewall_arn: String,
    logging: Vec<LogDestinationConfig>,
    associated_policy_arn: Option<String>,
    token_counter: u64,
    update_calls: usize,
    calls: Vec<RecordedCall>,
    fail_update_at: Option<usize>,
    clear_on_echo: bool,
    cancel_after_updates: Option<(CancellationToken, usize)>,
}

/// In-memory control plane for one firewall
///
/// Mirrors the contracts the convergence engine depends on: only one log
/// destination may change per update call, every mutation bumps the update
/// token, and the echoed collection is the authoritative post-state (the
/// fake re-sorts it by canonical key, as the remote system is free to do).
#[derive(Debug)]
pub struct FakeControlPlane {
    state: Mutex<FakeState>,
}

impl FakeControlPlane {
    pub fn new(firewall_name: impl Into<String>) -> Self {
        let firewall_name = firewall_name.into();
        let firewall_arn = format!("arn:fw/{firewall_name}");
        Self {
            state: Mutex::new(FakeState {
                firewall_name,
                firewall_arn,
                ..FakeState::default()
            }),
        }
    }

    pub fn with_logging(self, configs: Vec<LogDestinationConfig>) -> Self {
        self.state.lock().logging = configs;
        self
    }

    pub fn with_policy(self, policy_arn: impl Into<String>) -> Self {
        self.state.lock().associated_policy_arn = Some(policy_arn.into());
        self
    }

    /// Fail the n-th update call (1-based) with a throttling error
    pub fn fail_update_call(&self, n: usize) {
        self.state.lock().fail_update_at = Some(n);
    }

    /// Empty the collection behind the next update's echoed post-state,
    /// simulating a concurrent remote change racing this pass
    pub fn clear_on_next_echo(&self) {
        self.state.lock().clear_on_echo = true;
    }

    /// Cancel the token once the n-th update call (1-based) has completed
    pub fn cancel_after_update_calls(&self, token: CancellationToken, n: usize) {
        self.state.lock().cancel_after_updates = Some((token, n));
    }

    pub fn firewall_arn(&self) -> String {
        self.state.lock().firewall_arn.clone()
    }

    pub fn logging(&self) -> Vec<LogDestinationConfig> {
        self.state.lock().logging.clone()
    }

    pub fn associated_policy(&self) -> Option<String> {
        self.state.lock().associated_policy_arn.clone()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    pub fn update_call_count(&self) -> usize {
        self.state.lock().update_calls
    }

    /// Snapshot of the fake's current state, as an outer reconciler would
    /// observe it on its next pass
    pub fn observed_snapshot(&self) -> FirewallSnapshot {
        let state = self.state.lock();
        let mut spec = FirewallSpec::new(state.firewall_name.clone());
        if !state.logging.is_empty() {
            spec = spec.with_logging(LoggingConfiguration::from(state.logging.clone()));
        }
        if let Some(policy_arn) = &state.associated_policy_arn {
            spec = spec.with_policy_arn(policy_arn.clone());
        }
        let mut status = FirewallStatus::new().with_arn(state.firewall_arn.clone());
        status.firewall_policy_arn = state.associated_policy_arn.clone();
        FirewallSnapshot::with_status(spec, status)
    }
}

/// Number of configs present on exactly one side, by canonical key
fn logical_change_count(before: &[LogDestinationConfig], after: &[LogDestinationConfig]) -> usize {
    let key_set = |configs: &[LogDestinationConfig]| {
        configs
            .iter()
            .map(|c| CanonicalKey::of(c).expect("fixture config must encode"))
            .collect::<std::collections::HashSet<_>>()
    };
    let before_keys = key_set(before);
    let after_keys = key_set(after);
    before_keys.symmetric_difference(&after_keys).count()
}

fn sorted_by_key(mut configs: Vec<LogDestinationConfig>) -> Vec<LogDestinationConfig> {
    configs.sort_by_key(|c| CanonicalKey::of(c).expect("fixture config must encode"));
    configs
}

#[async_trait]
impl FirewallApi for FakeControlPlane {
    async fn describe_logging(
        &self,
        firewall_name: &str,
    ) -> Result<DescribeLoggingResponse, RemoteCallError> {
        let mut state = self.state.lock();
        state.calls.push(RecordedCall::DescribeLogging {
            firewall_name: firewall_name.to_string(),
        });

        if firewall_name != state.firewall_name {
            return Err(RemoteCallError::NotFound(firewall_name.to_string()));
        }

        Ok(DescribeLoggingResponse {
            firewall_name: state.firewall_name.clone(),
            logging_configuration: LoggingConfiguration::from(sorted_by_key(state.logging.clone())),
            update_token: Some(format!("token-{}", state.token_counter)),
        })
    }

    async fn update_logging(
        &self,
        request: UpdateLoggingRequest,
    ) -> Result<UpdateLoggingResponse, RemoteCallError> {
        let mut state = self.state.lock();
        state.update_calls += 1;
        state.calls.push(RecordedCall::UpdateLogging {
            collection: request.logging_configuration.log_destination_configs.clone(),
        });

        if state.fail_update_at == Some(state.update_calls) {
            return Err(RemoteCallError::Throttled(
                "UpdateLoggingConfiguration".to_string(),
            ));
        }

        if request.firewall_name != state.firewall_name {
            return Err(RemoteCallError::NotFound(request.firewall_name));
        }

        let requested = request.logging_configuration.log_destination_configs;
        if logical_change_count(&state.logging, &requested) > 1 {
            return Err(RemoteCallError::Service {
                operation: "UpdateLoggingConfiguration".to_string(),
                message: "only one log destination may change per call".to_string(),
            });
        }

        state.logging = requested;
        if state.clear_on_echo {
            state.clear_on_echo = false;
            state.logging.clear();
        }
        state.token_counter += 1;

        let response = UpdateLoggingResponse {
            firewall_name: state.firewall_name.clone(),
            logging_configuration: LoggingConfiguration::from(sorted_by_key(state.logging.clone())),
            update_token: Some(format!("token-{}", state.token_counter)),
        };

        if let Some((token, n)) = &state.cancel_after_updates {
            if state.update_calls == *n {
                token.cancel();
            }
        }

        Ok(response)
    }

    async fn associate_policy(
        &self,
        firewall_arn: &str,
        policy_arn: &str,
    ) -> Result<(), RemoteCallError> {
        let mut state = self.state.lock();
        state.calls.push(RecordedCall::AssociatePolicy {
            firewall_arn: firewall_arn.to_string(),
            policy_arn: policy_arn.to_string(),
        });

        if firewall_arn != state.firewall_arn {
            return Err(RemoteCallError::NotFound(firewall_arn.to_string()));
        }
        if policy_arn.is_empty() {
            return Err(RemoteCallError::Service {
                operation: "AssociateFirewallPolicy".to_string(),
                message: "policy ARN must be provided".to_string(),
            });
        }

        state.associated_policy_arn = Some(policy_arn.to_string());
        Ok(())
    }
}

/// One metric event as recorded by [`RecordingMetrics`]
#[derive(Debug, Clone)]
pub struct RecordedMetric {
    pub kind: CallKind,
    pub name: String,
    pub failed: bool,
}

/// Metrics observer that keeps every event for assertions
#[derive(Debug, Default)]
pub struct RecordingMetrics {
    events: Mutex<Vec<RecordedMetric>>,
}

impl RecordingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedMetric> {
        self.events.lock().clone()
    }
}

impl ApiMetrics for RecordingMetrics {
    fn record_api_call(&self, kind: CallKind, name: &str, error: Option<&SyncError>) {
        self.events.lock().push(RecordedMetric {
            kind,
            name: name.to_string(),
            failed: error.is_some(),
        });
    }
}

pub fn s3_alert_config(bucket: &str) -> LogDestinationConfig {
    LogDestinationConfig::new(LogType::Alert, LogDestinationType::S3)
        .with_destination("bucketName", bucket)
}

pub fn cloudwatch_flow_config(group: &str) -> LogDestinationConfig {
    LogDestinationConfig::new(LogType::Flow, LogDestinationType::CloudWatchLogs)
        .with_destination("logGroup", group)
}

pub fn firehose_tls_config(stream: &str) -> LogDestinationConfig {
    LogDestinationConfig::new(LogType::Tls, LogDestinationType::KinesisDataFirehose)
        .with_destination("deliveryStream", stream)
}

/// Desired-side snapshot declaring the given log destinations
pub fn desired_snapshot(name: &str, configs: Vec<LogDestinationConfig>) -> FirewallSnapshot {
    let mut spec = FirewallSpec::new(name);
    if !configs.is_empty() {
        spec = spec.with_logging(LoggingConfiguration::from(configs));
    }
    FirewallSnapshot::new(spec)
}

/// Initialize test logging once; safe to call from every test
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
