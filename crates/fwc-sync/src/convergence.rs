//! Logging-collection convergence engine
//!
//! Drives the remote logging collection to match the declared one through
//! the control plane's single-change-per-call mutate API:
//!
//! 1. compute the edit set (additions and removals by canonical key)
//! 2. apply all removals, then all additions, strictly sequentially
//! 3. after every call, replace the in-flight payload with the authoritative
//!    post-state the control plane echoed back
//!
//! Each call is applied durably by the remote system, so an aborted pass
//! resumes safely: the next pass re-diffs against the more-converged
//! observed state and the edit set shrinks.

use crate::client::{ApiMetrics, CallKind, DescribeLoggingResponse, FirewallApi, UpdateLoggingRequest, UpdateLoggingResponse};
use crate::context::SyncContext;
use crate::diff::{edit_set, EditSet};
use crate::error::{wrap_logging, SyncError};
use fwc_model::{CanonicalKey, FirewallSnapshot, LoggingConfiguration};

/// Converge the remote logging collection toward the desired one
///
/// Case selection by which snapshots are present:
/// - both: ordinary update; the payload is seeded from the observed
///   resource, whose identity the control plane already knows
/// - desired only: activation; every declared config is added on top of an
///   empty remote collection
/// - observed only: teardown; every observed config is removed
/// - neither: nothing to do, no call is issued
///
/// # Errors
/// The first failing call aborts the loop and is returned as-is; callers
/// attach the logging-sync stage marker. Cancellation and deadline expiry
/// surface as their own error kinds.
pub async fn sync_logging(
    ctx: &SyncContext,
    api: &dyn FirewallApi,
    metrics: &dyn ApiMetrics,
    desired: Option<&FirewallSnapshot>,
    observed: Option<&FirewallSnapshot>,
) -> Result<(), SyncError> {
    let (edits, mut request) = match (desired, observed) {
        (Some(desired), Some(observed)) => {
            let desired_cfg = desired.spec.logging_configuration.clone().unwrap_or_default();
            let observed_cfg = observed.spec.logging_configuration.clone().unwrap_or_default();
            let edits = edit_set(&desired_cfg, &observed_cfg)?;
            (edits, UpdateLoggingRequest::for_snapshot(observed))
        }
        (Some(desired), None) => {
            let desired_cfg = desired.spec.logging_configuration.clone().unwrap_or_default();
            let edits = EditSet {
                additions: desired_cfg.log_destination_configs,
                removals: Vec::new(),
            };
            let mut request = UpdateLoggingRequest::for_snapshot(desired);
            // Nothing is live yet; additions build on an empty collection.
            request.logging_configuration = LoggingConfiguration::default();
            (edits, request)
        }
        (None, Some(observed)) => {
            let observed_cfg = observed.spec.logging_configuration.clone().unwrap_or_default();
            let edits = EditSet {
                additions: Vec::new(),
                removals: observed_cfg.log_destination_configs,
            };
            (edits, UpdateLoggingRequest::for_snapshot(observed))
        }
        (None, None) => return Ok(()),
    };

    if edits.is_empty() {
        tracing::debug!("logging collection already converged; no call issued");
        return Ok(());
    }

    tracing::info!(
        "Syncing logging configuration for {}: {} removals, {} additions",
        request.firewall_name,
        edits.removals.len(),
        edits.additions.len()
    );

    // Removals strictly before additions. The control plane accepts one
    // logical change per call and echoes the full post-state, which seeds
    // the next payload.
    for target in &edits.removals {
        let before = request.logging_configuration.len();
        request
            .logging_configuration
            .log_destination_configs
            .retain(|config| config != target);

        if request.logging_configuration.len() == before {
            // Already gone remotely; converging past it is a no-op, not a
            // fault, but worth a trace since it can indicate upstream drift.
            tracing::debug!(
                "Removal target {} absent from in-flight payload; skipping",
                CanonicalKey::of(target)?
            );
            continue;
        }

        let response = update_call(ctx, api, metrics, request.clone()).await?;
        request.absorb(response);
    }

    for config in &edits.additions {
        request
            .logging_configuration
            .log_destination_configs
            .push(config.clone());

        let response = update_call(ctx, api, metrics, request.clone()).await?;
        request.absorb(response);
    }

    Ok(())
}

/// Activate logging on a newly created firewall
///
/// No-op when the snapshot declares no logging configuration.
///
/// # Errors
/// Returns the underlying failure wrapped with the logging-sync marker.
pub async fn activate_logging(
    ctx: &SyncContext,
    api: &dyn FirewallApi,
    metrics: &dyn ApiMetrics,
    snapshot: &FirewallSnapshot,
) -> Result<(), SyncError> {
    if snapshot.spec.logging_configuration.is_none() {
        return Ok(());
    }
    sync_logging(ctx, api, metrics, Some(snapshot), None)
        .await
        .map_err(wrap_logging)
}

/// Clear remote logging ahead of firewall deletion
///
/// The control plane refuses to delete a firewall that still has log
/// destinations attached. No-op when the snapshot carries no logging
/// configuration.
///
/// # Errors
/// Returns the underlying failure wrapped with the logging-sync marker.
pub async fn teardown_logging(
    ctx: &SyncContext,
    api: &dyn FirewallApi,
    metrics: &dyn ApiMetrics,
    snapshot: &FirewallSnapshot,
) -> Result<(), SyncError> {
    if snapshot.spec.logging_configuration.is_none() {
        return Ok(());
    }
    sync_logging(ctx, api, metrics, None, Some(snapshot))
        .await
        .map_err(wrap_logging)
}

/// Read back the logging collection currently live on a firewall
///
/// # Errors
/// Returns the call's failure, or cancellation/deadline errors from the
/// context.
pub async fn describe_logging(
    ctx: &SyncContext,
    api: &dyn FirewallApi,
    metrics: &dyn ApiMetrics,
    firewall_name: &str,
) -> Result<DescribeLoggingResponse, SyncError> {
    let result = ctx.run(api.describe_logging(firewall_name)).await;
    metrics.record_api_call(CallKind::Read, "DescribeLoggingConfiguration", result.as_ref().err());
    result
}

/// Fold the live logging collection into a snapshot's spec view
///
/// An empty remote collection folds to `None`, matching how an undeclared
/// configuration is represented.
///
/// # Errors
/// Returns the read-back failure.
pub async fn refresh_logging(
    ctx: &SyncContext,
    api: &dyn FirewallApi,
    metrics: &dyn ApiMetrics,
    snapshot: &mut FirewallSnapshot,
) -> Result<(), SyncError> {
    let name = snapshot.spec.firewall_name.clone();
    let response = describe_logging(ctx, api, metrics, &name).await?;
    snapshot.spec.logging_configuration = if response.logging_configuration.is_empty() {
        None
    } else {
        Some(response.logging_configuration)
    };
    Ok(())
}

async fn update_call(
    ctx: &SyncContext,
    api: &dyn FirewallApi,
    metrics: &dyn ApiMetrics,
    request: UpdateLoggingRequest,
) -> Result<UpdateLoggingResponse, SyncError> {
    let result = ctx.run(api.update_logging(request)).await;
    metrics.record_api_call(CallKind::Update, "UpdateLoggingConfiguration", result.as_ref().err());
    result
}
