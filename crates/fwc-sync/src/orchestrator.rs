//! Field update orchestration
//!
//! Top-level update handler: inspects the recorded [`Delta`] and invokes the
//! matching sub-converger per changed field, composing the updated snapshot
//! that goes back to the outer reconciliation loop.
//!
//! There is no rollback across fields. A later sub-converger failing after
//! an earlier one succeeded leaves the earlier change applied remotely; the
//! outer loop's next pass re-diffs and finishes the rest.

use crate::client::{ApiMetrics, CallKind, FirewallApi};
use crate::context::SyncContext;
use crate::convergence::sync_logging;
use crate::error::{wrap_association, wrap_logging, SyncError};
use fwc_compare::{paths, Delta};
use fwc_model::FirewallSnapshot;

/// Apply every changed field and compose the updated snapshot
///
/// The result carries desired's declared fields and observed's live status;
/// after all sub-convergers succeed, the association value from desired is
/// mirrored into the status. On any failure the error is returned
/// immediately and no snapshot is produced; the caller keeps working with
/// the observed state it already has.
///
/// # Errors
/// - logging-sync failures, wrapped with their stage marker
/// - association failures, wrapped with their stage marker
/// - cancellation and deadline errors, unwrapped
pub async fn update_firewall(
    ctx: &SyncContext,
    api: &dyn FirewallApi,
    metrics: &dyn ApiMetrics,
    desired: &FirewallSnapshot,
    observed: &FirewallSnapshot,
    delta: &Delta,
) -> Result<FirewallSnapshot, SyncError> {
    let mut updated = desired.clone();
    updated.status = observed.status.clone();

    if delta.different_at(paths::LOGGING_CONFIGURATION) {
        sync_logging(ctx, api, metrics, Some(desired), Some(observed))
            .await
            .map_err(wrap_logging)?;
    }

    if delta.different_at(paths::FIREWALL_POLICY_ARN) {
        sync_policy_association(ctx, api, metrics, desired, observed)
            .await
            .map_err(wrap_association)?;
    }

    updated.status.firewall_policy_arn = desired.spec.firewall_policy_arn.clone();

    Ok(updated)
}

/// Update the policy association with a single call
///
/// Targets observed's stable identifier with desired's new value. An unset
/// identifier or value is the control plane's to reject, not preflighted
/// here.
///
/// # Errors
/// Returns the call's failure, or cancellation/deadline errors from the
/// context.
pub async fn sync_policy_association(
    ctx: &SyncContext,
    api: &dyn FirewallApi,
    metrics: &dyn ApiMetrics,
    desired: &FirewallSnapshot,
    observed: &FirewallSnapshot,
) -> Result<(), SyncError> {
    let firewall_arn = observed.status.firewall_arn.clone().unwrap_or_default();
    let policy_arn = desired.spec.firewall_policy_arn.clone().unwrap_or_default();

    tracing::info!("Associating policy {} with firewall {}", policy_arn, firewall_arn);

    let result = ctx.run(api.associate_policy(&firewall_arn, &policy_arn)).await;
    metrics.record_api_call(CallKind::Update, "AssociateFirewallPolicy", result.as_ref().err());
    result
}
