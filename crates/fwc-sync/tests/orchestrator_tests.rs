//! Delta-driven field update flows against the fake control plane

use fwc_compare::{compare_firewalls, paths, Delta};
use fwc_model::{CanonicalKey, FirewallStatus};
use fwc_sync::{update_firewall, NoopMetrics, SyncContext, SyncError};
use fwc_test_utils::{
    cloudwatch_flow_config, desired_snapshot, init_test_logging, s3_alert_config,
    FakeControlPlane, RecordedCall,
};
use std::collections::HashSet;

fn key_set(configs: &[fwc_model::LogDestinationConfig]) -> HashSet<CanonicalKey> {
    configs.iter().map(|c| CanonicalKey::of(c).unwrap()).collect()
}

#[tokio::test]
async fn update_converges_every_changed_field() {
    init_test_logging();
    let fake = FakeControlPlane::new("edge-fw")
        .with_logging(vec![s3_alert_config("b"), cloudwatch_flow_config("c")])
        .with_policy("arn:policy/old");
    let observed = fake.observed_snapshot();

    let mut desired = desired_snapshot(
        "edge-fw",
        vec![s3_alert_config("a"), s3_alert_config("b")],
    );
    desired.spec = desired.spec.with_policy_arn("arn:policy/new");

    let delta = compare_firewalls(&desired, &observed).unwrap();
    assert!(delta.different_at(paths::LOGGING_CONFIGURATION));
    assert!(delta.different_at(paths::FIREWALL_POLICY_ARN));

    let ctx = SyncContext::new();
    let updated = update_firewall(&ctx, &fake, &NoopMetrics, &desired, &observed, &delta)
        .await
        .unwrap();

    assert_eq!(
        key_set(&fake.logging()),
        key_set(&[s3_alert_config("a"), s3_alert_config("b")])
    );
    assert_eq!(fake.associated_policy().as_deref(), Some("arn:policy/new"));

    // Declared fields from desired, live status from observed, association
    // mirrored into the status.
    assert_eq!(updated.spec.firewall_policy_arn.as_deref(), Some("arn:policy/new"));
    assert_eq!(updated.status.firewall_arn, observed.status.firewall_arn);
    assert_eq!(updated.status.firewall_policy_arn.as_deref(), Some("arn:policy/new"));
}

#[tokio::test]
async fn unchanged_fields_issue_no_calls() {
    init_test_logging();
    let fake = FakeControlPlane::new("edge-fw").with_logging(vec![s3_alert_config("b")]);
    let observed = fake.observed_snapshot();
    let desired = observed.clone();

    let delta = compare_firewalls(&desired, &observed).unwrap();
    assert!(delta.is_empty());

    let ctx = SyncContext::new();
    update_firewall(&ctx, &fake, &NoopMetrics, &desired, &observed, &delta)
        .await
        .unwrap();

    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn association_targets_the_observed_identity() {
    init_test_logging();
    let fake = FakeControlPlane::new("edge-fw");
    let observed = fake.observed_snapshot();
    let mut desired = desired_snapshot("edge-fw", vec![]);
    desired.spec = desired.spec.with_policy_arn("arn:policy/new");

    let delta = compare_firewalls(&desired, &observed).unwrap();
    let ctx = SyncContext::new();
    update_firewall(&ctx, &fake, &NoopMetrics, &desired, &observed, &delta)
        .await
        .unwrap();

    match &fake.calls()[0] {
        RecordedCall::AssociatePolicy {
            firewall_arn,
            policy_arn,
        } => {
            assert_eq!(firewall_arn, &fake.firewall_arn());
            assert_eq!(policy_arn, "arn:policy/new");
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[tokio::test]
async fn logging_failure_is_tagged_and_produces_no_snapshot() {
    init_test_logging();
    let fake = FakeControlPlane::new("edge-fw");
    fake.fail_update_call(1);
    let observed = fake.observed_snapshot();
    let desired = desired_snapshot("edge-fw", vec![s3_alert_config("a")]);

    let delta = compare_firewalls(&desired, &observed).unwrap();
    let ctx = SyncContext::new();
    let err = update_firewall(&ctx, &fake, &NoopMetrics, &desired, &observed, &delta)
        .await
        .unwrap_err();

    assert!(err.is_logging_sync());
}

#[tokio::test]
async fn association_failure_is_tagged() {
    init_test_logging();
    let fake = FakeControlPlane::new("edge-fw");
    let mut observed = fake.observed_snapshot();
    // The outer reconciler has a stale identity for this firewall.
    observed.status = FirewallStatus::new().with_arn("arn:fw/someone-else");
    let mut desired = desired_snapshot("edge-fw", vec![]);
    desired.spec = desired.spec.with_policy_arn("arn:policy/new");

    let delta = compare_firewalls(&desired, &observed).unwrap();
    let ctx = SyncContext::new();
    let err = update_firewall(&ctx, &fake, &NoopMetrics, &desired, &observed, &delta)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Association(_)));
}

#[tokio::test]
async fn earlier_field_stays_applied_when_a_later_field_fails() {
    init_test_logging();
    let fake = FakeControlPlane::new("edge-fw");
    let mut observed = fake.observed_snapshot();
    observed.status = FirewallStatus::new().with_arn("arn:fw/someone-else");
    let mut desired = desired_snapshot("edge-fw", vec![s3_alert_config("a")]);
    desired.spec = desired.spec.with_policy_arn("arn:policy/new");

    let delta = compare_firewalls(&desired, &observed).unwrap();
    let ctx = SyncContext::new();
    let err = update_firewall(&ctx, &fake, &NoopMetrics, &desired, &observed, &delta)
        .await
        .unwrap_err();

    // The logging change was already applied remotely; only the association
    // is left for the outer loop's next pass.
    assert!(matches!(err, SyncError::Association(_)));
    assert_eq!(fake.logging(), vec![s3_alert_config("a")]);
    assert_eq!(fake.associated_policy(), None);
}

#[tokio::test]
async fn manual_delta_drives_dispatch() {
    init_test_logging();
    let fake = FakeControlPlane::new("edge-fw").with_logging(vec![s3_alert_config("b")]);
    let observed = fake.observed_snapshot();
    let desired = desired_snapshot("edge-fw", vec![s3_alert_config("b")]);

    // A delta that marks only the association as changed never touches the
    // logging collection.
    let mut delta = Delta::new();
    delta
        .add(paths::FIREWALL_POLICY_ARN, &Some("arn:policy/new"), &None::<String>)
        .unwrap();

    let ctx = SyncContext::new();
    let err = update_firewall(&ctx, &fake, &NoopMetrics, &desired, &observed, &delta)
        .await
        .unwrap_err();

    // Desired declares no policy ARN; the control plane rejects the empty
    // value, and no logging call was ever issued.
    assert!(matches!(err, SyncError::Association(_)));
    assert_eq!(fake.update_call_count(), 0);
}
