//! Snapshot comparison
//!
//! Produces the [`Delta`] between a desired and an observed firewall
//! snapshot. Collection-valued fields are compared order-insensitively on
//! sorted clones; the caller's snapshots are never mutated.

use crate::delta::{paths, Delta};
use fwc_model::{
    CanonicalKey, EncodingError, FirewallSnapshot, LogDestinationConfig, LoggingConfiguration,
    SubnetMapping,
};

/// Compare two snapshots field by field
///
/// Special-cased fields:
/// - logging configuration: membership comparison by canonical key, with a
///   length short-circuit; a missing configuration compares equal to an
///   empty one
/// - subnet mappings: compared as sorted-by-subnet-id clones, with a length
///   short-circuit
/// - policy association and description: plain value equality
///
/// The firewall name is the stable identifier and is not compared here.
///
/// # Errors
/// Returns [`EncodingError`] if a logging config cannot be canonically
/// encoded; a failed encoding aborts the comparison rather than producing a
/// spurious delta.
pub fn compare_firewalls(
    desired: &FirewallSnapshot,
    observed: &FirewallSnapshot,
) -> Result<Delta, EncodingError> {
    let mut delta = Delta::new();

    compare_logging(&mut delta, desired, observed)?;
    compare_subnet_mappings(&mut delta, desired, observed)?;

    if desired.spec.firewall_policy_arn != observed.spec.firewall_policy_arn {
        delta.add(
            paths::FIREWALL_POLICY_ARN,
            &desired.spec.firewall_policy_arn,
            &observed.spec.firewall_policy_arn,
        )?;
    }

    if desired.spec.description != observed.spec.description {
        delta.add(
            paths::DESCRIPTION,
            &desired.spec.description,
            &observed.spec.description,
        )?;
    }

    Ok(delta)
}

fn compare_logging(
    delta: &mut Delta,
    desired: &FirewallSnapshot,
    observed: &FirewallSnapshot,
) -> Result<(), EncodingError> {
    let desired_cfg = desired.spec.logging_configuration.clone().unwrap_or_default();
    let observed_cfg = observed.spec.logging_configuration.clone().unwrap_or_default();

    if desired_cfg.len() != observed_cfg.len() {
        delta.add(
            paths::LOGGING_CONFIGURATION,
            &desired.spec.logging_configuration,
            &observed.spec.logging_configuration,
        )?;
        return Ok(());
    }

    if sorted_by_canonical_key(desired_cfg)? != sorted_by_canonical_key(observed_cfg)? {
        delta.add(
            paths::LOGGING_CONFIGURATION,
            &desired.spec.logging_configuration,
            &observed.spec.logging_configuration,
        )?;
    }

    Ok(())
}

/// Key every config and sort by the key. Operates on a clone handed in by
/// the caller; the original spec ordering is preserved for everyone else.
fn sorted_by_canonical_key(
    config: LoggingConfiguration,
) -> Result<Vec<(CanonicalKey, LogDestinationConfig)>, EncodingError> {
    let mut keyed = config
        .log_destination_configs
        .into_iter()
        .map(|c| Ok((CanonicalKey::of(&c)?, c)))
        .collect::<Result<Vec<_>, EncodingError>>()?;
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(keyed)
}

fn compare_subnet_mappings(
    delta: &mut Delta,
    desired: &FirewallSnapshot,
    observed: &FirewallSnapshot,
) -> Result<(), EncodingError> {
    let desired_mappings = &desired.spec.subnet_mappings;
    let observed_mappings = &observed.spec.subnet_mappings;

    if desired_mappings.len() != observed_mappings.len() {
        delta.add(paths::SUBNET_MAPPINGS, desired_mappings, observed_mappings)?;
        return Ok(());
    }

    if copy_sorted_mappings(desired_mappings) != copy_sorted_mappings(observed_mappings) {
        delta.add(paths::SUBNET_MAPPINGS, desired_mappings, observed_mappings)?;
    }

    Ok(())
}

fn copy_sorted_mappings(mappings: &[SubnetMapping]) -> Vec<SubnetMapping> {
    let mut copy = mappings.to_vec();
    copy.sort_by(|a, b| a.subnet_id.cmp(&b.subnet_id));
    copy
}
