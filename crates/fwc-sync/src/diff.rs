//! Set-diff calculation for logging collections
//!
//! Computes the minimal [`EditSet`] that converts an observed collection
//! into a desired one. Membership is decided by canonical key, so neither
//! element order nor locator insertion order can produce a spurious edit,
//! and configs present on both sides are never re-submitted to the control
//! plane.

use fwc_model::{CanonicalKey, EncodingError, LogDestinationConfig, LoggingConfiguration};
use std::collections::HashMap;

/// Additions and removals needed to reach a desired collection
///
/// Both lists are disjoint by construction. Iteration order only affects the
/// sequence of control-plane calls, never the converged end state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditSet {
    /// Configs to add to the remote collection
    pub additions: Vec<LogDestinationConfig>,
    /// Configs to remove from the remote collection
    pub removals: Vec<LogDestinationConfig>,
}

impl EditSet {
    /// Whether there is nothing to apply
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    /// Total number of edits
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.additions.len() + self.removals.len()
    }
}

/// Compute the edit set between desired and observed collections
///
/// Configs whose canonical key appears on both sides are left untouched.
/// A key appearing twice within one side collapses to a single entry (map
/// semantics); that is accepted behavior, not an error.
///
/// # Errors
/// Returns [`EncodingError`] if any config cannot be canonically encoded;
/// the whole diff is aborted rather than computed from a wrong key.
pub fn edit_set(
    desired: &LoggingConfiguration,
    observed: &LoggingConfiguration,
) -> Result<EditSet, EncodingError> {
    let desired_by_key = key_map(desired)?;
    let observed_by_key = key_map(observed)?;

    let additions = desired_by_key
        .iter()
        .filter(|(key, _)| !observed_by_key.contains_key(*key))
        .map(|(_, config)| (*config).clone())
        .collect();

    let removals = observed_by_key
        .iter()
        .filter(|(key, _)| !desired_by_key.contains_key(*key))
        .map(|(_, config)| (*config).clone())
        .collect();

    Ok(EditSet {
        additions,
        removals,
    })
}

fn key_map(
    collection: &LoggingConfiguration,
) -> Result<HashMap<CanonicalKey, &LogDestinationConfig>, EncodingError> {
    let mut map = HashMap::with_capacity(collection.len());
    for config in collection.iter() {
        map.insert(CanonicalKey::of(config)?, config);
    }
    Ok(map)
}
