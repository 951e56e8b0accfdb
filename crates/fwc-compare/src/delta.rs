//! Field-level delta recording
//!
//! Provides [`Delta`], the record of which top-level fields differ between a
//! desired and an observed snapshot. Each entry keeps both raw values for
//! diagnostics; consumers dispatch on the field path alone.

use serde::Serialize;
use serde_json::Value;

/// Well-known field paths recorded by the comparison layer
pub mod paths {
    /// Logging sub-collection
    pub const LOGGING_CONFIGURATION: &str = "spec.logging_configuration";
    /// Policy association reference
    pub const FIREWALL_POLICY_ARN: &str = "spec.firewall_policy_arn";
    /// Subnet attachments
    pub const SUBNET_MAPPINGS: &str = "spec.subnet_mappings";
    /// Free-form description
    pub const DESCRIPTION: &str = "spec.description";
}

/// One recorded difference at a field path
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDiff {
    /// Field path the difference was found at
    pub path: &'static str,
    /// Desired-side raw value
    pub desired: Value,
    /// Observed-side raw value
    pub observed: Value,
}

/// Collected differences between two firewall snapshots
///
/// Field paths appear at most once; recording the same path twice keeps the
/// first entry.
#[derive(Debug, Clone, Default)]
pub struct Delta {
    diffs: Vec<FieldDiff>,
}

impl Delta {
    /// Create an empty delta
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a difference at a field path, keeping both raw values
    ///
    /// # Errors
    /// Returns the serialization error if either value cannot be captured.
    pub fn add<D, O>(&mut self, path: &'static str, desired: &D, observed: &O) -> Result<(), serde_json::Error>
    where
        D: Serialize,
        O: Serialize,
    {
        if self.different_at(path) {
            return Ok(());
        }
        self.diffs.push(FieldDiff {
            path,
            desired: serde_json::to_value(desired)?,
            observed: serde_json::to_value(observed)?,
        });
        Ok(())
    }

    /// Whether a difference was recorded at the given path
    #[inline]
    #[must_use]
    pub fn different_at(&self, path: &str) -> bool {
        self.diffs.iter().any(|d| d.path == path)
    }

    /// Whether any difference was recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    /// Number of differing fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    /// Iterate over recorded differences
    pub fn iter(&self) -> impl Iterator<Item = &FieldDiff> {
        self.diffs.iter()
    }
}
