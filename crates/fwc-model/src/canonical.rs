//! Canonical encoding for set-membership comparison
//!
//! Provides [`CanonicalKey`], a deterministic serialization of a
//! [`LogDestinationConfig`] that is independent of how the destination
//! locator mapping was built. Two semantically identical configs always
//! produce byte-identical keys; configs differing in any field never do.

use crate::logging::{LogDestinationConfig, LogDestinationType, LogType};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Canonical, order-independent encoding of a log destination config
///
/// Used as the membership key when diffing desired against observed
/// collections. The locator mapping is re-keyed through a sorted map before
/// encoding, so insertion order cannot leak into the key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalKey(String);

/// Sorted-field view of a config, encoded as the canonical form.
///
/// Field order here is fixed by declaration; the locator is a `BTreeMap` so
/// its keys encode sorted.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CanonicalForm<'a> {
    log_destination: BTreeMap<&'a str, &'a str>,
    log_destination_type: LogDestinationType,
    log_type: LogType,
}

impl CanonicalKey {
    /// Compute the canonical key of a config
    ///
    /// # Errors
    /// Returns [`EncodingError`] if the config cannot be serialized. A failed
    /// encoding aborts the enclosing diff; it never yields a wrong key.
    pub fn of(config: &LogDestinationConfig) -> Result<Self, EncodingError> {
        let form = CanonicalForm {
            log_destination: config
                .log_destination
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
            log_destination_type: config.log_destination_type,
            log_type: config.log_type,
        };
        let encoded = serde_json::to_string(&form)?;
        Ok(Self(encoded))
    }

    /// The canonical encoding itself
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short Blake3 digest of the key (first 8 bytes, hex)
    ///
    /// Compact form for log lines; never used for membership decisions.
    #[inline]
    #[must_use]
    pub fn digest(&self) -> String {
        let hash = blake3::hash(self.0.as_bytes());
        hex::encode(&hash.as_bytes()[..8])
    }
}

impl Display for CanonicalKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.digest())
    }
}

/// Canonical-key computation failed
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    /// Config could not be serialized to its canonical form
    #[error("canonical encoding failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
