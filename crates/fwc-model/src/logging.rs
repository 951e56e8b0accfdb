//! Logging configuration types
//!
//! Defines the logging sub-collection of a firewall:
//! - [`LogDestinationConfig`]: one log stream routed to one destination
//! - [`LoggingConfiguration`]: the full collection carried by a firewall
//!
//! The collection is logically a set: element order carries no meaning, and
//! membership is decided by canonical encoding (see [`crate::CanonicalKey`]).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

/// Destination service a log stream is delivered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogDestinationType {
    /// Object storage bucket
    S3,
    /// Log group in the managed log service
    CloudWatchLogs,
    /// Streaming delivery service
    KinesisDataFirehose,
}

impl LogDestinationType {
    /// Wire name of this destination type
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LogDestinationType::S3 => "S3",
            LogDestinationType::CloudWatchLogs => "CloudWatchLogs",
            LogDestinationType::KinesisDataFirehose => "KinesisDataFirehose",
        }
    }
}

impl Display for LogDestinationType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category of traffic a log destination receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogType {
    /// Events that matched an alerting rule
    #[serde(rename = "ALERT")]
    Alert,
    /// Per-connection flow records
    #[serde(rename = "FLOW")]
    Flow,
    /// TLS inspection events
    #[serde(rename = "TLS")]
    Tls,
}

impl LogType {
    /// Wire name of this log type
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Alert => "ALERT",
            LogType::Flow => "FLOW",
            LogType::Tls => "TLS",
        }
    }
}

impl Display for LogType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One log stream routed to one destination
///
/// The destination locator is a free-form key/value mapping whose layout
/// depends on the destination type (`bucketName` for S3, `logGroup` for
/// CloudWatchLogs, `deliveryStream` for KinesisDataFirehose). Two configs are
/// equal iff every field matches; locator key order never matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogDestinationConfig {
    /// Destination locator (free-form key/value mapping)
    pub log_destination: HashMap<String, String>,
    /// Destination service
    pub log_destination_type: LogDestinationType,
    /// Traffic category
    pub log_type: LogType,
}

impl LogDestinationConfig {
    /// Create a config with an empty locator
    #[inline]
    #[must_use]
    pub fn new(log_type: LogType, log_destination_type: LogDestinationType) -> Self {
        Self {
            log_destination: HashMap::new(),
            log_destination_type,
            log_type,
        }
    }

    /// Add a locator entry
    #[inline]
    #[must_use]
    pub fn with_destination(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.log_destination.insert(key.into(), value.into());
        self
    }
}

/// The logging sub-collection of a firewall
///
/// Logically an unordered set of [`LogDestinationConfig`]; entries that share
/// a canonical encoding collapse to one during diffing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoggingConfiguration {
    /// Log destinations carried by this configuration
    pub log_destination_configs: Vec<LogDestinationConfig>,
}

impl LoggingConfiguration {
    /// Create an empty configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a destination config
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: LogDestinationConfig) -> Self {
        self.log_destination_configs.push(config);
        self
    }

    /// Number of destination configs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.log_destination_configs.len()
    }

    /// Whether the collection carries no destinations
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log_destination_configs.is_empty()
    }

    /// Iterate over destination configs
    pub fn iter(&self) -> impl Iterator<Item = &LogDestinationConfig> {
        self.log_destination_configs.iter()
    }
}

impl From<Vec<LogDestinationConfig>> for LoggingConfiguration {
    fn from(log_destination_configs: Vec<LogDestinationConfig>) -> Self {
        Self {
            log_destination_configs,
        }
    }
}

impl FromIterator<LogDestinationConfig> for LoggingConfiguration {
    fn from_iter<I: IntoIterator<Item = LogDestinationConfig>>(iter: I) -> Self {
        Self {
            log_destination_configs: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = LogDestinationConfig::new(LogType::Alert, LogDestinationType::S3)
            .with_destination("bucketName", "alerts")
            .with_destination("prefix", "fw/");

        assert_eq!(config.log_type, LogType::Alert);
        assert_eq!(config.log_destination.len(), 2);
        assert_eq!(
            config.log_destination.get("bucketName").map(String::as_str),
            Some("alerts")
        );
    }

    #[test]
    fn config_equality_ignores_locator_insertion_order() {
        let a = LogDestinationConfig::new(LogType::Flow, LogDestinationType::CloudWatchLogs)
            .with_destination("logGroup", "fw-flow")
            .with_destination("region", "us-east-1");
        let b = LogDestinationConfig::new(LogType::Flow, LogDestinationType::CloudWatchLogs)
            .with_destination("region", "us-east-1")
            .with_destination("logGroup", "fw-flow");

        assert_eq!(a, b);
    }

    #[test]
    fn collection_from_vec() {
        let configs = vec![
            LogDestinationConfig::new(LogType::Alert, LogDestinationType::S3),
            LogDestinationConfig::new(LogType::Flow, LogDestinationType::S3),
        ];
        let collection = LoggingConfiguration::from(configs);

        assert_eq!(collection.len(), 2);
        assert!(!collection.is_empty());
    }

    #[test]
    fn wire_names() {
        assert_eq!(LogType::Alert.as_str(), "ALERT");
        assert_eq!(LogDestinationType::KinesisDataFirehose.to_string(), "KinesisDataFirehose");
    }
}
