//! Firewall resource types
//!
//! Defines the aggregate entity the convergence layer operates on:
//! - [`FirewallSpec`]: declared configuration
//! - [`FirewallStatus`]: live status mirror reported by the control plane
//! - [`FirewallSnapshot`]: spec + status as one reconciliation unit
//! - [`SubnetMapping`]: attachment of the firewall to one subnet

use crate::logging::LoggingConfiguration;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Address family of a subnet attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IpAddressType {
    /// IPv4 only
    #[serde(rename = "IPV4")]
    Ipv4,
    /// IPv6 only
    #[serde(rename = "IPV6")]
    Ipv6,
    /// IPv4 and IPv6
    #[serde(rename = "DUALSTACK")]
    Dualstack,
}

impl IpAddressType {
    /// Wire name of this address type
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            IpAddressType::Ipv4 => "IPV4",
            IpAddressType::Ipv6 => "IPV6",
            IpAddressType::Dualstack => "DUALSTACK",
        }
    }
}

impl Display for IpAddressType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attachment of the firewall to one subnet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubnetMapping {
    /// Subnet identifier
    pub subnet_id: String,
    /// Address family, if pinned
    pub ip_address_type: Option<IpAddressType>,
}

impl SubnetMapping {
    /// Create a mapping with no pinned address family
    #[inline]
    #[must_use]
    pub fn new(subnet_id: impl Into<String>) -> Self {
        Self {
            subnet_id: subnet_id.into(),
            ip_address_type: None,
        }
    }

    /// Pin the address family
    #[inline]
    #[must_use]
    pub fn with_ip_address_type(mut self, ip_address_type: IpAddressType) -> Self {
        self.ip_address_type = Some(ip_address_type);
        self
    }
}

/// Declared configuration of a firewall
///
/// The name is the stable identifier the control plane is addressed by; a
/// changed name is a different resource, not an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FirewallSpec {
    /// Stable firewall name
    pub firewall_name: String,
    /// Associated policy reference
    pub firewall_policy_arn: Option<String>,
    /// Logging sub-collection, if any is declared
    pub logging_configuration: Option<LoggingConfiguration>,
    /// Subnet attachments
    pub subnet_mappings: Vec<SubnetMapping>,
    /// Free-form description
    pub description: Option<String>,
}

impl FirewallSpec {
    /// Create a spec with only the name set
    #[inline]
    #[must_use]
    pub fn new(firewall_name: impl Into<String>) -> Self {
        Self {
            firewall_name: firewall_name.into(),
            firewall_policy_arn: None,
            logging_configuration: None,
            subnet_mappings: Vec::new(),
            description: None,
        }
    }

    /// Set the associated policy reference
    #[inline]
    #[must_use]
    pub fn with_policy_arn(mut self, arn: impl Into<String>) -> Self {
        self.firewall_policy_arn = Some(arn.into());
        self
    }

    /// Set the logging configuration
    #[inline]
    #[must_use]
    pub fn with_logging(mut self, logging: LoggingConfiguration) -> Self {
        self.logging_configuration = Some(logging);
        self
    }

    /// Add a subnet attachment
    #[inline]
    #[must_use]
    pub fn with_subnet_mapping(mut self, mapping: SubnetMapping) -> Self {
        self.subnet_mappings.push(mapping);
        self
    }

    /// Set the description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Live status mirror reported by the control plane
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FirewallStatus {
    /// Generated identifier of the firewall
    pub firewall_arn: Option<String>,
    /// Policy reference as last confirmed by the control plane
    pub firewall_policy_arn: Option<String>,
}

impl FirewallStatus {
    /// Create an empty status
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the generated identifier
    #[inline]
    #[must_use]
    pub fn with_arn(mut self, arn: impl Into<String>) -> Self {
        self.firewall_arn = Some(arn.into());
        self
    }
}

/// A firewall as one reconciliation unit: declared spec plus live status
///
/// Snapshots are owned values. The compare and convergence layers clone them
/// as needed and never mutate a caller's snapshot in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FirewallSnapshot {
    /// Declared configuration
    pub spec: FirewallSpec,
    /// Live status mirror
    pub status: FirewallStatus,
}

impl FirewallSnapshot {
    /// Create a snapshot with an empty status
    #[inline]
    #[must_use]
    pub fn new(spec: FirewallSpec) -> Self {
        Self {
            spec,
            status: FirewallStatus::new(),
        }
    }

    /// Create a snapshot with an explicit status
    #[inline]
    #[must_use]
    pub fn with_status(spec: FirewallSpec, status: FirewallStatus) -> Self {
        Self { spec, status }
    }

    /// Stable name of the firewall
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.spec.firewall_name
    }

    /// Generated identifier, once the control plane has reported one
    #[inline]
    #[must_use]
    pub fn arn(&self) -> Option<&str> {
        self.status.firewall_arn.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogDestinationConfig, LogDestinationType, LogType};

    #[test]
    fn spec_builder() {
        let spec = FirewallSpec::new("edge-fw")
            .with_policy_arn("arn:policy/default")
            .with_subnet_mapping(SubnetMapping::new("subnet-1").with_ip_address_type(IpAddressType::Ipv4))
            .with_description("edge firewall");

        assert_eq!(spec.firewall_name, "edge-fw");
        assert_eq!(spec.firewall_policy_arn.as_deref(), Some("arn:policy/default"));
        assert_eq!(spec.subnet_mappings.len(), 1);
        assert!(spec.logging_configuration.is_none());
    }

    #[test]
    fn snapshot_accessors() {
        let logging = LoggingConfiguration::new().with_config(
            LogDestinationConfig::new(LogType::Alert, LogDestinationType::S3)
                .with_destination("bucketName", "alerts"),
        );
        let snapshot = FirewallSnapshot::with_status(
            FirewallSpec::new("edge-fw").with_logging(logging),
            FirewallStatus::new().with_arn("arn:fw/edge-fw"),
        );

        assert_eq!(snapshot.name(), "edge-fw");
        assert_eq!(snapshot.arn(), Some("arn:fw/edge-fw"));
    }

    #[test]
    fn status_defaults_to_unreported() {
        let snapshot = FirewallSnapshot::new(FirewallSpec::new("edge-fw"));
        assert_eq!(snapshot.arn(), None);
        assert_eq!(snapshot.status.firewall_policy_arn, None);
    }
}
