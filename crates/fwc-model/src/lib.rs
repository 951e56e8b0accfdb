//! FWC Resource Model
//!
//! Typed model of a managed network firewall as this workspace sees it:
//!
//! - [`FirewallSpec`] / [`FirewallStatus`] / [`FirewallSnapshot`]: the declared
//!   configuration, the live status mirror, and their aggregate
//! - [`LoggingConfiguration`] / [`LogDestinationConfig`]: the multi-item
//!   logging sub-collection that the convergence layer reconciles
//! - [`CanonicalKey`]: deterministic, order-independent encoding used for
//!   set-membership comparison of log destinations
//!
//! All types here are plain values. Nothing in this crate talks to the
//! control plane or mutates shared state.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod canonical;
mod firewall;
mod logging;

pub use canonical::{CanonicalKey, EncodingError};
pub use firewall::{FirewallSnapshot, FirewallSpec, FirewallStatus, IpAddressType, SubnetMapping};
pub use logging::{LogDestinationConfig, LogDestinationType, LogType, LoggingConfiguration};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
