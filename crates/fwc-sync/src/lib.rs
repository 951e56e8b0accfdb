//! FWC Convergence Layer
//!
//! Drives a managed firewall's live configuration to match its declared
//! spec through idempotent control-plane calls.
//!
//! # Core Concepts
//!
//! - [`edit_set`]: minimal additions/removals between two logging
//!   collections, keyed canonically so order never matters
//! - [`sync_logging`]: the convergence engine. Removals before additions,
//!   one logical change per call, authoritative post-state threaded between
//!   calls
//! - [`update_firewall`]: delta-driven dispatch across changed fields,
//!   composing the updated snapshot for the outer reconciliation loop
//! - [`FirewallApi`] / [`ApiMetrics`]: seams for the transport and for call
//!   observability
//! - [`SyncContext`]: cancellation token and deadline every call runs under
//!
//! # Example
//!
//! ```rust,ignore
//! use fwc_compare::compare_firewalls;
//! use fwc_sync::{update_firewall, NoopMetrics, SyncContext};
//!
//! let delta = compare_firewalls(&desired, &observed)?;
//! if !delta.is_empty() {
//!     let ctx = SyncContext::new();
//!     let updated = update_firewall(&ctx, &api, &NoopMetrics, &desired, &observed, &delta).await?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod client;
mod context;
mod convergence;
mod diff;
mod error;
mod orchestrator;

pub use client::{
    ApiMetrics, CallKind, CounterMetrics, DescribeLoggingResponse, FirewallApi, NoopMetrics,
    UpdateLoggingRequest, UpdateLoggingResponse,
};
pub use context::SyncContext;
pub use convergence::{
    activate_logging, describe_logging, refresh_logging, sync_logging, teardown_logging,
};
pub use diff::{edit_set, EditSet};
pub use error::{RemoteCallError, SyncError};
pub use orchestrator::{sync_policy_association, update_firewall};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
