// # Address Source Trait
//
// Defines the interface for enumerating the IP addresses currently bound to
// the local host. The resolver picks the address matching the configured
// network prefix; the source only observes.

use async_trait::async_trait;
use std::net::IpAddr;

use crate::error::Result;

/// Trait for local address enumeration
///
/// Implementations return the host's bound addresses in platform
/// enumeration order and make no selection decisions of their own. Retry
/// policy is owned by the [`Reconciler`](crate::Reconciler): an empty or
/// failed enumeration is reported as-is, once per invocation.
#[async_trait]
pub trait AddressSource: Send + Sync {
    /// Enumerate the addresses currently bound to the host
    ///
    /// The returned order is whatever the platform reports; it is not
    /// guaranteed stable across OS versions.
    async fn addresses(&self) -> Result<Vec<IpAddr>>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
