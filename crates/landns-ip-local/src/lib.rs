// # Local Interface Address Source
//
// This crate provides the `AddressSource` implementation that enumerates
// the IP addresses bound to the host's network interfaces via getifaddrs.
//
// The source only observes: it reports every bound address (loopback
// included) in the order the platform returns them, and leaves prefix
// matching and retry policy to landns-core. That order is not guaranteed
// stable across OS or runtime versions.

use async_trait::async_trait;
use std::net::IpAddr;

use landns_core::error::{Error, Result};
use landns_core::traits::AddressSource;
use tracing::debug;

/// Address source backed by the host's interface table
#[derive(Debug, Default)]
pub struct HostAddressSource;

impl HostAddressSource {
    /// Create a new source
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AddressSource for HostAddressSource {
    async fn addresses(&self) -> Result<Vec<IpAddr>> {
        let interfaces = if_addrs::get_if_addrs().map_err(|e| {
            Error::address_resolution(format!("interface enumeration failed: {e}"))
        })?;

        let addresses: Vec<IpAddr> = interfaces.iter().map(|iface| iface.ip()).collect();
        debug!("host has {} bound address(es)", addresses.len());
        Ok(addresses)
    }

    fn source_name(&self) -> &'static str {
        "local-interfaces"
    }
}
