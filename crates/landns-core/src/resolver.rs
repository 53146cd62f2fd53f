//! Local-network address resolution
//!
//! Derives the expected network prefix from the configured reference
//! address and picks the host's first bound address inside that prefix.

use std::fmt;
use std::net::IpAddr;

use crate::error::{Error, Result};
use crate::traits::AddressSource;

/// Dot-terminated network prefix derived from a reference address
///
/// The prefix is the reference address with its last dot-delimited segment
/// stripped: `192.168.1.1` yields `192.168.1.`. Derivation is pure and
/// happens once per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkPrefix(String);

impl NetworkPrefix {
    /// Derive the prefix from a reference address
    pub fn derive(reference: &str) -> Result<Self> {
        match reference.rfind('.') {
            Some(last_dot) => Ok(Self(reference[..=last_dot].to_string())),
            None => Err(Error::config(format!(
                "cannot derive a network prefix from '{reference}' (no '.' found)"
            ))),
        }
    }

    /// Whether `addr`'s string form lies inside this prefix
    pub fn matches(&self, addr: &IpAddr) -> bool {
        addr.to_string().starts_with(&self.0)
    }

    /// The prefix as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NetworkPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Picks the host address belonging to the target network segment
///
/// A single attempt enumerates the source's addresses and returns the first
/// one matching the prefix. When several bound addresses match, the result
/// follows platform enumeration order; that order is not guaranteed stable
/// across OS or runtime versions.
pub struct AddressResolver {
    source: Box<dyn AddressSource>,
    prefix: NetworkPrefix,
}

impl AddressResolver {
    /// Create a resolver over `source` for `prefix`
    pub fn new(source: Box<dyn AddressSource>, prefix: NetworkPrefix) -> Self {
        Self { source, prefix }
    }

    /// The prefix this resolver matches against
    pub fn prefix(&self) -> &NetworkPrefix {
        &self.prefix
    }

    /// One resolution attempt
    ///
    /// No matching address among the currently bound set is a transient
    /// failure; the reconciler retries it under the shared policy.
    pub async fn resolve_once(&self) -> Result<IpAddr> {
        let addresses = self.source.addresses().await?;
        addresses
            .into_iter()
            .find(|addr| self.prefix.matches(addr))
            .ok_or_else(|| {
                Error::address_resolution(format!(
                    "no address bound to this host starts with '{}'",
                    self.prefix
                ))
            })
    }
}
