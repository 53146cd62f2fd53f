//! Configuration types for the landns client
//!
//! One immutable [`Config`] is constructed at startup and passed by
//! reference into each component; there are no process-wide globals.

use std::net::Ipv4Addr;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

/// Default provider API endpoint
pub const DEFAULT_API_ENDPOINT: &str = "https://dns.aliyuncs.com/";

/// Default delay between retry attempts, in seconds
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 60;

/// Immutable runtime configuration, fixed for the process lifetime
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider API key id
    pub access_key_id: String,

    /// Provider API key secret
    pub access_key_secret: String,

    /// Root domain the managed record lives under
    pub domain_name: String,

    /// RR (host-part) of the managed "A" record
    pub subdomain_name: String,

    /// Reference local-DNS address; only used to derive the network prefix
    pub local_dns_address: String,

    /// Maximum retry attempts per operation (a failing operation is tried
    /// `max_retries + 1` times in total)
    pub max_retries: u32,

    /// Fixed delay between retry attempts, in seconds
    pub retry_delay_secs: u64,

    /// Provider API endpoint
    pub api_endpoint: String,
}

impl Config {
    /// Validate the configuration
    ///
    /// Any discrepancy between required and provided values is a fatal
    /// startup error; nothing is retried at this stage.
    pub fn validate(&self) -> Result<()> {
        if self.access_key_id.is_empty() {
            return Err(Error::config("ACCESS_KEY_ID must not be empty"));
        }
        if self.access_key_secret.is_empty() {
            return Err(Error::config("ACCESS_KEY_SECRET must not be empty"));
        }

        validate_domain_name(&self.domain_name)
            .map_err(|e| Error::config(format!("DOMAIN_NAME: {e}")))?;
        validate_domain_name(&self.subdomain_name)
            .map_err(|e| Error::config(format!("SUBDOMAIN_NAME: {e}")))?;

        if self.local_dns_address.parse::<Ipv4Addr>().is_err() {
            return Err(Error::config(format!(
                "LOCAL_DNS_ADDRESS '{}' is not an IPv4 address",
                self.local_dns_address
            )));
        }

        if self.api_endpoint.is_empty() {
            return Err(Error::config("API_ENDPOINT must not be empty"));
        }
        if !self.api_endpoint.starts_with("https://") && !self.api_endpoint.starts_with("http://") {
            return Err(Error::config(format!(
                "API_ENDPOINT must use HTTP or HTTPS scheme, got: {}",
                self.api_endpoint
            )));
        }

        Ok(())
    }

    /// The retry policy shared by every retried operation
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_secs(self.retry_delay_secs))
    }
}

/// Validate that a string is a plausible DNS name per RFC 1035
///
/// Not comprehensive, but catches common configuration mistakes before any
/// network activity happens.
fn validate_domain_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("name cannot be empty".to_string());
    }

    if name.len() > 253 {
        return Err(format!("name too long: {} chars (max 253)", name.len()));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(format!("name has an empty label: '{name}'"));
        }

        if label.len() > 63 {
            return Err(format!(
                "label too long: {} chars (max 63): '{label}'",
                label.len()
            ));
        }

        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return Err(format!(
                "label contains invalid characters (alphanumeric and hyphen only): '{label}'"
            ));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(format!("label cannot start or end with hyphen: '{label}'"));
        }
    }

    Ok(())
}
