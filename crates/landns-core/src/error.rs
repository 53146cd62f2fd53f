//! Error types for the landns client
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for landns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the landns client
///
/// `AddressResolution`, `NotFound` and `Transport` are transient: the
/// reconciler retries all three identically under its configured policy.
/// `Config` and `RetriesExhausted` are terminal.
#[derive(Error, Debug)]
pub enum Error {
    /// No address bound to the host matches the expected network prefix,
    /// or the addresses could not be enumerated at all
    #[error("address resolution failed: {0}")]
    AddressResolution(String),

    /// The provider has no usable record (missing, or empty value)
    #[error("record not found: {0}")]
    NotFound(String),

    /// Network/API failure while contacting the provider
    #[error("transport error: {0}")]
    Transport(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// An operation ran out of retry budget; fatal at the process boundary
    #[error("{operation} failed after {attempts} attempts")]
    RetriesExhausted {
        /// Human-readable name of the retried operation
        operation: &'static str,
        /// Total attempts made (max retries + 1)
        attempts: u32,
    },
}

impl Error {
    /// Create an address resolution error
    pub fn address_resolution(msg: impl Into<String>) -> Self {
        Self::AddressResolution(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
