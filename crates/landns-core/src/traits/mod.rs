//! Core traits for the landns client
//!
//! This module defines the abstract interfaces the reconciler depends on.
//!
//! - [`AddressSource`]: Enumerate the host's currently bound addresses
//! - [`RecordClient`]: Fetch and update the published DNS record

pub mod address_source;
pub mod record_client;

pub use address_source::AddressSource;
pub use record_client::{DnsRecord, RecordClient};
