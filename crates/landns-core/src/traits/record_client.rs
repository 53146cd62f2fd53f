// # Record Client Trait
//
// Defines the interface for fetching and updating the published DNS record
// via a provider API. The reconciler depends only on this contract, never on
// provider wire details.

use async_trait::async_trait;

use crate::error::Result;

/// The provider's view of the managed "A" record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    /// Opaque provider-side record identifier, used to address updates
    pub id: String,
    /// RR (host-part) of the record
    pub rr: String,
    /// Current record value (an IPv4 address string)
    pub value: String,
}

impl DnsRecord {
    /// Whether this record can be handed to the reconciler
    ///
    /// A usable record has a non-empty identifier and a non-empty value;
    /// anything else is treated as "not found" and retried.
    pub fn is_usable(&self) -> bool {
        !self.id.is_empty() && !self.value.trim().is_empty()
    }
}

/// Trait for DNS record client implementations
///
/// Implementations handle the specifics of one provider's API and nothing
/// else. Retry policy is owned by the [`Reconciler`](crate::Reconciler):
/// implementations must not retry, sleep, or cache. One API call per
/// invocation, with any failure propagated as an error.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait RecordClient: Send + Sync {
    /// Fetch the "A" record whose RR equals `rr` under `domain`
    ///
    /// If the provider has no such record, or returns an entry with an
    /// empty value, this surfaces as [`Error::NotFound`](crate::Error);
    /// network/API failures surface as [`Error::Transport`](crate::Error).
    /// The reconciler retries both identically.
    async fn fetch_record(&self, domain: &str, rr: &str) -> Result<DnsRecord>;

    /// Set `record`'s value to `new_value`
    ///
    /// # Idempotency
    ///
    /// Must be idempotent from the caller's perspective: repeating the call
    /// with the same target value is safe.
    async fn update_record(&self, record: &DnsRecord, new_value: &str) -> Result<()>;

    /// Get the client name (for logging/debugging)
    fn client_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_without_value_is_not_usable() {
        let record = DnsRecord {
            id: "rec-1".to_string(),
            rr: "nas".to_string(),
            value: "  ".to_string(),
        };
        assert!(!record.is_usable());
    }

    #[test]
    fn record_without_id_is_not_usable() {
        let record = DnsRecord {
            id: String::new(),
            rr: "nas".to_string(),
            value: "192.168.1.42".to_string(),
        };
        assert!(!record.is_usable());
    }

    #[test]
    fn complete_record_is_usable() {
        let record = DnsRecord {
            id: "rec-1".to_string(),
            rr: "nas".to_string(),
            value: "192.168.1.42".to_string(),
        };
        assert!(record.is_usable());
    }
}
