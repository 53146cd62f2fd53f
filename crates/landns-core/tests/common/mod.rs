//! Test doubles and common utilities for reconcile contract tests
//!
//! The doubles script collaborator behavior and expose shared atomic call
//! counters so tests can assert exact attempt counts after the reconciler
//! has consumed the boxed instances.

use std::net::IpAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use landns_core::config::Config;
use landns_core::error::{Error, Result};
use landns_core::traits::{AddressSource, DnsRecord, RecordClient};

/// An address source that reports a fixed address list on every call
pub struct FixedAddressSource {
    addresses: Vec<IpAddr>,
    calls: Arc<AtomicUsize>,
}

impl FixedAddressSource {
    /// Create the source plus a handle to its call counter
    pub fn new(addresses: &[&str]) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Self {
            addresses: addresses.iter().map(|a| a.parse().unwrap()).collect(),
            calls: Arc::clone(&calls),
        };
        (source, calls)
    }
}

#[async_trait]
impl AddressSource for FixedAddressSource {
    async fn addresses(&self) -> Result<Vec<IpAddr>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.addresses.clone())
    }

    fn source_name(&self) -> &'static str {
        "fixed"
    }
}

/// Shared counter handles for a [`ScriptedRecordClient`]
#[derive(Clone)]
pub struct RecordClientProbe {
    pub fetch_calls: Arc<AtomicUsize>,
    pub update_calls: Arc<AtomicUsize>,
    /// Every update call as (record id, new value)
    pub updates: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordClientProbe {
    fn new() -> Self {
        Self {
            fetch_calls: Arc::new(AtomicUsize::new(0)),
            update_calls: Arc::new(AtomicUsize::new(0)),
            updates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn update_count(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn recorded_updates(&self) -> Vec<(String, String)> {
        self.updates.lock().unwrap().clone()
    }
}

/// A record client with scripted fetch/update behavior
pub struct ScriptedRecordClient {
    record: Option<DnsRecord>,
    fail_update: bool,
    probe: RecordClientProbe,
}

impl ScriptedRecordClient {
    /// Fetch always returns `record`; updates succeed
    pub fn with_record(record: DnsRecord) -> (Self, RecordClientProbe) {
        let probe = RecordClientProbe::new();
        (
            Self {
                record: Some(record),
                fail_update: false,
                probe: probe.clone(),
            },
            probe,
        )
    }

    /// Fetch always fails with a transport error
    pub fn failing_fetch() -> (Self, RecordClientProbe) {
        let probe = RecordClientProbe::new();
        (
            Self {
                record: None,
                fail_update: false,
                probe: probe.clone(),
            },
            probe,
        )
    }

    /// Fetch returns `record`; every update fails with a transport error
    pub fn failing_update(record: DnsRecord) -> (Self, RecordClientProbe) {
        let probe = RecordClientProbe::new();
        (
            Self {
                record: Some(record),
                fail_update: true,
                probe: probe.clone(),
            },
            probe,
        )
    }
}

#[async_trait]
impl RecordClient for ScriptedRecordClient {
    async fn fetch_record(&self, _domain: &str, _rr: &str) -> Result<DnsRecord> {
        self.probe.fetch_calls.fetch_add(1, Ordering::SeqCst);
        match &self.record {
            Some(record) => Ok(record.clone()),
            None => Err(Error::transport("scripted fetch failure")),
        }
    }

    async fn update_record(&self, record: &DnsRecord, new_value: &str) -> Result<()> {
        self.probe.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_update {
            return Err(Error::transport("scripted update failure"));
        }
        self.probe
            .updates
            .lock()
            .unwrap()
            .push((record.id.clone(), new_value.to_string()));
        Ok(())
    }

    fn client_name(&self) -> &'static str {
        "scripted"
    }
}

/// A usable record for `nas.example.com` with the given value
pub fn record_with_value(value: &str) -> DnsRecord {
    DnsRecord {
        id: "rec-1001".to_string(),
        rr: "nas".to_string(),
        value: value.to_string(),
    }
}

/// Minimal valid configuration; tests override individual fields
///
/// Retry delay is zero so exhaustion tests finish immediately.
pub fn test_config(max_retries: u32) -> Config {
    Config {
        access_key_id: "test-key-id".to_string(),
        access_key_secret: "test-key-secret".to_string(),
        domain_name: "example.com".to_string(),
        subdomain_name: "nas".to_string(),
        local_dns_address: "192.168.1.1".to_string(),
        max_retries,
        retry_delay_secs: 0,
        api_endpoint: "https://dns.aliyuncs.com/".to_string(),
    }
}
