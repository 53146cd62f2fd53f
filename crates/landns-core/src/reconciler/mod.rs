//! Core reconcile flow
//!
//! The Reconciler drives one compare-then-conditionally-update cycle:
//!
//! 1. resolve the host's local-network address,
//! 2. fetch the currently published record,
//! 3. compare the two as exact strings,
//! 4. update the record only when they differ.
//!
//! Each phase is wrapped by the shared [`RetryPolicy`]; collaborator
//! implementations never retry on their own. The phases run strictly in
//! sequence (a phase starts only after the previous one has fully
//! committed) and nothing is persisted between process invocations, so
//! every run re-resolves and re-fetches from authoritative sources.
//! Terminal errors propagate to the caller; the library never exits the
//! process.

use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::resolver::{AddressResolver, NetworkPrefix};
use crate::retry::RetryPolicy;
use crate::traits::{AddressSource, DnsRecord, RecordClient};

/// Result of one reconcile cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The published record already matches the local address
    InSync {
        /// The shared address value
        address: String,
    },

    /// The record was updated to the local address
    Updated {
        /// Value the record held before the update
        previous: String,
        /// Value the record holds now
        current: String,
    },
}

/// Orchestrates resolver and record client into one reconcile cycle
pub struct Reconciler {
    resolver: AddressResolver,
    client: Box<dyn RecordClient>,
    domain: String,
    rr: String,
    retry: RetryPolicy,
}

impl Reconciler {
    /// Create a reconciler from validated configuration
    ///
    /// Fails fast on invalid configuration, before any network activity.
    pub fn new(
        source: Box<dyn AddressSource>,
        client: Box<dyn RecordClient>,
        config: &Config,
    ) -> Result<Self> {
        config.validate()?;
        let prefix = NetworkPrefix::derive(&config.local_dns_address)?;

        Ok(Self {
            resolver: AddressResolver::new(source, prefix),
            client,
            domain: config.domain_name.clone(),
            rr: config.subdomain_name.clone(),
            retry: config.retry_policy(),
        })
    }

    /// Run one reconcile cycle
    pub async fn run(&self) -> Result<ReconcileOutcome> {
        let address = self.resolve_address().await?;
        let record = self.fetch_record().await?;

        if record.value == address {
            info!(
                "{}.{} already points at {address}, nothing to update",
                self.rr, self.domain
            );
            return Ok(ReconcileOutcome::InSync { address });
        }

        info!(
            "{}.{} points at {}, local address is {address}, updating",
            self.rr, self.domain, record.value
        );
        self.update_record(&record, &address).await?;
        info!("{}.{} updated: {} -> {address}", self.rr, self.domain, record.value);

        Ok(ReconcileOutcome::Updated {
            previous: record.value,
            current: address,
        })
    }

    async fn resolve_address(&self) -> Result<String> {
        info!(
            "matching local addresses against prefix {}",
            self.resolver.prefix()
        );

        let resolver = &self.resolver;
        let address = self
            .retry
            .run("local address resolution", || resolver.resolve_once())
            .await?;

        let address = address.to_string();
        info!("local address is {address}");
        Ok(address)
    }

    async fn fetch_record(&self) -> Result<DnsRecord> {
        let client = &*self.client;
        let domain = self.domain.as_str();
        let rr = self.rr.as_str();

        let record = self
            .retry
            .run("record fetch", || async move {
                let record = client.fetch_record(domain, rr).await?;
                // A record with a missing id or empty value must not reach
                // the compare step; treat it as a miss and retry.
                if !record.is_usable() {
                    return Err(Error::not_found(format!(
                        "provider returned an unusable record for {rr}.{domain}"
                    )));
                }
                Ok(record)
            })
            .await?;

        info!("published record value is {}", record.value);
        Ok(record)
    }

    async fn update_record(&self, record: &DnsRecord, new_value: &str) -> Result<()> {
        let client = &*self.client;
        self.retry
            .run("record update", || client.update_record(record, new_value))
            .await
    }
}
