// # alidns Record Client
//
// This crate implements the landns `RecordClient` contract against the
// Alibaba Cloud DNS RPC API.
//
// ## Scope
//
// - One HTTP call per trait invocation; full error propagation to the
//   reconciler, which owns all retry policy
// - NO retry logic, NO backoff, NO caching here
// - HTTP timeout configured (30 seconds) so a hung provider call cannot
//   stall a reconcile phase indefinitely
// - The access key secret never appears in logs or Debug output
//
// ## API Reference
//
// - RPC endpoint: https://dns.aliyuncs.com/ (version 2015-01-09)
// - DescribeDomainRecords: GET ?Action=DescribeDomainRecords&DomainName=...
// - UpdateDomainRecord: GET ?Action=UpdateDomainRecord&RecordId=...&RR=...
//   &Type=A&Value=...
// - Every request carries the common parameters (Format, Version,
//   AccessKeyId, SignatureMethod, SignatureVersion, SignatureNonce,
//   Timestamp) and a Signature computed as
//   base64(HMAC-SHA1(secret + "&", "GET&%2F&" + encode(canonical query)))
//   where the canonical query sorts parameters by name and percent-encodes
//   keys and values per RFC 3986.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use hmac::{Hmac, Mac};
use landns_core::error::{Error, Result};
use landns_core::traits::{DnsRecord, RecordClient};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use sha1::Sha1;
use tracing::debug;

/// Default alidns RPC endpoint
pub const DEFAULT_ENDPOINT: &str = "https://dns.aliyuncs.com/";

/// alidns RPC API version
const API_VERSION: &str = "2015-01-09";

/// Timeout applied to every API request
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// RFC 3986 unreserved characters stay literal, everything else is encoded.
/// This matches the alidns signature rules: space becomes `%20`, `*` becomes
/// `%2A`, `~` stays literal.
const SIGNATURE_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

type HmacSha1 = Hmac<Sha1>;

/// `RecordClient` implementation for the Alibaba Cloud DNS RPC API
pub struct AlidnsClient {
    endpoint: String,
    access_key_id: String,
    access_key_secret: String,
    client: reqwest::Client,
}

// The Debug implementation intentionally does NOT expose the key secret.
impl std::fmt::Debug for AlidnsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlidnsClient")
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<REDACTED>")
            .finish()
    }
}

impl AlidnsClient {
    /// Create a new client for `endpoint` with the given credentials
    pub fn new(
        endpoint: impl Into<String>,
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
    ) -> Result<Self> {
        let endpoint = endpoint.into();
        let access_key_id = access_key_id.into();
        let access_key_secret = access_key_secret.into();

        if access_key_id.is_empty() || access_key_secret.is_empty() {
            return Err(Error::config("alidns credentials must not be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint,
            access_key_id,
            access_key_secret,
            client,
        })
    }

    /// Build the fully signed query string for one RPC action
    fn signed_query(&self, action_params: &[(&str, &str)]) -> String {
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let nonce = rand::random::<u64>().to_string();

        let mut params: Vec<(&str, &str)> = vec![
            ("Format", "JSON"),
            ("Version", API_VERSION),
            ("AccessKeyId", self.access_key_id.as_str()),
            ("SignatureMethod", "HMAC-SHA1"),
            ("SignatureVersion", "1.0"),
            ("SignatureNonce", nonce.as_str()),
            ("Timestamp", timestamp.as_str()),
        ];
        params.extend_from_slice(action_params);

        let canonical = canonicalize(&mut params);
        let signing_key = format!("{}&", self.access_key_secret);
        let signature = hmac_sha1_base64(&signing_key, &string_to_sign(&canonical));

        format!("{canonical}&Signature={}", percent_encode(&signature))
    }

    /// Issue one GET request and hand back the raw response
    async fn call(&self, action: &str, action_params: &[(&str, &str)]) -> Result<reqwest::Response> {
        let query = self.signed_query(action_params);
        let url = format!("{}?{}", self.endpoint, query);

        debug!("requesting {action} from {}", self.endpoint);
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("{action} request failed: {e}")))
    }
}

#[async_trait]
impl RecordClient for AlidnsClient {
    async fn fetch_record(&self, domain: &str, rr: &str) -> Result<DnsRecord> {
        let response = self
            .call(
                "DescribeDomainRecords",
                &[("Action", "DescribeDomainRecords"), ("DomainName", domain)],
            )
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            return Err(Error::transport(format!(
                "DescribeDomainRecords returned {status}: {body}"
            )));
        }

        let payload: DescribeDomainRecordsResponse = response.json().await.map_err(|e| {
            Error::transport(format!("failed to parse DescribeDomainRecords response: {e}"))
        })?;

        let entry = payload
            .domain_records
            .record
            .into_iter()
            .find(|entry| entry.rr == rr && entry.record_type == "A")
            .ok_or_else(|| Error::not_found(format!("no A record for {rr}.{domain}")))?;

        if entry.value.trim().is_empty() {
            return Err(Error::not_found(format!(
                "A record for {rr}.{domain} has an empty value"
            )));
        }

        debug!("fetched record {} with value {}", entry.record_id, entry.value);
        Ok(DnsRecord {
            id: entry.record_id,
            rr: entry.rr,
            value: entry.value,
        })
    }

    async fn update_record(&self, record: &DnsRecord, new_value: &str) -> Result<()> {
        let response = self
            .call(
                "UpdateDomainRecord",
                &[
                    ("Action", "UpdateDomainRecord"),
                    ("RecordId", record.id.as_str()),
                    ("RR", record.rr.as_str()),
                    ("Type", "A"),
                    ("Value", new_value),
                ],
            )
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!("record {} updated to {new_value}", record.id);
            return Ok(());
        }

        let body = read_body(response).await;

        // alidns rejects updating a record to the value it already holds.
        // The contract requires idempotent updates, so that rejection is a
        // success from the caller's perspective.
        if let Ok(api_error) = serde_json::from_str::<ApiError>(&body) {
            if api_error.code == "DomainRecordDuplicate" {
                debug!("record {} already holds {new_value}", record.id);
                return Ok(());
            }
        }

        Err(Error::transport(format!(
            "UpdateDomainRecord returned {status}: {body}"
        )))
    }

    fn client_name(&self) -> &'static str {
        "alidns"
    }
}

async fn read_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "unreadable response body".to_string())
}

fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, SIGNATURE_ENCODE).to_string()
}

/// Sort parameters by name and join them as `key=value` pairs, both sides
/// percent-encoded
fn canonicalize(params: &mut Vec<(&str, &str)>) -> String {
    params.sort_unstable();
    params
        .iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn string_to_sign(canonical_query: &str) -> String {
    format!("GET&{}&{}", percent_encode("/"), percent_encode(canonical_query))
}

fn hmac_sha1_base64(key: &str, data: &str) -> String {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(data.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// `DescribeDomainRecords` response body (the fields this client reads)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeDomainRecordsResponse {
    domain_records: DomainRecordList,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DomainRecordList {
    #[serde(default)]
    record: Vec<DomainRecordEntry>,
}

#[derive(Debug, Deserialize)]
struct DomainRecordEntry {
    #[serde(rename = "RecordId")]
    record_id: String,
    #[serde(rename = "RR")]
    rr: String,
    #[serde(rename = "Type")]
    record_type: String,
    #[serde(rename = "Value", default)]
    value: String,
}

/// Error body returned by the RPC API on non-2xx responses
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiError {
    code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_encoding_follows_rfc_3986() {
        assert_eq!(percent_encode("abc-_.~XYZ09"), "abc-_.~XYZ09");
        assert_eq!(percent_encode("a b"), "a%20b");
        assert_eq!(percent_encode("a*b"), "a%2Ab");
        assert_eq!(percent_encode("a/b=c&d"), "a%2Fb%3Dc%26d");
        assert_eq!(percent_encode("192.168.1.42"), "192.168.1.42");
    }

    #[test]
    fn canonical_query_is_sorted_by_parameter_name() {
        let mut params = vec![("Timestamp", "T"), ("Action", "A"), ("Format", "JSON")];
        assert_eq!(canonicalize(&mut params), "Action=A&Format=JSON&Timestamp=T");
    }

    #[test]
    fn string_to_sign_encodes_method_resource_and_query() {
        assert_eq!(string_to_sign("a=1&b=2"), "GET&%2F&a%3D1%26b%3D2");
    }

    #[test]
    fn hmac_sha1_matches_known_vector() {
        // RFC 2202 style vector: HMAC-SHA1("key", "The quick brown fox
        // jumps over the lazy dog")
        assert_eq!(
            hmac_sha1_base64("key", "The quick brown fox jumps over the lazy dog"),
            "3nybhbi3iqa8ino29wqQcBydtNk="
        );
    }

    #[test]
    fn signature_depends_on_the_secret() {
        let a = hmac_sha1_base64("secret-a&", "GET&%2F&x");
        let b = hmac_sha1_base64("secret-b&", "GET&%2F&x");
        assert_ne!(a, b);
    }

    #[test]
    fn empty_credentials_are_rejected() {
        assert!(AlidnsClient::new(DEFAULT_ENDPOINT, "", "secret").is_err());
        assert!(AlidnsClient::new(DEFAULT_ENDPOINT, "key-id", "").is_err());
    }

    #[test]
    fn debug_output_redacts_the_secret() {
        let client = AlidnsClient::new(DEFAULT_ENDPOINT, "key-id", "very-secret-value").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("very-secret-value"));
        assert!(debug.contains("<REDACTED>"));
    }

    #[test]
    fn signed_query_carries_common_parameters() {
        let client = AlidnsClient::new(DEFAULT_ENDPOINT, "key-id", "secret").unwrap();
        let query = client.signed_query(&[("Action", "DescribeDomainRecords")]);

        for expected in [
            "AccessKeyId=key-id",
            "Action=DescribeDomainRecords",
            "Format=JSON",
            "SignatureMethod=HMAC-SHA1",
            "SignatureVersion=1.0",
            "Version=2015-01-09",
            "&Signature=",
        ] {
            assert!(query.contains(expected), "missing '{expected}' in '{query}'");
        }
    }
}
