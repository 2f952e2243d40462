// # DNS Provider Trait
//
// Defines the interface for managing DNS records via provider APIs.
//
// ## Implementations
//
// - Alibaba Cloud DNS: `dns01-provider-alidns` crate
//
// ## Usage
//
// ```rust,ignore
// use dns01_core::traits::{DnsProvider, TXT_RECORD_TYPE};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let record_id = provider
//         .create_record("example.com", "_acme-challenge", TXT_RECORD_TYPE, "token", 600)
//         .await?;
//     provider.delete_record(&record_id).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Record type used for DNS-01 validation records
pub const TXT_RECORD_TYPE: &str = "TXT";

/// Default TTL for validation records (seconds)
pub const DEFAULT_TTL: u32 = 600;

/// A DNS record as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned record ID, required for update and delete
    pub record_id: String,
    /// Host record (RR) relative to the root domain
    pub host_record: String,
    /// Record type (e.g. "TXT")
    pub record_type: String,
    /// Record value
    pub value: String,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// Provider resolution line, if the provider has the concept
    pub line: Option<String>,
}

/// Trait for DNS provider implementations
///
/// Every method is a single remote call. Implementations must not retry,
/// back off or cache; any transport, authentication, rate-limit or
/// malformed-response failure is returned as [`crate::Error::Provider`] and
/// the caller decides whether it is fatal.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List records under `root_domain` matching host record and type
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<DnsRecord>)`: Matching records, empty if there are none
    /// - `Err(Error)`: If the request failed
    async fn list_records(
        &self,
        root_domain: &str,
        host_record: &str,
        record_type: &str,
    ) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Create a record and return its provider-assigned ID
    ///
    /// # Errors
    ///
    /// Fails if the request fails or the provider does not return an ID.
    async fn create_record(
        &self,
        root_domain: &str,
        host_record: &str,
        record_type: &str,
        value: &str,
        ttl: u32,
    ) -> Result<String, crate::Error>;

    /// Replace host record, type, value and TTL of an existing record
    async fn update_record(
        &self,
        record_id: &str,
        host_record: &str,
        record_type: &str,
        value: &str,
        ttl: u32,
    ) -> Result<(), crate::Error>;

    /// Delete a record by ID
    async fn delete_record(&self, record_id: &str) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    ///
    /// # Returns
    ///
    /// A static string identifying the provider (e.g., "alidns")
    fn provider_name(&self) -> &'static str;
}
