// # Alibaba Cloud DNS Provider
//
// This crate provides the Alibaba Cloud DNS ("Alidns") provider and the
// `dns-alidns` authenticator plugin.
//
// ## Behaviour
//
// - ✅ One signed HTTP request per trait method
// - ✅ Full error propagation (every failure is a provider error)
// - ✅ HTTP timeout configured (30 seconds)
// - ✅ Status-specific messages for 401/403, 429/Throttling and 5xx
// - ✅ Exact host-record filtering on top of the fuzzy `RRKeyWord` search
// - ❌ NO retry or backoff logic
// - ❌ NO caching
//
// ## Security Requirements
//
// - Access key secret NEVER appears in logs, errors or Debug output
// - Provider MUST fail fast if credentials are empty
//
// ## API Reference
//
// - Endpoint: `https://alidns.<region>.aliyuncs.com/`, RPC style, version 2015-01-09
// - List records: `DescribeDomainRecords` (DomainName, RRKeyWord, Type)
// - Add record: `AddDomainRecord` (DomainName, RR, Type, Value, TTL)
// - Update record: `UpdateDomainRecord` (RecordId, RR, Type, Value, TTL)
// - Delete record: `DeleteDomainRecord` (RecordId)

pub mod signature;

use async_trait::async_trait;
use dns01_core::config::{AuthenticatorConfig, Credentials, PluginConfig};
use dns01_core::traits::{Authenticator, AuthenticatorFactory, DnsProvider, DnsRecord, PluginArgument};
use dns01_core::{DnsAuthenticator, Error, PluginRegistry, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Provider name used in errors and logs
const PROVIDER_NAME: &str = "alidns";

/// Plugin name under which the authenticator is registered
pub const PLUGIN_NAME: &str = "dns-alidns";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest page `DescribeDomainRecords` accepts
const MAX_PAGE_SIZE: u32 = 500;

/// Default API endpoint for a region
pub fn default_endpoint(region_id: &str) -> String {
    format!("https://alidns.{}.aliyuncs.com/", region_id)
}

/// `DescribeDomainRecords` response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeDomainRecordsResponse {
    #[serde(default)]
    total_count: u64,
    domain_records: Option<DomainRecords>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DomainRecords {
    #[serde(default)]
    record: Vec<RecordEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RecordEntry {
    record_id: String,
    #[serde(rename = "RR")]
    rr: String,
    #[serde(rename = "Type")]
    record_type: String,
    value: String,
    #[serde(rename = "TTL")]
    ttl: u32,
    line: Option<String>,
}

impl From<RecordEntry> for DnsRecord {
    fn from(entry: RecordEntry) -> Self {
        DnsRecord {
            record_id: entry.record_id,
            host_record: entry.rr,
            record_type: entry.record_type,
            value: entry.value,
            ttl: entry.ttl,
            line: entry.line,
        }
    }
}

/// `AddDomainRecord` / `UpdateDomainRecord` / `DeleteDomainRecord` response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RecordIdResponse {
    record_id: Option<String>,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
    request_id: Option<String>,
}

/// Map a failed response to a provider error
fn api_error(status: u16, body: &str) -> Error {
    let parsed: Option<ApiErrorBody> = serde_json::from_str(body).ok();
    let code = parsed
        .as_ref()
        .and_then(|b| b.code.clone())
        .unwrap_or_else(|| "Unknown".to_string());
    let message = parsed
        .as_ref()
        .and_then(|b| b.message.clone())
        .unwrap_or_else(|| body.to_string());
    let request_id = parsed
        .and_then(|b| b.request_id)
        .unwrap_or_else(|| "-".to_string());

    let detail = format!(
        "{} - {} (status: {}, request id: {})",
        code, message, status, request_id
    );

    if status == 401
        || status == 403
        || code.starts_with("InvalidAccessKeyId")
        || code.starts_with("SignatureDoesNotMatch")
        || code.starts_with("Forbidden")
    {
        Error::provider(
            PROVIDER_NAME,
            format!("Authentication failed: Invalid access key or insufficient permissions. {}", detail),
        )
    } else if status == 429 || code.starts_with("Throttling") {
        Error::provider(
            PROVIDER_NAME,
            format!("Rate limit exceeded. Please retry later. {}", detail),
        )
    } else if (500..=599).contains(&status) {
        Error::provider(
            PROVIDER_NAME,
            format!("Alidns server error (transient): {}", detail),
        )
    } else {
        Error::provider(PROVIDER_NAME, format!("Request failed: {}", detail))
    }
}

/// Alibaba Cloud DNS provider
///
/// Stateless: every call signs and sends one RPC request.
///
/// # Security
///
/// The Debug implementation does NOT expose the access key secret.
pub struct AlidnsProvider {
    /// API credentials
    /// ⚠️ NEVER log the secret
    credentials: Credentials,

    /// RPC endpoint, ending in `/`
    endpoint: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that relies on Credentials hiding the secret
impl std::fmt::Debug for AlidnsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlidnsProvider")
            .field("credentials", &self.credentials)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl AlidnsProvider {
    /// Create a new Alidns provider for the credentials' region
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the credentials are incomplete or the
    /// HTTP client cannot be built.
    pub fn new(credentials: Credentials) -> Result<Self> {
        let endpoint = default_endpoint(&credentials.region_id);
        Self::with_endpoint(credentials, endpoint)
    }

    /// Create a new Alidns provider against an explicit endpoint
    pub fn with_endpoint(credentials: Credentials, endpoint: impl Into<String>) -> Result<Self> {
        credentials.validate()?;

        let mut endpoint = endpoint.into();
        if endpoint.is_empty() {
            return Err(Error::config("Alidns endpoint cannot be empty"));
        }
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }

        // Build HTTP client with timeout
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            credentials,
            endpoint,
            client,
        })
    }

    /// The endpoint requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one signed RPC request and decode the JSON body
    async fn call<T: DeserializeOwned>(&self, action: &str, params: &[(&str, String)]) -> Result<T> {
        let timestamp = chrono::Utc::now()
            .format(signature::TIMESTAMP_FORMAT)
            .to_string();
        let nonce = uuid::Uuid::new_v4().to_string();
        let query = signature::signed_query(&self.credentials, action, params, &timestamp, &nonce)?;

        tracing::debug!("Calling Alidns {} at {}", action, self.endpoint);

        let url = format!("{}?{}", self.endpoint, query);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, format!("HTTP request failed: {}", e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, format!("Failed to read response: {}", e.without_url())))?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            Error::provider(
                PROVIDER_NAME,
                format!("Invalid {} response format: {}", action, e),
            )
        })
    }
}

/// Keep records whose RR matches exactly; `RRKeyWord` is a fuzzy search
fn exact_matches(response: DescribeDomainRecordsResponse, host_record: &str) -> Vec<DnsRecord> {
    let entries = response.domain_records.map(|r| r.record).unwrap_or_default();
    if response.total_count > entries.len() as u64 {
        tracing::debug!(
            "Alidns reported {} records, received {}",
            response.total_count,
            entries.len()
        );
    }

    entries
        .into_iter()
        .filter(|entry| entry.rr.eq_ignore_ascii_case(host_record))
        .map(DnsRecord::from)
        .collect()
}

#[async_trait]
impl DnsProvider for AlidnsProvider {
    async fn list_records(
        &self,
        root_domain: &str,
        host_record: &str,
        record_type: &str,
    ) -> Result<Vec<DnsRecord>> {
        tracing::debug!(
            "Looking up {} records: {}.{}",
            record_type,
            host_record,
            root_domain
        );

        let response: DescribeDomainRecordsResponse = self
            .call(
                "DescribeDomainRecords",
                &[
                    ("DomainName", root_domain.to_string()),
                    ("RRKeyWord", host_record.to_string()),
                    ("Type", record_type.to_string()),
                    ("PageSize", MAX_PAGE_SIZE.to_string()),
                ],
            )
            .await?;

        let records = exact_matches(response, host_record);
        tracing::debug!("Found {} matching record(s)", records.len());
        Ok(records)
    }

    async fn create_record(
        &self,
        root_domain: &str,
        host_record: &str,
        record_type: &str,
        value: &str,
        ttl: u32,
    ) -> Result<String> {
        let response: RecordIdResponse = self
            .call(
                "AddDomainRecord",
                &[
                    ("DomainName", root_domain.to_string()),
                    ("RR", host_record.to_string()),
                    ("Type", record_type.to_string()),
                    ("Value", value.to_string()),
                    ("TTL", ttl.to_string()),
                ],
            )
            .await?;

        let record_id = response
            .record_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::provider(PROVIDER_NAME, "AddDomainRecord returned no record ID"))?;

        tracing::info!(
            "Added DNS record: {}.{} -> {} (id: {})",
            host_record,
            root_domain,
            value,
            record_id
        );
        Ok(record_id)
    }

    async fn update_record(
        &self,
        record_id: &str,
        host_record: &str,
        record_type: &str,
        value: &str,
        ttl: u32,
    ) -> Result<()> {
        let _: RecordIdResponse = self
            .call(
                "UpdateDomainRecord",
                &[
                    ("RecordId", record_id.to_string()),
                    ("RR", host_record.to_string()),
                    ("Type", record_type.to_string()),
                    ("Value", value.to_string()),
                    ("TTL", ttl.to_string()),
                ],
            )
            .await?;

        tracing::info!("Updated DNS record: {}", record_id);
        Ok(())
    }

    async fn delete_record(&self, record_id: &str) -> Result<()> {
        let _: RecordIdResponse = self
            .call("DeleteDomainRecord", &[("RecordId", record_id.to_string())])
            .await?;

        tracing::info!("Deleted DNS record: {}", record_id);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Factory for the `dns-alidns` authenticator plugin
pub struct AlidnsAuthenticatorFactory;

impl AlidnsAuthenticatorFactory {
    /// Build provider credentials from parsed plugin arguments
    fn credentials(config: &PluginConfig) -> Result<Credentials> {
        Ok(Credentials::new(
            config.require("access-key-id")?,
            config.require("access-key-secret")?,
            config.get("region-id").map(str::to_string),
        ))
    }

    /// Build authenticator settings from parsed plugin arguments
    fn authenticator_config(config: &PluginConfig) -> Result<AuthenticatorConfig> {
        let mut settings = AuthenticatorConfig::default();
        if let Some(ttl) = config.parse::<u32>("ttl")? {
            settings = settings.with_ttl(ttl);
        }
        if let Some(seconds) = config.parse::<u64>("propagation-seconds")? {
            settings = settings.with_propagation_seconds(seconds);
        }
        Ok(settings)
    }
}

impl AuthenticatorFactory for AlidnsAuthenticatorFactory {
    fn description(&self) -> &'static str {
        "Obtain certificates using a DNS TXT record (if you are using Alibaba Cloud DNS)."
    }

    fn add_parser_arguments(&self, add: &mut dyn FnMut(PluginArgument)) {
        add(PluginArgument::new("access-key-id", "Alibaba Cloud AccessKey ID").with_env("ALIDNS_ACCESS_KEY_ID"));
        add(
            PluginArgument::new("access-key-secret", "Alibaba Cloud AccessKey Secret")
                .with_env("ALIDNS_ACCESS_KEY_SECRET")
                .secret(),
        );
        add(
            PluginArgument::new("region-id", "Alibaba Cloud region ID")
                .with_env("ALIDNS_REGION_ID")
                .with_default(dns01_core::config::DEFAULT_REGION_ID),
        );
        add(PluginArgument::new("endpoint", "Override the Alidns API endpoint").with_env("ALIDNS_ENDPOINT"));
        add(
            PluginArgument::new("ttl", "TTL of the validation TXT record, in seconds")
                .with_default(dns01_core::traits::DEFAULT_TTL.to_string()),
        );
        add(
            PluginArgument::new(
                "propagation-seconds",
                "Seconds to wait after creating the TXT record",
            )
            .with_default(AuthenticatorConfig::default().propagation_seconds.to_string()),
        );
    }

    fn create(&self, config: &PluginConfig) -> Result<Box<dyn Authenticator>> {
        let credentials = Self::credentials(config)?;
        let settings = Self::authenticator_config(config)?;

        let provider = match config.get("endpoint") {
            Some(endpoint) => {
                tracing::warn!("Using non-default Alidns endpoint: {}", endpoint);
                AlidnsProvider::with_endpoint(credentials, endpoint)?
            }
            None => AlidnsProvider::new(credentials)?,
        };

        Ok(Box::new(DnsAuthenticator::new(Box::new(provider), settings)?))
    }
}

/// Register the Alidns authenticator with a registry
///
/// # Example
///
/// ```rust
/// use dns01_core::PluginRegistry;
///
/// let registry = PluginRegistry::new();
/// dns01_provider_alidns::register(&registry);
/// assert!(registry.has_authenticator("dns-alidns"));
/// ```
pub fn register(registry: &PluginRegistry) {
    registry.register_authenticator(PLUGIN_NAME, Box::new(AlidnsAuthenticatorFactory));
}
