//! Minimal embedding example for dns01-core
//!
//! This example plugs a custom in-memory provider into the plugin registry and
//! drives one perform/cleanup cycle the way a certificate client would.

use dns01_core::traits::{
    Authenticator, AuthenticatorFactory, DnsProvider, DnsRecord, PluginArgument,
};
use dns01_core::{AuthenticatorConfig, DnsAuthenticator, Error, PluginConfig, PluginRegistry, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Zone contents shared between the provider and the application
type Zone = Arc<Mutex<Vec<(String, DnsRecord)>>>;

/// Custom DNS provider for embedded usage
struct InMemoryProvider {
    zone: Zone,
    next_id: AtomicU64,
}

impl InMemoryProvider {
    fn new(zone: Zone) -> Self {
        Self {
            zone,
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for InMemoryProvider {
    async fn list_records(
        &self,
        root_domain: &str,
        host_record: &str,
        record_type: &str,
    ) -> Result<Vec<DnsRecord>> {
        let zone = self.zone.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(zone
            .iter()
            .filter(|(root, record)| {
                root == root_domain
                    && record.host_record == host_record
                    && record.record_type == record_type
            })
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn create_record(
        &self,
        root_domain: &str,
        host_record: &str,
        record_type: &str,
        value: &str,
        ttl: u32,
    ) -> Result<String> {
        let record_id = format!("mem-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        println!("[Embedded] Creating {}.{} {} {}", host_record, root_domain, record_type, value);

        let mut zone = self.zone.lock().unwrap_or_else(PoisonError::into_inner);
        zone.push((
            root_domain.to_string(),
            DnsRecord {
                record_id: record_id.clone(),
                host_record: host_record.to_string(),
                record_type: record_type.to_string(),
                value: value.to_string(),
                ttl,
                line: None,
            },
        ));
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
        let mut zone = self.zone.lock().unwrap_or_else(PoisonError::into_inner);
        let (_, record) = zone
            .iter_mut()
            .find(|(_, record)| record.record_id == record_id)
            .ok_or_else(|| Error::provider("memory", format!("No record {}", record_id)))?;
        record.host_record = host_record.to_string();
        record.record_type = record_type.to_string();
        record.value = value.to_string();
        record.ttl = ttl;
        Ok(())
    }

    async fn delete_record(&self, record_id: &str) -> Result<()> {
        println!("[Embedded] Deleting {}", record_id);
        let mut zone = self.zone.lock().unwrap_or_else(PoisonError::into_inner);
        let before = zone.len();
        zone.retain(|(_, record)| record.record_id != record_id);
        if zone.len() == before {
            return Err(Error::provider("memory", format!("No record {}", record_id)));
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

/// Plugin factory handing out authenticators over the shared zone
struct InMemoryFactory {
    zone: Zone,
}

impl AuthenticatorFactory for InMemoryFactory {
    fn description(&self) -> &'static str {
        "Publish DNS-01 records into an in-process zone"
    }

    fn add_parser_arguments(&self, add: &mut dyn FnMut(PluginArgument)) {
        add(PluginArgument::new("propagation-seconds", "Seconds to wait after creating").with_default("0"));
    }

    fn create(&self, config: &PluginConfig) -> Result<Box<dyn Authenticator>> {
        let seconds = config.parse::<u64>("propagation-seconds")?.unwrap_or(0);
        let settings = AuthenticatorConfig::default().with_propagation_seconds(seconds);
        let provider = InMemoryProvider::new(Arc::clone(&self.zone));
        Ok(Box::new(DnsAuthenticator::new(Box::new(provider), settings)?))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Embedded dns01-core Example ===\n");

    let zone: Zone = Arc::new(Mutex::new(Vec::new()));

    println!("1. Registering plugins...");
    let registry = PluginRegistry::new();
    registry.register_authenticator(
        "dns-memory",
        Box::new(InMemoryFactory {
            zone: Arc::clone(&zone),
        }),
    );
    dns01_provider_alidns::register(&registry);
    for name in registry.list_authenticators() {
        println!("   {}: {}", name, registry.description(&name)?);
    }

    println!("\n2. Creating authenticator from parsed arguments...");
    let mut config = PluginConfig::new();
    for argument in registry.parser_arguments("dns-memory")? {
        if let Some(default) = argument.default {
            config.set(argument.name, default);
        }
    }
    let mut authenticator = registry.create_authenticator("dns-memory", &config)?;
    println!("   {}", authenticator.more_info());

    println!("\n3. Performing challenges...");
    authenticator
        .perform("example.com", "_acme-challenge.example.com", "token-apex")
        .await?;
    authenticator
        .perform("www.example.com", "_acme-challenge.www.example.com", "token-www")
        .await?;
    // Retried by the client: reuses the existing record
    authenticator
        .perform("example.com", "_acme-challenge.example.com", "token-apex")
        .await?;

    {
        let zone = zone.lock().unwrap_or_else(PoisonError::into_inner);
        println!("   Zone now holds {} record(s):", zone.len());
        for (root, record) in zone.iter() {
            println!("   - {}.{} TXT {:?} (id {})", record.host_record, root, record.value, record.record_id);
        }
    }

    println!("\n4. Cleaning up...");
    authenticator
        .cleanup("example.com", "_acme-challenge.example.com", "token-apex")
        .await;
    authenticator
        .cleanup("www.example.com", "_acme-challenge.www.example.com", "token-www")
        .await;
    // Nothing left to remove; logged and ignored
    authenticator
        .cleanup("example.com", "_acme-challenge.example.com", "token-apex")
        .await;

    let remaining = zone.lock().unwrap_or_else(PoisonError::into_inner).len();
    println!("   Zone now holds {} record(s)", remaining);

    println!("\n=== Embedding Successful ===");
    println!("Key Points:");
    println!("- Plugins are registered by name, never hard-coded");
    println!("- Retried performs do not duplicate records");
    println!("- Cleanup never fails the caller");

    Ok(())
}
