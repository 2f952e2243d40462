//! Test doubles and common utilities for authenticator contract tests
//!
//! The mock provider keeps an in-memory zone and records every call, so tests
//! can assert exactly which remote operations an authenticator issued.

#![allow(dead_code)]

use dns01_core::config::AuthenticatorConfig;
use dns01_core::error::{Error, Result};
use dns01_core::traits::{DnsProvider, DnsRecord};
use dns01_core::DnsAuthenticator;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A create call as seen by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCall {
    pub root_domain: String,
    pub host_record: String,
    pub record_type: String,
    pub value: String,
    pub ttl: u32,
}

/// Operations the mock can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

/// A mock DnsProvider backed by an in-memory zone
pub struct MockDnsProvider {
    /// (root domain, record) pairs currently "published"
    zone: Arc<Mutex<Vec<(String, DnsRecord)>>>,
    /// Next record ID to hand out
    next_id: Arc<AtomicUsize>,
    /// Call counter for list_records()
    list_call_count: Arc<AtomicUsize>,
    /// Recorded create_record() calls
    create_calls: Arc<Mutex<Vec<CreateCall>>>,
    /// Recorded delete_record() IDs
    delete_calls: Arc<Mutex<Vec<String>>>,
    /// Operations that return a provider error
    failing: Arc<Mutex<HashSet<Operation>>>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            zone: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicUsize::new(1001)),
            list_call_count: Arc::new(AtomicUsize::new(0)),
            create_calls: Arc::new(Mutex::new(Vec::new())),
            delete_calls: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Create a new MockDnsProvider that shares zone and counters with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            zone: Arc::clone(&other.zone),
            next_id: Arc::clone(&other.next_id),
            list_call_count: Arc::clone(&other.list_call_count),
            create_calls: Arc::clone(&other.create_calls),
            delete_calls: Arc::clone(&other.delete_calls),
            failing: Arc::clone(&other.failing),
        }
    }

    /// Publish a TXT record directly, bypassing call recording
    pub fn seed_txt(&self, root_domain: &str, host_record: &str, value: &str, record_id: &str) {
        self.zone.lock().unwrap().push((
            root_domain.to_string(),
            DnsRecord {
                record_id: record_id.to_string(),
                host_record: host_record.to_string(),
                record_type: "TXT".to_string(),
                value: value.to_string(),
                ttl: 600,
                line: Some("default".to_string()),
            },
        ));
    }

    /// Make an operation fail from now on
    pub fn fail(&self, operation: Operation) {
        self.failing.lock().unwrap().insert(operation);
    }

    /// Make an operation succeed again
    pub fn recover(&self, operation: Operation) {
        self.failing.lock().unwrap().remove(&operation);
    }

    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> Vec<CreateCall> {
        self.create_calls.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }

    /// Records currently published under `root_domain`
    pub fn published(&self, root_domain: &str) -> Vec<DnsRecord> {
        self.zone
            .lock()
            .unwrap()
            .iter()
            .filter(|(root, _)| root == root_domain)
            .map(|(_, record)| record.clone())
            .collect()
    }

    fn check(&self, operation: Operation) -> Result<()> {
        if self.failing.lock().unwrap().contains(&operation) {
            return Err(Error::provider(
                "mock",
                format!("{:?} failed: ServiceUnavailable", operation),
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_records(
        &self,
        root_domain: &str,
        host_record: &str,
        record_type: &str,
    ) -> Result<Vec<DnsRecord>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        self.check(Operation::List)?;

        Ok(self
            .zone
            .lock()
            .unwrap()
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
        self.create_calls.lock().unwrap().push(CreateCall {
            root_domain: root_domain.to_string(),
            host_record: host_record.to_string(),
            record_type: record_type.to_string(),
            value: value.to_string(),
            ttl,
        });
        self.check(Operation::Create)?;

        let record_id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        self.zone.lock().unwrap().push((
            root_domain.to_string(),
            DnsRecord {
                record_id: record_id.clone(),
                host_record: host_record.to_string(),
                record_type: record_type.to_string(),
                value: value.to_string(),
                ttl,
                line: Some("default".to_string()),
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
        self.check(Operation::Update)?;

        let mut zone = self.zone.lock().unwrap();
        let (_, record) = zone
            .iter_mut()
            .find(|(_, record)| record.record_id == record_id)
            .ok_or_else(|| Error::provider("mock", "DomainRecordNotBelongToUser"))?;
        record.host_record = host_record.to_string();
        record.record_type = record_type.to_string();
        record.value = value.to_string();
        record.ttl = ttl;
        Ok(())
    }

    async fn delete_record(&self, record_id: &str) -> Result<()> {
        self.delete_calls.lock().unwrap().push(record_id.to_string());
        self.check(Operation::Delete)?;

        let mut zone = self.zone.lock().unwrap();
        let before = zone.len();
        zone.retain(|(_, record)| record.record_id != record_id);
        if zone.len() == before {
            return Err(Error::provider("mock", "DomainRecordNotBelongToUser"));
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Authenticator config without a propagation wait
pub fn fast_config() -> AuthenticatorConfig {
    AuthenticatorConfig::default().with_propagation_seconds(0)
}

/// Build an authenticator over a mock that shares state with `provider`
pub fn authenticator_for(provider: &MockDnsProvider) -> DnsAuthenticator {
    DnsAuthenticator::new(
        Box::new(MockDnsProvider::sharing_state_with(provider)),
        fast_config(),
    )
    .expect("authenticator construction succeeds")
}
