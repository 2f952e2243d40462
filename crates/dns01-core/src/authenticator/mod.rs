//! DNS-01 authenticator orchestration
//!
//! The DnsAuthenticator is responsible for:
//! - Resolving validation record names into root domain and host record
//! - Reusing an existing matching TXT record instead of creating a duplicate
//! - Creating the TXT record via DnsProvider and waiting for propagation
//! - Tracking created record IDs so cleanup can delete by ID
//!
//! ## Architecture
//!
//! ```text
//!                        ┌──────────────────┐
//!   perform / cleanup ──▶│ DnsAuthenticator │
//!                        └──────────────────┘
//!                                 │
//!         ┌───────────────────────┼───────────────────────┐
//!         │                       │                       │
//!         ▼                       ▼                       ▼
//! ┌──────────────┐        ┌──────────────┐        ┌───────────────┐
//! │   resolver   │        │ DnsProvider  │        │ RecordTracker │
//! │ (root + RR)  │        │ (list/add/rm)│        │ (name → id)   │
//! └──────────────┘        └──────────────┘        └───────────────┘
//! ```
//!
//! ## Perform
//!
//! 1. Resolve root domain and host record
//! 2. List TXT records for the host record
//! 3. Matching value found → track its ID, done
//! 4. Otherwise create the record, track its ID
//! 5. Sleep for the propagation delay
//!
//! Any failure is returned as [`Error::Plugin`].
//!
//! ## Cleanup
//!
//! 1. Tracked ID with the same value → delete it, untrack, done
//! 2. Otherwise resolve, list, delete the first record with a matching value
//! 3. Nothing matched → warn, done
//!
//! Failures are logged and swallowed.

use crate::config::AuthenticatorConfig;
use crate::error::{Error, Result};
use crate::resolver;
use crate::state::RecordTracker;
use crate::traits::{Authenticator, DnsProvider, TXT_RECORD_TYPE};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Result of publishing a validation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PerformOutcome {
    /// A new record was created
    Created {
        /// The provider-assigned record ID
        record_id: String,
    },
    /// A record with the same value already existed and was reused
    Found {
        /// The existing record ID
        record_id: String,
    },
}

impl PerformOutcome {
    /// The record ID now tracked for the validation name
    pub fn record_id(&self) -> &str {
        match self {
            PerformOutcome::Created { record_id } | PerformOutcome::Found { record_id } => {
                record_id
            }
        }
    }
}

/// Result of removing a validation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// The record was deleted
    Deleted {
        /// The deleted record ID
        record_id: String,
    },
    /// No tracked ID and no record with a matching value
    NotFound,
}

/// DNS-01 authenticator over a single DNS provider
///
/// Owns its provider and its [`RecordTracker`]; neither is shared.
///
/// ## Lifecycle
///
/// 1. Create with [`DnsAuthenticator::new()`]
/// 2. Call `perform` for each challenge
/// 3. Call `cleanup` for each challenge once validation is decided
/// 4. Drop; tracked IDs are not persisted
pub struct DnsAuthenticator {
    /// DNS provider for managing records
    provider: Box<dyn DnsProvider>,

    /// Validation name → record ID, for this session only
    tracker: RecordTracker,

    /// TTL of created records (in seconds)
    ttl: u32,

    /// Wait after creating a record
    propagation_delay: Duration,
}

impl DnsAuthenticator {
    /// Create a new authenticator with an empty tracker
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn new(provider: Box<dyn DnsProvider>, config: AuthenticatorConfig) -> Result<Self> {
        Self::with_tracker(provider, config, RecordTracker::new())
    }

    /// Create a new authenticator that takes ownership of `tracker`
    pub fn with_tracker(
        provider: Box<dyn DnsProvider>,
        config: AuthenticatorConfig,
        tracker: RecordTracker,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            provider,
            tracker,
            ttl: config.ttl,
            propagation_delay: config.propagation_delay(),
        })
    }

    /// Records tracked so far in this session
    pub fn tracker(&self) -> &RecordTracker {
        &self.tracker
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Publish a TXT record for `validation_name`, reusing a matching one
    ///
    /// Provider and resolution errors are returned unwrapped; `perform` wraps
    /// them for the host.
    pub async fn add_txt_record(
        &mut self,
        validation_name: &str,
        validation: &str,
    ) -> Result<PerformOutcome> {
        let resolved = resolver::resolve(validation_name)?;

        debug!("Adding TXT record: {} -> {}", validation_name, validation);

        let existing = self
            .provider
            .list_records(&resolved.root_domain, &resolved.host_record, TXT_RECORD_TYPE)
            .await?;

        if let Some(record) = existing.into_iter().find(|record| record.value == validation) {
            info!(
                "TXT record already exists: {} (id: {})",
                validation_name, record.record_id
            );
            self.tracker
                .put(validation_name, record.record_id.clone(), validation);
            return Ok(PerformOutcome::Found {
                record_id: record.record_id,
            });
        }

        let record_id = self
            .provider
            .create_record(
                &resolved.root_domain,
                &resolved.host_record,
                TXT_RECORD_TYPE,
                validation,
                self.ttl,
            )
            .await?;

        info!(
            "Created TXT record: {}.{} (id: {}, ttl: {})",
            resolved.host_record, resolved.root_domain, record_id, self.ttl
        );
        self.tracker.put(validation_name, record_id.clone(), validation);

        debug!(
            "Waiting {}s for DNS propagation",
            self.propagation_delay.as_secs()
        );
        tokio::time::sleep(self.propagation_delay).await;

        Ok(PerformOutcome::Created { record_id })
    }

    /// Delete the TXT record for `validation_name`
    ///
    /// Uses the tracked ID when it was tracked for this same value, otherwise
    /// looks the record up by value. Errors are returned; `cleanup` logs and swallows them.
    pub async fn remove_txt_record(
        &mut self,
        validation_name: &str,
        validation: &str,
    ) -> Result<CleanupOutcome> {
        debug!("Removing TXT record: {}", validation_name);

        // A shared validation name may track a record with another value
        if let Some(record_id) = self
            .tracker
            .record_for(validation_name, validation)
            .map(str::to_owned)
        {
            self.provider.delete_record(&record_id).await?;
            self.tracker.remove(validation_name);
            info!("Deleted TXT record: {} (id: {})", validation_name, record_id);
            return Ok(CleanupOutcome::Deleted { record_id });
        }

        let resolved = resolver::resolve(validation_name)?;
        let existing = self
            .provider
            .list_records(&resolved.root_domain, &resolved.host_record, TXT_RECORD_TYPE)
            .await?;

        match existing.into_iter().find(|record| record.value == validation) {
            Some(record) => {
                self.provider.delete_record(&record.record_id).await?;
                info!(
                    "Deleted TXT record: {} (id: {})",
                    validation_name, record.record_id
                );
                Ok(CleanupOutcome::Deleted {
                    record_id: record.record_id,
                })
            }
            None => {
                warn!("TXT record to delete not found: {}", validation_name);
                Ok(CleanupOutcome::NotFound)
            }
        }
    }
}

#[async_trait]
impl Authenticator for DnsAuthenticator {
    async fn perform(
        &mut self,
        domain: &str,
        validation_name: &str,
        validation: &str,
    ) -> Result<()> {
        debug!("Performing DNS-01 challenge for {}", domain);

        match self.add_txt_record(validation_name, validation).await {
            Ok(_) => Ok(()),
            Err(e) => {
                error!("Failed to add TXT record {}: {}", validation_name, e);
                Err(Error::plugin(format!(
                    "Failed to add TXT record {}: {}",
                    validation_name, e
                )))
            }
        }
    }

    async fn cleanup(&mut self, domain: &str, validation_name: &str, validation: &str) {
        debug!("Cleaning up DNS-01 challenge for {}", domain);

        if let Err(e) = self.remove_txt_record(validation_name, validation).await {
            warn!(
                "Failed to clean up TXT record {}, certificate issuance is unaffected: {}",
                validation_name, e
            );
        }
    }

    fn more_info(&self) -> String {
        format!(
            "Completes DNS-01 challenges by creating and removing TXT records through the {} API.",
            self.provider.provider_name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perform_outcome_record_id() {
        let created = PerformOutcome::Created {
            record_id: "1".to_string(),
        };
        let found = PerformOutcome::Found {
            record_id: "2".to_string(),
        };

        assert_eq!(created.record_id(), "1");
        assert_eq!(found.record_id(), "2");
        assert_ne!(created, found);
    }
}
