// # Alidns Provider Real Environment Validation Tool
//
// Exercises the Alidns provider against the real Alibaba Cloud DNS API in a
// controlled environment.
//
// ## Usage
//
// ```bash
// # Dry-run mode (default - read only)
// ALIDNS_ACCESS_KEY_ID=your_key_id \
// ALIDNS_ACCESS_KEY_SECRET=your_key_secret \
// DNS01_RECORD_NAME=_acme-challenge.test.example.com \
// cargo run --bin alidns_validation
//
// # Live mode (makes actual changes!)
// DNS01_MODE=live \
// ALIDNS_ACCESS_KEY_ID=your_key_id \
// ALIDNS_ACCESS_KEY_SECRET=your_key_secret \
// DNS01_RECORD_NAME=_acme-challenge.test.example.com \
// cargo run --bin alidns_validation
// ```
//
// ## Environment Variables
//
// Required:
// - `ALIDNS_ACCESS_KEY_ID`: AccessKey ID
// - `ALIDNS_ACCESS_KEY_SECRET`: AccessKey secret
// - `DNS01_RECORD_NAME`: Validation record name to test with
//
// Optional:
// - `ALIDNS_REGION_ID`: Region (default: cn-hangzhou)
// - `DNS01_TEST_VALUE`: TXT value to publish (default: dns01-validation-test)
// - `DNS01_MODE`: "dry-run" or "live" (default: dry-run)

use dns01_core::traits::{DnsProvider, TXT_RECORD_TYPE};
use dns01_core::{AuthenticatorConfig, Credentials, DnsAuthenticator, PerformOutcome, resolver};
use dns01_provider_alidns::AlidnsProvider;
use std::env;
use std::process::ExitCode;

fn required(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => {
            tracing::error!("{} environment variable is required", name);
            None
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("=== Alidns Provider Real Environment Validation ===");

    let (Some(access_key_id), Some(access_key_secret), Some(record_name)) = (
        required("ALIDNS_ACCESS_KEY_ID"),
        required("ALIDNS_ACCESS_KEY_SECRET"),
        required("DNS01_RECORD_NAME"),
    ) else {
        return ExitCode::FAILURE;
    };

    let region_id = env::var("ALIDNS_REGION_ID").ok();
    let test_value =
        env::var("DNS01_TEST_VALUE").unwrap_or_else(|_| "dns01-validation-test".to_string());
    let mode = env::var("DNS01_MODE").unwrap_or_else(|_| "dry-run".to_string());
    let dry_run = mode.to_lowercase() != "live";

    if dry_run {
        tracing::warn!("Running in DRY-RUN mode - records are only listed");
    } else {
        tracing::warn!("Running in LIVE mode - will make actual DNS changes!");
    }

    let resolved = match resolver::resolve(&record_name) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::error!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("Configuration:");
    tracing::info!("  Record: {}", record_name);
    tracing::info!("  Root domain: {}", resolved.root_domain);
    tracing::info!("  Host record: {}", resolved.host_record);
    tracing::info!("  Value: {}", test_value);
    tracing::info!("  Mode: {}", mode);

    // Step 1: provider
    tracing::info!("--- Step 1: Creating Alidns Provider ---");
    let credentials = Credentials::new(access_key_id, access_key_secret, region_id);
    let provider = match AlidnsProvider::new(credentials) {
        Ok(provider) => provider,
        Err(e) => {
            tracing::error!("✗ Provider creation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("Provider created for {}", provider.endpoint());
    tracing::info!("AccessKey secret validated (not shown for security)");

    // Step 2: lookup
    tracing::info!("--- Step 2: Listing Existing TXT Records ---");
    match provider
        .list_records(&resolved.root_domain, &resolved.host_record, TXT_RECORD_TYPE)
        .await
    {
        Ok(records) => {
            tracing::info!("✓ Found {} record(s)", records.len());
            for record in &records {
                tracing::info!("  {} = {:?} (id {}, ttl {})", record.host_record, record.value, record.record_id, record.ttl);
            }
        }
        Err(e) => {
            tracing::error!("✗ Lookup failed: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if dry_run {
        tracing::info!("=== DRY-RUN COMPLETE ===");
        tracing::info!("No changes were made to DNS records.");
        tracing::info!("To make actual changes, set DNS01_MODE=live");
        return ExitCode::SUCCESS;
    }

    let settings = AuthenticatorConfig::default().with_propagation_seconds(0);
    let mut authenticator = match DnsAuthenticator::new(Box::new(provider), settings) {
        Ok(authenticator) => authenticator,
        Err(e) => {
            tracing::error!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Step 3: publish
    tracing::info!("--- Step 3: Publishing TXT Record ---");
    let record_id = match authenticator.add_txt_record(&record_name, &test_value).await {
        Ok(outcome) => {
            tracing::info!("✓ Publish succeeded: {:?}", outcome);
            outcome.record_id().to_string()
        }
        Err(e) => {
            tracing::error!("✗ Publish failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Step 4: idempotency
    tracing::info!("--- Step 4: Testing Idempotency ---");
    match authenticator.add_txt_record(&record_name, &test_value).await {
        Ok(PerformOutcome::Found { .. }) => {
            tracing::info!("✓ Idempotency verified (existing record reused)");
        }
        Ok(outcome) => {
            tracing::warn!("⚠ Record created again ({:?}); clean it up manually", outcome);
        }
        Err(e) => {
            tracing::error!("✗ Idempotency test failed: {}", e);
        }
    }

    // Step 5: cleanup
    tracing::info!("--- Step 5: Removing TXT Record {} ---", record_id);
    match authenticator.remove_txt_record(&record_name, &test_value).await {
        Ok(outcome) => tracing::info!("✓ Cleanup succeeded: {:?}", outcome),
        Err(e) => {
            tracing::error!("✗ Cleanup failed: {}", e);
            return ExitCode::FAILURE;
        }
    }

    tracing::info!("=== LIVE MODE COMPLETE ===");
    tracing::info!("✓ Provider creation: OK");
    tracing::info!("✓ Lookup: OK");
    tracing::info!("✓ Publish: OK");
    tracing::info!("✓ Cleanup: OK");
    tracing::info!("✓ Security: AccessKey secret not logged");

    ExitCode::SUCCESS
}
