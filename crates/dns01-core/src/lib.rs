// # dns01-core
//
// Core library for DNS-01 challenge authenticators.
//
// ## Architecture Overview
//
// This library provides the provider-independent half of a DNS-01
// authenticator:
// - **resolver**: Splits a validation record name into root domain and host record
// - **DnsProvider**: Trait for listing, creating, updating and deleting records via provider APIs
// - **RecordTracker**: In-memory map of validation name to provider record id
// - **DnsAuthenticator**: Orchestrates perform/cleanup over a provider and a tracker
// - **PluginRegistry**: Named authenticator factories the host discovers at runtime
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Orchestration lives here, provider wire formats live in provider crates
// 2. **Plugin-Based**: Authenticators are registered by name, no hard-coded if-else in the host
// 3. **Library-First**: The host binary is a thin layer over this crate
// 4. **Idempotency**: A repeated perform reuses the existing record instead of duplicating it
// 5. **Best-effort cleanup**: Cleanup never fails the certificate flow

pub mod authenticator;
pub mod config;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use authenticator::{CleanupOutcome, DnsAuthenticator, PerformOutcome};
pub use config::{AuthenticatorConfig, Credentials, PluginConfig};
pub use error::{Error, Result};
pub use registry::PluginRegistry;
pub use resolver::ResolvedName;
pub use state::{RecordTracker, TrackedRecord};
pub use traits::{Authenticator, AuthenticatorFactory, DnsProvider, DnsRecord, PluginArgument};
