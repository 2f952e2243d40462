//! Core traits for DNS-01 authenticators
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`DnsProvider`]: Manage DNS records via provider APIs
//! - [`Authenticator`]: Host-facing perform/cleanup capability
//! - [`AuthenticatorFactory`]: Declares plugin arguments and constructs authenticators

pub mod authenticator;
pub mod dns_provider;

pub use authenticator::{Authenticator, AuthenticatorFactory, PluginArgument};
pub use dns_provider::{DnsProvider, DnsRecord, DEFAULT_TTL, TXT_RECORD_TYPE};
