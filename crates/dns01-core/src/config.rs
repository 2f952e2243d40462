//! Configuration types for DNS-01 authenticators
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use crate::traits::DEFAULT_TTL;

/// Region used when credentials do not name one
pub const DEFAULT_REGION_ID: &str = "cn-hangzhou";

/// Provider API credentials
///
/// Loaded and checked for presence by the host; this crate only consumes the
/// resolved values.
///
/// # Security
///
/// The Debug implementation does NOT expose the access key secret.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Access key ID
    pub access_key_id: String,

    /// Access key secret
    /// ⚠️ NEVER log this value
    pub access_key_secret: String,

    /// Region ID (e.g. "cn-hangzhou")
    #[serde(default = "default_region_id")]
    pub region_id: String,
}

impl Credentials {
    /// Create credentials; an empty or missing region falls back to the default
    pub fn new(
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
        region_id: Option<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            region_id: region_id
                .filter(|region| !region.is_empty())
                .unwrap_or_else(default_region_id),
        }
    }

    /// Validate the credentials
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.access_key_id.is_empty() {
            return Err(crate::Error::config("Access key ID cannot be empty"));
        }
        if self.access_key_secret.is_empty() {
            return Err(crate::Error::config("Access key secret cannot be empty"));
        }
        if self.region_id.is_empty() {
            return Err(crate::Error::config("Region ID cannot be empty"));
        }
        Ok(())
    }
}

// Custom Debug implementation that hides the access key secret
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<REDACTED>")
            .field("region_id", &self.region_id)
            .finish()
    }
}

fn default_region_id() -> String {
    DEFAULT_REGION_ID.to_string()
}

/// Authenticator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatorConfig {
    /// TTL of created validation records (in seconds)
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Fixed wait after creating a record, before perform returns (in seconds)
    ///
    /// This is an unconditional delay, not a visibility poll.
    #[serde(default = "default_propagation_seconds")]
    pub propagation_seconds: u64,
}

impl AuthenticatorConfig {
    /// Validate the authenticator configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.ttl == 0 {
            return Err(crate::Error::config("Record TTL must be > 0"));
        }
        Ok(())
    }

    /// Propagation delay as a Duration
    pub fn propagation_delay(&self) -> Duration {
        Duration::from_secs(self.propagation_seconds)
    }

    /// Set the record TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the propagation delay
    pub fn with_propagation_seconds(mut self, seconds: u64) -> Self {
        self.propagation_seconds = seconds;
        self
    }
}

impl Default for AuthenticatorConfig {
    fn default() -> Self {
        Self {
            ttl: default_ttl(),
            propagation_seconds: default_propagation_seconds(),
        }
    }
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

fn default_propagation_seconds() -> u64 {
    10
}

/// Parsed plugin argument values, keyed by argument name
///
/// Filled by the host from whatever declared
/// [`PluginArgument`](crate::traits::PluginArgument)s it could resolve
/// (flags, environment, defaults).
#[derive(Debug, Clone, Default)]
pub struct PluginConfig {
    values: HashMap<String, String>,
}

impl PluginConfig {
    /// Create an empty plugin configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Get a value, treating empty strings as absent
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Get a required value
    pub fn require(&self, name: &str) -> Result<&str, crate::Error> {
        self.get(name)
            .ok_or_else(|| crate::Error::config(format!("Missing required setting: {}", name)))
    }

    /// Parse an optional value
    pub fn parse<T>(&self, name: &str) -> Result<Option<T>, crate::Error>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(name)
            .map(|raw| {
                raw.parse::<T>().map_err(|e| {
                    crate::Error::config(format!("Invalid value for {}: {} ({})", name, raw, e))
                })
            })
            .transpose()
    }
}
