//! Error types for DNS-01 authenticators
//!
//! This module defines all error types used throughout the workspace.

use thiserror::Error;

/// Result type alias for authenticator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for DNS-01 authenticators
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or unexpected validation record name
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// Any failure reported by (or while talking to) a DNS provider API
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Host-facing failure of `perform`; fatal to the challenge
    #[error("Plugin error: {0}")]
    Plugin(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

}

impl Error {
    /// Create a resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a plugin error
    pub fn plugin(msg: impl Into<String>) -> Self {
        Self::Plugin(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error came from the provider API
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_names_the_provider() {
        let err = Error::provider("alidns", "Throttling.User");
        assert_eq!(err.to_string(), "Provider error (alidns): Throttling.User");
        assert!(err.is_provider());
    }

    #[test]
    fn plugin_error_is_not_a_provider_error() {
        let err = Error::plugin("failed to add TXT record");
        assert!(!err.is_provider());
        assert!(err.to_string().starts_with("Plugin error"));
    }

    #[test]
    fn every_variant_is_built_by_a_helper() {
        let errors = [
            Error::resolution("empty name"),
            Error::provider("alidns", "timeout"),
            Error::plugin("perform failed"),
            Error::config("missing key"),
        ];
        let rendered: Vec<String> = errors.iter().map(ToString::to_string).collect();

        assert_eq!(
            rendered,
            vec![
                "Resolution error: empty name",
                "Provider error (alidns): timeout",
                "Plugin error: perform failed",
                "Configuration error: missing key",
            ]
        );
    }
}
