//! Plugin-based authenticator registry
//!
//! The registry allows authenticator plugins to be registered by name at
//! runtime, so the host never hard-codes which providers exist.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dns01_core::{PluginConfig, PluginRegistry};
//!
//! let registry = PluginRegistry::new();
//! dns01_provider_alidns::register(&registry);
//!
//! // Declare the plugin's arguments to the host's parser
//! registry.add_parser_arguments("dns-alidns", &mut |arg| println!("--{}", arg.name))?;
//!
//! // Create an authenticator from the parsed values
//! let config = PluginConfig::new().with("access-key-id", "...");
//! let authenticator = registry.create_authenticator("dns-alidns", &config)?;
//! ```
//!
//! ## Registration
//!
//! Plugin crates expose a `register` function:
//!
//! ```rust,ignore
//! pub fn register(registry: &PluginRegistry) {
//!     registry.register_authenticator("dns-alidns", Box::new(AlidnsAuthenticatorFactory));
//! }
//! ```

use crate::config::PluginConfig;
use crate::error::{Error, Result};
use crate::traits::{Authenticator, AuthenticatorFactory, PluginArgument};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

/// Registry of authenticator factories keyed by plugin name
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct PluginRegistry {
    /// Registered authenticator factories
    authenticators: RwLock<BTreeMap<String, Box<dyn AuthenticatorFactory>>>,
}

impl PluginRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an authenticator factory
    ///
    /// A later registration under the same name replaces the earlier one.
    ///
    /// # Parameters
    ///
    /// - `name`: Plugin name (e.g., "dns-alidns")
    /// - `factory`: Factory object for creating authenticator instances
    pub fn register_authenticator(
        &self,
        name: impl Into<String>,
        factory: Box<dyn AuthenticatorFactory>,
    ) {
        let name = name.into();
        tracing::debug!("Registering authenticator plugin: {}", name);
        let mut authenticators = self
            .authenticators
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        authenticators.insert(name, factory);
    }

    /// Description of a registered plugin
    pub fn description(&self, name: &str) -> Result<&'static str> {
        let authenticators = self
            .authenticators
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        authenticators
            .get(name)
            .map(|factory| factory.description())
            .ok_or_else(|| unknown_plugin(name))
    }

    /// Declare a plugin's arguments through `add`
    pub fn add_parser_arguments(
        &self,
        name: &str,
        add: &mut dyn FnMut(PluginArgument),
    ) -> Result<()> {
        let authenticators = self
            .authenticators
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let factory = authenticators.get(name).ok_or_else(|| unknown_plugin(name))?;
        factory.add_parser_arguments(add);
        Ok(())
    }

    /// Collect a plugin's arguments into a Vec
    pub fn parser_arguments(&self, name: &str) -> Result<Vec<PluginArgument>> {
        let mut arguments = Vec::new();
        self.add_parser_arguments(name, &mut |argument| arguments.push(argument))?;
        Ok(arguments)
    }

    /// Create an authenticator from parsed argument values
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn Authenticator>)`: Created authenticator instance
    /// - `Err(Error)`: If the plugin is not registered or creation fails
    pub fn create_authenticator(
        &self,
        name: &str,
        config: &PluginConfig,
    ) -> Result<Box<dyn Authenticator>> {
        let authenticators = self
            .authenticators
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let factory = authenticators.get(name).ok_or_else(|| unknown_plugin(name))?;
        factory.create(config)
    }

    /// List all registered plugin names, sorted
    pub fn list_authenticators(&self) -> Vec<String> {
        let authenticators = self
            .authenticators
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        authenticators.keys().cloned().collect()
    }

    /// Check if a plugin is registered
    pub fn has_authenticator(&self, name: &str) -> bool {
        let authenticators = self
            .authenticators
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        authenticators.contains_key(name)
    }
}

fn unknown_plugin(name: &str) -> Error {
    Error::config(format!("Unknown authenticator plugin: {}", name))
}
