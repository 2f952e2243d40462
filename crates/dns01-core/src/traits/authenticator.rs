// # Authenticator Traits
//
// The capability interface a certificate-management host consumes.
//
// A plugin is registered as an [`AuthenticatorFactory`] under a name. Before
// any challenge runs, the host asks the factory to declare its arguments
// (`add_parser_arguments`), parses them, and hands the resulting
// [`PluginConfig`](crate::config::PluginConfig) to `create`. The returned
// [`Authenticator`] then receives `perform` and `cleanup` for each challenge.
//
// ## Host guarantees
//
// - `perform` runs once per challenge before any matching `cleanup`
// - calls on one authenticator are sequential
// - domain validation fails if `perform` returns an error

use async_trait::async_trait;

/// A command-line/config argument declared by a plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginArgument {
    /// Argument name without prefix (e.g. "access-key-id")
    pub name: &'static str,
    /// Help text shown to the user
    pub help: &'static str,
    /// Default value, if the argument is optional
    pub default: Option<String>,
    /// Environment variable the host may read the value from
    pub env: Option<&'static str>,
    /// Whether the value must be hidden from help output and logs
    pub secret: bool,
}

impl PluginArgument {
    /// Declare an argument with no default
    pub fn new(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            default: None,
            env: None,
            secret: false,
        }
    }

    /// Set the default value
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set the environment fallback
    pub fn with_env(mut self, env: &'static str) -> Self {
        self.env = Some(env);
        self
    }

    /// Mark the value as secret
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }
}

/// Host-facing DNS-01 authenticator
///
/// Methods take `&mut self`: an authenticator owns its per-session state
/// and is never shared between concurrent callers.
#[async_trait]
pub trait Authenticator: Send {
    /// Publish the validation record for one challenge
    ///
    /// # Parameters
    ///
    /// - `domain`: The domain being validated
    /// - `validation_name`: Full validation record name (e.g. "_acme-challenge.example.com")
    /// - `validation`: The validation value to publish
    ///
    /// # Errors
    ///
    /// Any failure is fatal to the challenge and must be surfaced to the user.
    async fn perform(
        &mut self,
        domain: &str,
        validation_name: &str,
        validation: &str,
    ) -> Result<(), crate::Error>;

    /// Remove the validation record for one challenge
    ///
    /// Best-effort: failures are logged by the implementation and never
    /// returned, because the challenge outcome is already decided.
    async fn cleanup(&mut self, domain: &str, validation_name: &str, validation: &str);

    /// Human-readable description of what the authenticator does
    fn more_info(&self) -> String;
}

/// Registration entry for an authenticator plugin
pub trait AuthenticatorFactory: Send + Sync {
    /// One-line description of the plugin
    fn description(&self) -> &'static str;

    /// Declare the arguments this plugin accepts
    ///
    /// `add` is called once per argument.
    fn add_parser_arguments(&self, add: &mut dyn FnMut(PluginArgument));

    /// Create an authenticator from parsed argument values
    ///
    /// # Returns
    ///
    /// A boxed Authenticator trait object
    fn create(
        &self,
        config: &crate::config::PluginConfig,
    ) -> Result<Box<dyn Authenticator>, crate::Error>;
}
