// # dns01-hook - DNS-01 Manual Hook
//
// This binary is a THIN integration layer:
// - DO NOT add DNS logic, resolution logic, or retry logic here
// - All challenge logic lives in dns01-core and the provider crates
//
// The hook is responsible for:
// 1. Parsing flags (with environment fallbacks)
// 2. Building the selected authenticator through the plugin registry
// 3. Running one perform or cleanup on a tokio runtime
//
// ## Configuration
//
// ### Challenge
// - `--domain` / `CERTBOT_DOMAIN`: Domain being validated
// - `--validation` / `CERTBOT_VALIDATION`: Validation value
// - `--validation-name`: Record name (default `_acme-challenge.<domain>`)
//
// ### Plugin
// - `--authenticator` / `DNS01_AUTHENTICATOR`: Plugin name (default `dns-alidns`)
// - Every argument the plugin declares, as `--<name>` (see `dns01-hook plugins`)
//
// ### Logging
// - `DNS01_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export ALIDNS_ACCESS_KEY_ID=your_key_id
// export ALIDNS_ACCESS_KEY_SECRET=your_key_secret
//
// certbot certonly --manual --preferred-challenges dns \
//     --manual-auth-hook "dns01-hook perform" \
//     --manual-cleanup-hook "dns01-hook cleanup" \
//     -d example.com
// ```

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use dns01_core::resolver::ACME_CHALLENGE_PREFIX;
use dns01_core::traits::PluginArgument;
use dns01_core::{PluginConfig, PluginRegistry};
use std::collections::BTreeSet;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Plugin used when `--authenticator` is not given
const DEFAULT_AUTHENTICATOR: &str = "dns-alidns";

/// Exit codes for the hook
///
/// - 0: Record published or cleanup attempted
/// - 1: Configuration or startup error
/// - 2: perform failed; the challenge must not proceed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HookExitCode {
    /// Success
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// perform returned an error
    PerformFailed = 2,
}

impl From<HookExitCode> for ExitCode {
    fn from(code: HookExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Perform,
    Cleanup,
}

/// One challenge as passed by the host
#[derive(Debug, Clone, PartialEq, Eq)]
struct Challenge {
    domain: String,
    validation_name: String,
    validation: String,
}

impl Challenge {
    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let domain = matches
            .get_one::<String>("domain")
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .context("--domain (or CERTBOT_DOMAIN) must not be empty")?;

        let validation = matches
            .get_one::<String>("validation")
            .filter(|v| !v.is_empty())
            .cloned()
            .context("--validation (or CERTBOT_VALIDATION) must not be empty")?;

        let validation_name = matches
            .get_one::<String>("validation-name")
            .filter(|n| !n.is_empty())
            .cloned()
            .unwrap_or_else(|| format!("{}{}", ACME_CHALLENGE_PREFIX, domain));

        Ok(Self {
            domain,
            validation_name,
            validation,
        })
    }
}

fn parse_log_level(raw: &str) -> Result<Level> {
    match raw.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "DNS01_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            raw
        ),
    }
}

/// Registry with every built-in plugin
fn build_registry() -> PluginRegistry {
    let registry = PluginRegistry::new();
    dns01_provider_alidns::register(&registry);
    registry
}

fn challenge_args() -> [Arg; 3] {
    [
        Arg::new("domain")
            .long("domain")
            .env("CERTBOT_DOMAIN")
            .required(true)
            .help("Domain being validated"),
        Arg::new("validation")
            .long("validation")
            .env("CERTBOT_VALIDATION")
            .required(true)
            .help("Validation value to publish"),
        Arg::new("validation-name")
            .long("validation-name")
            .help("Validation record name [default: _acme-challenge.<domain>]"),
    ]
}

fn plugin_arg(argument: &PluginArgument) -> Arg {
    let mut arg = Arg::new(argument.name)
        .long(argument.name)
        .help(argument.help)
        .global(true);
    if let Some(env) = argument.env {
        arg = arg.env(env).hide_env_values(argument.secret);
    }
    if let Some(default) = &argument.default {
        arg = arg.default_value(default.clone());
    }
    arg
}

/// Build the command line, including the arguments of every registered plugin
///
/// Plugins declaring the same argument name share one flag; the first
/// declaration wins.
fn build_cli(registry: &PluginRegistry) -> Command {
    let mut command = Command::new("dns01-hook")
        .version(env!("CARGO_PKG_VERSION"))
        .about("DNS-01 challenge hook backed by DNS provider plugins")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("authenticator")
                .long("authenticator")
                .short('a')
                .env("DNS01_AUTHENTICATOR")
                .default_value(DEFAULT_AUTHENTICATOR)
                .global(true)
                .help("Authenticator plugin to use"),
        )
        .subcommand(
            Command::new("perform")
                .about("Publish the validation TXT record")
                .args(challenge_args()),
        )
        .subcommand(
            Command::new("cleanup")
                .about("Remove the validation TXT record")
                .args(challenge_args()),
        )
        .subcommand(Command::new("plugins").about("List available authenticator plugins"));

    let mut seen = BTreeSet::new();
    for name in registry.list_authenticators() {
        for argument in registry.parser_arguments(&name).unwrap_or_default() {
            if seen.insert(argument.name) {
                command = command.arg(plugin_arg(&argument));
            }
        }
    }

    command
}

/// Collect the selected plugin's argument values
fn plugin_config(
    registry: &PluginRegistry,
    authenticator: &str,
    matches: &ArgMatches,
) -> dns01_core::Result<PluginConfig> {
    let mut config = PluginConfig::new();
    for argument in registry.parser_arguments(authenticator)? {
        if let Some(value) = matches.get_one::<String>(argument.name) {
            config.set(argument.name, value.clone());
        }
    }
    Ok(config)
}

fn print_plugins(registry: &PluginRegistry) {
    for name in registry.list_authenticators() {
        let description = registry.description(&name).unwrap_or_default();
        println!("{}: {}", name, description);

        for argument in registry.parser_arguments(&name).unwrap_or_default() {
            let mut line = format!("    --{:<22} {}", argument.name, argument.help);
            if let Some(env) = argument.env {
                line.push_str(&format!(" [env: {}]", env));
            }
            if let Some(default) = &argument.default {
                line.push_str(&format!(" [default: {}]", default));
            }
            println!("{}", line);
        }
    }
}

fn build_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")
}

fn run_challenge(registry: &PluginRegistry, action: Action, matches: &ArgMatches) -> HookExitCode {
    let authenticator_name = matches
        .get_one::<String>("authenticator")
        .map(String::as_str)
        .unwrap_or(DEFAULT_AUTHENTICATOR);

    let challenge = match Challenge::from_matches(matches) {
        Ok(challenge) => challenge,
        Err(e) => {
            error!("Configuration error: {}", e);
            return HookExitCode::ConfigError;
        }
    };

    let mut authenticator = match plugin_config(registry, authenticator_name, matches)
        .and_then(|config| registry.create_authenticator(authenticator_name, &config))
    {
        Ok(authenticator) => authenticator,
        Err(e) => {
            error!("Failed to create authenticator {}: {}", authenticator_name, e);
            return HookExitCode::ConfigError;
        }
    };

    info!("{}", authenticator.more_info());

    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("{:#}", e);
            return match action {
                Action::Perform => HookExitCode::PerformFailed,
                Action::Cleanup => HookExitCode::Success,
            };
        }
    };

    runtime.block_on(async {
        match action {
            Action::Perform => {
                info!(
                    "Publishing validation for {} at {}",
                    challenge.domain, challenge.validation_name
                );
                match authenticator
                    .perform(
                        &challenge.domain,
                        &challenge.validation_name,
                        &challenge.validation,
                    )
                    .await
                {
                    Ok(()) => HookExitCode::Success,
                    Err(e) => {
                        error!("{}", e);
                        HookExitCode::PerformFailed
                    }
                }
            }
            Action::Cleanup => {
                info!(
                    "Removing validation for {} at {}",
                    challenge.domain, challenge.validation_name
                );
                authenticator
                    .cleanup(
                        &challenge.domain,
                        &challenge.validation_name,
                        &challenge.validation,
                    )
                    .await;
                HookExitCode::Success
            }
        }
    })
}

fn run(registry: &PluginRegistry, matches: &ArgMatches) -> HookExitCode {
    match matches.subcommand() {
        Some(("plugins", _)) => {
            print_plugins(registry);
            HookExitCode::Success
        }
        Some(("perform", sub)) => run_challenge(registry, Action::Perform, sub),
        Some(("cleanup", sub)) => run_challenge(registry, Action::Cleanup, sub),
        _ => HookExitCode::ConfigError,
    }
}

fn main() -> ExitCode {
    let raw_level = std::env::var("DNS01_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_level = match parse_log_level(&raw_level) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return HookExitCode::ConfigError.into();
        }
    };

    // Logs go to stderr; stdout belongs to the host
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return HookExitCode::ConfigError.into();
    }

    let registry = build_registry();

    let matches = match build_cli(&registry).try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                HookExitCode::ConfigError.into()
            } else {
                // --help and --version
                HookExitCode::Success.into()
            };
        }
    };

    run(&registry, &matches).into()
}
