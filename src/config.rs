//! Application configuration loaded from environment variables and CLI flags.
//!
//! Configuration is loaded once at startup and validated before the server
//! starts. Environment variables (optionally from a `.env` file) are read
//! first; command-line flags override them.
//!
//! ```bash
//! tinylink -p 8080 -l false
//! PORT=8080 LOG_FORMAT=json tinylink
//! ```
//!
//! ## Variables
//!
//! - `PORT` / `-p, --port` - Listen port (default: `1234`)
//! - `HOST` - Bind address (default: `0.0.0.0`)
//! - `BASE_URL` - Prefix for short links (default: `http://0.0.0.0:{port}`)
//! - `LOG_ENABLED` / `-l, --log` - Turn logging on or off (default: `true`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - `text` or `json` (default: `text`)
//! - `CLICK_QUEUE_CAPACITY` - Click queue bound, `0` for unbounded (default: `0`)
//! - `ID_LENGTH` - Generated identifier length (default: `5`)
//! - `ID_MAX_ATTEMPTS` - Collision retries before giving up (default: `32`)

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::env;
use std::str::FromStr;

use crate::utils::id_generator::{DEFAULT_ID_LENGTH, DEFAULT_MAX_ATTEMPTS, MAX_ID_LENGTH};

/// Command-line flags. Each one overrides its environment variable.
#[derive(Debug, Default, Parser)]
#[command(name = "tinylink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable or disable logging (`-l`, `-l=false`, `-l false`)
    #[arg(
        short,
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub log: Option<bool>,
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Explicit short link prefix. When unset, derived from the port.
    pub base_url: Option<String>,
    pub log_enabled: bool,
    pub log_level: String,
    pub log_format: String,
    /// `0` selects an unbounded click queue.
    pub click_queue_capacity: usize,
    pub id_length: usize,
    pub id_max_attempts: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 1234,
            base_url: None,
            log_enabled: true,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            click_queue_capacity: 0,
            id_length: DEFAULT_ID_LENGTH,
            id_max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or boolean variable cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT")?.unwrap_or(defaults.port),
            base_url: env::var("BASE_URL").ok().filter(|v| !v.is_empty()),
            log_enabled: parse_bool_var("LOG_ENABLED")?.unwrap_or(defaults.log_enabled),
            log_level: env::var("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: env::var("LOG_FORMAT").unwrap_or(defaults.log_format),
            click_queue_capacity: parse_var("CLICK_QUEUE_CAPACITY")?
                .unwrap_or(defaults.click_queue_capacity),
            id_length: parse_var("ID_LENGTH")?.unwrap_or(defaults.id_length),
            id_max_attempts: parse_var("ID_MAX_ATTEMPTS")?.unwrap_or(defaults.id_max_attempts),
        })
    }

    /// Applies command-line overrides.
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(log) = cli.log {
            self.log_enabled = log;
        }
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `port` is 0
    /// - `log_format` is not `text` or `json`
    /// - `base_url` is not an http(s) URL
    /// - `click_queue_capacity` exceeds 1 000 000
    /// - `id_length` or `id_max_attempts` is out of range
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("PORT must be greater than 0");
        }

        if self.host.is_empty() {
            anyhow::bail!("HOST must not be empty");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if let Some(ref base_url) = self.base_url
            && !base_url.starts_with("http://")
            && !base_url.starts_with("https://")
        {
            anyhow::bail!(
                "BASE_URL must start with 'http://' or 'https://', got '{}'",
                base_url
            );
        }

        if self.click_queue_capacity > 1_000_000 {
            anyhow::bail!(
                "CLICK_QUEUE_CAPACITY is too large (max: 1000000), got {}",
                self.click_queue_capacity
            );
        }

        if !(3..=MAX_ID_LENGTH).contains(&self.id_length) {
            anyhow::bail!(
                "ID_LENGTH must be between 3 and {}, got {}",
                MAX_ID_LENGTH,
                self.id_length
            );
        }

        if !(1..=10_000).contains(&self.id_max_attempts) {
            anyhow::bail!(
                "ID_MAX_ATTEMPTS must be between 1 and 10000, got {}",
                self.id_max_attempts
            );
        }

        Ok(())
    }

    /// Address the server binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Prefix used when building short links.
    pub fn public_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://0.0.0.0:{}", self.port),
        }
    }

    /// Click queue bound; `None` means unbounded.
    pub fn click_queue_bound(&self) -> Option<usize> {
        (self.click_queue_capacity > 0).then_some(self.click_queue_capacity)
    }

    /// Tracing filter directive honoring the on/off switch.
    pub fn log_filter(&self) -> &str {
        if self.log_enabled {
            &self.log_level
        } else {
            "off"
        }
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr());
        tracing::info!("  Base URL: {}", self.public_base_url());
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        match self.click_queue_bound() {
            Some(capacity) => tracing::info!("  Click queue capacity: {}", capacity),
            None => tracing::info!("  Click queue capacity: unbounded"),
        }
        tracing::info!(
            "  Identifiers: {} chars, {} attempts",
            self.id_length,
            self.id_max_attempts
        );
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} has an invalid value '{raw}'")),
        _ => Ok(None),
    }
}

fn parse_bool_var(name: &str) -> Result<Option<bool>> {
    match env::var(name) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "1" | "true" | "on" | "yes" => Ok(Some(true)),
            "0" | "false" | "off" | "no" => Ok(Some(false)),
            _ => anyhow::bail!("{name} must be a boolean, got '{raw}'"),
        },
        Err(_) => Ok(None),
    }
}

/// Loads and validates configuration from the environment and CLI flags.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load(cli: &Cli) -> Result<Config> {
    let config = Config::from_env()?.with_cli(cli);
    config.validate()?;
    Ok(config)
}
