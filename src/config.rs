use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct OddsConfig {
    /// API key for the odds provider
    pub api_key: String,
    /// Base URL of the odds provider (versioned)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Maximum outbound request rate (requests per second)
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_sec: u32,
    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Regions requested when a call does not specify any
    #[serde(default = "default_regions")]
    pub default_regions: Vec<String>,
    /// Bookmakers requested when a call does not specify any (empty = all)
    #[serde(default)]
    pub default_bookmakers: Vec<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_base_url() -> String {
    "https://api.the-odds-api.com/v4".to_string()
}

fn default_rate_limit() -> u32 {
    30
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_regions() -> Vec<String> {
    vec!["us".to_string()]
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl OddsConfig {
    /// Build a configuration from an API key with defaults for everything else
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            rate_limit_per_sec: default_rate_limit(),
            timeout_ms: default_timeout_ms(),
            default_regions: default_regions(),
            default_bookmakers: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("base_url", default_base_url())?
            .set_default("rate_limit_per_sec", default_rate_limit())?
            .set_default("timeout_ms", default_timeout_ms() as i64)?
            .set_default("default_regions", vec!["us".to_string()])?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("ODDSLINE_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (ODDSLINE_API_KEY, etc.)
            .add_source(
                Environment::with_prefix("ODDSLINE")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.api_key.trim().is_empty() {
            errors.push("api_key must not be empty".to_string());
        }

        if self.rate_limit_per_sec == 0 {
            errors.push("rate_limit_per_sec must be positive".to_string());
        }

        if self.timeout_ms == 0 {
            errors.push("timeout_ms must be positive".to_string());
        }

        if !self.base_url.starts_with("http") {
            errors.push(format!("base_url does not look like a URL: {}", self.base_url));
        }

        if self.base_url.ends_with('/') {
            errors.push("base_url must not end with a trailing slash".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
