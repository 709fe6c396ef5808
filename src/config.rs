use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, NewznabError};

type Result<T> = std::result::Result<T, NewznabError>;

/// Expand tilde (~) in paths to the actual home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// File the configuration was read from, `None` for defaults
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Full URL of the Newznab API endpoint, e.g. `https://indexer.example/api`
    pub url: String,
    pub api_key: String,
    pub timeout: u64, // seconds
    pub user_agent: String,
}

// Custom Debug implementation to hide the API key
impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("url", &self.url)
            .field("api_key", &"<REDACTED>")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Indent JSON output
    pub pretty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            timeout: 30,
            user_agent: format!("newznab/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

/// Apply NEWZNAB_ prefixed environment variables
fn load_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("NEWZNAB_URL") {
        config.server.url = val;
    }
    if let Some(val) = lookup("NEWZNAB_API_KEY") {
        config.server.api_key = val;
    }
    if let Some(val) = lookup("NEWZNAB_TIMEOUT") {
        if let Ok(timeout) = val.parse() {
            config.server.timeout = timeout;
        }
    }

    config
}

impl Config {
    /// Get the standard config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::Invalid {
            field: "config_dir".to_string(),
            reason: "Could not determine config directory".to_string(),
        })?;
        Ok(config_dir.join("newznab").join("config.toml"))
    }

    /// Load configuration from an explicit path, the working directory or
    /// the standard location, falling back to defaults when none exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            Some(path) => Some(path.to_path_buf()),
            None => {
                let local_config = PathBuf::from("newznab.toml");
                if local_config.exists() {
                    Some(local_config)
                } else {
                    Self::config_path().ok().filter(|p| p.exists())
                }
            }
        };

        let mut config = match path {
            Some(path) => {
                let mut config = Self::from_file(&path)?;
                config.source = Some(path);
                config
            }
            None => Self::default(),
        };

        // Apply environment variable overrides
        config = load_env_overrides(config, |key| env::var(key).ok());

        // Expand tilde in paths
        if let Some(log_file) = config.logging.file.as_ref() {
            config.logging.file = Some(expand_tilde(log_file));
        }

        config.validate()?;
        Ok(config)
    }

    /// Where `config` shows and `config --init` writes: the explicit path
    /// if given, else the standard location. The file need not exist.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(expand_tilde(path)),
            None => Self::config_path(),
        }
    }

    /// Copy safe to print, with the API key masked
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if !config.server.api_key.is_empty() {
            config.server.api_key = "<REDACTED>".to_string();
        }
        config
    }

    /// Parse a TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Create a sample configuration file
    pub fn create_sample<P: AsRef<Path>>(path: P) -> Result<()> {
        let sample = Self::default();
        let content = toml::to_string_pretty(&sample)
            .map_err(|e| ConfigError::ParseError(format!("Failed to serialize config: {}", e)))?;

        let commented_content = format!(
            r#"# newznab Configuration File
#
# Settings can be overridden via environment variables:
#   NEWZNAB_URL, NEWZNAB_API_KEY, NEWZNAB_TIMEOUT
#
# REQUIRED: Set your indexer URL and API key below

{}

# Configuration Guide:
#
# [server]
# url        - Full URL of the indexer's API endpoint (REQUIRED)
# api_key    - Your indexer API key (REQUIRED for searches and downloads)
# timeout    - Request timeout in seconds
# user_agent - User-Agent header sent with every request
#
# [output]
# pretty     - Indent JSON output
#
# [logging]
# level      - error, warn, info, debug or trace
# file       - Append logs to this file instead of stderr
"#,
            content
        );

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, commented_content)?;
        Ok(())
    }

    /// Validate basic configuration (always run)
    pub fn validate(&self) -> Result<()> {
        if self.server.timeout == 0 {
            return Err(ConfigError::Invalid {
                field: "timeout".to_string(),
                reason: "Must be at least 1 second".to_string(),
            }
            .into());
        }

        if self.server.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "user_agent".to_string(),
                reason: "Must not be empty".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Validate configuration for server requests
    /// `caps` only needs the URL; everything else also needs the API key
    pub fn validate_for_requests(&self, needs_key: bool) -> Result<()> {
        if self.server.url.is_empty() {
            return Err(ConfigError::NoServer.into());
        }

        if needs_key && self.server.api_key.is_empty() {
            return Err(ConfigError::NoApiKey.into());
        }

        Ok(())
    }

    /// Apply command-line overrides
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(url) = overrides.url {
            self.server.url = url;
        }
        if let Some(api_key) = overrides.api_key {
            self.server.api_key = api_key;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.compact {
            self.output.pretty = false;
        }
    }
}

/// Command-line configuration overrides
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub log_level: Option<String>,
    pub compact: bool,
}
