//! CLI configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `HARBOR_`-prefixed environment variables using `__` between sections
//! (for example `HARBOR_API__BASE_URL`).

use anyhow::{Context, Result};
use config::ConfigError;
use harbor_core::AuthConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the config file looked up in the data directory
pub const CONFIG_FILE_NAME: &str = "harbor.toml";

/// Name of the session file in the data directory
pub const SESSION_FILE_NAME: &str = "session.json";

/// Main CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Backend API settings
    pub api: ApiConfig,

    /// Session settings
    pub session: SessionConfig,
}

/// Backend API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend origin
    pub base_url: String,

    /// Request timeout in seconds (0 = transport default)
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: Option<String>,

    /// Path of the login endpoint
    pub login_path: String,
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Liveness re-check interval for `status --watch`, in seconds
    pub check_interval_secs: u64,

    /// Session file; defaults to `session.json` in the data directory
    pub file: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
            user_agent: None,
            login_path: AuthConfig::LOGIN_ENDPOINT.to_string(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: AuthConfig::SESSION_CHECK_INTERVAL_SECS,
            file: None,
        }
    }
}

impl CliConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = config::Config::builder()
            .set_default("api.base_url", defaults.api.base_url)?
            .set_default("api.timeout_secs", defaults.api.timeout_secs)?
            .set_default("api.login_path", defaults.api.login_path)?
            .set_default(
                "session.check_interval_secs",
                defaults.session.check_interval_secs,
            )?;

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix("HARBOR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?;

        let config: Self = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config file: explicit path, else `harbor.toml` in the data
    /// directory when it exists
    pub fn resolve_file(explicit: Option<PathBuf>, data_dir: &Path) -> Option<PathBuf> {
        explicit.or_else(|| {
            let candidate = data_dir.join(CONFIG_FILE_NAME);
            candidate.exists().then_some(candidate)
        })
    }

    /// Check values that deserialized but make no sense
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Message("api.base_url: cannot be empty".into()));
        }
        url::Url::parse(&self.api.base_url)
            .map_err(|e| ConfigError::Message(format!("api.base_url: invalid URL - {e}")))?;

        if !self.api.login_path.starts_with('/') {
            return Err(ConfigError::Message(
                "api.login_path: must start with '/'".into(),
            ));
        }

        if self.session.check_interval_secs == 0 {
            return Err(ConfigError::Message(
                "session.check_interval_secs: must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Request timeout, if one is configured
    pub const fn timeout(&self) -> Option<Duration> {
        match self.api.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Liveness re-check interval
    pub const fn check_interval(&self) -> Duration {
        Duration::from_secs(self.session.check_interval_secs)
    }

    /// Where the session token is stored
    pub fn session_file(&self, data_dir: &Path) -> PathBuf {
        self.session
            .file
            .clone()
            .unwrap_or_else(|| data_dir.join(SESSION_FILE_NAME))
    }

    /// Write configuration as TOML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Generate a default configuration file
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    CliConfig::default().save(path)
}
