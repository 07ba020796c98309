//! TOML configuration.
//!
//! ```toml
//! [access]
//! admin_emails = ["admin@clinic.org"]
//!
//! [logging]
//! filter = "caredesk=debug"
//! ```
//!
//! Every section is optional and falls back to its defaults.

use std::path::Path;

use caredesk_core::logging::targets;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::access::AccessPolicy;
use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaredeskConfig {
    /// Advisory admin roster.
    pub access: AccessConfig,
    /// Tracing filter handed to the host's subscriber.
    pub logging: LoggingConfig,
}

/// `[access]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Emails that get the edit form on record pages.
    pub admin_emails: Vec<String>,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// An `EnvFilter`-style directive string.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Parse the directive into a filter for the host's subscriber.
    ///
    /// ```
    /// use caredesk::config::CaredeskConfig;
    ///
    /// # fn main() -> Result<(), caredesk::ConfigError> {
    /// let config = CaredeskConfig::from_toml_str("[logging]\nfilter = \"caredesk=debug\"")?;
    /// let _subscriber = tracing_subscriber::fmt()
    ///     .with_env_filter(config.logging.env_filter()?)
    ///     .finish();
    /// # Ok(())
    /// # }
    /// ```
    pub fn env_filter(&self) -> Result<EnvFilter, ConfigError> {
        Ok(EnvFilter::try_new(&self.filter)?)
    }
}

impl CaredeskConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(
            target: targets::CONFIG,
            path = %path.display(),
            admins = config.access.admin_emails.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Build the advisory access policy from the `[access]` section.
    pub fn access_policy(&self) -> AccessPolicy {
        AccessPolicy::new(&self.access.admin_emails)
    }
}
