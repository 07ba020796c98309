//! Error types for the form layer.

use std::path::PathBuf;

use caredesk_core::SignalError;

/// Result type alias for form layer operations.
pub type Result<T> = std::result::Result<T, FormError>;

/// Integration-contract violations raised by the form layer.
///
/// None of these are user-facing; they indicate a caller that broke a
/// precondition and are meant to be propagated, not recovered from.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// The selection context was read outside any provider scope.
    #[error("no selection provider is active on this thread")]
    NoSelectionProvider,

    /// An option passed to `on_select` is not one of the binder's candidates.
    #[error("option '{label}' is not a candidate of field '{field}'")]
    ForeignOption { field: String, label: String },

    /// A subscription could not be cancelled.
    #[error("subscription error: {0}")]
    Subscription(#[from] SignalError),
}

impl FormError {
    /// Create a foreign-option error.
    pub fn foreign_option(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self::ForeignOption {
            field: field.into(),
            label: label.into(),
        }
    }
}

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parse error.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The `[logging] filter` directive could not be parsed.
    #[error("invalid logging filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
}

impl ConfigError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
