//! Error model shared by the resolver and its collaborators.

use std::path::PathBuf;

use thiserror::Error;

/// Result type used across permission resolution.
pub type PermissionResult<T> = Result<T, PermissionError>;

/// Permission-resolution error.
///
/// Only failures that abort a resolution pass live here. Denied layers,
/// unknown maps and unsupported geometries are regular (empty) outcomes.
#[derive(Debug, Error)]
pub enum PermissionError {
    /// The themes config document could not be read.
    #[error("failed to read themes config '{}': {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The themes config document is not valid JSON (or has the wrong shape).
    #[error("failed to parse themes config '{}': {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A theme item or server URL could not be parsed.
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Resolver configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The relational permission store failed.
    #[error("permission store error: {0}")]
    Store(String),

    /// An OGC or data permission oracle failed.
    #[error("permission oracle error: {0}")]
    Oracle(String),

    /// The theme generator failed.
    #[error("theme generator error: {0}")]
    Generator(String),
}

impl PermissionError {
    pub fn config_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigRead {
            path: path.into(),
            source,
        }
    }

    pub fn config_parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::ConfigParse {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn oracle(msg: impl Into<String>) -> Self {
        Self::Oracle(msg.into())
    }

    pub fn generator(msg: impl Into<String>) -> Self {
        Self::Generator(msg.into())
    }

    /// Whether the failure came from loading the themes config document.
    pub fn is_config_load(&self) -> bool {
        matches!(self, Self::ConfigRead { .. } | Self::ConfigParse { .. })
    }
}
