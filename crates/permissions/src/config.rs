//! Resolver configuration sourced from environment variables.

use std::path::PathBuf;

use mapgate_core::PermissionResult;

use crate::walker::url_path;

/// Default QWC2 application directory.
pub const DEFAULT_QWC2_PATH: &str = "qwc2/";

/// Default internal QGIS server URL.
pub const DEFAULT_QGIS_SERVER_URL: &str = "http://localhost/wms/";

/// File name of the themes config inside the QWC2 directory.
pub const THEMES_CONFIG_FILE: &str = "themesConfig.json";

/// Settings fixed for the lifetime of a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Path of `themesConfig.json`.
    pub themes_config_path: PathBuf,
    /// Path of the QGIS server URL, always ending in `/`.
    pub qgis_server_base_path: String,
}

impl ResolverConfig {
    pub fn new(themes_config_path: impl Into<PathBuf>, qgis_server_base_path: impl Into<String>) -> Self {
        Self {
            themes_config_path: themes_config_path.into(),
            qgis_server_base_path: qgis_server_base_path.into(),
        }
    }

    /// Read `QWC2_PATH`, `QWC2_THEMES_CONFIG` and `QGIS_SERVER_URL`.
    pub fn from_env() -> PermissionResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> PermissionResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let qwc2_path = lookup("QWC2_PATH").unwrap_or_else(|| DEFAULT_QWC2_PATH.to_string());
        let themes_config_path = lookup("QWC2_THEMES_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(qwc2_path).join(THEMES_CONFIG_FILE));

        let qgis_server_url =
            lookup("QGIS_SERVER_URL").unwrap_or_else(|| DEFAULT_QGIS_SERVER_URL.to_string());
        let qgis_server_base_path = base_path_of(&qgis_server_url)?;

        Ok(Self {
            themes_config_path,
            qgis_server_base_path,
        })
    }
}

/// Path of the server URL with exactly one trailing slash.
pub fn base_path_of(server_url: &str) -> PermissionResult<String> {
    let normalized = format!("{}/", server_url.trim_end_matches('/'));
    url_path(&normalized)
}
