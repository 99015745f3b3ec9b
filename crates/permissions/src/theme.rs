//! Theme configuration tree (`themesConfig.json`).
//!
//! Only `themes`, `items`, `groups` and `url` are interpreted. Every other key
//! is carried along untouched so a generator can re-emit it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use mapgate_core::{PermissionError, PermissionResult};

/// Top-level themes config document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemesConfig {
    #[serde(default)]
    pub themes: ThemeGroup,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Themes document returned to the viewer: the config shape with only the
/// permitted themes left in it.
pub type ThemesDocument = ThemesConfig;

/// A theme group: nested items and sub-groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeGroup {
    #[serde(default)]
    pub items: Vec<ThemeItem>,

    #[serde(default)]
    pub groups: Vec<ThemeGroup>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A theme (leaf), backed by one WMS.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ThemesConfig {
    /// Read and parse a themes config file.
    pub fn load(path: &Path) -> PermissionResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PermissionError::config_read(path, e))?;
        Self::from_json(path, &raw)
    }

    /// Parse a themes config from its JSON text. `path` is only used for errors.
    pub fn from_json(path: &Path, raw: &str) -> PermissionResult<Self> {
        serde_json::from_str(raw).map_err(|e| PermissionError::config_parse(path, e))
    }
}

impl ThemeGroup {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.groups.is_empty()
    }

    /// Number of items in this group and all sub-groups.
    pub fn item_count(&self) -> usize {
        self.items.len() + self.groups.iter().map(ThemeGroup::item_count).sum::<usize>()
    }
}

impl ThemeItem {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            extra: Map::new(),
        }
    }

    /// The service URL, if set and non-empty.
    pub fn service_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }
}
