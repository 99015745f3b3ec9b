//! Themes document generation from the config and resolved permissions.

use std::path::Path;

use mapgate_core::{PermissionError, PermissionResult};
use mapgate_permissions::{
    service_identifier, PermissionMap, ResolverConfig, ThemeGenerator, ThemeGroup, ThemeItem,
    ThemesConfig, ThemesDocument,
};

/// Item key the edit config of a theme is published under.
pub const EDIT_CONFIG_KEY: &str = "editConfig";

/// Emits the themes config with every non-permitted theme removed.
///
/// Permitted themes get their edit config attached. Groups left without
/// themes are dropped; the top-level group is always kept.
#[derive(Debug, Clone)]
pub struct FilteredThemeGenerator {
    base_path: String,
}

impl FilteredThemeGenerator {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(config.qgis_server_base_path.clone())
    }

    fn filter_group(&self, group: ThemeGroup, permissions: &PermissionMap) -> PermissionResult<ThemeGroup> {
        let mut items = Vec::with_capacity(group.items.len());
        for item in group.items {
            if let Some(item) = self.filter_item(item, permissions)? {
                items.push(item);
            }
        }

        let mut groups = Vec::with_capacity(group.groups.len());
        for sub_group in group.groups {
            let sub_group = self.filter_group(sub_group, permissions)?;
            if !sub_group.is_empty() {
                groups.push(sub_group);
            }
        }

        Ok(ThemeGroup {
            items,
            groups,
            extra: group.extra,
        })
    }

    fn filter_item(
        &self,
        mut item: ThemeItem,
        permissions: &PermissionMap,
    ) -> PermissionResult<Option<ThemeItem>> {
        let Some(url) = item.service_url() else {
            return Ok(None);
        };
        let wms_name = service_identifier(url, &self.base_path)?;

        let Some(record) = permissions.get(&wms_name).filter(|r| r.is_granted()) else {
            return Ok(None);
        };

        if let Some(edit_config) = &record.edit_config {
            let value = serde_json::to_value(edit_config)
                .map_err(|e| PermissionError::generator(format!("edit config of '{wms_name}': {e}")))?;
            item.extra.insert(EDIT_CONFIG_KEY.to_string(), value);
        }

        Ok(Some(item))
    }
}

impl ThemeGenerator for FilteredThemeGenerator {
    fn generate(
        &self,
        config_path: &Path,
        permissions: &PermissionMap,
    ) -> PermissionResult<ThemesDocument> {
        let config = ThemesConfig::load(config_path)?;
        let total = config.themes.item_count();

        let themes = self.filter_group(config.themes, permissions)?;
        tracing::debug!(total, permitted = themes.item_count(), "generated themes document");

        Ok(ThemesDocument {
            themes,
            extra: config.extra,
        })
    }
}
