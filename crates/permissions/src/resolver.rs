//! Entry point: permissions of one subject for the configured themes.

use mapgate_core::{PermissionResult, Subject};

use crate::config::ResolverConfig;
use crate::edit_permissions::EditPermissionAggregator;
use crate::generator::ThemeGenerator;
use crate::oracle::{DataPermissionOracle, OgcPermissionOracle};
use crate::record::PermissionMap;
use crate::store::PermissionStore;
use crate::theme::{ThemesConfig, ThemesDocument};
use crate::walker::ThemeTreeWalker;

/// Resolves theme and edit permissions for the QWC2 map viewer.
///
/// All collaborators are passed in at construction; a resolver holds no
/// per-request state and may serve any number of requests.
pub struct PermissionResolver<O, D, S, G> {
    config: ResolverConfig,
    walker: ThemeTreeWalker<O, D, S>,
    generator: G,
}

impl<O, D, S, G> PermissionResolver<O, D, S, G>
where
    O: OgcPermissionOracle,
    D: DataPermissionOracle,
    S: PermissionStore,
    G: ThemeGenerator,
{
    pub fn new(config: ResolverConfig, ogc: O, data: D, store: S, generator: G) -> Self {
        let walker = ThemeTreeWalker::new(
            ogc,
            EditPermissionAggregator::new(data, store),
            config.qgis_server_base_path.clone(),
        );

        Self {
            config,
            walker,
            generator,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn walker(&self) -> &ThemeTreeWalker<O, D, S> {
        &self.walker
    }

    /// Themes document with only the themes `subject` may see.
    ///
    /// A missing or invalid themes config is an error.
    pub fn permissions(&self, subject: &Subject) -> PermissionResult<ThemesDocument> {
        let permissions = self.resolve_permission_map(subject)?;
        self.generator
            .generate(&self.config.themes_config_path, &permissions)
    }

    /// WMS and edit permissions of every theme in the config.
    pub fn resolve_permission_map(&self, subject: &Subject) -> PermissionResult<PermissionMap> {
        let config = ThemesConfig::load(&self.config.themes_config_path)?;

        let mut permissions = PermissionMap::new();
        self.walker.walk(&config.themes, &mut permissions, subject)?;

        tracing::info!(
            %subject,
            themes = permissions.len(),
            granted = permissions.values().filter(|r| r.is_granted()).count(),
            editable = permissions.values().filter(|r| r.edit_config.is_some()).count(),
            "resolved theme permissions"
        );

        Ok(permissions)
    }
}
