//! Theme generation boundary.

use std::path::Path;
use std::sync::Arc;

use mapgate_core::PermissionResult;

use crate::record::PermissionMap;
use crate::theme::ThemesDocument;

/// Renders the themes document of a request from the config and the resolved
/// permissions.
pub trait ThemeGenerator {
    fn generate(
        &self,
        config_path: &Path,
        permissions: &PermissionMap,
    ) -> PermissionResult<ThemesDocument>;
}

impl<T> ThemeGenerator for &T
where
    T: ThemeGenerator + ?Sized,
{
    fn generate(
        &self,
        config_path: &Path,
        permissions: &PermissionMap,
    ) -> PermissionResult<ThemesDocument> {
        (**self).generate(config_path, permissions)
    }
}

impl<T> ThemeGenerator for Arc<T>
where
    T: ThemeGenerator + ?Sized,
{
    fn generate(
        &self,
        config_path: &Path,
        permissions: &PermissionMap,
    ) -> PermissionResult<ThemesDocument> {
        (**self).generate(config_path, permissions)
    }
}
