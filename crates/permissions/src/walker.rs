//! Recursive walk over the theme tree, collecting WMS and edit permissions.

use mapgate_core::{PermissionError, PermissionResult, ServiceIdentifier, Subject};

use crate::edit_permissions::EditPermissionAggregator;
use crate::oracle::{DataPermissionOracle, OgcPermissionOracle, OgcQuery};
use crate::record::PermissionMap;
use crate::store::PermissionStore;
use crate::theme::ThemeGroup;

/// Path component of a URL, exactly as written.
///
/// No percent-decoding or encoding and no dot-segment removal: the path is the
/// text between the authority and the first `?` or `#`. Relative URLs are
/// accepted. Only an authority with an unbalanced IPv6 bracket is rejected.
pub fn url_path(raw: &str) -> PermissionResult<String> {
    let mut rest = raw;

    if let Some(colon) = rest.find(':') {
        let (scheme, after) = (&rest[..colon], &rest[colon + 1..]);
        let is_port = !after.is_empty() && after.bytes().all(|b| b.is_ascii_digit());
        if is_scheme(scheme) && !is_port {
            rest = after;
        }
    }

    if let Some(after_slashes) = rest.strip_prefix("//") {
        let end = after_slashes
            .find(['/', '?', '#'])
            .unwrap_or(after_slashes.len());
        let authority = &after_slashes[..end];
        if authority.contains('[') != authority.contains(']') {
            return Err(PermissionError::invalid_url(raw, "unbalanced IPv6 brackets"));
        }
        rest = &after_slashes[end..];
    }

    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    Ok(rest[..end].to_string())
}

fn is_scheme(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
}

/// WMS name of a theme URL, relative to the QGIS server base path.
pub fn service_identifier(url: &str, base_path: &str) -> PermissionResult<ServiceIdentifier> {
    let path = url_path(url)?;
    Ok(ServiceIdentifier::from_path(&path, base_path))
}

/// Walks theme groups depth-first and fills a [`PermissionMap`].
pub struct ThemeTreeWalker<O, D, S> {
    ogc: O,
    edit: EditPermissionAggregator<D, S>,
    base_path: String,
}

impl<O, D, S> ThemeTreeWalker<O, D, S>
where
    O: OgcPermissionOracle,
    D: DataPermissionOracle,
    S: PermissionStore,
{
    pub fn new(ogc: O, edit: EditPermissionAggregator<D, S>, base_path: impl Into<String>) -> Self {
        Self {
            ogc,
            edit,
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn edit_permissions(&self) -> &EditPermissionAggregator<D, S> {
        &self.edit
    }

    /// Collect permissions of all themes in `theme_group` and its sub-groups.
    ///
    /// Items of a group are handled before its sub-groups. A WMS name seen
    /// twice keeps the record of its last occurrence. `subject` is the same
    /// for the whole walk.
    pub fn walk(
        &self,
        theme_group: &ThemeGroup,
        permissions: &mut PermissionMap,
        subject: &Subject,
    ) -> PermissionResult<()> {
        for item in &theme_group.items {
            let Some(url) = item.service_url() else {
                continue;
            };

            let wms_name = service_identifier(url, &self.base_path)?;
            let mut record = self.ogc.permissions(&OgcQuery::wms(&wms_name), subject)?;

            if record.is_granted() {
                let edit_config = self.edit.edit_permissions(wms_name.as_str(), subject)?;
                record.attach_edit_config(edit_config);
            }

            tracing::debug!(
                wms = %wms_name,
                granted = record.is_granted(),
                editable = record.edit_config.is_some(),
                "theme permissions"
            );
            permissions.insert(wms_name, record);
        }

        for sub_group in &theme_group.groups {
            self.walk(sub_group, permissions, subject)?;
        }

        Ok(())
    }
}
