//! Strongly-typed identifiers used across permission resolution.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PermissionError;

/// Identifier of a resource row in the permission store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(Uuid);

impl ResourceId {
    /// Create a new identifier.
    ///
    /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
    /// for determinism.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for ResourceId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for ResourceId {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s)
            .map_err(|e| PermissionError::invalid_config(format!("ResourceId: {e}")))?;
        Ok(Self(uuid))
    }
}

/// WMS name of a theme, relative to the QGIS server base path.
///
/// This is the key of the permission map and the `ows_name` handed to the OGC
/// permission oracle, so it must be kept byte-for-byte as derived.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceIdentifier(String);

impl ServiceIdentifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derive the identifier from a URL path.
    ///
    /// The base path is removed only when the path starts with it verbatim.
    pub fn from_path(path: &str, base_path: &str) -> Self {
        let name = path.strip_prefix(base_path).unwrap_or(path);
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl core::fmt::Display for ServiceIdentifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceIdentifier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl core::borrow::Borrow<str> for ServiceIdentifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}
