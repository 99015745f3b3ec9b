//! Relational permission store boundary (resources and grants).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use mapgate_core::{PermissionResult, ResourceId, Subject};

/// Kind of a permission resource.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A map (QGIS project / WMS).
    Map,
    /// A dataset belonging to a map.
    Data,
}

/// A resource row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<ResourceId>,
}

impl Resource {
    pub fn map(name: impl Into<String>) -> Self {
        Self {
            id: ResourceId::new(),
            kind: ResourceKind::Map,
            name: name.into(),
            parent_id: None,
        }
    }

    pub fn data(name: impl Into<String>, map: &Resource) -> Self {
        Self {
            id: ResourceId::new(),
            kind: ResourceKind::Data,
            name: name.into(),
            parent_id: Some(map.id),
        }
    }

    pub fn is_map_named(&self, name: &str) -> bool {
        self.kind == ResourceKind::Map && self.name == name
    }

    pub fn is_data_of(&self, map_id: ResourceId) -> bool {
        self.kind == ResourceKind::Data && self.parent_id == Some(map_id)
    }
}

/// A grant on a resource, as visible to one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGrant {
    pub resource: Resource,
    pub write: bool,
}

/// Query side of the permission store.
pub trait PermissionStore {
    /// All grants the subject holds, directly or through its groups.
    ///
    /// Grants are returned in store iteration order.
    fn visible_grants(&self, subject: &Subject) -> PermissionResult<Vec<ResourceGrant>>;
}

impl<T> PermissionStore for &T
where
    T: PermissionStore + ?Sized,
{
    fn visible_grants(&self, subject: &Subject) -> PermissionResult<Vec<ResourceGrant>> {
        (**self).visible_grants(subject)
    }
}

impl<T> PermissionStore for Arc<T>
where
    T: PermissionStore + ?Sized,
{
    fn visible_grants(&self, subject: &Subject) -> PermissionResult<Vec<ResourceGrant>> {
        (**self).visible_grants(subject)
    }
}
