//! In-memory permission store and oracles.
//!
//! Intended for tests/dev. One instance serves the relational store and both
//! permission oracles from the same resources and grants.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use mapgate_core::{PermissionError, PermissionResult, ResourceId, Subject};
use mapgate_permissions::oracle::OWS_TYPE_WMS;
use mapgate_permissions::{
    dataset_name, DataPermissionOracle, DataQuery, DatasetPermissions, OgcPermissionOracle,
    OgcQuery, PermissionRecord, PermissionStore, Resource, ResourceGrant, ResourceKind,
};

/// Holder of a grant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantSubject {
    User(String),
    Group(String),
}

/// A grant row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredGrant {
    pub subject: GrantSubject,
    pub resource_id: ResourceId,
    pub write: bool,
}

#[derive(Debug, Default)]
struct StoreState {
    resources: Vec<Resource>,
    grants: Vec<StoredGrant>,
    /// user -> groups
    memberships: BTreeMap<String, BTreeSet<String>>,
    /// WMS name -> OGC permission payload
    ogc: BTreeMap<String, Map<String, Value>>,
    /// `<map>.<layer>` -> dataset metadata
    datasets: BTreeMap<String, DatasetPermissions>,
}

impl StoreState {
    fn resource(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    /// Subjects whose grants apply to `subject`.
    fn grant_subjects(&self, subject: &Subject) -> BTreeSet<GrantSubject> {
        let mut subjects = BTreeSet::new();

        if let Some(user) = subject.user_name() {
            subjects.insert(GrantSubject::User(user.to_string()));
            for group in self.memberships.get(user).into_iter().flatten() {
                subjects.insert(GrantSubject::Group(group.clone()));
            }
        }
        if let Some(group) = subject.group_name() {
            subjects.insert(GrantSubject::Group(group.to_string()));
        }

        subjects
    }

    fn visible_grants(&self, subject: &Subject) -> Vec<ResourceGrant> {
        let subjects = self.grant_subjects(subject);

        self.grants
            .iter()
            .filter(|g| subjects.contains(&g.subject))
            .filter_map(|g| {
                self.resource(g.resource_id).map(|resource| ResourceGrant {
                    resource: resource.clone(),
                    write: g.write,
                })
            })
            .collect()
    }

    /// Qualified dataset name of a data resource.
    fn qualified_name(&self, resource: &Resource) -> Option<String> {
        let map = self.resource(resource.parent_id?)?;
        Some(dataset_name(&map.name, &resource.name))
    }
}

/// In-memory resources, grants and oracle metadata.
#[derive(Debug, Default)]
pub struct InMemoryPermissionStore {
    state: RwLock<StoreState>,
}

impl InMemoryPermissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> PermissionResult<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| PermissionError::store("lock poisoned"))
    }

    fn write(&self) -> PermissionResult<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| PermissionError::store("lock poisoned"))
    }

    pub fn add_resource(&self, resource: Resource) -> PermissionResult<()> {
        self.write()?.resources.push(resource);
        Ok(())
    }

    /// Add a map resource.
    pub fn add_map(&self, name: &str) -> PermissionResult<Resource> {
        let map = Resource::map(name);
        self.add_resource(map.clone())?;
        Ok(map)
    }

    /// Add a dataset resource under `map`.
    pub fn add_dataset(&self, map: &Resource, name: &str) -> PermissionResult<Resource> {
        if map.kind != ResourceKind::Map {
            return Err(PermissionError::store(format!(
                "'{}' is not a map resource",
                map.name
            )));
        }
        let data = Resource::data(name, map);
        self.add_resource(data.clone())?;
        Ok(data)
    }

    pub fn grant(&self, subject: GrantSubject, resource: &Resource, write: bool) -> PermissionResult<()> {
        self.write()?.grants.push(StoredGrant {
            subject,
            resource_id: resource.id,
            write,
        });
        Ok(())
    }

    pub fn add_member(&self, user: &str, group: &str) -> PermissionResult<()> {
        self.write()?
            .memberships
            .entry(user.to_string())
            .or_default()
            .insert(group.to_string());
        Ok(())
    }

    /// OGC payload returned for a permitted WMS.
    pub fn set_ogc_payload(&self, wms_name: &str, payload: Map<String, Value>) -> PermissionResult<()> {
        self.write()?.ogc.insert(wms_name.to_string(), payload);
        Ok(())
    }

    /// Metadata returned for a dataset by the data oracle.
    pub fn set_dataset(&self, dataset: &str, permissions: DatasetPermissions) -> PermissionResult<()> {
        self.write()?.datasets.insert(dataset.to_string(), permissions);
        Ok(())
    }

    /// Resource of `kind` named `name`, first match.
    pub fn find_resource(&self, kind: ResourceKind, name: &str) -> PermissionResult<Option<Resource>> {
        Ok(self
            .read()?
            .resources
            .iter()
            .find(|r| r.kind == kind && r.name == name)
            .cloned())
    }
}

impl PermissionStore for InMemoryPermissionStore {
    fn visible_grants(&self, subject: &Subject) -> PermissionResult<Vec<ResourceGrant>> {
        Ok(self.read()?.visible_grants(subject))
    }
}

impl OgcPermissionOracle for InMemoryPermissionStore {
    /// Granted iff the subject sees a grant on the map named like the WMS.
    fn permissions(&self, query: &OgcQuery, subject: &Subject) -> PermissionResult<PermissionRecord> {
        if query.ows_type != OWS_TYPE_WMS {
            return Ok(PermissionRecord::denied());
        }

        let state = self.read()?;
        let permitted = state
            .visible_grants(subject)
            .iter()
            .any(|g| g.resource.is_map_named(&query.ows_name));
        if !permitted {
            return Ok(PermissionRecord::denied());
        }

        let payload = state.ogc.get(&query.ows_name).cloned().unwrap_or_else(|| {
            let mut payload = Map::new();
            payload.insert("ows_name".to_string(), Value::String(query.ows_name.clone()));
            payload.insert("ows_type".to_string(), Value::String(query.ows_type.clone()));
            payload
        });

        Ok(PermissionRecord::granted(payload))
    }
}

impl DataPermissionOracle for InMemoryPermissionStore {
    /// Dataset metadata if the subject sees any grant on the dataset.
    fn permissions(
        &self,
        query: &DataQuery,
        subject: &Subject,
    ) -> PermissionResult<DatasetPermissions> {
        let state = self.read()?;
        let permitted = state.visible_grants(subject).iter().any(|g| {
            g.resource.kind == ResourceKind::Data
                && state.qualified_name(&g.resource).as_deref() == Some(query.dataset.as_str())
        });
        if !permitted {
            return Ok(DatasetPermissions::default());
        }

        Ok(state.datasets.get(&query.dataset).cloned().unwrap_or_default())
    }
}
