//! JSON permission fixtures for the in-memory store.
//!
//! A fixture describes maps with their datasets, grants by user or group,
//! group memberships and the metadata the oracles hand out:
//!
//! ```json
//! {
//!   "maps": [{"name": "Map1", "datasets": ["parcels"]}],
//!   "grants": [
//!     {"group": "editors", "resource": "Map1"},
//!     {"user": "alice", "resource": "Map1.parcels", "write": true}
//!   ],
//!   "members": {"alice": ["editors"]},
//!   "ogc": {"Map1": {"layers": [{"name": "parcels"}]}},
//!   "datasets": {"Map1.parcels": {"geometry_type": "POLYGON", "attributes": ["owner"]}}
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use mapgate_core::PermissionError;
use mapgate_permissions::{dataset_name, DatasetPermissions, Resource};

use crate::in_memory::{GrantSubject, InMemoryPermissionStore};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse fixture '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("grant references unknown resource '{0}'")]
    UnknownResource(String),

    #[error(transparent)]
    Store(#[from] PermissionError),
}

/// A map resource and the names of its datasets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapFixture {
    pub name: String,
    #[serde(default)]
    pub datasets: Vec<String>,
}

/// A grant on a map (`"Map1"`) or dataset (`"Map1.parcels"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantFixture {
    #[serde(flatten)]
    pub subject: GrantSubject,
    pub resource: String,
    #[serde(default)]
    pub write: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionFixture {
    #[serde(default)]
    pub maps: Vec<MapFixture>,
    #[serde(default)]
    pub grants: Vec<GrantFixture>,
    /// user -> groups
    #[serde(default)]
    pub members: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub ogc: BTreeMap<String, Map<String, Value>>,
    #[serde(default)]
    pub datasets: BTreeMap<String, DatasetPermissions>,
}

impl PermissionFixture {
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let raw = std::fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| FixtureError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build an in-memory store holding everything in the fixture.
    ///
    /// Grants are stored in fixture order.
    pub fn into_store(self) -> Result<InMemoryPermissionStore, FixtureError> {
        let store = InMemoryPermissionStore::new();
        let mut resources: BTreeMap<String, Resource> = BTreeMap::new();

        for map_fixture in &self.maps {
            let map = store.add_map(&map_fixture.name)?;
            for name in &map_fixture.datasets {
                let data = store.add_dataset(&map, name)?;
                resources.insert(dataset_name(&map.name, name), data);
            }
            resources.insert(map.name.clone(), map);
        }

        for grant in self.grants {
            let resource = resources
                .get(&grant.resource)
                .ok_or_else(|| FixtureError::UnknownResource(grant.resource.clone()))?;
            store.grant(grant.subject, resource, grant.write)?;
        }

        for (user, groups) in &self.members {
            for group in groups {
                store.add_member(user, group)?;
            }
        }
        for (wms_name, payload) in self.ogc {
            store.set_ogc_payload(&wms_name, payload)?;
        }
        for (dataset, permissions) in self.datasets {
            store.set_dataset(&dataset, permissions)?;
        }

        tracing::debug!(
            maps = self.maps.len(),
            resources = resources.len(),
            "loaded permission fixture"
        );

        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use mapgate_core::Subject;
    use mapgate_permissions::PermissionStore;
    use serde_json::json;

    fn fixture(value: Value) -> PermissionFixture {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_user_and_group_grants() {
        let parsed = fixture(json!({
            "grants": [
                {"group": "editors", "resource": "Map1"},
                {"user": "alice", "resource": "Map1.parcels", "write": true}
            ]
        }));

        assert_eq!(parsed.grants[0].subject, GrantSubject::Group("editors".into()));
        assert!(!parsed.grants[0].write);
        assert_eq!(parsed.grants[1].subject, GrantSubject::User("alice".into()));
        assert!(parsed.grants[1].write);
    }

    #[test]
    fn builds_store_with_memberships() {
        let store = fixture(json!({
            "maps": [{"name": "Map1", "datasets": ["parcels"]}],
            "grants": [
                {"group": "editors", "resource": "Map1"},
                {"group": "editors", "resource": "Map1.parcels", "write": true}
            ],
            "members": {"alice": ["editors"]}
        }))
        .into_store()
        .unwrap();

        let grants = store.visible_grants(&Subject::user("alice")).unwrap();
        let names: Vec<&str> = grants.iter().map(|g| g.resource.name.as_str()).collect();
        assert_eq!(names, vec!["Map1", "parcels"]);
        assert!(store.visible_grants(&Subject::user("bob")).unwrap().is_empty());
    }

    #[test]
    fn unknown_grant_resource_is_rejected() {
        let err = fixture(json!({
            "maps": [{"name": "Map1"}],
            "grants": [{"user": "alice", "resource": "Map1.roads"}]
        }))
        .into_store()
        .unwrap_err();

        assert!(matches!(err, FixtureError::UnknownResource(name) if name == "Map1.roads"));
    }

    #[test]
    fn load_reads_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"maps": [{{"name": "Map1"}}]}}"#).unwrap();

        let loaded = PermissionFixture::load(file.path()).unwrap();
        assert_eq!(loaded.maps[0].name, "Map1");

        let dir = tempfile::tempdir().unwrap();
        let err = PermissionFixture::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, FixtureError::Read { .. }));
    }
}
