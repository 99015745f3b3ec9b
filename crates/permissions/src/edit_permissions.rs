//! Edit permissions of a map: which datasets may be edited, and how.

use mapgate_core::{PermissionResult, ResourceId, Subject};

use crate::edit_schema::{build_edit_layer_config, EditLayerConfig};
use crate::oracle::{dataset_name, DataPermissionOracle, DataQuery};
use crate::record::EditConfig;
use crate::store::{PermissionStore, ResourceGrant};

/// Collects edit configs of the datasets a subject may write.
pub struct EditPermissionAggregator<D, S> {
    data: D,
    store: S,
}

impl<D, S> EditPermissionAggregator<D, S>
where
    D: DataPermissionOracle,
    S: PermissionStore,
{
    pub fn new(data: D, store: S) -> Self {
        Self { data, store }
    }

    /// Edit configs of all writable datasets of `map_name`, keyed by dataset.
    ///
    /// Datasets without an edit config (unsupported geometry) are left out.
    pub fn edit_permissions(&self, map_name: &str, subject: &Subject) -> PermissionResult<EditConfig> {
        let mut edit_config = EditConfig::new();

        for dataset in self.edit_datasets(map_name, subject)? {
            if let Some(layer_config) = self.edit_layer_config(map_name, &dataset, subject)? {
                edit_config.insert(dataset, layer_config);
            }
        }

        Ok(edit_config)
    }

    /// Names of the datasets of `map_name` the subject holds a write grant on.
    ///
    /// Empty if the map does not exist or is not permitted.
    pub fn edit_datasets(&self, map_name: &str, subject: &Subject) -> PermissionResult<Vec<String>> {
        let grants = self.store.visible_grants(subject)?;

        let Some(map_id) = permitted_map_id(&grants, map_name) else {
            tracing::debug!(map = map_name, %subject, "map not found or not permitted");
            return Ok(vec![]);
        };

        let mut datasets: Vec<String> = Vec::new();
        for grant in grants
            .iter()
            .filter(|g| g.write && g.resource.is_data_of(map_id))
        {
            if !datasets.contains(&grant.resource.name) {
                datasets.push(grant.resource.name.clone());
            }
        }

        Ok(datasets)
    }

    /// Edit config of one dataset, `None` if it cannot be edited.
    pub fn edit_layer_config(
        &self,
        map_name: &str,
        layer_name: &str,
        subject: &Subject,
    ) -> PermissionResult<Option<EditLayerConfig>> {
        let query = DataQuery::new(dataset_name(map_name, layer_name));
        let permissions = self.data.permissions(&query, subject)?;

        Ok(build_edit_layer_config(map_name, layer_name, &permissions))
    }
}

/// Map resource named `map_name` among the grants (last one wins).
fn permitted_map_id(grants: &[ResourceGrant], map_name: &str) -> Option<ResourceId> {
    grants
        .iter()
        .filter(|g| g.resource.is_map_named(map_name))
        .map(|g| g.resource.id)
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use serde_json::json;

    use crate::edit_schema::DatasetPermissions;
    use crate::store::Resource;

    struct StaticGrants(Vec<ResourceGrant>);

    impl PermissionStore for StaticGrants {
        fn visible_grants(&self, _subject: &Subject) -> PermissionResult<Vec<ResourceGrant>> {
            Ok(self.0.clone())
        }
    }

    struct StaticDatasets(BTreeMap<String, DatasetPermissions>);

    impl DataPermissionOracle for StaticDatasets {
        fn permissions(
            &self,
            query: &DataQuery,
            _subject: &Subject,
        ) -> PermissionResult<DatasetPermissions> {
            Ok(self.0.get(&query.dataset).cloned().unwrap_or_default())
        }
    }

    fn grant(resource: &Resource, write: bool) -> ResourceGrant {
        ResourceGrant {
            resource: resource.clone(),
            write,
        }
    }

    fn dataset(geometry_type: &str) -> DatasetPermissions {
        serde_json::from_value(json!({
            "geometry_type": geometry_type,
            "schema": "public",
            "table_name": "t",
            "attributes": ["name"],
            "fields": {"name": {"data_type": "text"}}
        }))
        .unwrap()
    }

    fn fixture() -> (StaticGrants, StaticDatasets) {
        let map = Resource::map("Map1");
        let other_map = Resource::map("Map2");
        let parcels = Resource::data("parcels", &map);
        let roads = Resource::data("roads", &map);
        let mixed = Resource::data("mixed", &map);
        let foreign = Resource::data("rivers", &other_map);

        let grants = StaticGrants(vec![
            grant(&map, false),
            grant(&other_map, false),
            grant(&roads, true),
            grant(&parcels, true),
            grant(&parcels, true),
            grant(&mixed, true),
            grant(&foreign, true),
            grant(&Resource::data("readonly", &map), false),
        ]);

        let datasets = StaticDatasets(BTreeMap::from([
            ("Map1.parcels".to_string(), dataset("POLYGON")),
            ("Map1.roads".to_string(), dataset("MULTILINESTRING")),
            ("Map1.mixed".to_string(), dataset("GEOMETRYCOLLECTION")),
            ("Map2.rivers".to_string(), dataset("LINESTRING")),
        ]));

        (grants, datasets)
    }

    #[test]
    fn lists_writable_datasets_of_the_map_in_store_order() {
        let (grants, datasets) = fixture();
        let aggregator = EditPermissionAggregator::new(&datasets, &grants);

        let names = aggregator.edit_datasets("Map1", &Subject::user("alice")).unwrap();
        assert_eq!(names, vec!["roads", "parcels", "mixed"]);
    }

    #[test]
    fn unknown_map_has_no_datasets() {
        let (grants, datasets) = fixture();
        let aggregator = EditPermissionAggregator::new(&datasets, &grants);
        let subject = Subject::user("alice");

        assert!(aggregator.edit_datasets("Nope", &subject).unwrap().is_empty());
        assert!(aggregator.edit_permissions("Nope", &subject).unwrap().is_empty());
    }

    #[test]
    fn data_grants_without_map_grant_are_ignored() {
        let map = Resource::map("Map1");
        let parcels = Resource::data("parcels", &map);
        let grants = StaticGrants(vec![grant(&parcels, true)]);
        let datasets = StaticDatasets(BTreeMap::new());
        let aggregator = EditPermissionAggregator::new(&datasets, &grants);

        assert!(aggregator.edit_datasets("Map1", &Subject::user("alice")).unwrap().is_empty());
    }

    #[test]
    fn edit_permissions_keep_grant_order_and_omit_unsupported_geometry() {
        let (grants, datasets) = fixture();
        let aggregator = EditPermissionAggregator::new(&datasets, &grants);

        let config = aggregator.edit_permissions("Map1", &Subject::user("alice")).unwrap();
        let keys: Vec<&str> = config.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["roads", "parcels"]);
        assert_eq!(
            serde_json::to_string(&config).unwrap().find("\"roads\""),
            Some(1)
        );
        assert_eq!(config["parcels"].edit_dataset, "Map1.parcels");
        assert_eq!(config["roads"].geom_type.as_str(), "MultiLineString");
    }

    #[test]
    fn store_errors_propagate() {
        struct FailingStore;

        impl PermissionStore for FailingStore {
            fn visible_grants(&self, _subject: &Subject) -> PermissionResult<Vec<ResourceGrant>> {
                Err(mapgate_core::PermissionError::store("connection refused"))
            }
        }

        let datasets = StaticDatasets(BTreeMap::new());
        let aggregator = EditPermissionAggregator::new(&datasets, FailingStore);
        let err = aggregator.edit_permissions("Map1", &Subject::anonymous()).unwrap_err();
        assert!(matches!(err, mapgate_core::PermissionError::Store(_)));
    }
}
