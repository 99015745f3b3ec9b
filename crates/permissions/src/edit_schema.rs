//! Edit form schema of a dataset, derived from data service metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::edit_types::{EditFieldType, EditGeometryType};
use crate::oracle::dataset_name;

/// Constraint key holding enumerated values.
pub const CONSTRAINT_VALUES: &str = "values";

/// Dataset permissions as returned by the data permission oracle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetPermissions {
    /// PostGIS geometry type of the geometry column.
    #[serde(default)]
    pub geometry_type: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub table_name: Option<String>,
    /// Permitted attributes, in display order.
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, AttributeDescriptor>,
}

impl DatasetPermissions {
    /// `<schema>.<table_name>`, for diagnostics.
    pub fn qualified_table(&self) -> String {
        format!(
            "{}.{}",
            self.schema.as_deref().unwrap_or("?"),
            self.table_name.as_deref().unwrap_or("?")
        )
    }
}

/// Column metadata of one attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub constraints: Option<Map<String, Value>>,
}

/// One field of a QWC2 edit form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditFieldSpec {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: EditFieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Map<String, Value>>,
}

impl EditFieldSpec {
    /// Build the form field for attribute `id`.
    pub fn from_descriptor(id: &str, descriptor: &AttributeDescriptor) -> Self {
        let name = descriptor.alias.clone().unwrap_or_else(|| id.to_string());
        let mut field_type = EditFieldType::from_column_type(descriptor.data_type.as_deref());

        if let Some(constraints) = &descriptor.constraints {
            if constraints.contains_key(CONSTRAINT_VALUES) {
                field_type = EditFieldType::List;
            }
        }

        Self {
            id: id.to_string(),
            name,
            field_type,
            constraints: descriptor.constraints.clone(),
        }
    }
}

/// Edit config of one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditLayerConfig {
    pub layer_name: String,
    pub edit_dataset: String,
    pub fields: Vec<EditFieldSpec>,
    pub geom_type: EditGeometryType,
}

/// Build the edit config of `<map_name>.<layer_name>` from its permissions.
///
/// Returns `None` if the geometry type cannot be edited; that case is logged
/// and is not an error.
pub fn build_edit_layer_config(
    map_name: &str,
    layer_name: &str,
    permissions: &DatasetPermissions,
) -> Option<EditLayerConfig> {
    let dataset = dataset_name(map_name, layer_name);
    let geometry_type = permissions.geometry_type.as_deref().unwrap_or_default();

    let Some(geom_type) = EditGeometryType::from_storage(geometry_type) else {
        tracing::warn!(
            geometry_type,
            dataset = %dataset,
            table = %permissions.qualified_table(),
            "unsupported geometry type for edit dataset"
        );
        return None;
    };

    let empty = AttributeDescriptor::default();
    let fields = permissions
        .attributes
        .iter()
        .map(|attr| {
            let descriptor = permissions.fields.get(attr).unwrap_or(&empty);
            EditFieldSpec::from_descriptor(attr, descriptor)
        })
        .collect();

    Some(EditLayerConfig {
        layer_name: layer_name.to_string(),
        edit_dataset: dataset,
        fields,
        geom_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    use proptest::prelude::*;
    use serde_json::{json, Map, Value};
    use tracing_subscriber::fmt::MakeWriter;

    fn permissions(value: Value) -> DatasetPermissions {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn builds_polygon_layer_with_text_field() {
        let perms = permissions(json!({
            "geometry_type": "POLYGON",
            "schema": "public",
            "table_name": "parcels",
            "attributes": ["owner"],
            "fields": {"owner": {"data_type": "character varying"}}
        }));

        let config = build_edit_layer_config("Map1", "parcels", &perms).unwrap();
        assert_eq!(config.layer_name, "parcels");
        assert_eq!(config.edit_dataset, "Map1.parcels");
        assert_eq!(config.geom_type, EditGeometryType::Polygon);
        assert_eq!(
            serde_json::to_value(&config.fields).unwrap(),
            json!([{"id": "owner", "name": "owner", "type": "text"}])
        );
    }

    #[test]
    fn unsupported_geometry_yields_no_config() {
        let perms = permissions(json!({
            "geometry_type": "GEOMETRYCOLLECTION",
            "schema": "public",
            "table_name": "mixed",
            "attributes": ["name"],
            "fields": {}
        }));

        assert!(build_edit_layer_config("Map1", "mixed", &perms).is_none());
        assert!(build_edit_layer_config("Map1", "unknown", &DatasetPermissions::default()).is_none());
    }

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes).unwrap().lines().map(str::to_string).collect()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn unsupported_geometry_warns_once_with_dataset_and_table() {
        let perms = permissions(json!({
            "geometry_type": "GEOMETRYCOLLECTION",
            "schema": "public",
            "table_name": "mixed",
            "attributes": ["name"]
        }));
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        let config = tracing::subscriber::with_default(subscriber, || {
            build_edit_layer_config("Map1", "mixed", &perms)
        });

        assert!(config.is_none());
        let lines = buffer.lines();
        assert_eq!(lines.len(), 1, "{lines:?}");
        assert!(lines[0].contains("WARN"));
        assert!(lines[0].contains("GEOMETRYCOLLECTION"));
        assert!(lines[0].contains("Map1.mixed"));
        assert!(lines[0].contains("public.mixed"));
    }

    #[test]
    fn supported_geometry_does_not_warn() {
        let perms = permissions(json!({"geometry_type": "POINT", "attributes": []}));
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_max_level(tracing::Level::WARN)
            .finish();

        let config = tracing::subscriber::with_default(subscriber, || {
            build_edit_layer_config("Map1", "trees", &perms)
        });

        assert!(config.is_some());
        assert!(buffer.lines().is_empty());
    }

    #[test]
    fn fields_follow_attribute_order() {
        let perms = permissions(json!({
            "geometry_type": "POINT",
            "attributes": ["zeta", "alpha", "mid"],
            "fields": {
                "alpha": {"data_type": "integer"},
                "mid": {"data_type": "date", "alias": "Middle"},
                "zeta": {"data_type": "boolean"}
            }
        }));

        let config = build_edit_layer_config("m", "l", &perms).unwrap();
        let ids: Vec<&str> = config.fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
        assert_eq!(config.fields[0].field_type, EditFieldType::Boolean);
        assert_eq!(config.fields[1].field_type, EditFieldType::Number);
        assert_eq!(config.fields[2].name, "Middle");
        assert_eq!(config.fields[2].field_type, EditFieldType::Date);
    }

    #[test]
    fn attribute_without_descriptor_is_plain_text() {
        let perms = permissions(json!({
            "geometry_type": "LINESTRING",
            "attributes": ["remarks"]
        }));

        let config = build_edit_layer_config("m", "l", &perms).unwrap();
        assert_eq!(config.fields[0].name, "remarks");
        assert_eq!(config.fields[0].field_type, EditFieldType::Text);
        assert_eq!(config.fields[0].constraints, None);
    }

    #[test]
    fn constraints_are_copied_and_values_force_list() {
        let perms = permissions(json!({
            "geometry_type": "MULTIPOLYGON",
            "attributes": ["kind", "area"],
            "fields": {
                "kind": {
                    "data_type": "integer",
                    "constraints": {"values": [{"value": 1, "label": "Forest"}]}
                },
                "area": {
                    "data_type": "numeric",
                    "constraints": {"min": 0, "step": 0.5}
                }
            }
        }));

        let config = build_edit_layer_config("m", "l", &perms).unwrap();
        assert_eq!(config.fields[0].field_type, EditFieldType::List);
        assert_eq!(
            config.fields[0].constraints.as_ref().unwrap()["values"][0]["label"],
            "Forest"
        );
        assert_eq!(config.fields[1].field_type, EditFieldType::Number);
        assert_eq!(config.fields[1].constraints.as_ref().unwrap()["min"], 0);
    }

    #[test]
    fn layer_config_serializes_camel_case() {
        let perms = permissions(json!({"geometry_type": "POINT", "attributes": []}));
        let config = build_edit_layer_config("Map1", "trees", &perms).unwrap();

        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({
                "layerName": "trees",
                "editDataset": "Map1.trees",
                "fields": [],
                "geomType": "Point"
            })
        );
    }

    proptest! {
        /// Property: enumerated constraint values always win over the column type.
        #[test]
        fn values_constraint_always_yields_list(
            data_type in prop::option::of(prop::sample::select(vec![
                "bigint", "boolean", "date", "integer", "time", "uuid", "jsonb",
            ])),
            alias in prop::option::of("[A-Za-z ]{1,12}"),
        ) {
            let mut constraints = Map::new();
            constraints.insert(CONSTRAINT_VALUES.to_string(), json!(["a", "b"]));
            let descriptor = AttributeDescriptor {
                alias,
                data_type: data_type.map(str::to_string),
                constraints: Some(constraints),
            };

            let field = EditFieldSpec::from_descriptor("attr", &descriptor);
            prop_assert_eq!(field.field_type, EditFieldType::List);
        }
    }
}
