//! Lookup tables from PostGIS/PostgreSQL type names to QWC2 edit types.

use serde::{Deserialize, Serialize};

/// Geometry type understood by the QWC2 editing tools.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditGeometryType {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
}

/// PostGIS geometry type -> QWC2 edit geometry type.
///
/// There is no fallback: a type missing here cannot be edited.
const EDIT_GEOM_TYPES: &[(&str, EditGeometryType)] = &[
    ("POINT", EditGeometryType::Point),
    ("MULTIPOINT", EditGeometryType::MultiPoint),
    ("LINESTRING", EditGeometryType::LineString),
    ("MULTILINESTRING", EditGeometryType::MultiLineString),
    ("POLYGON", EditGeometryType::Polygon),
    ("MULTIPOLYGON", EditGeometryType::MultiPolygon),
];

impl EditGeometryType {
    /// Map a storage geometry type name. `None` means unsupported.
    pub fn from_storage(geometry_type: &str) -> Option<Self> {
        EDIT_GEOM_TYPES
            .iter()
            .find(|(name, _)| *name == geometry_type)
            .map(|(_, geom)| *geom)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EditGeometryType::Point => "Point",
            EditGeometryType::MultiPoint => "MultiPoint",
            EditGeometryType::LineString => "LineString",
            EditGeometryType::MultiLineString => "MultiLineString",
            EditGeometryType::Polygon => "Polygon",
            EditGeometryType::MultiPolygon => "MultiPolygon",
        }
    }
}

impl core::fmt::Display for EditGeometryType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input widget type of an edit form field.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditFieldType {
    Number,
    Boolean,
    Text,
    Date,
    Time,
    /// Selection from enumerated constraint values.
    List,
}

/// Field type for column types not listed in [`EDIT_FIELD_TYPES`].
pub const DEFAULT_EDIT_FIELD_TYPE: EditFieldType = EditFieldType::Text;

/// PostgreSQL `data_type` -> QWC2 edit field type.
const EDIT_FIELD_TYPES: &[(&str, EditFieldType)] = &[
    ("bigint", EditFieldType::Number),
    ("boolean", EditFieldType::Boolean),
    ("character varying", EditFieldType::Text),
    ("date", EditFieldType::Date),
    ("double precision", EditFieldType::Text),
    ("integer", EditFieldType::Number),
    ("numeric", EditFieldType::Number),
    ("real", EditFieldType::Text),
    ("smallint", EditFieldType::Number),
    ("text", EditFieldType::Text),
    ("time", EditFieldType::Time),
    ("timestamp with time zone", EditFieldType::Date),
    ("timestamp without time zone", EditFieldType::Date),
    ("uuid", EditFieldType::Text),
];

impl EditFieldType {
    /// Map a column data type, falling back to `default` for unlisted types.
    pub fn from_column_type_or(data_type: Option<&str>, default: EditFieldType) -> Self {
        data_type
            .and_then(|data_type| {
                EDIT_FIELD_TYPES
                    .iter()
                    .find(|(name, _)| *name == data_type)
                    .map(|(_, field_type)| *field_type)
            })
            .unwrap_or(default)
    }

    /// Map a column data type with the standard `text` fallback.
    pub fn from_column_type(data_type: Option<&str>) -> Self {
        Self::from_column_type_or(data_type, DEFAULT_EDIT_FIELD_TYPE)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EditFieldType::Number => "number",
            EditFieldType::Boolean => "boolean",
            EditFieldType::Text => "text",
            EditFieldType::Date => "date",
            EditFieldType::Time => "time",
            EditFieldType::List => "list",
        }
    }
}

impl core::fmt::Display for EditFieldType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
