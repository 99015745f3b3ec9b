//! OGC and data permission oracles.
//!
//! Both oracles are owned by other services; the resolver only knows the
//! query/answer shapes defined here.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use mapgate_core::{PermissionResult, ServiceIdentifier, Subject};

use crate::edit_schema::DatasetPermissions;
use crate::record::PermissionRecord;

/// OWS type queried for themes.
pub const OWS_TYPE_WMS: &str = "WMS";

/// Query for the OGC permission oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OgcQuery {
    pub ows_type: String,
    pub ows_name: String,
}

impl OgcQuery {
    pub fn wms(name: &ServiceIdentifier) -> Self {
        Self {
            ows_type: OWS_TYPE_WMS.to_string(),
            ows_name: name.as_str().to_string(),
        }
    }
}

/// Query for the data permission oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQuery {
    pub dataset: String,
}

impl DataQuery {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
        }
    }
}

/// Qualified dataset name `<map>.<layer>`.
pub fn dataset_name(map_name: &str, layer_name: &str) -> String {
    format!("{map_name}.{layer_name}")
}

/// Permissions on an OGC service (WMS, WFS, ...).
pub trait OgcPermissionOracle {
    /// An empty record means the subject may not access the service.
    fn permissions(&self, query: &OgcQuery, subject: &Subject) -> PermissionResult<PermissionRecord>;
}

/// Permissions and table metadata of an editable dataset.
pub trait DataPermissionOracle {
    fn permissions(
        &self,
        query: &DataQuery,
        subject: &Subject,
    ) -> PermissionResult<DatasetPermissions>;
}

impl<T> OgcPermissionOracle for &T
where
    T: OgcPermissionOracle + ?Sized,
{
    fn permissions(&self, query: &OgcQuery, subject: &Subject) -> PermissionResult<PermissionRecord> {
        (**self).permissions(query, subject)
    }
}

impl<T> OgcPermissionOracle for Arc<T>
where
    T: OgcPermissionOracle + ?Sized,
{
    fn permissions(&self, query: &OgcQuery, subject: &Subject) -> PermissionResult<PermissionRecord> {
        (**self).permissions(query, subject)
    }
}

impl<T> DataPermissionOracle for &T
where
    T: DataPermissionOracle + ?Sized,
{
    fn permissions(
        &self,
        query: &DataQuery,
        subject: &Subject,
    ) -> PermissionResult<DatasetPermissions> {
        (**self).permissions(query, subject)
    }
}

impl<T> DataPermissionOracle for Arc<T>
where
    T: DataPermissionOracle + ?Sized,
{
    fn permissions(
        &self,
        query: &DataQuery,
        subject: &Subject,
    ) -> PermissionResult<DatasetPermissions> {
        (**self).permissions(query, subject)
    }
}
