//! Per-theme permission records and the permission map built for one request.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use mapgate_core::ServiceIdentifier;

use crate::edit_schema::EditLayerConfig;

/// Edit configs of one theme, keyed by dataset (layer) name, in grant order.
pub type EditConfig = IndexMap<String, EditLayerConfig>;

/// Permissions of all themes in a config, keyed by WMS name.
///
/// Ordered so that identical inputs always serialize identically.
pub type PermissionMap = BTreeMap<ServiceIdentifier, PermissionRecord>;

/// OGC permissions of one WMS, as returned by the OGC permission oracle.
///
/// The oracle payload is opaque; an empty payload means access is denied.
/// `edit_config` is added by the resolver and serializes as an extra key next
/// to the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionRecord {
    #[serde(flatten)]
    pub grant: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_config: Option<EditConfig>,
}

impl PermissionRecord {
    pub fn granted(grant: Map<String, Value>) -> Self {
        Self {
            grant,
            edit_config: None,
        }
    }

    pub fn denied() -> Self {
        Self::default()
    }

    pub fn is_granted(&self) -> bool {
        !self.grant.is_empty()
    }

    /// Attach edit permissions. Empty configs are not attached.
    pub fn attach_edit_config(&mut self, edit_config: EditConfig) {
        if !edit_config.is_empty() {
            self.edit_config = Some(edit_config);
        }
    }
}
