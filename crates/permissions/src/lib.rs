//! `mapgate-permissions` — theme and edit permission resolution for QWC2.
//!
//! Walks the theme tree of a `themesConfig.json`, asks the OGC permission
//! oracle about every theme WMS and derives edit form configs for the
//! datasets the subject may write.
//!
//! This crate is intentionally decoupled from HTTP and storage: the oracles,
//! the permission store and the theme generator are traits.

pub mod config;
pub mod edit_permissions;
pub mod edit_schema;
pub mod edit_types;
pub mod generator;
pub mod oracle;
pub mod record;
pub mod resolver;
pub mod store;
pub mod theme;
pub mod walker;

pub use config::ResolverConfig;
pub use edit_permissions::EditPermissionAggregator;
pub use edit_schema::{
    build_edit_layer_config, AttributeDescriptor, DatasetPermissions, EditFieldSpec,
    EditLayerConfig,
};
pub use edit_types::{EditFieldType, EditGeometryType};
pub use generator::ThemeGenerator;
pub use oracle::{dataset_name, DataPermissionOracle, DataQuery, OgcPermissionOracle, OgcQuery};
pub use record::{EditConfig, PermissionMap, PermissionRecord};
pub use resolver::PermissionResolver;
pub use store::{PermissionStore, Resource, ResourceGrant, ResourceKind};
pub use theme::{ThemeGroup, ThemeItem, ThemesConfig, ThemesDocument};
pub use walker::{service_identifier, ThemeTreeWalker};
