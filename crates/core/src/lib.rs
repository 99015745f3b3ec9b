//! `mapgate-core` — shared building blocks for permission resolution.
//!
//! This crate contains the error model, the request subject and the
//! strongly-typed identifiers. It has no knowledge of theme configs, oracles
//! or storage.

pub mod error;
pub mod id;
pub mod subject;

pub use error::{PermissionError, PermissionResult};
pub use id::{ResourceId, ServiceIdentifier};
pub use subject::Subject;
