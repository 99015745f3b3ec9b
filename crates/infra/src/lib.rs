//! Infrastructure layer: in-memory permission store, oracles, fixtures and
//! theme generation.

pub mod fixture;
pub mod in_memory;
pub mod theme_generator;


pub use fixture::{FixtureError, GrantFixture, MapFixture, PermissionFixture};
pub use in_memory::{GrantSubject, InMemoryPermissionStore, StoredGrant};
pub use theme_generator::FilteredThemeGenerator;
