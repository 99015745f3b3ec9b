//! `mapgate` — print the themes document of one subject.
//!
//! Reads the resolver settings from `QWC2_PATH`, `QWC2_THEMES_CONFIG` and
//! `QGIS_SERVER_URL`, the permission fixture from `MAPGATE_FIXTURE` and the
//! subject from `MAPGATE_USER` / `MAPGATE_GROUP`.

use std::path::PathBuf;

use anyhow::Context;

use mapgate_core::Subject;
use mapgate_infra::{FilteredThemeGenerator, PermissionFixture};
use mapgate_permissions::{PermissionResolver, ResolverConfig};

const DEFAULT_FIXTURE: &str = "permissions.json";

fn main() -> anyhow::Result<()> {
    mapgate_observability::init();

    let config = ResolverConfig::from_env().context("load resolver config")?;

    let fixture_path = std::env::var("MAPGATE_FIXTURE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            tracing::warn!("MAPGATE_FIXTURE not set; using {DEFAULT_FIXTURE}");
            PathBuf::from(DEFAULT_FIXTURE)
        });
    let store = PermissionFixture::load(&fixture_path)?
        .into_store()
        .with_context(|| format!("build store from {}", fixture_path.display()))?;

    let subject = Subject::new(
        std::env::var("MAPGATE_USER").ok(),
        std::env::var("MAPGATE_GROUP").ok(),
    );

    tracing::info!(
        themes_config = %config.themes_config_path.display(),
        base_path = %config.qgis_server_base_path,
        %subject,
        "resolving themes"
    );

    let generator = FilteredThemeGenerator::from_config(&config);
    let resolver = PermissionResolver::new(config, &store, &store, &store, generator);
    let document = resolver
        .permissions(&subject)
        .context("resolve theme permissions")?;

    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
