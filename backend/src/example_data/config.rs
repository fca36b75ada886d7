//! Example data configuration loaded via OrthoConfig.

use std::path::PathBuf;

use example_data::{RegistryError, SeedDefinition, SeedRegistry};
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_SEED_NAME: &str = "mossy-owl";

fn default_registry_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("example-data")
        .join("seeds.json")
}

/// Configuration values controlling example data seeding at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EXAMPLE_DATA")]
pub struct ExampleDataSettings {
    /// Enable example data seeding on startup.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Seed name to load from the registry.
    pub seed_name: Option<String>,
    /// Optional override for the number of POIs generated.
    #[ortho_config(file_key = "poi_count")]
    pub count: Option<usize>,
    /// Optional registry path override.
    pub registry_path: Option<PathBuf>,
}

impl ExampleDataSettings {
    /// Return the configured seed name, falling back to the default.
    pub fn seed_name(&self) -> &str {
        self.seed_name.as_deref().unwrap_or(DEFAULT_SEED_NAME)
    }

    /// Return the configured registry path, falling back to the default.
    pub fn registry_path(&self) -> PathBuf {
        self.registry_path
            .clone()
            .unwrap_or_else(default_registry_path)
    }

    /// Look up the configured seed, applying the count override if present.
    pub fn select_seed(&self, registry: &SeedRegistry) -> Result<SeedDefinition, RegistryError> {
        let seed = registry.find_seed(self.seed_name().trim())?;
        Ok(match self.count {
            Some(count) => seed.with_poi_count(count),
            None => seed.clone(),
        })
    }
}
