//! Startup seeding orchestration.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use example_data::{ExamplePoiSeed, GenerationError, RegistryError, SeedRegistry};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::ports::{PoiStore, PoiStoreError};
use crate::domain::{
    PoiCategory, PoiDraft, PoiName, PoiValidationError, Position, within_unit_of_work,
};
use crate::example_data::config::ExampleDataSettings;

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    /// Registry file could not be read.
    #[error("failed to read registry at {path}: {source}")]
    RegistryRead {
        /// Path to the registry file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Registry parsing or seed lookup failed.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    /// POI generation failed.
    #[error("example data generation error: {0}")]
    Generation(#[from] GenerationError),
    /// Writing the generated POIs failed.
    #[error("example data persistence error: {0}")]
    Store(#[from] PoiStoreError),
    /// Seed name must not be empty.
    #[error("seed name must not be empty")]
    EmptySeedName,
}

/// What a seeding run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleDataSeedOutcome {
    /// Registry seed that was applied.
    pub seed_name: String,
    /// POIs written to the store.
    pub created: usize,
    /// Generated POIs rejected by domain validation.
    pub skipped: usize,
}

/// Write example POIs to `store` when enabled.
///
/// All generated POIs are created in one unit of work, so either every valid
/// POI is stored or none is.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::PathBuf;
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use poi_backend::example_data::{ExampleDataSettings, seed_example_data_on_startup};
/// use poi_backend::outbound::memory::InMemoryPoiStore;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = ExampleDataSettings {
///     enabled: true,
///     seed_name: Some("mossy-owl".to_owned()),
///     count: None,
///     registry_path: Some(PathBuf::from("fixtures/example-data/seeds.json")),
/// };
/// let store = InMemoryPoiStore::new(Arc::new(DefaultClock));
/// let outcome = seed_example_data_on_startup(&settings, &store).await?;
/// assert!(outcome.is_some());
/// # Ok(())
/// # }
/// ```
pub async fn seed_example_data_on_startup(
    settings: &ExampleDataSettings,
    store: &dyn PoiStore,
) -> Result<Option<ExampleDataSeedOutcome>, StartupSeedingError> {
    if !settings.enabled {
        info!(reason = "disabled", "example data seeding skipped");
        return Ok(None);
    }

    let seed_name = settings.seed_name().trim();
    if seed_name.is_empty() {
        return Err(StartupSeedingError::EmptySeedName);
    }

    let registry = load_registry(&settings.registry_path())?;
    let seed_def = settings.select_seed(&registry)?;
    let generated = example_data::generate_example_pois(&seed_def)?;

    let mut drafts = Vec::with_capacity(generated.len());
    let mut skipped = 0_usize;
    for seed in &generated {
        match draft_from_seed(seed) {
            Ok(draft) => drafts.push(draft),
            Err(err) => {
                skipped += 1;
                warn!(name = %seed.name, error = %err, "skipping invalid example poi");
            }
        }
    }

    let created = within_unit_of_work(store, |uow| {
        Box::pin(async move {
            for draft in &drafts {
                uow.create(draft).await?;
            }
            Ok::<_, PoiStoreError>(drafts.len())
        })
    })
    .await?;

    info!(
        seed_key = seed_name,
        created, skipped, "example data seeding applied"
    );

    Ok(Some(ExampleDataSeedOutcome {
        seed_name: seed_name.to_owned(),
        created,
        skipped,
    }))
}

fn draft_from_seed(seed: &ExamplePoiSeed) -> Result<PoiDraft, PoiValidationError> {
    Ok(PoiDraft {
        name: PoiName::new(seed.name.as_str())?,
        position: Position::new(seed.latitude, seed.longitude)?,
        category: PoiCategory::try_from(seed.category_code)?,
    })
}

fn load_registry(path: &Path) -> Result<SeedRegistry, StartupSeedingError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    let read_error = |source: std::io::Error| StartupSeedingError::RegistryRead {
        path: path.to_path_buf(),
        source,
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "registry path must be a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let contents = dir.read_to_string(Path::new(file_name)).map_err(read_error)?;
    Ok(SeedRegistry::from_json(&contents)?)
}

#[cfg(test)]
mod tests {
    //! Seeding coverage against the in-memory store.

    use std::sync::Arc;

    use mockable::DefaultClock;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::{CursorFilter, PoiCursor};
    use crate::outbound::memory::InMemoryPoiStore;

    fn fixture_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join("example-data")
            .join("seeds.json")
    }

    fn settings(enabled: bool, seed_name: &str, count: Option<usize>) -> ExampleDataSettings {
        ExampleDataSettings {
            enabled,
            seed_name: Some(seed_name.to_owned()),
            count,
            registry_path: Some(fixture_path()),
        }
    }

    #[fixture]
    fn store() -> InMemoryPoiStore {
        InMemoryPoiStore::new(Arc::new(DefaultClock))
    }

    #[rstest]
    #[tokio::test]
    async fn disabled_seeding_writes_nothing(store: InMemoryPoiStore) {
        let outcome = seed_example_data_on_startup(&settings(false, "mossy-owl", None), &store)
            .await
            .expect("skipped");

        assert!(outcome.is_none());
        assert!(store.is_empty().expect("empty"));
    }

    #[rstest]
    #[tokio::test]
    async fn enabled_seeding_creates_every_generated_poi(store: InMemoryPoiStore) {
        let outcome =
            seed_example_data_on_startup(&settings(true, "snowy-penguin", None), &store)
                .await
                .expect("seeded")
                .expect("enabled");

        assert_eq!(outcome.seed_name, "snowy-penguin");
        assert_eq!(outcome.created + outcome.skipped, 60);
        assert_eq!(store.live_count().expect("count"), outcome.created);
    }

    #[rstest]
    #[tokio::test]
    async fn count_override_limits_created_pois(store: InMemoryPoiStore) {
        let outcome = seed_example_data_on_startup(&settings(true, "rainbow-fox", Some(7)), &store)
            .await
            .expect("seeded")
            .expect("enabled");

        assert_eq!(outcome.created, 7);
        let mut cursor = store.open_cursor(CursorFilter::All).await.expect("cursor");
        assert_eq!(cursor.next_batch(100).await.expect("batch").len(), 7);
    }

    #[rstest]
    #[tokio::test]
    async fn blank_seed_name_is_rejected(store: InMemoryPoiStore) {
        let result = seed_example_data_on_startup(&settings(true, "   ", None), &store).await;

        assert!(matches!(result, Err(StartupSeedingError::EmptySeedName)));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_seed_is_a_registry_error(store: InMemoryPoiStore) {
        let result = seed_example_data_on_startup(&settings(true, "amber-lynx", None), &store).await;

        assert!(matches!(
            result,
            Err(StartupSeedingError::Registry(RegistryError::SeedNotFound { .. }))
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_registry_is_a_read_error(store: InMemoryPoiStore) {
        let mut settings = settings(true, "mossy-owl", None);
        settings.registry_path = Some(PathBuf::from("/nonexistent/seeds.json"));

        let result = seed_example_data_on_startup(&settings, &store).await;

        assert!(matches!(
            result,
            Err(StartupSeedingError::RegistryRead { .. })
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn commit_failure_leaves_the_store_empty(store: InMemoryPoiStore) {
        store.fail_next_commit().expect("arm failure");

        let result =
            seed_example_data_on_startup(&settings(true, "snowy-penguin", None), &store).await;

        assert!(matches!(result, Err(StartupSeedingError::Store(_))));
        assert!(store.is_empty().expect("empty"));
    }
}
