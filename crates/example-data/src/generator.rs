//! Deterministic POI generation from seed definitions.
//!
//! The same seed definition always produces identical output.

use fake::Fake;
use fake::faker::name::raw::LastName;
use fake::locales::EN;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::GenerationError;
use crate::registry::{SeedBounds, SeedDefinition};
use crate::seed::{CATEGORY_CODES, ExamplePoiSeed};
use crate::validation::{POI_NAME_MAX, is_valid_poi_name, sanitize_poi_name};

/// Maximum number of attempts to generate a valid POI name.
const MAX_NAME_ATTEMPTS: usize = 100;

/// Name suffixes for a category code.
const fn suffixes_for(category_code: u8) -> &'static [&'static str] {
    match category_code {
        0 => &["Charging Hub", "EV Point", "Supercharger"],
        1 => &["Monument", "Tower", "Memorial", "Gate"],
        2 => &["Museum", "Gallery", "Collection"],
        3 => &["Bistro", "Kitchen", "Diner", "Trattoria"],
        _ => &["Market", "Arcade", "Emporium"],
    }
}

/// Generates example POIs from a seed definition.
///
/// Uses the seed's `seed` value to initialise a deterministic RNG. Every
/// generated POI:
///
/// - Lies inside the seed's bounds
/// - Has a name the backend accepts
/// - Carries one of [`CATEGORY_CODES`]
///
/// # Errors
///
/// Returns [`GenerationError::NameGenerationFailed`] if no valid name could
/// be produced within the retry budget.
///
/// # Example
///
/// ```
/// use example_data::{SeedRegistry, generate_example_pois};
///
/// let json = r#"{
///     "version": 1,
///     "seeds": [{
///         "name": "test",
///         "seed": 42,
///         "poiCount": 3,
///         "bounds": {"latitudeMin": 48.8, "latitudeMax": 48.9, "longitudeMin": 2.2, "longitudeMax": 2.4}
///     }]
/// }"#;
///
/// let registry = SeedRegistry::from_json(json).expect("valid");
/// let seed_def = registry.find_seed("test").expect("found");
/// let pois = generate_example_pois(seed_def).expect("generated");
///
/// assert_eq!(pois.len(), 3);
/// // Same seed produces identical POIs
/// assert_eq!(pois, generate_example_pois(seed_def).expect("generated"));
/// ```
pub fn generate_example_pois(
    seed_def: &SeedDefinition,
) -> Result<Vec<ExamplePoiSeed>, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed_def.seed());
    (0..seed_def.poi_count())
        .map(|_| generate_single_poi(&mut rng, seed_def.bounds()))
        .collect()
}

fn generate_single_poi(
    rng: &mut ChaCha8Rng,
    bounds: &SeedBounds,
) -> Result<ExamplePoiSeed, GenerationError> {
    let category_code = CATEGORY_CODES.choose(rng).copied().unwrap_or_default();
    let name = generate_name(rng, category_code)?;
    let latitude = sample(rng, bounds.latitude_min(), bounds.latitude_max());
    let longitude = sample(rng, bounds.longitude_min(), bounds.longitude_max());

    Ok(ExamplePoiSeed {
        name,
        latitude,
        longitude,
        category_code,
    })
}

fn sample(rng: &mut ChaCha8Rng, low: f64, high: f64) -> f64 {
    if low >= high {
        return low;
    }
    rng.random_range(low..=high)
}

/// Builds a name as a surname followed by a category suffix.
///
/// Retries up to `MAX_NAME_ATTEMPTS` times if the sanitised candidate fails
/// validation.
fn generate_name(rng: &mut ChaCha8Rng, category_code: u8) -> Result<String, GenerationError> {
    let suffixes = suffixes_for(category_code);
    for _ in 0..MAX_NAME_ATTEMPTS {
        let surname: String = LastName(EN).fake_with_rng(rng);
        let suffix = suffixes.choose(rng).copied().unwrap_or_default();

        let candidate = sanitize_poi_name(&format!("{surname} {suffix}"));
        let truncated: String = candidate.chars().take(POI_NAME_MAX).collect();

        if is_valid_poi_name(&truncated) {
            return Ok(truncated);
        }
    }

    Err(GenerationError::NameGenerationFailed {
        max_attempts: MAX_NAME_ATTEMPTS,
    })
}
