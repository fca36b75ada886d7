//! Seed registry types and JSON parsing.
//!
//! The registry holds named seed definitions, each pairing an RNG seed with
//! a POI count and the bounding box the generated POIs fall inside.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::RegistryError;

/// Current supported registry version.
const SUPPORTED_VERSION: u32 = 1;

/// A seed registry containing named seeds.
///
/// # Example
///
/// ```
/// use example_data::SeedRegistry;
///
/// let json = r#"{
///     "version": 1,
///     "seeds": [{
///         "name": "test",
///         "seed": 42,
///         "poiCount": 5,
///         "bounds": {"latitudeMin": 0.0, "latitudeMax": 1.0, "longitudeMin": 0.0, "longitudeMax": 1.0}
///     }]
/// }"#;
///
/// let registry = SeedRegistry::from_json(json).expect("valid registry");
/// assert_eq!(registry.seeds().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SeedRegistry {
    version: u32,
    seeds: Vec<SeedDefinition>,
}

impl SeedRegistry {
    /// Parses a seed registry from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if:
    /// - The JSON is malformed
    /// - Required fields are missing
    /// - The version is unsupported
    /// - Any seed has invalid bounds
    /// - The seeds array is empty
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: RawSeedRegistry =
            serde_json::from_str(json).map_err(|e| RegistryError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Loads a seed registry from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let contents = fs::read_to_string(path).map_err(|e| RegistryError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents)
    }

    fn from_raw(raw: RawSeedRegistry) -> Result<Self, RegistryError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        if raw.seeds.is_empty() {
            return Err(RegistryError::EmptySeeds);
        }

        let seeds = raw
            .seeds
            .into_iter()
            .map(|s| {
                let bounds = SeedBounds::from_raw(&s.name, &s.bounds)?;
                Ok(SeedDefinition {
                    name: s.name,
                    seed: s.seed,
                    poi_count: s.poi_count,
                    bounds,
                })
            })
            .collect::<Result<Vec<_>, RegistryError>>()?;

        Ok(Self {
            version: raw.version,
            seeds,
        })
    }

    /// Returns the registry version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns all seed definitions.
    #[must_use]
    pub fn seeds(&self) -> &[SeedDefinition] {
        &self.seeds
    }

    /// Finds a seed definition by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SeedNotFound`] if no seed with the given name
    /// exists.
    pub fn find_seed(&self, name: &str) -> Result<&SeedDefinition, RegistryError> {
        self.seeds
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| RegistryError::SeedNotFound {
                name: name.to_owned(),
            })
    }
}

/// Geographic box generated POIs are placed in.
///
/// Both intervals are closed and ordered; latitudes lie in `[-90, 90]` and
/// longitudes in `[-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedBounds {
    latitude_min: f64,
    latitude_max: f64,
    longitude_min: f64,
    longitude_max: f64,
}

impl SeedBounds {
    fn from_raw(name: &str, raw: &RawSeedBounds) -> Result<Self, RegistryError> {
        let invalid = |reason: &str| RegistryError::InvalidBounds {
            name: name.to_owned(),
            reason: reason.to_owned(),
        };
        let all = [
            raw.latitude_min,
            raw.latitude_max,
            raw.longitude_min,
            raw.longitude_max,
        ];
        if !all.iter().all(|value| value.is_finite()) {
            return Err(invalid("bounds must be finite"));
        }
        if raw.latitude_min > raw.latitude_max {
            return Err(invalid("latitudeMin exceeds latitudeMax"));
        }
        if raw.longitude_min > raw.longitude_max {
            return Err(invalid("longitudeMin exceeds longitudeMax"));
        }
        if raw.latitude_min < -90.0 || raw.latitude_max > 90.0 {
            return Err(invalid("latitude outside [-90, 90]"));
        }
        if raw.longitude_min < -180.0 || raw.longitude_max > 180.0 {
            return Err(invalid("longitude outside [-180, 180]"));
        }
        Ok(Self {
            latitude_min: raw.latitude_min,
            latitude_max: raw.latitude_max,
            longitude_min: raw.longitude_min,
            longitude_max: raw.longitude_max,
        })
    }

    /// Southern edge.
    #[must_use]
    pub const fn latitude_min(&self) -> f64 {
        self.latitude_min
    }

    /// Northern edge.
    #[must_use]
    pub const fn latitude_max(&self) -> f64 {
        self.latitude_max
    }

    /// Western edge.
    #[must_use]
    pub const fn longitude_min(&self) -> f64 {
        self.longitude_min
    }

    /// Eastern edge.
    #[must_use]
    pub const fn longitude_max(&self) -> f64 {
        self.longitude_max
    }

    /// Whether the point lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.latitude_min..=self.latitude_max).contains(&latitude)
            && (self.longitude_min..=self.longitude_max).contains(&longitude)
    }
}

/// A named seed definition for deterministic POI generation.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedDefinition {
    name: String,
    seed: u64,
    poi_count: usize,
    bounds: SeedBounds,
}

impl SeedDefinition {
    /// Returns the seed name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the RNG seed value.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of POIs to generate.
    #[must_use]
    pub const fn poi_count(&self) -> usize {
        self.poi_count
    }

    /// Returns the box generated POIs fall inside.
    #[must_use]
    pub const fn bounds(&self) -> &SeedBounds {
        &self.bounds
    }

    /// Returns a copy generating `poi_count` POIs instead.
    ///
    /// The RNG seed is unchanged, so a smaller count yields a prefix of the
    /// original output.
    #[must_use]
    pub fn with_poi_count(&self, poi_count: usize) -> Self {
        Self {
            poi_count,
            ..self.clone()
        }
    }
}

/// Raw JSON representation for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeedRegistry {
    version: u32,
    seeds: Vec<RawSeedDefinition>,
}

/// Raw JSON representation of a seed definition.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeedDefinition {
    name: String,
    seed: u64,
    poi_count: usize,
    bounds: RawSeedBounds,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeedBounds {
    latitude_min: f64,
    latitude_max: f64,
    longitude_min: f64,
    longitude_max: f64,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn registry_with_bounds(bounds: &str) -> String {
        format!(
            r#"{{"version": 1, "seeds": [{{"name": "a", "seed": 1, "poiCount": 1, "bounds": {bounds}}}]}}"#
        )
    }

    #[rstest]
    #[case::inverted_latitude(
        r#"{"latitudeMin": 2.0, "latitudeMax": 1.0, "longitudeMin": 0.0, "longitudeMax": 1.0}"#,
        "latitudeMin exceeds latitudeMax"
    )]
    #[case::inverted_longitude(
        r#"{"latitudeMin": 0.0, "latitudeMax": 1.0, "longitudeMin": 5.0, "longitudeMax": 1.0}"#,
        "longitudeMin exceeds longitudeMax"
    )]
    #[case::off_the_pole(
        r#"{"latitudeMin": 80.0, "latitudeMax": 91.0, "longitudeMin": 0.0, "longitudeMax": 1.0}"#,
        "latitude outside [-90, 90]"
    )]
    #[case::past_the_antimeridian(
        r#"{"latitudeMin": 0.0, "latitudeMax": 1.0, "longitudeMin": 179.0, "longitudeMax": 181.0}"#,
        "longitude outside [-180, 180]"
    )]
    fn rejects_invalid_bounds(#[case] bounds: &str, #[case] reason: &str) {
        let result = SeedRegistry::from_json(&registry_with_bounds(bounds));

        assert_eq!(
            result,
            Err(RegistryError::InvalidBounds {
                name: "a".to_owned(),
                reason: reason.to_owned(),
            })
        );
    }

    #[test]
    fn accepts_degenerate_box() {
        let registry = SeedRegistry::from_json(&registry_with_bounds(
            r#"{"latitudeMin": 1.0, "latitudeMax": 1.0, "longitudeMin": 2.0, "longitudeMax": 2.0}"#,
        ))
        .expect("point-sized box is valid");
        let bounds = registry.find_seed("a").expect("seed found").bounds();

        assert!(bounds.contains(1.0, 2.0));
        assert!(!bounds.contains(1.0, 2.5));
    }
}
