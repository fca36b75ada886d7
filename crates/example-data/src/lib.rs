//! Deterministic example point-of-interest generation for demonstration purposes.
//!
//! This crate generates believable, reproducible POI records from a JSON seed
//! registry. It is independent of backend domain types to avoid circular
//! dependencies; the backend converts each [`ExamplePoiSeed`] into its own
//! draft type at the point of use.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Loading seed registries from JSON files
//! - Deterministic POI generation using named seeds
//! - Name validation matching backend constraints
//! - Per-seed geographic bounds
//!
//! # Example
//!
//! ```
//! use example_data::{SeedRegistry, generate_example_pois};
//!
//! let json = r#"{
//!     "version": 1,
//!     "seeds": [{
//!         "name": "test-seed",
//!         "seed": 42,
//!         "poiCount": 3,
//!         "bounds": {
//!             "latitudeMin": 51.4,
//!             "latitudeMax": 51.6,
//!             "longitudeMin": -0.3,
//!             "longitudeMax": 0.1
//!         }
//!     }]
//! }"#;
//!
//! let registry = SeedRegistry::from_json(json).expect("valid registry");
//! let seed_def = registry.find_seed("test-seed").expect("seed exists");
//! let pois = generate_example_pois(seed_def).expect("generation succeeds");
//!
//! assert_eq!(pois.len(), 3);
//! ```

mod error;
mod generator;
mod registry;
mod seed;
mod validation;

pub use error::{GenerationError, RegistryError};
pub use generator::generate_example_pois;
pub use registry::{SeedBounds, SeedDefinition, SeedRegistry};
pub use seed::{CATEGORY_CODES, ExamplePoiSeed};
pub use validation::{POI_NAME_MAX, is_valid_poi_name};
