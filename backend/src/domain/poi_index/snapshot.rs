//! Immutable, fully built index state.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::domain::{AreaAndCategory, Poi, PoiCategory, PoiId};

/// Read-only view of the catalogue published to searches.
///
/// Entries are partitioned by category and each partition is sorted by
/// latitude, so a search resolves the category by lookup, binary searches
/// the latitude band, and filters longitude linearly within it.
#[derive(Debug, Clone)]
pub struct PoiIndexSnapshot {
    partitions: BTreeMap<PoiCategory, Vec<Poi>>,
    len: usize,
    watermark: Option<DateTime<Utc>>,
    built_at: DateTime<Utc>,
    generation: u64,
}

impl PoiIndexSnapshot {
    /// Build a snapshot from the writer's working set.
    pub(super) fn from_records(
        records: &HashMap<PoiId, Poi>,
        watermark: Option<DateTime<Utc>>,
        built_at: DateTime<Utc>,
        generation: u64,
    ) -> Self {
        let mut partitions: BTreeMap<PoiCategory, Vec<Poi>> = BTreeMap::new();
        for poi in records.values() {
            partitions.entry(poi.category()).or_default().push(poi.clone());
        }
        for entries in partitions.values_mut() {
            entries.sort_by(|a, b| a.latitude().total_cmp(&b.latitude()));
        }
        Self {
            partitions,
            len: records.len(),
            watermark,
            built_at,
            generation,
        }
    }

    /// Return up to `limit` POIs matching every predicate of `query`.
    ///
    /// Result order is unspecified.
    #[must_use]
    pub fn search(&self, query: &AreaAndCategory, limit: usize) -> Vec<Poi> {
        let category = query.category();
        let Some(entries) = self.partitions.get(&category.low()) else {
            return Vec::new();
        };
        let latitude = query.latitude();
        let longitude = query.longitude();
        let start = entries.partition_point(|poi| poi.latitude() < latitude.low());
        entries[start..]
            .iter()
            .take_while(|poi| poi.latitude() <= latitude.high())
            .filter(|poi| longitude.contains(&poi.longitude()))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Number of indexed POIs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the snapshot indexes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of indexed POIs in one category.
    #[must_use]
    pub fn category_len(&self, category: PoiCategory) -> usize {
        self.partitions.get(&category).map_or(0, Vec::len)
    }

    /// Latest `last_saved_at` observed when the snapshot was built.
    #[must_use]
    pub const fn watermark(&self) -> Option<DateTime<Utc>> {
        self.watermark
    }

    /// When the snapshot was published.
    #[must_use]
    pub const fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Publication counter; the first build is generation 1.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Iterate over every indexed POI.
    pub fn iter(&self) -> impl Iterator<Item = &Poi> {
        self.partitions.values().flatten()
    }
}
