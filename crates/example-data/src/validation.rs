//! POI name validation mirroring backend constraints.
//!
//! These rules match the backend's `PoiName` type in
//! `backend/src/domain/poi.rs`. Keeping them in sync ensures generated names
//! are always accepted when the backend converts a seed into a draft.
//!
//! # Validation Rules
//!
//! - Must not be empty once trimmed
//! - At most [`POI_NAME_MAX`] characters once trimmed
//! - Must not contain control characters

/// Maximum allowed length for a POI name.
pub const POI_NAME_MAX: usize = 128;

/// Validates a POI name against backend constraints.
///
/// # Examples
///
/// ```
/// use example_data::is_valid_poi_name;
///
/// assert!(is_valid_poi_name("Natural History Museum"));
/// assert!(is_valid_poi_name("O'Brien's Diner"));
/// assert!(!is_valid_poi_name("   "));
/// assert!(!is_valid_poi_name("Bad\nName"));
/// ```
#[must_use]
pub fn is_valid_poi_name(name: &str) -> bool {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return false;
    }
    if trimmed.chars().count() > POI_NAME_MAX {
        return false;
    }
    !trimmed.chars().any(char::is_control)
}

/// Drops control characters and collapses runs of whitespace.
///
/// Does not enforce length constraints.
#[must_use]
pub(crate) fn sanitize_poi_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| word.chars().filter(|c| !c.is_control()).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
