//! Typed response models for the two geocoding providers.
//!
//! The shapes are deliberately kept separate: Nominatim returns coordinates
//! as strings inside a flat record, Radar wraps floats in an envelope with a
//! textual confidence grade. The engine's scorers consume each shape
//! directly.

use serde::Deserialize;

/// One Nominatim record, shared by the `/reverse` and `/search` endpoints.
///
/// Nominatim serializes `lat`/`lon` as strings; [`NominatimPlace::coordinates`]
/// parses them, returning `None` on absent or malformed values so the caller
/// can fall back to the input coordinate.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lon: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    /// OSM feature type, e.g. `attraction` or `castle`.
    #[serde(default, rename = "type")]
    pub place_type: Option<String>,
    /// OSM feature class, e.g. `tourism` or `amenity`.
    #[serde(default)]
    pub class: Option<String>,
    /// Search-result relevance in `[0, 1]`; only present on `/search` hits.
    #[serde(default)]
    pub importance: Option<f64>,
}

impl NominatimPlace {
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.lat.as_deref()?.parse::<f64>().ok()?;
        let lon = self.lon.as_deref()?.parse::<f64>().ok()?;
        Some((lat, lon))
    }

    /// The most specific classification available: `type`, else `class`.
    #[must_use]
    pub fn place_kind(&self) -> Option<&str> {
        self.place_type.as_deref().or(self.class.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RadarReverseResponse {
    #[serde(default)]
    pub addresses: Vec<RadarAddress>,
}

/// One reverse-geocoded address from Radar.
#[derive(Debug, Clone, Deserialize)]
pub struct RadarAddress {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, rename = "formattedAddress")]
    pub formatted_address: Option<String>,
    /// Radar's own match grade: `exact`, `interpolated`, or `fallback`.
    #[serde(default)]
    pub confidence: Option<String>,
}

impl RadarAddress {
    /// Maps the textual confidence grade onto `[0, 1]`.
    ///
    /// Unknown grades map to `None` so the scorer applies its provider
    /// baseline instead of guessing.
    #[must_use]
    pub fn confidence_score(&self) -> Option<f64> {
        match self.confidence.as_deref() {
            Some("exact") => Some(0.9),
            Some("interpolated") => Some(0.7),
            Some("fallback") => Some(0.5),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RadarSearchResponse {
    #[serde(default)]
    pub places: Vec<RadarPlace>,
}

/// One place hit from Radar's text search.
#[derive(Debug, Clone, Deserialize)]
pub struct RadarPlace {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}
