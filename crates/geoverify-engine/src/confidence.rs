//! Per-provider confidence and response-quality scoring.
//!
//! Each provider gets its own scorer because the response shapes differ;
//! both follow the same reasoning: start from a provider baseline, add
//! textual-agreement and category bonuses, adjust by how far the provider's
//! own coordinate sits from the input, clamp to `[0, 1]`.
//!
//! The resulting confidence is an ordinal trust signal for ranking
//! candidates, not a calibrated probability.

use geoverify_core::CoordinateInput;
use geoverify_providers::{NominatimPlace, RadarAddress, RadarPlace};

use crate::distance::distance_meters;

/// Baseline for the free provider: community data is curated but uneven.
const NOMINATIM_BASE_CONFIDENCE: f64 = 0.6;

/// Floor applied to the paid provider's self-reported confidence.
const RADAR_CONFIDENCE_FLOOR: f64 = 0.6;

/// Nominatim kinds that mark a place as a landmark-ish feature.
const NOMINATIM_LANDMARK_KINDS: &[&str] = &["tourism", "historic", "amenity", "leisure"];

/// Scores a Nominatim reverse + search response pair against the input.
#[must_use]
pub fn nominatim_confidence(
    reverse: &NominatimPlace,
    search: &[NominatimPlace],
    input: &CoordinateInput,
    max_distance_m: f64,
) -> f64 {
    let mut confidence = NOMINATIM_BASE_CONFIDENCE;

    let display_name = reverse
        .display_name
        .as_deref()
        .unwrap_or("")
        .to_lowercase();
    if contains_ci(&display_name, &input.location_name) {
        confidence += 0.2;
    }
    if contains_ci(&display_name, &input.context) {
        confidence += 0.15;
    }

    if let Some(best) = search.first() {
        let best_name = best.display_name.as_deref().unwrap_or("");
        if contains_ci(best_name, &input.context) {
            confidence += 0.1;
        }
        if best.importance.is_some_and(|importance| importance > 0.5) {
            confidence += 0.05;
        }
    }

    if reverse
        .place_kind()
        .is_some_and(|kind| NOMINATIM_LANDMARK_KINDS.contains(&kind))
    {
        confidence += 0.1;
    }

    if let Some((lat, lon)) = reverse.coordinates() {
        confidence += distance_adjustment(
            distance_meters(input.lat, input.lng, lat, lon),
            max_distance_m,
            -0.2,
        );
    }

    confidence.clamp(0.0, 1.0)
}

/// Scores a Radar reverse + search response pair against the input.
///
/// Base is Radar's own reported confidence grade floored at 0.6 when
/// present, else the floor itself.
#[must_use]
pub fn radar_confidence(
    address: &RadarAddress,
    places: &[RadarPlace],
    input: &CoordinateInput,
    max_distance_m: f64,
) -> f64 {
    let mut confidence = address
        .confidence_score()
        .map_or(RADAR_CONFIDENCE_FLOOR, |score| {
            score.max(RADAR_CONFIDENCE_FLOOR)
        });

    let formatted = address.formatted_address.as_deref().unwrap_or("");
    if contains_ci(formatted, &input.location_name) {
        confidence += 0.2;
    }

    if let Some(place) = places.first() {
        if contains_ci(place.name.as_deref().unwrap_or(""), &input.context) {
            confidence += 0.1;
        }
        if place.categories.iter().any(|c| is_landmark_category(c)) {
            confidence += 0.05;
        }
    }

    confidence += distance_adjustment(
        distance_meters(input.lat, input.lng, address.latitude, address.longitude),
        max_distance_m,
        -0.25,
    );

    confidence.clamp(0.0, 1.0)
}

/// Analyzes how complete a Nominatim response is, independent of the
/// confidence score. Drives the fast-accept gate and threshold scaling.
#[must_use]
pub fn nominatim_response_quality(reverse: &NominatimPlace, input: &CoordinateInput) -> f64 {
    let mut quality: f64 = 0.5;

    let address = reverse.display_name.as_deref().unwrap_or("");
    if contains_ci(address, &input.location_name) {
        quality += 0.2;
    }
    if contains_ci(address, &input.context) {
        quality += 0.1;
    }
    // A detailed address has at least house/street, district, city, country.
    if address.split(',').count() >= 4 {
        quality += 0.1;
    }

    if reverse
        .place_kind()
        .is_some_and(|kind| matches!(kind, "tourism" | "historic" | "amenity"))
    {
        quality += 0.1;
    }

    quality.min(1.0)
}

/// Bonus (or penalty) for how close the provider's own coordinate is to
/// the input.
fn distance_adjustment(distance_m: f64, max_distance_m: f64, over_max_penalty: f64) -> f64 {
    if distance_m < 10.0 {
        0.15
    } else if distance_m < 50.0 {
        0.10
    } else if distance_m < 200.0 {
        0.05
    } else if distance_m > max_distance_m {
        over_max_penalty
    } else {
        0.0
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn is_landmark_category(category: &str) -> bool {
    let category = category.to_lowercase();
    category.contains("tourism")
        || category.contains("landmark")
        || category.contains("historic")
        || category.contains("museum")
}
