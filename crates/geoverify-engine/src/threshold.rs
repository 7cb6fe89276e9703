//! Dynamic distance-agreement thresholds.

use geoverify_core::CoordinateInput;

use crate::city_tier::estimate_tier;
use crate::place_type::classify;

/// Base agreement threshold in meters before any adjustment.
const BASE_THRESHOLD_M: f64 = 5.0;

/// Absolute floor on the computed threshold.
const MIN_THRESHOLD_M: f64 = 2.0;

/// Category score above which a place type dominates the adjustment.
const DOMINANT_CATEGORY_SCORE: f64 = 0.7;

/// Fixed distance bound for the 3-way candidate comparison, in meters.
///
/// Deliberately independent of [`dynamic_threshold`]: the dynamic value
/// gates the cheap fast-accept path, while this looser fixed bound decides
/// which candidates are close enough to the original to be worth ranking
/// at all. Whether the source system meant these to stay separate is an
/// open product question; until that is settled they are kept as two
/// distinct, named values.
pub const MAX_COMPARISON_DISTANCE_M: f64 = 50.0;

/// Computes the distance threshold (meters) within which a free-provider
/// result is accepted without escalation.
///
/// Base 5 m, adjusted by the dominant place-type category (tourist
/// landmarks are points, so stricter; transport hubs are large polygons,
/// so looser), scaled by the provider response quality (trust a
/// high-quality hit with more slack, demand tighter agreement from a weak
/// one), then by the city-tier multiplier. Floored at 2 m.
#[must_use]
pub fn dynamic_threshold(input: &CoordinateInput, quality: f64) -> f64 {
    let scores = classify(&input.context);

    let mut threshold = BASE_THRESHOLD_M;
    if scores.tourism >= DOMINANT_CATEGORY_SCORE {
        threshold = 3.0;
    } else if scores.commercial >= DOMINANT_CATEGORY_SCORE {
        threshold = 8.0;
    } else if scores.transport >= DOMINANT_CATEGORY_SCORE {
        threshold = 10.0;
    }

    if quality >= 0.9 {
        threshold *= 1.5;
    } else if quality <= 0.6 {
        threshold *= 0.7;
    }

    threshold *= estimate_tier(&input.location_name).multiplier;

    threshold.max(MIN_THRESHOLD_M)
}
