//! Coarse settlement-tier estimation for threshold scaling.
//!
//! Dense urban geocoding data is noisier in absolute terms but redundant,
//! so major cities get relaxed thresholds; sparse-data areas get stricter
//! ones. The lists are heuristic allow-lists, not authoritative: an
//! unlisted large city falls to tier 3 and is simply verified slightly
//! more strictly.

/// Settlement tier with the threshold multiplier it implies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityTier {
    pub tier: u8,
    pub multiplier: f64,
}

/// Major global cities: thresholds relaxed by 30%.
const TIER1_CITIES: &[&str] = &[
    // Asia
    "seoul", "tokyo", "beijing", "shanghai", "singapore", "hong kong", "mumbai", "delhi",
    "서울", "도쿄", "베이징", "상하이", "싱가포르", "홍콩",
    // Europe
    "london", "paris", "berlin", "rome", "roma", "madrid", "amsterdam", "zurich",
    // North America
    "new york", "los angeles", "chicago", "toronto", "vancouver",
    // Elsewhere
    "sydney", "melbourne", "dubai", "cairo",
];

/// Notable regional cities: thresholds relaxed by 10%.
const TIER2_CITIES: &[&str] = &[
    // Korea
    "부산", "대구", "인천", "광주", "대전", "울산", "busan",
    // Elsewhere
    "osaka", "kyoto", "barcelona", "milan", "munich", "vienna",
];

/// Estimates the settlement tier of a free-text location name.
///
/// Case-insensitive substring match against the static city lists; no
/// match means tier 3 (multiplier 0.9, stricter).
#[must_use]
pub fn estimate_tier(location_name: &str) -> CityTier {
    let location = location_name.to_lowercase();

    if TIER1_CITIES.iter().any(|city| location.contains(city)) {
        CityTier {
            tier: 1,
            multiplier: 1.3,
        }
    } else if TIER2_CITIES.iter().any(|city| location.contains(city)) {
        CityTier {
            tier: 2,
            multiplier: 1.1,
        }
    } else {
        CityTier {
            tier: 3,
            multiplier: 0.9,
        }
    }
}
