//! Data model for coordinate verification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One coordinate to verify, as handed over by the surrounding application.
///
/// `context` is a short free-text label for the place itself (a landmark or
/// chapter name); `location_name` is the broader place name (city, region,
/// country). Both feed the scoring heuristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinateInput {
    pub lat: f64,
    pub lng: f64,
    pub context: String,
    #[serde(rename = "locationName")]
    pub location_name: String,
}

impl CoordinateInput {
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// Where a verified coordinate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
    /// The free community provider (Nominatim).
    #[serde(rename = "free-provider")]
    Nominatim,
    /// The paid provider (Radar).
    #[serde(rename = "paid-provider")]
    Radar,
    /// The unmodified input coordinate.
    #[serde(rename = "original")]
    Original,
    /// Replayed from the verification cache.
    #[serde(rename = "cache")]
    Cache,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Source::Nominatim => "free-provider",
            Source::Radar => "paid-provider",
            Source::Original => "original",
            Source::Cache => "cache",
        };
        write!(f, "{name}")
    }
}

/// Diagnostic metadata attached to every [`VerificationResult`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_type: Option<String>,
    /// Distance in meters between the chosen coordinate and the input, when
    /// a provider supplied the coordinate. Zero by definition for
    /// [`Source::Original`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_from_original: Option<f64>,
    pub verified_at: DateTime<Utc>,
    pub response_time_ms: u64,
}

impl ResultMetadata {
    /// Metadata for a result that never touched a provider.
    #[must_use]
    pub fn bare(response_time_ms: u64) -> Self {
        Self {
            address: None,
            place_type: None,
            distance_from_original: Some(0.0),
            verified_at: Utc::now(),
            response_time_ms,
        }
    }
}

/// The outcome of verifying one [`CoordinateInput`].
///
/// Constructed once per resolution (or replayed from cache with `source`
/// rewritten to [`Source::Cache`]) and never mutated afterwards. Provider
/// failures never surface as errors here; `error` is diagnostics only, and
/// `is_valid`/`confidence` always carry the authoritative decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub is_valid: bool,
    /// Clamped to `[0, 1]`. Ordinal trust signal, not a calibrated
    /// probability.
    pub confidence: f64,
    pub source: Source,
    pub coordinates: Coordinates,
    pub metadata: ResultMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Confidence assigned to the unverified input coordinate when it is used
/// as the result.
pub const ORIGINAL_FALLBACK_CONFIDENCE: f64 = 0.3;

impl VerificationResult {
    /// The original-coordinate fallback: no external signal was trustworthy
    /// (or none was available), so the input is returned at low confidence.
    #[must_use]
    pub fn original_fallback(
        input: &CoordinateInput,
        is_valid: bool,
        response_time_ms: u64,
    ) -> Self {
        Self {
            is_valid,
            confidence: ORIGINAL_FALLBACK_CONFIDENCE,
            source: Source::Original,
            coordinates: input.coordinates(),
            metadata: ResultMetadata::bare(response_time_ms),
            error: None,
        }
    }

    /// Attaches a diagnostic note without touching the decision fields.
    #[must_use]
    pub fn with_error(mut self, message: String) -> Self {
        self.error = Some(message);
        self
    }
}

/// Process-lifetime verification counters.
///
/// Monotonic until [`reset`](crate::types::PerformanceStats) is requested
/// through the engine. `efficiency_rate` and `savings_rate` are percentages
/// derived at snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub total_requests: u64,
    /// Resolutions completed on the free provider alone (fast accepts).
    pub nominatim_only: u64,
    /// Resolutions that escalated to the paid provider.
    pub escalations: u64,
    /// Paid-provider calls avoided by fast accepts.
    pub radar_calls_saved: u64,
    pub average_response_time_ms: f64,
    pub cache_hits: u64,
    /// fast accepts / total requests, percent.
    pub efficiency_rate: f64,
    /// avoided paid calls / total requests, percent.
    pub savings_rate: f64,
}
