//! Coordinate verification and consensus engine.
//!
//! Resolves a candidate coordinate from an unreliable upstream generator
//! into a verified one by cross-checking it against independent geocoding
//! providers under a cheap-first, escalate-on-disagreement discipline:
//!
//! 1. Cache lookup (TTL-based).
//! 2. Free provider (Nominatim) reverse geocode + place search; fast-accept
//!    when it agrees within a dynamically computed threshold at high
//!    response quality.
//! 3. Otherwise escalate to the paid provider (Radar) and run a 3-way
//!    comparison between the original, free, and paid candidates.
//! 4. When every external signal disagrees by more than the comparison
//!    bound, trust the original coordinate at low confidence.
//!
//! [`Verifier`] owns the provider clients, the cache, and the stats tracker;
//! construct one and share it. [`Verifier::verify`] never returns an error:
//! every failure mode degrades to a valid [`VerificationResult`].
//!
//! [`VerificationResult`]: geoverify_core::VerificationResult

pub mod batch;
pub mod cache;
pub mod city_tier;
pub mod confidence;
pub mod distance;
pub mod place_type;
pub mod resolver;
pub mod stats;
pub mod threshold;

pub use cache::VerificationCache;
pub use city_tier::{estimate_tier, CityTier};
pub use distance::distance_meters;
pub use place_type::{classify, PlaceTypeScores};
pub use resolver::Verifier;
pub use stats::StatsTracker;
pub use threshold::{dynamic_threshold, MAX_COMPARISON_DISTANCE_M};
