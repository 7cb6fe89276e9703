//! The consensus resolver: staged, cost-aware coordinate verification.

use std::time::Instant;

use geoverify_core::{
    AppConfig, CoordinateInput, Coordinates, ResultMetadata, Source, VerificationResult,
    ORIGINAL_FALLBACK_CONFIDENCE,
};
use geoverify_providers::{NominatimClient, ProviderError, RadarClient};

use crate::batch::run_chunked;
use crate::cache::VerificationCache;
use crate::confidence::{
    nominatim_confidence, nominatim_response_quality, radar_confidence,
};
use crate::distance::distance_meters;
use crate::stats::StatsTracker;
use crate::threshold::{dynamic_threshold, MAX_COMPARISON_DISTANCE_M};

/// Free-provider response quality required for a fast accept.
const FAST_ACCEPT_QUALITY: f64 = 0.8;

/// Weight on confidence vs closeness when ranking surviving candidates.
const CONFIDENCE_WEIGHT: f64 = 0.7;
const CLOSENESS_WEIGHT: f64 = 0.3;

/// A provider result together with the response quality that gates the
/// fast-accept path.
struct ProviderVerification {
    result: VerificationResult,
    quality: f64,
}

/// One coordinate under consideration during a single resolution.
struct Candidate {
    source: Source,
    confidence: f64,
    distance: f64,
}

/// The verification engine.
///
/// Owns the provider clients, the TTL cache, and the stats tracker; one
/// instance is meant to be shared by every caller in the process so the
/// free-provider rate gate and the cache actually span all traffic.
///
/// [`Verifier::verify`] and [`Verifier::batch_verify`] never fail: every
/// provider-level problem degrades to a valid, possibly low-confidence
/// [`VerificationResult`].
pub struct Verifier {
    config: AppConfig,
    nominatim: Option<NominatimClient>,
    radar: Option<RadarClient>,
    cache: VerificationCache,
    stats: StatsTracker,
}

impl Verifier {
    /// Builds a verifier from configuration, constructing clients for the
    /// enabled providers. The paid provider additionally requires an API
    /// key; without one it stays disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if an HTTP client cannot be constructed.
    pub fn new(config: AppConfig) -> Result<Self, ProviderError> {
        let nominatim = if config.enable_nominatim {
            Some(NominatimClient::new(
                &config.nominatim_user_agent,
                config.nominatim_interval(),
                config.timeout(),
            )?)
        } else {
            None
        };

        let radar = match (config.enable_radar, &config.radar_api_key) {
            (true, Some(key)) => Some(RadarClient::new(key, config.timeout())?),
            _ => None,
        };

        Ok(Self::with_clients(config, nominatim, radar))
    }

    /// Builds a verifier around pre-constructed clients. This is the test
    /// seam: point the clients at mock servers, or pass `None` to disable a
    /// provider outright.
    #[must_use]
    pub fn with_clients(
        config: AppConfig,
        nominatim: Option<NominatimClient>,
        radar: Option<RadarClient>,
    ) -> Self {
        let cache = VerificationCache::new(config.cache_ttl());
        Self {
            config,
            nominatim,
            radar,
            cache,
            stats: StatsTracker::new(),
        }
    }

    /// Verifies a single coordinate.
    ///
    /// Cache lookup first; on a miss, the staged resolution: free provider,
    /// fast-accept check, escalation to the paid provider, 3-way
    /// comparison, original-coordinate fallback. Never returns an error;
    /// the `error` field on the result is diagnostics only.
    pub async fn verify(&self, input: &CoordinateInput) -> VerificationResult {
        let start = Instant::now();
        self.stats.record_request();

        let key = VerificationCache::key(input);
        if self.config.cache_enabled {
            if let Some(hit) = self.cache.get(&key) {
                tracing::debug!(context = %input.context, "verification cache hit");
                self.stats.record_cache_hit();
                return hit;
            }
        }

        let result = self.resolve(input, start).await;

        self.stats.record_response_time(elapsed_ms(start));
        if self.config.cache_enabled {
            self.cache.set(key, result.clone());
        }
        result
    }

    /// Verifies many coordinates in sequential chunks of `batch_size`,
    /// bounding peak concurrent outbound calls. Results come back in input
    /// order.
    pub async fn batch_verify(&self, inputs: Vec<CoordinateInput>) -> Vec<VerificationResult> {
        run_chunked(inputs, self.config.batch_size, |input| async move {
            self.verify(&input).await
        })
        .await
    }

    #[must_use]
    pub fn performance_stats(&self) -> geoverify_core::PerformanceStats {
        self.stats.snapshot()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    #[must_use]
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    /// The staged resolution algorithm, invoked once per cache miss.
    async fn resolve(&self, input: &CoordinateInput, start: Instant) -> VerificationResult {
        let mut diagnostics: Vec<String> = Vec::new();

        if let Some(nominatim) = &self.nominatim {
            match self.verify_with_nominatim(nominatim, input, start).await {
                Ok(verification) => {
                    return self.settle(input, verification, start).await;
                }
                Err(e) => {
                    tracing::warn!(
                        context = %input.context,
                        error = %e,
                        "free provider failed, continuing without it"
                    );
                    diagnostics.push(format!("free provider: {e}"));
                }
            }
        }

        // The free provider is disabled or failed for this call. Try the
        // paid provider on its own; accept only a confident answer.
        if let Some(radar) = &self.radar {
            self.stats.record_escalation();
            match self.verify_with_radar(radar, input, start).await {
                Ok(result) if result.confidence >= self.config.min_confidence => {
                    return result;
                }
                Ok(result) => {
                    tracing::debug!(
                        context = %input.context,
                        confidence = result.confidence,
                        "paid provider below confidence threshold, falling back"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        context = %input.context,
                        error = %e,
                        "paid provider failed"
                    );
                    diagnostics.push(format!("paid provider: {e}"));
                }
            }
        }

        // No trustworthy external signal. Not an error: degrade to the
        // input coordinate at low confidence.
        tracing::info!(context = %input.context, "no provider signal, using original coordinate");
        let mut fallback = VerificationResult::original_fallback(
            input,
            self.config.fallback_to_original,
            elapsed_ms(start),
        );
        if !diagnostics.is_empty() {
            fallback = fallback.with_error(diagnostics.join("; "));
        }
        fallback
    }

    /// Decides what to do with a successful free-provider verification:
    /// fast-accept it, or escalate and run the 3-way comparison.
    async fn settle(
        &self,
        input: &CoordinateInput,
        nominatim: ProviderVerification,
        start: Instant,
    ) -> VerificationResult {
        let distance = nominatim
            .result
            .metadata
            .distance_from_original
            .unwrap_or(0.0);
        let threshold = dynamic_threshold(input, nominatim.quality);

        if distance <= threshold && nominatim.quality >= FAST_ACCEPT_QUALITY {
            tracing::debug!(
                context = %input.context,
                distance_m = distance,
                threshold_m = threshold,
                quality = nominatim.quality,
                "fast accept on free provider"
            );
            self.stats.record_fast_accept();
            return nominatim.result;
        }

        tracing::debug!(
            context = %input.context,
            distance_m = distance,
            threshold_m = threshold,
            quality = nominatim.quality,
            "free provider insufficient, escalating"
        );

        let radar_result = if let Some(radar) = &self.radar {
            self.stats.record_escalation();
            match self.verify_with_radar(radar, input, start).await {
                Ok(result) => Some(result),
                Err(e) => {
                    tracing::warn!(
                        context = %input.context,
                        error = %e,
                        "paid provider failed during escalation"
                    );
                    None
                }
            }
        } else {
            None
        };

        self.pick_best(input, nominatim.result, radar_result, start)
    }

    /// The 3-way comparison between the original, free, and paid
    /// candidates.
    ///
    /// Provider candidates beyond [`MAX_COMPARISON_DISTANCE_M`] are
    /// dropped; the original always survives as the reference point. If
    /// nothing else survives, the original wins outright: when every
    /// external signal disagrees that far, the input likely encodes
    /// information the geocoders lack (an interior point, say).
    fn pick_best(
        &self,
        input: &CoordinateInput,
        nominatim: VerificationResult,
        radar: Option<VerificationResult>,
        start: Instant,
    ) -> VerificationResult {
        let mut candidates = vec![
            Candidate {
                source: Source::Original,
                confidence: ORIGINAL_FALLBACK_CONFIDENCE,
                // The original is the reference point, not measured
                // against itself.
                distance: 0.0,
            },
            Candidate {
                source: Source::Nominatim,
                confidence: nominatim.confidence,
                distance: nominatim.metadata.distance_from_original.unwrap_or(0.0),
            },
        ];
        if let Some(radar) = &radar {
            candidates.push(Candidate {
                source: Source::Radar,
                confidence: radar.confidence,
                distance: radar.metadata.distance_from_original.unwrap_or(0.0),
            });
        }

        let best = candidates
            .iter()
            .filter(|c| c.source != Source::Original && c.distance <= MAX_COMPARISON_DISTANCE_M)
            .max_by(|a, b| {
                score(a)
                    .partial_cmp(&score(b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        match best {
            Some(candidate) if candidate.source == Source::Radar => {
                tracing::debug!(context = %input.context, "consensus picked the paid provider");
                radar.unwrap_or(nominatim)
            }
            Some(_) => {
                tracing::debug!(context = %input.context, "consensus picked the free provider");
                nominatim
            }
            None => {
                tracing::info!(
                    context = %input.context,
                    bound_m = MAX_COMPARISON_DISTANCE_M,
                    "all provider candidates beyond the comparison bound, trusting the original"
                );
                VerificationResult::original_fallback(
                    input,
                    self.config.fallback_to_original,
                    elapsed_ms(start),
                )
            }
        }
    }

    async fn verify_with_nominatim(
        &self,
        client: &NominatimClient,
        input: &CoordinateInput,
        start: Instant,
    ) -> Result<ProviderVerification, ProviderError> {
        let reverse = client.reverse_geocode(input.lat, input.lng).await?;
        let search = client
            .search_place(
                &format!("{} {}", input.context, input.location_name),
                Some((input.lat, input.lng)),
            )
            .await?;

        let confidence =
            nominatim_confidence(&reverse, &search, input, self.config.max_distance_m);
        let quality = nominatim_response_quality(&reverse, input);

        // Nominatim serializes coordinates as strings; fall back to the
        // input on absent or malformed values.
        let (lat, lng) = reverse.coordinates().unwrap_or((input.lat, input.lng));
        let distance = distance_meters(input.lat, input.lng, lat, lng);

        let result = VerificationResult {
            is_valid: confidence >= self.config.min_confidence,
            confidence,
            source: Source::Nominatim,
            coordinates: Coordinates { lat, lng },
            metadata: ResultMetadata {
                address: reverse.display_name.clone(),
                place_type: reverse.place_kind().map(ToOwned::to_owned),
                distance_from_original: Some(distance),
                verified_at: chrono::Utc::now(),
                response_time_ms: elapsed_ms(start),
            },
            error: None,
        };

        Ok(ProviderVerification { result, quality })
    }

    async fn verify_with_radar(
        &self,
        client: &RadarClient,
        input: &CoordinateInput,
        start: Instant,
    ) -> Result<VerificationResult, ProviderError> {
        let address = client.reverse_geocode(input.lat, input.lng).await?;
        let places = client
            .search_places(
                &format!("{} {}", input.context, input.location_name),
                Some((input.lat, input.lng)),
            )
            .await?;

        let confidence = radar_confidence(&address, &places, input, self.config.max_distance_m);
        let distance =
            distance_meters(input.lat, input.lng, address.latitude, address.longitude);

        Ok(VerificationResult {
            is_valid: confidence >= self.config.min_confidence,
            confidence,
            source: Source::Radar,
            coordinates: Coordinates {
                lat: address.latitude,
                lng: address.longitude,
            },
            metadata: ResultMetadata {
                address: address.formatted_address.clone(),
                place_type: places
                    .first()
                    .and_then(|place| place.categories.first().cloned()),
                distance_from_original: Some(distance),
                verified_at: chrono::Utc::now(),
                response_time_ms: elapsed_ms(start),
            },
            error: None,
        })
    }
}

/// Composite ranking score: reward confidence more than closeness, but
/// closeness still matters.
fn score(candidate: &Candidate) -> f64 {
    CONFIDENCE_WEIGHT * candidate.confidence
        + CLOSENESS_WEIGHT * (1.0 - candidate.distance / MAX_COMPARISON_DISTANCE_M)
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_rewards_confidence_over_closeness() {
        let confident_far = Candidate {
            source: Source::Radar,
            confidence: 0.9,
            distance: 40.0,
        };
        let unsure_near = Candidate {
            source: Source::Nominatim,
            confidence: 0.5,
            distance: 5.0,
        };
        assert!(score(&confident_far) > score(&unsure_near));
    }

    #[test]
    fn score_breaks_confidence_ties_by_distance() {
        let near = Candidate {
            source: Source::Nominatim,
            confidence: 0.8,
            distance: 5.0,
        };
        let far = Candidate {
            source: Source::Radar,
            confidence: 0.8,
            distance: 45.0,
        };
        assert!(score(&near) > score(&far));
    }
}
