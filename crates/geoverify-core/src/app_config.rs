use std::time::Duration;

/// Engine configuration.
///
/// Every field has a working default (see [`AppConfig::default`]), so library
/// users can construct this directly; the CLI loads it from `GEOVERIFY_*`
/// environment variables via [`crate::config::load_app_config`].
#[derive(Clone)]
pub struct AppConfig {
    /// Attempt the free provider first for every resolution.
    pub enable_nominatim: bool,
    /// Escalate to the paid provider on disagreement or low quality.
    /// Effective only when `radar_api_key` is present.
    pub enable_radar: bool,
    /// Private key for the paid provider. `None` disables it regardless of
    /// `enable_radar`.
    pub radar_api_key: Option<String>,
    /// Whether the original-coordinate fallback counts as a valid result.
    pub fallback_to_original: bool,
    pub cache_enabled: bool,
    /// Cache entry time-to-live in seconds.
    pub cache_ttl_secs: u64,
    /// Distance beyond which a provider coordinate is penalized as
    /// disagreeing outright, in meters.
    pub max_distance_m: f64,
    /// Results below this confidence are flagged `is_valid = false`.
    pub min_confidence: f64,
    /// Batch chunk size: peak concurrent in-flight resolutions.
    pub batch_size: usize,
    /// Per-request HTTP timeout in milliseconds.
    pub timeout_ms: u64,
    /// Identifying `User-Agent` sent on every free-provider call. The
    /// upstream service's usage policy requires a way to contact the
    /// operator.
    pub nominatim_user_agent: String,
    /// Minimum interval between free-provider requests, milliseconds.
    pub nominatim_interval_ms: u64,
    pub log_level: String,
}

impl AppConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    #[must_use]
    pub fn nominatim_interval(&self) -> Duration {
        Duration::from_millis(self.nominatim_interval_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            enable_nominatim: true,
            enable_radar: true,
            radar_api_key: None,
            fallback_to_original: true,
            cache_enabled: true,
            cache_ttl_secs: 24 * 60 * 60,
            max_distance_m: 1000.0,
            min_confidence: 0.6,
            batch_size: 10,
            timeout_ms: 5000,
            nominatim_user_agent: "geoverify/0.1 (coordinate-verification)".to_owned(),
            nominatim_interval_ms: 1000,
            log_level: "info".to_owned(),
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("enable_nominatim", &self.enable_nominatim)
            .field("enable_radar", &self.enable_radar)
            .field(
                "radar_api_key",
                &self.radar_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("fallback_to_original", &self.fallback_to_original)
            .field("cache_enabled", &self.cache_enabled)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("max_distance_m", &self.max_distance_m)
            .field("min_confidence", &self.min_confidence)
            .field("batch_size", &self.batch_size)
            .field("timeout_ms", &self.timeout_ms)
            .field("nominatim_user_agent", &self.nominatim_user_agent)
            .field("nominatim_interval_ms", &self.nominatim_interval_ms)
            .field("log_level", &self.log_level)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AppConfig::default();
        assert!(cfg.enable_nominatim);
        assert!(cfg.enable_radar);
        assert!(cfg.radar_api_key.is_none());
        assert_eq!(cfg.cache_ttl_secs, 86_400);
        assert!((cfg.max_distance_m - 1000.0).abs() < f64::EPSILON);
        assert!((cfg.min_confidence - 0.6).abs() < f64::EPSILON);
        assert_eq!(cfg.batch_size, 10);
        assert_eq!(cfg.timeout_ms, 5000);
        assert_eq!(cfg.nominatim_interval_ms, 1000);
    }

    #[test]
    fn debug_redacts_api_key() {
        let cfg = AppConfig {
            radar_api_key: Some("prv_secret".to_owned()),
            ..AppConfig::default()
        };
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("prv_secret"));
        assert!(rendered.contains("[redacted]"));
    }
}
