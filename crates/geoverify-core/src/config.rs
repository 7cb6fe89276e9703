use thiserror::Error;

use crate::app_config::AppConfig;

/// Nothing in the environment is strictly required (every option has a
/// default, and the paid provider just stays disabled without a key), so
/// the only failure mode is a set variable that does not parse.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load engine configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a set variable fails to parse. Unset variables
/// fall back to the documented defaults; nothing is strictly required (the
/// paid provider simply stays disabled without `RADAR_API_KEY`).
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a set variable fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// The core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = AppConfig::default();

    let or_default = |var: &str, default: String| -> String {
        lookup(var).unwrap_or(default)
    };

    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match lookup(var) {
            Ok(raw) => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                other => Err(ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: format!("expected a boolean, got '{other}'"),
                }),
            },
            Err(_) => Ok(default),
        }
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Ok(default),
        }
    };

    let parse_usize = |var: &str, default: usize| -> Result<usize, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .parse::<usize>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    };

    let parse_f64 = |var: &str, default: f64| -> Result<f64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Ok(default),
        }
    };

    Ok(AppConfig {
        enable_nominatim: parse_bool("GEOVERIFY_ENABLE_NOMINATIM", defaults.enable_nominatim)?,
        enable_radar: parse_bool("GEOVERIFY_ENABLE_RADAR", defaults.enable_radar)?,
        radar_api_key: lookup("RADAR_API_KEY").ok(),
        fallback_to_original: parse_bool(
            "GEOVERIFY_FALLBACK_TO_ORIGINAL",
            defaults.fallback_to_original,
        )?,
        cache_enabled: parse_bool("GEOVERIFY_CACHE_ENABLED", defaults.cache_enabled)?,
        cache_ttl_secs: parse_u64("GEOVERIFY_CACHE_TTL_SECS", defaults.cache_ttl_secs)?,
        max_distance_m: parse_f64("GEOVERIFY_MAX_DISTANCE_M", defaults.max_distance_m)?,
        min_confidence: parse_f64("GEOVERIFY_MIN_CONFIDENCE", defaults.min_confidence)?,
        batch_size: parse_usize("GEOVERIFY_BATCH_SIZE", defaults.batch_size)?,
        timeout_ms: parse_u64("GEOVERIFY_TIMEOUT_MS", defaults.timeout_ms)?,
        nominatim_user_agent: or_default(
            "GEOVERIFY_NOMINATIM_USER_AGENT",
            defaults.nominatim_user_agent,
        ),
        nominatim_interval_ms: parse_u64(
            "GEOVERIFY_NOMINATIM_INTERVAL_MS",
            defaults.nominatim_interval_ms,
        )?,
        log_level: or_default("GEOVERIFY_LOG_LEVEL", defaults.log_level),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn empty_env_yields_defaults() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.enable_nominatim);
        assert!(cfg.radar_api_key.is_none());
        assert_eq!(cfg.batch_size, 10);
        assert_eq!(cfg.nominatim_interval_ms, 1000);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn radar_api_key_is_picked_up() {
        let mut map = HashMap::new();
        map.insert("RADAR_API_KEY", "prv_test123");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.radar_api_key.as_deref(), Some("prv_test123"));
    }

    #[test]
    fn bool_accepts_common_spellings() {
        let mut map = HashMap::new();
        map.insert("GEOVERIFY_ENABLE_RADAR", "0");
        map.insert("GEOVERIFY_CACHE_ENABLED", "no");
        map.insert("GEOVERIFY_ENABLE_NOMINATIM", "YES");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(!cfg.enable_radar);
        assert!(!cfg.cache_enabled);
        assert!(cfg.enable_nominatim);
    }

    #[test]
    fn invalid_bool_is_rejected() {
        let mut map = HashMap::new();
        map.insert("GEOVERIFY_ENABLE_RADAR", "maybe");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GEOVERIFY_ENABLE_RADAR"),
            "expected InvalidEnvVar(GEOVERIFY_ENABLE_RADAR), got: {result:?}"
        );
    }

    #[test]
    fn invalid_number_is_rejected() {
        let mut map = HashMap::new();
        map.insert("GEOVERIFY_BATCH_SIZE", "lots");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GEOVERIFY_BATCH_SIZE"),
            "expected InvalidEnvVar(GEOVERIFY_BATCH_SIZE), got: {result:?}"
        );
    }

    #[test]
    fn numeric_overrides_are_applied() {
        let mut map = HashMap::new();
        map.insert("GEOVERIFY_CACHE_TTL_SECS", "60");
        map.insert("GEOVERIFY_MAX_DISTANCE_M", "500.5");
        map.insert("GEOVERIFY_TIMEOUT_MS", "2500");
        map.insert("GEOVERIFY_NOMINATIM_INTERVAL_MS", "1500");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.cache_ttl_secs, 60);
        assert!((cfg.max_distance_m - 500.5).abs() < f64::EPSILON);
        assert_eq!(cfg.timeout_ms, 2500);
        assert_eq!(cfg.nominatim_interval_ms, 1500);
    }
}
