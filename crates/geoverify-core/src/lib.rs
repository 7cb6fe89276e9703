//! Shared types and configuration for the geoverify workspace.
//!
//! The engine resolves an upstream candidate coordinate (typically produced
//! by an LLM) against independent geocoding providers and returns a
//! [`VerificationResult`]. This crate holds the data model those crates
//! exchange plus the env-driven [`AppConfig`].

pub mod app_config;
pub mod config;
pub mod types;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use types::{
    CoordinateInput, Coordinates, PerformanceStats, ResultMetadata, Source, VerificationResult,
    ORIGINAL_FALLBACK_CONFIDENCE,
};
