//! HTTP client for the OpenStreetMap Nominatim geocoding service.
//!
//! Nominatim is free but strictly rate-limited per client: the usage policy
//! allows one request per second and requires an identifying `User-Agent`.
//! The client enforces both. The rate gate applies across reverse and
//! search calls alike, because the upstream limit is per client IP
//! regardless of call type.

use std::time::{Duration, Instant};

use reqwest::{Client, Url};
use tokio::sync::Mutex;

use crate::error::ProviderError;
use crate::types::NominatimPlace;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";

/// Half-width in degrees of the bounding viewbox applied to biased searches.
const SEARCH_VIEWBOX_DEGREES: f64 = 0.1;

/// Client for the Nominatim `/reverse` and `/search` endpoints.
///
/// All calls on one instance share the inter-request gate, so concurrent
/// callers queue behind it in FIFO-ish order. Share the instance rather
/// than constructing one per call site, or the gate loses its meaning.
pub struct NominatimClient {
    client: Client,
    base_url: Url,
    /// Time of the last issued request. Guarded by an async mutex held
    /// across the eligibility wait: two racing callers must not both read
    /// the old timestamp and under-wait.
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl NominatimClient {
    /// Creates a client pointed at the production Nominatim service.
    ///
    /// `user_agent` must identify the operator per the Nominatim usage
    /// policy. `min_interval` is the minimum spacing between requests.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        user_agent: &str,
        min_interval: Duration,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Self::with_base_url(user_agent, min_interval, timeout, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`ProviderError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        user_agent: &str,
        min_interval: Duration,
        timeout: Duration,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|e| ProviderError::InvalidBaseUrl {
                base_url: normalised.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url,
            last_request: Mutex::new(None),
            min_interval,
        })
    }

    /// Reverse-geocodes a coordinate to the nearest known place.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::UnexpectedStatus`] on any non-2xx response.
    /// - [`ProviderError::Http`] on network failure or timeout.
    /// - [`ProviderError::Deserialize`] if the body is not the expected JSON.
    pub async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<NominatimPlace, ProviderError> {
        let mut url = self.endpoint("reverse");
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("lat", &lat.to_string())
            .append_pair("lon", &lng.to_string())
            .append_pair("zoom", "18")
            .append_pair("addressdetails", "1");

        self.request_json(url, "nominatim reverse geocode").await
    }

    /// Searches for a place by free-text query, optionally biased towards
    /// a coordinate with a bounded viewbox.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::reverse_geocode`].
    pub async fn search_place(
        &self,
        query: &str,
        near: Option<(f64, f64)>,
    ) -> Result<Vec<NominatimPlace>, ProviderError> {
        let mut url = self.endpoint("search");
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", query)
            .append_pair("limit", "5")
            .append_pair("addressdetails", "1");

        if let Some((lat, lng)) = near {
            let viewbox = format!(
                "{},{},{},{}",
                lng - SEARCH_VIEWBOX_DEGREES,
                lat + SEARCH_VIEWBOX_DEGREES,
                lng + SEARCH_VIEWBOX_DEGREES,
                lat - SEARCH_VIEWBOX_DEGREES
            );
            url.query_pairs_mut()
                .append_pair("viewbox", &viewbox)
                .append_pair("bounded", "1");
        }

        self.request_json(url, "nominatim place search").await
    }

    /// Sleeps until the minimum inter-request interval has elapsed, then
    /// stamps the new request time.
    ///
    /// The lock is held across the sleep on purpose: it serializes all
    /// calls through this client process-wide, which is exactly the
    /// contract the upstream rate limit asks for.
    async fn wait_for_rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(at) = *last {
            let elapsed = at.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    fn endpoint(&self, path: &str) -> Url {
        // Joining onto a normalised trailing-slash base cannot fail for a
        // plain path segment.
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }

    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, ProviderError> {
        self.wait_for_rate_limit().await;

        tracing::debug!(%url, "nominatim request");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}
