//! HTTP client for the Radar geocoding API.
//!
//! Paid per call and authenticated with a private key in the
//! `Authorization` header. No client-side rate limit; cost control is the
//! resolver's job (it only escalates here when the free provider
//! disagrees or responds poorly).

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::ProviderError;
use crate::types::{RadarAddress, RadarPlace, RadarReverseResponse, RadarSearchResponse};

const DEFAULT_BASE_URL: &str = "https://api.radar.io/v1/";

/// Client for the Radar `/geocode/reverse` and `/search/places` endpoints.
pub struct RadarClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl RadarClient {
    /// Creates a client pointed at the production Radar API.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, timeout, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`ProviderError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout: Duration,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|e| ProviderError::InvalidBaseUrl {
                base_url: normalised.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Reverse-geocodes a coordinate, returning Radar's best address match.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::UnexpectedStatus`] on any non-2xx response.
    /// - [`ProviderError::Http`] on network failure or timeout.
    /// - [`ProviderError::Deserialize`] if the body is not the expected JSON.
    /// - [`ProviderError::EmptyResponse`] if Radar returns no addresses.
    pub async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<RadarAddress, ProviderError> {
        let mut url = self.endpoint("geocode/reverse");
        url.query_pairs_mut()
            .append_pair("coordinates", &format!("{lat},{lng}"));

        let context = format!("radar reverse geocode ({lat},{lng})");
        let parsed: RadarReverseResponse = self.request_json(url, &context).await?;
        parsed
            .addresses
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse { context })
    }

    /// Searches for places by free-text query, optionally biased towards a
    /// coordinate.
    ///
    /// An empty hit list is a valid answer here, unlike reverse geocoding:
    /// the scorer treats it as "no corroboration" rather than a failure.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::reverse_geocode`], minus
    /// [`ProviderError::EmptyResponse`].
    pub async fn search_places(
        &self,
        query: &str,
        near: Option<(f64, f64)>,
    ) -> Result<Vec<RadarPlace>, ProviderError> {
        let mut url = self.endpoint("search/places");
        url.query_pairs_mut().append_pair("query", query);
        if let Some((lat, lng)) = near {
            url.query_pairs_mut()
                .append_pair("near", &format!("{lat},{lng}"));
        }

        let parsed: RadarSearchResponse = self
            .request_json(url, &format!("radar place search '{query}'"))
            .await?;
        Ok(parsed.places)
    }

    fn endpoint(&self, path: &str) -> Url {
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }

    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, ProviderError> {
        tracing::debug!(%url, "radar request");
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .send()
            .await?;

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

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> RadarClient {
        RadarClient::with_base_url("prv_test", Duration::from_secs(5), "https://radar.example.com")
            .expect("client construction should not fail")
    }

    #[test]
    fn endpoint_joins_nested_paths() {
        let client = test_client();
        assert_eq!(
            client.endpoint("geocode/reverse").as_str(),
            "https://radar.example.com/geocode/reverse"
        );
        assert_eq!(
            client.endpoint("search/places").as_str(),
            "https://radar.example.com/search/places"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = RadarClient::with_base_url("prv_test", Duration::from_secs(5), "::nope::");
        assert!(matches!(result, Err(ProviderError::InvalidBaseUrl { .. })));
    }
}
