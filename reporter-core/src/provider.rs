use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    error::{Resource, Result, WeatherError},
    model::{CurrentConditions, ForecastDay, FutureWeather, GeoCode},
};

pub mod backend;
pub mod locationiq;

pub use backend::BackendClient;
pub use locationiq::LocationIqClient;

pub const DEFAULT_FORECAST_DAYS: u8 = 7;

const REQUEST_TIMEOUT_SECS: u64 = 15;

/// The aggregation backend: weather reads keyed by a location query (`"name, country"`).
#[async_trait]
pub trait WeatherBackend: Send + Sync + Debug {
    async fn current_conditions(&self, query: &str) -> Result<CurrentConditions>;

    /// AI-generated prose describing the current conditions.
    async fn summary_text(&self, query: &str) -> Result<String>;

    async fn forecast(&self, query: &str, days: u8) -> Result<Vec<ForecastDay>>;

    async fn future_conditions(&self, query: &str, date: NaiveDate) -> Result<FutureWeather>;
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync + Debug {
    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<GeoCode>;
}

/// Forward lookup of partial place names.
#[async_trait]
pub trait PlaceSearch: Send + Sync + Debug {
    async fn autocomplete(&self, query: &str) -> Result<Vec<GeoCode>>;
}

pub(crate) fn http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build configured HTTP client, using defaults: {e}");
            Client::new()
        })
}

pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

/// Issue a GET and return the raw body of a successful response.
pub(crate) async fn get_text(
    http: &Client,
    url: &str,
    query: &[(&str, &str)],
    resource: Resource,
) -> Result<String> {
    tracing::debug!(%url, ?query, "GET {resource}");

    let res = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|source| WeatherError::Transport { resource, source })?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|source| WeatherError::Transport { resource, source })?;

    if !status.is_success() {
        tracing::debug!(%status, "{resource} request failed");
        return Err(WeatherError::from_response(resource, status, &body));
    }

    Ok(body)
}

pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &Client,
    url: &str,
    query: &[(&str, &str)],
    resource: Resource,
) -> Result<T> {
    let body = get_text(http, url, query, resource).await?;
    serde_json::from_str(&body).map_err(|source| WeatherError::Decode { resource, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        assert_eq!(endpoint("http://x/api/", "forecast"), "http://x/api/forecast");
        assert_eq!(endpoint("http://x/api", "forecast"), "http://x/api/forecast");
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let http = http_client();
        // Port 9 on localhost (discard) is essentially never listening.
        let err = get_text(&http, "http://127.0.0.1:9/x", &[], Resource::CurrentWeather)
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::Transport { .. }));
        assert!(err.to_string().starts_with("Error fetching weather data:"));
    }
}
