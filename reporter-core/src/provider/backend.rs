use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;

use crate::{
    error::{Resource, Result},
    model::{CurrentConditions, ForecastDay, ForecastResponse, FutureWeather, GeoCode},
};

use super::{ReverseGeocoder, WeatherBackend, endpoint, get_json, get_text, http_client};

/// HTTP client for the weather aggregation backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: http_client(),
        }
    }
}

#[async_trait]
impl WeatherBackend for BackendClient {
    async fn current_conditions(&self, query: &str) -> Result<CurrentConditions> {
        let url = endpoint(&self.base_url, "currentWeather");
        get_json(&self.http, &url, &[("city", query)], Resource::CurrentWeather).await
    }

    async fn summary_text(&self, query: &str) -> Result<String> {
        let url = endpoint(&self.base_url, "currentWeatherSummary");
        let body = get_text(&self.http, &url, &[("city", query)], Resource::Summary).await?;

        // The summary arrives either as a JSON string literal or as bare text.
        Ok(serde_json::from_str::<String>(&body).unwrap_or(body))
    }

    async fn forecast(&self, query: &str, days: u8) -> Result<Vec<ForecastDay>> {
        let url = endpoint(&self.base_url, "forecast");
        let days = days.to_string();

        let parsed: ForecastResponse = get_json(
            &self.http,
            &url,
            &[("city", query), ("days", days.as_str())],
            Resource::Forecast,
        )
        .await?;

        Ok(parsed.forecast.forecastday)
    }

    async fn future_conditions(&self, query: &str, date: NaiveDate) -> Result<FutureWeather> {
        let url = endpoint(&self.base_url, "futureWeather");
        let date = date.format("%Y-%m-%d").to_string();

        get_json(
            &self.http,
            &url,
            &[("city", query), ("date", date.as_str())],
            Resource::FutureWeather,
        )
        .await
    }
}

#[async_trait]
impl ReverseGeocoder for BackendClient {
    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<GeoCode> {
        let url = endpoint(&self.base_url, "reverseGeocode");
        let lat = lat.to_string();
        let lon = lon.to_string();

        get_json(
            &self.http,
            &url,
            &[("lat", lat.as_str()), ("lon", lon.as_str())],
            Resource::Geolocation,
        )
        .await
    }
}
