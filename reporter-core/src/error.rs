use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;

/// What a failed request was trying to fetch; used in the generic failure text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    CurrentWeather,
    Summary,
    Forecast,
    FutureWeather,
    Geolocation,
    LocationSuggestions,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::CurrentWeather => "weather data",
            Resource::Summary => "weather summary",
            Resource::Forecast => "weather forecast",
            Resource::FutureWeather => "future weather data",
            Resource::Geolocation => "geolocation data",
            Resource::LocationSuggestions => "location suggestions",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// The request never produced a response (unreachable host, timeout, ...).
    #[error("Error fetching {resource}: {source}")]
    Transport {
        resource: Resource,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success status without a structured error body.
    #[error("Error fetching {resource}: request failed with status {status}: {body}")]
    Status {
        resource: Resource,
        status: StatusCode,
        body: String,
    },

    #[error("Error fetching {resource}: {source}")]
    Decode {
        resource: Resource,
        #[source]
        source: serde_json::Error,
    },

    /// The backend's own `{error: {message}}` payload.
    #[error("{message}")]
    Api { message: String },

    #[error("Please enter a place to search for weather")]
    EmptyInput,
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl WeatherError {
    /// Classify a non-success response: prefer the embedded message when the body carries one.
    pub(crate) fn from_response(resource: Resource, status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) => WeatherError::Api {
                message: parsed.error.message,
            },
            Err(_) => WeatherError::Status {
                resource,
                status,
                body: truncate_body(body),
            },
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
