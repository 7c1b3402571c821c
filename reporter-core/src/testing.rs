//! In-memory backends for exercising views and flows without HTTP.

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    error::{Result, WeatherError},
    model::{CurrentConditions, ForecastDay, FutureWeather, GeoCode, Location},
    provider::{PlaceSearch, WeatherBackend},
};

pub fn location(name: &str) -> Location {
    Location {
        name: name.to_string(),
        ..Location::fallback()
    }
}

pub fn conditions(name: &str, pm2_5: Option<f64>) -> CurrentConditions {
    serde_json::from_value(serde_json::json!({
        "location": {
            "name": name, "region": "Region", "country": "Sri Lanka",
            "lat": 7.0, "lon": 80.0, "tz_id": "Asia/Colombo",
            "localtime_epoch": 1700000000, "localtime": "2023-11-14 12:00"
        },
        "current": {
            "temp_c": 28.0,
            "condition": { "text": "Sunny", "icon": "", "code": 1000 },
            "wind_kph": 10.0, "pressure_mb": 1010.0, "humidity": 70, "vis_km": 10.0,
            "air_quality": { "pm2_5": pm2_5 }
        }
    }))
    .expect("fixture conditions")
}

pub fn forecast_day(date: NaiveDate) -> ForecastDay {
    serde_json::from_value(serde_json::json!({
        "date": date.format("%Y-%m-%d").to_string(),
        "day": {
            "maxtemp_c": 31.0, "mintemp_c": 24.0, "avgtemp_c": 27.0,
            "condition": { "text": "Rain", "icon": "", "code": 1063 }
        },
        "astro": { "sunrise": "06:00 AM", "sunset": "06:00 PM" }
    }))
    .expect("fixture forecast day")
}

/// Records every call; failures and delays are configured per query.
#[derive(Debug, Default)]
pub struct FakeBackend {
    pub current_calls: AtomicUsize,
    pub summary_calls: AtomicUsize,
    pub forecast_calls: AtomicUsize,
    pub queries: Mutex<Vec<String>>,
    pub fail_current: bool,
    pub fail_summary: bool,
    pub fail_forecast: bool,
    pub forecast_days: usize,
    pub pm2_5: Option<f64>,
    /// Queries containing the key are delayed by the duration.
    pub delays: HashMap<String, Duration>,
}

impl FakeBackend {
    pub fn current_calls(&self) -> usize {
        self.current_calls.load(Ordering::SeqCst)
    }

    pub fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }

    pub fn forecast_calls(&self) -> usize {
        self.forecast_calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("queries lock").clone()
    }

    async fn before(&self, query: &str) {
        self.queries.lock().expect("queries lock").push(query.to_string());
        let delay = self
            .delays
            .iter()
            .find(|(key, _)| query.contains(key.as_str()))
            .map(|(_, d)| *d);
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
    }

    fn city(query: &str) -> &str {
        query.split(',').next().unwrap_or(query).trim()
    }
}

#[async_trait]
impl WeatherBackend for FakeBackend {
    async fn current_conditions(&self, query: &str) -> Result<CurrentConditions> {
        self.current_calls.fetch_add(1, Ordering::SeqCst);
        self.before(query).await;
        if self.fail_current {
            return Err(WeatherError::Api {
                message: "backend unavailable".into(),
            });
        }
        Ok(conditions(Self::city(query), self.pm2_5))
    }

    async fn summary_text(&self, query: &str) -> Result<String> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        self.before(query).await;
        if self.fail_summary {
            return Err(WeatherError::Api {
                message: "summary unavailable".into(),
            });
        }
        Ok(format!("Summary for {}", Self::city(query)))
    }

    async fn forecast(&self, query: &str, days: u8) -> Result<Vec<ForecastDay>> {
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);
        self.before(query).await;
        if self.fail_forecast {
            return Err(WeatherError::Api {
                message: "forecast unavailable".into(),
            });
        }
        let count = if self.forecast_days == 0 { usize::from(days) } else { self.forecast_days };
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
        Ok(start.iter_days().take(count).map(forecast_day).collect())
    }

    async fn future_conditions(&self, query: &str, date: NaiveDate) -> Result<FutureWeather> {
        self.before(query).await;
        Ok(FutureWeather {
            location: location(Self::city(query)),
            forecast: crate::model::Forecast {
                forecastday: vec![forecast_day(date)],
            },
        })
    }
}

#[derive(Debug, Default)]
pub struct FakePlaces {
    pub calls: AtomicUsize,
    pub results: Vec<GeoCode>,
    pub fail: bool,
}

impl FakePlaces {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlaceSearch for FakePlaces {
    async fn autocomplete(&self, _query: &str) -> Result<Vec<GeoCode>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(WeatherError::Api {
                message: "rate limited".into(),
            });
        }
        Ok(self.results.clone())
    }
}

/// Let spawned tasks run; with a paused clock this also advances past pending timers due now.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
