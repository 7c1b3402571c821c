//! Core library for the weather reporter dashboard.
//!
//! This crate defines:
//! - The PM2.5 Air Quality Index calculator
//! - Shared current-location state and the user notification channel
//! - Clients for the weather aggregation backend and place autocomplete
//! - The conditions view (periodic refresh) and the forecast view
//!
//! It is used by `reporter-cli`, but can also back any other front end.

pub mod aqi;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod location;
pub mod model;
pub mod notify;
pub mod provider;
pub mod refresh;
pub mod search;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use aqi::{AQI_UNKNOWN, AqiCategory, compute_aqi};
pub use config::{Config, LocationIqConfig};
pub use dashboard::Dashboard;
pub use error::{Resource, WeatherError};
pub use location::LocationState;
pub use model::{CurrentConditions, ForecastDay, FutureWeather, Location, PlaceSuggestion};
pub use notify::{Notification, Notifier, Severity};
pub use provider::{PlaceSearch, ReverseGeocoder, WeatherBackend};
pub use view::ViewHandle;
