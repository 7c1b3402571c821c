use std::{sync::Arc, time::Duration};

use chrono::NaiveDate;

use crate::{
    config::Config,
    error::Result,
    forecast::{self, ForecastPanel},
    location::{self, LocationState},
    model::{FutureWeather, Location},
    notify::Notifier,
    provider::{BackendClient, LocationIqClient, PlaceSearch, ReverseGeocoder, WeatherBackend},
    refresh::{self, ConditionsPanel, DEFAULT_REFRESH_INTERVAL},
    search::{Autocomplete, Search},
    view::ViewHandle,
};

/// The services shared by every view: backend, current location and notifications.
#[derive(Debug, Clone)]
pub struct Dashboard {
    backend: Arc<dyn WeatherBackend>,
    geocoder: Arc<dyn ReverseGeocoder>,
    places: Option<Arc<dyn PlaceSearch>>,
    location: LocationState,
    notifier: Notifier,
    refresh_interval: Duration,
}

impl Dashboard {
    pub fn new(backend: Arc<dyn WeatherBackend>, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self {
            backend,
            geocoder,
            places: None,
            location: LocationState::default(),
            notifier: Notifier::default(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }

    /// Wire HTTP clients from configuration. Autocomplete is only available
    /// when LocationIQ credentials are present.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let backend = Arc::new(BackendClient::new(config.backend_url()?));

        let places = config.locationiq().ok().map(|c| {
            Arc::new(LocationIqClient::new(&c.api_url, &c.api_key)) as Arc<dyn PlaceSearch>
        });

        Ok(Self {
            backend: backend.clone(),
            geocoder: backend,
            places,
            location: LocationState::new(config.initial_location()),
            notifier: Notifier::new(config.notification_time()),
            refresh_interval: config.refresh_interval(),
        })
    }

    pub fn with_places(mut self, places: Arc<dyn PlaceSearch>) -> Self {
        self.places = Some(places);
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn location(&self) -> &LocationState {
        &self.location
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn backend(&self) -> &Arc<dyn WeatherBackend> {
        &self.backend
    }

    pub fn mount_conditions(&self) -> ViewHandle<ConditionsPanel> {
        refresh::start(
            Arc::clone(&self.backend),
            self.location.clone(),
            self.notifier.clone(),
            self.refresh_interval,
        )
    }

    pub fn mount_forecast(&self) -> ViewHandle<ForecastPanel> {
        forecast::start(Arc::clone(&self.backend), self.location.clone(), self.notifier.clone())
    }

    pub fn search(&self) -> Search {
        Search::new(Arc::clone(&self.backend), self.location.clone(), self.notifier.clone())
    }

    pub fn autocomplete(&self) -> anyhow::Result<Autocomplete> {
        let places = self.places.clone().ok_or_else(|| {
            anyhow::anyhow!(
                "Place suggestions are not configured.\n\
                 Hint: run `reporter configure locationiq` and enter your API key."
            )
        })?;

        Ok(Autocomplete::new(places, self.notifier.clone()))
    }

    /// Resolve device coordinates into the current location.
    pub async fn locate(&self, lat: f64, lon: f64) -> Option<Location> {
        location::locate(self.geocoder.as_ref(), &self.location, &self.notifier, lat, lon).await
    }

    /// Forecast for one future date at the current location.
    pub async fn future(&self, date: NaiveDate) -> Result<FutureWeather> {
        let query = self.location.get().query();

        self.backend.future_conditions(&query, date).await.inspect_err(|e| {
            self.notifier.error(format!("Error: {e}"));
        })
    }
}
