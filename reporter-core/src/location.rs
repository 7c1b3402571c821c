//! The single process-wide "current location".
//!
//! Every replacement that changes the place name bumps a generation counter
//! and wakes subscribers. Async work records the generation it started under
//! and commits only while that generation is still current.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;

use crate::{
    model::{GeoCode, Location},
    notify::Notifier,
    provider::ReverseGeocoder,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub location: Location,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct LocationState {
    tx: Arc<watch::Sender<Snapshot>>,
}

impl Default for LocationState {
    fn default() -> Self {
        Self::new(Location::fallback())
    }
}

impl LocationState {
    pub fn new(initial: Location) -> Self {
        let (tx, _) = watch::channel(Snapshot {
            location: initial,
            generation: 0,
        });
        Self { tx: Arc::new(tx) }
    }

    pub fn get(&self) -> Location {
        self.tx.borrow().location.clone()
    }

    /// Replace the current location. Returns `true` when the name changed,
    /// which is the only case that notifies subscribers.
    pub fn set(&self, location: Location) -> bool {
        self.tx.send_if_modified(|snap| {
            let renamed = snap.location.name != location.name;
            snap.location = location;
            if renamed {
                snap.generation += 1;
                tracing::info!(
                    name = %snap.location.name,
                    generation = snap.generation,
                    "location changed"
                );
            }
            renamed
        })
    }

    pub fn generation(&self) -> u64 {
        self.tx.borrow().generation
    }

    /// Whether work started under `generation` may still publish its results.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// Receiver woken on every name change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.tx.subscribe()
    }
}

/// Build a location from device coordinates and their reverse-geocoded address,
/// falling back to the default location's fields for anything missing.
pub fn location_from_coordinates(lat: f64, lon: f64, geo: &GeoCode) -> Location {
    let fallback = Location::fallback();
    let addr = &geo.address;
    let now = Utc::now();

    Location {
        name: non_empty(&addr.village)
            .or_else(|| non_empty(&addr.city))
            .unwrap_or(fallback.name),
        region: non_empty(&addr.state).unwrap_or(fallback.region),
        country: non_empty(&addr.country).unwrap_or(fallback.country),
        lat,
        lon,
        tz_id: String::new(),
        localtime_epoch: now.timestamp(),
        localtime: now.to_rfc3339(),
    }
}

fn non_empty(field: &Option<String>) -> Option<String> {
    field.as_ref().filter(|s| !s.is_empty()).cloned()
}

/// One-shot startup geolocation: resolve coordinates to a place and make it current.
///
/// On failure the existing location stays current and the user is warned.
pub async fn locate(
    geocoder: &dyn ReverseGeocoder,
    state: &LocationState,
    notifier: &Notifier,
    lat: f64,
    lon: f64,
) -> Option<Location> {
    match geocoder.reverse_geocode(lat, lon).await {
        Ok(geo) => {
            let location = location_from_coordinates(lat, lon, &geo);
            state.set(location.clone());
            Some(location)
        }
        Err(e) => {
            tracing::debug!("Reverse geocode failed: {e}");
            notifier.warning("Failed to fetch geolocation data, using default location.");
            None
        }
    }
}
