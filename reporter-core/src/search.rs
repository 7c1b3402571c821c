use std::{collections::HashSet, sync::Arc};

use crate::{
    error::{Result, WeatherError},
    location::LocationState,
    model::{CurrentConditions, GeoCode, PlaceSuggestion},
    notify::Notifier,
    provider::{PlaceSearch, WeatherBackend},
};

/// Autocomplete stays quiet for non-empty input shorter than this.
pub const MIN_QUERY_CHARS: usize = 2;

/// Free-text place search that becomes the current location on success.
#[derive(Debug, Clone)]
pub struct Search {
    backend: Arc<dyn WeatherBackend>,
    location: LocationState,
    notifier: Notifier,
}

impl Search {
    pub fn new(
        backend: Arc<dyn WeatherBackend>,
        location: LocationState,
        notifier: Notifier,
    ) -> Self {
        Self {
            backend,
            location,
            notifier,
        }
    }

    pub async fn submit(&self, place: &str) -> Result<CurrentConditions> {
        let place = place.trim();
        if place.is_empty() {
            self.notifier.warning(WeatherError::EmptyInput.to_string());
            return Err(WeatherError::EmptyInput);
        }

        match self.backend.current_conditions(place).await {
            Ok(data) => {
                self.location.set(data.location.clone());
                Ok(data)
            }
            Err(e) => {
                self.notifier.error(format!("Error: {e}"));
                Err(e)
            }
        }
    }
}

/// Suggestion list that follows the text typed into the place field.
#[derive(Debug, Clone)]
pub struct Autocomplete {
    places: Arc<dyn PlaceSearch>,
    notifier: Notifier,
    suggestions: Vec<PlaceSuggestion>,
}

impl Autocomplete {
    pub fn new(places: Arc<dyn PlaceSearch>, notifier: Notifier) -> Self {
        Self {
            places,
            notifier,
            suggestions: Vec::new(),
        }
    }

    pub fn should_query(text: &str) -> bool {
        text.trim().is_empty() || text.chars().count() >= MIN_QUERY_CHARS
    }

    /// Update suggestions for the new input text.
    ///
    /// On failure the previous suggestions are kept.
    pub async fn on_input(&mut self, text: &str) -> Result<&[PlaceSuggestion]> {
        if !Self::should_query(text) {
            self.suggestions.clear();
            return Ok(&self.suggestions);
        }

        let found = match self.places.autocomplete(text).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(%text, "location suggestions failed: {e}");
                return Err(e);
            }
        };

        if found.is_empty() {
            self.notifier.warning("No location found for the entered place");
            self.suggestions.clear();
        } else {
            self.suggestions = dedupe_by_label(&found);
        }

        Ok(&self.suggestions)
    }

    pub fn suggestions(&self) -> &[PlaceSuggestion] {
        &self.suggestions
    }

    pub fn clear(&mut self) {
        self.suggestions.clear();
    }
}

/// Candidates in original order, keeping the first of each display label.
pub fn dedupe_by_label(found: &[GeoCode]) -> Vec<PlaceSuggestion> {
    let mut seen = HashSet::new();
    found
        .iter()
        .map(PlaceSuggestion::from_geocode)
        .filter(|s| seen.insert(s.label.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::Address,
        notify::Severity,
        testing::{FakeBackend, FakePlaces, location},
    };

    fn place(name: &str, country: &str, code: &str) -> GeoCode {
        GeoCode {
            address: Address {
                name: Some(name.into()),
                country: Some(country.into()),
                country_code: Some(code.into()),
                ..Address::default()
            },
            ..GeoCode::default()
        }
    }

    #[tokio::test]
    async fn blank_search_warns_without_fetching() {
        let backend = Arc::new(FakeBackend::default());
        let notifier = Notifier::default();
        let search = Search::new(backend.clone(), LocationState::default(), notifier.clone());

        let err = search.submit("   ").await.unwrap_err();

        assert!(matches!(err, WeatherError::EmptyInput));
        assert_eq!(backend.current_calls(), 0);
        let shown = notifier.current().unwrap();
        assert_eq!(shown.severity, Severity::Warning);
        assert_eq!(shown.message, "Please enter a place to search for weather");
    }

    #[tokio::test]
    async fn successful_search_replaces_location() {
        let backend = Arc::new(FakeBackend::default());
        let state = LocationState::new(location("Colombo"));
        let search = Search::new(backend, state.clone(), Notifier::default());

        let data = search.submit("Trincomalee, Sri Lanka").await.unwrap();

        assert_eq!(data.location.name, "Trincomalee");
        assert_eq!(state.get(), data.location);
        assert_eq!(state.generation(), 1);
    }

    #[tokio::test]
    async fn failed_search_notifies_and_keeps_location() {
        let backend = Arc::new(FakeBackend {
            fail_current: true,
            ..FakeBackend::default()
        });
        let state = LocationState::new(location("Colombo"));
        let notifier = Notifier::default();
        let search = Search::new(backend, state.clone(), notifier.clone());

        assert!(search.submit("Nowhere").await.is_err());

        assert_eq!(state.get().name, "Colombo");
        let shown = notifier.current().unwrap();
        assert_eq!(shown.severity, Severity::Error);
        assert_eq!(shown.message, "Error: backend unavailable");
    }

    #[test]
    fn query_gate() {
        assert!(Autocomplete::should_query(""));
        assert!(Autocomplete::should_query("  "));
        assert!(!Autocomplete::should_query("L"));
        assert!(Autocomplete::should_query("Lo"));
        assert!(!Autocomplete::should_query("é"));
    }

    #[tokio::test]
    async fn single_character_clears_without_calling() {
        let places = Arc::new(FakePlaces {
            results: vec![place("London", "United Kingdom", "gb")],
            ..FakePlaces::default()
        });
        let mut ac = Autocomplete::new(places.clone(), Notifier::default());

        assert_eq!(ac.on_input("Lo").await.unwrap().len(), 1);
        assert_eq!(places.calls(), 1);

        assert!(ac.on_input("L").await.unwrap().is_empty());
        assert_eq!(places.calls(), 1);
        assert!(ac.suggestions().is_empty());
    }

    #[tokio::test]
    async fn empty_input_and_longer_queries_call_through() {
        let places = Arc::new(FakePlaces {
            results: vec![place("Lima", "Peru", "pe")],
            ..FakePlaces::default()
        });
        let mut ac = Autocomplete::new(places.clone(), Notifier::default());

        ac.on_input("").await.unwrap();
        ac.on_input("Lim").await.unwrap();
        assert_eq!(places.calls(), 2);
    }

    #[tokio::test]
    async fn duplicate_labels_are_collapsed() {
        let places = Arc::new(FakePlaces {
            results: vec![
                place("Springfield", "United States of America", "us"),
                place("Springfield", "United States", "us"),
                place("Springfield", "Australia", "au"),
            ],
            ..FakePlaces::default()
        });
        let mut ac = Autocomplete::new(places, Notifier::default());

        let got = ac.on_input("Spring").await.unwrap().to_vec();

        assert_eq!(got.len(), 2);
        assert_eq!(got[0].label, "Springfield, us");
        assert_eq!(got[0].value, "Springfield, United States of America");
        assert_eq!(got[1].label, "Springfield, au");
    }

    #[tokio::test]
    async fn no_results_is_a_warning_not_an_error() {
        let places = Arc::new(FakePlaces::default());
        let notifier = Notifier::default();
        let mut ac = Autocomplete::new(places, notifier.clone());

        let got = ac.on_input("Xyzzy").await.unwrap();

        assert!(got.is_empty());
        let shown = notifier.current().unwrap();
        assert_eq!(shown.severity, Severity::Warning);
        assert_eq!(shown.message, "No location found for the entered place");
    }

    #[tokio::test]
    async fn failure_keeps_previous_suggestions() {
        let places = Arc::new(FakePlaces {
            results: vec![place("Oslo", "Norway", "no")],
            ..FakePlaces::default()
        });
        let mut ac = Autocomplete::new(places, Notifier::default());
        ac.on_input("Osl").await.unwrap();

        let failing: Arc<dyn PlaceSearch> = Arc::new(FakePlaces {
            fail: true,
            ..FakePlaces::default()
        });
        ac.places = failing;

        assert!(ac.on_input("Oslo").await.is_err());
        assert_eq!(ac.suggestions().len(), 1);
    }
}
