//! Multi-day forecast view. Fetched on mount and on every location name change.

use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    location::{LocationState, Snapshot},
    model::ForecastDay,
    notify::Notifier,
    provider::{DEFAULT_FORECAST_DAYS, WeatherBackend},
    view::{ViewContext, ViewHandle},
};

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPanel {
    /// At most `DEFAULT_FORECAST_DAYS` entries, in date order.
    pub days: Vec<ForecastDay>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for ForecastPanel {
    fn default() -> Self {
        Self {
            days: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

#[derive(Debug, Clone)]
struct Loader {
    backend: Arc<dyn WeatherBackend>,
    notifier: Notifier,
    view: ViewContext<ForecastPanel>,
}

impl Loader {
    async fn load(self, snapshot: Snapshot) {
        let generation = snapshot.generation;
        let query = snapshot.location.query();

        match self.backend.forecast(&query, DEFAULT_FORECAST_DAYS).await {
            Ok(mut days) => {
                days.truncate(usize::from(DEFAULT_FORECAST_DAYS));
                self.view.commit(generation, |p| {
                    p.days = days;
                    p.error = None;
                    p.loading = false;
                });
            }
            Err(e) => {
                tracing::debug!(%query, "forecast failed: {e}");
                let applied = self.view.commit(generation, |p| {
                    p.error = Some(e.to_string());
                    p.loading = false;
                });
                if applied {
                    self.notifier.error("Error fetching forecasting responses.");
                }
            }
        }
    }
}

/// Mount the forecast view. Must be called from within a tokio runtime.
pub fn start(
    backend: Arc<dyn WeatherBackend>,
    location: LocationState,
    notifier: Notifier,
) -> ViewHandle<ForecastPanel> {
    let mut changes = location.subscribe();
    let first = changes.borrow_and_update().clone();

    let (view, state) = ViewContext::new(location, ForecastPanel::default());
    let token = view.token.clone();
    let loader = Loader {
        backend,
        notifier,
        view,
    };

    let task = tokio::spawn(run(loader, changes, first));
    ViewHandle::new(token, state, task)
}

async fn run(loader: Loader, mut changes: watch::Receiver<Snapshot>, first: Snapshot) {
    tokio::spawn(loader.clone().load(first));

    loop {
        tokio::select! {
            _ = loader.view.token.cancelled() => break,
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = changes.borrow_and_update().clone();
                tokio::spawn(loader.clone().load(snapshot));
            }
        }
    }

    tracing::debug!("forecast view unmounted");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        notify::Severity,
        testing::{FakeBackend, location, settle},
    };
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn loads_seven_days_on_mount() {
        let backend = Arc::new(FakeBackend {
            forecast_days: 10,
            ..FakeBackend::default()
        });
        let state = LocationState::new(location("Colombo"));
        let handle = start(backend.clone(), state, Notifier::default());

        settle().await;
        let panel = handle.state();
        assert_eq!(backend.forecast_calls(), 1);
        assert_eq!(panel.days.len(), 7);
        assert!(panel.days.windows(2).all(|w| w[0].date < w[1].date));
        assert!(!panel.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn refetches_only_on_name_change() {
        let backend = Arc::new(FakeBackend::default());
        let state = LocationState::new(location("Colombo"));
        let _handle = start(backend.clone(), state.clone(), Notifier::default());
        settle().await;

        // No interval for the forecast view.
        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(backend.forecast_calls(), 1);

        state.set(location("Colombo"));
        settle().await;
        assert_eq!(backend.forecast_calls(), 1);

        state.set(location("Galle"));
        settle().await;
        assert_eq!(backend.forecast_calls(), 2);
        assert_eq!(backend.queries().last().map(String::as_str), Some("Galle, Sri Lanka"));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_sets_error_and_notifies() {
        let backend = Arc::new(FakeBackend {
            fail_forecast: true,
            ..FakeBackend::default()
        });
        let state = LocationState::new(location("Colombo"));
        let notifier = Notifier::default();
        let handle = start(backend, state, notifier.clone());

        settle().await;
        let panel = handle.state();
        assert_eq!(panel.error.as_deref(), Some("forecast unavailable"));
        assert!(panel.days.is_empty());

        let shown = notifier.current().unwrap();
        assert_eq!(shown.severity, Severity::Error);
        assert_eq!(shown.message, "Error fetching forecasting responses.");
    }

    #[tokio::test(start_paused = true)]
    async fn stale_forecast_is_discarded() {
        let mut backend = FakeBackend::default();
        backend.delays.insert("Colombo".into(), Duration::from_secs(5));
        let backend = Arc::new(backend);

        let state = LocationState::new(location("Colombo"));
        let handle = start(backend.clone(), state.clone(), Notifier::default());
        settle().await;

        state.set(location("Matara"));
        settle().await;
        let fresh = handle.state();
        assert!(!fresh.loading);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(handle.state(), fresh);
        assert_eq!(backend.forecast_calls(), 2);
    }
}
