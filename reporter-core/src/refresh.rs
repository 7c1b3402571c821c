//! Current-conditions view: fetch on mount, re-fetch on a fixed interval and
//! whenever the location name changes, until unmounted.

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use tokio::{
    sync::watch,
    time::{self, Instant, MissedTickBehavior},
};

use crate::{
    aqi::aqi_for,
    location::{LocationState, Snapshot},
    model::CurrentConditions,
    notify::Notifier,
    provider::WeatherBackend,
    view::{ViewContext, ViewHandle},
};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionsPanel {
    pub conditions: Option<CurrentConditions>,
    /// PM2.5 AQI of `conditions`; `AQI_UNKNOWN` when off the scale.
    pub aqi: i32,
    pub summary: Option<String>,
    pub loading_weather: bool,
    pub loading_summary: bool,
    pub refreshing: bool,
    /// Set when current conditions could not be fetched; replaces the normal view.
    pub error: Option<String>,
}

impl Default for ConditionsPanel {
    fn default() -> Self {
        Self {
            conditions: None,
            aqi: 0,
            summary: None,
            loading_weather: true,
            loading_summary: true,
            refreshing: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone)]
struct Cycle {
    backend: Arc<dyn WeatherBackend>,
    notifier: Notifier,
    view: ViewContext<ConditionsPanel>,
    /// Scheduled cycles still running; `refreshing` clears when this drops to zero.
    scheduled: Arc<AtomicUsize>,
}

impl Cycle {
    async fn run(self, snapshot: Snapshot, scheduled: bool) {
        let generation = snapshot.generation;
        let query = snapshot.location.query();

        if scheduled {
            self.scheduled.fetch_add(1, Ordering::SeqCst);
            self.view.commit(generation, |p| p.refreshing = true);
        }

        tokio::join!(
            self.load_weather(generation, &query),
            self.load_summary(generation, &query)
        );

        if scheduled && self.scheduled.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.view.commit_mounted(|p| p.refreshing = false);
        }
    }

    async fn load_weather(&self, generation: u64, query: &str) {
        match self.backend.current_conditions(query).await {
            Ok(data) => {
                let aqi = aqi_for(&data.current.air_quality);
                self.view.commit(generation, |p| {
                    p.conditions = Some(data);
                    p.aqi = aqi;
                    p.error = None;
                    p.loading_weather = false;
                });
            }
            Err(e) => {
                tracing::debug!(%query, "current conditions failed: {e}");
                let applied = self.view.commit(generation, |p| {
                    p.error = Some(e.to_string());
                    p.loading_weather = false;
                });
                if applied {
                    self.notifier.error("Error fetching current weather data");
                }
            }
        }
    }

    async fn load_summary(&self, generation: u64, query: &str) {
        match self.backend.summary_text(query).await {
            Ok(text) => {
                self.view.commit(generation, |p| {
                    p.summary = Some(text);
                    p.loading_summary = false;
                });
            }
            Err(e) => {
                tracing::debug!(%query, "summary failed: {e}");
                let applied = self.view.commit(generation, |p| p.loading_summary = false);
                if applied {
                    self.notifier.error(format!("Error fetching current weather summary: {e}"));
                }
            }
        }
    }
}

/// Mount the conditions view for whatever location is current.
///
/// Must be called from within a tokio runtime.
pub fn start(
    backend: Arc<dyn WeatherBackend>,
    location: LocationState,
    notifier: Notifier,
    interval: Duration,
) -> ViewHandle<ConditionsPanel> {
    let mut changes = location.subscribe();
    let first = changes.borrow_and_update().clone();

    let (view, state) = ViewContext::new(location, ConditionsPanel::default());
    let token = view.token.clone();
    let cycle = Cycle {
        backend,
        notifier,
        view,
        scheduled: Arc::new(AtomicUsize::new(0)),
    };

    let period = interval.max(MIN_REFRESH_INTERVAL);
    let task = tokio::spawn(run(cycle, changes, first, period));
    ViewHandle::new(token, state, task)
}

async fn run(
    cycle: Cycle,
    mut changes: watch::Receiver<Snapshot>,
    first: Snapshot,
    period: Duration,
) {
    tokio::spawn(cycle.clone().run(first, false));

    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // A rename pending alongside a due tick replaces that tick.
        tokio::select! {
            biased;

            _ = cycle.view.token.cancelled() => break,
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = changes.borrow_and_update().clone();
                ticker.reset();
                tokio::spawn(cycle.clone().run(snapshot, false));
            }
            _ = ticker.tick() => {
                if changes.has_changed().unwrap_or(false) {
                    continue;
                }
                let snapshot = changes.borrow().clone();
                tokio::spawn(cycle.clone().run(snapshot, true));
            }
        }
    }

    tracing::debug!("conditions view unmounted");
}
