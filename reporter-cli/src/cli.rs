use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{CustomType, Password, Select, Text};
use reporter_core::{
    Config, Dashboard, Notifier, aqi::aqi_for, config::DEFAULT_LOCATIONIQ_URL,
    provider::DEFAULT_FORECAST_DAYS,
};
use tokio::sync::broadcast::error::RecvError;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "reporter", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigTarget {
    /// Weather aggregation backend URL.
    Backend,
    /// LocationIQ credentials for place suggestions.
    Locationiq,
    /// Conditions refresh interval.
    Refresh,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively configure one part of the settings.
    Configure { target: ConfigTarget },

    /// Show current conditions and summary for a place.
    Show {
        /// Place name, e.g. "Kandy, Sri Lanka". Defaults to the configured location.
        place: Option<String>,

        /// Show the forecast for this future date instead (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show the daily forecast for a place.
    Forecast {
        place: Option<String>,

        #[arg(long, default_value_t = DEFAULT_FORECAST_DAYS)]
        days: u8,

        /// Include hourly rows under each day.
        #[arg(long)]
        hours: bool,
    },

    /// List place suggestions for partial input.
    Suggest {
        query: String,

        /// Pick one suggestion and show its conditions.
        #[arg(long)]
        pick: bool,
    },

    /// Resolve coordinates into a place.
    Locate {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },

    /// Keep conditions and forecast on screen, refreshing until Ctrl-C.
    Watch {
        place: Option<String>,

        /// Start from device coordinates instead of a place name.
        #[arg(long, requires = "lon", conflicts_with = "place", allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Refresh interval in seconds; overrides the configured value.
        #[arg(long)]
        interval: Option<u64>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { target } => configure(target),
            Command::Show { place, date } => show(place, date).await,
            Command::Forecast { place, days, hours } => forecast(place, days, hours).await,
            Command::Suggest { query, pick } => suggest(&query, pick).await,
            Command::Locate { lat, lon } => locate(lat, lon).await,
            Command::Watch {
                place,
                lat,
                lon,
                interval,
            } => watch(place, lat.zip(lon), interval).await,
        }
    }
}

fn dashboard() -> anyhow::Result<Dashboard> {
    let config = Config::load()?.with_env();
    Dashboard::from_config(&config)
}

/// Print whatever notification is still on display, then clear it.
fn flush_notice(notifier: &Notifier) {
    if let Some(note) = notifier.current() {
        eprintln!("{}", render::notification(&note));
        notifier.dismiss();
    }
}

fn configure(target: ConfigTarget) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    match target {
        ConfigTarget::Backend => {
            let current = config.backend_url.clone().unwrap_or_default();
            let url = Text::new("Backend URL:")
                .with_default(&current)
                .with_help_message("Base URL of the weather aggregation service")
                .prompt()?;
            config.set_backend_url(url.trim().to_string());
        }
        ConfigTarget::Locationiq => {
            let current = config
                .locationiq
                .as_ref()
                .map_or(DEFAULT_LOCATIONIQ_URL.to_string(), |c| c.api_url.clone());
            let url = Text::new("LocationIQ API URL:").with_default(&current).prompt()?;
            let key = Password::new("LocationIQ API key:").without_confirmation().prompt()?;
            config.set_locationiq(Some(url.trim().to_string()), key.trim().to_string());
        }
        ConfigTarget::Refresh => {
            let secs = CustomType::<u64>::new("Refresh interval (seconds):")
                .with_default(config.refresh_interval().as_secs())
                .with_error_message("Please enter a whole number of seconds")
                .prompt()?;
            config.refresh_interval_secs = Some(secs);
        }
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(place: Option<String>, date: Option<NaiveDate>) -> anyhow::Result<()> {
    let dash = dashboard()?;

    let conditions = match &place {
        Some(place) => dash.search().submit(place).await?,
        None => {
            let query = dash.location().get().query();
            dash.backend().current_conditions(&query).await?
        }
    };

    if let Some(date) = date {
        let future = dash.future(date).await?;
        let day = future
            .day()
            .with_context(|| format!("No forecast returned for {date}"))?;
        println!("{}, {}", future.location.name, future.location.country);
        println!("{}", render::forecast_day(day));
        println!("{}", render::hourly(day));
        return Ok(());
    }

    println!("{}", render::conditions(&conditions, aqi_for(&conditions.current.air_quality)));

    let query = dash.location().get().query();
    match dash.backend().summary_text(&query).await {
        Ok(summary) => println!("\n{summary}"),
        Err(e) => eprintln!("Error fetching current weather summary: {e}"),
    }

    Ok(())
}

async fn forecast(place: Option<String>, days: u8, hours: bool) -> anyhow::Result<()> {
    let dash = dashboard()?;

    if let Some(place) = &place {
        dash.search().submit(place).await?;
    }

    let location = dash.location().get();
    let days = dash.backend().forecast(&location.query(), days).await?;

    println!("{}, {}", location.name, location.country);
    for day in &days {
        println!("{}", render::forecast_day(day));
        if hours {
            println!("{}", render::hourly(day));
        }
    }
    Ok(())
}

async fn suggest(query: &str, pick: bool) -> anyhow::Result<()> {
    let dash = dashboard()?;
    let mut autocomplete = dash.autocomplete()?;

    autocomplete.on_input(query).await?;
    flush_notice(dash.notifier());

    let list = autocomplete.suggestions();
    if list.is_empty() {
        return Ok(());
    }
    if !pick {
        println!("{}", render::suggestions(list));
        return Ok(());
    }

    let labels: Vec<String> = list.iter().map(|s| s.label.clone()).collect();
    let chosen = Select::new("Place:", labels.clone()).prompt()?;
    let value = labels
        .iter()
        .position(|l| *l == chosen)
        .and_then(|i| list.get(i))
        .map(|s| s.value.clone())
        .context("Selected place is no longer in the suggestion list")?;
    autocomplete.clear();

    let conditions = dash.search().submit(&value).await?;
    println!("{}", render::conditions(&conditions, aqi_for(&conditions.current.air_quality)));
    Ok(())
}

async fn locate(lat: f64, lon: f64) -> anyhow::Result<()> {
    let dash = dashboard()?;

    match dash.locate(lat, lon).await {
        Some(location) => println!("{}", location.query()),
        None => {
            flush_notice(dash.notifier());
            println!("{}", dash.location().get().query());
        }
    }
    Ok(())
}

async fn watch(
    place: Option<String>,
    coords: Option<(f64, f64)>,
    interval: Option<u64>,
) -> anyhow::Result<()> {
    let mut dash = dashboard()?;
    if let Some(secs) = interval.filter(|s| *s > 0) {
        dash = dash.with_refresh_interval(Duration::from_secs(secs));
    }

    let mut notes = dash.notifier().subscribe();
    let conditions = dash.mount_conditions();
    let forecast = dash.mount_forecast();
    let mut conditions_rx = conditions.subscribe();
    let mut forecast_rx = forecast.subscribe();

    if let Some(place) = place {
        // Failures are reported through the notification stream.
        let _ = dash.search().submit(&place).await;
    } else if let Some((lat, lon)) = coords {
        dash.locate(lat, lon).await;
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            changed = conditions_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let panel = conditions_rx.borrow_and_update().clone();
                if !panel.loading_weather {
                    println!("\n{}", render::conditions_panel(&panel));
                }
            }
            changed = forecast_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let panel = forecast_rx.borrow_and_update().clone();
                if !panel.loading {
                    println!("\n{}", render::forecast_panel(&panel));
                }
            }
            note = notes.recv() => match note {
                Ok(note) => eprintln!("{}", render::notification(&note)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("dropped {skipped} notifications");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    conditions.shutdown().await;
    forecast.shutdown().await;
    Ok(())
}
