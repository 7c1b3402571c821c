//! Plain-text rendering of dashboard state.

use std::fmt::Write;

use reporter_core::{
    AqiCategory, CurrentConditions, ForecastDay, Notification, PlaceSuggestion,
    forecast::ForecastPanel, refresh::ConditionsPanel,
};

pub fn temperature(temp: f64) -> String {
    format!("{temp} °C")
}

pub fn humidity(humidity: impl std::fmt::Display) -> String {
    format!("{humidity} %")
}

pub fn wind_speed(speed: f64) -> String {
    format!("{speed} km/h")
}

pub fn uv_index(uv: f64) -> String {
    format!("UV Index: {uv}")
}

pub fn aqi(aqi: i32) -> String {
    match AqiCategory::from_index(aqi) {
        Some(category) => format!("AQI {aqi} ({})", category.label()),
        None => "AQI unavailable".to_string(),
    }
}

pub fn conditions(data: &CurrentConditions, aqi_value: i32) -> String {
    let loc = &data.location;
    let cur = &data.current;
    let mut out = String::new();

    let _ = writeln!(out, "{}, {}, {}", loc.name, loc.region, loc.country);
    if !loc.localtime.is_empty() {
        let _ = writeln!(out, "  Local time: {}", loc.localtime);
    }
    let _ = writeln!(out, "  {}  {}", temperature(cur.temp_c), cur.condition.text);
    let _ = writeln!(out, "  Feels like: {}", temperature(cur.feelslike_c));
    let _ = writeln!(out, "  Wind:       {} {}", wind_speed(cur.wind_kph), cur.wind_dir);
    let _ = writeln!(out, "  Humidity:   {}", humidity(cur.humidity));
    let _ = writeln!(out, "  Visibility: {} km", cur.vis_km);
    let _ = writeln!(out, "  Pressure:   {} mb", cur.pressure_mb);
    let _ = writeln!(out, "  Dew point:  {}", temperature(cur.dewpoint_c));
    let _ = writeln!(out, "  {}", uv_index(cur.uv));
    let _ = write!(out, "  {}", aqi(aqi_value));

    out
}

pub fn conditions_panel(panel: &ConditionsPanel) -> String {
    if let Some(error) = &panel.error {
        return format!(
            "Error fetching current weather data. Please check your internet connection or try again later.\n  ({error})"
        );
    }

    let Some(data) = &panel.conditions else {
        return "Loading current conditions...".to_string();
    };

    let mut out = conditions(data, panel.aqi);
    if panel.refreshing {
        out.push_str("\n  (refreshing)");
    }
    match (&panel.summary, panel.loading_summary) {
        (Some(summary), _) => {
            let _ = write!(out, "\n\n{summary}");
        }
        (None, true) => out.push_str("\n\nLoading summary..."),
        (None, false) => {}
    }
    out
}

pub fn forecast_day(day: &ForecastDay) -> String {
    let mut line = format!(
        "{}  {} / {}  {}",
        day.date.format("%a %b %-d"),
        temperature(day.day.maxtemp_c),
        temperature(day.day.mintemp_c),
        day.day.condition.text,
    );
    if let Some(rain) = day.day.daily_chance_of_rain {
        let _ = write!(line, "  rain {}", humidity(rain));
    }
    let _ = write!(line, "  sunrise {} sunset {}", day.astro.sunrise, day.astro.sunset);
    line
}

pub fn forecast_days(days: &[ForecastDay]) -> String {
    days.iter().map(forecast_day).collect::<Vec<_>>().join("\n")
}

pub fn forecast_panel(panel: &ForecastPanel) -> String {
    if panel.error.is_some() {
        return "Failed to fetch forecast weather data. Please check your internet connection or try again later."
            .to_string();
    }
    if panel.loading {
        return "Loading forecast...".to_string();
    }
    forecast_days(&panel.days)
}

pub fn hourly(day: &ForecastDay) -> String {
    day.hour
        .iter()
        .map(|h| {
            format!(
                "  {}  {}  {}  feels {}",
                h.time,
                temperature(h.temp_c.round()),
                h.condition.text,
                temperature(h.feelslike_c.round()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn suggestions(list: &[PlaceSuggestion]) -> String {
    list.iter()
        .map(|s| format!("{:<32} -> {}", s.label, s.value))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn notification(note: &Notification) -> String {
    format!("[{}] {}", note.severity, note.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_formatting() {
        assert_eq!(temperature(28.5), "28.5 °C");
        assert_eq!(humidity(70), "70 %");
        assert_eq!(wind_speed(14.4), "14.4 km/h");
        assert_eq!(uv_index(9.0), "UV Index: 9");
    }

    #[test]
    fn aqi_hides_sentinel() {
        assert_eq!(aqi(42), "AQI 42 (Good)");
        assert_eq!(aqi(reporter_core::AQI_UNKNOWN), "AQI unavailable");
    }

    #[test]
    fn error_panel_replaces_normal_view() {
        let panel = ConditionsPanel {
            error: Some("boom".into()),
            ..ConditionsPanel::default()
        };
        let text = conditions_panel(&panel);
        assert!(text.starts_with("Error fetching current weather data."));
        assert!(text.contains("boom"));
    }

    #[test]
    fn suggestions_are_listed_one_per_line() {
        let list = vec![
            PlaceSuggestion {
                label: "Paris, fr".into(),
                value: "Paris, France".into(),
            },
            PlaceSuggestion {
                label: "Paris, us".into(),
                value: "Paris, United States".into(),
            },
        ];
        let text = suggestions(&list);
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().next().unwrap().ends_with("-> Paris, France"));
    }

    #[test]
    fn loading_panel() {
        assert_eq!(conditions_panel(&ConditionsPanel::default()), "Loading current conditions...");
        assert_eq!(forecast_panel(&ForecastPanel::default()), "Loading forecast...");
    }
}
