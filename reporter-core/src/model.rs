use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A resolved place. Replaced wholesale whenever a search or geolocation resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub tz_id: String,
    #[serde(default)]
    pub localtime_epoch: i64,
    #[serde(default)]
    pub localtime: String,
}

impl Location {
    /// Fallback used before geolocation resolves or when it is unavailable.
    pub fn fallback() -> Self {
        let now = Utc::now();
        Self {
            name: "Colombo".to_string(),
            region: "Western".to_string(),
            country: "Sri Lanka".to_string(),
            lat: 6.9319,
            lon: 79.8478,
            tz_id: "Asia/Colombo".to_string(),
            localtime_epoch: now.timestamp(),
            localtime: now.to_rfc3339(),
        }
    }

    /// The `"name, country"` string the backend expects in its `city` parameter.
    pub fn query(&self) -> String {
        if self.name.is_empty() {
            let fallback = Self::fallback();
            format!("{}, {}", fallback.name, fallback.country)
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::fallback()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub code: i32,
}

/// Pollutant concentrations; the backend omits any it has no reading for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirQuality {
    pub co: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
    pub so2: Option<f64>,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    #[serde(rename = "us-epa-index", alias = "us_epa_index")]
    pub us_epa_index: Option<i32>,
    #[serde(rename = "gb-defra-index", alias = "gb_defra_index")]
    pub gb_defra_index: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Current {
    #[serde(default)]
    pub last_updated_epoch: i64,
    #[serde(default)]
    pub last_updated: String,
    pub temp_c: f64,
    #[serde(default)]
    pub temp_f: f64,
    #[serde(default)]
    pub is_day: u8,
    pub condition: Condition,
    #[serde(default)]
    pub wind_mph: f64,
    pub wind_kph: f64,
    #[serde(default)]
    pub wind_degree: i32,
    #[serde(default)]
    pub wind_dir: String,
    pub pressure_mb: f64,
    #[serde(default)]
    pub pressure_in: f64,
    #[serde(default)]
    pub precip_mm: f64,
    pub humidity: u8,
    #[serde(default)]
    pub cloud: u8,
    #[serde(default)]
    pub feelslike_c: f64,
    #[serde(default)]
    pub dewpoint_c: f64,
    pub vis_km: f64,
    #[serde(default)]
    pub uv: f64,
    #[serde(default)]
    pub gust_kph: f64,
    #[serde(default)]
    pub air_quality: AirQuality,
}

/// Response of `currentWeather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location: Location,
    pub current: Current,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    pub avgtemp_c: f64,
    #[serde(default)]
    pub maxwind_kph: f64,
    #[serde(default)]
    pub totalprecip_mm: f64,
    #[serde(default)]
    pub avgvis_km: f64,
    #[serde(default)]
    pub avghumidity: f64,
    pub daily_chance_of_rain: Option<u8>,
    pub daily_chance_of_snow: Option<u8>,
    pub condition: Condition,
    #[serde(default)]
    pub uv: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Astro {
    pub sunrise: String,
    pub sunset: String,
    #[serde(default)]
    pub moonrise: String,
    #[serde(default)]
    pub moonset: String,
    #[serde(default)]
    pub moon_phase: String,
    #[serde(default)]
    pub moon_illumination: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyConditions {
    pub time_epoch: i64,
    pub time: String,
    pub temp_c: f64,
    #[serde(default)]
    pub is_day: u8,
    pub condition: Condition,
    #[serde(default)]
    pub wind_kph: f64,
    #[serde(default)]
    pub wind_dir: String,
    #[serde(default)]
    pub precip_mm: f64,
    #[serde(default)]
    pub humidity: u8,
    #[serde(default)]
    pub cloud: u8,
    #[serde(default)]
    pub feelslike_c: f64,
    pub chance_of_rain: Option<u8>,
    pub chance_of_snow: Option<u8>,
    #[serde(default)]
    pub vis_km: f64,
    #[serde(default)]
    pub uv: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub date_epoch: i64,
    pub day: Day,
    pub astro: Astro,
    #[serde(default)]
    pub hour: Vec<HourlyConditions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub forecastday: Vec<ForecastDay>,
}

/// Response of `forecast`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub location: Location,
    pub current: Option<Current>,
    pub forecast: Forecast,
}

/// Response of `futureWeather`: the forecast for a single target date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureWeather {
    pub location: Location,
    pub forecast: Forecast,
}

impl FutureWeather {
    pub fn day(&self) -> Option<&ForecastDay> {
        self.forecast.forecastday.first()
    }
}

/// Address components returned by reverse geocoding and autocomplete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub name: Option<String>,
    pub road: Option<String>,
    pub hamlet: Option<String>,
    pub suburb: Option<String>,
    pub village: Option<String>,
    pub city: Option<String>,
    pub state_district: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoCode {
    #[serde(default)]
    pub place_id: String,
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub address: Address,
}

/// An autocomplete candidate: `label` is shown, `value` is what a search submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceSuggestion {
    pub label: String,
    pub value: String,
}

impl PlaceSuggestion {
    pub fn from_geocode(geo: &GeoCode) -> Self {
        let name = geo.address.name.as_deref().unwrap_or_default();
        let code = geo.address.country_code.as_deref().unwrap_or_default();
        let country = geo.address.country.as_deref().unwrap_or_default();

        Self {
            label: format!("{name}, {code}"),
            value: format!("{name}, {country}"),
        }
    }
}
