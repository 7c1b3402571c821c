//! US EPA Air Quality Index from PM2.5 concentration.
//!
//! Only PM2.5 contributes; the other pollutants in [`AirQuality`] are carried
//! for display but never folded into the index.

use crate::model::AirQuality;

/// Returned for concentrations outside every breakpoint band (negative, above 500.4, NaN).
pub const AQI_UNKNOWN: i32 = -1;

struct Band {
    pm_low: f64,
    pm_high: f64,
    aqi_low: i32,
    aqi_high: i32,
}

impl Band {
    fn interpolate(&self, pm25: f64) -> i32 {
        let slope = f64::from(self.aqi_high - self.aqi_low) / (self.pm_high - self.pm_low);
        (slope * (pm25 - self.pm_low) + f64::from(self.aqi_low)).round() as i32
    }
}

const BANDS: [Band; 7] = [
    Band {
        pm_low: 0.0,
        pm_high: 12.0,
        aqi_low: 0,
        aqi_high: 50,
    },
    Band {
        pm_low: 12.1,
        pm_high: 35.4,
        aqi_low: 51,
        aqi_high: 100,
    },
    Band {
        pm_low: 35.5,
        pm_high: 55.4,
        aqi_low: 101,
        aqi_high: 150,
    },
    Band {
        pm_low: 55.5,
        pm_high: 150.4,
        aqi_low: 151,
        aqi_high: 200,
    },
    Band {
        pm_low: 150.5,
        pm_high: 250.4,
        aqi_low: 201,
        aqi_high: 300,
    },
    Band {
        pm_low: 250.5,
        pm_high: 350.4,
        aqi_low: 301,
        aqi_high: 400,
    },
    Band {
        pm_low: 350.5,
        pm_high: 500.4,
        aqi_low: 401,
        aqi_high: 500,
    },
];

/// Convert a PM2.5 concentration (µg/m³) to an AQI, or [`AQI_UNKNOWN`].
///
/// Concentrations falling in the 0.1-wide seams between published bands
/// (e.g. 12.05) take the ceiling of the lower band, as they would after the
/// EPA's one-decimal truncation.
pub fn compute_aqi(pm25: f64) -> i32 {
    let mut previous: Option<&Band> = None;

    for band in &BANDS {
        if pm25 < band.pm_low {
            return previous.map_or(AQI_UNKNOWN, |p| p.aqi_high);
        }
        if pm25 <= band.pm_high {
            return band.interpolate(pm25);
        }
        previous = Some(band);
    }

    AQI_UNKNOWN
}

/// AQI for a conditions record; a missing PM2.5 reading counts as zero.
pub fn aqi_for(air: &AirQuality) -> i32 {
    compute_aqi(air.pm2_5.unwrap_or(0.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    /// `None` for the sentinel or anything else off the scale.
    pub fn from_index(aqi: i32) -> Option<Self> {
        match aqi {
            0..=50 => Some(Self::Good),
            51..=100 => Some(Self::Moderate),
            101..=150 => Some(Self::UnhealthyForSensitiveGroups),
            151..=200 => Some(Self::Unhealthy),
            201..=300 => Some(Self::VeryUnhealthy),
            301..=500 => Some(Self::Hazardous),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }
}
