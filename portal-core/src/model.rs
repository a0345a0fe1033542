use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Measurement system sent to the provider as the `units` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial, Units::Standard]
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }

    /// Converts a provider wind speed into the value shown to users,
    /// paired with its unit label.
    pub fn display_wind(&self, speed: f64) -> (f64, &'static str) {
        match self {
            // m/s from the provider, shown as km/h
            Units::Metric | Units::Standard => (speed * 3.6, "km/h"),
            Units::Imperial => (speed, "mph"),
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            "standard" => Ok(Units::Standard),
            _ => Err(anyhow::anyhow!(
                "Unknown units '{value}'. Supported units: metric, imperial, standard."
            )),
        }
    }
}

/// What to ask the provider for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    /// Provider query string, e.g. `Resende,RJ,BR`.
    pub city: String,
    pub units: Units,
    pub language: String,
}

/// One timestamped forecast data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    /// Provider icon code, e.g. `01d`.
    pub condition_code: String,
    pub description: String,
}

/// Current conditions for the configured city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub location_name: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub pressure: u32,
    pub wind_speed: f64,
    pub condition_code: String,
    pub description: String,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub observed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempRange {
    pub min: f64,
    pub max: f64,
}

impl TempRange {
    /// Linear min/max scan. `None` for an empty input.
    pub fn from_temperatures<I>(temps: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        temps.into_iter().fold(None, |acc, t| match acc {
            None => Some(TempRange { min: t, max: t }),
            Some(r) => Some(TempRange { min: r.min.min(t), max: r.max.max(t) }),
        })
    }

    pub fn of_samples<'a, I>(samples: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a WeatherSample>,
    {
        Self::from_temperatures(samples.into_iter().map(|s| s.temperature))
    }
}

/// Aggregated view of one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub min: f64,
    pub max: f64,
    pub representative: WeatherSample,
    pub sample_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodaySource {
    /// Samples still ahead of "now" on the current date.
    RestOfToday,
    /// Nothing left today, so the whole next day was used.
    Tomorrow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TodaySummary {
    pub min: f64,
    pub max: f64,
    pub samples: Vec<WeatherSample>,
    pub source: TodaySource,
}
