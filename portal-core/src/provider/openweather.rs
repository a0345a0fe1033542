use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    error::{ClientError, truncate_body},
    model::{LocationQuery, Observation, WeatherSample},
};

use super::WeatherDataClient;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const CURRENT_ENDPOINT: &str = "OpenWeather current weather";
const FORECAST_ENDPOINT: &str = "OpenWeather 5-day forecast";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the client at another host, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &LocationQuery,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", query.city.as_str()),
                ("units", query.units.as_str()),
                ("lang", query.language.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|source| ClientError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| ClientError::Transport { endpoint, source })?;

        if !status.is_success() {
            return Err(ClientError::Status {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| ClientError::Decode { endpoint, source })
    }

    pub async fn fetch_current(&self, query: &LocationQuery) -> Result<Observation, ClientError> {
        let parsed: OwCurrentResponse = self
            .fetch_json(CURRENT_ENDPOINT, "/data/2.5/weather", query)
            .await?;

        let (condition_code, description) = first_condition(&parsed.weather);

        Ok(Observation {
            location_name: parsed.name,
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            temp_min: parsed.main.temp_min,
            temp_max: parsed.main.temp_max,
            humidity: parsed.main.humidity,
            pressure: parsed.main.pressure,
            wind_speed: parsed.wind.speed,
            condition_code,
            description,
            sunrise: required_timestamp("sys.sunrise", parsed.sys.sunrise)?,
            sunset: required_timestamp("sys.sunset", parsed.sys.sunset)?,
            observed_at: required_timestamp("dt", parsed.dt)?,
        })
    }

    pub async fn fetch_forecast(
        &self,
        query: &LocationQuery,
    ) -> Result<Vec<WeatherSample>, ClientError> {
        let parsed: OwForecastResponse = self
            .fetch_json(FORECAST_ENDPOINT, "/data/2.5/forecast", query)
            .await?;

        let samples = parsed
            .list
            .into_iter()
            .filter_map(|entry| {
                let Some(timestamp) = unix_to_utc(entry.dt) else {
                    debug!(dt = entry.dt, "skipping forecast entry with invalid timestamp");
                    return None;
                };
                let (condition_code, description) = first_condition(&entry.weather);
                Some(WeatherSample {
                    timestamp,
                    temperature: entry.main.temp,
                    condition_code,
                    description,
                })
            })
            .collect();

        Ok(samples)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    #[serde(default)]
    pressure: u32,
    #[serde(default)]
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    icon: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize, Default)]
struct OwWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[async_trait]
impl WeatherDataClient for OpenWeatherClient {
    async fn current_observation(&self, query: &LocationQuery) -> Option<Observation> {
        match self.fetch_current(query).await {
            Ok(observation) => Some(observation),
            Err(err) => {
                warn!(city = %query.city, error = %err, "current weather unavailable");
                None
            }
        }
    }

    async fn forecast(&self, query: &LocationQuery) -> Option<Vec<WeatherSample>> {
        match self.fetch_forecast(query).await {
            Ok(samples) => {
                debug!(city = %query.city, count = samples.len(), "forecast fetched");
                Some(samples)
            }
            Err(err) => {
                warn!(city = %query.city, error = %err, "forecast unavailable");
                None
            }
        }
    }
}

fn first_condition(weather: &[OwWeather]) -> (String, String) {
    weather
        .first()
        .map(|w| (w.icon.clone(), w.description.clone()))
        .unwrap_or_else(|| (String::new(), "unknown".to_string()))
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn required_timestamp(field: &'static str, value: i64) -> Result<DateTime<Utc>, ClientError> {
    unix_to_utc(value).ok_or(ClientError::InvalidTimestamp {
        endpoint: CURRENT_ENDPOINT,
        field,
        value,
    })
}
