//! Core library for the municipal portal `portal` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - The weather data client boundary and its OpenWeather implementation
//! - Forecast aggregation (per-day summaries, rest-of-today range)
//! - Text rendering for the widget and detail views
//! - Site search over the published JSON index
//!
//! It is used by `portal-cli`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod refresh;
pub mod render;
pub mod search;
pub mod service;

pub use config::{Config, SearchConfig, WeatherConfig};
pub use error::ClientError;
pub use model::{
    DaySummary, LocationQuery, Observation, TempRange, TodaySource, TodaySummary, Units,
    WeatherSample,
};
pub use provider::{WeatherDataClient, openweather::OpenWeatherClient};
pub use search::{SearchEntry, SearchHit, SearchIndex};
pub use service::{DetailView, WeatherService, WidgetView};
