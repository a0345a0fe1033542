use crate::{
    Config, LocationQuery, Observation, WeatherSample, provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Read side of a weather provider.
///
/// Both calls fail soft: transport, status and decoding failures are logged by
/// the implementation and surface as `None`.
#[async_trait]
pub trait WeatherDataClient: Send + Sync + Debug {
    async fn current_observation(&self, query: &LocationQuery) -> Option<Observation>;

    async fn forecast(&self, query: &LocationQuery) -> Option<Vec<WeatherSample>>;
}

/// Construct the OpenWeather client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config
        .weather
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `portal configure` and enter your API key."
            )
        })?;

    let mut client = OpenWeatherClient::new(api_key.to_owned());
    if let Some(base_url) = &config.weather.base_url {
        client = client.with_base_url(base_url.clone());
    }

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = client_from_config(&cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No OpenWeather API key configured"));
        assert!(msg.contains("Hint: run `portal configure`"));
    }

    #[test]
    fn client_from_config_rejects_blank_api_key() {
        let mut cfg = Config::default();
        cfg.weather.api_key = Some("   ".to_string());

        let err = client_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("Hint: run `portal configure`"));
        assert!(!cfg.is_weather_configured());
    }

    #[test]
    fn client_from_config_works_when_key_is_set() {
        let mut cfg = Config::default();
        cfg.weather.api_key = Some("KEY".to_string());

        assert!(client_from_config(&cfg).is_ok());
    }

    #[test]
    fn client_from_config_honours_base_url_override() {
        let mut cfg = Config::default();
        cfg.weather.api_key = Some("KEY".to_string());
        cfg.weather.base_url = Some("http://localhost:9999/".to_string());

        let client = client_from_config(&cfg).expect("client");
        assert_eq!(client.base_url(), "http://localhost:9999");
    }
}
