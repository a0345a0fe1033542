use chrono::{DateTime, TimeZone};
use tracing::{info, warn};

use crate::{
    aggregate::{forecast_days, summarize_today},
    model::{DaySummary, LocationQuery, Observation, TodaySummary},
    provider::WeatherDataClient,
};

/// Everything the navbar widget needs for one refresh cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    pub current: Option<Observation>,
    pub today: Option<TodaySummary>,
}

/// Everything the detail page needs.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub current: Option<Observation>,
    pub today: Option<TodaySummary>,
    /// `None` when the forecast could not be fetched, which is distinct from a
    /// forecast that produced no days.
    pub days: Option<Vec<DaySummary>>,
}

/// Ties a data client to the location it should be asked about.
#[derive(Debug, Clone)]
pub struct WeatherService<C> {
    client: C,
    query: LocationQuery,
}

impl<C: WeatherDataClient> WeatherService<C> {
    pub fn new(client: C, query: LocationQuery) -> Self {
        Self { client, query }
    }

    /// Fetch current conditions and the forecast concurrently.
    ///
    /// Each side degrades to `None` on its own; neither waits on the other's
    /// failure.
    pub async fn widget<Tz: TimeZone>(&self, now: DateTime<Tz>) -> WidgetView {
        let (current, forecast) = tokio::join!(
            self.client.current_observation(&self.query),
            self.client.forecast(&self.query),
        );

        let today = forecast.as_deref().and_then(|samples| summarize_today(samples, &now));
        if current.is_none() {
            warn!(city = %self.query.city, "widget has no current observation");
        }

        WidgetView { current, today }
    }

    pub async fn detail<Tz: TimeZone>(&self, now: DateTime<Tz>) -> DetailView {
        let (current, forecast) = tokio::join!(
            self.client.current_observation(&self.query),
            self.client.forecast(&self.query),
        );

        let (today, days) = match forecast.as_deref() {
            Some(samples) => (summarize_today(samples, &now), Some(forecast_days(samples, &now))),
            None => (None, None),
        };

        info!(
            city = %self.query.city,
            has_current = current.is_some(),
            days = days.as_ref().map_or(0, Vec::len),
            "weather detail assembled"
        );

        DetailView { current, today, days }
    }
}
