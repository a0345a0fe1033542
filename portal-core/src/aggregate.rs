//! Forecast aggregation: turns the flat list of 3-hour samples returned by the
//! provider into per-day summaries and the "rest of today" range shown by the
//! widget.
//!
//! Every function here is pure and total. The calendar date of a sample is
//! taken in the time zone of the `now` (or `tz`) argument, so callers decide
//! what "local" means.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::{DateTime, Days, NaiveDate, TimeZone, Timelike, Utc};

use crate::model::{DaySummary, TempRange, TodaySource, TodaySummary, WeatherSample};

/// Maximum number of days shown in the forecast grid.
pub const MAX_FORECAST_DAYS: usize = 5;

/// Local hours considered "midday" when picking a representative sample.
const MIDDAY_HOURS: RangeInclusive<u32> = 11..=14;

fn local_date<Tz: TimeZone>(sample: &WeatherSample, tz: &Tz) -> NaiveDate {
    sample.timestamp.with_timezone(tz).date_naive()
}

/// Partition samples by local calendar date.
///
/// Samples keep their input order inside each group.
pub fn group_by_day<Tz: TimeZone>(
    samples: &[WeatherSample],
    tz: &Tz,
) -> BTreeMap<NaiveDate, Vec<WeatherSample>> {
    let mut groups: BTreeMap<NaiveDate, Vec<WeatherSample>> = BTreeMap::new();
    for sample in samples {
        groups.entry(local_date(sample, tz)).or_default().push(sample.clone());
    }
    groups
}

/// Pick the dates to show, oldest first, at most [`MAX_FORECAST_DAYS`].
///
/// Today is only kept while it still has a sample strictly after `now`.
pub fn select_forecast_days<Tz: TimeZone>(
    groups: &BTreeMap<NaiveDate, Vec<WeatherSample>>,
    now: &DateTime<Tz>,
) -> Vec<NaiveDate> {
    let today = now.date_naive();
    let now_utc = now.with_timezone(&Utc);

    let mut days: Vec<NaiveDate> = groups
        .iter()
        .filter(|(date, samples)| {
            **date != today || samples.iter().any(|s| s.timestamp > now_utc)
        })
        .map(|(date, _)| *date)
        .collect();

    days.sort_unstable();
    days.truncate(MAX_FORECAST_DAYS);
    days
}

/// Summarize one day's samples. `None` when `samples` is empty.
///
/// The representative sample is the earliest one whose local hour falls in
/// 11..=14, or the earliest sample of the day when none does.
pub fn summarize_day<Tz: TimeZone>(
    date: NaiveDate,
    samples: &[WeatherSample],
    tz: &Tz,
) -> Option<DaySummary> {
    let range = TempRange::of_samples(samples)?;

    let mut ordered: Vec<&WeatherSample> = samples.iter().collect();
    ordered.sort_by_key(|s| s.timestamp);

    let representative = ordered
        .iter()
        .find(|s| MIDDAY_HOURS.contains(&s.timestamp.with_timezone(tz).hour()))
        .or_else(|| ordered.first())
        .copied()
        .cloned()?;

    Some(DaySummary {
        date,
        min: range.min,
        max: range.max,
        representative,
        sample_count: samples.len(),
    })
}

/// Min/max over what is left of today, falling back to all of tomorrow.
///
/// Returns `None` when neither has samples; callers then fall back to the
/// coarser range reported with the current observation.
pub fn summarize_today<Tz: TimeZone>(
    samples: &[WeatherSample],
    now: &DateTime<Tz>,
) -> Option<TodaySummary> {
    let tz = now.timezone();
    let today = now.date_naive();
    let now_utc = now.with_timezone(&Utc);

    let rest_of_today: Vec<WeatherSample> = samples
        .iter()
        .filter(|s| s.timestamp > now_utc && local_date(s, &tz) == today)
        .cloned()
        .collect();

    if let Some(range) = TempRange::of_samples(&rest_of_today) {
        return Some(TodaySummary {
            min: range.min,
            max: range.max,
            samples: rest_of_today,
            source: TodaySource::RestOfToday,
        });
    }

    let tomorrow = today.checked_add_days(Days::new(1))?;
    let tomorrow_samples: Vec<WeatherSample> = samples
        .iter()
        .filter(|s| local_date(s, &tz) == tomorrow)
        .cloned()
        .collect();

    let range = TempRange::of_samples(&tomorrow_samples)?;
    Some(TodaySummary {
        min: range.min,
        max: range.max,
        samples: tomorrow_samples,
        source: TodaySource::Tomorrow,
    })
}

/// Full pipeline used by the detail view: group, select, summarize.
pub fn forecast_days<Tz: TimeZone>(
    samples: &[WeatherSample],
    now: &DateTime<Tz>,
) -> Vec<DaySummary> {
    let tz = now.timezone();
    let groups = group_by_day(samples, &tz);

    select_forecast_days(&groups, now)
        .into_iter()
        .filter_map(|date| {
            groups.get(&date).and_then(|day| summarize_day(date, day, &tz))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn brt() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<FixedOffset> {
        brt().with_ymd_and_hms(2025, 3, day, hour, minute, 0).unwrap()
    }

    fn sample(day: u32, hour: u32, temp: f64) -> WeatherSample {
        WeatherSample {
            timestamp: at(day, hour, 0).with_timezone(&Utc),
            temperature: temp,
            condition_code: format!("{hour:02}d"),
            description: format!("sample {day}/{hour}"),
        }
    }

    /// Samples every 3 hours from `first_day` 00:00 through `last_day` 21:00.
    fn every_three_hours(first_day: u32, last_day: u32) -> Vec<WeatherSample> {
        (first_day..=last_day)
            .flat_map(|day| (0..24).step_by(3).map(move |hour| (day, hour)))
            .map(|(day, hour)| sample(day, hour, f64::from(day * 10 + hour / 3)))
            .collect()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    #[test]
    fn group_by_day_partitions_every_sample() {
        let samples = vec![
            sample(12, 9, 20.0),
            sample(10, 3, 18.0),
            sample(11, 15, 25.0),
            sample(10, 21, 19.0),
            sample(12, 0, 17.0),
        ];

        let groups = group_by_day(&samples, &brt());

        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, samples.len());
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[&date(10)].len(), 2);
    }

    #[test]
    fn group_by_day_keeps_input_order_within_a_day() {
        let samples = vec![sample(10, 21, 1.0), sample(10, 3, 2.0), sample(10, 12, 3.0)];

        let groups = group_by_day(&samples, &brt());
        let temps: Vec<f64> = groups[&date(10)].iter().map(|s| s.temperature).collect();

        assert_eq!(temps, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn group_by_day_uses_the_local_calendar_date() {
        // 01:00 UTC on the 11th is still the 10th at UTC-3.
        let late = WeatherSample {
            timestamp: Utc.with_ymd_and_hms(2025, 3, 11, 1, 0, 0).unwrap(),
            ..sample(10, 0, 0.0)
        };

        let local = group_by_day(std::slice::from_ref(&late), &brt());
        let utc = group_by_day(std::slice::from_ref(&late), &Utc);

        assert!(local.contains_key(&date(10)));
        assert!(utc.contains_key(&date(11)));
    }

    #[test]
    fn select_forecast_days_is_ascending_and_capped() {
        let groups = group_by_day(&every_three_hours(10, 16), &brt());

        let days = select_forecast_days(&groups, &at(10, 8, 0));

        assert_eq!(days.len(), MAX_FORECAST_DAYS);
        assert!(days.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(days[0], date(10));
    }

    #[test]
    fn select_forecast_days_drops_today_without_future_samples() {
        let groups = group_by_day(&every_three_hours(10, 12), &brt());

        let days = select_forecast_days(&groups, &at(10, 23, 59));

        assert_eq!(days, vec![date(11), date(12)]);
    }

    #[test]
    fn select_forecast_days_orders_across_month_boundary() {
        let samples = vec![
            WeatherSample {
                timestamp: brt().with_ymd_and_hms(2025, 4, 1, 12, 0, 0).unwrap().with_timezone(&Utc),
                ..sample(31, 12, 1.0)
            },
            sample(31, 12, 2.0),
        ];
        let groups = group_by_day(&samples, &brt());

        let days = select_forecast_days(&groups, &at(30, 12, 0));

        assert_eq!(days, vec![date(31), NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()]);
    }

    #[test]
    fn summarize_day_takes_min_and_max() {
        let samples = vec![sample(10, 6, 10.0), sample(10, 9, 22.0), sample(10, 18, 15.0)];

        let summary = summarize_day(date(10), &samples, &brt()).unwrap();

        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.max, 22.0);
        assert_eq!(summary.sample_count, 3);
    }

    #[test]
    fn summarize_day_prefers_earliest_midday_sample() {
        // Out of order: 14h arrives before 12h.
        let samples = vec![sample(10, 18, 1.0), sample(10, 14, 2.0), sample(10, 12, 3.0)];

        let summary = summarize_day(date(10), &samples, &brt()).unwrap();

        assert_eq!(summary.representative.temperature, 3.0);
    }

    #[test]
    fn summarize_day_falls_back_to_earliest_sample() {
        let samples = vec![sample(10, 21, 1.0), sample(10, 3, 2.0), sample(10, 18, 3.0)];

        let summary = summarize_day(date(10), &samples, &brt()).unwrap();

        assert_eq!(summary.representative.temperature, 2.0);
    }

    #[test]
    fn summarize_today_uses_remaining_samples() {
        let samples = every_three_hours(10, 11);

        let today = summarize_today(&samples, &at(10, 16, 30)).unwrap();

        assert_eq!(today.source, TodaySource::RestOfToday);
        // 18h and 21h remain: 100 + 6, 100 + 7
        assert_eq!(today.samples.len(), 2);
        assert_eq!(today.min, 106.0);
        assert_eq!(today.max, 107.0);
    }

    #[test]
    fn summarize_today_excludes_sample_exactly_at_now() {
        let samples = vec![sample(10, 21, 30.0)];

        let today = summarize_today(&samples, &at(10, 21, 0));

        assert!(today.is_none());
    }

    #[test]
    fn summarize_today_falls_back_to_tomorrow_at_end_of_day() {
        let samples = vec![
            sample(10, 21, 40.0),
            sample(11, 6, 14.0),
            sample(11, 12, 27.0),
            sample(12, 12, 50.0),
        ];

        let today = summarize_today(&samples, &at(10, 23, 59)).unwrap();

        assert_eq!(today.source, TodaySource::Tomorrow);
        assert_eq!(today.min, 14.0);
        assert_eq!(today.max, 27.0);
        assert_eq!(today.samples.len(), 2);
    }

    #[test]
    fn summarize_today_none_when_tomorrow_is_missing() {
        let samples = vec![sample(10, 9, 20.0), sample(12, 9, 20.0)];

        assert!(summarize_today(&samples, &at(10, 23, 59)).is_none());
    }

    #[test]
    fn empty_input_yields_nothing() {
        let now = at(10, 12, 0);

        assert!(group_by_day(&[], &brt()).is_empty());
        assert!(select_forecast_days(&BTreeMap::new(), &now).is_empty());
        assert!(summarize_day(date(10), &[], &brt()).is_none());
        assert!(summarize_today(&[], &now).is_none());
        assert!(forecast_days(&[], &now).is_empty());
    }

    #[test]
    fn six_days_of_forecast_yield_five_summaries_oldest_first() {
        let samples = every_three_hours(10, 15);

        let days = forecast_days(&samples, &at(10, 10, 0));

        let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(10), date(11), date(12), date(13), date(14)]);
        assert!(days.iter().all(|d| d.date >= date(10)));
    }

    #[test]
    fn forecast_skips_today_once_it_is_over() {
        let samples = every_three_hours(10, 15);

        let days = forecast_days(&samples, &at(10, 23, 59));

        let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(11), date(12), date(13), date(14), date(15)]);
        assert!(days.iter().all(|d| d.sample_count == 8));
    }
}
