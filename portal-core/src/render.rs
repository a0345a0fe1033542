//! Plain-text rendering of the weather widget and detail page.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

use crate::{
    model::{DaySummary, Observation, Units},
    service::{DetailView, WidgetView},
};

const UNAVAILABLE_ICON: &str = "⊘";

/// Rounded temperature with its unit, e.g. `23°C`.
pub fn format_temperature(temp: f64, units: Units) -> String {
    format!("{}{}", temp.round() as i64, units.temperature_suffix())
}

/// Glyph for a provider icon code. Unknown codes get a plain cloud.
pub fn condition_icon(code: &str) -> &'static str {
    match code {
        "01d" => "☀",
        "01n" => "☾",
        "02d" | "02n" => "⛅",
        "03d" | "03n" | "04d" | "04n" => "☁",
        "09d" | "09n" | "10d" | "10n" => "🌧",
        "11d" | "11n" => "⛈",
        "13d" | "13n" => "❄",
        "50d" | "50n" => "🌫",
        _ => "☁",
    }
}

/// One-sentence description of the sky for a provider icon code.
pub fn condition_summary(code: &str) -> &'static str {
    match code {
        "01d" => "Clear and sunny.",
        "01n" => "Clear night, no clouds.",
        "02d" => "Partly cloudy during the day.",
        "02n" => "Partly cloudy during the night.",
        "03d" => "Cloudy day with many clouds.",
        "03n" => "Cloudy night.",
        "04d" | "04n" => "Overcast sky.",
        "09d" => "Light rain during the day.",
        "09n" => "Light rain during the night.",
        "10d" => "Moderate to heavy rain during the day.",
        "10n" => "Moderate to heavy rain during the night.",
        "11d" | "11n" => "Thunderstorm with lightning.",
        "13d" => "Snowy weather.",
        "13n" => "Snowy night.",
        "50d" | "50n" => "Mist or fog.",
        _ => "Conditions not specified.",
    }
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Single-line navbar widget.
///
/// Without a current observation the "unavailable" panel is shown. Without a
/// today summary the observation's own min/max is used instead.
pub fn render_widget(city_name: &str, view: &WidgetView, units: Units) -> String {
    let Some(current) = &view.current else {
        return render_widget_unavailable(city_name, units);
    };

    let (min, max) = match &view.today {
        Some(today) => (today.min, today.max),
        None => (current.temp_min, current.temp_max),
    };

    format!(
        "{} {}  {}  {}  ↑{} • ↓{}",
        condition_icon(&current.condition_code),
        city_name,
        format_temperature(current.temperature, units),
        current.description,
        format_temperature(max, units),
        format_temperature(min, units),
    )
}

pub fn render_widget_unavailable(city_name: &str, units: Units) -> String {
    format!("{UNAVAILABLE_ICON} {city_name}  --{}  Unavailable", units.temperature_suffix())
}

/// Full detail page. `now` supplies the display time zone and the
/// "last update" stamp.
pub fn render_detail<Tz>(city_name: &str, view: &DetailView, units: Units, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(current) = &view.current else {
        return render_detail_error("Could not fetch current weather conditions.");
    };
    let Some(days) = &view.days else {
        return render_detail_error("Could not fetch the 5-day forecast.");
    };

    let tz = now.timezone();
    let mut out = String::new();

    let (min, max) = match &view.today {
        Some(today) => (format_temperature(today.min, units), format_temperature(today.max, units)),
        None => ("N/A".to_string(), "N/A".to_string()),
    };

    push_line(
        &mut out,
        format!(
            "{} {}, {}",
            condition_icon(&current.condition_code),
            capitalize(&current.description),
            format_temperature(current.temperature, units),
        ),
    );
    push_line(&mut out, condition_summary(&current.condition_code));
    push_line(&mut out, format!("Min: {min} / Max: {max}"));
    push_line(
        &mut out,
        format!("Observed at {}", current.observed_at.with_timezone(&tz).format("%H:%M")),
    );
    push_line(&mut out, "");

    push_details(&mut out, current, units, &tz);
    push_line(&mut out, "");

    push_line(&mut out, format!("Forecast for {city_name}"));
    if days.is_empty() {
        push_line(&mut out, "  No forecast days available.");
    }
    for day in days {
        push_day(&mut out, day, units);
    }

    push_line(&mut out, "");
    push_line(&mut out, format!("Last update: {}", now.format("%d/%m/%Y %H:%M:%S")));
    out
}

fn push_details<Tz>(out: &mut String, current: &Observation, units: Units, tz: &Tz)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let (wind, wind_unit) = units.display_wind(current.wind_speed);

    push_line(out, format!("  Feels like: {}", format_temperature(current.feels_like, units)));
    push_line(out, format!("  Wind:       {} {wind_unit}", wind.round() as i64));
    push_line(out, format!("  Humidity:   {}%", current.humidity));
    push_line(out, format!("  Pressure:   {} hPa", current.pressure));
    push_line(out, format!("  Sunrise:    {}", current.sunrise.with_timezone(tz).format("%H:%M")));
    push_line(out, format!("  Sunset:     {}", current.sunset.with_timezone(tz).format("%H:%M")));
}

fn push_day(out: &mut String, day: &DaySummary, units: Units) {
    push_line(out, "");
    push_line(out, format!("  {}", day.date.format("%A, %-d %b")));
    push_line(
        out,
        format!(
            "    {}  {} • {}",
            condition_icon(&day.representative.condition_code),
            format_temperature(day.max, units),
            format_temperature(day.min, units),
        ),
    );
    push_line(out, format!("    {}", capitalize(&day.representative.description)));
    push_line(out, format!("    {} samples", day.sample_count));
}

/// Append `line` and a newline.
pub(crate) fn push_line(out: &mut String, line: impl AsRef<str>) {
    out.push_str(line.as_ref());
    out.push('\n');
}

pub fn render_detail_error(details: &str) -> String {
    format!(
        "{UNAVAILABLE_ICON} Error loading weather data.\n\
         Details: {details}\n\
         Run the command again to reload.\n"
    )
}
