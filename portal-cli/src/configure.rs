use std::path::PathBuf;

use inquire::{Password, PasswordDisplayMode, Select, Text};
use portal_core::{Config, Units};

/// Prompt for each setting, keeping current values as defaults, then save.
pub fn run() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key (leave empty to keep current):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    let city = Text::new("City query (name,state,country):")
        .with_default(&config.weather.city)
        .prompt()?;

    let city_name = Text::new("Display name:")
        .with_default(&config.weather.city_name)
        .prompt()?;

    let cursor = Units::all()
        .iter()
        .position(|u| *u == config.weather.units)
        .unwrap_or(0);
    let units = Select::new("Units:", Units::all().to_vec())
        .with_starting_cursor(cursor)
        .prompt()?;

    let language = Text::new("Description language:")
        .with_default(&config.weather.language)
        .prompt()?;

    let current_index = config
        .search
        .index_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let index_path = Text::new("Search index path (leave empty for none):")
        .with_default(&current_index)
        .prompt()?;

    apply(&mut config, api_key, city, city_name, units, language, index_path);

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    if !config.is_weather_configured() {
        println!("No OpenWeather API key set; weather commands will fail until one is entered.");
    }

    Ok(())
}

fn apply(
    config: &mut Config,
    api_key: String,
    city: String,
    city_name: String,
    units: Units,
    language: String,
    index_path: String,
) {
    let api_key = api_key.trim();
    if !api_key.is_empty() {
        config.weather.api_key = Some(api_key.to_string());
    }

    config.weather.city = city.trim().to_string();
    config.weather.city_name = city_name.trim().to_string();
    config.weather.units = units;
    config.weather.language = language.trim().to_string();

    let index_path = index_path.trim();
    config.search.index_path =
        if index_path.is_empty() { None } else { Some(PathBuf::from(index_path)) };
}
