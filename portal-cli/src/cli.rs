use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};
use portal_core::{
    Config, SearchHit, SearchIndex, WeatherService,
    provider::client_from_config,
    refresh::run_periodic,
    render::{render_detail, render_widget},
    search::{render_no_term, render_results},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "portal", version, about = "Municipal portal weather and search")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the API key, city and search index.
    Configure,

    /// Show the one-line weather widget.
    Widget {
        /// Keep running and refresh on the configured interval until Ctrl-C.
        #[arg(long)]
        watch: bool,
    },

    /// Show current conditions and the 5-day forecast.
    Forecast,

    /// Search the portal's page index.
    Search {
        /// Search term; matched against page titles and content.
        term: Option<String>,

        /// Path to the JSON search index; overrides the config file.
        #[arg(long)]
        index: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => crate::configure::run()?,
            Command::Widget { watch } => widget(&Config::load()?, watch).await?,
            Command::Forecast => forecast(&Config::load()?).await?,
            Command::Search { term, index } => search(&Config::load()?, term, index)?,
        }

        Ok(())
    }
}

async fn widget(config: &Config, watch: bool) -> anyhow::Result<()> {
    let service = WeatherService::new(client_from_config(config)?, config.weather.location_query());
    let city_name = config.weather.city_name.as_str();
    let units = config.weather.units;

    if !watch {
        let view = service.widget(Local::now()).await;
        println!("{}", render_widget(city_name, &view, units));
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let period = config.weather.refresh_period();
    info!(city = %config.weather.city, ?period, "watching weather widget");

    let service = &service;
    let refreshes = run_periodic(period, cancel, move || async move {
        let view = service.widget(Local::now()).await;
        println!("{}", render_widget(city_name, &view, units));
    })
    .await;

    debug!(refreshes, "widget watch ended");
    Ok(())
}

async fn forecast(config: &Config) -> anyhow::Result<()> {
    let service = WeatherService::new(client_from_config(config)?, config.weather.location_query());

    let now = Local::now();
    let view = service.detail(now).await;
    print!("{}", render_detail(&config.weather.city_name, &view, config.weather.units, &now));

    Ok(())
}

fn search(config: &Config, term: Option<String>, index: Option<PathBuf>) -> anyhow::Result<()> {
    let term = term.unwrap_or_default();
    if term.trim().is_empty() {
        print!("{}", render_no_term());
        return Ok(());
    }

    let path = match index {
        Some(path) => path,
        None => config.search_index_path()?.to_path_buf(),
    };
    let index = SearchIndex::load(&path)?;

    let hits: Vec<SearchHit> = index
        .search(&term)
        .unwrap_or_default()
        .into_iter()
        .map(SearchHit::from_entry)
        .collect();
    print!("{}", render_results(&term, &hits));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_watch_flag() {
        let cli = Cli::try_parse_from(["portal", "widget", "--watch"]).unwrap();
        assert!(matches!(cli.command, Command::Widget { watch: true }));
    }

    #[test]
    fn search_term_is_optional() {
        let cli = Cli::try_parse_from(["portal", "search", "--index", "idx.json"]).unwrap();
        match cli.command {
            Command::Search { term, index } => {
                assert!(term.is_none());
                assert_eq!(index, Some(PathBuf::from("idx.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn search_reads_the_given_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search_index.json");
        std::fs::write(&path, r#"[{"title":"Clima","url":"pages/clima.html","content":"Tempo"}]"#)
            .unwrap();

        search(&Config::default(), Some("clima".into()), Some(path)).unwrap();
    }

    #[test]
    fn search_without_term_skips_the_index() {
        search(&Config::default(), None, None).unwrap();
        search(&Config::default(), Some("   ".into()), Some(PathBuf::from("missing.json"))).unwrap();
    }

    #[test]
    fn search_without_index_reports_hint() {
        let err = search(&Config::default(), Some("clima".into()), None).unwrap_err();
        assert!(err.to_string().contains("No search index configured"));
    }

    #[tokio::test]
    async fn widget_without_api_key_fails_with_hint() {
        let err = widget(&Config::default(), false).await.unwrap_err();
        assert!(err.to_string().contains("portal configure"));
    }
}
