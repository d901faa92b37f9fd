use anyhow::{Context, anyhow, bail};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use inquire::Text;
use std::path::PathBuf;
use tokio::io::BufReader;

use lookup_core::{
    Applied, CityCatalog, Config, IconTable, LanguagePair, TranslatorSession, WeatherProvider,
    WeatherSession,
    provider::{translation_provider_from_config, weather_provider_from_config},
    session::PendingWeather,
    render::WeatherOutcome,
    search::MAX_SUGGESTIONS,
    suggest,
};

use crate::{autocomplete::CityCompleter, watch};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "lookup", version, about = "City weather and text translation")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// City list (CSV), overrides `cities_path`.
    #[arg(long, global = true)]
    pub cities: Option<PathBuf>,

    /// Icon table (JSON), overrides `icons_path`.
    #[arg(long, global = true)]
    pub icons: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set data paths and default languages.
    Configure,

    /// List cities matching a query.
    Suggest {
        query: String,
    },

    /// Show current weather for a city.
    Weather {
        /// Search text; prompts with live suggestions when absent.
        query: Option<String>,

        /// Which suggestion to use (1-based).
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..=MAX_SUGGESTIONS as u64))]
        pick: u64,
    },

    /// Translate text.
    Translate {
        /// Text to translate. Required unless `--watch`.
        text: Option<String>,

        /// Source language code.
        #[arg(long)]
        from: Option<String>,

        /// Target language code.
        #[arg(long)]
        to: Option<String>,

        /// Read edits from stdin, one per line, and re-translate as they settle.
        #[arg(long, conflicts_with = "text")]
        watch: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.global.load_config()?;

        match self.command {
            Command::Configure => configure(config, self.global.config),
            Command::Suggest { query } => {
                let catalog = self.global.load_catalog(&config)?;
                let matches = suggest(catalog.cities(), &query);
                if matches.is_empty() {
                    println!("No cities match '{query}'.");
                }
                for (i, city) in matches.iter().enumerate() {
                    println!("{}. {}", i + 1, city.name);
                }
                Ok(())
            }
            Command::Weather { query, pick } => {
                let catalog = self.global.load_catalog(&config)?;
                let icons = self.global.load_icons(&config);
                let session = WeatherSession::new(catalog, icons, weather_provider_from_config(&config));
                show_weather(session, query, pick as usize - 1).await
            }
            Command::Translate { text, from, to, watch } => {
                let pair = LanguagePair::new(
                    from.unwrap_or_else(|| config.translation.source_lang.clone()),
                    to.unwrap_or_else(|| config.translation.target_lang.clone()),
                );
                let session = TranslatorSession::new(pair, translation_provider_from_config(&config));

                if watch {
                    let input = BufReader::new(tokio::io::stdin());
                    return watch::run(session, config.debounce(), input, std::io::stdout()).await;
                }

                let text = text.ok_or_else(|| anyhow!("Nothing to translate. Pass TEXT or use --watch."))?;
                translate_once(session, &text).await
            }
        }
    }
}

impl GlobalArgs {
    fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    fn load_catalog(&self, config: &Config) -> anyhow::Result<CityCatalog> {
        let path = self.cities.as_ref().unwrap_or(&config.cities_path);
        let loaded = CityCatalog::load(path, config.malformed_rows)
            .with_context(|| "Hint: set `cities_path` via `lookup configure` or pass --cities.")?;

        if !loaded.skipped.is_empty() {
            tracing::warn!("{} malformed rows skipped in {}", loaded.skipped.len(), path.display());
        }
        Ok(loaded.catalog)
    }

    /// A missing or broken icon table only costs the icon.
    fn load_icons(&self, config: &Config) -> IconTable {
        let path = self.icons.as_ref().unwrap_or(&config.icons_path);
        IconTable::load(path).unwrap_or_else(|err| {
            tracing::warn!("{err}; weather will be shown without icons");
            IconTable::default()
        })
    }
}

async fn show_weather<P>(
    mut session: WeatherSession<P>,
    query: Option<String>,
    index: usize,
) -> anyhow::Result<()>
where
    P: WeatherProvider,
{
    let pending = match query {
        Some(query) => {
            let found = session.input(&query).len();
            if found == 0 {
                bail!("No city matches '{query}'.");
            }
            session.select(index).ok_or_else(|| {
                anyhow!("Only {found} cities match '{query}'; --pick {} is out of range.", index + 1)
            })?
        }
        None => {
            let help = session.catalog().first().map(|city| format!("Leave empty for {}", city.name));
            let mut prompt = Text::new("City:")
                .with_autocomplete(CityCompleter::new(session.catalog().clone()))
                .with_page_size(MAX_SUGGESTIONS);
            if let Some(help) = help.as_deref() {
                prompt = prompt.with_help_message(help);
            }
            let answer = prompt.prompt()?;
            select_answer(&mut session, &answer)?
        }
    };

    let (ticket, result) = session.fetch(pending).await;
    match session.apply_now(ticket, result) {
        Applied::Updated => {}
        Applied::Failed => bail!("Could not fetch weather for {}.", session.search().input()),
        Applied::Stale => return Ok(()),
    }

    let Some(view) = session.view() else {
        return Ok(());
    };

    println!("{} (as of {})", session.search().input(), Local::now().format("%H:%M"));
    println!("  Temperature:    {}", view.temperature);
    println!("  Chance of rain: {}", view.rain_chance);
    match (&view.icon, &view.outcome) {
        (Some(icon), _) => println!("  Icon:           {icon}"),
        (None, WeatherOutcome::Partial { missing_icon_code }) => {
            println!("  Icon:           (none for weather code {missing_icon_code})")
        }
        (None, WeatherOutcome::Complete) => {}
    }

    Ok(())
}

/// Turns the city prompt's answer into a selection. An empty answer takes
/// the first city of the list.
fn select_answer<P: WeatherProvider>(
    session: &mut WeatherSession<P>,
    answer: &str,
) -> anyhow::Result<PendingWeather> {
    let answer = answer.trim();
    if answer.is_empty() {
        return session.select_default().ok_or_else(|| anyhow!("The city list is empty."));
    }

    if let Some(city) = session.catalog().find_by_name(answer).cloned() {
        return Ok(session.select_city(&city));
    }
    session.input(answer);
    session.select(0).ok_or_else(|| anyhow!("No city matches '{answer}'."))
}

async fn translate_once<P>(mut session: TranslatorSession<P>, text: &str) -> anyhow::Result<()>
where
    P: lookup_core::TranslationProvider,
{
    let request = session.set_text(text);
    tracing::debug!(counter = %session.counter(), "source text");

    let job = session.begin(request);
    let (ticket, result) = session.translate(job).await;
    session.apply(ticket, result);

    println!("{}", session.output());
    Ok(())
}

fn configure(mut config: Config, path: Option<PathBuf>) -> anyhow::Result<()> {
    let cities = Text::new("City list (CSV):")
        .with_default(&config.cities_path.display().to_string())
        .prompt()?;
    let icons = Text::new("Icon table (JSON):")
        .with_default(&config.icons_path.display().to_string())
        .prompt()?;
    let source = Text::new("Default source language:")
        .with_default(&config.translation.source_lang)
        .prompt()?;
    let target = Text::new("Default target language:")
        .with_default(&config.translation.target_lang)
        .prompt()?;

    config.cities_path = PathBuf::from(cities.trim());
    config.icons_path = PathBuf::from(icons.trim());
    config.translation.source_lang = source.trim().to_string();
    config.translation.target_lang = target.trim().to_string();

    let saved = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };

    println!("Saved configuration to {}", saved.display());
    Ok(())
}
