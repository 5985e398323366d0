use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, Select, Text};
use nowcast_core::{
    App, Config, ConfiguredLocator, DisplayState, PromptLine, SourceKind, TextRenderer, Trigger,
    source::{default_source_from_config, source_from_config},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "nowcast", version, about = "Current weather and the next 24 hours")]
pub struct Cli {
    /// Log at info level (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show weather once and exit.
    Show {
        /// City or "lat,lon"; defaults to the configured location.
        location: Option<String>,

        /// Use the configured geolocation instead of a search.
        #[arg(long, conflicts_with = "location")]
        geo: bool,

        /// Override the configured source ("live" or "mock").
        #[arg(long)]
        source: Option<String>,
    },

    /// Interactive session: search, `:geo`, `:refresh`, `:quit`.
    Watch {
        /// Override the configured source ("live" or "mock").
        #[arg(long)]
        source: Option<String>,
    },

    /// Interactively edit the config file.
    Configure,

    /// Print where the config file lives.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Show { location, geo, source } => {
                let config = Config::load()?;
                let mut app = build_app(&config, source.as_deref(), false)?;

                let trigger = if geo {
                    Trigger::Geolocate
                } else {
                    Trigger::Submit(location.unwrap_or_else(|| config.default_location.clone()))
                };
                let dispatched = app.handle(trigger).await;
                show_outcome(dispatched, app.state())?;
            }
            Command::Watch { source } => {
                let config = Config::load()?;
                let mut app = build_app(&config, source.as_deref(), true)?;
                app.start(&config.default_location).await;
                watch_loop(&mut app).await?;
            }
            Command::Configure => configure()?,
            Command::ConfigPath => println!("{}", Config::config_file_path()?.display()),
        }

        Ok(())
    }
}

/// Maps the end of a one-shot `show` onto the process result.
fn show_outcome(dispatched: bool, state: &DisplayState) -> Result<()> {
    if !dispatched {
        bail!("Nothing to show: the location is empty");
    }
    match state {
        DisplayState::Error { message } => bail!("{message}"),
        _ => Ok(()),
    }
}

type StdoutApp = App<TextRenderer<std::io::Stdout>>;

fn build_app(config: &Config, source: Option<&str>, clear: bool) -> Result<StdoutApp> {
    let source = match source {
        Some(s) => source_from_config(SourceKind::try_from(s)?, config)?,
        None => default_source_from_config(config)?,
    };

    Ok(App::new(
        source,
        Box::new(ConfiguredLocator::from_config(&config.geolocation)),
        TextRenderer::stdout(clear),
        config.request_timeout(),
    ))
}

const HELP: &str = "Type a city to search. Enter alone or :refresh reloads, :geo uses your \
                    configured location, :quit exits.";

async fn watch_loop(app: &mut StdoutApp) -> Result<()> {
    loop {
        let line = match Text::new("Location:").with_help_message(HELP).prompt() {
            Ok(line) => line,
            Err(
                inquire::InquireError::OperationCanceled
                | inquire::InquireError::OperationInterrupted,
            ) => {
                tracing::info!("prompt closed, leaving watch");
                break;
            }
            Err(err) => return Err(err).context("Failed to read from prompt"),
        };

        match PromptLine::parse(&line) {
            PromptLine::Quit => {
                tracing::info!("quit requested");
                break;
            }
            PromptLine::Help => {
                tracing::debug!("showing help");
                println!("{HELP}");
            }
            PromptLine::Trigger(trigger) => {
                if !app.handle(trigger).await {
                    tracing::info!(line = %line.trim(), "nothing to fetch for this input");
                }
            }
        }
    }

    Ok(())
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let kinds: Vec<SourceKind> = SourceKind::all().to_vec();
    let current = config.source_kind().unwrap_or(SourceKind::Mock);
    let start = kinds.iter().position(|k| *k == current).unwrap_or(0);
    let kind = Select::new("Weather source:", kinds).with_starting_cursor(start).prompt()?;
    config.set_source(kind);

    if kind == SourceKind::LiveHttp {
        let key = Text::new("Visual Crossing API key:")
            .with_initial_value(config.api_key().unwrap_or_default())
            .prompt()?;
        config.set_api_key(key.trim().to_string());
    }

    let location =
        Text::new("Default location:").with_initial_value(&config.default_location).prompt()?;
    if !location.trim().is_empty() {
        config.default_location = location.trim().to_string();
    }

    let enable_geo = Confirm::new("Allow :geo to use a fixed position?")
        .with_default(config.geolocation.enabled)
        .prompt()?;
    config.geolocation.enabled = enable_geo;

    if enable_geo {
        let latitude = prompt_coordinate("Latitude:", config.geolocation.latitude)?;
        let longitude = prompt_coordinate("Longitude:", config.geolocation.longitude)?;
        config.geolocation.latitude = latitude;
        config.geolocation.longitude = longitude;
    }

    config.save()?;
    println!("Saved {}", Config::config_file_path()?.display());
    Ok(())
}

/// Blank input clears the value.
fn prompt_coordinate(label: &str, current: Option<f64>) -> Result<Option<f64>> {
    let initial = current.map(|v| v.to_string()).unwrap_or_default();
    let text = Text::new(label).with_initial_value(&initial).prompt()?;
    let text = text.trim();

    if text.is_empty() {
        return Ok(None);
    }
    let value =
        text.parse::<f64>().with_context(|| format!("'{text}' is not a valid coordinate"))?;
    Ok(Some(value))
}
