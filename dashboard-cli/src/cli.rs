use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use dashboard_core::{
    Config, ConfigStore, LocationBoard, LocationQuery, OpenWeatherClient, SettingsService,
    WeatherRepository, provider::source_from_config,
};
use inquire::{Password, PasswordDisplayMode, Text};
use tokio_util::sync::CancellationToken;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Which location to show. Defaults to the configured city.
#[derive(Debug, Args)]
pub struct Target {
    /// City name, e.g. "London".
    #[arg(conflicts_with_all = ["lat", "lon"])]
    pub city: Option<String>,

    /// Latitude in decimal degrees.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

impl Target {
    fn query(&self, config: &Config) -> LocationQuery {
        match (self.lat, self.lon, &self.city) {
            (Some(latitude), Some(longitude), _) => LocationQuery::coordinates(latitude, longitude),
            (_, _, Some(city)) => LocationQuery::city(city.clone()),
            _ => LocationQuery::city(config.default_city()),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key and default city.
    Configure,

    /// Show current conditions.
    Current(Target),

    /// Show the hourly and 5-day forecast.
    Forecast(Target),

    /// Refresh and list saved locations.
    Locations {
        /// Look up and add a city (repeatable).
        #[arg(long = "add", value_name = "CITY")]
        add: Vec<String>,
    },

    /// Show or change display settings.
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print current settings.
    Show,

    /// Change one setting, e.g. `temperature_unit fahrenheit`.
    Set { key: String, value: String },

    /// Restore every setting to its default.
    Reset,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Current(target) => {
                let (config, settings) = load()?;
                let repo = repository(&config)?;

                let weather = repo
                    .current_weather(&target.query(&config), &interruptible())
                    .await;
                match weather {
                    Ok(weather) => {
                        println!("{}", render::current(&weather, &settings.display_preferences()))
                    }
                    Err(category) => bail!("{category}"),
                }
                Ok(())
            }
            Command::Forecast(target) => {
                let (config, settings) = load()?;
                let repo = repository(&config)?;

                match repo.forecast(&target.query(&config), &interruptible()).await {
                    Ok(bundle) => {
                        println!("{}", render::forecast(&bundle, &settings.display_preferences()))
                    }
                    Err(category) => bail!("{category}"),
                }
                Ok(())
            }
            Command::Locations { add } => {
                let (config, settings) = load()?;
                let board = LocationBoard::with_defaults(repository(&config)?);
                let token = interruptible();

                board.refresh_all(&token).await;
                for city in &add {
                    board.add_location(city, &token).await;
                    if let Some(message) = board.snapshot().error_message {
                        eprintln!("{message}");
                        board.clear_error();
                    }
                }

                println!(
                    "{}",
                    render::locations(&board.snapshot(), &settings.display_preferences())
                );
                Ok(())
            }
            Command::Settings { action } => {
                let mut service = SettingsService::new(ConfigStore::open()?);

                match action.unwrap_or(SettingsAction::Show) {
                    SettingsAction::Show => {}
                    SettingsAction::Set { key, value } => service.set_by_name(&key, &value)?,
                    SettingsAction::Reset => service.reset_all()?,
                }

                println!("{}", render::settings(&service.settings()));
                Ok(())
            }
        }
    }
}

fn load() -> anyhow::Result<(Config, SettingsService<ConfigStore>)> {
    let store = ConfigStore::open()?;
    let config = store.config().clone();
    Ok((config, SettingsService::new(store)))
}

fn repository(config: &Config) -> anyhow::Result<WeatherRepository<OpenWeatherClient>> {
    let source = source_from_config(config)?;
    Ok(WeatherRepository::with_timeout(source, config.timeout()))
}

/// Token cancelled on Ctrl-C.
fn interruptible() -> CancellationToken {
    let token = CancellationToken::new();
    let guard = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            guard.cancel();
        }
    });
    token
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        if config.api_key.is_none() {
            bail!("An API key is required. Get one at https://openweathermap.org/api");
        }
    } else {
        config.set_api_key(api_key.to_string());
    }

    let city = Text::new("Default city:")
        .with_default(config.default_city())
        .prompt()
        .context("Failed to read default city")?;
    config.default_city = Some(city.trim().to_string());

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
