//! Core library for the `weather-dashboard` CLI.
//!
//! This crate defines:
//! - Aggregation of raw forecast samples into daily and hourly summaries
//! - Unit formatting for temperatures and wind speeds
//! - Classification of fetch failures into user-facing messages
//! - The OpenWeather data source, saved locations and user settings
//!
//! It is used by `dashboard-cli`, but can also be reused by other front ends.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod locations;
pub mod model;
pub mod provider;
pub mod repository;
pub mod settings;
pub mod units;

pub use aggregate::{to_current_weather, to_forecast_bundle, to_forecast_bundle_at};
pub use config::Config;
pub use error::{ErrorCategory, FetchError, NetworkCause, classify, user_message};
pub use locations::{BoardState, Location, LocationBoard, LocationEntry};
pub use model::{
    CurrentWeather, DailyForecast, ForecastBundle, HourlyForecast, LocationQuery, RawSample,
    WeatherInfo,
};
pub use provider::{WeatherSource, openweather::OpenWeatherClient};
pub use repository::WeatherRepository;
pub use settings::{ConfigStore, MemoryStore, PreferenceStore, Settings, SettingsService};
pub use units::{
    DisplayPreferences, TemperatureUnit, WindSpeedUnit, format_temperature, format_wind_speed,
};
