//! Display units and measurement formatting.
//!
//! Values are stored in metric (°C, m/s) and only converted when rendered.
//! Conversions truncate toward zero: 20.9°C renders as "20°C".

use serde::{Deserialize, Serialize};

use crate::model::CurrentWeather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Name used when persisting the preference.
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "CELSIUS",
            TemperatureUnit::Fahrenheit => "FAHRENHEIT",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "Celsius",
            TemperatureUnit::Fahrenheit => "Fahrenheit",
        }
    }

    pub const fn all() -> &'static [TemperatureUnit] {
        &[TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit]
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "celsius" | "c" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" | "f" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown temperature unit '{value}'. Supported units: celsius, fahrenheit."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WindSpeedUnit {
    #[default]
    MetersPerSecond,
    KilometersPerHour,
    MilesPerHour,
}

impl WindSpeedUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindSpeedUnit::MetersPerSecond => "METERS_PER_SECOND",
            WindSpeedUnit::KilometersPerHour => "KILOMETERS_PER_HOUR",
            WindSpeedUnit::MilesPerHour => "MILES_PER_HOUR",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            WindSpeedUnit::MetersPerSecond => "m/s",
            WindSpeedUnit::KilometersPerHour => "km/h",
            WindSpeedUnit::MilesPerHour => "mph",
        }
    }

    /// Multiplier from m/s.
    fn factor(&self) -> f64 {
        match self {
            WindSpeedUnit::MetersPerSecond => 1.0,
            WindSpeedUnit::KilometersPerHour => 3.6,
            WindSpeedUnit::MilesPerHour => 2.237,
        }
    }

    pub const fn all() -> &'static [WindSpeedUnit] {
        &[
            WindSpeedUnit::MetersPerSecond,
            WindSpeedUnit::KilometersPerHour,
            WindSpeedUnit::MilesPerHour,
        ]
    }
}

impl std::fmt::Display for WindSpeedUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl TryFrom<&str> for WindSpeedUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "meters_per_second" | "m/s" | "mps" => Ok(WindSpeedUnit::MetersPerSecond),
            "kilometers_per_hour" | "km/h" | "kmh" => Ok(WindSpeedUnit::KilometersPerHour),
            "miles_per_hour" | "mph" => Ok(WindSpeedUnit::MilesPerHour),
            _ => Err(anyhow::anyhow!(
                "Unknown wind speed unit '{value}'. Supported units: mps, kmh, mph."
            )),
        }
    }
}

fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

fn to_unit(celsius: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
    }
}

pub fn format_temperature(value: f64, unit: TemperatureUnit) -> String {
    match unit {
        TemperatureUnit::Celsius => format!("{}°C", truncate(value)),
        TemperatureUnit::Fahrenheit => format!("{}°F", truncate(to_unit(value, unit))),
    }
}

/// Compact form without the scale letter, e.g. "20°".
pub fn format_temperature_short(value: f64, unit: TemperatureUnit) -> String {
    format!("{}°", truncate(to_unit(value, unit)))
}

pub fn format_wind_speed(value: f64, unit: WindSpeedUnit) -> String {
    format!("{} {}", truncate(value * unit.factor()), unit.symbol())
}

/// Units the user picked for rendering. Never affects stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayPreferences {
    pub temperature_unit: TemperatureUnit,
    pub wind_speed_unit: WindSpeedUnit,
}

impl DisplayPreferences {
    pub fn temperature(&self, value: f64) -> String {
        format_temperature(value, self.temperature_unit)
    }

    pub fn wind_speed(&self, value: f64) -> String {
        format_wind_speed(value, self.wind_speed_unit)
    }

    pub fn current_temperature(&self, weather: &CurrentWeather) -> String {
        self.temperature(weather.temperature)
    }

    pub fn current_feels_like(&self, weather: &CurrentWeather) -> String {
        self.temperature(weather.feels_like)
    }

    pub fn current_wind_speed(&self, weather: &CurrentWeather) -> String {
        self.wind_speed(weather.wind_speed)
    }
}
