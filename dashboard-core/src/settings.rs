//! User settings on top of an injected key-value preference store.

use anyhow::Result;
use std::{collections::HashMap, path::PathBuf};

use crate::{
    config::Config,
    units::{DisplayPreferences, TemperatureUnit, WindSpeedUnit},
};

pub const TEMPERATURE_UNIT_KEY: &str = "temperature_unit";
pub const WIND_SPEED_UNIT_KEY: &str = "wind_speed_unit";
pub const DARK_MODE_KEY: &str = "dark_mode_enabled";
pub const NOTIFICATIONS_KEY: &str = "notifications_enabled";
pub const LOCATION_ACCESS_KEY: &str = "location_enabled";

/// Get/set by key. Writes are persisted before `set` returns.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

/// Ephemeral store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.values.clear();
        Ok(())
    }
}

/// Stores preferences in the `[preferences]` table of the config file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config: Config,
    path: PathBuf,
}

impl ConfigStore {
    pub fn open() -> Result<Self> {
        Self::open_at(Config::config_file_path()?)
    }

    pub fn open_at(path: PathBuf) -> Result<Self> {
        let config = Config::load_from(&path)?;
        Ok(Self { config, path })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl PreferenceStore for ConfigStore {
    fn get(&self, key: &str) -> Option<String> {
        self.config.preferences.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.config.preferences.insert(key.to_string(), value);
        self.config.save_to(&self.path)
    }

    fn clear(&mut self) -> Result<()> {
        self.config.preferences.clear();
        self.config.save_to(&self.path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub temperature_unit: TemperatureUnit,
    pub wind_speed_unit: WindSpeedUnit,
    pub dark_mode: bool,
    pub notifications: bool,
    pub location_access: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            temperature_unit: TemperatureUnit::Celsius,
            wind_speed_unit: WindSpeedUnit::MetersPerSecond,
            dark_mode: false,
            notifications: true,
            location_access: true,
        }
    }
}

impl Settings {
    /// Read every setting; missing or unparseable values use the default.
    pub fn read_from(store: &impl PreferenceStore) -> Self {
        let defaults = Settings::default();

        Self {
            temperature_unit: store
                .get(TEMPERATURE_UNIT_KEY)
                .and_then(|v| TemperatureUnit::try_from(v.as_str()).ok())
                .unwrap_or(defaults.temperature_unit),
            wind_speed_unit: store
                .get(WIND_SPEED_UNIT_KEY)
                .and_then(|v| WindSpeedUnit::try_from(v.as_str()).ok())
                .unwrap_or(defaults.wind_speed_unit),
            dark_mode: read_flag(store, DARK_MODE_KEY, defaults.dark_mode),
            notifications: read_flag(store, NOTIFICATIONS_KEY, defaults.notifications),
            location_access: read_flag(store, LOCATION_ACCESS_KEY, defaults.location_access),
        }
    }

    pub fn display_preferences(&self) -> DisplayPreferences {
        DisplayPreferences {
            temperature_unit: self.temperature_unit,
            wind_speed_unit: self.wind_speed_unit,
        }
    }
}

fn read_flag(store: &impl PreferenceStore, key: &str, default: bool) -> bool {
    store.get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Current settings plus write-through setters.
#[derive(Debug)]
pub struct SettingsService<S> {
    store: S,
    current: Settings,
}

impl<S: PreferenceStore> SettingsService<S> {
    pub fn new(store: S) -> Self {
        let current = Settings::read_from(&store);
        Self { store, current }
    }

    pub fn settings(&self) -> Settings {
        self.current
    }

    pub fn display_preferences(&self) -> DisplayPreferences {
        self.current.display_preferences()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn set_temperature_unit(&mut self, unit: TemperatureUnit) -> Result<()> {
        self.store.set(TEMPERATURE_UNIT_KEY, unit.as_str().to_string())?;
        self.current.temperature_unit = unit;
        Ok(())
    }

    pub fn set_wind_speed_unit(&mut self, unit: WindSpeedUnit) -> Result<()> {
        self.store.set(WIND_SPEED_UNIT_KEY, unit.as_str().to_string())?;
        self.current.wind_speed_unit = unit;
        Ok(())
    }

    pub fn set_dark_mode(&mut self, enabled: bool) -> Result<()> {
        self.store.set(DARK_MODE_KEY, enabled.to_string())?;
        self.current.dark_mode = enabled;
        Ok(())
    }

    pub fn set_notifications(&mut self, enabled: bool) -> Result<()> {
        self.store.set(NOTIFICATIONS_KEY, enabled.to_string())?;
        self.current.notifications = enabled;
        Ok(())
    }

    pub fn set_location_access(&mut self, enabled: bool) -> Result<()> {
        self.store.set(LOCATION_ACCESS_KEY, enabled.to_string())?;
        self.current.location_access = enabled;
        Ok(())
    }

    /// Apply a `key value` pair as typed on the command line.
    pub fn set_by_name(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            TEMPERATURE_UNIT_KEY => self.set_temperature_unit(TemperatureUnit::try_from(value)?),
            WIND_SPEED_UNIT_KEY => self.set_wind_speed_unit(WindSpeedUnit::try_from(value)?),
            DARK_MODE_KEY => self.set_dark_mode(parse_flag(value)?),
            NOTIFICATIONS_KEY => self.set_notifications(parse_flag(value)?),
            LOCATION_ACCESS_KEY => self.set_location_access(parse_flag(value)?),
            _ => Err(anyhow::anyhow!(
                "Unknown setting '{key}'. Supported settings: {TEMPERATURE_UNIT_KEY}, \
                 {WIND_SPEED_UNIT_KEY}, {DARK_MODE_KEY}, {NOTIFICATIONS_KEY}, {LOCATION_ACCESS_KEY}."
            )),
        }
    }

    pub fn reset_all(&mut self) -> Result<()> {
        self.store.clear()?;
        self.current = Settings::default();
        Ok(())
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(anyhow::anyhow!("Expected on/off, got '{value}'")),
    }
}
