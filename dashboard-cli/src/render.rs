//! Plain-text rendering of dashboard values.

use chrono::{DateTime, Local};
use dashboard_core::{
    BoardState, CurrentWeather, DisplayPreferences, ForecastBundle, Settings,
    units::format_temperature_short,
};

pub fn current(weather: &CurrentWeather, prefs: &DisplayPreferences) -> String {
    let mut lines = vec![
        weather.location_name.clone(),
        format!("  {}  {}", prefs.current_temperature(weather), capitalize(&weather.description)),
        format!("  Feels like  {}", prefs.current_feels_like(weather)),
        format!("  Humidity    {}%", weather.humidity),
        format!("  Wind        {}", prefs.current_wind_speed(weather)),
        format!("  Pressure    {} hPa", weather.pressure),
    ];
    if let Some(observed) = observed_at(weather.timestamp_ms) {
        lines.push(format!("  Updated     {observed}"));
    }

    lines.join("\n")
}

pub fn forecast(bundle: &ForecastBundle, prefs: &DisplayPreferences) -> String {
    let mut lines = vec![bundle.location_name.clone(), String::new(), "Next 24 hours".to_string()];

    lines.extend(bundle.hourly.iter().map(|hour| {
        format!(
            "  {:>5}  {:>6}  {:<12} {:>3}%  {}",
            hour.hour,
            prefs.temperature(hour.temperature),
            hour.condition,
            hour.precipitation_chance,
            prefs.wind_speed(hour.wind_speed),
        )
    }));

    lines.push(String::new());
    lines.push("5-day forecast".to_string());
    lines.extend(bundle.daily.iter().map(|day| {
        format!(
            "  {:<9}  {:>6} / {:<6}  {:<12} {:>3}%  {}",
            day.day_name,
            prefs.temperature(day.max_temp),
            prefs.temperature(day.min_temp),
            day.condition,
            day.precipitation_chance,
            prefs.wind_speed(day.wind_speed),
        )
    }));

    lines.join("\n")
}

pub fn locations(state: &BoardState, prefs: &DisplayPreferences) -> String {
    let lines: Vec<String> = state
        .entries
        .iter()
        .map(|entry| {
            let mut marks = String::new();
            if entry.location.is_default {
                marks.push('*');
            }
            if entry.location.is_favorite {
                marks.push('♥');
            }

            let status = match (&entry.weather, entry.has_error, entry.is_loading) {
                (Some(weather), _, _) => format!(
                    "{:>4}  {}",
                    format_temperature_short(weather.temperature, prefs.temperature_unit),
                    capitalize(&weather.description)
                ),
                (None, true, _) => "unavailable".to_string(),
                (None, false, true) => "loading...".to_string(),
                (None, false, false) => "-".to_string(),
            };

            format!("{:>2} {:<2} {:<16} {}", entry.location.id, marks, entry.location.name, status)
        })
        .collect();

    lines.join("\n")
}

pub fn settings(settings: &Settings) -> String {
    let on_off = |flag: bool| if flag { "on" } else { "off" };

    [
        format!("temperature_unit       {}", settings.temperature_unit.display_name()),
        format!("wind_speed_unit        {}", settings.wind_speed_unit.symbol()),
        format!("dark_mode_enabled      {}", on_off(settings.dark_mode)),
        format!("notifications_enabled  {}", on_off(settings.notifications)),
        format!("location_enabled       {}", on_off(settings.location_access)),
    ]
    .join("\n")
}

fn observed_at(timestamp_ms: i64) -> Option<String> {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.with_timezone(&Local).format("%a %H:%M").to_string())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
