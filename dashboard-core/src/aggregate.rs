//! Turns raw source samples into the dashboard's domain model.
//!
//! The forecast endpoint returns 3-hour samples over five days, so grouping
//! by calendar date yields at most five buckets and the first eight samples
//! cover the next 24 hours.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike, Weekday};

use crate::model::{CurrentWeather, DailyForecast, ForecastBundle, HourlyForecast, RawSample};

pub const MAX_DAILY: usize = 5;
pub const MAX_HOURLY: usize = 8;

const UNKNOWN_CONDITION: &str = "Unknown";
const FALLBACK_ICON: &str = "01d";

/// Map a single sample into a current-conditions snapshot.
pub fn to_current_weather(sample: &RawSample, location_name: &str) -> CurrentWeather {
    let primary = sample.primary();

    CurrentWeather {
        location_name: location_name.to_string(),
        temperature: sample.temperature,
        description: primary.map(|w| w.description.clone()).unwrap_or_default(),
        humidity: sample.humidity,
        wind_speed: sample.wind_speed,
        pressure: sample.pressure,
        feels_like: sample.feels_like,
        icon_code: primary.map(|w| w.icon.clone()).unwrap_or_default(),
        timestamp_ms: sample.timestamp * 1000,
    }
}

/// Build the forecast bundle relative to the device-local clock.
pub fn to_forecast_bundle(samples: &[RawSample], location_name: &str) -> ForecastBundle {
    to_forecast_bundle_at(samples, location_name, &Local::now())
}

/// Build the forecast bundle with "today" taken from `now`; day and hour
/// labels are computed in `now`'s time zone.
pub fn to_forecast_bundle_at<Tz: TimeZone>(
    samples: &[RawSample],
    location_name: &str,
    now: &DateTime<Tz>,
) -> ForecastBundle {
    let daily = group_by_date(samples)
        .into_iter()
        .take(MAX_DAILY)
        .map(|(date, group)| summarize_day(date, &group, now))
        .collect();

    let hourly = samples
        .iter()
        .take(MAX_HOURLY)
        .map(|sample| to_hourly(sample, now))
        .collect();

    ForecastBundle { location_name: location_name.to_string(), daily, hourly }
}

/// Groups keyed by the `YYYY-MM-DD` prefix, in order of first occurrence.
fn group_by_date(samples: &[RawSample]) -> Vec<(String, Vec<&RawSample>)> {
    let mut groups: Vec<(String, Vec<&RawSample>)> = Vec::new();

    for sample in samples {
        let key = date_key(&sample.date_time);
        match groups.iter_mut().find(|(k, _)| k == key) {
            Some((_, group)) => group.push(sample),
            None => groups.push((key.to_string(), vec![sample])),
        }
    }

    groups
}

fn date_key(date_time: &str) -> &str {
    date_time.get(..10).unwrap_or(date_time)
}

fn summarize_day<Tz: TimeZone>(
    date: String,
    group: &[&RawSample],
    now: &DateTime<Tz>,
) -> DailyForecast {
    let max_temp = group.iter().map(|s| s.temperature).fold(f64::NEG_INFINITY, f64::max);
    let min_temp = group.iter().map(|s| s.temperature).fold(f64::INFINITY, f64::min);

    let humidity = mean(group.iter().map(|s| f64::from(s.humidity))).round() as u8;
    let wind_speed = mean(group.iter().map(|s| s.wind_speed));
    let precipitation_chance =
        (mean(group.iter().map(|s| s.precipitation_probability)) * 100.0).round() as u8;

    let representative = group[representative_index(group.len())].primary();
    let day_name = group
        .first()
        .map(|first| day_label(first.timestamp, now).unwrap_or_else(|| weekday_from_key(&date)))
        .unwrap_or_default();

    DailyForecast {
        date,
        day_name,
        max_temp,
        min_temp,
        condition: representative
            .map(|w| w.main.clone())
            .unwrap_or_else(|| UNKNOWN_CONDITION.to_string()),
        description: representative
            .map(|w| w.description.clone())
            .unwrap_or_else(|| UNKNOWN_CONDITION.to_string()),
        icon_code: representative
            .map(|w| w.icon.clone())
            .unwrap_or_else(|| FALLBACK_ICON.to_string()),
        humidity,
        wind_speed,
        precipitation_chance,
    }
}

/// Index of the sample supplying a day's condition: the later middle for
/// even-sized groups.
pub fn representative_index(len: usize) -> usize {
    len / 2
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

fn to_hourly<Tz: TimeZone>(sample: &RawSample, now: &DateTime<Tz>) -> HourlyForecast {
    let primary = sample.primary();
    let hour = local_time(sample.timestamp, now)
        .map(|dt| dt.hour())
        .or_else(|| hour_from_date_time(&sample.date_time))
        .unwrap_or(0);

    HourlyForecast {
        time: sample.date_time.clone(),
        hour: hour_label(hour),
        temperature: sample.temperature,
        condition: primary
            .map(|w| w.main.clone())
            .unwrap_or_else(|| UNKNOWN_CONDITION.to_string()),
        icon_code: primary
            .map(|w| w.icon.clone())
            .unwrap_or_else(|| FALLBACK_ICON.to_string()),
        precipitation_chance: (sample.precipitation_probability * 100.0).round() as u8,
        wind_speed: sample.wind_speed,
    }
}

/// "Today", "Tomorrow" or the full weekday name of `timestamp` as seen from
/// `now`. `None` when the timestamp cannot be placed in `now`'s time zone.
pub fn day_label<Tz: TimeZone>(timestamp: i64, now: &DateTime<Tz>) -> Option<String> {
    let day = local_time(timestamp, now)?.date_naive();
    let today = now.date_naive();

    let label = if day == today {
        "Today".to_string()
    } else if today.succ_opt() == Some(day) {
        "Tomorrow".to_string()
    } else {
        weekday_name(day.weekday()).to_string()
    };

    Some(label)
}

/// 12-hour clock label for an hour of day (0..=23).
pub fn hour_label(hour: u32) -> String {
    match hour {
        0 => "12 AM".to_string(),
        1..=11 => format!("{hour} AM"),
        12 => "12 PM".to_string(),
        _ => format!("{} PM", hour - 12),
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn local_time<Tz: TimeZone>(timestamp: i64, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    now.timezone().timestamp_opt(timestamp, 0).single()
}

fn weekday_from_key(key: &str) -> String {
    NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .map(|d| weekday_name(d.weekday()).to_string())
        .unwrap_or_default()
}

fn hour_from_date_time(date_time: &str) -> Option<u32> {
    NaiveDateTime::parse_from_str(date_time, "%Y-%m-%d %H:%M:%S").ok().map(|dt| dt.hour())
}
