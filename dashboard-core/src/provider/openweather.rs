use anyhow::Context;
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    aggregate::{to_current_weather, to_forecast_bundle},
    config::DEFAULT_BASE_URL,
    error::FetchError,
    model::{CurrentWeather, ForecastBundle, LocationQuery, RawSample, WeatherInfo},
};

use super::WeatherSource;

/// 5 days of 3-hour samples.
const FORECAST_COUNT: &str = "40";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_options(api_key: String, base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { api_key, base_url: base_url.to_string(), http })
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        name: &str,
        query: &LocationQuery,
        extra: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = self.endpoint(name);

        let mut params: Vec<(&str, String)> = match query {
            LocationQuery::City(city) => vec![("q", city.clone())],
            LocationQuery::Coordinates { latitude, longitude } => {
                vec![("lat", latitude.to_string()), ("lon", longitude.to_string())]
            }
        };
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));
        params.extend(extra.iter().map(|(k, v)| (*k, v.to_string())));

        tracing::debug!(%url, location = %query, "requesting OpenWeather {name}");

        let res = self.http.get(&url).query(&params).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, "OpenWeather {name} request failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    visibility: u32,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    visibility: u32,
    #[serde(default)]
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

fn weather_info(weather: Vec<OwWeather>) -> Vec<WeatherInfo> {
    weather
        .into_iter()
        .map(|w| WeatherInfo { main: w.main, description: w.description, icon: w.icon })
        .collect()
}

impl OwCurrentResponse {
    fn into_sample(self) -> (String, RawSample) {
        let date_time = DateTime::from_timestamp(self.dt, 0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();

        let sample = RawSample {
            timestamp: self.dt,
            date_time,
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            wind_speed: self.wind.speed,
            visibility: self.visibility,
            precipitation_probability: 0.0,
            weather: weather_info(self.weather),
        };

        (self.name, sample)
    }
}

impl From<OwForecastEntry> for RawSample {
    fn from(entry: OwForecastEntry) -> Self {
        RawSample {
            timestamp: entry.dt,
            date_time: entry.dt_txt,
            temperature: entry.main.temp,
            feels_like: entry.main.feels_like,
            humidity: entry.main.humidity,
            pressure: entry.main.pressure,
            wind_speed: entry.wind.speed,
            visibility: entry.visibility,
            precipitation_probability: entry.pop,
            weather: weather_info(entry.weather),
        }
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current_weather(&self, query: &LocationQuery) -> Result<CurrentWeather, FetchError> {
        let parsed: OwCurrentResponse = self.get("weather", query, &[]).await?;
        let (name, sample) = parsed.into_sample();

        Ok(to_current_weather(&sample, &name))
    }

    async fn forecast(&self, query: &LocationQuery) -> Result<ForecastBundle, FetchError> {
        let parsed: OwForecastResponse =
            self.get("forecast", query, &[("cnt", FORECAST_COUNT)]).await?;

        let samples: Vec<RawSample> = parsed.list.into_iter().map(RawSample::from).collect();

        Ok(to_forecast_bundle(&samples, &parsed.city.name))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
