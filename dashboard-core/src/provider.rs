use crate::{
    Config, CurrentWeather, ForecastBundle, LocationQuery, error::FetchError,
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::{fmt::Debug, future::Future, time::Duration};
use tokio_util::sync::CancellationToken;

pub mod openweather;

/// Where weather data comes from. Implementations perform exactly one
/// network round trip per call and never retry.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current_weather(&self, query: &LocationQuery) -> Result<CurrentWeather, FetchError>;

    async fn forecast(&self, query: &LocationQuery) -> Result<ForecastBundle, FetchError>;
}

/// Run a single fetch, giving up on cancellation or after `timeout`.
pub async fn fetch_cancellable<T, F>(
    token: &CancellationToken,
    timeout: Duration,
    fetch: F,
) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(FetchError::Cancelled),
        res = tokio::time::timeout(timeout, fetch) => res.unwrap_or_else(|_| Err(FetchError::Timeout)),
    }
}

/// Construct the OpenWeather client from config.
pub fn source_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config.api_key()?;
    OpenWeatherClient::with_options(api_key, config.base_url(), config.timeout())
}
