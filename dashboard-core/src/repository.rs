//! Boundary between the data source and its callers: failures leave here as
//! an [`ErrorCategory`] and nothing else.

use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::{
    config::DEFAULT_TIMEOUT_SECS,
    error::{ErrorCategory, FetchError, classify},
    model::{CurrentWeather, ForecastBundle, LocationQuery},
    provider::{WeatherSource, fetch_cancellable},
};

#[derive(Debug)]
pub struct WeatherRepository<S> {
    source: Arc<S>,
    timeout: Duration,
}

impl<S> Clone for WeatherRepository<S> {
    fn clone(&self) -> Self {
        Self { source: Arc::clone(&self.source), timeout: self.timeout }
    }
}

impl<S: WeatherSource> WeatherRepository<S> {
    pub fn new(source: S) -> Self {
        Self::with_timeout(source, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(source: S, timeout: Duration) -> Self {
        Self { source: Arc::new(source), timeout }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn current_weather(
        &self,
        query: &LocationQuery,
        token: &CancellationToken,
    ) -> Result<CurrentWeather, ErrorCategory> {
        fetch_cancellable(token, self.timeout, self.source.current_weather(query))
            .await
            .map_err(|err| report(query, "current weather", err))
    }

    pub async fn forecast(
        &self,
        query: &LocationQuery,
        token: &CancellationToken,
    ) -> Result<ForecastBundle, ErrorCategory> {
        fetch_cancellable(token, self.timeout, self.source.forecast(query))
            .await
            .map_err(|err| report(query, "forecast", err))
    }
}

fn report(query: &LocationQuery, what: &str, err: FetchError) -> ErrorCategory {
    let category = classify(&err);
    tracing::warn!(location = %query, error = %err, "{what} fetch failed: {category}");
    category
}
