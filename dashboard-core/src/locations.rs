//! Saved locations and their latest current conditions.
//!
//! Each location is refreshed by its own task; a task only ever touches the
//! entry carrying its location id.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::{
    model::{CurrentWeather, LocationQuery},
    provider::WeatherSource,
    repository::WeatherRepository,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: u32,
    pub name: String,
    pub country: String,
    /// Absent for locations added by name.
    pub coordinates: Option<Coordinates>,
    pub is_default: bool,
    pub is_favorite: bool,
}

impl Location {
    pub fn query(&self) -> LocationQuery {
        match self.coordinates {
            Some(c) => LocationQuery::coordinates(c.latitude, c.longitude),
            None => LocationQuery::city(self.name.clone()),
        }
    }
}

fn seeded(id: u32, name: &str, country: &str, latitude: f64, longitude: f64) -> Location {
    Location {
        id,
        name: name.to_string(),
        country: country.to_string(),
        coordinates: Some(Coordinates { latitude, longitude }),
        is_default: id == 1,
        is_favorite: false,
    }
}

/// London (default), New York, Tokyo and Paris.
pub fn default_locations() -> Vec<Location> {
    vec![
        seeded(1, "London", "United Kingdom", 51.5074, -0.1278),
        seeded(2, "New York", "United States", 40.7128, -74.0060),
        seeded(3, "Tokyo", "Japan", 35.6762, 139.6503),
        seeded(4, "Paris", "France", 48.8566, 2.3522),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationEntry {
    pub location: Location,
    pub weather: Option<CurrentWeather>,
    pub is_loading: bool,
    pub has_error: bool,
}

impl LocationEntry {
    fn pending(location: Location) -> Self {
        Self { location, weather: None, is_loading: true, has_error: false }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    pub entries: Vec<LocationEntry>,
    pub is_adding: bool,
    pub error_message: Option<String>,
}

pub struct LocationBoard<S> {
    repository: WeatherRepository<S>,
    state: Arc<Mutex<BoardState>>,
}

impl<S: WeatherSource + 'static> LocationBoard<S> {
    pub fn new(repository: WeatherRepository<S>, locations: Vec<Location>) -> Self {
        let entries = locations.into_iter().map(LocationEntry::pending).collect();

        Self {
            repository,
            state: Arc::new(Mutex::new(BoardState { entries, ..BoardState::default() })),
        }
    }

    pub fn with_defaults(repository: WeatherRepository<S>) -> Self {
        Self::new(repository, default_locations())
    }

    pub fn snapshot(&self) -> BoardState {
        self.state.lock().clone()
    }

    /// Fetch current conditions for every saved location concurrently.
    pub async fn refresh_all(&self, token: &CancellationToken) {
        let locations: Vec<Location> = {
            let mut state = self.state.lock();
            state.entries.iter_mut().for_each(|e| e.is_loading = true);
            state.entries.iter().map(|e| e.location.clone()).collect()
        };

        let ids: Vec<u32> = locations.iter().map(|l| l.id).collect();
        let mut tasks = JoinSet::new();
        for location in locations {
            let repository = self.repository.clone();
            let state = Arc::clone(&self.state);
            let token = token.clone();

            tasks.spawn(async move {
                let result = repository.current_weather(&location.query(), &token).await;
                update_entry(&state, location.id, result.ok());
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined {
                tracing::warn!(error = %err, "location refresh task failed");
            }
        }

        // A task that died before updating its entry leaves it loading.
        let mut state = self.state.lock();
        let stuck = state.entries.iter_mut().filter(|e| e.is_loading && ids.contains(&e.location.id));
        for entry in stuck {
            entry.is_loading = false;
            entry.has_error = true;
        }
    }

    /// Look a city up and append it. Blank input is ignored. Returns the new
    /// location's id; on failure the board's error message is set instead.
    pub async fn add_location(&self, city: &str, token: &CancellationToken) -> Option<u32> {
        let city = city.trim();
        if city.is_empty() {
            return None;
        }

        {
            let mut state = self.state.lock();
            state.is_adding = true;
            state.error_message = None;
        }

        let result = self.repository.current_weather(&LocationQuery::city(city), token).await;

        let mut state = self.state.lock();
        state.is_adding = false;

        match result {
            Ok(weather) => {
                let id = state.entries.iter().map(|e| e.location.id).max().unwrap_or(0) + 1;
                let location = Location {
                    id,
                    name: weather.location_name.clone(),
                    country: String::new(),
                    coordinates: None,
                    is_default: false,
                    is_favorite: false,
                };
                tracing::info!(id, name = %location.name, "location added");

                state.entries.push(LocationEntry {
                    location,
                    weather: Some(weather),
                    is_loading: false,
                    has_error: false,
                });
                Some(id)
            }
            Err(_) => {
                state.error_message = Some(format!(
                    "Could not find weather data for '{city}'. Please check the city name."
                ));
                None
            }
        }
    }

    pub fn remove_location(&self, id: u32) -> bool {
        let mut state = self.state.lock();
        let before = state.entries.len();
        state.entries.retain(|e| e.location.id != id);
        state.entries.len() != before
    }

    pub fn toggle_favorite(&self, id: u32) -> bool {
        let mut state = self.state.lock();
        match state.entries.iter_mut().find(|e| e.location.id == id) {
            Some(entry) => {
                entry.location.is_favorite = !entry.location.is_favorite;
                true
            }
            None => false,
        }
    }

    /// Make `id` the only default location. Unknown ids change nothing.
    pub fn set_default(&self, id: u32) -> bool {
        let mut state = self.state.lock();
        if !state.entries.iter().any(|e| e.location.id == id) {
            return false;
        }
        for entry in state.entries.iter_mut() {
            entry.location.is_default = entry.location.id == id;
        }
        true
    }

    pub fn clear_error(&self) {
        self.state.lock().error_message = None;
    }
}

fn update_entry(state: &Mutex<BoardState>, id: u32, weather: Option<CurrentWeather>) {
    let mut state = state.lock();
    if let Some(entry) = state.entries.iter_mut().find(|e| e.location.id == id) {
        entry.has_error = weather.is_none();
        entry.weather = weather;
        entry.is_loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fake::FakeSource;

    fn board(source: FakeSource) -> LocationBoard<FakeSource> {
        LocationBoard::with_defaults(WeatherRepository::new(source))
    }

    fn full_source() -> FakeSource {
        FakeSource::default()
            .with_city("51.5074,-0.1278", "London", 12.0)
            .with_city("40.7128,-74.0060", "New York", 20.0)
            .with_city("35.6762,139.6503", "Tokyo", 25.0)
            .failing("48.8566,2.3522", 500)
    }

    #[test]
    fn seeded_board_is_loading_with_london_default() {
        let state = board(FakeSource::default()).snapshot();

        assert_eq!(state.entries.len(), 4);
        assert!(state.entries.iter().all(|e| e.is_loading));
        let defaults: Vec<_> =
            state.entries.iter().filter(|e| e.location.is_default).map(|e| &e.location.name).collect();
        assert_eq!(defaults, ["London"]);
    }

    #[tokio::test]
    async fn refresh_updates_each_entry_independently() {
        let board = board(full_source());
        board.refresh_all(&CancellationToken::new()).await;

        let state = board.snapshot();
        let names: Vec<_> = state.entries.iter().map(|e| e.location.name.as_str()).collect();
        assert_eq!(names, ["London", "New York", "Tokyo", "Paris"]);

        for entry in &state.entries[..3] {
            assert!(!entry.is_loading);
            assert!(!entry.has_error);
        }
        assert_eq!(state.entries[2].weather.as_ref().map(|w| w.temperature), Some(25.0));

        let paris = &state.entries[3];
        assert!(paris.has_error);
        assert!(paris.weather.is_none());
        assert!(!paris.is_loading);
    }

    #[tokio::test]
    async fn refresh_queries_by_coordinates() {
        let board = board(full_source());
        board.refresh_all(&CancellationToken::new()).await;

        let mut calls = board.repository.source().calls.lock().clone();
        calls.sort();
        assert_eq!(
            calls,
            ["35.6762,139.6503", "40.7128,-74.0060", "48.8566,2.3522", "51.5074,-0.1278"]
        );
    }

    #[tokio::test]
    async fn add_location_appends_with_next_id() {
        let board = board(FakeSource::default().with_city("Berlin", "Berlin", 15.0));

        let id = board.add_location("  Berlin ", &CancellationToken::new()).await;
        assert_eq!(id, Some(5));

        let state = board.snapshot();
        let added = state.entries.last().unwrap();
        assert_eq!(added.location.name, "Berlin");
        assert_eq!(added.location.query(), LocationQuery::city("Berlin"));
        assert!(added.weather.is_some());
        assert!(!state.is_adding);
        assert!(state.error_message.is_none());
    }

    #[tokio::test]
    async fn add_unknown_city_sets_error() {
        let board = board(FakeSource::default());

        assert_eq!(board.add_location("Atlantis", &CancellationToken::new()).await, None);

        let state = board.snapshot();
        assert_eq!(state.entries.len(), 4);
        assert_eq!(
            state.error_message.as_deref(),
            Some("Could not find weather data for 'Atlantis'. Please check the city name.")
        );

        board.clear_error();
        assert!(board.snapshot().error_message.is_none());
    }

    #[tokio::test]
    async fn blank_city_is_ignored() {
        let board = board(FakeSource::default());
        assert_eq!(board.add_location("   ", &CancellationToken::new()).await, None);
        assert!(board.repository.source().calls.lock().is_empty());
    }

    #[test]
    fn remove_favorite_and_default() {
        let board = board(FakeSource::default());

        assert!(board.toggle_favorite(3));
        assert!(board.snapshot().entries[2].location.is_favorite);
        assert!(board.toggle_favorite(3));
        assert!(!board.snapshot().entries[2].location.is_favorite);
        assert!(!board.toggle_favorite(42));

        assert!(board.set_default(4));
        let state = board.snapshot();
        let defaults: Vec<_> =
            state.entries.iter().filter(|e| e.location.is_default).map(|e| e.location.id).collect();
        assert_eq!(defaults, [4]);

        assert!(board.remove_location(2));
        assert!(!board.remove_location(2));
        assert_eq!(board.snapshot().entries.len(), 3);
    }

    #[test]
    fn unknown_default_keeps_current_one() {
        let board = board(FakeSource::default());

        assert!(!board.set_default(42));

        let state = board.snapshot();
        let defaults: Vec<_> =
            state.entries.iter().filter(|e| e.location.is_default).map(|e| e.location.id).collect();
        assert_eq!(defaults, [1]);
    }

    #[tokio::test]
    async fn crashed_refresh_marks_entry_failed() {
        let board = board(full_source().panicking("35.6762,139.6503"));
        board.refresh_all(&CancellationToken::new()).await;

        let state = board.snapshot();
        let tokyo = &state.entries[2];
        assert!(!tokyo.is_loading);
        assert!(tokyo.has_error);
        assert!(tokyo.weather.is_none());

        let london = &state.entries[0];
        assert!(!london.has_error);
        assert!(london.weather.is_some());
    }
}
