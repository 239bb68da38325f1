use serde::{Deserialize, Serialize};

/// How a location is addressed when asking the data source for weather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LocationQuery {
    City(String),
    Coordinates { latitude: f64, longitude: f64 },
}

impl LocationQuery {
    pub fn city(name: impl Into<String>) -> Self {
        LocationQuery::City(name.into())
    }

    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        LocationQuery::Coordinates { latitude, longitude }
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::City(name) => f.write_str(name),
            LocationQuery::Coordinates { latitude, longitude } => {
                write!(f, "{latitude:.4},{longitude:.4}")
            }
        }
    }
}

/// Primary condition attached to a sample ("Rain", "light rain", "10d").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherInfo {
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// One measurement point as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Epoch seconds.
    pub timestamp: i64,
    /// `YYYY-MM-DD HH:MM:SS`, as formatted by the source.
    pub date_time: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: f64,
    pub wind_speed: f64,
    pub visibility: u32,
    /// 0.0..=1.0
    pub precipitation_probability: f64,
    pub weather: Vec<WeatherInfo>,
}

impl RawSample {
    pub fn primary(&self) -> Option<&WeatherInfo> {
        self.weather.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location_name: String,
    pub temperature: f64,
    pub description: String,
    pub humidity: u8,
    pub wind_speed: f64,
    pub pressure: f64,
    pub feels_like: f64,
    pub icon_code: String,
    /// Epoch milliseconds.
    pub timestamp_ms: i64,
}

/// Summary of one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// `YYYY-MM-DD`
    pub date: String,
    /// "Today", "Tomorrow" or a weekday name.
    pub day_name: String,
    pub max_temp: f64,
    pub min_temp: f64,
    pub condition: String,
    pub description: String,
    pub icon_code: String,
    pub humidity: u8,
    pub wind_speed: f64,
    pub precipitation_chance: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub time: String,
    /// "H AM" / "H PM"
    pub hour: String,
    pub temperature: f64,
    pub condition: String,
    pub icon_code: String,
    pub precipitation_chance: u8,
    pub wind_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBundle {
    pub location_name: String,
    /// Chronological, at most five.
    pub daily: Vec<DailyForecast>,
    /// Chronological, at most eight.
    pub hourly: Vec<HourlyForecast>,
}
