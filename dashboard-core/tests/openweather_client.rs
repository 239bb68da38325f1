//! Integration tests for OpenWeatherClient using wiremock.

use std::time::Duration;

use dashboard_core::{
    ErrorCategory, FetchError, LocationQuery, NetworkCause, OpenWeatherClient, WeatherRepository,
    WeatherSource, classify,
};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::with_options("TEST_KEY".into(), &server.uri(), Duration::from_secs(2))
        .unwrap()
}

fn current_body() -> serde_json::Value {
    serde_json::json!({
        "name": "London",
        "dt": 1715594400,
        "main": {"temp": 14.2, "feels_like": 13.1, "humidity": 72, "pressure": 1011},
        "weather": [{"main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "wind": {"speed": 4.6},
        "visibility": 10000
    })
}

/// 40 samples at 3-hour spacing starting 2024-05-13 00:00 UTC.
fn forecast_body() -> serde_json::Value {
    let start = 1_715_558_400_i64;
    let list: Vec<_> = (0..40)
        .map(|i| {
            let dt = start + i * 3 * 3600;
            let day = 13 + i / 8;
            let hour = (i % 8) * 3;
            serde_json::json!({
                "dt": dt,
                "dt_txt": format!("2024-05-{day:02} {hour:02}:00:00"),
                "main": {"temp": 10.0 + (i % 8) as f64, "feels_like": 9.0, "humidity": 60, "pressure": 1012},
                "weather": [{"main": "Clear", "description": "clear sky", "icon": "01d"}],
                "wind": {"speed": 3.5},
                "visibility": 10000,
                "pop": 0.25
            })
        })
        .collect();

    serde_json::json!({
        "list": list,
        "city": {"name": "London", "country": "GB", "timezone": 3600}
    })
}

#[tokio::test]
async fn test_current_weather_by_city() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&mock_server)
        .await;

    let weather = client(&mock_server)
        .current_weather(&LocationQuery::city("London"))
        .await
        .unwrap();

    assert_eq!(weather.location_name, "London");
    assert_eq!(weather.temperature, 14.2);
    assert_eq!(weather.description, "broken clouds");
    assert_eq!(weather.icon_code, "04d");
    assert_eq!(weather.pressure, 1011.0);
    assert_eq!(weather.timestamp_ms, 1_715_594_400_000);
}

#[tokio::test]
async fn test_current_weather_by_coordinates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "51.5074"))
        .and(query_param("lon", "-0.1278"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&mock_server)
        .await;

    let weather = client(&mock_server)
        .current_weather(&LocationQuery::coordinates(51.5074, -0.1278))
        .await
        .unwrap();

    assert_eq!(weather.location_name, "London");
}

#[tokio::test]
async fn test_forecast_aggregates_five_days() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "London"))
        .and(query_param("cnt", "40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&mock_server)
        .await;

    let bundle = client(&mock_server).forecast(&LocationQuery::city("London")).await.unwrap();

    assert_eq!(bundle.location_name, "London");
    assert_eq!(bundle.daily.len(), 5);
    assert_eq!(bundle.hourly.len(), 8);
    assert_eq!(bundle.daily[0].date, "2024-05-13");
    assert_eq!(bundle.daily[4].date, "2024-05-17");
    assert_eq!(bundle.daily[0].max_temp, 17.0);
    assert_eq!(bundle.daily[0].min_temp, 10.0);
    assert_eq!(bundle.daily[0].precipitation_chance, 25);
    assert_eq!(bundle.hourly[0].time, "2024-05-13 00:00:00");
    assert_eq!(bundle.hourly[7].time, "2024-05-13 21:00:00");
}

#[tokio::test]
async fn test_status_codes_are_classified() {
    let cases = [
        (401, ErrorCategory::Auth),
        (404, ErrorCategory::NotFound),
        (429, ErrorCategory::RateLimit),
        (503, ErrorCategory::Server),
        (400, ErrorCategory::Network(NetworkCause::UnexpectedStatus)),
    ];

    for (status, expected) in cases {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(status).set_body_string(r#"{"cod":"err","message":"nope"}"#),
            )
            .mount(&mock_server)
            .await;

        let err = client(&mock_server)
            .current_weather(&LocationQuery::city("Nowhere"))
            .await
            .unwrap_err();

        match &err {
            FetchError::Status { status: got, body } => {
                assert_eq!(*got, status);
                assert!(body.contains("nope"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
        assert_eq!(classify(&err), expected);
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .current_weather(&LocationQuery::city("London"))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Decode(_)));
    assert_eq!(classify(&err), ErrorCategory::Unknown);
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_body())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let client =
        OpenWeatherClient::with_options("TEST_KEY".into(), &mock_server.uri(), Duration::from_millis(200))
            .unwrap();

    let err = client.current_weather(&LocationQuery::city("London")).await.unwrap_err();
    assert_eq!(
        classify(&err).to_string(),
        "Request timeout. Please try again."
    );
}

#[tokio::test]
async fn test_refused_connection_is_classified() {
    let client = OpenWeatherClient::with_options(
        "TEST_KEY".into(),
        "http://127.0.0.1:1",
        Duration::from_secs(2),
    )
    .unwrap();

    let err = client.current_weather(&LocationQuery::city("London")).await.unwrap_err();
    assert_eq!(classify(&err), ErrorCategory::Network(NetworkCause::ConnectionFailed));
}

#[tokio::test]
async fn test_unresolvable_host_is_classified() {
    let client = OpenWeatherClient::with_options(
        "TEST_KEY".into(),
        "http://weather-dashboard.invalid",
        Duration::from_secs(5),
    )
    .unwrap();

    let err = client.current_weather(&LocationQuery::city("London")).await.unwrap_err();
    assert!(matches!(err, FetchError::Dns(_)), "got {err:?}");
    let category = classify(&err);
    assert_eq!(category, ErrorCategory::Network(NetworkCause::NoInternet));
    assert_eq!(category.to_string(), "No internet connection. Please check your network.");
}

#[tokio::test]
async fn test_repository_surfaces_message_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let repo = WeatherRepository::with_timeout(client(&mock_server), Duration::from_secs(2));
    let err = repo
        .forecast(&LocationQuery::city("Atlantis"), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Location not found. Please check the city name.");
}
