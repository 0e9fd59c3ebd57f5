//! End-to-end pipeline tests against a mock upstream
//!
//! Both the geocoding and forecast endpoints are served by one wiremock
//! server; `now` is always passed explicitly so windowing and caching are
//! deterministic.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skycast::cache::ForecastCache;
use skycast::config::ForecastConfig;
use skycast::data::{Location, OpenWeatherClient};
use skycast::error::ForecastError;
use skycast::service::ForecastService;
use skycast::transform::HorizonWindow;

/// Two samples three hours apart: 12:00 and 15:00 UTC on 2024-07-15
fn forecast_body() -> serde_json::Value {
    serde_json::json!({
        "cod": "200",
        "message": 0,
        "cnt": 2,
        "list": [
            {
                "dt": 1721044800,
                "main": {"temp": 25.5, "feels_like": 25.9, "temp_min": 25.5, "temp_max": 25.5,
                         "pressure": 1013, "humidity": 60},
                "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
                "clouds": {"all": 0},
                "wind": {"speed": 3.6, "deg": 350},
                "visibility": 10000,
                "pop": 0,
                "dt_txt": "2024-07-15 12:00:00"
            },
            {
                "dt": 1721055600,
                "main": {"temp": 23.8, "feels_like": 24.0, "temp_min": 23.8, "temp_max": 23.8,
                         "pressure": 1010, "humidity": 72},
                "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
                "clouds": {"all": 75},
                "wind": {"speed": 4.8, "deg": 20},
                "visibility": 8000,
                "pop": 0.2,
                "dt_txt": "2024-07-15 15:00:00"
            }
        ],
        "city": {
            "id": 5368361,
            "name": "Los Angeles",
            "coord": {"lat": 34.0522, "lon": -118.2437},
            "country": "US",
            "timezone": -25200,
            "sunrise": 1721047900,
            "sunset": 1721098800
        }
    })
}

/// 12:00 UTC, i.e. 05:00 local at UTC-7, the time of the first sample
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap()
}

fn service_for(server: &MockServer, cache: Arc<ForecastCache>) -> ForecastService {
    let config = ForecastConfig::new(Some("test-key".to_string()))
        .unwrap()
        .with_base_urls(server.uri(), server.uri());
    let client = OpenWeatherClient::new(&config).unwrap();
    ForecastService::new(client, cache, HorizonWindow::default())
}

async fn mount_geocoding(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/direct"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "Los Angeles", "lat": 34.0522, "lon": -118.2437, "country": "US", "state": "California"}
        ])))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_forecast(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("lat", "34.0522"))
        .and(query_param("lon", "-118.2437"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn local(hour: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 7, 15)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn test_end_to_end_hourly_series() {
    let server = MockServer::start().await;
    mount_geocoding(&server, 1).await;
    mount_forecast(&server, 1).await;
    let service = service_for(&server, Arc::new(ForecastCache::new()));

    let result = service
        .forecast_envelope(&Location::new("Los Angeles", "US"), now())
        .await
        .unwrap();
    let forecast = result.data;

    assert_eq!(forecast.coordinates.latitude, 34.0522);
    assert_eq!(forecast.coordinates.longitude, -118.2437);
    assert_eq!(forecast.timezone_offset, -25200);

    // Originals at 05:00 and 08:00 local, synthesized at 06:00 and 07:00
    let times: Vec<_> = forecast.hourly.iter().map(|s| s.time).collect();
    assert_eq!(times, vec![local(5), local(6), local(7), local(8)]);

    let temperatures: Vec<i32> = forecast.hourly.iter().map(|s| s.temperature).collect();
    assert_eq!(temperatures, vec![26, 25, 25, 24]);

    // Nearest-neighbour condition, shortest-arc wind direction
    assert_eq!(forecast.hourly[1].condition.category, "Clear");
    assert_eq!(forecast.hourly[2].condition.category, "Rain");
    assert_eq!(forecast.hourly[1].wind_direction, 0);
    assert_eq!(forecast.hourly[3].precipitation_probability, 20);

    assert_eq!(forecast.daily.len(), 1);
    let day = &forecast.daily[0];
    assert_eq!(day.date, NaiveDate::from_ymd_opt(2024, 7, 15).unwrap());
    assert_eq!(day.samples.len(), 4);
    assert_eq!(day.temperature_min, 24);
    assert_eq!(day.temperature_max, 26);
    assert_eq!(day.precipitation_probability, 20);
    assert_eq!(day.condition.category, "Clear");
}

#[tokio::test]
async fn test_horizon_excludes_past_samples() {
    let server = MockServer::start().await;
    mount_geocoding(&server, 1).await;
    mount_forecast(&server, 1).await;
    let service = service_for(&server, Arc::new(ForecastCache::new()));

    // 06:30 local: 05:00 and 06:00 are in the past
    let later = now() + Duration::minutes(90);
    let result = service
        .forecast(&Location::new("Los Angeles", "US"), later)
        .await
        .unwrap();

    let times: Vec<_> = result.data.hourly.iter().map(|s| s.time).collect();
    assert_eq!(times, vec![local(7), local(8)]);
    // Daily summaries are not windowed
    assert_eq!(result.data.daily[0].samples.len(), 4);
}

#[tokio::test]
async fn test_cache_hit_makes_no_requests() {
    let server = MockServer::start().await;
    mount_geocoding(&server, 1).await;
    mount_forecast(&server, 1).await;
    let service = service_for(&server, Arc::new(ForecastCache::new()));
    let location = Location::new("Los Angeles", "US");

    let first = service.forecast(&location, now()).await.unwrap();
    let second = service
        .forecast(&location, now() + Duration::minutes(9))
        .await
        .unwrap();

    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(second.cached_at, now());
    assert_eq!(first.data, second.data);
}

#[tokio::test]
async fn test_stale_cache_refetches() {
    let server = MockServer::start().await;
    mount_geocoding(&server, 2).await;
    mount_forecast(&server, 2).await;
    let service = service_for(&server, Arc::new(ForecastCache::new()));
    let location = Location::new("Los Angeles", "US");

    service.forecast(&location, now()).await.unwrap();
    let later = now() + Duration::minutes(11);
    let second = service.forecast(&location, later).await.unwrap();

    assert!(!second.from_cache);
    assert_eq!(second.cached_at, later);
}

#[tokio::test]
async fn test_shared_cache_between_services() {
    let server = MockServer::start().await;
    mount_geocoding(&server, 1).await;
    mount_forecast(&server, 1).await;
    let cache = Arc::new(ForecastCache::new());
    let first = service_for(&server, Arc::clone(&cache));
    let second = service_for(&server, Arc::clone(&cache));
    let location = Location::new("Los Angeles", "US");

    first.forecast(&location, now()).await.unwrap();
    let result = second.forecast(&location, now()).await.unwrap();

    assert!(result.from_cache);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_validation_short_circuits_before_network() {
    let server = MockServer::start().await;
    mount_geocoding(&server, 0).await;
    mount_forecast(&server, 0).await;
    let service = service_for(&server, Arc::new(ForecastCache::new()));

    for location in [Location::new("", "US"), Location::new("Los Angeles", "")] {
        let envelope = service.forecast_envelope(&location, now()).await.unwrap_err();
        assert_eq!(envelope.message, "Valid city with name and country is required");
        assert_eq!(envelope.code, None);
    }
}

#[tokio::test]
async fn test_unknown_location_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    mount_forecast(&server, 0).await;
    let service = service_for(&server, Arc::new(ForecastCache::new()));

    let err = service
        .forecast(&Location::new("Atlantis", "XX"), now())
        .await
        .unwrap_err();
    assert!(matches!(err, ForecastError::NotFound { .. }));

    let envelope = service
        .forecast_envelope(&Location::new("Atlantis", "XX"), now())
        .await
        .unwrap_err();
    assert_eq!(envelope.message, "No location found for: Atlantis, XX");
    assert_eq!(envelope.code, None);
}

#[tokio::test]
async fn test_forecast_error_status_in_envelope() {
    let server = MockServer::start().await;
    mount_geocoding(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"cod":"404","message":"city not found"}"#))
        .mount(&server)
        .await;
    let service = service_for(&server, Arc::new(ForecastCache::new()));

    let envelope = service
        .forecast_envelope(&Location::new("Los Angeles", "US"), now())
        .await
        .unwrap_err();

    assert_eq!(envelope.code, Some(404));
    assert!(envelope.message.contains("city not found"), "{}", envelope.message);

    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["code"], 404);
}

#[tokio::test]
async fn test_geocoding_unauthorized_in_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/direct"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&server)
        .await;
    mount_forecast(&server, 0).await;
    let service = service_for(&server, Arc::new(ForecastCache::new()));

    let envelope = service
        .forecast_envelope(&Location::new("Los Angeles", "US"), now())
        .await
        .unwrap_err();

    assert_eq!(envelope.code, Some(401));
}

#[tokio::test]
async fn test_malformed_forecast_is_parse_failure() {
    let server = MockServer::start().await;
    mount_geocoding(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"cod": "200"})))
        .mount(&server)
        .await;
    let service = service_for(&server, Arc::new(ForecastCache::new()));

    let envelope = service
        .forecast_envelope(&Location::new("Los Angeles", "US"), now())
        .await
        .unwrap_err();

    assert!(envelope.message.starts_with("Failed to parse API response"));
    assert_eq!(envelope.code, None);

    let json = serde_json::to_value(&envelope).unwrap();
    assert!(json.get("code").is_none());
}

#[tokio::test]
async fn test_network_failure_has_no_code() {
    // Nothing listens on port 1
    let uri = "http://127.0.0.1:1";
    let config = ForecastConfig::new(Some("test-key".to_string()))
        .unwrap()
        .with_base_urls(uri, uri);
    let client = OpenWeatherClient::new(&config).unwrap();
    let service = ForecastService::new(client, Arc::new(ForecastCache::new()), HorizonWindow::default());

    let envelope = service
        .forecast_envelope(&Location::new("Los Angeles", "US"), now())
        .await
        .unwrap_err();

    assert_eq!(envelope.code, None);
    assert!(envelope.message.starts_with("Request failed"), "{}", envelope.message);
}

#[tokio::test]
async fn test_forecast_many_preserves_input_order() {
    let server = MockServer::start().await;
    mount_geocoding(&server, 2).await;
    mount_forecast(&server, 2).await;
    let service = service_for(&server, Arc::new(ForecastCache::new()));

    let locations = vec![
        Location::new("Los Angeles", "US"),
        Location::new("", "CN"),
        Location::new("Los Angeles", "CL"),
    ];
    let results = service.forecast_many(&locations, now()).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().data.location, locations[0]);
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().unwrap().data.location, locations[2]);
}

#[tokio::test]
async fn test_rest_of_day_window() {
    let server = MockServer::start().await;
    mount_geocoding(&server, 1).await;
    mount_forecast(&server, 1).await;
    let config = ForecastConfig::new(Some("test-key".to_string()))
        .unwrap()
        .with_base_urls(server.uri(), server.uri());
    let client = OpenWeatherClient::new(&config).unwrap();
    let service = ForecastService::new(client, Arc::new(ForecastCache::new()), HorizonWindow::RestOfDay);

    let result = service
        .forecast(&Location::new("Los Angeles", "US"), now())
        .await
        .unwrap();

    assert_eq!(result.data.hourly.len(), 4);
    assert!(result.data.hourly.iter().all(|s| s.time.date() == local(0).date()));
}
