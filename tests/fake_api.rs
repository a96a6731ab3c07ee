use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use gios_air::{DataService, Measurement, Station};
use serde_json::{json, Value};
use std::time::Duration;
use tempfile::TempDir;

/// Serves `router` on an ephemeral loopback port and returns its base URL.
async fn spawn_api(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn service(base_url: &str, dir: &TempDir) -> DataService {
    let _ = env_logger::builder().is_test(true).try_init();
    DataService::builder()
        .base_url(base_url)
        .snapshot_dir(dir.path().to_path_buf())
        .request_timeout(Duration::from_millis(500))
        .build()
        .await
        .unwrap()
}

fn stations_payload() -> Value {
    json!([
        {
            "id": 114,
            "stationName": "Wrocław - Bartnicza",
            "gegrLat": "51.115933",
            "gegrLon": "17.141125",
            "city": {"id": 1064, "name": "Wrocław",
                     "commune": {"communeName": "Wrocław", "provinceName": "DOLNOŚLĄSKIE"}}
        },
        {"id": 117, "stationName": "Wrocław - Korzeniowskiego", "city": null}
    ])
}

async fn sensors(Path(station_id): Path<i64>) -> Result<Json<Value>, StatusCode> {
    match station_id {
        114 => Ok(Json(json!([
            {"id": 1, "stationId": 114, "param": {"paramCode": "PM10"}},
            {"id": 2, "stationId": 114, "param": {"paramCode": "NO2"}},
            {"id": 3, "stationId": 114, "param": {"paramCode": "SO2"}}
        ]))),
        // A station without sensors.
        117 => Ok(Json(json!([]))),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn sensor_data(Path(sensor_id): Path<i64>) -> Result<Json<Value>, StatusCode> {
    match sensor_id {
        1 => {
            // Slowest sensor first, to check that results keep sensor order.
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(Json(json!({"key": "PM10", "values": [
                {"date": "2024-05-01 02:00:00", "value": 24.0},
                {"date": "2024-05-01 01:00:00", "value": null},
                {"date": "2024-05-01 00:00:00", "value": 20.0}
            ]})))
        }
        2 => Ok(Json(json!({"key": "NO2", "values": [
            {"date": "2024-05-01 02:00:00", "value": null},
            {"date": "2024-05-01 01:00:00", "value": 11.5}
        ]}))),
        _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

fn healthy_api() -> Router {
    Router::new()
        .route("/station/findAll", get(|| async { Json(stations_payload()) }))
        .route("/station/sensors/{id}", get(sensors))
        .route("/data/getData/{id}", get(sensor_data))
}

fn failing_api() -> Router {
    Router::new()
        .route(
            "/station/findAll",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        )
        .route(
            "/station/sensors/{id}",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        )
}

#[tokio::test]
async fn test_remote_stations_replace_snapshot() {
    let dir = TempDir::new().unwrap();
    let base = spawn_api(healthy_api()).await;
    let service = service(&base, &dir).await;
    service
        .store()
        .save_stations(&[Station::new(1, "Old", "OLD")])
        .await
        .unwrap();

    let fetched = service.get_stations().await;
    assert!(!fetched.is_fallback());
    assert_eq!(
        fetched.data,
        vec![
            Station::new(114, "Wrocław - Bartnicza", "DOLNOŚLĄSKIE"),
            Station::new(117, "Wrocław - Korzeniowskiego", "unknown province"),
        ]
    );
    assert_eq!(service.store().load_stations().await.unwrap(), fetched.data);
}

#[tokio::test]
async fn test_failed_station_fetch_serves_snapshot_verbatim() {
    let dir = TempDir::new().unwrap();
    let base = spawn_api(failing_api()).await;
    let service = service(&base, &dir).await;
    let seeded = r#"[
    {"id": 14, "name": "Działoszyn", "province": "DOLNOŚLĄSKIE"},
    {"id": 16, "name": "Bielawa", "province": "DOLNOŚLĄSKIE"}
]"#;
    std::fs::write(service.store().stations_path(), seeded).unwrap();

    let fetched = service.get_stations().await;
    assert!(fetched.is_fallback());
    assert_eq!(
        fetched.data,
        vec![
            Station::new(14, "Działoszyn", "DOLNOŚLĄSKIE"),
            Station::new(16, "Bielawa", "DOLNOŚLĄSKIE"),
        ]
    );
    // The snapshot is not rewritten in fallback mode.
    assert_eq!(
        std::fs::read_to_string(service.store().stations_path()).unwrap(),
        seeded
    );
}

#[tokio::test]
async fn test_malformed_station_payload_falls_back() {
    let dir = TempDir::new().unwrap();
    let router = Router::new().route(
        "/station/findAll",
        get(|| async { Json(json!({"error": "maintenance"})) }),
    );
    let base = spawn_api(router).await;
    let service = service(&base, &dir).await;

    let fetched = service.get_stations().await;
    assert!(fetched.is_fallback());
    assert!(fetched.data.is_empty());
}

#[tokio::test]
async fn test_station_measurements_are_concatenated_in_sensor_order() {
    let dir = TempDir::new().unwrap();
    let base = spawn_api(healthy_api()).await;
    let service = service(&base, &dir).await;
    let other_station = vec![Measurement::new("CO", "2024-04-30 23:00:00", 310.0)];
    service
        .store()
        .save_measurements(999, &other_station)
        .await
        .unwrap();

    let fetched = service.get_measurements_for_station(114).await;
    assert!(!fetched.is_fallback());
    // Sensor 3 fails and contributes nothing; nulls are dropped.
    assert_eq!(
        fetched.data,
        vec![
            Measurement::new("PM10", "2024-05-01 02:00:00", 24.0),
            Measurement::new("PM10", "2024-05-01 00:00:00", 20.0),
            Measurement::new("NO2", "2024-05-01 01:00:00", 11.5),
        ]
    );

    assert_eq!(
        service.store().load_measurements(114).await.unwrap(),
        fetched.data
    );
    assert_eq!(
        service.store().load_measurements(999).await.unwrap(),
        other_station
    );
}

#[tokio::test]
async fn test_station_without_sensors_falls_back() {
    let dir = TempDir::new().unwrap();
    let base = spawn_api(healthy_api()).await;
    let service = service(&base, &dir).await;
    let cached = vec![Measurement::new("PM10", "2024-04-01 00:00:00", 5.0)];
    service.store().save_measurements(117, &cached).await.unwrap();

    let fetched = service.get_measurements_for_station(117).await;
    assert!(fetched.is_fallback());
    assert_eq!(fetched.data, cached);
}

#[tokio::test]
async fn test_sensor_directory_failure_falls_back() {
    let dir = TempDir::new().unwrap();
    let base = spawn_api(failing_api()).await;
    let service = service(&base, &dir).await;

    let fetched = service.get_measurements_for_station(114).await;
    assert!(fetched.is_fallback());
    assert!(fetched.data.is_empty());
}

#[tokio::test]
async fn test_hung_service_times_out_and_falls_back() {
    let dir = TempDir::new().unwrap();
    let router = Router::new().route(
        "/station/findAll",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(stations_payload())
        }),
    );
    let base = spawn_api(router).await;
    let service = service(&base, &dir).await;
    service
        .store()
        .save_stations(&[Station::new(14, "Działoszyn", "DOLNOŚLĄSKIE")])
        .await
        .unwrap();

    let fetched = service.get_stations().await;
    assert!(fetched.is_fallback());
    assert_eq!(fetched.data.len(), 1);
}

#[tokio::test]
async fn test_client_reports_failure_kinds() {
    use gios_air::{FailureKind, GiosClient};

    let malformed = spawn_api(Router::new().route(
        "/station/findAll",
        get(|| async { "definitely not json" }),
    ))
    .await;
    let client = GiosClient::new(&malformed, Duration::from_secs(2), 1).unwrap();
    let err = client.fetch_all_stations().await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::MalformedResponse);

    let failing = spawn_api(failing_api()).await;
    let client = GiosClient::new(&failing, Duration::from_secs(2), 1).unwrap();
    let err = client.fetch_all_stations().await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::RemoteUnavailable);
    assert!(client.sensor_ids_or_empty(114).await.is_empty());
}
