use crate::remote::error::RemoteError;
use crate::remote::payload::{
    into_sensor_ids, into_stations, RawSensor, RawSensorData, RawStation,
};
use crate::types::measurement::Measurement;
use crate::types::station::Station;
use futures_util::stream::{self, StreamExt};
use log::{info, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.gios.gov.pl/pjp-api/rest";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 4;

const STATIONS_PATH: &str = "/station/findAll";
const SENSORS_PATH: &str = "/station/sensors";
const SENSOR_DATA_PATH: &str = "/data/getData";

/// Read-only client for the GIOS air-quality REST service.
///
/// Covers the three endpoints the crate needs: the station catalog, the sensor
/// directory of a station and the measurement series of a sensor. Every request
/// has a finite timeout and is attempted exactly once.
#[derive(Debug, Clone)]
pub struct GiosClient {
    base_url: String,
    http: Client,
    max_concurrent_requests: usize,
}

impl GiosClient {
    pub fn new(
        base_url: &str,
        request_timeout: Duration,
        max_concurrent_requests: usize,
    ) -> Result<Self, RemoteError> {
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(RemoteError::ClientBuild)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            max_concurrent_requests: max_concurrent_requests.max(1),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues a GET and decodes the JSON body into `T`.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RemoteError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                return Err(if let Some(status) = e.status() {
                    RemoteError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    RemoteError::NetworkRequest(url, e)
                });
            }
        };

        let body = response
            .bytes()
            .await
            .map_err(|e| RemoteError::NetworkRequest(url.clone(), e))?;

        serde_json::from_slice::<T>(&body)
            .map_err(|source| RemoteError::MalformedResponse { url, source })
    }

    /// Fetches the full station catalog.
    pub async fn fetch_all_stations(&self) -> Result<Vec<Station>, RemoteError> {
        let raw: Vec<RawStation> = self.get_json(STATIONS_PATH).await?;
        let stations = into_stations(raw);
        info!("Fetched {} stations from {}", stations.len(), self.base_url);
        Ok(stations)
    }

    /// Fetches the ids of the sensors installed at a station.
    pub async fn fetch_sensor_ids(&self, station_id: i64) -> Result<Vec<i64>, RemoteError> {
        let raw: Vec<RawSensor> = self
            .get_json(&format!("{SENSORS_PATH}/{station_id}"))
            .await?;
        Ok(into_sensor_ids(raw))
    }

    /// Fetches the measurement series of one sensor, without null entries.
    pub async fn fetch_measurements(&self, sensor_id: i64) -> Result<Vec<Measurement>, RemoteError> {
        let raw: RawSensorData = self
            .get_json(&format!("{SENSOR_DATA_PATH}/{sensor_id}"))
            .await?;
        Ok(raw.into_measurements())
    }

    /// Sensor ids of a station, or an empty list if they cannot be retrieved.
    pub async fn sensor_ids_or_empty(&self, station_id: i64) -> Vec<i64> {
        match self.fetch_sensor_ids(station_id).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(
                    "Could not list sensors of station {} ({:?}): {}",
                    station_id,
                    e.kind(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Measurements of one sensor, or an empty list if they cannot be retrieved.
    pub async fn measurements_or_empty(&self, sensor_id: i64) -> Vec<Measurement> {
        match self.fetch_measurements(sensor_id).await {
            Ok(measurements) => measurements,
            Err(e) => {
                warn!(
                    "Could not fetch data of sensor {} ({:?}): {}",
                    sensor_id,
                    e.kind(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Fetches the measurements of every sensor of a station and concatenates them.
    ///
    /// Sensors are fetched with at most `max_concurrent_requests` requests in flight.
    /// Results are concatenated in sensor directory order, each sensor's series in
    /// its original order. A failing sensor contributes nothing and does not stop
    /// the others.
    pub async fn fetch_all_for_station(&self, station_id: i64) -> Vec<Measurement> {
        let sensor_ids = self.sensor_ids_or_empty(station_id).await;

        let per_sensor: Vec<Vec<Measurement>> = stream::iter(sensor_ids)
            .map(|sensor_id| self.measurements_or_empty(sensor_id))
            .buffered(self.max_concurrent_requests)
            .collect()
            .await;

        let measurements: Vec<Measurement> = per_sensor.into_iter().flatten().collect();
        info!(
            "Fetched {} measurements for station {}",
            measurements.len(),
            station_id
        );
        measurements
    }
}
