//! This module provides the main entry point of the crate: a [`DataService`]
//! that fetches stations and measurements from the GIOS service, falls back to
//! the local snapshot when the service cannot deliver, and keeps the snapshot
//! up to date after every successful fetch.

use crate::error::AirQualityError;
use crate::remote::client::{
    GiosClient, DEFAULT_BASE_URL, DEFAULT_MAX_CONCURRENT_REQUESTS, DEFAULT_REQUEST_TIMEOUT,
};
use crate::snapshot::store::{
    SnapshotStore, DEFAULT_MEASUREMENTS_FILE_NAME, DEFAULT_STATIONS_FILE_NAME,
};
use crate::types::fetched::Fetched;
use crate::types::measurement::Measurement;
use crate::types::station::Station;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bon::bon;
use log::{info, warn};
use std::path::PathBuf;
use std::time::Duration;

/// Fetch-then-fallback-then-persist orchestrator.
///
/// Both operations follow the same policy:
/// 1. ask the remote service;
/// 2. on a non-empty result, write it to the snapshot and return it as
///    [`crate::DataOrigin::Remote`];
/// 3. otherwise return whatever the snapshot holds (possibly nothing) as
///    [`crate::DataOrigin::Snapshot`].
///
/// An empty remote result counts as a failure. A station that really has no
/// sensors is therefore indistinguishable from an unreachable service, and its
/// snapshot entry is left untouched.
///
/// # Examples
///
/// ```no_run
/// # use gios_air::{AirQualityError, DataService};
/// # #[tokio::main]
/// # async fn main() -> Result<(), AirQualityError> {
/// let service = DataService::new().await?;
/// let stations = service.get_stations().await;
/// if stations.is_fallback() {
///     println!("Offline mode, using cached data");
/// }
/// println!("{} stations", stations.data.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DataService {
    client: GiosClient,
    store: SnapshotStore,
}

#[bon]
impl DataService {
    /// Creates a service with every setting at its default: the public GIOS
    /// endpoint, a 10 second request timeout and the snapshot in the user's
    /// cache directory (e.g. `~/.cache/gios_air_cache` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`AirQualityError::CacheDirResolution`] if no cache directory can be
    /// determined and [`AirQualityError::CacheDirCreation`] if it cannot be created.
    pub async fn new() -> Result<Self, AirQualityError> {
        Self::builder().build().await
    }

    /// Creates a service with custom settings. Every setting is optional.
    ///
    /// * `.base_url(&str)`: root of the REST API. Defaults to [`DEFAULT_BASE_URL`].
    /// * `.snapshot_dir(PathBuf)`: directory holding the snapshot files. Created if missing.
    /// * `.request_timeout(Duration)`: per-request timeout. Defaults to 10 s.
    /// * `.max_concurrent_requests(usize)`: sensor requests in flight per station. Defaults to 4.
    /// * `.stations_file(&str)` / `.measurements_file(&str)`: snapshot file names.
    ///
    /// ```no_run
    /// # use gios_air::{AirQualityError, DataService};
    /// # use std::time::Duration;
    /// # async fn run() -> Result<(), AirQualityError> {
    /// let service = DataService::builder()
    ///     .snapshot_dir("/var/lib/gios".into())
    ///     .request_timeout(Duration::from_secs(5))
    ///     .max_concurrent_requests(1)
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = builder, finish_fn = build)]
    pub async fn from_settings(
        base_url: Option<&str>,
        snapshot_dir: Option<PathBuf>,
        request_timeout: Option<Duration>,
        max_concurrent_requests: Option<usize>,
        stations_file: Option<&str>,
        measurements_file: Option<&str>,
    ) -> Result<Self, AirQualityError> {
        let snapshot_dir = match snapshot_dir {
            Some(dir) => dir,
            None => get_cache_dir().map_err(AirQualityError::CacheDirResolution)?,
        };
        ensure_cache_dir_exists(&snapshot_dir)
            .await
            .map_err(|e| AirQualityError::CacheDirCreation(snapshot_dir.clone(), e))?;

        let client = GiosClient::new(
            base_url.unwrap_or(DEFAULT_BASE_URL),
            request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            max_concurrent_requests.unwrap_or(DEFAULT_MAX_CONCURRENT_REQUESTS),
        )?;
        let store = SnapshotStore::with_file_names(
            &snapshot_dir,
            stations_file.unwrap_or(DEFAULT_STATIONS_FILE_NAME),
            measurements_file.unwrap_or(DEFAULT_MEASUREMENTS_FILE_NAME),
        );

        info!(
            "Data service ready (api: {}, snapshot: {})",
            client.base_url(),
            snapshot_dir.display()
        );
        Ok(Self::from_parts(client, store))
    }

    /// Assembles a service from an already configured client and store.
    pub fn from_parts(client: GiosClient, store: SnapshotStore) -> Self {
        Self { client, store }
    }

    pub fn client(&self) -> &GiosClient {
        &self.client
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Returns the station catalog, live if possible and from the snapshot otherwise.
    pub async fn get_stations(&self) -> Fetched<Vec<Station>> {
        match self.client.fetch_all_stations().await {
            Ok(stations) if !stations.is_empty() => {
                if let Err(e) = self.store.save_stations(&stations).await {
                    warn!("Could not update station snapshot: {}", e);
                }
                return Fetched::remote(stations);
            }
            Ok(_) => warn!("Remote station list is empty"),
            Err(e) => warn!("Could not fetch stations ({:?}): {}", e.kind(), e),
        }

        warn!("Offline mode, using cached station list");
        let stations = match self.store.load_stations().await {
            Ok(stations) => stations,
            Err(e) => {
                warn!("No cached stations available: {}", e);
                Vec::new()
            }
        };
        Fetched::snapshot(stations)
    }

    /// Returns every measurement of every sensor of a station, live if possible
    /// and from the snapshot otherwise.
    pub async fn get_measurements_for_station(&self, station_id: i64) -> Fetched<Vec<Measurement>> {
        let measurements = self.client.fetch_all_for_station(station_id).await;
        if !measurements.is_empty() {
            if let Err(e) = self
                .store
                .save_measurements(station_id, &measurements)
                .await
            {
                warn!(
                    "Could not update measurement snapshot for station {}: {}",
                    station_id, e
                );
            }
            return Fetched::remote(measurements);
        }

        warn!(
            "Offline mode, using cached measurements for station {}",
            station_id
        );
        let measurements = match self.store.load_measurements(station_id).await {
            Ok(measurements) => measurements,
            Err(e) => {
                warn!("No cached measurements available: {}", e);
                Vec::new()
            }
        };
        Fetched::snapshot(measurements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // Nothing listens on port 9 of the loopback interface, so every request
    // fails fast with a connection error.
    const UNREACHABLE: &str = "http://127.0.0.1:9";

    async fn offline_service(dir: &TempDir) -> DataService {
        DataService::builder()
            .base_url(UNREACHABLE)
            .snapshot_dir(dir.path().to_path_buf())
            .request_timeout(Duration::from_secs(2))
            .build()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_offline_without_snapshot_is_empty_fallback() {
        let dir = TempDir::new().unwrap();
        let service = offline_service(&dir).await;

        let stations = service.get_stations().await;
        assert!(stations.is_fallback());
        assert!(stations.data.is_empty());

        let measurements = service.get_measurements_for_station(114).await;
        assert!(measurements.is_fallback());
        assert!(measurements.data.is_empty());
    }

    #[tokio::test]
    async fn test_offline_serves_snapshot() {
        let dir = TempDir::new().unwrap();
        let service = offline_service(&dir).await;
        let stations = vec![Station::new(114, "Wrocław - Bartnicza", "DOLNOŚLĄSKIE")];
        let measurements = vec![
            Measurement::new("PM10", "2024-05-01 01:00:00", 20.0),
            Measurement::new("PM10", "2024-05-01 02:00:00", 22.0),
        ];
        service.store().save_stations(&stations).await.unwrap();
        service
            .store()
            .save_measurements(114, &measurements)
            .await
            .unwrap();

        assert_eq!(service.get_stations().await, Fetched::snapshot(stations));
        assert_eq!(
            service.get_measurements_for_station(114).await,
            Fetched::snapshot(measurements)
        );
    }

    #[tokio::test]
    async fn test_builder_creates_snapshot_dir() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("nested").join("snapshots");
        let service = DataService::builder()
            .base_url(UNREACHABLE)
            .snapshot_dir(dir.clone())
            .stations_file("s.json")
            .measurements_file("m.json")
            .build()
            .await
            .unwrap();
        assert!(dir.is_dir());
        assert_eq!(service.store().stations_path(), dir.join("s.json"));
        assert_eq!(service.store().measurements_path(), dir.join("m.json"));
    }
}
