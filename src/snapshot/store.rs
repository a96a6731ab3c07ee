use crate::snapshot::error::SnapshotError;
use crate::types::measurement::Measurement;
use crate::types::station::Station;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::task;

pub const DEFAULT_STATIONS_FILE_NAME: &str = "stations.json";
pub const DEFAULT_MEASUREMENTS_FILE_NAME: &str = "dane.json";

/// Local JSON snapshot of the last successfully fetched data.
///
/// Two files live in the snapshot directory:
/// * the stations file, a JSON array of `{id, name, province}`;
/// * the measurements file, a JSON object keyed by station id (as text), each
///   value an array of `{name, date, value}`.
///
/// Both are pretty printed and fully rewritten on every save. Writes go to a
/// temporary file in the same directory which is then renamed over the target,
/// so a reader sees either the previous or the new complete file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    stations_path: PathBuf,
    measurements_path: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: &Path) -> Self {
        Self::with_file_names(dir, DEFAULT_STATIONS_FILE_NAME, DEFAULT_MEASUREMENTS_FILE_NAME)
    }

    pub fn with_file_names(dir: &Path, stations_file: &str, measurements_file: &str) -> Self {
        Self {
            stations_path: dir.join(stations_file),
            measurements_path: dir.join(measurements_file),
        }
    }

    pub fn stations_path(&self) -> &Path {
        &self.stations_path
    }

    pub fn measurements_path(&self) -> &Path {
        &self.measurements_path
    }

    /// Replaces the stored station list with `stations`.
    pub async fn save_stations(&self, stations: &[Station]) -> Result<(), SnapshotError> {
        let path = self.stations_path.clone();
        let bytes = to_pretty_json(&stations)?;
        let count = stations.len();
        task::spawn_blocking(move || write_atomic(&path, &bytes)).await??;
        info!(
            "Wrote {} stations to snapshot {}",
            count,
            self.stations_path.display()
        );
        Ok(())
    }

    /// Reads the stored station list.
    ///
    /// Returns [`SnapshotError::NotFound`] if nothing was saved yet and a decode
    /// error if the file is not a station array.
    pub async fn load_stations(&self) -> Result<Vec<Station>, SnapshotError> {
        let path = self.stations_path.clone();
        task::spawn_blocking(move || read_json::<Vec<Station>>(&path)).await?
    }

    /// Stores the measurements of one station, keeping every other station's
    /// entry already present in the file.
    ///
    /// A missing or unreadable measurements file is treated as an empty store.
    pub async fn save_measurements(
        &self,
        station_id: i64,
        measurements: &[Measurement],
    ) -> Result<(), SnapshotError> {
        let path = self.measurements_path.clone();
        let entry = serde_json::to_value(measurements).map_err(SnapshotError::CacheEncode)?;
        let count = measurements.len();

        task::spawn_blocking(move || {
            let mut all = match read_json::<Map<String, Value>>(&path) {
                Ok(all) => all,
                Err(SnapshotError::NotFound(_)) => Map::new(),
                Err(e) => {
                    warn!("Ignoring unreadable measurement snapshot: {}", e);
                    Map::new()
                }
            };
            all.insert(station_id.to_string(), entry);
            let bytes = to_pretty_json(&all)?;
            write_atomic(&path, &bytes)
        })
        .await??;

        info!(
            "Wrote {} measurements of station {} to snapshot {}",
            count,
            station_id,
            self.measurements_path.display()
        );
        Ok(())
    }

    /// Reads the stored measurements of one station.
    ///
    /// A station that has no entry yields an empty list.
    pub async fn load_measurements(&self, station_id: i64) -> Result<Vec<Measurement>, SnapshotError> {
        let path = self.measurements_path.clone();
        let mut all =
            task::spawn_blocking(move || read_json::<Map<String, Value>>(&path)).await??;

        match all.remove(&station_id.to_string()) {
            Some(entry) => serde_json::from_value(entry)
                .map_err(|e| SnapshotError::CacheDecode(self.measurements_path.clone(), e)),
            None => {
                debug!("No snapshot entry for station {}", station_id);
                Ok(Vec::new())
            }
        }
    }
}

fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, SnapshotError> {
    let mut bytes = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut bytes, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .map_err(SnapshotError::CacheEncode)?;
    Ok(bytes)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SnapshotError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(SnapshotError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(SnapshotError::CacheRead(path.to_path_buf(), e)),
    };
    serde_json::from_slice(&bytes).map_err(|e| SnapshotError::CacheDecode(path.to_path_buf(), e))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), SnapshotError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .map_err(|e| SnapshotError::CacheDirCreation(dir.to_path_buf(), e))?;

    let mut temp_file =
        NamedTempFile::new_in(dir).map_err(|e| SnapshotError::CacheWrite(path.to_path_buf(), e))?;
    temp_file
        .write_all(bytes)
        .map_err(|e| SnapshotError::CacheWrite(path.to_path_buf(), e))?;
    temp_file
        .flush()
        .map_err(|e| SnapshotError::CacheWrite(path.to_path_buf(), e))?;
    temp_file
        .persist(path)
        .map_err(|e| SnapshotError::CacheWrite(path.to_path_buf(), e.error))?;
    Ok(())
}
