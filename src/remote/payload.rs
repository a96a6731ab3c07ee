//! Raw response shapes of the GIOS REST endpoints and their conversion into
//! [`Station`]s, sensor ids and [`Measurement`]s.
//!
//! Every field is optional on the wire. Missing values are replaced using the
//! constants in [`crate::types::defaults`]; a payload whose overall shape is
//! wrong (e.g. an object where an array is expected) fails to decode instead.

use crate::types::defaults::{
    UNKNOWN_METRIC, UNKNOWN_PROVINCE, UNKNOWN_STATION_ID, UNKNOWN_STATION_NAME,
};
use crate::types::measurement::Measurement;
use crate::types::station::Station;
use log::debug;
use serde::Deserialize;

/// Element of `GET /station/findAll`.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawStation {
    pub id: Option<i64>,
    pub station_name: Option<String>,
    pub city: Option<RawCity>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawCity {
    pub commune: Option<RawCommune>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawCommune {
    pub province_name: Option<String>,
}

/// Element of `GET /station/sensors/{id}`.
#[derive(Debug, Deserialize)]
pub struct RawSensor {
    pub id: Option<i64>,
}

/// Body of `GET /data/getData/{id}`.
#[derive(Debug, Deserialize)]
pub struct RawSensorData {
    pub key: Option<String>,
    #[serde(default)]
    pub values: Vec<RawValue>,
}

#[derive(Debug, Deserialize)]
pub struct RawValue {
    pub date: Option<String>,
    pub value: Option<f64>,
}

impl From<RawStation> for Station {
    fn from(raw: RawStation) -> Self {
        let province = raw
            .city
            .and_then(|city| city.commune)
            .and_then(|commune| commune.province_name);
        Station {
            id: raw.id.unwrap_or(UNKNOWN_STATION_ID),
            name: raw
                .station_name
                .unwrap_or_else(|| UNKNOWN_STATION_NAME.to_string()),
            province: province.unwrap_or_else(|| UNKNOWN_PROVINCE.to_string()),
        }
    }
}

pub fn into_stations(raw: Vec<RawStation>) -> Vec<Station> {
    raw.into_iter().map(Station::from).collect()
}

pub fn into_sensor_ids(raw: Vec<RawSensor>) -> Vec<i64> {
    raw.into_iter()
        .filter_map(|sensor| {
            if sensor.id.is_none() {
                debug!("Skipping sensor without id");
            }
            sensor.id
        })
        .collect()
}

impl RawSensorData {
    /// Converts the payload into measurements labelled with the sensor's metric.
    /// Entries with a null value (or no date) are dropped, order is preserved.
    pub fn into_measurements(self) -> Vec<Measurement> {
        let metric = self.key.unwrap_or_else(|| UNKNOWN_METRIC.to_string());
        let total = self.values.len();
        let measurements: Vec<Measurement> = self
            .values
            .into_iter()
            .filter_map(|entry| match (entry.date, entry.value) {
                (Some(date), Some(value)) => Some(Measurement::new(metric.clone(), date, value)),
                _ => None,
            })
            .collect();
        if measurements.len() < total {
            debug!(
                "Dropped {} of {} {} entries without a value",
                total - measurements.len(),
                total,
                metric
            );
        }
        measurements
    }
}
