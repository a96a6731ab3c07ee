//! Defines the data structure representing a GIOS air-quality monitoring station
//! as it is kept in memory and written to the local station snapshot.

use crate::types::defaults::{unknown_province, unknown_station_id, unknown_station_name};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a single fixed-location air-quality monitoring station.
///
/// The `id` is the identity key of a station. A fetched list never contains two
/// stations with the same id, and a list is always replaced as a whole.
///
/// The serialized form is the one used by the station snapshot file:
/// `{"id": 114, "name": "Wrocław - Bartnicza", "province": "DOLNOŚLĄSKIE"}`.
/// Fields missing from a stored record fall back to the values in
/// [`crate::types::defaults`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Station {
    /// The GIOS station identifier. `-1` when the source did not provide one.
    #[serde(default = "unknown_station_id")]
    pub id: i64,
    /// Human readable station name (e.g. "Warszawa - Ursynów").
    #[serde(default = "unknown_station_name")]
    pub name: String,
    /// Name of the province (voivodeship) the station is located in.
    #[serde(default = "unknown_province")]
    pub province: String,
}

impl Station {
    /// Creates a new station record.
    pub fn new(id: i64, name: impl Into<String>, province: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            province: province.into(),
        }
    }

    /// Returns `true` when the station carries a real (non-negative) id.
    pub fn has_valid_id(&self) -> bool {
        self.id >= 0
    }

    /// Label used when listing stations to a user, e.g. `"Kraków - Bulwarowa (MAŁOPOLSKIE)"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.province)
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.label())
    }
}
