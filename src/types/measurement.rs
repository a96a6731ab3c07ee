//! Defines a single timestamped measurement of one metric, as produced by the
//! remote sensor endpoint and as written to the measurement snapshot.

use crate::types::defaults::unknown_metric;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// One timestamped value of one metric (pollutant) from one sensor.
///
/// Timestamps are kept as text in the fixed-width `YYYY-MM-DD HH:MM[:SS]` form the
/// service returns. Because the form is zero padded, plain string ordering is
/// chronological ordering; filtering and sorting rely on that.
///
/// The serialized form matches the measurement snapshot file:
/// `{"name": "PM10", "date": "2024-05-01 13:00:00", "value": 21.4}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Measurement {
    /// Metric name, e.g. `"PM10"` or `"NO2"`.
    #[serde(rename = "name", default = "unknown_metric")]
    pub metric: String,
    /// Timestamp of the measurement.
    #[serde(rename = "date")]
    pub timestamp: String,
    /// Measured value (µg/m³ for the pollutants served by GIOS).
    pub value: f64,
}

impl Measurement {
    pub fn new(metric: impl Into<String>, timestamp: impl Into<String>, value: f64) -> Self {
        Self {
            metric: metric.into(),
            timestamp: timestamp.into(),
            value,
        }
    }

    /// Parses the timestamp, accepting both the minute and the second precision forms.
    ///
    /// Returns `None` if the text is not in one of those forms.
    pub fn datetime(&self) -> Option<NaiveDateTime> {
        TIMESTAMP_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(&self.timestamp, fmt).ok())
    }

    /// The `HH:MM` part of the timestamp, if present.
    pub fn time_of_day(&self) -> Option<&str> {
        self.timestamp.get(11..16)
    }
}
