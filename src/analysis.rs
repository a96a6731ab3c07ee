//! Descriptive statistics over a chronologically sorted measurement series.

use crate::types::measurement::Measurement;
use std::fmt;
use thiserror::Error;

/// Fewest points [`analyze`] and [`crate::chart::ChartSeries::prepare`] accept.
pub const MIN_POINTS: usize = 2;

const UNIT: &str = "µg/m³";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Not enough data: need at least {required} measurements, got {found}")]
    InsufficientData { required: usize, found: usize },
}

/// Direction of a series, from its first to its last value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Rising,
    Falling,
    Flat,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Flat => "no change",
        };
        f.write_str(s)
    }
}

/// A value together with the timestamp it was recorded at.
#[derive(Debug, Clone, PartialEq)]
pub struct Extreme {
    pub value: f64,
    pub timestamp: String,
}

/// Summary statistics of a single-metric series.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub metric: String,
    pub count: usize,
    pub mean: f64,
    pub min: Extreme,
    pub max: Extreme,
    pub trend: Trend,
    /// Timestamp of the first measurement (start of the covered range).
    pub first_timestamp: String,
    /// Timestamp of the last measurement (end of the covered range).
    pub last_timestamp: String,
}

/// Computes mean, extremes and trend of `measurements`.
///
/// Expects the output of [`crate::filter::filter_measurements`]: sorted by
/// timestamp and holding a single metric. Ties for the minimum or maximum are
/// resolved to the first occurrence.
pub fn analyze(measurements: &[Measurement]) -> Result<Summary, AnalysisError> {
    let (first, last) = match measurements {
        [first, .., last] => (first, last),
        _ => {
            return Err(AnalysisError::InsufficientData {
                required: MIN_POINTS,
                found: measurements.len(),
            })
        }
    };

    let mut sum = 0.0;
    let mut min = first;
    let mut max = first;
    for m in measurements {
        sum += m.value;
        if m.value < min.value {
            min = m;
        }
        if m.value > max.value {
            max = m;
        }
    }

    let trend = if first.value < last.value {
        Trend::Rising
    } else if first.value > last.value {
        Trend::Falling
    } else {
        Trend::Flat
    };

    Ok(Summary {
        metric: first.metric.clone(),
        count: measurements.len(),
        mean: sum / measurements.len() as f64,
        min: Extreme {
            value: min.value,
            timestamp: min.timestamp.clone(),
        },
        max: Extreme {
            value: max.value,
            timestamp: max.timestamp.clone(),
        },
        trend,
        first_timestamp: first.timestamp.clone(),
        last_timestamp: last.timestamp.clone(),
    })
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis - {}", self.metric)?;
        writeln!(f, "Range: {} - {}", self.first_timestamp, self.last_timestamp)?;
        writeln!(f, "Mean: {:.2} {}", self.mean, UNIT)?;
        writeln!(f, "Min: {:.2} ({})", self.min.value, self.min.timestamp)?;
        writeln!(f, "Max: {:.2} ({})", self.max.value, self.max.timestamp)?;
        write!(f, "Trend: {}", self.trend)
    }
}
