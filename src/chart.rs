//! Chart-ready view of a filtered series: scaled axes, grid levels and tick
//! labels. Drawing is left to the consumer.

use crate::analysis::{AnalysisError, MIN_POINTS};
use crate::types::measurement::Measurement;

/// Number of horizontal grid intervals; there is one more grid level than this.
pub const GRID_INTERVALS: usize = 5;

/// Target number of labelled x-axis ticks.
pub const TARGET_TICKS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub timestamp: String,
    pub value: f64,
}

/// An x-axis label at a point index.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub index: usize,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub title: String,
    pub points: Vec<ChartPoint>,
    pub min_value: f64,
    pub max_value: f64,
    /// Grid values from `max_value` down to `min_value`, evenly spaced.
    pub grid_levels: Vec<f64>,
    pub ticks: Vec<Tick>,
}

impl ChartSeries {
    /// Builds the chart view of a sorted single-metric series.
    ///
    /// Fails with [`AnalysisError::InsufficientData`] for fewer than two points.
    pub fn prepare(measurements: &[Measurement]) -> Result<Self, AnalysisError> {
        let (first, last) = match measurements {
            [first, .., last] => (first, last),
            _ => {
                return Err(AnalysisError::InsufficientData {
                    required: MIN_POINTS,
                    found: measurements.len(),
                })
            }
        };

        let (min_value, max_value) = measurements.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), m| (lo.min(m.value), hi.max(m.value)),
        );

        let step = (max_value - min_value) / GRID_INTERVALS as f64;
        let grid_levels = (0..=GRID_INTERVALS)
            .map(|i| max_value - i as f64 * step)
            .collect();

        let count = measurements.len();
        let tick_every = if count > TARGET_TICKS {
            count / TARGET_TICKS
        } else {
            1
        };
        let ticks = measurements
            .iter()
            .enumerate()
            .step_by(tick_every)
            .map(|(index, m)| Tick {
                index,
                label: m.time_of_day().unwrap_or(&m.timestamp).to_string(),
            })
            .collect();

        Ok(Self {
            title: format!("{} [{} - {}]", first.metric, first.timestamp, last.timestamp),
            points: measurements
                .iter()
                .map(|m| ChartPoint {
                    timestamp: m.timestamp.clone(),
                    value: m.value,
                })
                .collect(),
            min_value,
            max_value,
            grid_levels,
            ticks,
        })
    }

    /// Position of `value` between the axis bounds, `0.0` at the minimum and
    /// `1.0` at the maximum. A flat series maps everything to `0.0`.
    pub fn normalized(&self, value: f64) -> f64 {
        let span = self.max_value - self.min_value;
        if span == 0.0 {
            0.0
        } else {
            (value - self.min_value) / span
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hourly(values: &[f64]) -> Vec<Measurement> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Measurement::new("NO2", format!("2024-05-01 {:02}:00:00", i), *v))
            .collect()
    }

    #[test]
    fn test_requires_two_points() {
        assert!(matches!(
            ChartSeries::prepare(&hourly(&[3.0])),
            Err(AnalysisError::InsufficientData { found: 1, .. })
        ));
    }

    #[test]
    fn test_axes_and_title() {
        let chart = ChartSeries::prepare(&hourly(&[10.0, 60.0, 35.0])).unwrap();
        assert_eq!(chart.title, "NO2 [2024-05-01 00:00:00 - 2024-05-01 02:00:00]");
        assert_eq!(chart.min_value, 10.0);
        assert_eq!(chart.max_value, 60.0);
        assert_eq!(chart.grid_levels, vec![60.0, 50.0, 40.0, 30.0, 20.0, 10.0]);
        assert_eq!(chart.normalized(35.0), 0.5);
        assert_eq!(chart.points.len(), 3);
    }

    #[test]
    fn test_every_point_labelled_for_short_series() {
        let chart = ChartSeries::prepare(&hourly(&[1.0, 2.0, 3.0])).unwrap();
        let labels: Vec<&str> = chart.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["00:00", "01:00", "02:00"]);
    }

    #[test]
    fn test_ticks_thinned_for_long_series() {
        let values: Vec<f64> = (0..24).map(f64::from).collect();
        let chart = ChartSeries::prepare(&hourly(&values)).unwrap();
        let indices: Vec<usize> = chart.ticks.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![0, 2, 4, 6, 8, 10, 12, 14, 16, 18, 20, 22]);
    }

    #[test]
    fn test_flat_series() {
        let chart = ChartSeries::prepare(&hourly(&[5.0, 5.0])).unwrap();
        assert_eq!(chart.normalized(5.0), 0.0);
        assert!(chart.grid_levels.iter().all(|v| *v == 5.0));
    }
}
