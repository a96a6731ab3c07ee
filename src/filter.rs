//! Metric and date-range selection over a station's measurement set.
//!
//! Date bounds are compared as plain strings against the zero-padded
//! `YYYY-MM-DD HH:MM[:SS]` timestamps, so `"2024-05-01"` as a start bound
//! includes the whole day while as an end bound it excludes the whole day
//! (`"2024-05-01 00:00" > "2024-05-01"`). Pass a full timestamp to be precise.

use crate::types::measurement::Measurement;
use std::collections::BTreeSet;

/// Returns `true` if `timestamp` lies within the inclusive bounds.
/// `None` or an empty string leaves that side unbounded.
pub fn within_range(timestamp: &str, start: Option<&str>, end: Option<&str>) -> bool {
    let after_start = match start {
        Some(s) if !s.is_empty() => timestamp >= s,
        _ => true,
    };
    let before_end = match end {
        Some(e) if !e.is_empty() => timestamp <= e,
        _ => true,
    };
    after_start && before_end
}

/// Selects the measurements of `metric` whose timestamp lies within the bounds,
/// sorted ascending by timestamp.
///
/// The sort is stable: measurements with equal timestamps keep their relative
/// input order.
pub fn filter_measurements(
    measurements: &[Measurement],
    metric: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> Vec<Measurement> {
    let mut filtered: Vec<Measurement> = measurements
        .iter()
        .filter(|m| m.metric == metric && within_range(&m.timestamp, start, end))
        .cloned()
        .collect();
    filtered.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    filtered
}

/// Distinct metric names present in `measurements`, in sorted order.
pub fn available_metrics(measurements: &[Measurement]) -> BTreeSet<String> {
    measurements.iter().map(|m| m.metric.clone()).collect()
}
