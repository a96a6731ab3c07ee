//! Polars interop for downstream consumers that prefer tabular data.
//!
//! A measurement frame has three columns, mirroring the snapshot record:
//! `name` (str), `date` (str) and `value` (f64).

use crate::types::measurement::Measurement;
use polars::prelude::*;

pub const NAME_COLUMN: &str = "name";
pub const DATE_COLUMN: &str = "date";
pub const VALUE_COLUMN: &str = "value";

/// Builds a `DataFrame` from measurements, keeping their order.
pub fn measurements_to_frame(measurements: &[Measurement]) -> PolarsResult<DataFrame> {
    let names: Vec<&str> = measurements.iter().map(|m| m.metric.as_str()).collect();
    let dates: Vec<&str> = measurements.iter().map(|m| m.timestamp.as_str()).collect();
    let values: Vec<f64> = measurements.iter().map(|m| m.value).collect();
    df!(
        NAME_COLUMN => names,
        DATE_COLUMN => dates,
        VALUE_COLUMN => values
    )
}

/// Reads measurements back out of a measurement frame. Rows with a null in any
/// column are skipped.
pub fn frame_to_measurements(frame: &DataFrame) -> PolarsResult<Vec<Measurement>> {
    let names = frame.column(NAME_COLUMN)?.str()?;
    let dates = frame.column(DATE_COLUMN)?.str()?;
    let values = frame.column(VALUE_COLUMN)?.f64()?;

    Ok(names
        .into_iter()
        .zip(dates)
        .zip(values)
        .filter_map(|((name, date), value)| Some(Measurement::new(name?, date?, value?)))
        .collect())
}

pub trait MeasurementFrameFilterExt {
    /// Keeps the rows of `metric` whose date lies within the inclusive bounds and
    /// sorts them by date, keeping the input order of equal dates.
    ///
    /// Bounds compare as strings, exactly like [`crate::filter::filter_measurements`];
    /// `None` or an empty bound is unbounded.
    fn filter_measurements(self, metric: &str, start: Option<&str>, end: Option<&str>)
        -> LazyFrame;
}

impl MeasurementFrameFilterExt for LazyFrame {
    fn filter_measurements(
        self,
        metric: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> LazyFrame {
        let mut predicate = col(NAME_COLUMN).eq(lit(metric));
        if let Some(start) = start.filter(|s| !s.is_empty()) {
            predicate = predicate.and(col(DATE_COLUMN).gt_eq(lit(start)));
        }
        if let Some(end) = end.filter(|s| !s.is_empty()) {
            predicate = predicate.and(col(DATE_COLUMN).lt_eq(lit(end)));
        }
        self.filter(predicate).sort(
            [DATE_COLUMN],
            SortMultipleOptions::default().with_maintain_order(true),
        )
    }
}
