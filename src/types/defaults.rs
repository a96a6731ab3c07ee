//! Fallback values used when a remote payload or a stored snapshot record is
//! missing a field. Kept in one place so the defaulting policy is explicit.

/// Station id used when a record carries no id.
pub const UNKNOWN_STATION_ID: i64 = -1;

/// Station name used when a record carries no name.
pub const UNKNOWN_STATION_NAME: &str = "unknown name";

/// Province used when the nested location object carries no province name.
pub const UNKNOWN_PROVINCE: &str = "unknown province";

/// Metric name used when a sensor payload carries no `key`.
pub const UNKNOWN_METRIC: &str = "unknown metric";

pub(crate) fn unknown_station_id() -> i64 {
    UNKNOWN_STATION_ID
}

pub(crate) fn unknown_station_name() -> String {
    UNKNOWN_STATION_NAME.to_string()
}

pub(crate) fn unknown_province() -> String {
    UNKNOWN_PROVINCE.to_string()
}

pub(crate) fn unknown_metric() -> String {
    UNKNOWN_METRIC.to_string()
}
