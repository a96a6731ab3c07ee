pub mod analysis;
pub mod chart;
mod data_service;
mod error;
pub mod filter;
pub mod frame;
pub mod remote;
mod session;
pub mod snapshot;
mod types;
mod utils;

pub use data_service::DataService;
pub use error::AirQualityError;
pub use session::Session;

pub use analysis::{analyze, AnalysisError, Extreme, Summary, Trend};
pub use chart::ChartSeries;
pub use filter::{available_metrics, filter_measurements};
pub use frame::MeasurementFrameFilterExt;
pub use remote::client::GiosClient;
pub use remote::error::{FailureKind, RemoteError};
pub use snapshot::error::SnapshotError;
pub use snapshot::store::SnapshotStore;

pub use types::defaults;
pub use types::fetched::{DataOrigin, Fetched};
pub use types::measurement::Measurement;
pub use types::station::Station;
