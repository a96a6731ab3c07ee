use crate::analysis::{analyze, AnalysisError, Summary};
use crate::chart::ChartSeries;
use crate::data_service::DataService;
use crate::filter::{available_metrics, filter_measurements};
use crate::types::fetched::Fetched;
use crate::types::measurement::Measurement;
use crate::types::station::Station;
use std::collections::BTreeSet;

/// The state a user-facing shell works with: the station list, the selected
/// station and that station's measurements.
///
/// Selecting a station replaces the previous measurement set wholesale.
#[derive(Debug)]
pub struct Session {
    service: DataService,
    stations: Vec<Station>,
    selected: Option<i64>,
    measurements: Vec<Measurement>,
}

impl Session {
    pub fn new(service: DataService) -> Self {
        Self {
            service,
            stations: Vec::new(),
            selected: None,
            measurements: Vec::new(),
        }
    }

    pub fn service(&self) -> &DataService {
        &self.service
    }

    /// Loads the station list and makes it the current one.
    pub async fn list_stations(&mut self) -> Fetched<&[Station]> {
        let fetched = self.service.get_stations().await;
        self.stations = fetched.data;
        Fetched {
            data: &self.stations,
            origin: fetched.origin,
        }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn station(&self, station_id: i64) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == station_id)
    }

    /// Loads the measurements of a station and makes it the selected one.
    pub async fn select_station(&mut self, station_id: i64) -> Fetched<&[Measurement]> {
        let fetched = self.service.get_measurements_for_station(station_id).await;
        self.selected = Some(station_id);
        self.measurements = fetched.data;
        Fetched {
            data: &self.measurements,
            origin: fetched.origin,
        }
    }

    pub fn selected_station_id(&self) -> Option<i64> {
        self.selected
    }

    pub fn selected_station(&self) -> Option<&Station> {
        self.selected.and_then(|id| self.station(id))
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn available_metrics(&self) -> BTreeSet<String> {
        available_metrics(&self.measurements)
    }

    pub fn filter_and_sort(
        &self,
        metric: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Vec<Measurement> {
        filter_measurements(&self.measurements, metric, start, end)
    }

    pub fn analyze(
        &self,
        metric: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Summary, AnalysisError> {
        analyze(&self.filter_and_sort(metric, start, end))
    }

    pub fn chart_series(
        &self,
        metric: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<ChartSeries, AnalysisError> {
        ChartSeries::prepare(&self.filter_and_sort(metric, start, end))
    }
}
