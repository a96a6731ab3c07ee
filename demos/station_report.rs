use gios_air::{AirQualityError, AnalysisError, DataService, Session};
use std::env;

/// Usage: station_report [STATION_ID] [METRIC] [START] [END]
///
/// Lists the stations, selects one (the first by default), and prints an
/// analysis of one of its metrics.
#[tokio::main]
async fn main() -> Result<(), AirQualityError> {
    env_logger::init();
    let args: Vec<String> = env::args().skip(1).collect();

    let mut session = Session::new(DataService::new().await?);

    let stations = session.list_stations().await;
    if stations.is_fallback() {
        println!("Offline mode, using cached data.");
    }
    println!("{} stations available", stations.data.len());

    let station_id = match args.first().and_then(|s| s.parse::<i64>().ok()) {
        Some(id) => id,
        None => match session.stations().first() {
            Some(station) => station.id,
            None => {
                println!("No stations available.");
                return Ok(());
            }
        },
    };
    if let Some(station) = session.station(station_id) {
        println!("Station: {}", station.label());
    }

    if session.select_station(station_id).await.is_fallback() {
        println!("Offline mode, using cached data.");
    }
    let metrics = session.available_metrics();
    println!(
        "Metrics: {}",
        metrics.iter().cloned().collect::<Vec<_>>().join(", ")
    );

    let Some(metric) = args.get(1).cloned().or_else(|| metrics.into_iter().next()) else {
        println!("No measurements for station {}.", station_id);
        return Ok(());
    };
    let start = args.get(2).map(String::as_str);
    let end = args.get(3).map(String::as_str);

    match session.analyze(&metric, start, end) {
        Ok(summary) => println!("\n{}", summary),
        Err(AnalysisError::InsufficientData { .. }) => println!("Not enough data to analyze."),
    }
    if let Ok(chart) = session.chart_series(&metric, start, end) {
        println!("\n{} ({} points)", chart.title, chart.points.len());
    }
    Ok(())
}
