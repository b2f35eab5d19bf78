//! Telemetry Dashboard - Main Entry Point
//!
//! Headless client: loads configuration, lists the vehicles and, when a
//! vehicle id is given, prints one page of its records.
//!
//! Usage: `telemetry-dashboard [VEHICLE_ID] [PAGE]`

use std::sync::Arc;

use telemetry_application::Dashboard;
use telemetry_domain::{PageNavigation, SearchState, SortColumn, VehicleIdState};
use telemetry_infrastructure::{
    DashboardConfig, FileDownloadSink, ReqwestVehicleTransport, SystemClock,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const COLUMN_WIDTH: usize = 20;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = DashboardConfig::load()?;
    tracing::info!(
        base_url = %config.api.base_url,
        "Starting telemetry dashboard v{}",
        env!("CARGO_PKG_VERSION")
    );

    let mut args = std::env::args().skip(1);
    let vehicle_id = args.next();
    let page = args.next().map(|raw| raw.parse::<u32>()).transpose()?;

    let transport = Arc::new(ReqwestVehicleTransport::new(&config.api)?);
    let sink = Arc::new(FileDownloadSink::new(config.downloads.resolve_directory()));
    let mut dashboard = Dashboard::with_ordering(
        transport,
        sink,
        Arc::new(SystemClock::new()),
        config.search.response_ordering,
    );

    dashboard.mount().await;
    print_vehicle_ids(&dashboard.vehicle_id_state());

    let Some(vehicle_id) = vehicle_id else {
        return Ok(());
    };

    dashboard.select_vehicle(vehicle_id);
    dashboard.submit().await;
    if let Some(page) = page.filter(|page| *page != 1)
        && !dashboard.navigate(PageNavigation::Page(page)).await
    {
        eprintln!("Page {page} is out of range");
    }

    print_results(&dashboard);
    Ok(())
}

fn print_vehicle_ids(state: &VehicleIdState) {
    match state {
        VehicleIdState::Ready { ids } => {
            println!("Vehicles ({}):", ids.len());
            for id in ids {
                println!("  {id}");
            }
        }
        VehicleIdState::Failed { message } => eprintln!("{message}"),
        VehicleIdState::Loading => {}
    }
}

fn print_results(dashboard: &Dashboard) {
    match dashboard.search_state() {
        SearchState::Success { .. } => {
            let records = dashboard.visible_records();
            if records.is_empty() {
                println!("No data found");
                return;
            }

            let header: String = SortColumn::all()
                .iter()
                .map(|column| format!("{:<COLUMN_WIDTH$}", column.header()))
                .collect();
            println!("{}", header.trim_end());

            for record in &records {
                let row: String = SortColumn::all()
                    .iter()
                    .map(|column| format!("{:<COLUMN_WIDTH$}", record.field(*column).to_string()))
                    .collect();
                println!("{}", row.trim_end());
            }

            if let Some(range) = dashboard.item_range() {
                println!();
                println!("{range}");
            }
            let pagination = dashboard.pagination();
            if pagination.has_controls() {
                println!(
                    "Page {} of {}",
                    pagination.current_page, pagination.total_pages
                );
            }
        }
        SearchState::Error { kind, message } => {
            eprintln!("{}: {message}", kind.title());
            for suggestion in kind.suggestions() {
                eprintln!("  - {suggestion}");
            }
        }
        SearchState::Idle | SearchState::Loading { .. } => {}
    }
}
