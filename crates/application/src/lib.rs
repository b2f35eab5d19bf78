//! Telemetry Application - Sessions, use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits for the backend transport, downloads and time
//! - The search and vehicle-id sessions that own observable state
//! - Error classification into user-facing messages
//! - The dashboard orchestrator tying them together

pub mod dashboard;
pub mod error;
pub mod error_classifier;
pub mod ports;
pub mod search_session;
pub mod use_cases;
pub mod vehicle_id_session;

pub use dashboard::Dashboard;
pub use error::{ApplicationError, ApplicationResult};
pub use error_classifier::{ClassifiedError, ErrorClassifier, Operation};
pub use ports::{Clock, DownloadError, DownloadSink, TransportError, VehicleDataTransport};
pub use search_session::{ResponseOrdering, SearchSession};
pub use use_cases::{ExportData, ExportDataOutput, PopulateData};
pub use vehicle_id_session::VehicleIdSession;
