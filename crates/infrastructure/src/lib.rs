//! Telemetry Infrastructure - Adapters and configuration
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading.

pub mod adapters;
pub mod settings;

pub use adapters::{FileDownloadSink, ReqwestVehicleTransport, SystemClock};
pub use settings::{
    ApiConfig, ConfigError, DashboardConfig, DownloadConfig, EndpointConfig, SearchConfig,
};
