//! User-facing message catalogue.

/// Shown when a search or export is attempted without a vehicle.
pub const NO_VEHICLE_SELECTED: &str = "Please select a vehicle";
/// Shown when the selected date range is inverted.
pub const INVALID_DATE_RANGE: &str = "End date must be after start date";
/// No response was received from the server.
pub const NETWORK: &str = "Network error. Please check your connection.";
/// The transport gave up waiting.
pub const TIMEOUT: &str = "Request timed out. Please try again.";
/// Fallback for the vehicle id load.
pub const FAILED_TO_LOAD_VEHICLES: &str = "Failed to load vehicle IDs";
/// Fallback for the data search.
pub const FAILED_TO_LOAD_DATA: &str = "Failed to load vehicle data";
/// Fallback for sample data population.
pub const FAILED_TO_POPULATE: &str = "Failed to populate database with sample data";
/// Fallback for export.
pub const FAILED_TO_EXPORT: &str = "Failed to export vehicle data";
/// Population finished.
pub const DATA_POPULATED: &str = "Database populated successfully";
/// Export finished.
pub const DATA_EXPORTED: &str = "Data exported successfully";
/// Placeholder for absent values in the results table.
pub const NOT_AVAILABLE: &str = "N/A";
