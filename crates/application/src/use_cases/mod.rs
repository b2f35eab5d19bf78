//! Application use cases (business logic orchestration).

mod export_data;
mod populate_data;

pub use export_data::{ExportData, ExportDataOutput};
pub use populate_data::PopulateData;
