//! Telemetry Domain - Core business types
//!
//! This crate defines the domain model for the vehicle telemetry dashboard.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod export;
pub mod form;
pub mod messages;
pub mod pagination;
pub mod query;
pub mod record;
pub mod sort;
pub mod state;

pub use error::{DomainError, DomainResult};
pub use export::ExportFormat;
pub use form::FormState;
pub use pagination::{ItemRange, MAX_VISIBLE_PAGES, PAGE_SIZE, PageNavigation, PaginationView};
pub use query::{QueryDescriptor, RequestBuilder};
pub use record::{FieldValue, RecordPage, Timestamp, VehicleRecord, filter_records};
pub use sort::{SortColumn, SortDirection, SortSpec, sort_records};
pub use state::{ActionState, SearchErrorKind, SearchState, VehicleIdState};
