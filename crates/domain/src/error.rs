//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No vehicle was selected before searching or exporting.
    #[error("no vehicle selected")]
    NoVehicleSelected,

    /// A page number below 1 was requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// An export format name is not one of JSON, CSV or EXCEL.
    #[error("unsupported export format: {0}")]
    UnsupportedExportFormat(String),

    /// A sortable column name is not recognised.
    #[error("unknown column: {0}")]
    UnknownColumn(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
