//! Application error types

use telemetry_domain::DomainError;
use thiserror::Error;

use crate::ports::{DownloadError, TransportError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A downloaded file could not be delivered.
    #[error("download error: {0}")]
    Download(#[from] DownloadError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
