//! Download sink port
//!
//! Receives exported files and hands them to the user, e.g. by saving them
//! into a downloads directory.

use std::path::PathBuf;

use async_trait::async_trait;
use telemetry_domain::ExportFormat;

/// Errors that can occur while delivering a download.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No destination is available.
    #[error("no download destination available")]
    NoDestination,
}

/// Port for delivering downloaded files.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Delivers `bytes` under `filename` and returns where they ended up.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    async fn deliver(
        &self,
        filename: &str,
        format: ExportFormat,
        bytes: &[u8],
    ) -> Result<PathBuf, DownloadError>;
}
