//! Vehicle data transport port
//!
//! Defines the interface to the REST backend. Every failure crosses this
//! boundary as a [`TransportError`], so nothing downstream has to inspect
//! the shape of an error value.

use async_trait::async_trait;
use telemetry_domain::{ExportFormat, QueryDescriptor, RecordPage};

/// Errors a transport can report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// The request was sent but no response arrived.
    #[error("{message}")]
    Network {
        /// Description of the failure.
        message: String,
    },

    /// The transport's own timeout elapsed.
    #[error("{message}")]
    Timeout {
        /// The timeout that elapsed, in milliseconds.
        timeout_ms: u64,
        /// Description of the failure.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("server responded with status {status}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body, if it carried one.
        message: Option<String>,
    },

    /// A rejection that is not an error value at all, such as a bare status
    /// object or string. Its contents are never shown to the user.
    #[error("request rejected: {0}")]
    Rejected(serde_json::Value),
}

/// Port for the vehicle data REST backend.
///
/// Pages passed to and returned from this trait are expressed through
/// [`QueryDescriptor`], which is 1-based; implementations convert to the
/// backend's 0-based page.
#[async_trait]
pub trait VehicleDataTransport: Send + Sync {
    /// Fetches the selectable vehicle ids.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    async fn fetch_vehicle_ids(&self) -> Result<Vec<String>, TransportError>;

    /// Fetches one page of records.
    ///
    /// A successful response whose body has an unexpected shape is returned
    /// as a [`RecordPage`] with absent parts, not as an error.
    ///
    /// # Errors
    /// Returns an error if the request fails or the server rejects it.
    async fn fetch_page(&self, query: &QueryDescriptor) -> Result<RecordPage, TransportError>;

    /// Asks the server to load its sample data.
    ///
    /// # Errors
    /// Returns an error if the request fails or the server rejects it.
    async fn populate(&self) -> Result<(), TransportError>;

    /// Downloads every record of a vehicle in the given format.
    ///
    /// # Errors
    /// Returns an error if the request fails or the server rejects it.
    async fn export(
        &self,
        vehicle_id: &str,
        format: ExportFormat,
    ) -> Result<Vec<u8>, TransportError>;
}
