//! Populate sample data use case.

use std::sync::Arc;

use crate::ApplicationResult;
use crate::ports::VehicleDataTransport;

/// Asks the backend to load its bundled sample data.
pub struct PopulateData<T: ?Sized> {
    transport: Arc<T>,
}

impl<T: VehicleDataTransport + ?Sized> PopulateData<T> {
    /// Creates a new `PopulateData` use case.
    #[must_use]
    pub const fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Triggers population on the server.
    ///
    /// # Errors
    /// Returns the transport error if the request fails. Nothing is retried.
    pub async fn execute(&self) -> ApplicationResult<()> {
        self.transport.populate().await?;
        tracing::info!("sample data populated");
        Ok(())
    }
}
