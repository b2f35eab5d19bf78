//! Export vehicle data use case.

use std::path::PathBuf;
use std::sync::Arc;

use telemetry_domain::{DomainError, ExportFormat};

use crate::ApplicationResult;
use crate::ports::{Clock, DownloadSink, VehicleDataTransport};

/// Output of a finished export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDataOutput {
    /// Name the file was delivered under.
    pub filename: String,
    /// Where the sink placed the file.
    pub location: PathBuf,
    /// Size of the payload in bytes.
    pub size: usize,
}

/// Downloads a vehicle's records from the export endpoint and hands them to
/// a [`DownloadSink`].
///
/// The payload is opaque here; it is never parsed.
pub struct ExportData<T: ?Sized, S: ?Sized, C: ?Sized> {
    transport: Arc<T>,
    sink: Arc<S>,
    clock: Arc<C>,
}

impl<T, S, C> ExportData<T, S, C>
where
    T: VehicleDataTransport + ?Sized,
    S: DownloadSink + ?Sized,
    C: Clock + ?Sized,
{
    /// Creates a new `ExportData` use case.
    #[must_use]
    pub const fn new(transport: Arc<T>, sink: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            transport,
            sink,
            clock,
        }
    }

    /// Exports every record of `vehicle_id` in `format`.
    ///
    /// # Errors
    /// - `DomainError::NoVehicleSelected` for a blank id, before any request
    /// - the transport error if the download fails
    /// - the sink error if the file cannot be delivered
    pub async fn execute(
        &self,
        vehicle_id: &str,
        format: ExportFormat,
    ) -> ApplicationResult<ExportDataOutput> {
        if vehicle_id.trim().is_empty() {
            return Err(DomainError::NoVehicleSelected.into());
        }

        let bytes = self.transport.export(vehicle_id, format).await?;
        let filename = format.filename(vehicle_id, self.clock.now());
        let location = self.sink.deliver(&filename, format, &bytes).await?;

        tracing::info!(
            vehicle_id,
            %format,
            size = bytes.len(),
            location = %location.display(),
            "export delivered"
        );

        Ok(ExportDataOutput {
            filename,
            location,
            size: bytes.len(),
        })
    }
}
