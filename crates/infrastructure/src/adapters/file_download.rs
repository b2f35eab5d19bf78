//! Download sink that saves exports into a directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use telemetry_application::ports::{DownloadError, DownloadSink};
use telemetry_domain::ExportFormat;

/// Writes exported files into a target directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct FileDownloadSink {
    directory: PathBuf,
}

impl FileDownloadSink {
    /// Creates a sink writing into `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Directory files are written to.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

#[async_trait]
impl DownloadSink for FileDownloadSink {
    async fn deliver(
        &self,
        filename: &str,
        format: ExportFormat,
        bytes: &[u8],
    ) -> Result<PathBuf, DownloadError> {
        // Only the final component is kept so a filename cannot escape the directory.
        let name = Path::new(filename)
            .file_name()
            .ok_or(DownloadError::NoDestination)?;
        let path = self.directory.join(name);

        tokio::fs::create_dir_all(&self.directory).await?;
        tokio::fs::write(&path, bytes).await?;

        tracing::info!(
            path = %path.display(),
            mime = format.mime_type(),
            size = bytes.len(),
            "download saved"
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_deliver_creates_directory() {
        let temp = TempDir::new().expect("temp dir");
        let sink = FileDownloadSink::new(temp.path().join("nested").join("exports"));

        let path = sink
            .deliver("vehicle_data_v1.csv", ExportFormat::Csv, b"id\n1\n")
            .await
            .expect("file written");

        assert_eq!(path, sink.directory().join("vehicle_data_v1.csv"));
        let written = tokio::fs::read(&path).await.expect("file readable");
        assert_eq!(written, b"id\n1\n".to_vec());
    }

    #[tokio::test]
    async fn test_deliver_strips_directories_from_name() {
        let temp = TempDir::new().expect("temp dir");
        let sink = FileDownloadSink::new(temp.path());

        let path = sink
            .deliver("../escape.json", ExportFormat::Json, b"[]")
            .await
            .expect("file written");

        assert_eq!(path, temp.path().join("escape.json"));
    }

    #[tokio::test]
    async fn test_empty_name_has_no_destination() {
        let temp = TempDir::new().expect("temp dir");
        let sink = FileDownloadSink::new(temp.path());

        let result = sink.deliver("..", ExportFormat::Json, b"[]").await;

        assert!(matches!(result, Err(DownloadError::NoDestination)));
    }
}
