//! Export format types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// File formats the export endpoint can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExportFormat {
    /// JSON array of records.
    #[default]
    Json,
    /// Comma-separated values.
    Csv,
    /// Excel workbook.
    Excel,
}

impl ExportFormat {
    /// Get all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Json, Self::Csv, Self::Excel]
    }

    /// Value of the `export_type` query parameter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Csv => "CSV",
            Self::Excel => "EXCEL",
        }
    }

    /// Get the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Excel => "xlsx",
        }
    }

    /// Get the MIME type for this format.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    /// Builds the download filename for `vehicle_id` exported at `at`.
    ///
    /// The timestamp is the ISO form with `:` and `.` replaced by `-`, e.g.
    /// `vehicle_data_v1_2024-01-15T10-30-00-000Z.csv`.
    #[must_use]
    pub fn filename(&self, vehicle_id: &str, at: DateTime<Utc>) -> String {
        let stamp = at.format("%Y-%m-%dT%H-%M-%S-%3fZ");
        format!("vehicle_data_{vehicle_id}_{stamp}.{}", self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|format| format.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnsupportedExportFormat(s.to_string()))
    }
}
