//! Telemetry record types.
//!
//! A [`VehicleRecord`] is one telemetry sample as delivered by the data
//! endpoint. Timestamps are parsed once when the record is deserialized so
//! that sorting and display never have to sniff string shapes.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::messages;
use crate::sort::SortColumn;

/// Naive layouts accepted when the timestamp carries no offset.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// An ISO-8601 timestamp as received, together with its parsed instant.
///
/// Values without an offset are interpreted as UTC. Unparseable values keep
/// their raw text and report no instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Timestamp {
    raw: String,
    instant: Option<DateTime<Utc>>,
}

impl Timestamp {
    /// Parses a timestamp string.
    #[must_use]
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let instant = parse_instant(&raw);
        Self { raw, instant }
    }

    /// Returns the text exactly as received.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the parsed instant, if the text was a recognised timestamp.
    #[must_use]
    pub const fn instant(&self) -> Option<DateTime<Utc>> {
        self.instant
    }
}

impl From<String> for Timestamp {
    fn from(raw: String) -> Self {
        Self::parse(raw)
    }
}

impl From<Timestamp> for String {
    fn from(timestamp: Timestamp) -> Self {
        timestamp.raw
    }
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .map(|naive| naive.and_utc())
}

/// One telemetry sample for a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    /// Server-assigned identifier, unique per record.
    pub id: i64,
    /// When the sample was taken.
    pub timestamp: Timestamp,
    /// Speed in mph, absent when the vehicle did not report one.
    #[serde(default)]
    pub speed: Option<f64>,
    /// Odometer reading. The backend serializes it as a float.
    pub odometer: f64,
    /// State of charge, 0 to 100.
    pub soc: i64,
    /// Elevation in feet.
    pub elevation: f64,
    /// Gear selector position (P, R, N, D, ...).
    #[serde(default)]
    pub shift_state: Option<String>,
}

impl VehicleRecord {
    /// Returns the typed value of a column for display and filtering.
    #[must_use]
    pub fn field(&self, column: SortColumn) -> FieldValue<'_> {
        match column {
            SortColumn::Id => FieldValue::Integer(self.id),
            SortColumn::Timestamp => FieldValue::Timestamp(&self.timestamp),
            SortColumn::Speed => self.speed.map_or(FieldValue::Null, FieldValue::Number),
            SortColumn::Odometer => FieldValue::Number(self.odometer),
            SortColumn::Soc => FieldValue::Integer(self.soc),
            SortColumn::Elevation => FieldValue::Number(self.elevation),
            SortColumn::ShiftState => self
                .shift_state
                .as_deref()
                .map_or(FieldValue::Null, FieldValue::Text),
        }
    }

    /// Returns true if any present field contains `needle` (already lowercased).
    fn contains_lowercase(&self, needle: &str) -> bool {
        SortColumn::all().iter().any(|&column| {
            let haystack = match self.field(column) {
                FieldValue::Null => return false,
                FieldValue::Timestamp(ts) => ts.as_str().to_lowercase(),
                other => other.to_string().to_lowercase(),
            };
            haystack.contains(needle)
        })
    }
}

/// A column value tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// Whole number.
    Integer(i64),
    /// Floating point number.
    Number(f64),
    /// ISO-8601 timestamp.
    Timestamp(&'a Timestamp),
    /// Free text.
    Text(&'a str),
    /// Absent value.
    Null,
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Timestamp(ts) => match ts.instant() {
                Some(instant) => write!(f, "{}", instant.format("%Y-%m-%d %H:%M:%S")),
                None => f.write_str(ts.as_str()),
            },
            Self::Text(text) => f.write_str(text),
            Self::Null => f.write_str(messages::NOT_AVAILABLE),
        }
    }
}

/// Keeps the records that mention `term` in any column, case-insensitively.
///
/// A blank term keeps everything.
#[must_use]
pub fn filter_records(records: &[VehicleRecord], term: &str) -> Vec<VehicleRecord> {
    let term = term.trim();
    if term.is_empty() {
        return records.to_vec();
    }
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|record| record.contains_lowercase(&needle))
        .cloned()
        .collect()
}

/// Decoded body of the data endpoint.
///
/// Both fields are optional: the payload is decoded leniently and any part
/// with an unexpected shape is reported as absent rather than as an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPage {
    /// Records on the requested page.
    pub data: Option<Vec<VehicleRecord>>,
    /// Total number of records matching the filter.
    pub count: Option<u64>,
}

impl RecordPage {
    /// Creates a well-formed page.
    #[must_use]
    pub const fn new(data: Vec<VehicleRecord>, count: u64) -> Self {
        Self {
            data: Some(data),
            count: Some(count),
        }
    }

    /// Decodes a JSON payload, degrading unexpected shapes to absent fields.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };
        let data = match map.remove("data") {
            Some(Value::Array(items)) => Some(decode_records(items)),
            _ => None,
        };
        let count = map.get("count").and_then(Value::as_u64);
        Self { data, count }
    }

    /// Returns true if both `data` and `count` were present and well-typed.
    #[must_use]
    pub const fn is_well_formed(&self) -> bool {
        self.data.is_some() && self.count.is_some()
    }

    /// Splits into records and total count, defaulting absent parts.
    #[must_use]
    pub fn into_parts(self) -> (Vec<VehicleRecord>, u64) {
        (self.data.unwrap_or_default(), self.count.unwrap_or(0))
    }
}

/// Decodes each element on its own; records that do not parse are skipped.
fn decode_records(items: Vec<Value>) -> Vec<VehicleRecord> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(error) => {
                tracing::warn!(index, %error, "skipping record with unexpected shape");
                None
            }
        })
        .collect()
}
