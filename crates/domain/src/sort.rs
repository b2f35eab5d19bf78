//! In-memory sorting of the displayed page.
//!
//! Sorting only ever reorders the records already on screen; it never
//! triggers a request. Absent values always end up at the bottom of the
//! table, whichever way the arrow points.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::record::VehicleRecord;

/// The seven sortable columns of the results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    /// Record identifier.
    Id,
    /// Sample time.
    Timestamp,
    /// Speed in mph.
    Speed,
    /// Odometer reading.
    Odometer,
    /// State of charge.
    Soc,
    /// Elevation in feet.
    Elevation,
    /// Gear selector position.
    ShiftState,
}

impl SortColumn {
    /// All columns in table order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Id,
            Self::Timestamp,
            Self::Speed,
            Self::Odometer,
            Self::Soc,
            Self::Elevation,
            Self::ShiftState,
        ]
    }

    /// Column header text.
    #[must_use]
    pub const fn header(&self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Timestamp => "Timestamp",
            Self::Speed => "Speed (mph)",
            Self::Odometer => "Odometer",
            Self::Soc => "SOC (%)",
            Self::Elevation => "Elevation (ft)",
            Self::ShiftState => "Shift State",
        }
    }

    /// Wire name of the column.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Timestamp => "timestamp",
            Self::Speed => "speed",
            Self::Odometer => "odometer",
            Self::Soc => "soc",
            Self::Elevation => "elevation",
            Self::ShiftState => "shift_state",
        }
    }
}

impl FromStr for SortColumn {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|column| column.as_str() == s)
            .ok_or_else(|| DomainError::UnknownColumn(s.to_string()))
    }
}

/// Direction of an active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// The active column and direction, or no sort at all.
///
/// Having no column and having no direction are the same state, so they are
/// represented by a single variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "sort", rename_all = "snake_case")]
pub enum SortSpec {
    /// Records keep the order the server returned.
    #[default]
    Unsorted,
    /// Records are ordered by `column`.
    Sorted {
        /// Column being compared.
        column: SortColumn,
        /// Direction of the comparison.
        direction: SortDirection,
    },
}

impl SortSpec {
    /// Creates an ascending sort on `column`.
    #[must_use]
    pub const fn ascending(column: SortColumn) -> Self {
        Self::Sorted {
            column,
            direction: SortDirection::Ascending,
        }
    }

    /// Creates a descending sort on `column`.
    #[must_use]
    pub const fn descending(column: SortColumn) -> Self {
        Self::Sorted {
            column,
            direction: SortDirection::Descending,
        }
    }

    /// Returns the active column.
    #[must_use]
    pub const fn column(&self) -> Option<SortColumn> {
        match self {
            Self::Unsorted => None,
            Self::Sorted { column, .. } => Some(*column),
        }
    }

    /// Returns the active direction.
    #[must_use]
    pub const fn direction(&self) -> Option<SortDirection> {
        match self {
            Self::Unsorted => None,
            Self::Sorted { direction, .. } => Some(*direction),
        }
    }

    /// Returns the spec after a click on the header of `column`.
    ///
    /// The same column cycles ascending, descending, unsorted. Any other
    /// column starts again at ascending.
    #[must_use]
    pub fn toggle(self, column: SortColumn) -> Self {
        match self {
            Self::Sorted {
                column: current,
                direction,
            } if current == column => match direction {
                SortDirection::Ascending => Self::descending(column),
                SortDirection::Descending => Self::Unsorted,
            },
            _ => Self::ascending(column),
        }
    }
}

/// Orders `records` according to `spec`.
///
/// The sort is stable, so records with equal keys keep their relative order.
/// An unsorted spec returns the input untouched without copying.
#[must_use]
pub fn sort_records(records: &[VehicleRecord], spec: SortSpec) -> Cow<'_, [VehicleRecord]> {
    let SortSpec::Sorted { column, direction } = spec else {
        return Cow::Borrowed(records);
    };
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| compare(a, b, column, direction));
    Cow::Owned(sorted)
}

fn compare(
    a: &VehicleRecord,
    b: &VehicleRecord,
    column: SortColumn,
    direction: SortDirection,
) -> Ordering {
    match column {
        SortColumn::Id => nulls_last(Some(a.id), Some(b.id), direction, Ord::cmp),
        SortColumn::Timestamp => nulls_last(
            a.timestamp.instant(),
            b.timestamp.instant(),
            direction,
            Ord::cmp,
        ),
        SortColumn::Speed => nulls_last(a.speed, b.speed, direction, f64::total_cmp),
        SortColumn::Odometer => {
            nulls_last(Some(a.odometer), Some(b.odometer), direction, f64::total_cmp)
        }
        SortColumn::Soc => nulls_last(Some(a.soc), Some(b.soc), direction, Ord::cmp),
        SortColumn::Elevation => nulls_last(
            Some(a.elevation),
            Some(b.elevation),
            direction,
            f64::total_cmp,
        ),
        SortColumn::ShiftState => nulls_last(
            a.shift_state.as_deref().map(str::to_lowercase),
            b.shift_state.as_deref().map(str::to_lowercase),
            direction,
            Ord::cmp,
        ),
    }
}

/// Compares two optional keys, placing absent keys after present ones in
/// either direction.
fn nulls_last<T>(
    a: Option<T>,
    b: Option<T>,
    direction: SortDirection,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => direction.apply(cmp(&x, &y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Timestamp;
    use pretty_assertions::assert_eq;

    fn record(id: i64, timestamp: &str, speed: Option<f64>, shift: Option<&str>) -> VehicleRecord {
        VehicleRecord {
            id,
            timestamp: Timestamp::parse(timestamp),
            speed,
            odometer: 12_000.0 + id as f64,
            soc: 80,
            elevation: 100.0,
            shift_state: shift.map(str::to_string),
        }
    }

    fn ids(records: &[VehicleRecord]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_toggle_cycles_same_column() {
        let spec = SortSpec::default();
        let spec = spec.toggle(SortColumn::Odometer);
        assert_eq!(spec, SortSpec::ascending(SortColumn::Odometer));
        let spec = spec.toggle(SortColumn::Odometer);
        assert_eq!(spec, SortSpec::descending(SortColumn::Odometer));
        let spec = spec.toggle(SortColumn::Odometer);
        assert_eq!(spec, SortSpec::Unsorted);
        assert_eq!(spec.column(), None);
        assert_eq!(spec.direction(), None);
    }

    #[test]
    fn test_toggle_other_column_resets_to_ascending() {
        let spec = SortSpec::descending(SortColumn::Speed).toggle(SortColumn::Soc);
        assert_eq!(spec, SortSpec::ascending(SortColumn::Soc));
    }

    #[test]
    fn test_unsorted_is_identity_without_copy() {
        let records = vec![record(3, "2023-01-01T10:00:00Z", None, None)];
        let sorted = sort_records(&records, SortSpec::Unsorted);
        assert!(matches!(sorted, Cow::Borrowed(_)));
        assert_eq!(ids(&sorted), vec![3]);
    }

    #[test]
    fn test_absent_speed_sorts_last_in_both_directions() {
        let records = vec![
            record(1, "2023-01-01T10:00:00Z", Some(25.5), Some("D")),
            record(2, "2023-01-01T10:01:00Z", Some(30.2), Some("D")),
            record(3, "2023-01-01T10:02:00Z", None, Some("P")),
        ];

        let asc = sort_records(&records, SortSpec::ascending(SortColumn::Speed));
        assert_eq!(ids(&asc), vec![1, 2, 3]);

        let desc = sort_records(&records, SortSpec::descending(SortColumn::Speed));
        assert_eq!(ids(&desc), vec![2, 1, 3]);
    }

    #[test]
    fn test_timestamps_compare_by_instant_not_text() {
        let records = vec![
            record(1, "2023-01-01T12:00:00+02:00", None, None),
            record(2, "2023-01-01T11:00:00Z", None, None),
        ];
        // 12:00+02:00 is 10:00Z, which precedes 11:00Z despite sorting later as text.
        let asc = sort_records(&records, SortSpec::ascending(SortColumn::Timestamp));
        assert_eq!(ids(&asc), vec![1, 2]);
    }

    #[test]
    fn test_text_compares_case_insensitively() {
        let records = vec![
            record(1, "2023-01-01T10:00:00Z", None, Some("d")),
            record(2, "2023-01-01T10:00:00Z", None, Some("N")),
            record(3, "2023-01-01T10:00:00Z", None, Some("P")),
            record(4, "2023-01-01T10:00:00Z", None, Some("D")),
        ];
        let asc = sort_records(&records, SortSpec::ascending(SortColumn::ShiftState));
        assert_eq!(ids(&asc), vec![1, 4, 2, 3]);
    }

    #[test]
    fn test_equal_keys_keep_relative_order() {
        let records = vec![
            record(5, "2023-01-01T10:00:00Z", Some(10.0), None),
            record(2, "2023-01-01T10:00:00Z", Some(10.0), None),
            record(9, "2023-01-01T10:00:00Z", Some(10.0), None),
        ];
        let desc = sort_records(&records, SortSpec::descending(SortColumn::Speed));
        assert_eq!(ids(&desc), vec![5, 2, 9]);
    }

    #[test]
    fn test_sorting_twice_is_idempotent() {
        let records = vec![
            record(2, "2023-01-01T10:01:00Z", Some(30.2), None),
            record(3, "2023-01-01T10:02:00Z", None, None),
            record(1, "2023-01-01T10:00:00Z", Some(25.5), None),
        ];
        let spec = SortSpec::descending(SortColumn::Speed);
        let once = sort_records(&records, spec).into_owned();
        let twice = sort_records(&once, spec).into_owned();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unsorted_after_sort_keeps_sorted_order() {
        // Clearing the sort is not a reset: it is identity on whatever it is given.
        let records = vec![
            record(2, "2023-01-01T10:01:00Z", Some(30.2), None),
            record(1, "2023-01-01T10:00:00Z", Some(25.5), None),
        ];
        let asc = sort_records(&records, SortSpec::ascending(SortColumn::Id)).into_owned();
        let cleared = sort_records(&asc, SortSpec::Unsorted);
        assert_eq!(ids(&cleared), vec![1, 2]);
        // Applied to the unsorted input it is the identity.
        assert_eq!(ids(&sort_records(&records, SortSpec::Unsorted)), vec![2, 1]);
    }

    #[test]
    fn test_column_names_round_trip() {
        for column in SortColumn::all() {
            assert_eq!(column.as_str().parse::<SortColumn>(), Ok(*column));
        }
        assert!("colour".parse::<SortColumn>().is_err());
    }
}
