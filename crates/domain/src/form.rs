//! Search form values.

use serde::{Deserialize, Serialize};

use crate::messages;
use crate::record::Timestamp;

/// Raw values of the search form, exactly as typed or selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    /// Selected vehicle, empty when none.
    pub vehicle_id: String,
    /// Lower time bound, empty when unset.
    pub start_time: String,
    /// Upper time bound, empty when unset.
    pub end_time: String,
}

impl FormState {
    /// Resets every field to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns true if a vehicle is selected.
    #[must_use]
    pub fn has_vehicle(&self) -> bool {
        !self.vehicle_id.trim().is_empty()
    }

    /// Presentation check for an inverted range.
    ///
    /// Valid when either bound is empty or unparseable, otherwise the start
    /// must precede the end.
    #[must_use]
    pub fn date_range_is_valid(&self) -> bool {
        let start = Timestamp::parse(self.start_time.as_str()).instant();
        let end = Timestamp::parse(self.end_time.as_str()).instant();
        match (start, end) {
            (Some(start), Some(end)) => start < end,
            _ => true,
        }
    }

    /// Message for the date inputs, if the range is inverted.
    #[must_use]
    pub fn date_range_error(&self) -> Option<&'static str> {
        (!self.date_range_is_valid()).then_some(messages::INVALID_DATE_RANGE)
    }
}
