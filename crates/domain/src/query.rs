//! Query construction for the data endpoint.
//!
//! [`RequestBuilder`] turns raw form values into a [`QueryDescriptor`].
//! It performs no I/O; a failed build means no request is ever issued.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::pagination::PAGE_SIZE;

/// A validated, normalized search for one page of one vehicle's records.
///
/// Pages are 1-based here. Conversion to the backend's 0-based page happens
/// through [`QueryDescriptor::zero_based_page`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    vehicle_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_time: Option<String>,
    page: u32,
    page_size: u32,
}

impl QueryDescriptor {
    /// The vehicle being searched.
    #[must_use]
    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    /// Lower time bound, if any.
    #[must_use]
    pub fn start_time(&self) -> Option<&str> {
        self.start_time.as_deref()
    }

    /// Upper time bound, if any.
    #[must_use]
    pub fn end_time(&self) -> Option<&str> {
        self.end_time.as_deref()
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page number as the backend expects it.
    #[must_use]
    pub const fn zero_based_page(&self) -> u32 {
        self.page - 1
    }

    /// Records per page. Always [`PAGE_SIZE`].
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Query-string pairs in backend naming, bounds omitted when absent.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("vehicle_id", self.vehicle_id.clone()),
            ("page", self.zero_based_page().to_string()),
            ("limit", self.page_size.to_string()),
        ];
        if let Some(start) = &self.start_time {
            pairs.push(("initial", start.clone()));
        }
        if let Some(end) = &self.end_time {
            pairs.push(("final", end.clone()));
        }
        pairs
    }
}

/// Builds [`QueryDescriptor`]s from form input.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestBuilder;

impl RequestBuilder {
    /// Validates and normalizes one search.
    ///
    /// Time bounds are passed through as given, except that empty or
    /// whitespace-only bounds are dropped. A missing page means page 1.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NoVehicleSelected`] for a blank vehicle id and
    /// [`DomainError::InvalidPage`] for page 0.
    pub fn build(
        vehicle_id: &str,
        start_time: &str,
        end_time: &str,
        page: Option<u32>,
    ) -> DomainResult<QueryDescriptor> {
        if vehicle_id.trim().is_empty() {
            return Err(DomainError::NoVehicleSelected);
        }
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(DomainError::InvalidPage(page));
        }

        Ok(QueryDescriptor {
            vehicle_id: vehicle_id.to_string(),
            start_time: non_blank(start_time),
            end_time: non_blank(end_time),
            page,
            page_size: PAGE_SIZE,
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
