//! Search and action state types for UI binding.
//!
//! This module defines the state machines behind the results panel, the
//! vehicle selector and the populate/export buttons, enabling the UI to
//! display appropriate feedback at each stage.

use serde::{Deserialize, Serialize};

use crate::record::VehicleRecord;

/// Represents the current state of the results panel.
///
/// - `Idle`: nothing searched yet, or cleared; shows an empty table
/// - `Loading`: search in flight, show spinner
/// - `Success`: page received, show table and pagination
/// - `Error`: search failed, show error panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
#[derive(Default)]
pub enum SearchState {
    /// No search has been run yet, or results were cleared.
    #[default]
    Idle,

    /// A search is in progress.
    Loading {
        /// When the search started (for elapsed time display).
        /// Skipped in serialization as Instant is not serializable.
        #[serde(skip)]
        started_at: Option<std::time::Instant>,
    },

    /// A page of records was received.
    Success {
        /// Records on the displayed page, in server order.
        records: Vec<VehicleRecord>,
        /// Total records matching the search.
        total_count: u64,
        /// 1-based page number of `records`.
        page: u32,
    },

    /// The search failed.
    Error {
        /// Error category for display.
        kind: SearchErrorKind,
        /// Human-readable error message.
        message: String,
    },
}

impl SearchState {
    /// Creates a new Loading state with the current timestamp.
    #[must_use]
    pub fn loading() -> Self {
        Self::Loading {
            started_at: Some(std::time::Instant::now()),
        }
    }

    /// Creates a Success state.
    #[must_use]
    pub const fn success(records: Vec<VehicleRecord>, total_count: u64, page: u32) -> Self {
        Self::Success {
            records,
            total_count,
            page,
        }
    }

    /// Creates an Error state.
    #[must_use]
    pub fn error(kind: SearchErrorKind, message: impl Into<String>) -> Self {
        Self::Error {
            kind,
            message: message.into(),
        }
    }

    /// Returns true if the state is Idle.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true if a search is in progress.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Returns true if the last search succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns true if the last search failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Records to display; empty unless in Success.
    #[must_use]
    pub fn records(&self) -> &[VehicleRecord] {
        match self {
            Self::Success { records, .. } => records,
            _ => &[],
        }
    }

    /// Total matching records; zero unless in Success.
    #[must_use]
    pub const fn total_count(&self) -> u64 {
        match self {
            Self::Success { total_count, .. } => *total_count,
            _ => 0,
        }
    }

    /// Error message, if in Error.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Error category, if in Error.
    #[must_use]
    pub const fn error_kind(&self) -> Option<SearchErrorKind> {
        match self {
            Self::Error { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns the elapsed time if loading.
    #[must_use]
    pub fn elapsed(&self) -> Option<std::time::Duration> {
        match self {
            Self::Loading {
                started_at: Some(t),
            } => Some(t.elapsed()),
            _ => None,
        }
    }
}

/// Categories of failures for user-friendly display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchErrorKind {
    /// No vehicle selected; no request was sent.
    ValidationFailed,

    /// The server could not be reached or did not answer.
    TransportFailure,

    /// The transport gave up waiting.
    Timeout,

    /// The server answered with a non-success status.
    ServerError,

    /// The server answered successfully with an unexpected body.
    ///
    /// Searches degrade this to an empty result; it is only ever logged.
    MalformedResponse,

    /// A rejection that carried no usable error information.
    Unknown,
}

impl SearchErrorKind {
    /// Returns user-friendly suggestions for this error type.
    #[must_use]
    pub const fn suggestions(&self) -> &[&'static str] {
        match self {
            Self::ValidationFailed => &["Choose a vehicle from the list before searching"],
            Self::TransportFailure => &[
                "Check if the server is running",
                "Verify your internet connection",
            ],
            Self::Timeout => &[
                "The server may be slow or overloaded",
                "Try narrowing the time range",
            ],
            Self::ServerError => &[
                "The vehicle may have no recorded data",
                "Try populating the sample data first",
            ],
            Self::MalformedResponse => &["The server returned data in an unexpected format"],
            Self::Unknown => &[
                "An unexpected error occurred",
                "Try the search again",
            ],
        }
    }

    /// Returns a human-readable title for this error type.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "No Vehicle Selected",
            Self::TransportFailure => "Network Error",
            Self::Timeout => "Request Timeout",
            Self::ServerError => "Server Error",
            Self::MalformedResponse => "Unexpected Response",
            Self::Unknown => "Unknown Error",
        }
    }
}

/// State of the vehicle selector's one-shot id load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
#[derive(Default)]
pub enum VehicleIdState {
    /// Ids are being fetched. This is also the state before the fetch starts.
    #[default]
    Loading,
    /// Ids were fetched.
    Ready {
        /// Selectable vehicle ids in server order.
        ids: Vec<String>,
    },
    /// The fetch failed.
    Failed {
        /// Human-readable error message.
        message: String,
    },
}

impl VehicleIdState {
    /// Returns true while the ids are loading.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Selectable ids; empty unless Ready.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        match self {
            Self::Ready { ids } => ids,
            _ => &[],
        }
    }

    /// Error message, if the fetch failed.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// State of a fire-and-report action such as populate or export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ActionState {
    /// Not started.
    #[default]
    Idle,
    /// In progress; the button is disabled.
    Running,
    /// Finished successfully.
    Succeeded {
        /// Confirmation text.
        message: String,
    },
    /// Finished with an error.
    Failed {
        /// Error category.
        kind: SearchErrorKind,
        /// Human-readable error message.
        message: String,
    },
}

impl ActionState {
    /// Returns true while the action runs.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns true if the last run succeeded.
    #[must_use]
    pub const fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Returns true if the last run failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}
