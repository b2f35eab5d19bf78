//! Failure classification
//!
//! Maps every failure the dashboard can run into onto a
//! [`SearchErrorKind`] and the message shown to the user. Classification
//! never fails.

use telemetry_domain::{ActionState, DomainError, SearchErrorKind, SearchState, messages};

use crate::ApplicationError;
use crate::ports::{DownloadError, TransportError};

/// The dashboard operation a failure belongs to.
///
/// Each operation has its own fallback text for failures that carry no
/// usable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Loading the vehicle selector.
    LoadVehicleIds,
    /// Searching for records.
    SearchData,
    /// Populating sample data.
    Populate,
    /// Exporting records.
    Export,
}

impl Operation {
    /// Message used when the failure has none of its own.
    #[must_use]
    pub const fn fallback_message(&self) -> &'static str {
        match self {
            Self::LoadVehicleIds => messages::FAILED_TO_LOAD_VEHICLES,
            Self::SearchData => messages::FAILED_TO_LOAD_DATA,
            Self::Populate => messages::FAILED_TO_POPULATE,
            Self::Export => messages::FAILED_TO_EXPORT,
        }
    }
}

/// A failure reduced to its category and display message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    /// Failure category.
    pub kind: SearchErrorKind,
    /// Text for the error panel.
    pub message: String,
}

impl ClassifiedError {
    /// Creates a classified error.
    #[must_use]
    pub fn new(kind: SearchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Converts into the results panel error state.
    #[must_use]
    pub fn into_search_state(self) -> SearchState {
        SearchState::error(self.kind, self.message)
    }

    /// Converts into a failed action state.
    #[must_use]
    pub fn into_action_state(self) -> ActionState {
        ActionState::Failed {
            kind: self.kind,
            message: self.message,
        }
    }
}

/// Stateless failure classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classifies a transport failure raised during `operation`.
    ///
    /// Error values that carry a message keep it verbatim, even when it is
    /// empty. Everything else gets the operation's fallback text.
    #[must_use]
    pub fn classify(error: &TransportError, operation: Operation) -> ClassifiedError {
        match error {
            TransportError::Network { message } => {
                ClassifiedError::new(SearchErrorKind::TransportFailure, message.clone())
            }
            TransportError::Timeout { message, .. } => {
                ClassifiedError::new(SearchErrorKind::Timeout, message.clone())
            }
            TransportError::Server { message, .. } => ClassifiedError::new(
                SearchErrorKind::ServerError,
                message
                    .clone()
                    .unwrap_or_else(|| operation.fallback_message().to_string()),
            ),
            TransportError::Rejected(_) => {
                ClassifiedError::new(SearchErrorKind::Unknown, operation.fallback_message())
            }
        }
    }

    /// Classifies a validation failure. These never reach the transport.
    #[must_use]
    pub fn classify_domain(error: &DomainError) -> ClassifiedError {
        match error {
            DomainError::NoVehicleSelected => {
                ClassifiedError::new(SearchErrorKind::ValidationFailed, messages::NO_VEHICLE_SELECTED)
            }
            other => ClassifiedError::new(SearchErrorKind::ValidationFailed, other.to_string()),
        }
    }

    /// Classifies any application error raised during `operation`.
    #[must_use]
    pub fn classify_application(error: &ApplicationError, operation: Operation) -> ClassifiedError {
        match error {
            ApplicationError::Domain(e) => Self::classify_domain(e),
            ApplicationError::Transport(e) => Self::classify(e, operation),
            ApplicationError::Download(DownloadError::Io(e)) => {
                ClassifiedError::new(SearchErrorKind::Unknown, e.to_string())
            }
            ApplicationError::Download(DownloadError::NoDestination) => {
                ClassifiedError::new(SearchErrorKind::Unknown, operation.fallback_message())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_plain_object_rejection_uses_fallback() {
        let error = TransportError::Rejected(json!({ "status": 500, "message": "x" }));
        let classified = ErrorClassifier::classify(&error, Operation::SearchData);
        assert_eq!(classified.kind, SearchErrorKind::Unknown);
        assert_eq!(classified.message, "Failed to load vehicle data");
    }

    #[test]
    fn test_string_rejection_uses_fallback() {
        let error = TransportError::Rejected(json!("boom"));
        let classified = ErrorClassifier::classify(&error, Operation::Populate);
        assert_eq!(classified.message, messages::FAILED_TO_POPULATE);
    }

    #[test]
    fn test_empty_error_message_is_kept() {
        let error = TransportError::Network {
            message: String::new(),
        };
        let classified = ErrorClassifier::classify(&error, Operation::SearchData);
        assert_eq!(classified.kind, SearchErrorKind::TransportFailure);
        assert_eq!(classified.message, "");
    }

    #[test]
    fn test_timeout_keeps_its_message() {
        let error = TransportError::Timeout {
            timeout_ms: 10_000,
            message: messages::TIMEOUT.to_string(),
        };
        let classified = ErrorClassifier::classify(&error, Operation::Export);
        assert_eq!(classified.kind, SearchErrorKind::Timeout);
        assert_eq!(classified.message, messages::TIMEOUT);
    }

    #[test]
    fn test_server_error_with_and_without_message() {
        let with = TransportError::Server {
            status: 404,
            message: Some("Selected Vehicle ID not found".to_string()),
        };
        assert_eq!(
            ErrorClassifier::classify(&with, Operation::SearchData).message,
            "Selected Vehicle ID not found"
        );

        let without = TransportError::Server {
            status: 500,
            message: None,
        };
        let classified = ErrorClassifier::classify(&without, Operation::LoadVehicleIds);
        assert_eq!(classified.kind, SearchErrorKind::ServerError);
        assert_eq!(classified.message, messages::FAILED_TO_LOAD_VEHICLES);
    }

    #[test]
    fn test_every_operation_has_distinct_fallback() {
        let fallbacks = [
            Operation::LoadVehicleIds,
            Operation::SearchData,
            Operation::Populate,
            Operation::Export,
        ]
        .map(|op| op.fallback_message());
        for (i, a) in fallbacks.iter().enumerate() {
            for b in &fallbacks[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_no_vehicle_selected() {
        let classified = ErrorClassifier::classify_domain(&DomainError::NoVehicleSelected);
        assert_eq!(
            classified,
            ClassifiedError::new(SearchErrorKind::ValidationFailed, "Please select a vehicle")
        );
    }
}
