//! One-shot load of the selectable vehicle ids.

use std::sync::Arc;

use telemetry_domain::VehicleIdState;
use tokio::sync::{OnceCell, watch};

use crate::error_classifier::{ErrorClassifier, Operation};
use crate::ports::VehicleDataTransport;

/// Fetches the vehicle ids once per session.
///
/// The state starts as `Loading` with no ids. Calling [`Self::load`] more
/// than once never issues a second request; concurrent callers all wait for
/// the single fetch.
pub struct VehicleIdSession<T: ?Sized> {
    transport: Arc<T>,
    state: watch::Sender<VehicleIdState>,
    loaded: OnceCell<()>,
}

impl<T: VehicleDataTransport + ?Sized> VehicleIdSession<T> {
    /// Creates a session that has not fetched yet.
    pub fn new(transport: Arc<T>) -> Self {
        let (state, _) = watch::channel(VehicleIdState::Loading);
        Self {
            transport,
            state,
            loaded: OnceCell::new(),
        }
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> VehicleIdState {
        self.state.borrow().clone()
    }

    /// Subscribes to state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<VehicleIdState> {
        self.state.subscribe()
    }

    /// Fetches the ids on the first call; later calls return immediately.
    pub async fn load(&self) {
        self.loaded
            .get_or_init(|| async {
                let next = match self.transport.fetch_vehicle_ids().await {
                    Ok(ids) => {
                        tracing::debug!(count = ids.len(), "vehicle ids loaded");
                        VehicleIdState::Ready { ids }
                    }
                    Err(error) => {
                        let classified =
                            ErrorClassifier::classify(&error, Operation::LoadVehicleIds);
                        tracing::error!(%error, "error loading vehicle ids");
                        VehicleIdState::Failed {
                            message: classified.message,
                        }
                    }
                };
                self.state.send_replace(next);
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use telemetry_domain::{ExportFormat, QueryDescriptor, RecordPage};

    use crate::ports::TransportError;

    struct IdTransport {
        result: Result<Vec<String>, TransportError>,
        calls: AtomicUsize,
    }

    impl IdTransport {
        fn new(result: Result<Vec<String>, TransportError>) -> Self {
            Self {
                result,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl VehicleDataTransport for IdTransport {
        async fn fetch_vehicle_ids(&self) -> Result<Vec<String>, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }

        async fn fetch_page(&self, _: &QueryDescriptor) -> Result<RecordPage, TransportError> {
            Ok(RecordPage::default())
        }

        async fn populate(&self) -> Result<(), TransportError> {
            Ok(())
        }

        async fn export(&self, _: &str, _: ExportFormat) -> Result<Vec<u8>, TransportError> {
            Ok(Vec::new())
        }
    }

    fn ids() -> Vec<String> {
        vec![
            "06ab31a9-b35d-4e47-8e44-9c35feb1bfae".to_string(),
            "1bbdf62b-4e52-48c4-8703-5a844d1da912".to_string(),
        ]
    }

    #[tokio::test]
    async fn test_starts_loading_with_no_ids() {
        let session = VehicleIdSession::new(Arc::new(IdTransport::new(Ok(ids()))));
        assert!(session.state().is_loading());
        assert!(session.state().ids().is_empty());
    }

    #[tokio::test]
    async fn test_fetches_exactly_once() {
        let transport = Arc::new(IdTransport::new(Ok(ids())));
        let session = VehicleIdSession::new(Arc::clone(&transport));

        session.load().await;
        session.load().await;
        tokio::join!(session.load(), session.load());

        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.state(), VehicleIdState::Ready { ids: ids() });
    }

    #[tokio::test]
    async fn test_failure_uses_load_fallback() {
        let transport = Arc::new(IdTransport::new(Err(TransportError::Rejected(
            serde_json::json!({ "status": 503 }),
        ))));
        let session = VehicleIdSession::new(transport);

        session.load().await;

        assert_eq!(session.state().error_message(), Some("Failed to load vehicle IDs"));
        assert!(session.state().ids().is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let ok = VehicleIdSession::new(Arc::new(IdTransport::new(Ok(ids()))));
        let failing = VehicleIdSession::new(Arc::new(IdTransport::new(Err(
            TransportError::Network {
                message: "offline".to_string(),
            },
        ))));

        ok.load().await;

        assert_eq!(ok.state().ids().len(), 2);
        assert!(failing.state().is_loading());
        failing.load().await;
        assert_eq!(failing.state().error_message(), Some("offline"));
        assert_eq!(ok.state().ids().len(), 2);
    }
}
