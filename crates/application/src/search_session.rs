//! Search Session
//!
//! Owns the lifecycle of the results panel: it validates form input, moves
//! to `Loading` as soon as a search is issued, fetches through the
//! [`VehicleDataTransport`] port and publishes the outcome.
//!
//! Several searches may be in flight at once (for example a quick double
//! click on the pagination bar). Which responses get applied is decided by
//! [`ResponseOrdering`].

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use telemetry_domain::{QueryDescriptor, RequestBuilder, SearchErrorKind, SearchState};
use tokio::sync::watch;

use crate::error_classifier::{ErrorClassifier, Operation};
use crate::ports::VehicleDataTransport;

/// Which responses a session applies when searches overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    /// Only the most recently issued search (or clear) may update state.
    /// Responses to older searches are dropped when they arrive.
    #[default]
    LatestIssued,
    /// Every response is applied when it arrives, so the last one to
    /// resolve wins even if it belongs to an older search.
    LatestResolved,
}

/// State machine for one results panel.
///
/// # Example
///
/// ```ignore
/// let session = SearchSession::new(Arc::new(transport));
/// session.search("v1", "", "", None).await;
/// assert!(session.state().is_success());
/// ```
pub struct SearchSession<T: ?Sized> {
    transport: Arc<T>,
    state: watch::Sender<SearchState>,
    generation: AtomicU64,
    current_page: AtomicU32,
    ordering: ResponseOrdering,
}

impl<T: VehicleDataTransport + ?Sized> SearchSession<T> {
    /// Creates an idle session that applies only the latest issued search.
    pub fn new(transport: Arc<T>) -> Self {
        Self::with_ordering(transport, ResponseOrdering::default())
    }

    /// Creates an idle session with an explicit ordering policy.
    pub fn with_ordering(transport: Arc<T>, ordering: ResponseOrdering) -> Self {
        let (state, _) = watch::channel(SearchState::Idle);
        Self {
            transport,
            state,
            generation: AtomicU64::new(0),
            current_page: AtomicU32::new(1),
            ordering,
        }
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Subscribes to state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// The page of the last successful search, or 1.
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.current_page.load(Ordering::SeqCst)
    }

    /// The ordering policy of this session.
    #[must_use]
    pub const fn ordering(&self) -> ResponseOrdering {
        self.ordering
    }

    /// Starts a search.
    ///
    /// Validation and the move to `Loading` happen immediately, before the
    /// returned future is first polled. A blank vehicle id moves straight to
    /// `Error` and the transport is never contacted. The future completes
    /// once the fetch has resolved and its result was applied or discarded.
    pub fn search<'s>(
        &'s self,
        vehicle_id: &str,
        start_time: &str,
        end_time: &str,
        page: Option<u32>,
    ) -> impl Future<Output = ()> + use<'s, T> {
        let ticket = self.begin(vehicle_id, start_time, end_time, page);
        async move {
            if let Some((generation, query)) = ticket {
                self.complete(generation, query).await;
            }
        }
    }

    /// Resets to an empty, idle panel regardless of the current state.
    ///
    /// Under [`ResponseOrdering::LatestIssued`] any search still in flight
    /// is discarded when it resolves.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.current_page.store(1, Ordering::SeqCst);
        self.state.send_replace(SearchState::Idle);
        tracing::debug!("search results cleared");
    }

    fn begin(
        &self,
        vehicle_id: &str,
        start_time: &str,
        end_time: &str,
        page: Option<u32>,
    ) -> Option<(u64, QueryDescriptor)> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        match RequestBuilder::build(vehicle_id, start_time, end_time, page) {
            Ok(query) => {
                tracing::debug!(
                    generation,
                    vehicle_id = query.vehicle_id(),
                    page = query.page(),
                    "search issued"
                );
                self.state.send_replace(SearchState::loading());
                Some((generation, query))
            }
            Err(error) => {
                let classified = ErrorClassifier::classify_domain(&error);
                tracing::warn!(%error, "search rejected before sending");
                self.state.send_replace(classified.into_search_state());
                None
            }
        }
    }

    async fn complete(&self, generation: u64, query: QueryDescriptor) {
        let result = self.transport.fetch_page(&query).await;

        if !self.accepts(generation) {
            tracing::debug!(
                generation,
                latest = self.generation.load(Ordering::SeqCst),
                "discarding response to superseded search"
            );
            return;
        }

        let elapsed_ms = self.state.borrow().elapsed().map(|d| d.as_millis());
        let next = match result {
            Ok(page) => {
                if !page.is_well_formed() {
                    tracing::warn!(
                        kind = ?SearchErrorKind::MalformedResponse,
                        vehicle_id = query.vehicle_id(),
                        "unexpected payload shape, showing empty results"
                    );
                }
                let (records, total_count) = page.into_parts();
                self.current_page.store(query.page(), Ordering::SeqCst);
                tracing::debug!(
                    generation,
                    records = records.len(),
                    total_count,
                    ?elapsed_ms,
                    "search resolved"
                );
                SearchState::success(records, total_count, query.page())
            }
            Err(error) => {
                let classified = ErrorClassifier::classify(&error, Operation::SearchData);
                tracing::error!(
                    %error,
                    kind = ?classified.kind,
                    ?elapsed_ms,
                    "search failed"
                );
                classified.into_search_state()
            }
        };

        self.state.send_replace(next);
    }

    fn accepts(&self, generation: u64) -> bool {
        match self.ordering {
            ResponseOrdering::LatestIssued => {
                self.generation.load(Ordering::SeqCst) == generation
            }
            ResponseOrdering::LatestResolved => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use telemetry_domain::{ExportFormat, RecordPage, Timestamp, VehicleRecord};
    use tokio::sync::oneshot;

    use crate::ports::TransportError;

    type PageResult = Result<RecordPage, TransportError>;

    fn record(id: i64) -> VehicleRecord {
        VehicleRecord {
            id,
            timestamp: Timestamp::parse("2023-01-01T10:00:00Z"),
            speed: Some(25.5),
            odometer: 12345.0,
            soc: 85,
            elevation: 150.0,
            shift_state: Some("D".to_string()),
        }
    }

    /// Transport that answers every page request with a fixed result.
    struct FixedTransport {
        result: PageResult,
        queries: Mutex<Vec<QueryDescriptor>>,
    }

    impl FixedTransport {
        fn new(result: PageResult) -> Self {
            Self {
                result,
                queries: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<QueryDescriptor> {
            self.queries.lock().expect("Lock poisoned").clone()
        }
    }

    #[async_trait]
    impl VehicleDataTransport for FixedTransport {
        async fn fetch_vehicle_ids(&self) -> Result<Vec<String>, TransportError> {
            Ok(Vec::new())
        }

        async fn fetch_page(&self, query: &QueryDescriptor) -> PageResult {
            self.queries.lock().expect("Lock poisoned").push(query.clone());
            self.result.clone()
        }

        async fn populate(&self) -> Result<(), TransportError> {
            Ok(())
        }

        async fn export(&self, _: &str, _: ExportFormat) -> Result<Vec<u8>, TransportError> {
            Ok(Vec::new())
        }
    }

    /// Transport whose page responses are released by the test, per vehicle.
    struct GatedTransport {
        gates: Mutex<HashMap<String, oneshot::Receiver<PageResult>>>,
    }

    impl GatedTransport {
        fn new() -> Self {
            Self {
                gates: Mutex::new(HashMap::new()),
            }
        }

        fn gate(&self, vehicle_id: &str) -> oneshot::Sender<PageResult> {
            let (tx, rx) = oneshot::channel();
            self.gates
                .lock()
                .expect("Lock poisoned")
                .insert(vehicle_id.to_string(), rx);
            tx
        }
    }

    #[async_trait]
    impl VehicleDataTransport for GatedTransport {
        async fn fetch_vehicle_ids(&self) -> Result<Vec<String>, TransportError> {
            Ok(Vec::new())
        }

        async fn fetch_page(&self, query: &QueryDescriptor) -> PageResult {
            let gate = self
                .gates
                .lock()
                .expect("Lock poisoned")
                .remove(query.vehicle_id())
                .expect("gate registered");
            gate.await.expect("gate released")
        }

        async fn populate(&self) -> Result<(), TransportError> {
            Ok(())
        }

        async fn export(&self, _: &str, _: ExportFormat) -> Result<Vec<u8>, TransportError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_search_success() {
        let transport = Arc::new(FixedTransport::new(Ok(RecordPage::new(vec![record(1)], 25))));
        let session = SearchSession::new(Arc::clone(&transport));

        session.search("v1", "", "", Some(1)).await;

        assert_eq!(session.state(), SearchState::success(vec![record(1)], 25, 1));
        assert_eq!(session.current_page(), 1);
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].zero_based_page(), 0);
    }

    #[tokio::test]
    async fn test_blank_vehicle_never_reaches_transport() {
        let transport = Arc::new(FixedTransport::new(Ok(RecordPage::new(vec![record(1)], 25))));
        let session = SearchSession::new(Arc::clone(&transport));

        session.search("", "", "", Some(1)).await;

        assert_eq!(
            session.state(),
            SearchState::error(SearchErrorKind::ValidationFailed, "Please select a vehicle")
        );
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_loading_is_visible_before_fetch_resolves() {
        let transport = Arc::new(GatedTransport::new());
        let release = transport.gate("v1");
        let session = SearchSession::new(Arc::clone(&transport));

        let pending = session.search("v1", "", "", Some(2));
        assert!(session.state().is_loading());
        assert!(session.state().elapsed().is_some());

        release
            .send(Ok(RecordPage::new(vec![record(11)], 25)))
            .expect("receiver alive");
        pending.await;

        assert_eq!(session.state(), SearchState::success(vec![record(11)], 25, 2));
        assert_eq!(session.state().elapsed(), None);
        assert_eq!(session.current_page(), 2);
    }

    #[tokio::test]
    async fn test_missing_fields_degrade_to_empty_success() {
        let transport = Arc::new(FixedTransport::new(Ok(RecordPage::default())));
        let session = SearchSession::new(transport);

        session.search("v1", "", "", None).await;

        assert_eq!(session.state(), SearchState::success(Vec::new(), 0, 1));
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_error_state() {
        let transport = Arc::new(FixedTransport::new(Err(TransportError::Server {
            status: 500,
            message: None,
        })));
        let session = SearchSession::new(transport);

        session.search("v1", "", "", Some(1)).await;

        assert_eq!(
            session.state(),
            SearchState::error(SearchErrorKind::ServerError, "Failed to load vehicle data")
        );
    }

    #[tokio::test]
    async fn test_error_keeps_previous_page_number() {
        let transport = Arc::new(GatedTransport::new());
        let session = SearchSession::new(Arc::clone(&transport));

        let ok = transport.gate("v1");
        ok.send(Ok(RecordPage::new(vec![record(1)], 30)))
            .expect("receiver alive");
        session.search("v1", "", "", Some(3)).await;

        let fail = transport.gate("v1");
        fail.send(Err(TransportError::Network {
            message: "connection reset".to_string(),
        }))
        .expect("receiver alive");
        session.search("v1", "", "", Some(4)).await;

        assert_eq!(session.state().error_message(), Some("connection reset"));
        assert_eq!(session.current_page(), 3);
    }

    #[tokio::test]
    async fn test_clear_resets_from_any_state() {
        let transport = Arc::new(FixedTransport::new(Ok(RecordPage::new(vec![record(1)], 25))));
        let session = SearchSession::new(transport);

        session.search("v1", "", "", Some(2)).await;
        session.clear();
        assert_eq!(session.state(), SearchState::Idle);
        assert_eq!(session.current_page(), 1);

        session.search("", "", "", None).await;
        assert!(session.state().is_error());
        session.clear();
        assert!(session.state().is_idle());
    }

    async fn race(ordering: ResponseOrdering) -> SearchState {
        let transport = Arc::new(GatedTransport::new());
        let release_a = transport.gate("a");
        let release_b = transport.gate("b");
        let session = SearchSession::with_ordering(Arc::clone(&transport), ordering);
        let mut updates = session.subscribe();

        let first = session.search("a", "", "", Some(1));
        let second = session.search("b", "", "", Some(1));
        let driver = async {
            release_b
                .send(Ok(RecordPage::new(vec![record(2)], 2)))
                .expect("receiver alive");
            updates
                .wait_for(SearchState::is_success)
                .await
                .expect("session alive");
            release_a
                .send(Ok(RecordPage::new(vec![record(1)], 1)))
                .expect("receiver alive");
        };
        tokio::join!(first, second, driver);

        session.state()
    }

    #[tokio::test]
    async fn test_latest_issued_search_wins() {
        let state = race(ResponseOrdering::LatestIssued).await;
        assert_eq!(state, SearchState::success(vec![record(2)], 2, 1));
    }

    #[tokio::test]
    async fn test_latest_resolved_response_overwrites() {
        let state = race(ResponseOrdering::LatestResolved).await;
        assert_eq!(state, SearchState::success(vec![record(1)], 1, 1));
    }

    #[tokio::test]
    async fn test_clear_discards_in_flight_search() {
        let transport = Arc::new(GatedTransport::new());
        let release = transport.gate("v1");
        let session = SearchSession::new(Arc::clone(&transport));

        let pending = session.search("v1", "", "", Some(1));
        session.clear();
        release
            .send(Ok(RecordPage::new(vec![record(1)], 1)))
            .expect("receiver alive");
        pending.await;

        assert!(session.state().is_idle());
    }
}
