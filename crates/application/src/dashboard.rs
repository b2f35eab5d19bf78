//! Dashboard orchestration
//!
//! Glues the form, the sessions and the presentation helpers together the
//! way the dashboard screen uses them. Every UI event maps to one method
//! here; rendering reads the derived views.

use std::sync::Arc;

use telemetry_domain::{
    ActionState, ExportFormat, FormState, ItemRange, PageNavigation, PaginationView, SearchState,
    SortColumn, SortSpec, VehicleIdState, VehicleRecord, messages, sort_records,
};
use tokio::sync::watch;

use crate::error_classifier::{ErrorClassifier, Operation};
use crate::ports::{Clock, DownloadSink, VehicleDataTransport};
use crate::search_session::{ResponseOrdering, SearchSession};
use crate::use_cases::{ExportData, PopulateData};
use crate::vehicle_id_session::VehicleIdSession;

/// State and actions of one dashboard screen.
///
/// Collaborators are injected; nothing here reaches for global state.
pub struct Dashboard {
    form: FormState,
    sort: SortSpec,
    search: SearchSession<dyn VehicleDataTransport>,
    vehicle_ids: VehicleIdSession<dyn VehicleDataTransport>,
    populate: PopulateData<dyn VehicleDataTransport>,
    export: ExportData<dyn VehicleDataTransport, dyn DownloadSink, dyn Clock>,
    populate_state: watch::Sender<ActionState>,
    export_state: watch::Sender<ActionState>,
}

impl Dashboard {
    /// Creates a dashboard that applies only the latest issued search.
    pub fn new(
        transport: Arc<dyn VehicleDataTransport>,
        sink: Arc<dyn DownloadSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_ordering(transport, sink, clock, ResponseOrdering::default())
    }

    /// Creates a dashboard with an explicit response ordering policy.
    pub fn with_ordering(
        transport: Arc<dyn VehicleDataTransport>,
        sink: Arc<dyn DownloadSink>,
        clock: Arc<dyn Clock>,
        ordering: ResponseOrdering,
    ) -> Self {
        Self {
            form: FormState::default(),
            sort: SortSpec::default(),
            search: SearchSession::with_ordering(Arc::clone(&transport), ordering),
            vehicle_ids: VehicleIdSession::new(Arc::clone(&transport)),
            populate: PopulateData::new(Arc::clone(&transport)),
            export: ExportData::new(transport, sink, clock),
            populate_state: watch::channel(ActionState::Idle).0,
            export_state: watch::channel(ActionState::Idle).0,
        }
    }

    /// Loads the vehicle selector. Only the first call fetches.
    pub async fn mount(&self) {
        self.vehicle_ids.load().await;
    }

    // Form

    /// Current form values.
    #[must_use]
    pub const fn form(&self) -> &FormState {
        &self.form
    }

    /// Selects a vehicle.
    pub fn select_vehicle(&mut self, vehicle_id: impl Into<String>) {
        self.form.vehicle_id = vehicle_id.into();
    }

    /// Sets the lower time bound; empty clears it.
    pub fn set_start_time(&mut self, start_time: impl Into<String>) {
        self.form.start_time = start_time.into();
    }

    /// Sets the upper time bound; empty clears it.
    pub fn set_end_time(&mut self, end_time: impl Into<String>) {
        self.form.end_time = end_time.into();
    }

    // Search

    /// Runs the form's search from page 1.
    pub async fn submit(&self) {
        self.search_page(1).await;
    }

    /// Follows a pagination control.
    ///
    /// Returns false without searching when the control is disabled.
    pub async fn navigate(&self, navigation: PageNavigation) -> bool {
        let Some(page) = self.pagination().target(navigation) else {
            tracing::debug!(?navigation, "ignoring disabled pagination control");
            return false;
        };
        self.search_page(page).await;
        true
    }

    fn search_page(&self, page: u32) -> impl Future<Output = ()> + use<'_> {
        self.search.search(
            &self.form.vehicle_id,
            &self.form.start_time,
            &self.form.end_time,
            Some(page),
        )
    }

    /// Clears the form and the results. The sort spec is left as it is.
    pub fn clear(&mut self) {
        self.form.clear();
        self.search.clear();
    }

    /// The underlying search session.
    #[must_use]
    pub const fn search_session(&self) -> &SearchSession<dyn VehicleDataTransport> {
        &self.search
    }

    /// Snapshot of the results panel state.
    #[must_use]
    pub fn search_state(&self) -> SearchState {
        self.search.state()
    }

    /// Snapshot of the vehicle selector state.
    #[must_use]
    pub fn vehicle_id_state(&self) -> VehicleIdState {
        self.vehicle_ids.state()
    }

    // Presentation

    /// Applies a header click to the sort spec.
    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort = self.sort.toggle(column);
    }

    /// The active sort spec.
    #[must_use]
    pub const fn sort_spec(&self) -> SortSpec {
        self.sort
    }

    /// Records of the current page in display order.
    #[must_use]
    pub fn visible_records(&self) -> Vec<VehicleRecord> {
        let state = self.search.state();
        sort_records(state.records(), self.sort).into_owned()
    }

    /// Pagination bar for the current results.
    #[must_use]
    pub fn pagination(&self) -> PaginationView {
        PaginationView::new(self.search.state().total_count(), self.search.current_page())
    }

    /// "Showing X-Y of N" summary, if there are results.
    #[must_use]
    pub fn item_range(&self) -> Option<ItemRange> {
        ItemRange::new(self.search.state().total_count(), self.search.current_page())
    }

    // Actions

    /// Populates sample data, then refreshes the current search if a
    /// vehicle is selected.
    pub async fn populate(&self) {
        self.populate_state.send_replace(ActionState::Running);
        match self.populate.execute().await {
            Ok(()) => {
                self.populate_state.send_replace(ActionState::Succeeded {
                    message: messages::DATA_POPULATED.to_string(),
                });
                if self.form.has_vehicle() {
                    self.search_page(self.search.current_page()).await;
                }
            }
            Err(error) => {
                let classified = ErrorClassifier::classify_application(&error, Operation::Populate);
                tracing::error!(%error, "populate failed");
                self.populate_state
                    .send_replace(classified.into_action_state());
            }
        }
    }

    /// State of the populate button.
    #[must_use]
    pub fn populate_state(&self) -> ActionState {
        self.populate_state.borrow().clone()
    }

    /// Exports the selected vehicle's records.
    pub async fn export(&self, format: ExportFormat) {
        self.export_state.send_replace(ActionState::Running);
        let next = match self.export.execute(&self.form.vehicle_id, format).await {
            Ok(output) => ActionState::Succeeded {
                message: format!("{} ({})", messages::DATA_EXPORTED, output.filename),
            },
            Err(error) => {
                let classified = ErrorClassifier::classify_application(&error, Operation::Export);
                tracing::error!(%error, "export failed");
                classified.into_action_state()
            }
        };
        self.export_state.send_replace(next);
    }

    /// State of the export button.
    #[must_use]
    pub fn export_state(&self) -> ActionState {
        self.export_state.borrow().clone()
    }
}
