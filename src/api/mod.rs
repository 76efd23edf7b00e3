mod engine_config;
mod engine_snapshot;
mod filter_controller;
mod invalidation;
mod json_contract;
mod render_frame_builder;
mod view_dispatch;
mod view_registry;

pub use engine_config::LinkedViewsConfig;
pub use engine_snapshot::EngineSnapshot;
pub use invalidation::{CoordinationOutcome, ViewTopics};
pub use json_contract::{ENGINE_SNAPSHOT_JSON_SCHEMA_V1, EngineSnapshotJsonContractV1};

use tracing::debug;

use crate::core::{Dataset, FilterState, LeaderId, LoadReport, load_tabular};
use crate::error::{ViewError, ViewResult};
use crate::interaction::{IntentInbox, IntentSender};
use crate::render::ViewAdapter;

/// Coordination engine for the linked lexis, bar and scatter views.
///
/// Owns the immutable dataset and the single shared `FilterState`. Every
/// mutation goes through one of the four operations (or `dispatch`), and
/// each completes its mutate → re-derive → render cycle before returning.
pub struct LinkedViewsEngine {
    dataset: Dataset,
    config: LinkedViewsConfig,
    state: FilterState,
    views: Vec<Box<dyn ViewAdapter>>,
    inbox: IntentInbox,
    revision: u64,
    last_pruned: Vec<LeaderId>,
}

impl LinkedViewsEngine {
    pub fn new(dataset: Dataset, config: LinkedViewsConfig) -> ViewResult<Self> {
        config.validate()?;
        if !dataset.has_group(&config.initial_country_group) {
            return Err(ViewError::UnknownCountryGroup(
                config.initial_country_group.as_str().to_owned(),
            ));
        }
        let state = FilterState::new(config.initial_country_group.clone());
        debug!(
            records = dataset.len(),
            country_group = %state.country_group(),
            "linked views engine created"
        );
        Ok(Self {
            dataset,
            config,
            state,
            views: Vec::new(),
            inbox: IntentInbox::default(),
            revision: 0,
            last_pruned: Vec::new(),
        })
    }

    /// Loads leader-list text with the config's loader options and builds
    /// an engine over it.
    pub fn from_tabular_str(
        input: &str,
        config: LinkedViewsConfig,
    ) -> ViewResult<(Self, LoadReport)> {
        let (dataset, report) = load_tabular(input, &config.load_options())?;
        Ok((Self::new(dataset, config)?, report))
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub fn config(&self) -> &LinkedViewsConfig {
        &self.config
    }

    /// Read-only access to the shared filter state.
    #[must_use]
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Number of committed mutations since creation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Selections dropped by the latest committed mutation.
    ///
    /// Still available when that mutation's render step failed and no
    /// `CoordinationOutcome` was returned.
    #[must_use]
    pub fn last_pruned_leaders(&self) -> &[LeaderId] {
        &self.last_pruned
    }

    /// Handle views use to raise intents; see `process_pending_intents`.
    #[must_use]
    pub fn intent_sender(&self) -> IntentSender {
        self.inbox.sender()
    }

    #[must_use]
    pub fn pending_intent_count(&self) -> usize {
        self.inbox.len()
    }
}
