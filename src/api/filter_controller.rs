use tracing::{debug, warn};

use crate::core::{CountryGroup, FilterState, Gender, LeaderId};
use crate::error::{ViewError, ViewResult};
use crate::interaction::Intent;

use super::{CoordinationOutcome, LinkedViewsEngine, ViewTopics};

impl LinkedViewsEngine {
    /// Runs one intent through the full mutate → re-derive → render cycle.
    pub fn dispatch(&mut self, intent: Intent) -> ViewResult<CoordinationOutcome> {
        let name = intent.name();
        let result = match intent {
            Intent::ToggleGender { gender } => self.toggle_gender(gender),
            Intent::ToggleLeader { id } => self.toggle_leader(id),
            Intent::SetCountryGroup { group } => self.set_country_group(group),
            Intent::ClearSelection => self.clear_selection(),
        };
        if let Err(err) = &result {
            warn!(intent = name, error = %err, "intent rejected");
        }
        result
    }

    /// Handles intents queued by views, oldest first, one complete cycle
    /// each.
    ///
    /// Stops after `max_intents_per_drain` intents; the rest stay queued.
    pub fn process_pending_intents(&mut self) -> Vec<ViewResult<CoordinationOutcome>> {
        let mut results = Vec::new();
        while results.len() < self.config.max_intents_per_drain {
            let Some(intent) = self.inbox.pop() else {
                break;
            };
            results.push(self.dispatch(intent));
        }
        if !self.inbox.is_empty() {
            warn!(
                remaining = self.inbox.len(),
                "intent drain limit reached; remaining intents stay queued"
            );
        }
        results
    }

    /// Switches country group. Clears the gender filter and every selection,
    /// then re-renders all views.
    pub fn set_country_group(
        &mut self,
        group: impl Into<CountryGroup>,
    ) -> ViewResult<CoordinationOutcome> {
        let group = group.into();
        if !self.dataset.has_group(&group) {
            return Err(ViewError::UnknownCountryGroup(group.as_str().to_owned()));
        }
        let mut candidate = self.state.clone();
        candidate.reset_to_group(group);
        self.commit(candidate, ViewTopics::all(), Vec::new(), "set_country_group")
    }

    /// Activates `gender`, or clears the filter when it is already active,
    /// and prunes selections that no longer match.
    ///
    /// The bar view is re-rendered for its active-bar highlight; its counts
    /// do not depend on the gender filter.
    pub fn toggle_gender(&mut self, gender: impl Into<Gender>) -> ViewResult<CoordinationOutcome> {
        let mut candidate = self.state.clone();
        candidate.toggle_gender(gender.into());
        let pruned = candidate.prune_selection(&self.dataset)?;
        self.commit(candidate, ViewTopics::all(), pruned, "toggle_gender")
    }

    /// Flips one leader's selection. Only the lexis and scatter views change.
    ///
    /// Selecting a leader outside the active group or gender filter is
    /// rejected with `LeaderOutOfScope`; deselecting is always allowed.
    pub fn toggle_leader(&mut self, id: LeaderId) -> ViewResult<CoordinationOutcome> {
        let record = self.dataset.get(id).ok_or(ViewError::UnknownLeader(id))?;
        if !self.state.is_selected(id) && !self.state.in_scope(record) {
            return Err(ViewError::LeaderOutOfScope(id));
        }
        let mut candidate = self.state.clone();
        candidate.toggle_leader(id);
        self.commit(candidate, ViewTopics::selection(), Vec::new(), "toggle_leader")
    }

    /// Empties the selection, keeping group and gender filter.
    pub fn clear_selection(&mut self) -> ViewResult<CoordinationOutcome> {
        let mut candidate = self.state.clone();
        candidate.clear_selection();
        self.commit(candidate, ViewTopics::selection(), Vec::new(), "clear_selection")
    }

    /// Validates and installs `candidate`, then renders `topics`.
    ///
    /// A failed validation leaves the live state untouched. A render failure
    /// happens after the commit and is reported without rolling back; the
    /// pruned ids stay readable through `last_pruned_leaders`.
    fn commit(
        &mut self,
        candidate: FilterState,
        topics: ViewTopics,
        pruned_leaders: Vec<LeaderId>,
        operation: &'static str,
    ) -> ViewResult<CoordinationOutcome> {
        candidate.validate(&self.dataset)?;
        self.state = candidate;
        self.revision += 1;
        self.last_pruned.clone_from(&pruned_leaders);
        debug!(
            operation,
            revision = self.revision,
            country_group = %self.state.country_group(),
            gender = ?self.state.gender().map(Gender::as_str),
            selected = self.state.selected_leaders().len(),
            pruned = ?pruned_leaders,
            "filter state committed"
        );

        let rendered_views = self.render_topics(topics).inspect_err(|err| {
            warn!(
                operation,
                revision = self.revision,
                error = %err,
                "committed state was not fully rendered"
            );
        })?;
        Ok(CoordinationOutcome {
            revision: self.revision,
            topics,
            rendered_views,
            pruned_leaders,
        })
    }
}
