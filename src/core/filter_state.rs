use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ViewError, ViewResult};

use super::{CountryGroup, Dataset, Gender, LeaderId, LeaderRecord};

/// Selection/filter state shared by every linked view.
///
/// Views and derivations only read it; mutators are crate-private so every
/// change goes through the coordination engine.
///
/// Invariant: every selected leader exists, belongs to `country_group` and
/// matches `gender` when a gender filter is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    country_group: CountryGroup,
    gender: Option<Gender>,
    selected_leaders: BTreeSet<LeaderId>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(CountryGroup::default())
    }
}

impl FilterState {
    #[must_use]
    pub fn new(country_group: CountryGroup) -> Self {
        Self {
            country_group,
            gender: None,
            selected_leaders: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn country_group(&self) -> &CountryGroup {
        &self.country_group
    }

    #[must_use]
    pub fn gender(&self) -> Option<&Gender> {
        self.gender.as_ref()
    }

    #[must_use]
    pub fn selected_leaders(&self) -> &BTreeSet<LeaderId> {
        &self.selected_leaders
    }

    #[must_use]
    pub fn is_selected(&self, id: LeaderId) -> bool {
        self.selected_leaders.contains(&id)
    }

    /// Whether a record passes both the country-group and gender predicates.
    #[must_use]
    pub fn in_scope(&self, record: &LeaderRecord) -> bool {
        record.belongs_to(&self.country_group) && record.matches_gender(self.gender.as_ref())
    }

    /// Checks the selection invariant against `dataset`.
    pub fn validate(&self, dataset: &Dataset) -> ViewResult<()> {
        for &id in &self.selected_leaders {
            let record = dataset.get(id).ok_or(ViewError::UnknownLeader(id))?;
            if !self.in_scope(record) {
                return Err(ViewError::InvariantViolation(format!(
                    "selected leader {id} is outside group `{}`/gender {:?}",
                    self.country_group,
                    self.gender.as_ref().map(Gender::as_str)
                )));
            }
        }
        Ok(())
    }

    /// Switches group, dropping the gender filter and every selection.
    pub(crate) fn reset_to_group(&mut self, country_group: CountryGroup) {
        self.country_group = country_group;
        self.gender = None;
        self.selected_leaders.clear();
    }

    /// Clears the filter when `gender` is already active, sets it otherwise.
    pub(crate) fn toggle_gender(&mut self, gender: Gender) {
        if self.gender.as_ref() == Some(&gender) {
            self.gender = None;
        } else {
            self.gender = Some(gender);
        }
    }

    /// Returns `true` when the leader ended up selected.
    pub(crate) fn toggle_leader(&mut self, id: LeaderId) -> bool {
        if self.selected_leaders.remove(&id) {
            false
        } else {
            self.selected_leaders.insert(id);
            true
        }
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selected_leaders.clear();
    }

    /// Drops selections that no longer pass the active predicates and
    /// returns them in id order.
    ///
    /// An id with no record is a data-integrity defect and fails the prune.
    pub(crate) fn prune_selection(&mut self, dataset: &Dataset) -> ViewResult<Vec<LeaderId>> {
        let mut pruned = Vec::new();
        for &id in &self.selected_leaders {
            let record = dataset.get(id).ok_or(ViewError::UnknownLeader(id))?;
            if !self.in_scope(record) {
                pruned.push(id);
            }
        }
        for id in &pruned {
            self.selected_leaders.remove(id);
        }
        Ok(pruned)
    }
}
