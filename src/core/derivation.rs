//! Pure derivations of each view's visible data from `Dataset` + `FilterState`.
//!
//! Nothing here mutates state or fails: an empty subset yields empty
//! aggregates and views render a zero state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Dataset, FilterState, Gender, LeaderId, LeaderRecord};

/// One bar of the gender chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderCount {
    pub gender: Gender,
    pub count: usize,
}

/// Scatter candidate: a record with GDP present, flagged inactive when it
/// fails the gender filter instead of being hidden.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterEntry<'a> {
    pub record: &'a LeaderRecord,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSubset<'a> {
    pub entries: Vec<ScatterEntry<'a>>,
    pub active_gender: Option<Gender>,
}

/// Borrowed view over the dataset and the current filter state.
#[derive(Debug, Clone, Copy)]
pub struct DerivationEngine<'a> {
    dataset: &'a Dataset,
    state: &'a FilterState,
}

impl<'a> DerivationEngine<'a> {
    #[must_use]
    pub fn new(dataset: &'a Dataset, state: &'a FilterState) -> Self {
        Self { dataset, state }
    }

    /// Records in the active country group, regardless of the gender filter.
    #[must_use]
    pub fn country_group_subset(&self) -> Vec<&'a LeaderRecord> {
        let group = self.state.country_group();
        self.dataset
            .records()
            .iter()
            .filter(|record| record.duration > 0 && record.belongs_to(group))
            .collect()
    }

    /// Records every view renders from by default: positive duration, active
    /// country group and (when set) active gender.
    #[must_use]
    pub fn base_subset(&self) -> Vec<&'a LeaderRecord> {
        let gender = self.state.gender();
        self.country_group_subset()
            .into_iter()
            .filter(|record| record.matches_gender(gender))
            .collect()
    }

    /// Gender counts over the country-group subset, sorted by gender.
    ///
    /// The gender filter is ignored so every gender stays available to toggle.
    #[must_use]
    pub fn gender_aggregate(&self) -> Vec<GenderCount> {
        let mut counts: BTreeMap<&Gender, usize> = BTreeMap::new();
        for record in self.country_group_subset() {
            *counts.entry(&record.gender).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(gender, count)| GenderCount {
                gender: gender.clone(),
                count,
            })
            .collect()
    }

    /// Country-group records with GDP present, each marked active when it
    /// passes the gender filter.
    #[must_use]
    pub fn scatter_subset(&self) -> ScatterSubset<'a> {
        let gender = self.state.gender();
        let entries = self
            .country_group_subset()
            .into_iter()
            .filter(|record| record.has_pcgdp())
            .map(|record| ScatterEntry {
                record,
                active: record.matches_gender(gender),
            })
            .collect();
        ScatterSubset {
            entries,
            active_gender: gender.cloned(),
        }
    }

    /// Leaders to annotate: highlighted or selected, restricted to `subset`,
    /// in subset order.
    #[must_use]
    pub fn label_set(&self, subset: &[&LeaderRecord]) -> Vec<LeaderId> {
        subset
            .iter()
            .filter(|record| record.highlighted || self.state.is_selected(record.id))
            .map(|record| record.id)
            .collect()
    }
}
