use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::error::{ViewError, ViewResult};

use super::{CountryGroup, Gender, LeaderId, LeaderRecord};

/// Immutable, validated collection of leader records.
///
/// Records are kept in load order except that highlighted records are moved
/// (stably) behind the others, so editorial highlights draw on top.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<LeaderRecord>,
    index: IndexMap<LeaderId, usize>,
    groups: IndexSet<CountryGroup>,
}

impl Dataset {
    /// Builds a dataset whose recognised country groups are the groups the
    /// records belong to, in first-seen order.
    pub fn from_records(records: Vec<LeaderRecord>) -> ViewResult<Self> {
        let groups: IndexSet<CountryGroup> = records
            .iter()
            .flat_map(|record| record.groups.iter().cloned())
            .collect();
        Self::with_groups(records, groups)
    }

    /// Builds a dataset with an explicit list of recognised country groups.
    ///
    /// A group may be recognised without any member records; a record may not
    /// reference a group outside the list.
    pub fn with_groups(
        mut records: Vec<LeaderRecord>,
        groups: impl IntoIterator<Item = CountryGroup>,
    ) -> ViewResult<Self> {
        let groups: IndexSet<CountryGroup> = groups.into_iter().collect();
        for record in &records {
            record.validate()?;
            if let Some(unknown) = record.groups.iter().find(|group| !groups.contains(*group)) {
                return Err(ViewError::InvalidData(format!(
                    "leader {} references unrecognised country group `{unknown}`",
                    record.id
                )));
            }
        }

        records.sort_by_key(|record| record.highlighted);

        let mut index = IndexMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if index.insert(record.id, position).is_some() {
                return Err(ViewError::DuplicateLeaderId(record.id));
            }
        }

        debug!(
            records = records.len(),
            groups = groups.len(),
            "dataset built"
        );
        Ok(Self {
            records,
            index,
            groups,
        })
    }

    #[must_use]
    pub fn records(&self) -> &[LeaderRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: LeaderId) -> Option<&LeaderRecord> {
        self.index.get(&id).map(|&position| &self.records[position])
    }

    #[must_use]
    pub fn contains(&self, id: LeaderId) -> bool {
        self.index.contains_key(&id)
    }

    /// Recognised country groups in column order.
    pub fn groups(&self) -> impl Iterator<Item = &CountryGroup> {
        self.groups.iter()
    }

    #[must_use]
    pub fn has_group(&self, group: &CountryGroup) -> bool {
        self.groups.contains(group)
    }

    /// Distinct genders present in the whole dataset, sorted.
    #[must_use]
    pub fn genders(&self) -> Vec<Gender> {
        let mut genders: Vec<Gender> = self
            .records
            .iter()
            .map(|record| record.gender.clone())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        genders.sort();
        genders
    }
}
