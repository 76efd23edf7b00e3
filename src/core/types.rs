use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{ViewError, ViewResult};

/// Country group selected when a session starts.
pub const DEFAULT_COUNTRY_GROUP: &str = "oecd";

/// Unique identifier of one leader tenure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaderId(pub u32);

impl fmt::Display for LeaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for LeaderId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Gender category as it appears in the source data.
///
/// This is an open set: whatever values the dataset carries are valid.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gender(String);

impl Gender {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Gender {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of a country group flag column such as `oecd`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryGroup(String);

impl CountryGroup {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CountryGroup {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTRY_GROUP)
    }
}

impl From<&str> for CountryGroup {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for CountryGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One leader tenure. Immutable once it is part of a `Dataset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderRecord {
    pub id: LeaderId,
    pub country: String,
    pub leader: String,
    pub gender: Gender,
    pub start_year: i32,
    pub end_year: i32,
    pub start_age: i32,
    pub duration: i32,
    /// GDP per capita; `None` means "not available", never zero.
    pub pcgdp: Option<f64>,
    /// Editorially pre-selected leader, always labelled.
    pub highlighted: bool,
    pub groups: SmallVec<[CountryGroup; 4]>,
}

impl LeaderRecord {
    /// Creates a record with `duration = end_year - start_year`, no GDP,
    /// no highlight and no group membership.
    #[must_use]
    pub fn new(
        id: u32,
        country: impl Into<String>,
        leader: impl Into<String>,
        gender: impl Into<Gender>,
        start_year: i32,
        end_year: i32,
        start_age: i32,
    ) -> Self {
        Self {
            id: LeaderId(id),
            country: country.into(),
            leader: leader.into(),
            gender: gender.into(),
            start_year,
            end_year,
            start_age,
            duration: end_year - start_year,
            pcgdp: None,
            highlighted: false,
            groups: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_pcgdp(mut self, pcgdp: Option<f64>) -> Self {
        self.pcgdp = pcgdp;
        self
    }

    #[must_use]
    pub fn with_highlight(mut self, highlighted: bool) -> Self {
        self.highlighted = highlighted;
        self
    }

    #[must_use]
    pub fn in_group(mut self, group: impl Into<CountryGroup>) -> Self {
        let group = group.into();
        if !self.groups.contains(&group) {
            self.groups.push(group);
        }
        self
    }

    #[must_use]
    pub fn end_age(&self) -> i32 {
        self.start_age + self.duration
    }

    #[must_use]
    pub fn belongs_to(&self, group: &CountryGroup) -> bool {
        self.groups.iter().any(|entry| entry == group)
    }

    /// `None` means no gender filter, which every record passes.
    #[must_use]
    pub fn matches_gender(&self, gender: Option<&Gender>) -> bool {
        gender.is_none_or(|gender| &self.gender == gender)
    }

    #[must_use]
    pub fn has_pcgdp(&self) -> bool {
        self.pcgdp.is_some()
    }

    pub fn validate(&self) -> ViewResult<()> {
        if self.duration <= 0 {
            return Err(ViewError::InvalidData(format!(
                "leader {} has non-positive duration {}",
                self.id, self.duration
            )));
        }
        if self.end_year.checked_sub(self.start_year) != Some(self.duration) {
            return Err(ViewError::InvalidData(format!(
                "leader {} has duration {} but serves {}..{}",
                self.id, self.duration, self.start_year, self.end_year
            )));
        }
        if let Some(pcgdp) = self.pcgdp {
            if !pcgdp.is_finite() {
                return Err(ViewError::InvalidData(format!(
                    "leader {} has non-finite pcgdp",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

/// Closed numeric range over a derived subset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    /// Returns `None` for an empty iterator. Non-finite values are ignored.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut bounds: Option<(OrderedFloat<f64>, OrderedFloat<f64>)> = None;
        for value in values.into_iter().filter(|value| value.is_finite()) {
            let value = OrderedFloat(value);
            bounds = Some(match bounds {
                None => (value, value),
                Some((min, max)) => (min.min(value), max.max(value)),
            });
        }
        bounds.map(|(min, max)| Self {
            min: min.into_inner(),
            max: max.into_inner(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CountryGroup, Extent, Gender, LeaderRecord};

    #[test]
    fn record_duration_and_end_age_follow_years() {
        let record = LeaderRecord::new(7, "USA", "Someone", "Male", 1990, 1998, 50);
        assert_eq!(record.duration, 8);
        assert_eq!(record.end_age(), 58);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn record_group_membership_is_deduplicated() {
        let record = LeaderRecord::new(1, "FRA", "A", "Female", 2000, 2001, 40)
            .in_group("oecd")
            .in_group("oecd")
            .in_group("eu27");
        assert_eq!(record.groups.len(), 2);
        assert!(record.belongs_to(&CountryGroup::from("eu27")));
        assert!(!record.belongs_to(&CountryGroup::from("brics")));
    }

    #[test]
    fn missing_gender_filter_matches_every_record() {
        let record = LeaderRecord::new(1, "FRA", "A", "Female", 2000, 2001, 40);
        assert!(record.matches_gender(None));
        assert!(record.matches_gender(Some(&Gender::from("Female"))));
        assert!(!record.matches_gender(Some(&Gender::from("Male"))));
    }

    #[test]
    fn zero_duration_and_nan_gdp_are_rejected() {
        let zero = LeaderRecord::new(1, "FRA", "A", "Female", 2000, 2000, 40);
        assert!(zero.validate().is_err());

        let nan = LeaderRecord::new(2, "FRA", "B", "Female", 2000, 2004, 40)
            .with_pcgdp(Some(f64::NAN));
        assert!(nan.validate().is_err());
    }

    #[test]
    fn duration_must_match_years() {
        let mut record = LeaderRecord::new(3, "FRA", "C", "Male", 1990, 1990, 50);
        record.duration = 1;
        assert!(record.validate().is_err());

        record.end_year = 1991;
        assert!(record.validate().is_ok());
    }

    #[test]
    fn extent_skips_non_finite_values() {
        let extent = Extent::from_values([3.0, f64::NAN, -1.0, 8.5]).expect("extent");
        assert_eq!(extent.min, -1.0);
        assert_eq!(extent.max, 8.5);
        assert!(Extent::from_values(std::iter::empty()).is_none());
    }
}
