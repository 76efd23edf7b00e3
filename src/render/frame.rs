use serde::{Deserialize, Serialize};

use crate::core::{Extent, Gender, GenderCount, LeaderId};
use crate::error::{ViewError, ViewResult};

use super::ViewKind;

/// Visual weight of one lexis segment. Selection wins over highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentEmphasis {
    Default,
    Highlighted,
    Selected,
}

/// One tenure drawn from `(start_year, start_age)` to `(end_year, end_age)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexisSegment {
    pub id: LeaderId,
    pub leader: String,
    pub country: String,
    pub gender: Gender,
    pub start_year: i32,
    pub end_year: i32,
    pub start_age: i32,
    pub end_age: i32,
    pub pcgdp: Option<f64>,
    pub emphasis: SegmentEmphasis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexisFrame {
    pub revision: u64,
    pub segments: Vec<LexisSegment>,
    /// Leaders that get a visible name label, in segment order.
    pub labels: Vec<LeaderId>,
    pub year_extent: Option<Extent>,
    pub age_extent: Option<Extent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarFrame {
    pub revision: u64,
    pub bars: Vec<GenderCount>,
    /// Bar drawn as selected, if any.
    pub active_gender: Option<Gender>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub id: LeaderId,
    pub leader: String,
    pub gender: Gender,
    pub pcgdp: f64,
    pub start_age: i32,
    /// Inactive points are drawn de-emphasized and ignore pointer input.
    pub active: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterFrame {
    pub revision: u64,
    pub points: Vec<ScatterPoint>,
    pub active_gender: Option<Gender>,
    pub gdp_extent: Option<Extent>,
    pub age_extent: Option<Extent>,
}

/// Freshly derived content handed to a `ViewAdapter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DerivedView {
    Lexis(LexisFrame),
    Bar(BarFrame),
    Scatter(ScatterFrame),
}

impl DerivedView {
    #[must_use]
    pub fn kind(&self) -> ViewKind {
        match self {
            Self::Lexis(_) => ViewKind::Lexis,
            Self::Bar(_) => ViewKind::Bar,
            Self::Scatter(_) => ViewKind::Scatter,
        }
    }

    /// Filter-state revision the content was derived from.
    #[must_use]
    pub fn revision(&self) -> u64 {
        match self {
            Self::Lexis(frame) => frame.revision,
            Self::Bar(frame) => frame.revision,
            Self::Scatter(frame) => frame.revision,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Lexis(frame) => frame.segments.is_empty(),
            Self::Bar(frame) => frame.bars.is_empty(),
            Self::Scatter(frame) => frame.points.is_empty(),
        }
    }

    pub fn validate(&self) -> ViewResult<()> {
        match self {
            Self::Lexis(frame) => frame.validate(),
            Self::Bar(frame) => frame.validate(),
            Self::Scatter(frame) => frame.validate(),
        }
    }
}

impl LexisFrame {
    pub fn validate(&self) -> ViewResult<()> {
        for segment in &self.segments {
            if segment.end_year <= segment.start_year || segment.end_age <= segment.start_age {
                return Err(ViewError::InvalidData(format!(
                    "lexis segment for leader {} has non-positive length",
                    segment.id
                )));
            }
        }
        if let Some(id) = self
            .labels
            .iter()
            .find(|id| !self.segments.iter().any(|segment| segment.id == **id))
        {
            return Err(ViewError::InvalidData(format!(
                "label for leader {id} has no segment"
            )));
        }
        validate_extent(self.year_extent, "year")?;
        validate_extent(self.age_extent, "age")
    }
}

impl BarFrame {
    pub fn validate(&self) -> ViewResult<()> {
        if self.bars.windows(2).any(|pair| pair[0].gender >= pair[1].gender) {
            return Err(ViewError::InvalidData(
                "gender bars must be strictly sorted by gender".to_owned(),
            ));
        }
        if self.bars.iter().any(|bar| bar.count == 0) {
            return Err(ViewError::InvalidData(
                "gender bars must not be empty".to_owned(),
            ));
        }
        Ok(())
    }
}

impl ScatterFrame {
    pub fn validate(&self) -> ViewResult<()> {
        if let Some(point) = self.points.iter().find(|point| !point.pcgdp.is_finite()) {
            return Err(ViewError::InvalidData(format!(
                "scatter point for leader {} has non-finite pcgdp",
                point.id
            )));
        }
        if let Some(point) = self.points.iter().find(|point| point.selected && !point.active) {
            return Err(ViewError::InvalidData(format!(
                "scatter point for leader {} is selected but inactive",
                point.id
            )));
        }
        validate_extent(self.gdp_extent, "gdp")?;
        validate_extent(self.age_extent, "age")
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.points.iter().filter(|point| point.active).count()
    }
}

fn validate_extent(extent: Option<Extent>, name: &str) -> ViewResult<()> {
    match extent {
        Some(extent) if !extent.min.is_finite() || !extent.max.is_finite() || extent.min > extent.max => {
            Err(ViewError::InvalidData(format!("{name} extent is invalid")))
        }
        _ => Ok(()),
    }
}
