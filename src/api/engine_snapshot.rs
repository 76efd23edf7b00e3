use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{CountryGroup, Gender, GenderCount, LeaderId};
use crate::render::ViewKind;

use super::LinkedViewsEngine;

/// Serializable deterministic summary of the shared state and what each
/// view would currently show. Used by regression tests and replay tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub revision: u64,
    pub country_group: CountryGroup,
    pub gender: Option<Gender>,
    pub selected_leaders: Vec<LeaderId>,
    pub lexis_segments: usize,
    pub labelled_leaders: Vec<LeaderId>,
    pub gender_counts: Vec<GenderCount>,
    pub scatter_points: usize,
    pub scatter_active_points: usize,
    pub views: IndexMap<String, ViewKind>,
}

impl LinkedViewsEngine {
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        let lexis = self.build_lexis_frame();
        let bar = self.build_bar_frame();
        let scatter = self.build_scatter_frame();

        EngineSnapshot {
            revision: self.revision,
            country_group: self.state.country_group().clone(),
            gender: self.state.gender().cloned(),
            selected_leaders: self.state.selected_leaders().iter().copied().collect(),
            lexis_segments: lexis.segments.len(),
            labelled_leaders: lexis.labels,
            gender_counts: bar.bars,
            scatter_points: scatter.points.len(),
            scatter_active_points: scatter.active_count(),
            views: self
                .views()
                .map(|(id, kind)| (id.to_owned(), kind))
                .collect(),
        }
    }
}
