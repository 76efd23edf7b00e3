use crate::core::{DerivationEngine, Extent};
use crate::render::{
    BarFrame, DerivedView, LexisFrame, LexisSegment, ScatterFrame, ScatterPoint, SegmentEmphasis,
    ViewKind,
};

use super::LinkedViewsEngine;

impl LinkedViewsEngine {
    /// Derives the current content for one view kind.
    #[must_use]
    pub fn derive_view(&self, kind: ViewKind) -> DerivedView {
        match kind {
            ViewKind::Lexis => DerivedView::Lexis(self.build_lexis_frame()),
            ViewKind::Bar => DerivedView::Bar(self.build_bar_frame()),
            ViewKind::Scatter => DerivedView::Scatter(self.build_scatter_frame()),
        }
    }

    fn derivation(&self) -> DerivationEngine<'_> {
        DerivationEngine::new(&self.dataset, &self.state)
    }

    pub(super) fn build_lexis_frame(&self) -> LexisFrame {
        let derivation = self.derivation();
        let subset = derivation.base_subset();
        let labels = derivation.label_set(&subset);

        let segments: Vec<LexisSegment> = subset
            .iter()
            .map(|record| {
                let emphasis = if self.state.is_selected(record.id) {
                    SegmentEmphasis::Selected
                } else if record.highlighted {
                    SegmentEmphasis::Highlighted
                } else {
                    SegmentEmphasis::Default
                };
                LexisSegment {
                    id: record.id,
                    leader: record.leader.clone(),
                    country: record.country.clone(),
                    gender: record.gender.clone(),
                    start_year: record.start_year,
                    end_year: record.end_year,
                    start_age: record.start_age,
                    end_age: record.end_age(),
                    pcgdp: record.pcgdp,
                    emphasis,
                }
            })
            .collect();

        let year_extent = Extent::from_values(
            segments
                .iter()
                .flat_map(|s| [f64::from(s.start_year), f64::from(s.end_year)]),
        );
        let age_extent = Extent::from_values(
            segments
                .iter()
                .flat_map(|s| [f64::from(s.start_age), f64::from(s.end_age)]),
        );

        LexisFrame {
            revision: self.revision,
            segments,
            labels,
            year_extent,
            age_extent,
        }
    }

    pub(super) fn build_bar_frame(&self) -> BarFrame {
        BarFrame {
            revision: self.revision,
            bars: self.derivation().gender_aggregate(),
            active_gender: self.state.gender().cloned(),
        }
    }

    pub(super) fn build_scatter_frame(&self) -> ScatterFrame {
        let scatter = self.derivation().scatter_subset();
        let points: Vec<ScatterPoint> = scatter
            .entries
            .iter()
            .filter_map(|entry| {
                let pcgdp = entry.record.pcgdp?;
                Some(ScatterPoint {
                    id: entry.record.id,
                    leader: entry.record.leader.clone(),
                    gender: entry.record.gender.clone(),
                    pcgdp,
                    start_age: entry.record.start_age,
                    active: entry.active,
                    selected: self.state.is_selected(entry.record.id),
                })
            })
            .collect();

        ScatterFrame {
            revision: self.revision,
            gdp_extent: Extent::from_values(points.iter().map(|p| p.pcgdp)),
            age_extent: Extent::from_values(points.iter().map(|p| f64::from(p.start_age))),
            points,
            active_gender: scatter.active_gender,
        }
    }
}
