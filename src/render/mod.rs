mod frame;
mod recording_view;

pub use frame::{
    BarFrame, DerivedView, LexisFrame, LexisSegment, ScatterFrame, ScatterPoint, SegmentEmphasis,
};
pub use recording_view::{RecordedRenders, RecordingHandle, RecordingView};

use serde::{Deserialize, Serialize};

use crate::error::ViewResult;

/// The three linked charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// Tenure segments over year/age.
    Lexis,
    /// Leader counts per gender.
    Bar,
    /// Start age against GDP per capita.
    Scatter,
}

impl ViewKind {
    pub const ALL: [Self; 3] = [Self::Lexis, Self::Bar, Self::Scatter];
}

/// Contract implemented by every chart that displays linked data.
///
/// Views receive fully derived content and own their drawing and visual
/// diffing. They never touch the filter state; user input goes back to the
/// engine as `Intent`s through an `IntentSender`.
pub trait ViewAdapter {
    fn id(&self) -> &str;
    fn kind(&self) -> ViewKind;
    /// Replaces the view's content. Must be safe to call repeatedly with
    /// identical content.
    fn render(&mut self, view: &DerivedView) -> ViewResult<()>;
}
