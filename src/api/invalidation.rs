use serde::{Deserialize, Serialize};

use crate::core::LeaderId;
use crate::render::ViewKind;

impl ViewKind {
    const fn bit(self) -> u8 {
        match self {
            Self::Lexis => 1 << 0,
            Self::Bar => 1 << 1,
            Self::Scatter => 1 << 2,
        }
    }
}

/// Set of view kinds that must be re-derived and re-rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct ViewTopics {
    bits: u8,
}

impl ViewTopics {
    const ALL_BITS: u8 = ViewKind::Lexis.bit() | ViewKind::Bar.bit() | ViewKind::Scatter.bit();

    #[must_use]
    pub const fn all() -> Self {
        Self {
            bits: Self::ALL_BITS,
        }
    }

    #[must_use]
    pub const fn from_kind(kind: ViewKind) -> Self {
        Self { bits: kind.bit() }
    }

    #[must_use]
    pub const fn with_kind(self, kind: ViewKind) -> Self {
        Self {
            bits: self.bits | kind.bit(),
        }
    }

    #[must_use]
    pub const fn contains(self, kind: ViewKind) -> bool {
        (self.bits & kind.bit()) != 0
    }

    /// Kinds in `ViewKind::ALL` order.
    pub fn kinds(self) -> impl Iterator<Item = ViewKind> {
        ViewKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }

    /// Views touched by a selection-only change: the bar chart's content does
    /// not depend on which leaders are selected.
    #[must_use]
    pub const fn selection() -> Self {
        Self::from_kind(ViewKind::Lexis).with_kind(ViewKind::Scatter)
    }
}

/// Result of one completed coordination cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinationOutcome {
    /// Filter-state revision after the cycle.
    pub revision: u64,
    pub topics: ViewTopics,
    pub rendered_views: usize,
    /// Selections dropped because they no longer passed the filters.
    pub pruned_leaders: Vec<LeaderId>,
}
