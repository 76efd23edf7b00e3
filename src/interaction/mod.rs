mod inbox;

pub use inbox::{IntentInbox, IntentSender};

use serde::{Deserialize, Serialize};

use crate::core::{CountryGroup, Gender, LeaderId};

/// User interaction raised by a view or an external control.
///
/// Views only ever emit intents; the engine turns them into filter-state
/// mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    /// Click on a gender bar.
    ToggleGender { gender: Gender },
    /// Click on a lexis segment or an active scatter point.
    ToggleLeader { id: LeaderId },
    /// Country-group selector changed.
    SetCountryGroup { group: CountryGroup },
    /// Click on a view's background, outside any selectable element.
    ClearSelection,
}

impl Intent {
    /// Short stable name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ToggleGender { .. } => "toggle_gender",
            Self::ToggleLeader { .. } => "toggle_leader",
            Self::SetCountryGroup { .. } => "set_country_group",
            Self::ClearSelection => "clear_selection",
        }
    }
}
