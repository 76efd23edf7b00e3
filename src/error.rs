use thiserror::Error;

use crate::core::LeaderId;

pub type ViewResult<T> = Result<T, ViewError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("duplicate leader id: {0}")]
    DuplicateLeaderId(LeaderId),

    #[error("unknown leader id: {0}")]
    UnknownLeader(LeaderId),

    #[error("unknown country group: `{0}`")]
    UnknownCountryGroup(String),

    #[error("leader {0} is outside the active country group/gender filter")]
    LeaderOutOfScope(LeaderId),

    #[error("filter state invariant violated: {0}")]
    InvariantViolation(String),

    #[error("view `{view_id}` failed to render: {reason}")]
    Render { view_id: String, reason: String },

    #[error("view with id `{0}` is already registered")]
    DuplicateView(String),
}
