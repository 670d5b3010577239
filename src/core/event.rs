//! Events accepted by the counter machine.

use super::session::User;
use serde::{Deserialize, Serialize};

/// Events the machine mediates.
///
/// `CountChanged` is internal: the increment action raises it so the limit
/// guard is re-evaluated after the mutation. The two fetch events are
/// synthesized by the host when the asynchronous user fetch settles.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    Increment,
    Reset,
    SaveCount,
    CountChanged,
    UserFetchComplete { user: User },
    UserFetchError { reason: String },
}

impl Event {
    /// Get the event's name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Increment => "INCREMENT",
            Self::Reset => "RESET",
            Self::SaveCount => "SAVE_COUNT",
            Self::CountChanged => "COUNT_CHANGED",
            Self::UserFetchComplete { .. } => "USER_FETCH_COMPLETE",
            Self::UserFetchError { .. } => "USER_FETCH_ERROR",
        }
    }
}
