//! Machine phases for the counter session.
//!
//! The machine is always in exactly one phase. Phases are plain values:
//! inspecting them has no side effects.

use serde::{Deserialize, Serialize};

/// The four mutually exclusive phases of a counter session.
///
/// A machine begins in [`Phase::Initializing`] and cannot leave it until the
/// user fetch settles: success moves to [`Phase::Default`] (or straight to
/// [`Phase::Complete`] when a rehydrated count already sits at the limit),
/// failure moves to [`Phase::Error`].
///
/// # Example
///
/// ```rust
/// use tally::core::Phase;
///
/// let phase = Phase::Initializing;
/// assert_eq!(phase.name(), "initializing");
/// assert!(!phase.is_error());
/// assert!(Phase::Error.is_error());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the user fetch to settle.
    Initializing,
    /// User loaded, counting in progress.
    Default,
    /// The count has reached the configured limit.
    Complete,
    /// The user fetch failed. Absorbing: no event leaves this phase.
    Error,
}

impl Phase {
    /// Get the phase's name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Default => "default",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }

    /// Check if this is the terminal error phase.
    ///
    /// Once entered, no transition is defined for the rest of the run.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Initializing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_names_are_stable() {
        assert_eq!(Phase::Initializing.name(), "initializing");
        assert_eq!(Phase::Default.name(), "default");
        assert_eq!(Phase::Complete.name(), "complete");
        assert_eq!(Phase::Error.name(), "error");
    }

    #[test]
    fn only_error_is_error() {
        assert!(!Phase::Initializing.is_error());
        assert!(!Phase::Default.is_error());
        assert!(!Phase::Complete.is_error());
        assert!(Phase::Error.is_error());
    }

    #[test]
    fn initial_phase_is_initializing() {
        assert_eq!(Phase::default(), Phase::Initializing);
    }

    #[test]
    fn phase_serializes_to_snake_case() {
        let json = serde_json::to_string(&Phase::Initializing).unwrap();
        assert_eq!(json, "\"initializing\"");

        let parsed: Phase = serde_json::from_str("\"complete\"").unwrap();
        assert_eq!(parsed, Phase::Complete);
    }
}
