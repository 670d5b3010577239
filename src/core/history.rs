//! Phase transition history tracking.
//!
//! Provides immutable tracking of accepted transitions over a machine's
//! lifetime, following functional programming principles: `record` returns a
//! new log and never mutates the existing one.

use super::phase::Phase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single accepted event.
///
/// Self-transitions are recorded too (an `INCREMENT` keeps the machine in
/// `default` but still mutates the session), so the log doubles as an
/// activity trace.
///
/// # Example
///
/// ```rust
/// use tally::core::{Phase, PhaseChange};
/// use chrono::Utc;
///
/// let change = PhaseChange {
///     from: Phase::Initializing,
///     to: Phase::Default,
///     event: "USER_FETCH_COMPLETE".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(change.to, Phase::Default);
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct PhaseChange {
    /// The phase being transitioned from.
    pub from: Phase,
    /// The phase being transitioned to.
    pub to: Phase,
    /// Name of the event that caused the transition.
    pub event: String,
    /// When the transition occurred.
    pub timestamp: DateTime<Utc>,
}

/// Ordered, immutable log of accepted transitions.
///
/// # Example
///
/// ```rust
/// use tally::core::{Phase, PhaseChange, TransitionLog};
/// use chrono::Utc;
///
/// let log = TransitionLog::new();
/// let log = log.record(PhaseChange {
///     from: Phase::Initializing,
///     to: Phase::Default,
///     event: "USER_FETCH_COMPLETE".to_string(),
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(log.transitions().len(), 1);
/// assert_eq!(log.get_path(), vec![&Phase::Initializing, &Phase::Default]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransitionLog {
    transitions: Vec<PhaseChange>,
}

impl TransitionLog {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new log.
    ///
    /// Pure: the existing log is left untouched.
    pub fn record(&self, change: PhaseChange) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(change);
        Self { transitions }
    }

    /// Get the path of phases traversed: the initial phase, then the `to`
    /// phase of each transition.
    pub fn get_path(&self) -> Vec<&Phase> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for change in &self.transitions {
            path.push(&change.to);
        }
        path
    }

    /// Total duration from first to last transition, `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// All recorded transitions in order.
    pub fn transitions(&self) -> &[PhaseChange] {
        &self.transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(from: Phase, to: Phase, event: &str) -> PhaseChange {
        PhaseChange {
            from,
            to,
            event: event.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_log_is_empty() {
        let log = TransitionLog::new();
        assert!(log.transitions().is_empty());
        assert!(log.get_path().is_empty());
        assert!(log.duration().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let log = TransitionLog::new();
        let recorded = log.record(change(
            Phase::Initializing,
            Phase::Default,
            "USER_FETCH_COMPLETE",
        ));

        assert_eq!(log.transitions().len(), 0);
        assert_eq!(recorded.transitions().len(), 1);
    }

    #[test]
    fn get_path_returns_phase_sequence() {
        let log = TransitionLog::new()
            .record(change(
                Phase::Initializing,
                Phase::Default,
                "USER_FETCH_COMPLETE",
            ))
            .record(change(Phase::Default, Phase::Default, "INCREMENT"))
            .record(change(Phase::Default, Phase::Complete, "COUNT_CHANGED"));

        let path = log.get_path();
        assert_eq!(path.len(), 4);
        assert_eq!(path[0], &Phase::Initializing);
        assert_eq!(path[1], &Phase::Default);
        assert_eq!(path[2], &Phase::Default);
        assert_eq!(path[3], &Phase::Complete);
    }

    #[test]
    fn duration_spans_first_to_last() {
        let start = Utc::now();
        let log = TransitionLog::new()
            .record(PhaseChange {
                from: Phase::Initializing,
                to: Phase::Default,
                event: "USER_FETCH_COMPLETE".to_string(),
                timestamp: start,
            })
            .record(PhaseChange {
                from: Phase::Default,
                to: Phase::Complete,
                event: "COUNT_CHANGED".to_string(),
                timestamp: start + chrono::Duration::milliseconds(25),
            });

        let duration = log.duration().unwrap();
        assert_eq!(duration, Duration::from_millis(25));
    }

    #[test]
    fn single_transition_has_zero_duration() {
        let log = TransitionLog::new().record(change(
            Phase::Initializing,
            Phase::Error,
            "USER_FETCH_ERROR",
        ));
        assert_eq!(log.duration().unwrap(), Duration::from_secs(0));
    }

    #[test]
    fn log_roundtrips_through_json() {
        let log = TransitionLog::new().record(change(
            Phase::Initializing,
            Phase::Default,
            "USER_FETCH_COMPLETE",
        ));

        let json = serde_json::to_string(&log).unwrap();
        let parsed: TransitionLog = serde_json::from_str(&json).unwrap();
        assert_eq!(log.transitions().len(), parsed.transitions().len());
        assert_eq!(log.get_path(), parsed.get_path());
    }
}
