//! The pure transition function of the counter machine.
//!
//! `step` maps (phase, session, event) to an [`Outcome`] without performing
//! any side effects. Side effects are represented as data: follow-up events
//! that must be queued behind pending sends, and commands the imperative
//! shell executes after the transition is applied.

use super::event::Event;
use super::guard::{limit_reached, ResetPolicy};
use super::phase::Phase;
use super::session::Session;

/// Side-effect request emitted by a transition for the shell to execute.
///
/// Commands never alter machine state by themselves; their completion status
/// is tracked externally.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    /// Persist the current count through the save collaborator.
    SaveCount,
}

/// Result of evaluating one event against the current machine state.
#[derive(Clone, Debug)]
pub struct Outcome {
    /// Phase after the transition (unchanged when rejected).
    pub next: Phase,
    /// Session after the transition's action ran.
    pub session: Session,
    /// Internal events raised by the action, to queue behind pending sends.
    pub followups: Vec<Event>,
    /// Side effects for the shell to start.
    pub commands: Vec<Command>,
    /// Whether any transition matched. Rejected events change nothing.
    pub accepted: bool,
}

impl Outcome {
    fn rejected(phase: Phase, session: &Session) -> Self {
        Self {
            next: phase,
            session: session.clone(),
            followups: Vec::new(),
            commands: Vec::new(),
            accepted: false,
        }
    }

    fn accepted(next: Phase, session: Session) -> Self {
        Self {
            next,
            session,
            followups: Vec::new(),
            commands: Vec::new(),
            accepted: true,
        }
    }
}

/// Evaluate one event. Pure: no I/O, no mutation of the inputs.
///
/// The table:
///
/// | From         | Event                 | Guard            | Action                  | To        |
/// |--------------|-----------------------|------------------|-------------------------|-----------|
/// | initializing | USER_FETCH_COMPLETE   | `limit_reached`  | store user              | complete  |
/// | initializing | USER_FETCH_COMPLETE   | else             | store user              | default   |
/// | initializing | USER_FETCH_ERROR      | —                | —                       | error     |
/// | default      | INCREMENT             | —                | count += 1, raise event | default   |
/// | default      | COUNT_CHANGED         | `limit_reached`  | —                       | complete  |
/// | default      | RESET                 | policy           | count = 0               | default   |
/// | default      | SAVE_COUNT            | —                | request save            | default   |
/// | complete     | RESET                 | policy           | count = 0               | default   |
/// | error        | *                     | —                | —                       | error     |
///
/// Anything not listed is rejected: the outcome reports `accepted: false`
/// and carries the inputs back unchanged.
pub fn step(
    phase: Phase,
    session: &Session,
    policy: &ResetPolicy,
    event: &Event,
) -> Outcome {
    match (phase, event) {
        (Phase::Initializing, Event::UserFetchComplete { user }) => {
            let mut session = session.clone();
            session.user = Some(user.clone());
            let next = if limit_reached(&session) {
                Phase::Complete
            } else {
                Phase::Default
            };
            Outcome::accepted(next, session)
        }
        (Phase::Initializing, Event::UserFetchError { .. }) => {
            Outcome::accepted(Phase::Error, session.clone())
        }
        (Phase::Default, Event::Increment) => {
            let mut session = session.clone();
            session.count += 1;
            let mut outcome = Outcome::accepted(Phase::Default, session);
            outcome.followups.push(Event::CountChanged);
            outcome
        }
        (Phase::Default, Event::CountChanged) => {
            if limit_reached(session) {
                Outcome::accepted(Phase::Complete, session.clone())
            } else {
                Outcome::rejected(phase, session)
            }
        }
        (Phase::Default, Event::Reset) | (Phase::Complete, Event::Reset) => {
            if policy.allows(session) {
                let mut session = session.clone();
                session.count = 0;
                Outcome::accepted(Phase::Default, session)
            } else {
                Outcome::rejected(phase, session)
            }
        }
        (Phase::Default, Event::SaveCount) => {
            let mut outcome = Outcome::accepted(Phase::Default, session.clone());
            outcome.commands.push(Command::SaveCount);
            outcome
        }
        // Error is absorbing; everything else is undefined and rejected.
        _ => Outcome::rejected(phase, session),
    }
}
