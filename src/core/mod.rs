//! Core counter machine types and logic.
//!
//! This module contains the pure functional core:
//! - Phases, events, and session data as plain values
//! - Guard predicates and the pluggable reset policy
//! - The pure transition function
//! - Immutable history tracking
//!
//! All logic in this module is pure (no side effects), following the
//! "pure core, imperative shell" philosophy.

mod event;
mod guard;
mod history;
mod phase;
mod session;
mod transition;

pub use event::Event;
pub use guard::{has_user, limit_reached, Guard, ResetPolicy};
pub use history::{PhaseChange, TransitionLog};
pub use phase::Phase;
pub use session::{Role, Session, User, DEFAULT_LIMIT};
pub use transition::{step, Command, Outcome};
