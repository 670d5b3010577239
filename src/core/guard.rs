//! Guard predicates for controlling counter transitions.
//!
//! Guards are pure boolean functions of the session. They encapsulate
//! transition pre-conditions without side effects; a missing user or a zero
//! count is falsy, never an error.

use super::session::Session;
use std::fmt;
use std::sync::Arc;

/// True iff a user record has been loaded into the session.
pub fn has_user(session: &Session) -> bool {
    session.has_user()
}

/// True iff the count has reached the configured limit.
pub fn limit_reached(session: &Session) -> bool {
    session.limit_reached()
}

/// Pure predicate over a session that decides if a transition may execute.
///
/// Predicates are stored behind an `Arc` so guards stay cheap to clone while
/// remaining thread-safe.
///
/// # Example
///
/// ```rust
/// use tally::core::{Guard, Session};
///
/// let above_zero = Guard::new(|s: &Session| s.count > 0);
///
/// let mut session = Session::new(5);
/// assert!(!above_zero.check(&session));
///
/// session.count = 1;
/// assert!(above_zero.check(&session));
/// ```
#[derive(Clone)]
pub struct Guard {
    predicate: Arc<dyn Fn(&Session) -> bool + Send + Sync>,
}

impl Guard {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and free of side effects.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Session) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Evaluate the guard against the session.
    pub fn check(&self, session: &Session) -> bool {
        (self.predicate)(session)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

/// The pluggable `canReset` policy.
///
/// The source material carries three conflicting rules for when a reset is
/// allowed, so the rule is host-supplied configuration rather than a
/// hardcoded default: the builder refuses to build without one.
///
/// # Example
///
/// ```rust
/// use tally::core::{ResetPolicy, Session};
///
/// let policy = ResetPolicy::count_positive();
///
/// let mut session = Session::new(5);
/// assert!(!policy.allows(&session));
///
/// session.count = 3;
/// assert!(policy.allows(&session));
/// ```
#[derive(Clone)]
pub struct ResetPolicy {
    name: &'static str,
    guard: Guard,
}

impl ResetPolicy {
    /// Resets are always permitted.
    pub fn always() -> Self {
        Self {
            name: "always",
            guard: Guard::new(|_| true),
        }
    }

    /// Resets are permitted once at least one increment happened.
    pub fn count_positive() -> Self {
        Self {
            name: "count_positive",
            guard: Guard::new(|s: &Session| s.count > 0),
        }
    }

    /// Resets are permitted only for users with the admin role.
    pub fn admin_only() -> Self {
        Self {
            name: "admin_only",
            guard: Guard::new(|s: &Session| s.is_admin()),
        }
    }

    /// Host-defined policy.
    pub fn custom<F>(name: &'static str, predicate: F) -> Self
    where
        F: Fn(&Session) -> bool + Send + Sync + 'static,
    {
        Self {
            name,
            guard: Guard::new(predicate),
        }
    }

    /// The policy's name for display/logging.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Evaluate the policy against the session.
    pub fn allows(&self, session: &Session) -> bool {
        self.guard.check(session)
    }
}

impl fmt::Debug for ResetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResetPolicy").field(&self.name).finish()
    }
}
