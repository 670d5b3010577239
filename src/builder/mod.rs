//! Builder API for ergonomic machine construction.
//!
//! All initial state is constructor-supplied here: there are no
//! process-wide side effects on load, and rehydration from a property cache
//! is an explicit builder step rather than something the machine reaches
//! for on its own.

pub mod error;

pub use error::BuildError;

use crate::cache::{self, CacheError, PropertyCache};
use crate::core::{ResetPolicy, Session, User, DEFAULT_LIMIT};
use crate::machine::CounterMachine;

/// Builder for constructing counter machines with a fluent API.
///
/// The reset policy is required: the source rules conflict, so the choice
/// belongs to the host (see [`ResetPolicy`]).
///
/// # Example
///
/// ```rust
/// use tally::builder::MachineBuilder;
/// use tally::core::{Phase, ResetPolicy};
///
/// let machine = MachineBuilder::new()
///     .limit(3)
///     .reset_policy(ResetPolicy::admin_only())
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.phase(), Phase::Initializing);
/// assert_eq!(machine.session().limit, 3);
/// ```
#[derive(Debug, Default)]
pub struct MachineBuilder {
    limit: Option<u32>,
    policy: Option<ResetPolicy>,
    user: Option<User>,
    count: Option<u32>,
}

impl MachineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the count ceiling (optional, defaults to [`DEFAULT_LIMIT`]).
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the reset policy (required).
    pub fn reset_policy(mut self, policy: ResetPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Seed the session with a user before the machine starts.
    ///
    /// The machine still begins in `initializing`; the fetch result is
    /// authoritative and overwrites this value.
    pub fn initial_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    /// Seed the session with a count before the machine starts.
    pub fn initial_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Seed user and count from a property cache under the given namespace.
    ///
    /// Missing entries are simply left unseeded; malformed entries are an
    /// error so the host can decide whether to fall back to empty state.
    pub fn rehydrate(
        mut self,
        cache: &impl PropertyCache,
        namespace: &str,
    ) -> Result<Self, CacheError> {
        if let Some(user) = cache::load_user(cache, namespace)? {
            self.user = Some(user);
        }
        if let Some(count) = cache::load_count(cache, namespace)? {
            self.count = Some(count);
        }
        Ok(self)
    }

    /// Build the machine.
    pub fn build(self) -> Result<CounterMachine, BuildError> {
        let policy = self.policy.ok_or(BuildError::MissingResetPolicy)?;
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if limit == 0 {
            return Err(BuildError::ZeroLimit);
        }

        let session = Session {
            user: self.user,
            count: self.count.unwrap_or(0),
            limit,
        };
        Ok(CounterMachine::new(session, policy))
    }
}
