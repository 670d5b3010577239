//! Session data owned by a counter machine instance.
//!
//! A session holds the two pieces of mutable state the machine mediates:
//! the optional fetched user and the count with its limit. Sessions are
//! plain serializable values; all mutation goes through the transition
//! function.

use serde::{Deserialize, Serialize};

/// Ceiling applied to the count when no limit is configured.
pub const DEFAULT_LIMIT: u32 = 5;

/// Role carried by a fetched user record.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    User,
    Anonymous,
}

/// User record produced by the asynchronous fetch collaborator.
///
/// # Example
///
/// ```rust
/// use tally::core::{Role, User};
///
/// let user = User {
///     id: "1".to_string(),
///     name: "heymp".to_string(),
///     role: Role::Admin,
/// };
/// assert_eq!(user.role, Role::Admin);
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
}

/// Ephemeral state owned by one machine instance.
///
/// `count` is unsigned: it can never go negative, and guards treat the
/// absent-user case as falsy rather than an error.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Session {
    /// Absent until the user fetch completes (or a cache rehydrated one).
    pub user: Option<User>,
    /// Monotonically incremented by one per accepted `INCREMENT`.
    pub count: u32,
    /// Ceiling that forces the transition to `complete`.
    pub limit: u32,
}

impl Session {
    /// Create an empty session with the given limit.
    pub fn new(limit: u32) -> Self {
        Self {
            user: None,
            count: 0,
            limit,
        }
    }

    /// True iff a user record is present.
    pub fn has_user(&self) -> bool {
        self.user.is_some()
    }

    /// True iff the loaded user has the admin role.
    ///
    /// A missing user is simply non-admin, never an error.
    pub fn is_admin(&self) -> bool {
        self.user
            .as_ref()
            .map(|u| u.role == Role::Admin)
            .unwrap_or(false)
    }

    /// True iff the count has reached the limit.
    pub fn limit_reached(&self) -> bool {
        self.count >= self.limit
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}
