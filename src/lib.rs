//! Tally: an auth-gated counter state machine
//!
//! Tally is built on Stillwater's "pure core, imperative shell" philosophy.
//! The transition logic is composed of pure functions with no side effects,
//! while the asynchronous collaborators (user fetch, count persistence) are
//! isolated in Effects driven by a host.
//!
//! # Core Concepts
//!
//! - **Phases**: `initializing` → `default` → `complete`, with a terminal
//!   `error` phase when the user fetch fails
//! - **Guards**: pure predicate functions that control transitions,
//!   including a host-supplied reset policy
//! - **Host**: attach/detach lifecycle that launches the user fetch once
//!   and discards collaborator results that arrive after detach
//!
//! # Example
//!
//! ```rust
//! use tally::builder::MachineBuilder;
//! use tally::core::{Event, Phase, ResetPolicy, Role, User};
//!
//! let mut machine = MachineBuilder::new()
//!     .limit(5)
//!     .reset_policy(ResetPolicy::count_positive())
//!     .build()
//!     .unwrap();
//! machine.start();
//!
//! machine.send(Event::UserFetchComplete {
//!     user: User {
//!         id: "1".to_string(),
//!         name: "heymp".to_string(),
//!         role: Role::Admin,
//!     },
//! });
//! assert_eq!(machine.phase(), Phase::Default);
//!
//! for _ in 0..5 {
//!     machine.send(Event::Increment);
//! }
//! assert_eq!(machine.phase(), Phase::Complete);
//!
//! machine.send(Event::Reset);
//! assert_eq!(machine.phase(), Phase::Default);
//! assert_eq!(machine.count(), 0);
//! ```

pub mod builder;
pub mod cache;
pub mod core;
pub mod effects;
pub mod machine;

// Re-export commonly used types
pub use crate::builder::{BuildError, MachineBuilder};
pub use crate::cache::{MemoryCache, PropertyCache, Snapshot};
pub use crate::core::{Event, Phase, ResetPolicy, Role, Session, User};
pub use crate::effects::{MachineHost, Task, TaskError, TaskStatus};
pub use crate::machine::{CounterMachine, SubscriptionId};
