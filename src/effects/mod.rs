//! Asynchronous collaborators and the machine host.
//!
//! This module is the "imperative shell" around the pure core: it runs the
//! user-fetch and count-save collaborators as Stillwater effects and feeds
//! their results back into the machine as synthesized events.
//!
//! # Key Concepts
//!
//! - **Tasks**: effect factories with a four-valued status
//!   (initial/pending/complete/error) and epoch-based staleness tracking
//! - **Host**: attach/detach lifecycle that binds collaborator lifetimes to
//!   the machine's running lifetime
//! - **Effects**: free-standing constructors `pure()`, `fail()`, `from_fn()`
//!   with `BoxedEffect` stored per collaborator

mod host;
mod task;

pub use host::MachineHost;
pub use task::{Task, TaskError, TaskFactory, TaskStatus};
