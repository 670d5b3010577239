//! Asynchronous collaborator tasks.
//!
//! A [`Task`] wraps an effect factory together with a four-valued status and
//! an epoch. The epoch ties each run to the lifetime that started it: when a
//! task is cancelled on detach, a completion from the abandoned run carries a
//! stale epoch and is discarded instead of mutating anything.

use std::fmt;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;
use thiserror::Error;

/// Status of an asynchronous collaborator.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TaskStatus {
    /// Not started yet.
    Initial,
    /// A run is in flight.
    Pending,
    /// The last run resolved.
    Complete,
    /// The last run rejected.
    Error,
}

/// Failure produced by a collaborator's effect.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TaskError {
    #[error("task failed: {0}")]
    Failed(String),
}

/// Type alias for collaborator effect factories.
/// A factory creates a fresh effect on each run.
pub type TaskFactory<T, Env> =
    Arc<dyn Fn() -> BoxedEffect<T, TaskError, Env> + Send + Sync>;

/// An asynchronous collaborator with externally tracked status.
///
/// The task itself never blocks and never polls: the host runs the effect
/// returned by [`begin`](Task::begin) and reports the result back through
/// [`settle`](Task::settle), which rejects results from runs that were
/// cancelled in the meantime.
pub struct Task<T, Env> {
    factory: TaskFactory<T, Env>,
    status: TaskStatus,
    epoch: u64,
}

impl<T, Env> Task<T, Env> {
    /// Create a task from an effect factory.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> BoxedEffect<T, TaskError, Env> + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
            status: TaskStatus::Initial,
            epoch: 0,
        }
    }

    /// Current status.
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Start a run: marks the task pending and returns the run's epoch
    /// together with a fresh effect for the host to execute.
    pub fn begin(&mut self) -> (u64, BoxedEffect<T, TaskError, Env>) {
        self.epoch += 1;
        self.status = TaskStatus::Pending;
        (self.epoch, (self.factory)())
    }

    /// Report the outcome of a run.
    ///
    /// Returns `false` when the result is stale: the run's epoch no longer
    /// matches (the task was cancelled or restarted) or the task is not
    /// pending. Stale results must be dropped by the caller.
    pub fn settle(&mut self, epoch: u64, outcome: &Result<T, TaskError>) -> bool {
        if epoch != self.epoch || self.status != TaskStatus::Pending {
            return false;
        }
        self.status = match outcome {
            Ok(_) => TaskStatus::Complete,
            Err(_) => TaskStatus::Error,
        };
        true
    }

    /// Invalidate any in-flight run.
    ///
    /// A pending task returns to `Initial`; settled tasks keep their status.
    pub fn cancel(&mut self) {
        self.epoch += 1;
        if self.status == TaskStatus::Pending {
            self.status = TaskStatus::Initial;
        }
    }
}

impl<T, Env> Clone for Task<T, Env> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            status: self.status,
            epoch: self.epoch,
        }
    }
}

impl<T, Env> fmt::Debug for Task<T, Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("status", &self.status)
            .field("epoch", &self.epoch)
            .finish()
    }
}
