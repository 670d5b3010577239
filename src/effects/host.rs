//! Imperative shell composing a machine with its asynchronous collaborators.
//!
//! The host mirrors a UI component's attach/detach lifecycle. It owns the
//! machine by composition (no inheritance-style coupling): the machine stays
//! an independently constructed object, and the host forwards events to it
//! and bridges task completions into synthesized fetch events. There are no
//! polling loops; a completion is delivered exactly once, directly after the
//! effect resolves, and completions that arrive after detach are discarded.

use crate::core::{Command, Event, Session, User};
use crate::effects::task::{Task, TaskError, TaskStatus};
use crate::machine::CounterMachine;
use stillwater::effect::BoxedEffect;
use stillwater::prelude::*;

type PendingRun<T, Env> = Option<(u64, BoxedEffect<T, TaskError, Env>)>;

/// Host for a counter machine and its two collaborators.
///
/// The auth collaborator is an opaque `() -> User` operation; the save
/// collaborator is an opaque `() -> bool` operation. Both are injected as
/// effect factories against a host-chosen environment, following the
/// environment pattern for dependency injection.
///
/// # Example
///
/// ```rust
/// use tally::builder::MachineBuilder;
/// use tally::core::{Phase, ResetPolicy, Role, User};
/// use tally::effects::{MachineHost, Task};
/// use stillwater::prelude::*;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// #[derive(Clone)]
/// struct Env {
///     user: User,
/// }
///
/// let machine = MachineBuilder::new()
///     .reset_policy(ResetPolicy::always())
///     .build()
///     .unwrap();
///
/// let auth = Task::new(|| from_fn(|env: &Env| Ok(env.user.clone())).boxed());
/// let save = Task::new(|| pure(true).boxed());
/// let mut host = MachineHost::new(machine, auth, save);
///
/// let env = Env {
///     user: User {
///         id: "1".to_string(),
///         name: "heymp".to_string(),
///         role: Role::Admin,
///     },
/// };
///
/// host.attach();
/// assert_eq!(host.machine().phase(), Phase::Initializing);
///
/// host.drive_auth(&env).await;
/// assert_eq!(host.machine().phase(), Phase::Default);
///
/// host.increment();
/// assert_eq!(host.machine().count(), 1);
/// # }
/// ```
pub struct MachineHost<Env> {
    machine: CounterMachine,
    auth: Task<User, Env>,
    save: Task<bool, Env>,
    pending_auth: PendingRun<User, Env>,
    pending_save: PendingRun<bool, Env>,
    attached: bool,
    auth_launched: bool,
}

impl<Env: Clone + Send + Sync + 'static> MachineHost<Env> {
    /// Compose a machine with its collaborators. Nothing runs until
    /// [`attach`](MachineHost::attach).
    pub fn new(machine: CounterMachine, auth: Task<User, Env>, save: Task<bool, Env>) -> Self {
        Self {
            machine,
            auth,
            save,
            pending_auth: None,
            pending_save: None,
            attached: false,
            auth_launched: false,
        }
    }

    /// The hosted machine.
    pub fn machine(&self) -> &CounterMachine {
        &self.machine
    }

    /// Mutable access to the hosted machine, e.g. to subscribe observers.
    pub fn machine_mut(&mut self) -> &mut CounterMachine {
        &mut self.machine
    }

    /// Whether the host is currently attached.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Attach the host: starts the machine and launches the user fetch.
    ///
    /// The fetch is launched exactly once per machine lifetime; re-attaching
    /// after a detach does not re-fetch (a fresh host/machine pair does).
    pub fn attach(&mut self) {
        if self.attached {
            return;
        }
        self.attached = true;
        self.machine.start();
        if !self.auth_launched {
            self.auth_launched = true;
            self.pending_auth = Some(self.auth.begin());
        }
    }

    /// Detach the host: stops the machine and cancels in-flight runs.
    ///
    /// Collaborator lifetimes are bound to the attached lifetime: an
    /// abandoned fetch or save that resolves later is discarded, so the
    /// machine never observes results from a detached run.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.machine.stop();
        self.auth.cancel();
        self.save.cancel();
        self.pending_auth = None;
        self.pending_save = None;
    }

    /// Run the pending user fetch to completion and synthesize the matching
    /// event into the machine.
    ///
    /// Resolves to `USER_FETCH_COMPLETE` or `USER_FETCH_ERROR`; a stale
    /// completion (the host detached while the fetch was in flight) is
    /// dropped without touching the machine. Returns the fetch status.
    pub async fn drive_auth(&mut self, env: &Env) -> TaskStatus {
        let Some((epoch, effect)) = self.pending_auth.take() else {
            return self.auth.status();
        };

        let outcome = effect.run(env).await;
        if !self.auth.settle(epoch, &outcome) {
            return self.auth.status();
        }

        match outcome {
            Ok(user) => self.machine.send(Event::UserFetchComplete { user }),
            Err(err) => self.machine.send(Event::UserFetchError {
                reason: err.to_string(),
            }),
        }
        self.auth.status()
    }

    /// Forward an `INCREMENT` to the machine.
    pub fn increment(&mut self) {
        self.machine.send(Event::Increment);
    }

    /// Forward a `RESET` to the machine.
    pub fn reset(&mut self) {
        self.machine.send(Event::Reset);
    }

    /// Forward a `SAVE_COUNT` to the machine and start the save collaborator
    /// if the machine requested it. At most one save runs at a time.
    pub fn save_count(&mut self) {
        self.machine.send(Event::SaveCount);
        for command in self.machine.take_commands() {
            match command {
                Command::SaveCount => {
                    if self.pending_save.is_none() {
                        self.pending_save = Some(self.save.begin());
                    }
                }
            }
        }
    }

    /// Run the pending save to completion.
    ///
    /// Save failure is non-fatal: it is recorded in the task status only and
    /// never rolls back the count or changes the machine's phase. Returns
    /// the save status.
    pub async fn drive_save(&mut self, env: &Env) -> TaskStatus {
        let Some((epoch, effect)) = self.pending_save.take() else {
            return self.save.status();
        };

        let outcome = effect.run(env).await;
        self.save.settle(epoch, &outcome);
        self.save.status()
    }

    /// True iff the user fetch has completed successfully.
    pub fn auth_is_fresh(&self) -> bool {
        self.auth.status() == TaskStatus::Complete
    }

    /// True iff a count save is in flight.
    pub fn is_saving(&self) -> bool {
        self.save.status() == TaskStatus::Pending
    }

    /// Current session data, convenience passthrough.
    pub fn session(&self) -> &Session {
        self.machine.session()
    }
}
