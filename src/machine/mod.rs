//! Synchronous interpreter for the counter machine.
//!
//! The interpreter owns the phase and session, applies events through the
//! pure transition function, and notifies subscribers after each accepted
//! event. It performs no I/O itself: side effects requested by transitions
//! are surfaced as [`Command`]s for the shell to drain.

use crate::core::{step, Command, Event, Phase, PhaseChange, ResetPolicy, Session, TransitionLog};
use chrono::Utc;
use std::collections::VecDeque;
use uuid::Uuid;

/// Handle returned by [`CounterMachine::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&Phase, &Session) + Send>;

/// A running counter session.
///
/// Events are processed one at a time, synchronously and atomically:
/// `send` appends to an internal FIFO queue and drains it to completion, so
/// follow-up events raised by actions queue behind already-pending events
/// in send order. No event is reordered or coalesced.
///
/// The machine is created via [`MachineBuilder`](crate::builder::MachineBuilder)
/// and driven by a host that starts it when attached to its rendering
/// context and stops it when detached.
///
/// # Example
///
/// ```rust
/// use tally::builder::MachineBuilder;
/// use tally::core::{Event, Phase, ResetPolicy, Role, User};
///
/// let mut machine = MachineBuilder::new()
///     .limit(2)
///     .reset_policy(ResetPolicy::always())
///     .build()
///     .unwrap();
/// machine.start();
///
/// machine.send(Event::UserFetchComplete {
///     user: User {
///         id: "1".to_string(),
///         name: "heymp".to_string(),
///         role: Role::User,
///     },
/// });
/// assert_eq!(machine.phase(), Phase::Default);
///
/// machine.send(Event::Increment);
/// machine.send(Event::Increment);
/// assert_eq!(machine.phase(), Phase::Complete);
/// assert_eq!(machine.count(), 2);
/// ```
pub struct CounterMachine {
    id: Uuid,
    phase: Phase,
    session: Session,
    policy: ResetPolicy,
    log: TransitionLog,
    queue: VecDeque<Event>,
    commands: Vec<Command>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    running: bool,
}

impl CounterMachine {
    /// Create a machine from constructor-supplied initial state.
    ///
    /// The machine always begins in `initializing`, even when the session
    /// was rehydrated with a user: the fetch result is authoritative.
    pub(crate) fn new(session: Session, policy: ResetPolicy) -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: Phase::Initializing,
            session,
            policy,
            log: TransitionLog::new(),
            queue: VecDeque::new(),
            commands: Vec::new(),
            subscribers: Vec::new(),
            next_subscription: 0,
            running: false,
        }
    }

    /// Unique id of this machine instance.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current session data.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current count.
    pub fn count(&self) -> u32 {
        self.session.count
    }

    /// The loaded user, if the fetch has completed.
    pub fn user(&self) -> Option<&crate::core::User> {
        self.session.user.as_ref()
    }

    /// The configured reset policy.
    pub fn policy(&self) -> &ResetPolicy {
        &self.policy
    }

    /// Log of accepted transitions so far.
    pub fn log(&self) -> &TransitionLog {
        &self.log
    }

    /// Whether the machine is accepting events.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin accepting events. Idempotent.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop accepting events and drop all subscribers.
    ///
    /// State survives for inspection; a stopped machine silently drops any
    /// further sends.
    pub fn stop(&mut self) {
        self.running = false;
        self.subscribers.clear();
    }

    /// Send an event to the machine.
    ///
    /// Events sent while the machine is mid-transition (follow-ups raised by
    /// actions) are applied in send order after the current transition's
    /// action completes. Rejected events change nothing and notify nobody.
    pub fn send(&mut self, event: Event) {
        if !self.running {
            return;
        }
        self.queue.push_back(event);
        while let Some(next) = self.queue.pop_front() {
            self.dispatch(&next);
        }
    }

    /// Register an observer called with the phase and session after each
    /// accepted event.
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&Phase, &Session) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a previously registered observer.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(existing, _)| *existing != id);
    }

    /// Capture a serializable snapshot of phase, session, and log.
    pub fn snapshot(&self) -> crate::cache::Snapshot {
        crate::cache::Snapshot::capture(self)
    }

    /// Drain side-effect requests accumulated by accepted transitions.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    fn dispatch(&mut self, event: &Event) {
        let outcome = step(self.phase, &self.session, &self.policy, event);
        if !outcome.accepted {
            return;
        }

        self.log = self.log.record(PhaseChange {
            from: self.phase,
            to: outcome.next,
            event: event.name().to_string(),
            timestamp: Utc::now(),
        });
        self.phase = outcome.next;
        self.session = outcome.session;
        self.commands.extend(outcome.commands);
        self.queue.extend(outcome.followups);

        for (_, subscriber) in &mut self.subscribers {
            subscriber(&self.phase, &self.session);
        }
    }
}

impl std::fmt::Debug for CounterMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CounterMachine")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("session", &self.session)
            .field("policy", &self.policy)
            .field("running", &self.running)
            .finish()
    }
}
