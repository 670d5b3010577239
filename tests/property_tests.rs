//! Property-based tests for the counter machine.
//!
//! These tests use proptest to verify machine invariants hold across many
//! randomly generated event sequences.

use proptest::prelude::*;
use tally::builder::MachineBuilder;
use tally::core::{Event, Phase, ResetPolicy, Role, Session, User};
use tally::machine::CounterMachine;

fn user(role: Role) -> User {
    User {
        id: "1".to_string(),
        name: "heymp".to_string(),
        role,
    }
}

fn started(limit: u32, policy: ResetPolicy) -> CounterMachine {
    let mut machine = MachineBuilder::new()
        .limit(limit)
        .reset_policy(policy)
        .build()
        .unwrap();
    machine.start();
    machine
}

prop_compose! {
    fn arbitrary_role()(variant in 0..4u8) -> Role {
        match variant {
            0 => Role::Admin,
            1 => Role::Editor,
            2 => Role::User,
            _ => Role::Anonymous,
        }
    }
}

prop_compose! {
    fn arbitrary_ui_event()(variant in 0..3u8) -> Event {
        match variant {
            0 => Event::Increment,
            1 => Event::Reset,
            _ => Event::SaveCount,
        }
    }
}

proptest! {
    #[test]
    fn count_tracks_accepted_increments_exactly(
        limit in 1..20u32,
        events in prop::collection::vec(arbitrary_ui_event(), 0..40),
    ) {
        let mut machine = started(limit, ResetPolicy::custom("never", |_| false));
        machine.send(Event::UserFetchComplete { user: user(Role::User) });

        let mut expected = 0u32;
        for event in events {
            let accepted_increment =
                event == Event::Increment && machine.phase() == Phase::Default;
            machine.send(event);
            if accepted_increment {
                expected += 1;
            }
        }

        // With resets denied, the count is exactly the number of increments
        // accepted while in default, capped by the limit.
        prop_assert_eq!(machine.count(), expected);
        prop_assert!(machine.count() <= limit);
    }

    #[test]
    fn complete_is_entered_exactly_at_the_limit(limit in 1..15u32) {
        let mut machine = started(limit, ResetPolicy::always());
        machine.send(Event::UserFetchComplete { user: user(Role::User) });

        for sent in 1..=limit {
            prop_assert_eq!(machine.phase(), Phase::Default);
            machine.send(Event::Increment);
            prop_assert_eq!(machine.count(), sent);
        }
        prop_assert_eq!(machine.phase(), Phase::Complete);
    }

    #[test]
    fn denied_reset_changes_nothing(
        limit in 1..10u32,
        increments in 0..10u32,
    ) {
        let mut machine = started(limit, ResetPolicy::custom("never", |_| false));
        machine.send(Event::UserFetchComplete { user: user(Role::Admin) });

        for _ in 0..increments {
            machine.send(Event::Increment);
        }
        let phase_before = machine.phase();
        let count_before = machine.count();

        machine.send(Event::Reset);

        prop_assert_eq!(machine.phase(), phase_before);
        prop_assert_eq!(machine.count(), count_before);
    }

    #[test]
    fn reset_cycle_reaches_complete_again(limit in 1..8u32) {
        let mut machine = started(limit, ResetPolicy::always());
        machine.send(Event::UserFetchComplete { user: user(Role::User) });

        for _ in 0..limit {
            machine.send(Event::Increment);
        }
        prop_assert_eq!(machine.phase(), Phase::Complete);

        machine.send(Event::Reset);
        prop_assert_eq!(machine.phase(), Phase::Default);
        prop_assert_eq!(machine.count(), 0);

        for _ in 0..limit {
            machine.send(Event::Increment);
        }
        prop_assert_eq!(machine.phase(), Phase::Complete);
        prop_assert_eq!(machine.count(), limit);
    }

    #[test]
    fn error_absorbs_arbitrary_event_sequences(
        events in prop::collection::vec(arbitrary_ui_event(), 0..20),
        role in arbitrary_role(),
    ) {
        let mut machine = started(5, ResetPolicy::always());
        machine.send(Event::UserFetchError {
            reason: "no backend".to_string(),
        });
        prop_assert_eq!(machine.phase(), Phase::Error);

        for event in events {
            machine.send(event);
        }
        machine.send(Event::UserFetchComplete { user: user(role) });

        prop_assert_eq!(machine.phase(), Phase::Error);
        prop_assert_eq!(machine.count(), 0);
        prop_assert_eq!(machine.log().transitions().len(), 1);
    }

    #[test]
    fn log_path_is_contiguous(
        events in prop::collection::vec(arbitrary_ui_event(), 0..30),
    ) {
        let mut machine = started(3, ResetPolicy::count_positive());
        machine.send(Event::UserFetchComplete { user: user(Role::Admin) });
        for event in events {
            machine.send(event);
        }

        let transitions = machine.log().transitions();
        for pair in transitions.windows(2) {
            prop_assert_eq!(pair[0].to, pair[1].from);
        }
        if let Some(first) = transitions.first() {
            prop_assert_eq!(first.from, Phase::Initializing);
        }
        if let Some(last) = transitions.last() {
            prop_assert_eq!(last.to, machine.phase());
        }
    }

    #[test]
    fn session_roundtrip_serialization(
        role in arbitrary_role(),
        count in 0..100u32,
        limit in 1..100u32,
    ) {
        let session = Session {
            user: Some(user(role)),
            count,
            limit,
        };

        let json = serde_json::to_string(&session).unwrap();
        let parsed: Session = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(session, parsed);
    }

    #[test]
    fn event_roundtrip_serialization(event in arbitrary_ui_event()) {
        let json = serde_json::to_string(&event).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(event, parsed);
    }
}
