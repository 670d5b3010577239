//! Reset Policies
//!
//! The source widget shipped three conflicting rules for when a reset is
//! allowed. This demo shows them side by side as host-supplied policies.
//!
//! Run with: cargo run --example reset_policies

use tally::builder::MachineBuilder;
use tally::core::{Event, ResetPolicy, Role, User};

fn outcome_for(policy: ResetPolicy, role: Role, increments: u32) -> (u32, &'static str) {
    let mut machine = MachineBuilder::new()
        .limit(5)
        .reset_policy(policy)
        .build()
        .expect("policy is set");
    machine.start();

    machine.send(Event::UserFetchComplete {
        user: User {
            id: "1".to_string(),
            name: "heymp".to_string(),
            role,
        },
    });
    for _ in 0..increments {
        machine.send(Event::Increment);
    }

    let recorded = machine.log().transitions().len();
    machine.send(Event::Reset);
    if machine.log().transitions().len() > recorded {
        (machine.count(), "accepted")
    } else {
        (machine.count(), "rejected")
    }
}

fn main() {
    println!("=== Reset Policy Demo ===\n");

    let cases = [
        (ResetPolicy::always(), Role::Anonymous, 2u32),
        (ResetPolicy::count_positive(), Role::Anonymous, 0),
        (ResetPolicy::count_positive(), Role::Anonymous, 3),
        (ResetPolicy::admin_only(), Role::User, 3),
        (ResetPolicy::admin_only(), Role::Admin, 3),
        (
            ResetPolicy::custom("even_counts", |s| s.count % 2 == 0),
            Role::User,
            4,
        ),
    ];

    for (policy, role, increments) in cases {
        let name = policy.name();
        let (count, verdict) = outcome_for(policy, role, increments);
        println!(
            "policy {:<14} role {:<9?} after {} increments: reset {} (count {})",
            name, role, increments, verdict, count
        );
    }

    println!("\nKey Takeaways:");
    println!("- Guards are pure predicates of the session");
    println!("- The canonical policy is the host's call; the builder requires one");

    println!("\n=== Demo Complete ===");
}
