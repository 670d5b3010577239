//! Counter Widget
//!
//! This demo walks a counter machine through its full lifecycle the way a
//! UI host would: attach, wait for the user fetch, count to the limit,
//! save, reset.
//!
//! Key concepts:
//! - Host-driven attach/detach lifecycle
//! - Fetch completion synthesized directly into the machine
//! - Subscribers observing every accepted event
//!
//! Run with: cargo run --example counter_widget

use std::sync::{Arc, Mutex};
use stillwater::prelude::*;
use tally::builder::MachineBuilder;
use tally::core::{ResetPolicy, Role, User};
use tally::effects::{MachineHost, Task};

#[derive(Clone)]
struct DemoEnv {
    user: User,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== Counter Widget Demo ===\n");

    let machine = MachineBuilder::new()
        .limit(5)
        .reset_policy(ResetPolicy::admin_only())
        .build()
        .expect("reset policy and limit are set");

    let auth = Task::new(|| from_fn(|env: &DemoEnv| Ok(env.user.clone())).boxed());
    let save = Task::new(|| pure(true).boxed());
    let mut host = MachineHost::new(machine, auth, save);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    host.machine_mut().subscribe(move |phase, session| {
        sink.lock()
            .unwrap()
            .push(format!("{} (count {})", phase.name(), session.count));
    });

    let env = DemoEnv {
        user: User {
            id: "1".to_string(),
            name: "heymp".to_string(),
            role: Role::Admin,
        },
    };

    println!("Attaching host...");
    host.attach();
    println!("  phase: {}\n", host.machine().phase().name());

    println!("Driving the user fetch:");
    host.drive_auth(&env).await;
    println!(
        "  loaded {} ({:?}), phase: {}\n",
        host.machine().user().map(|u| u.name.as_str()).unwrap_or("?"),
        host.machine().user().map(|u| u.role),
        host.machine().phase().name()
    );

    println!("Counting to the limit:");
    for _ in 0..5 {
        host.increment();
        println!(
            "  count {} phase {}",
            host.machine().count(),
            host.machine().phase().name()
        );
    }

    println!("\nResetting (admin policy allows it):");
    host.reset();
    println!(
        "  count {} phase {}\n",
        host.machine().count(),
        host.machine().phase().name()
    );

    println!("Saving the count:");
    host.increment();
    host.save_count();
    let status = host.drive_save(&env).await;
    println!("  save status: {:?}\n", status);

    println!("Observed updates:");
    for line in seen.lock().unwrap().iter() {
        println!("  {}", line);
    }

    host.detach();

    println!("\nKey Takeaways:");
    println!("- The machine stays in initializing until the fetch settles");
    println!("- Increments complete exactly at the limit, then stop counting");
    println!("- The reset policy is configuration, not a hardcoded rule");
    println!("- Save failures never touch the phase or the count");

    println!("\n=== Demo Complete ===");
}
