mod support;

use trilha_core::model::Progress;
use trilha_core::time::fixed_now;

use support::{FakeGateway, app};

fn completed(id: &str, module: u32) -> Progress {
    let mut progress = Progress::new_empty(id, "u1", module.to_string(), module);
    progress.completed = true;
    progress.completed_at = Some(fixed_now());
    progress
}

#[tokio::test]
async fn module_one_is_always_open() {
    let fake = FakeGateway::new();
    let app = app(&fake);
    assert!(app.gate().can_start_module("u1", 1).await);

    // Even for an unknown user with an unreachable backend.
    fake.go_offline();
    assert!(app.gate().can_start_module("nobody", 1).await);
}

#[tokio::test]
async fn module_two_needs_one_completion() {
    let fake = FakeGateway::new();
    let app = app(&fake);

    assert!(!app.gate().can_start_module("u1", 2).await);

    fake.seed_progress(Progress::new_empty("p1", "u1", "1", 1));
    assert!(
        !app.gate().can_start_module("u1", 2).await,
        "an uncompleted record must not count"
    );

    fake.seed_progress(completed("p2", 1));
    assert!(app.gate().can_start_module("u1", 2).await);
}

#[tokio::test]
async fn threshold_counts_any_completed_modules() {
    let fake = FakeGateway::new();
    // Completions of modules 1 and 3, skipping 2.
    fake.seed_progress(completed("p1", 1));
    fake.seed_progress(completed("p3", 3));
    let app = app(&fake);

    // Two completions of any kind unlock module 3.
    assert!(app.gate().can_start_module("u1", 3).await);
    // Module 4 needs three.
    assert!(!app.gate().can_start_module("u1", 4).await);
}

#[tokio::test]
async fn other_users_completions_do_not_count() {
    let fake = FakeGateway::new();
    let mut other = completed("p1", 1);
    other.user_id = "u2".to_string();
    fake.seed_progress(other);
    let app = app(&fake);

    assert!(!app.gate().can_start_module("u1", 2).await);
}

#[tokio::test]
async fn gate_degrades_to_cached_records_offline() {
    let fake = FakeGateway::new();
    fake.seed_progress(completed("p1", 1));
    let app = app(&fake);

    // One healthy evaluation mirrors the records into the cache.
    assert!(app.gate().can_start_module("u1", 2).await);

    fake.go_offline();
    assert!(app.gate().can_start_module("u1", 2).await);
    assert!(!app.gate().can_start_module("u1", 3).await);
}
