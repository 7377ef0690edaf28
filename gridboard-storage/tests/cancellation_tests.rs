mod common;

use common::*;
use gridboard_storage::{
    CallContext, ComponentStore, Database, DataSourceStore, StorageConfig, StorageError,
    UpdateOutcome,
};
use rusqlite::Connection;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Takes the write lock on the database in `dir` from a second connection.
fn hold_write_lock(dir: &Path) -> Connection {
    let conn = Connection::open(dir.join("gridboard.db")).unwrap();
    conn.execute_batch("BEGIN IMMEDIATE").unwrap();
    conn
}

fn store_with_busy_timeout(dir: &Path, busy_timeout: Duration) -> DataSourceStore {
    let config = StorageConfig::file(dir.join("gridboard.db")).with_busy_timeout(busy_timeout);
    DataSourceStore::new(Database::open(&config).unwrap())
}

#[test]
fn cancelled_context_fails_create_without_writing() {
    let store = ComponentStore::new(Database::open_in_memory().unwrap());
    let cancelled = CallContext::background();
    cancelled.cancel();

    let err = store
        .create(&cancelled, &sample_component(1, "never", t0()))
        .unwrap_err();
    assert!(matches!(err, StorageError::Cancelled));
    assert!(err.is_unavailable());
    assert!(!err.is_not_found());
    assert!(store.list(&ctx()).unwrap().is_empty());
}

#[test]
fn expired_deadline_fails_update_without_writing() {
    let store = DataSourceStore::new(Database::open_in_memory().unwrap());
    let ds = sample_data_source(1, "primary", t0());
    store.create(&ctx(), &ds).unwrap();

    let expired = CallContext::with_timeout(Duration::ZERO);
    let mut next = ds.clone();
    next.alias = "late".into();
    let err = store.update(&expired, &next, t0() + secs(60)).unwrap_err();

    assert!(matches!(err, StorageError::Cancelled));
    assert_eq!(store.get(&ctx(), ds.id).unwrap().alias, "primary");
}

#[test]
fn cancelled_get_on_missing_row_is_not_not_found() {
    let store = ComponentStore::new(Database::open_in_memory().unwrap());
    let cancelled = CallContext::background();
    cancelled.cancel();
    let err = store
        .get(&cancelled, gridboard_types::ComponentId::generate(1))
        .unwrap_err();
    assert!(matches!(err, StorageError::Cancelled));
}

#[test]
fn cancel_reaches_clones() {
    let ctx = CallContext::background();
    let clone = ctx.clone();
    assert!(!clone.is_done());
    ctx.cancel();
    assert!(clone.is_cancelled());
    assert!(clone.is_done());
}

#[test]
fn generous_deadline_does_not_interfere() {
    let store = ComponentStore::new(Database::open_in_memory().unwrap());
    let ctx = CallContext::with_timeout(Duration::from_secs(30));
    assert!(ctx.deadline().is_some());
    let c = sample_component(1, "ok", t0());
    store.create(&ctx, &c).unwrap();
    assert_eq!(store.get(&ctx, c.id).unwrap(), c);
}

// ── Waiting on another connection's lock ───────────────────────

#[test]
fn deadline_bounds_wait_on_locked_database() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_with_busy_timeout(dir.path(), Duration::from_secs(5));
    let ds = sample_data_source(1, "primary", t0());
    store.create(&ctx(), &ds).unwrap();

    let blocker = hold_write_lock(dir.path());
    let mut next = ds.clone();
    next.alias = "late".into();

    let started = Instant::now();
    let err = store
        .update(&CallContext::with_timeout(Duration::from_millis(100)), &next, t0() + secs(1))
        .unwrap_err();
    let waited = started.elapsed();

    assert!(matches!(err, StorageError::Cancelled), "got {err:?}");
    assert!(waited >= Duration::from_millis(100), "gave up early: {waited:?}");
    assert!(waited < Duration::from_secs(2), "waited {waited:?}");

    drop(blocker);
    assert_eq!(store.get(&ctx(), ds.id).unwrap().alias, "primary");
}

#[test]
fn cancel_ends_wait_on_locked_database() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_with_busy_timeout(dir.path(), Duration::from_secs(5));
    let _blocker = hold_write_lock(dir.path());

    let ctx = CallContext::background();
    let remote = ctx.clone();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        remote.cancel();
    });

    let started = Instant::now();
    let err = store
        .create(&ctx, &sample_data_source(1, "never", t0()))
        .unwrap_err();
    canceller.join().unwrap();

    assert!(matches!(err, StorageError::Cancelled), "got {err:?}");
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn busy_timeout_without_cancel_is_a_busy_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_with_busy_timeout(dir.path(), Duration::from_millis(100));
    let ds = sample_data_source(1, "primary", t0());
    store.create(&ctx(), &ds).unwrap();
    let _blocker = hold_write_lock(dir.path());

    let err = store.update(&ctx(), &ds, t0() + secs(1)).unwrap_err();
    assert!(matches!(err, StorageError::Database(_)), "got {err:?}");
    assert!(err.is_unavailable());
}

#[test]
fn wait_succeeds_once_lock_is_released() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_with_busy_timeout(dir.path(), Duration::from_secs(5));
    let ds = sample_data_source(1, "primary", t0());
    store.create(&ctx(), &ds).unwrap();

    let (locked_tx, locked_rx) = mpsc::channel();
    let path = dir.path().to_path_buf();
    let blocker = thread::spawn(move || {
        let conn = hold_write_lock(&path);
        locked_tx.send(()).unwrap();
        thread::sleep(Duration::from_millis(150));
        conn.execute_batch("ROLLBACK").unwrap();
    });
    locked_rx.recv().unwrap();

    let mut next = ds.clone();
    next.alias = "after-wait".into();
    let outcome = store
        .update(&CallContext::with_timeout(Duration::from_secs(3)), &next, t0() + secs(1))
        .unwrap();
    blocker.join().unwrap();

    assert_eq!(outcome, UpdateOutcome::Applied);
    assert_eq!(store.get(&ctx(), ds.id).unwrap().alias, "after-wait");
}
