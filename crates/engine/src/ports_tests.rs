// SPDX-License-Identifier: MIT

use super::*;
use bos_core::FakeClock;

fn allocator(dir: &std::path::Path, clock: FakeClock) -> PortAllocator<bos_storage::FsCheckpointWriter, FakeClock> {
    PortAllocator::open_with(bos_storage::FsCheckpointWriter, dir.join("ports.json"), 21000, 21003, clock).expect("open")
}

#[test]
fn allocate_picks_a_free_bindable_port_in_range() {
    let dir = tempfile::tempdir().expect("tempdir");
    let allocator = allocator(dir.path(), FakeClock::new());

    let allocation = allocator.allocate("CheckoutService-acme").expect("allocate");
    assert!((21000..=21003).contains(&allocation.port));
    assert!(allocator.is_allocated(allocation.port));
}

#[test]
fn allocate_does_not_reuse_a_still_live_port() {
    let dir = tempfile::tempdir().expect("tempdir");
    let allocator = allocator(dir.path(), FakeClock::new());

    let first = allocator.allocate("CheckoutService-acme").expect("allocate 1");
    let second = allocator.allocate("PaymentService-acme").expect("allocate 2");
    assert_ne!(first.port, second.port);
}

#[test]
fn exhausted_range_returns_port_exhausted_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let allocator = PortAllocator::open_with(bos_storage::FsCheckpointWriter, dir.path().join("ports.json"), 21010, 21010, FakeClock::new())
        .expect("open");

    allocator.allocate("first").expect("first allocate succeeds");
    let err = allocator.allocate("second").unwrap_err();
    assert!(matches!(err, EngineError::PortExhausted));
}

#[test]
fn release_then_cleanup_after_grace_window_frees_the_port() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = FakeClock::new();
    let allocator = allocator(dir.path(), clock.clone());

    let allocation = allocator.allocate("CheckoutService-acme").expect("allocate");
    allocator.release(allocation.port).expect("release");
    assert!(!allocator.is_allocated(allocation.port));

    clock.advance(std::time::Duration::from_millis(STALE_GRACE_MS - 1));
    assert_eq!(allocator.cleanup_stale().expect("cleanup"), 0);

    clock.advance(std::time::Duration::from_millis(2));
    assert_eq!(allocator.cleanup_stale().expect("cleanup"), 1);
    assert!(allocator.snapshot().iter().all(|a| a.port != allocation.port));
}

#[test]
fn released_port_can_be_reallocated_after_cleanup() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = FakeClock::new();
    let allocator = PortAllocator::open_with(bos_storage::FsCheckpointWriter, dir.path().join("ports.json"), 21020, 21020, clock.clone())
        .expect("open");

    let first = allocator.allocate("first").expect("allocate");
    allocator.release(first.port).expect("release");
    clock.advance(std::time::Duration::from_millis(STALE_GRACE_MS + 1));

    let second = allocator.allocate("second").expect("re-allocate after cleanup");
    assert_eq!(second.port, first.port);
}

#[test]
fn ensure_service_relaunch_honors_previously_persisted_port() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = FakeClock::new();
    let allocator = allocator(dir.path(), clock);

    let first = allocator.allocate("CheckoutService-acme").expect("allocate");
    drop(allocator);

    let clock = FakeClock::new();
    let allocator = allocator(dir.path(), clock);
    let relaunched = allocator.allocate("CheckoutService-acme").expect("re-allocate on relaunch");
    assert_eq!(relaunched.port, first.port);
}

#[test]
fn zombie_allocation_with_no_live_process_is_reclaimed_after_trust_window() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = FakeClock::new();
    let allocator = allocator(dir.path(), clock.clone());

    // Pre-populate the table with an entry for a port nothing is bound to,
    // simulating a crash that skipped `release` (spec.md §8 scenario 3).
    let zombie = bos_core::PortAllocation {
        port: 21001,
        service_name: bos_core::ServiceName::from("OrphanService-acme"),
        allocated_at_ms: clock.epoch_ms(),
        released_at_ms: None,
    };
    allocator.table.insert(zombie.clone()).expect("seed zombie allocation");

    // Within the startup trust window, the zombie is left alone.
    assert_eq!(allocator.cleanup_stale().expect("cleanup within trust window"), 0);
    assert!(allocator.is_allocated(zombie.port));

    clock.advance(std::time::Duration::from_millis(STARTUP_TRUST_MS + 1));
    assert_eq!(allocator.cleanup_stale().expect("cleanup after trust window"), 1);
    assert!(!allocator.is_allocated(zombie.port));
}

#[test]
fn reserved_for_returns_none_once_port_is_actually_bound() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = FakeClock::new();
    let allocator = allocator(dir.path(), clock);

    let allocation = allocator.allocate("CheckoutService-acme").expect("allocate");
    let _listener = std::net::TcpListener::bind(("127.0.0.1", allocation.port)).expect("bind real listener");

    assert_eq!(allocator.reserved_for("CheckoutService-acme"), None);
}
