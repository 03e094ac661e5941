// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    SwitchableSnapshotStore, create_loaded_store, create_test_catalog, create_test_course,
    create_test_line,
};
use crate::{
    CartSummary, CommittedSet, CoreError, MemorySnapshotStore, NoticeLevel, SNAPSHOT_KEY,
    SelectionPatch, SelectionStore, SnapshotStore, StoreState, SubscriptionId,
};
use seat_adopt_domain::{Catalog, CourseId, CourseType, Decimal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

fn seats(value: &str) -> SelectionPatch {
    SelectionPatch {
        is_selected: None,
        seats: Some(value.to_string()),
    }
}

fn select() -> SelectionPatch {
    SelectionPatch {
        is_selected: Some(true),
        seats: None,
    }
}

fn cart_with_one_line() -> CommittedSet {
    let mut lines: CommittedSet = CommittedSet::new();
    lines.insert(
        CourseId::new("1"),
        create_test_line("1", CourseType::BTech, "Bhopal", 2, 1000),
    );
    lines
}

#[test]
fn test_edit_without_catalog_is_rejected() {
    let mut store: SelectionStore<MemorySnapshotStore> =
        SelectionStore::new(MemorySnapshotStore::new());
    let result: Result<bool, CoreError> = store.set_selection(&CourseId::new("1"), select());
    assert_eq!(result, Err(CoreError::CatalogNotLoaded));
}

#[test]
fn test_seat_scenario_rejects_over_limit_edit() {
    let mut store: SelectionStore<MemorySnapshotStore> = create_loaded_store();
    let course: CourseId = CourseId::new("1");

    assert!(store.set_selection(&course, seats("3")).unwrap());
    assert_eq!(
        store.get().session.selections[&course].total_price,
        Decimal::from(3000)
    );

    let writes_before: usize = store.persistence().writes();
    let err: CoreError = store.set_selection(&course, seats("7")).unwrap_err();

    assert_eq!(err.notice().level, NoticeLevel::Warning);
    assert_eq!(err.notice().message, "Maximum available seats: 5");
    assert_eq!(store.get().session.selections[&course].seats, Some(3));
    assert_eq!(store.persistence().writes(), writes_before);
}

#[test]
fn test_commit_is_idempotent() {
    let mut store: SelectionStore<MemorySnapshotStore> = create_loaded_store();
    let notifications: Arc<Mutex<usize>> = Arc::new(Mutex::new(0));
    let counter: Arc<Mutex<usize>> = Arc::clone(&notifications);
    store.subscribe(move |_| *counter.lock().unwrap() += 1);

    assert!(store.commit(cart_with_one_line()).unwrap());
    let writes: usize = store.persistence().writes();
    assert!(!store.commit(cart_with_one_line()).unwrap());

    assert_eq!(store.persistence().writes(), writes);
    assert_eq!(*notifications.lock().unwrap(), 1);
}

#[test]
fn test_subscribers_observe_written_state() {
    let mut store: SelectionStore<MemorySnapshotStore> = create_loaded_store();
    let seen: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
    let sink: Arc<Mutex<Vec<usize>>> = Arc::clone(&seen);
    store.subscribe(move |state: &StoreState| {
        sink.lock().unwrap().push(state.session.selected_courses.len());
    });

    store.commit(cart_with_one_line()).unwrap();
    store.reset().unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![1, 0]);
}

#[test]
fn test_unsubscribe_stops_notifications() {
    let mut store: SelectionStore<MemorySnapshotStore> = create_loaded_store();
    let notifications: Arc<Mutex<usize>> = Arc::new(Mutex::new(0));
    let counter: Arc<Mutex<usize>> = Arc::clone(&notifications);
    let id: SubscriptionId = store.subscribe(move |_| *counter.lock().unwrap() += 1);

    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.commit(cart_with_one_line()).unwrap();

    assert_eq!(*notifications.lock().unwrap(), 0);
}

#[test]
fn test_reset_keeps_catalog_and_clears_error() {
    let mut store: SelectionStore<MemorySnapshotStore> = create_loaded_store();
    store.commit(cart_with_one_line()).unwrap();
    store.set_error("Failed to fetch courses");

    store.reset().unwrap();

    assert!(store.get().session.selected_courses.is_empty());
    assert!(store.get().error.is_none());
    assert_eq!(store.get().catalog, Some(create_test_catalog()));
}

#[test]
fn test_proceed_commits_and_summarizes() {
    let mut store: SelectionStore<MemorySnapshotStore> = create_loaded_store();
    store.set_selection(&CourseId::new("1"), seats("2")).unwrap();
    store.set_selection(&CourseId::new("3"), seats("1")).unwrap();

    let summary: CartSummary = store.proceed().unwrap();

    assert_eq!(summary.line_count, 2);
    assert_eq!(summary.total_amount, Decimal::from(2800));
    assert_eq!(store.get().session.selected_courses.len(), 2);
}

#[test]
fn test_failed_reset_keeps_cart_and_error() {
    let failing: Arc<AtomicBool> = Arc::new(AtomicBool::new(false));
    let adapter: SwitchableSnapshotStore = SwitchableSnapshotStore::new(Arc::clone(&failing));
    let mut store: SelectionStore<SwitchableSnapshotStore> = SelectionStore::new(adapter);
    store.set_catalog(create_test_catalog());
    store.commit(cart_with_one_line()).unwrap();
    store.set_error("Failed to fetch courses");

    failing.store(true, Ordering::SeqCst);
    let err: CoreError = store.reset().unwrap_err();

    assert!(matches!(err, CoreError::Persistence(_)));
    assert_eq!(store.get().error.as_deref(), Some("Failed to fetch courses"));
    assert_eq!(store.get().session.selected_courses, cart_with_one_line());
}

#[test]
fn test_reset_notifies_once() {
    let mut store: SelectionStore<MemorySnapshotStore> = create_loaded_store();
    store.commit(cart_with_one_line()).unwrap();
    store.set_error("Failed to fetch courses");

    let notifications: Arc<Mutex<usize>> = Arc::new(Mutex::new(0));
    let counter: Arc<Mutex<usize>> = Arc::clone(&notifications);
    store.subscribe(move |state: &StoreState| {
        assert!(state.error.is_none());
        *counter.lock().unwrap() += 1;
    });

    store.reset().unwrap();
    assert_eq!(*notifications.lock().unwrap(), 1);
}

#[test]
fn test_proceed_drops_drafts_after_inventory_shrinks() {
    let mut store: SelectionStore<MemorySnapshotStore> = create_loaded_store();
    store.set_selection(&CourseId::new("1"), seats("5")).unwrap();

    store.set_catalog(Catalog::new(vec![create_test_course(
        "1",
        CourseType::BTech,
        "Bhopal",
        "rgpv bhopal",
        1000,
        2,
    )]));

    assert_eq!(store.proceed().unwrap_err(), CoreError::NothingSelected);
    assert!(store.get().session.selected_courses.is_empty());
}

#[test]
fn test_drafts_not_reseeded_beyond_seats_left() {
    let mut store: SelectionStore<MemorySnapshotStore> = create_loaded_store();
    store.commit(cart_with_one_line()).unwrap();

    store.set_catalog(Catalog::new(vec![create_test_course(
        "1",
        CourseType::BTech,
        "Bhopal",
        "rgpv bhopal",
        1000,
        1,
    )]));
    store.load_drafts_from_committed().unwrap();

    assert!(store.get().session.selections.is_empty());
    assert_eq!(store.get().session.selected_courses.len(), 1);
}

#[test]
fn test_proceed_with_nothing_selected_is_rejected() {
    let mut store: SelectionStore<MemorySnapshotStore> = create_loaded_store();
    assert_eq!(store.proceed().unwrap_err(), CoreError::NothingSelected);
    assert!(store.get().session.selected_courses.is_empty());
}

#[test]
fn test_drafts_reseed_from_cart() {
    let mut store: SelectionStore<MemorySnapshotStore> = create_loaded_store();
    store.commit(cart_with_one_line()).unwrap();

    store.load_drafts_from_committed().unwrap();
    let draft = &store.get().session.selections[&CourseId::new("1")];
    assert!(draft.is_selected);
    assert_eq!(draft.seats, Some(2));
    assert_eq!(draft.total_price, Decimal::from(2000));

    store.reset_drafts().unwrap();
    assert!(store.get().session.selections.is_empty());
}

#[test]
fn test_current_step_is_validated() {
    let mut store: SelectionStore<MemorySnapshotStore> = create_loaded_store();
    store.set_current_step(5).unwrap();
    assert_eq!(store.get().session.current_step, 5);

    let err: CoreError = store.set_current_step(6).unwrap_err();
    assert_eq!(err.to_string(), "Invalid step: 6. Must be between 0 and 5");
    assert_eq!(store.get().session.current_step, 5);
}

#[test]
fn test_loading_and_error_flags() {
    let mut store: SelectionStore<MemorySnapshotStore> =
        SelectionStore::new(MemorySnapshotStore::new());
    store.set_loading(true);
    assert!(store.get().is_loading);

    store.set_error("Network error");
    assert!(!store.get().is_loading);
    assert_eq!(store.get().error.as_deref(), Some("Network error"));

    store.clear_error();
    assert!(store.get().error.is_none());

    store.set_loading(true);
    store.set_catalog(create_test_catalog());
    assert!(!store.get().is_loading);
}

#[test]
fn test_restore_round_trips_through_adapter() {
    let mut store: SelectionStore<MemorySnapshotStore> = create_loaded_store();
    store.set_current_step(2).unwrap();
    store.set_selection(&CourseId::new("1"), seats("3")).unwrap();
    store.commit(cart_with_one_line()).unwrap();

    let adapter: MemorySnapshotStore = store.persistence().clone();
    assert_eq!(adapter.schema_version(SNAPSHOT_KEY), Some(1));

    let mut restored: SelectionStore<MemorySnapshotStore> = SelectionStore::new(adapter);
    assert!(restored.restore().unwrap());
    assert_eq!(restored.get().session, store.get().session);
    assert!(restored.get().catalog.is_none());
}

#[test]
fn test_restore_discards_unreadable_snapshot() {
    let mut adapter: MemorySnapshotStore = MemorySnapshotStore::new();
    adapter.save(SNAPSHOT_KEY, "{broken", 1).unwrap();

    let mut store: SelectionStore<MemorySnapshotStore> = SelectionStore::new(adapter);
    assert!(!store.restore().unwrap());
    assert!(store.get().session.selected_courses.is_empty());
    assert_eq!(store.persistence().schema_version(SNAPSHOT_KEY), None);
}

#[test]
fn test_restore_without_snapshot() {
    let mut store: SelectionStore<MemorySnapshotStore> =
        SelectionStore::new(MemorySnapshotStore::new());
    assert!(!store.restore().unwrap());
}
