//! Store behaviour: reorder, priority inference and invariants
mod common;

use chrono::Duration;
use common::*;
use std::cell::Cell;
use std::rc::Rc;
use toodo::Priority::{High, Low, Medium};
use toodo::priority;
use toodo::todo::check_invariants;
use toodo::{Clock, Color, Priority, StoreError};

#[test]
fn test_two_task_promotion_keeps_unchanged_bands() {
    let (mut store, _storage, clock) = get_test_store();
    let cat = store
        .add_category("Home", Color::rgb(0xFF, 0x65, 0x84), "🏠")
        .unwrap();
    let a = store.add_task(&cat, "A", "", Low, None).unwrap();
    let b = store.add_task(&cat, "B", "", High, None).unwrap();
    let created = clock.now();

    clock.advance(Duration::minutes(5));
    store.reorder(&cat, &b, &a).unwrap();

    assert_eq!(task_ids(&store, &cat), vec![b.clone(), a.clone()]);
    assert_eq!(priorities(&store, &cat), vec![High, Low]);

    let snapshot = store.list_categories();
    // Neither band changed, so neither timestamp moved
    assert_eq!(snapshot.find_task(&a).unwrap().1.updated_at, created);
    assert_eq!(snapshot.find_task(&b).unwrap().1.updated_at, created);
}

#[test]
fn test_four_task_quartile_rule() {
    assert_eq!(priority::infer_bands(4), vec![High, Medium, Medium, Low]);

    let (mut store, _storage, _clock) = get_test_store();
    let (cat, ids) = category_with_tasks(&mut store, &["T1", "T2", "T3", "T4"]);
    assert_eq!(priorities(&store, &cat), vec![Low; 4]);

    // Swapping the last two applies the rule to the whole list
    store.reorder(&cat, &ids[3], &ids[2]).unwrap();
    assert_eq!(
        task_ids(&store, &cat),
        vec![ids[0].clone(), ids[1].clone(), ids[3].clone(), ids[2].clone()]
    );
    assert_eq!(priorities(&store, &cat), vec![High, Medium, Medium, Low]);
}

#[test]
fn test_reorder_skips_completed_tasks_when_banding() {
    let (mut store, _storage, _clock) = get_test_store();
    let cat = store
        .add_category("Work", Color::rgb(0x6C, 0x63, 0xFF), "💼")
        .unwrap();
    let a = store.add_task(&cat, "A", "", Low, None).unwrap();
    let b = store.add_task(&cat, "B", "", High, None).unwrap();
    let c = store.add_task(&cat, "C", "", Low, None).unwrap();
    let d = store.add_task(&cat, "D", "", Low, None).unwrap();
    store.toggle_task_completion(&cat, &b);

    store.reorder(&cat, &d, &a).unwrap();

    assert_eq!(task_ids(&store, &cat), vec![d, a, b.clone(), c]);
    assert_eq!(priorities(&store, &cat), vec![High, Medium, High, Low]);
    let snapshot = store.list_categories();
    assert!(snapshot.find_task(&b).unwrap().1.completed);
}

#[test]
fn test_adjacent_reorder_is_undone_by_reverse_drop() {
    let (mut store, _storage, _clock) = get_test_store();
    let (cat, ids) = category_with_tasks(&mut store, &["A", "B", "C", "D", "E"]);

    store.reorder(&cat, &ids[1], &ids[2]).unwrap();
    store.reorder(&cat, &ids[2], &ids[1]).unwrap();
    assert_eq!(task_ids(&store, &cat), ids);
}

#[test]
fn test_reorder_failures_leave_state_alone() {
    let (mut store, _storage, _clock) = get_test_store();
    let (cat, ids) = category_with_tasks(&mut store, &["A", "B"]);
    let before = store.list_categories();

    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let _sub = store.subscribe(move |_| counter.set(counter.get() + 1));

    assert_eq!(
        store.reorder("nope", &ids[0], &ids[1]),
        Err(StoreError::UnknownCategory("nope".to_string()))
    );
    assert_eq!(
        store.reorder(&cat, &ids[0], "ghost"),
        Err(StoreError::UnknownTask("ghost".to_string()))
    );
    assert_eq!(store.reorder(&cat, &ids[0], &ids[0]), Ok(()));

    assert_eq!(calls.get(), 0);
    assert!(store.list_categories().same_as(&before));
}

#[test]
fn test_invariants_hold_after_every_mutation() {
    let (mut store, _storage, clock) = get_test_store();
    let check = |store: &toodo::Store| {
        check_invariants(&store.list_categories()).unwrap();
    };

    let (work, ids) = category_with_tasks(&mut store, &["A", "B", "C"]);
    check(&store);
    let home = store
        .add_category("Home", Color::rgb(0x06, 0xD6, 0xA0), "🏡")
        .unwrap();
    check(&store);

    clock.advance(Duration::hours(1));
    store.toggle_task_completion(&work, &ids[1]);
    check(&store);
    store.reorder(&work, &ids[2], &ids[0]).unwrap();
    check(&store);
    store.update_task_priority(&work, &ids[0], Priority::High).unwrap();
    check(&store);
    store.add_task(&home, "Water plants", "", Medium, None).unwrap();
    check(&store);
    store.remove_task(&work, &ids[1]);
    check(&store);
    store.remove_category(&home);
    check(&store);

    assert_eq!(store.list_categories().len(), 1);
}

#[test]
fn test_add_task_validates_before_mutating() {
    let (mut store, storage, _clock) = get_test_store();
    let (cat, _) = category_with_tasks(&mut store, &[]);
    let persisted = storage.raw(toodo::CATEGORIES_KEY);

    assert!(matches!(
        store.add_task(&cat, "   ", "", Low, None),
        Err(StoreError::InvalidInput(_))
    ));
    assert!(matches!(
        store.add_category("  ", Color::rgb(0, 0, 0), ""),
        Err(StoreError::InvalidInput(_))
    ));
    assert_eq!(storage.raw(toodo::CATEGORIES_KEY), persisted);
}
