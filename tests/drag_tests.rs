//! Drag sessions driving a real store
mod common;

use common::*;
use std::cell::Cell;
use std::rc::Rc;
use toodo::Priority::{High, Low, Medium};
use toodo::drag::{Key, Point};
use toodo::{DragCoordinator, DragEvent, InputEvent, ItemSlot, Store};

fn layout(ids: &[String]) -> Vec<ItemSlot> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| ItemSlot::new(id.clone(), i as f64 * 40.0, (i + 1) as f64 * 40.0))
        .collect()
}

fn count_notifications(store: &mut Store) -> Rc<Cell<usize>> {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    // Dropping the handle does not detach the listener
    let _ = store.subscribe(move |_| counter.set(counter.get() + 1));
    calls
}

#[test]
fn test_drop_on_self_is_noop() {
    let (mut store, storage, _clock) = get_test_store();
    let (cat, ids) = category_with_tasks(&mut store, &["X", "Y"]);
    let before = store.list_categories();
    let persisted = storage.raw(toodo::CATEGORIES_KEY);
    let calls = count_notifications(&mut store);

    let mut drag = DragCoordinator::new(cat.clone());
    drag.set_layout(layout(&ids));

    let x = ids[0].clone();
    drag.handle(
        InputEvent::PointerDown {
            item_id: x.clone(),
            at: Point::new(10.0, 20.0),
        },
        &mut store,
    );
    let started = drag.handle(
        InputEvent::PointerMove {
            at: Point::new(30.0, 25.0),
        },
        &mut store,
    );
    assert_eq!(
        started,
        Some(DragEvent::Start {
            active_id: x.clone(),
            over_id: x.clone(),
        })
    );
    let ended = drag.handle(
        InputEvent::PointerUp {
            at: Point::new(30.0, 25.0),
        },
        &mut store,
    );

    assert_eq!(
        ended,
        Some(DragEvent::End {
            active_id: x.clone(),
            over_id: x,
            reordered: false,
        })
    );
    assert!(drag.is_idle());
    assert_eq!(calls.get(), 0);
    assert!(store.list_categories().same_as(&before));
    assert_eq!(storage.raw(toodo::CATEGORIES_KEY), persisted);
}

#[test]
fn test_pointer_drag_reorders_store() {
    let (mut store, _storage, _clock) = get_test_store();
    let (cat, ids) = category_with_tasks(&mut store, &["A", "B", "C"]);
    let calls = count_notifications(&mut store);

    let mut drag = DragCoordinator::new(cat.clone());
    drag.set_layout(layout(&ids));

    // Press on C, drag up over A, release
    drag.handle(
        InputEvent::PointerDown {
            item_id: ids[2].clone(),
            at: Point::new(5.0, 100.0),
        },
        &mut store,
    );
    drag.handle(InputEvent::PointerMove { at: Point::new(5.0, 60.0) }, &mut store);
    drag.handle(InputEvent::PointerMove { at: Point::new(5.0, 10.0) }, &mut store);
    let ended = drag.handle(InputEvent::PointerUp { at: Point::new(5.0, 10.0) }, &mut store);

    assert!(matches!(ended, Some(DragEvent::End { reordered: true, .. })));
    assert_eq!(calls.get(), 1);
    assert_eq!(
        task_ids(&store, &cat),
        vec![ids[2].clone(), ids[0].clone(), ids[1].clone()]
    );
    assert_eq!(priorities(&store, &cat), vec![High, Medium, Low]);
    let slot_ids: Vec<&str> = drag.layout().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(slot_ids, vec![ids[2].as_str(), ids[0].as_str(), ids[1].as_str()]);
}

#[test]
fn test_cancel_leaves_store_untouched() {
    let (mut store, _storage, _clock) = get_test_store();
    let (cat, ids) = category_with_tasks(&mut store, &["A", "B"]);
    let calls = count_notifications(&mut store);

    let mut drag = DragCoordinator::new(cat.clone());
    drag.set_layout(layout(&ids));
    drag.handle(
        InputEvent::PointerDown {
            item_id: ids[0].clone(),
            at: Point::new(0.0, 10.0),
        },
        &mut store,
    );
    drag.handle(InputEvent::PointerMove { at: Point::new(0.0, 50.0) }, &mut store);
    let cancelled = drag.handle(InputEvent::Cancel, &mut store);

    assert_eq!(
        cancelled,
        Some(DragEvent::Cancel {
            active_id: ids[0].clone()
        })
    );
    assert_eq!(calls.get(), 0);
    assert_eq!(task_ids(&store, &cat), ids);
}

#[test]
fn test_keyboard_move_down() {
    let (mut store, _storage, _clock) = get_test_store();
    let (cat, ids) = category_with_tasks(&mut store, &["A", "B"]);

    let mut drag = DragCoordinator::new(cat.clone());
    drag.set_layout(layout(&ids));
    let moved = drag.handle(
        InputEvent::KeyDown {
            focused_id: ids[0].clone(),
            key: Key::ArrowDown,
        },
        &mut store,
    );

    assert!(matches!(moved, Some(DragEvent::End { reordered: true, .. })));
    assert_eq!(task_ids(&store, &cat), vec![ids[1].clone(), ids[0].clone()]);
    assert_eq!(priorities(&store, &cat), vec![High, Low]);
}

#[test]
fn test_stale_layout_after_delete_is_silent() {
    let (mut store, _storage, _clock) = get_test_store();
    let (cat, ids) = category_with_tasks(&mut store, &["A", "B"]);
    let mut drag = DragCoordinator::new(cat.clone());
    drag.set_layout(layout(&ids));

    store.remove_task(&cat, &ids[1]);
    let moved = drag.handle(
        InputEvent::KeyDown {
            focused_id: ids[0].clone(),
            key: Key::ArrowDown,
        },
        &mut store,
    );

    assert!(matches!(moved, Some(DragEvent::End { reordered: false, .. })));
    assert!(drag.is_idle());
    assert_eq!(task_ids(&store, &cat), vec![ids[0].clone()]);
}
