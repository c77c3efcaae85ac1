//! Common test utilities for integration tests

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use tempfile::TempDir;
use toodo::{CATEGORIES_KEY, Color, FileStore, ManualClock, MemoryStore, Priority, Store};

pub fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

/// Create a store over empty in-memory storage with a manual clock
pub fn get_test_store() -> (Store, MemoryStore, ManualClock) {
    let storage = MemoryStore::with_value(CATEGORIES_KEY, "[]");
    let clock = ManualClock::new(at("2025-03-01T09:00:00Z"));
    let store = Store::with_clock(storage.clone(), clock.clone());
    (store, storage, clock)
}

/// Create a store backed by files in a fresh temporary directory
pub fn get_file_store() -> (Store, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = Store::open(FileStore::new(dir.path()));
    (store, dir)
}

/// Add a category holding one low-priority task per title
///
/// Returns the category id and the task ids in list order.
pub fn category_with_tasks(store: &mut Store, titles: &[&str]) -> (String, Vec<String>) {
    let cat = store
        .add_category("Work", Color::rgb(0x6C, 0x63, 0xFF), "💼")
        .unwrap();
    let ids = titles
        .iter()
        .map(|title| store.add_task(&cat, title, "", Priority::Low, None).unwrap())
        .collect();
    (cat, ids)
}

/// Task ids of a category in list order
pub fn task_ids(store: &Store, category_id: &str) -> Vec<String> {
    store
        .list_categories()
        .find_category(category_id)
        .unwrap()
        .tasks
        .iter()
        .map(|t| t.id.clone())
        .collect()
}

pub fn priorities(store: &Store, category_id: &str) -> Vec<Priority> {
    store
        .list_categories()
        .find_category(category_id)
        .unwrap()
        .tasks
        .iter()
        .map(|t| t.priority)
        .collect()
}
