//! The store: single owner of all categories and tasks
//!
//! Readers get immutable `Snapshot`s; every mutation goes through a `Store`
//! method, which validates its input, applies the change copy-on-write,
//! mirrors the result to durable storage and then notifies subscribers
//! exactly once. Operations that change nothing neither persist nor notify.

use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::ordering;
use crate::priority;
use crate::storage::{CATEGORIES_KEY, KeyValueStore};
use crate::todo::{self, Category, Color, Priority, Task};
use crate::validation;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::collections::HashSet;
use std::ops::Deref;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Read-only view of the store's categories at one point in time
///
/// Cloning is cheap. A snapshot never changes; later mutations produce new
/// snapshots.
#[derive(Debug, Clone)]
pub struct Snapshot(Arc<Vec<Category>>);

impl Snapshot {
    pub fn categories(&self) -> &[Category] {
        &self.0
    }

    /// True if both snapshots are the same state (pointer identity)
    pub fn same_as(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn find_category(&self, category_id: &str) -> Option<&Category> {
        self.0.iter().find(|c| c.id == category_id)
    }

    /// Find a task anywhere in the snapshot, with its category
    pub fn find_task(&self, task_id: &str) -> Option<(&Category, &Task)> {
        self.0
            .iter()
            .find_map(|c| c.find_task(task_id).map(|t| (c, t)))
    }
}

impl Deref for Snapshot {
    type Target = [Category];

    fn deref(&self) -> &[Category] {
        &self.0
    }
}

type Listener = Rc<RefCell<dyn FnMut(&Snapshot)>>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Handle returned by `Store::subscribe`
///
/// The listener stays attached until `unsubscribe` is called or the store is
/// dropped.
pub struct Subscription {
    id: u64,
    listeners: Weak<RefCell<Listeners>>,
}

impl Subscription {
    /// Detach the listener; it will not be called again
    pub fn unsubscribe(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners
                .borrow_mut()
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}

/// Outcome of reading persisted state on cold start
enum Loaded {
    State(Vec<Category>),
    /// Absent or corrupt; the seed replaces it
    Missing,
    /// Storage failed to read; the seed is used in memory only
    Unreadable,
}

/// Authoritative in-memory task collection, mirrored to local storage
pub struct Store {
    state: Arc<Vec<Category>>,
    focus_task: Option<String>,
    current_category: Option<String>,
    storage: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    listeners: Rc<RefCell<Listeners>>,
}

impl Store {
    /// Open the store on `storage` using the system clock
    ///
    /// Loads the persisted category list if it decodes cleanly. Absent or
    /// corrupt state is replaced by the default seed, which is persisted. If
    /// storage cannot be read at all, the seed is used in memory and storage
    /// is left alone until the next change.
    pub fn open(storage: impl KeyValueStore + 'static) -> Self {
        Self::with_clock(storage, SystemClock)
    }

    /// Open the store with an explicit time source
    pub fn with_clock(storage: impl KeyValueStore + 'static, clock: impl Clock + 'static) -> Self {
        let mut store = Self {
            state: Arc::new(Vec::new()),
            focus_task: None,
            current_category: None,
            storage: Box::new(storage),
            clock: Box::new(clock),
            listeners: Rc::new(RefCell::new(Listeners::default())),
        };

        match store.load() {
            Loaded::State(categories) => store.state = Arc::new(categories),
            Loaded::Missing => {
                store.state = Arc::new(todo::default_categories(store.clock.now()));
                store.persist();
            }
            Loaded::Unreadable => {
                // Storage may still hold good data; only a real change writes over it
                store.state = Arc::new(todo::default_categories(store.clock.now()));
            }
        }
        store
    }

    /// Read persisted categories
    fn load(&self) -> Loaded {
        let blob = match self.storage.get(CATEGORIES_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                info!(key = CATEGORIES_KEY, "no persisted state, starting from seed");
                return Loaded::Missing;
            }
            Err(e) => {
                warn!(
                    key = CATEGORIES_KEY,
                    error = %e,
                    "failed to read persisted state, using seed without overwriting storage"
                );
                return Loaded::Unreadable;
            }
        };

        match todo::decode_categories(&blob) {
            Ok(categories) => {
                info!(categories = categories.len(), "loaded persisted state");
                Loaded::State(categories)
            }
            Err(e) => {
                warn!(error = %e, "discarding corrupt persisted state");
                Loaded::Missing
            }
        }
    }

    /// Mirror the current categories to storage; failures are only logged
    fn persist(&mut self) {
        let blob = match todo::encode_categories(&self.state) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "failed to encode state");
                return;
            }
        };
        if let Err(e) = self.storage.set(CATEGORIES_KEY, &blob) {
            warn!(key = CATEGORIES_KEY, error = %e, "failed to persist state");
        }
    }

    fn notify(&self) {
        let snapshot = self.list_categories();
        // Clone the handles so a listener may unsubscribe while being called
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            (&mut *listener.borrow_mut())(&snapshot);
        }
    }

    fn commit(&mut self) {
        self.persist();
        self.notify();
    }

    fn categories_mut(&mut self) -> &mut Vec<Category> {
        Arc::make_mut(&mut self.state)
    }

    fn category_index(&self, category_id: &str) -> Option<usize> {
        self.state.iter().position(|c| c.id == category_id)
    }

    fn require_category(&self, category_id: &str) -> Result<usize, StoreError> {
        self.category_index(category_id)
            .ok_or_else(|| StoreError::UnknownCategory(category_id.to_string()))
    }

    fn require_task(&self, cat: usize, task_id: &str) -> Result<usize, StoreError> {
        self.state[cat]
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| StoreError::UnknownTask(task_id.to_string()))
    }

    fn task_exists(&self, task_id: &str) -> bool {
        self.state.iter().any(|c| c.find_task(task_id).is_some())
    }

    /// Current categories with their tasks in list order
    pub fn list_categories(&self) -> Snapshot {
        Snapshot(Arc::clone(&self.state))
    }

    /// Append a new, empty category
    ///
    /// # Returns
    /// The new category's id, or `InvalidInput` if `name` is blank
    pub fn add_category(&mut self, name: &str, color: Color, icon: &str) -> Result<String, StoreError> {
        let name = validation::normalize_name(name)?;
        let id = Uuid::new_v4().to_string();

        self.categories_mut().push(Category {
            id: id.clone(),
            name,
            color,
            icon: icon.trim().to_string(),
            tasks: Vec::new(),
        });
        debug!(category = %id, "added category");

        self.commit();
        Ok(id)
    }

    /// Remove a category and all of its tasks; unknown ids are ignored
    pub fn remove_category(&mut self, category_id: &str) {
        let category_id = validation::normalize_id(category_id);
        let Some(index) = self.category_index(category_id) else {
            return;
        };

        let removed = self.categories_mut().remove(index);
        if self.current_category.as_deref() == Some(category_id) {
            self.current_category = None;
        }
        if let Some(focus) = &self.focus_task
            && removed.find_task(focus).is_some()
        {
            self.focus_task = None;
        }
        debug!(category = %category_id, tasks = removed.tasks.len(), "removed category");

        self.commit();
    }

    /// Append a new pending task to a category
    ///
    /// # Arguments
    /// * `category_id` - Category that will own the task
    /// * `title` - Title; trimmed, must not be blank
    /// * `description` - Free text, may be empty
    /// * `priority` - Initial priority band
    /// * `due_date` - Optional due date
    ///
    /// # Returns
    /// The new task's id
    pub fn add_task(
        &mut self,
        category_id: &str,
        title: &str,
        description: &str,
        priority: Priority,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<String, StoreError> {
        let title = validation::normalize_title(title)?;
        let category_id = validation::normalize_id(category_id);
        let cat = self.require_category(category_id)?;

        let now = self.clock.now();
        let id = Uuid::new_v4().to_string();
        let task = Task {
            id: id.clone(),
            title,
            description: validation::normalize_line_endings(description),
            completed: false,
            category_id: category_id.to_string(),
            priority,
            created_at: now,
            updated_at: now,
            due_date,
        };
        self.categories_mut()[cat].tasks.push(task);
        debug!(category = %category_id, task = %id, %priority, "added task");

        self.commit();
        Ok(id)
    }

    /// Remove a task; unknown ids are ignored
    pub fn remove_task(&mut self, category_id: &str, task_id: &str) {
        let task_id = validation::normalize_id(task_id);
        let Some(cat) = self.category_index(validation::normalize_id(category_id)) else {
            return;
        };
        let Ok(index) = self.require_task(cat, task_id) else {
            return;
        };

        self.categories_mut()[cat].tasks.remove(index);
        if self.focus_task.as_deref() == Some(task_id) {
            self.focus_task = None;
        }
        debug!(task = %task_id, "removed task");

        self.commit();
    }

    /// Flip a task between pending and completed; unknown ids are ignored
    pub fn toggle_task_completion(&mut self, category_id: &str, task_id: &str) {
        let task_id = validation::normalize_id(task_id);
        let Some(cat) = self.category_index(validation::normalize_id(category_id)) else {
            return;
        };
        let Ok(index) = self.require_task(cat, task_id) else {
            return;
        };

        let now = self.clock.now();
        let task = &mut self.categories_mut()[cat].tasks[index];
        task.completed = !task.completed;
        task.touch(now);
        debug!(task = %task_id, completed = task.completed, "toggled task");

        self.commit();
    }

    /// Move `from_id` into the slot held by `to_id`, then re-band priorities
    ///
    /// The whole category sequence (completed tasks included) is permuted;
    /// priorities are then inferred from positions in the pending
    /// subsequence. Dropping a task on itself changes nothing.
    pub fn reorder(&mut self, category_id: &str, from_id: &str, to_id: &str) -> Result<(), StoreError> {
        let (from_id, to_id) = (validation::normalize_id(from_id), validation::normalize_id(to_id));
        let cat = self.require_category(validation::normalize_id(category_id))?;
        self.require_task(cat, from_id)?;
        self.require_task(cat, to_id)?;
        if from_id == to_id {
            return Ok(());
        }

        let now = self.clock.now();
        let category = &mut self.categories_mut()[cat];
        category.tasks = ordering::reorder(&category.tasks, from_id, to_id);
        let changed = priority::apply_to_category(category, now);
        debug!(
            category = %category.id,
            from = %from_id,
            to = %to_id,
            rebanded = changed.len(),
            "reordered tasks"
        );

        self.commit();
        Ok(())
    }

    /// Replace a category's order with a permutation of its task ids
    ///
    /// Priorities are re-inferred afterwards, as for `reorder`.
    ///
    /// # Returns
    /// `InvalidInput` if `order` is not exactly a permutation of the
    /// category's current task ids
    pub fn set_task_order<S: AsRef<str>>(&mut self, category_id: &str, order: &[S]) -> Result<(), StoreError> {
        let cat = self.require_category(validation::normalize_id(category_id))?;
        let current = &self.state[cat].tasks;

        let mut seen = HashSet::new();
        let mut reordered = Vec::with_capacity(order.len());
        for id in order {
            let id = validation::normalize_id(id.as_ref());
            if !seen.insert(id) {
                return Err(StoreError::invalid(format!("Task '{}' listed twice", id)));
            }
            let task = current.iter().find(|t| t.id == id).ok_or_else(|| {
                StoreError::invalid(format!("Task '{}' is not in this category", id))
            })?;
            reordered.push(task.clone());
        }
        if reordered.len() != current.len() {
            return Err(StoreError::invalid(format!(
                "Order lists {} task(s) but the category has {}",
                reordered.len(),
                current.len()
            )));
        }
        if reordered.iter().zip(current).all(|(a, b)| a.id == b.id) {
            return Ok(());
        }

        let now = self.clock.now();
        let category = &mut self.categories_mut()[cat];
        category.tasks = reordered;
        let changed = priority::apply_to_category(category, now);
        debug!(category = %category.id, rebanded = changed.len(), "replaced task order");

        self.commit();
        Ok(())
    }

    /// Set a task's priority by hand
    pub fn update_task_priority(
        &mut self,
        category_id: &str,
        task_id: &str,
        priority: Priority,
    ) -> Result<(), StoreError> {
        let task_id = validation::normalize_id(task_id);
        let cat = self.require_category(validation::normalize_id(category_id))?;
        let index = self.require_task(cat, task_id)?;
        if self.state[cat].tasks[index].priority == priority {
            return Ok(());
        }

        let now = self.clock.now();
        let task = &mut self.categories_mut()[cat].tasks[index];
        task.priority = priority;
        task.touch(now);
        debug!(task = %task_id, %priority, "updated priority");

        self.commit();
        Ok(())
    }

    /// Point the focus view at a task, or clear it with `None`
    pub fn set_focus_task(&mut self, task_id: Option<&str>) -> Result<(), StoreError> {
        let task_id = task_id.map(validation::normalize_id);
        if let Some(id) = task_id
            && !self.task_exists(id)
        {
            return Err(StoreError::UnknownTask(id.to_string()));
        }
        if self.focus_task.as_deref() == task_id {
            return Ok(());
        }

        self.focus_task = task_id.map(str::to_string);
        self.notify();
        Ok(())
    }

    /// Select the category shown by the task list, or clear it with `None`
    pub fn set_current_category(&mut self, category_id: Option<&str>) -> Result<(), StoreError> {
        let category_id = category_id.map(validation::normalize_id);
        if let Some(id) = category_id {
            self.require_category(id)?;
        }
        if self.current_category.as_deref() == category_id {
            return Ok(());
        }

        self.current_category = category_id.map(str::to_string);
        self.notify();
        Ok(())
    }

    /// Id of the focused task, if any
    pub fn focus_task(&self) -> Option<&str> {
        self.focus_task.as_deref()
    }

    /// The focused task itself
    pub fn focused_task(&self) -> Option<&Task> {
        let id = self.focus_task.as_deref()?;
        self.state.iter().find_map(|c| c.find_task(id))
    }

    /// Id of the selected category, if any
    pub fn current_category(&self) -> Option<&str> {
        self.current_category.as_deref()
    }

    /// Register a listener called with the new snapshot after every change
    pub fn subscribe(&mut self, listener: impl FnMut(&Snapshot) + 'static) -> Subscription {
        let mut listeners = self.listeners.borrow_mut();
        listeners.next_id += 1;
        let id = listeners.next_id;
        let listener: Listener = Rc::new(RefCell::new(listener));
        listeners.entries.push((id, listener));

        Subscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }
}
