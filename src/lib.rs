//! toodo - a single-user task organizer
//!
//! Tasks live in ordered categories. Dragging a task to a new position
//! re-infers the priority of every pending task in that category from its
//! place in the list, and the derived views (Today, Important, Overdue,
//! Pending, Completed) are recomputed from the resulting snapshot.
//!
//! # Architecture
//!
//! - **Domain**: `todo` - Task, Category, Priority and the persisted JSON format
//! - **Engine**: `ordering` (drop-on-target permutation) and `priority`
//!   (position-to-band rule)
//! - **Store**: `store` - the single owner of state, with change
//!   notification and write-through persistence to a `storage` back end
//! - **Views**: `selectors` - pure derived views over a snapshot
//! - **Input**: `drag` - the pointer/keyboard state machine that issues
//!   reorders
//!
//! # Example
//!
//! ```
//! use toodo::{Color, MemoryStore, Priority, Store};
//!
//! let mut store = Store::open(MemoryStore::with_value("toodo-categories", "[]"));
//! let work = store.add_category("Work", Color::rgb(0x6C, 0x63, 0xFF), "💼").unwrap();
//! let a = store.add_task(&work, "Write report", "", Priority::Low, None).unwrap();
//! let b = store.add_task(&work, "Book flights", "", Priority::Low, None).unwrap();
//!
//! // Drop "Book flights" onto "Write report": it moves to the top
//! store.reorder(&work, &b, &a).unwrap();
//!
//! let snapshot = store.list_categories();
//! let tasks = &snapshot.find_category(&work).unwrap().tasks;
//! assert_eq!(tasks[0].priority, Priority::High);
//! assert_eq!(tasks[1].priority, Priority::Low);
//! ```

pub mod clock;
pub mod config;
pub mod drag;
pub mod error;
pub mod formatting;
pub mod ordering;
pub mod priority;
pub mod selectors;
pub mod storage;
pub mod store;
pub mod todo;
pub mod validation;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use drag::{DragCoordinator, DragEvent, DragState, InputEvent, ItemSlot, ReorderTarget};
pub use error::{LoadError, StoreError};
pub use storage::{CATEGORIES_KEY, FileStore, KeyValueStore, MemoryStore};
pub use store::{Snapshot, Store, Subscription};
pub use todo::{Category, Color, Priority, Task};
