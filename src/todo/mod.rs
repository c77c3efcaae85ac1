//! Task organizer domain models
//!
//! - `task`: Task, Category and Priority
//! - `color`: CSS colors of categories
//! - `seed`: the default state used on first start
//! - `serde_impl`: persisted JSON format and its validation

mod color;
mod seed;
mod serde_impl;
mod task;

pub use color::Color;
pub use seed::default_categories;
pub use serde_impl::{check_invariants, decode_categories, encode_categories};
pub use task::{Category, Priority, Task};
