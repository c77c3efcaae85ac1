//! Serialization and deserialization for the persisted category list
//!
//! Categories are stored as a single JSON array. `Color` is written in its
//! CSS hex form but read from any CSS color string, and a decoded blob is
//! only accepted when the store invariants hold for it.

use super::color::Color;
use super::task::Category;
use crate::error::LoadError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ColorVisitor;

        impl Visitor<'_> for ColorVisitor {
            type Value = Color;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a CSS color such as \"#6C63FF\"")
            }

            fn visit_str<E>(self, v: &str) -> Result<Color, E>
            where
                E: de::Error,
            {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(ColorVisitor)
    }
}

/// Encode categories into the persisted JSON blob
pub fn encode_categories(categories: &[Category]) -> Result<String, serde_json::Error> {
    serde_json::to_string(categories)
}

/// Decode and validate a persisted JSON blob
///
/// # Returns
/// The categories if the blob parses and satisfies the id, ownership and
/// timestamp invariants; a `LoadError` otherwise.
pub fn decode_categories(blob: &str) -> Result<Vec<Category>, LoadError> {
    let categories: Vec<Category> = serde_json::from_str(blob)?;
    check_invariants(&categories)?;
    Ok(categories)
}

/// Verify the structural invariants of a category list
pub fn check_invariants(categories: &[Category]) -> Result<(), LoadError> {
    let mut category_ids = HashSet::new();
    let mut task_ids = HashSet::new();

    for category in categories {
        if !category_ids.insert(category.id.as_str()) {
            return Err(LoadError::Inconsistent(format!(
                "duplicate category id '{}'",
                category.id
            )));
        }

        for task in &category.tasks {
            if !task_ids.insert(task.id.as_str()) {
                return Err(LoadError::Inconsistent(format!(
                    "duplicate task id '{}'",
                    task.id
                )));
            }
            if task.category_id != category.id {
                return Err(LoadError::Inconsistent(format!(
                    "task '{}' claims category '{}' but is stored under '{}'",
                    task.id, task.category_id, category.id
                )));
            }
            if task.title.trim().is_empty() {
                return Err(LoadError::Inconsistent(format!(
                    "task '{}' has an empty title",
                    task.id
                )));
            }
            if task.updated_at < task.created_at {
                return Err(LoadError::Inconsistent(format!(
                    "task '{}' was updated before it was created",
                    task.id
                )));
            }
        }
    }

    Ok(())
}
