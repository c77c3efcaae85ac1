//! Priority inference from list position
//!
//! After a reorder, the pending tasks of a category are re-banded by their
//! position: the top of the list is high priority, the bottom is low.
//! Completed tasks keep whatever priority they had.

use crate::todo::{Category, Priority};
use chrono::{DateTime, Utc};

/// Band for the task at `index` among `len` pending tasks
///
/// Lists of up to three tasks get high for the first, low for the last and
/// medium in between. Longer lists are split by quartile: indices below
/// `ceil(len/4)` are high, below `ceil(3*len/4)` medium, the rest low.
pub fn band_for(index: usize, len: usize) -> Priority {
    debug_assert!(index < len);

    if len <= 3 {
        if index == 0 {
            Priority::High
        } else if index == len - 1 {
            Priority::Low
        } else {
            Priority::Medium
        }
    } else {
        let high_end = len.div_ceil(4);
        let medium_end = (3 * len).div_ceil(4);
        if index < high_end {
            Priority::High
        } else if index < medium_end {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

/// Bands for a pending list of `len` tasks, top to bottom
pub fn infer_bands(len: usize) -> Vec<Priority> {
    (0..len).map(|i| band_for(i, len)).collect()
}

/// Re-band the pending tasks of `category` in place
///
/// Only tasks whose band actually changes are written; each of those gets
/// `updated_at` bumped to `now`.
///
/// # Returns
/// The ids of the tasks whose priority changed, in list order
pub fn apply_to_category(category: &mut Category, now: DateTime<Utc>) -> Vec<String> {
    let len = category.pending_tasks().count();
    let mut changed = Vec::new();

    for (index, task) in category
        .tasks
        .iter_mut()
        .filter(|t| t.is_pending())
        .enumerate()
    {
        let band = band_for(index, len);
        if task.priority != band {
            task.priority = band;
            task.touch(now);
            changed.push(task.id.clone());
        }
    }

    changed
}
