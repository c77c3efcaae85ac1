//! Id-based reordering of a sequence ("drop on target")

use crate::todo::Task;

/// Anything that carries a stable identifier
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for String {
    fn id(&self) -> &str {
        self
    }
}

impl Identified for &str {
    fn id(&self) -> &str {
        self
    }
}

/// Move the item `from_id` into the slot currently held by `to_id`
///
/// The item is removed from its index and inserted at the original index of
/// `to_id`; the items in between shift by one towards the vacated slot.
/// Swapping two neighbours and swapping them back restores the input.
///
/// # Arguments
/// * `seq` - Items with unique ids; left untouched
/// * `from_id` - Id of the item being dragged
/// * `to_id` - Id of the item it was dropped on
///
/// # Returns
/// A new sequence. Equal to `seq` when `from_id == to_id` or when either id
/// is not present.
pub fn reorder<T: Identified + Clone>(seq: &[T], from_id: &str, to_id: &str) -> Vec<T> {
    let mut out = seq.to_vec();
    if from_id == to_id {
        return out;
    }

    let from = seq.iter().position(|item| item.id() == from_id);
    let to = seq.iter().position(|item| item.id() == to_id);
    if let (Some(from), Some(to)) = (from, to) {
        let item = out.remove(from);
        out.insert(to, item);
    }
    out
}
