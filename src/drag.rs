//! Drag session coordinator
//!
//! A single-pointer state machine for one category's task list. It turns
//! raw pointer and keyboard input into start/move/end events and issues at
//! most one reorder per gesture:
//!
//! ```text
//! Idle --down on handle--> Armed --move >= threshold--> Dragging --up--> Idle
//!   ^                        |                            |   (reorder if over != active)
//!   +------ up / cancel -----+------------ cancel --------+
//! ```
//!
//! Hit-testing uses the vertical axis only; horizontal pointer movement
//! counts towards the activation threshold but never selects a target.

use crate::error::StoreError;
use crate::ordering;
use crate::store::Store;
use tracing::{debug, warn};

/// Pointer distance that turns a press into a drag
pub const DEFAULT_DRAG_THRESHOLD: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The containing window; pointer positions are clamped into it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    /// NaN edges are ignored
    fn clamp(&self, p: Point) -> Point {
        Point {
            x: p.x.max(self.left).min(self.right.max(self.left)),
            y: p.y.max(self.top).min(self.bottom.max(self.top)),
        }
    }
}

/// Vertical extent of one rendered item, `top <= y < bottom`
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSlot {
    pub id: String,
    pub top: f64,
    pub bottom: f64,
}

impl ItemSlot {
    pub fn new(id: impl Into<String>, top: f64, bottom: f64) -> Self {
        Self {
            id: id.into(),
            top,
            bottom,
        }
    }

    fn contains(&self, y: f64) -> bool {
        self.top <= y && y < self.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    Escape,
    Other,
}

/// Raw input delivered to the coordinator
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed on the drag handle of `item_id`
    PointerDown { item_id: String, at: Point },
    PointerMove { at: Point },
    PointerUp { at: Point },
    /// Gesture aborted by the platform or the user
    Cancel,
    /// Key pressed while the handle of `focused_id` has keyboard focus
    KeyDown { focused_id: String, key: Key },
}

/// Session events emitted for the view layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Start {
        active_id: String,
        over_id: String,
    },
    Move {
        active_id: String,
        over_id: String,
    },
    /// Gesture finished; `reordered` is true when the store accepted a move
    End {
        active_id: String,
        over_id: String,
        reordered: bool,
    },
    Cancel {
        active_id: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    /// Pressed on a handle, threshold not crossed yet
    Armed { active_id: String, origin: Point },
    Dragging { active_id: String, over_id: String },
}

/// Receiver of the single reorder call a finished gesture produces
pub trait ReorderTarget {
    fn reorder(&mut self, category_id: &str, from_id: &str, to_id: &str) -> Result<(), StoreError>;
}

impl ReorderTarget for Store {
    fn reorder(&mut self, category_id: &str, from_id: &str, to_id: &str) -> Result<(), StoreError> {
        Store::reorder(self, category_id, from_id, to_id)
    }
}

pub struct DragCoordinator {
    category_id: String,
    threshold: f64,
    slots: Vec<ItemSlot>,
    bounds: Option<Bounds>,
    state: DragState,
}

impl DragCoordinator {
    pub fn new(category_id: impl Into<String>) -> Self {
        Self {
            category_id: category_id.into(),
            threshold: DEFAULT_DRAG_THRESHOLD,
            slots: Vec::new(),
            bounds: None,
            state: DragState::Idle,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.max(0.0);
        self
    }

    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == DragState::Idle
    }

    /// Replace the rendered item layout, kept sorted top to bottom
    pub fn set_layout(&mut self, mut slots: Vec<ItemSlot>) {
        slots.sort_by(|a, b| a.top.total_cmp(&b.top));
        self.slots = slots;
    }

    pub fn layout(&self) -> &[ItemSlot] {
        &self.slots
    }

    pub fn set_bounds(&mut self, bounds: Option<Bounds>) {
        self.bounds = bounds;
    }

    fn clamp(&self, p: Point) -> Point {
        match &self.bounds {
            Some(b) => b.clamp(p),
            None => p,
        }
    }

    fn item_at(&self, y: f64) -> Option<&str> {
        self.slots
            .iter()
            .find(|s| s.contains(y))
            .map(|s| s.id.as_str())
    }

    fn slot_index(&self, id: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.id == id)
    }

    /// Feed one input event through the state machine
    ///
    /// # Arguments
    /// * `event` - The raw input
    /// * `target` - Receives the reorder call when a gesture completes
    ///
    /// # Returns
    /// The session event to show, if the input produced one. Ill-formed
    /// input (e.g. a release without a press) returns `None` and changes
    /// nothing.
    pub fn handle(&mut self, event: InputEvent, target: &mut impl ReorderTarget) -> Option<DragEvent> {
        let state = std::mem::replace(&mut self.state, DragState::Idle);

        let (next, emitted) = match (state, event) {
            (DragState::Idle, InputEvent::PointerDown { item_id, at }) => {
                if self.slot_index(&item_id).is_some() {
                    debug!(active = %item_id, "drag armed");
                    let origin = self.clamp(at);
                    (DragState::Armed { active_id: item_id, origin }, None)
                } else {
                    (DragState::Idle, None)
                }
            }
            (DragState::Idle, InputEvent::KeyDown { focused_id, key }) => {
                (DragState::Idle, self.keyboard_move(&focused_id, key, target))
            }

            (DragState::Armed { active_id, origin }, InputEvent::PointerMove { at }) => {
                if origin.distance(self.clamp(at)) >= self.threshold {
                    debug!(active = %active_id, "drag started");
                    let emitted = DragEvent::Start {
                        active_id: active_id.clone(),
                        over_id: active_id.clone(),
                    };
                    let over_id = active_id.clone();
                    (DragState::Dragging { active_id, over_id }, Some(emitted))
                } else {
                    (DragState::Armed { active_id, origin }, None)
                }
            }
            (
                DragState::Armed { .. },
                InputEvent::PointerUp { .. }
                | InputEvent::Cancel
                | InputEvent::KeyDown {
                    key: Key::Escape,
                    ..
                },
            ) => (DragState::Idle, None),

            (DragState::Dragging { active_id, over_id }, InputEvent::PointerMove { at }) => {
                let y = self.clamp(at).y;
                match self.item_at(y) {
                    Some(hit) if hit != over_id => {
                        let over_id = hit.to_string();
                        let emitted = DragEvent::Move {
                            active_id: active_id.clone(),
                            over_id: over_id.clone(),
                        };
                        (DragState::Dragging { active_id, over_id }, Some(emitted))
                    }
                    _ => (DragState::Dragging { active_id, over_id }, None),
                }
            }
            (DragState::Dragging { active_id, over_id }, InputEvent::PointerUp { .. }) => {
                let reordered = active_id != over_id && self.commit_move(&active_id, &over_id, target);
                (
                    DragState::Idle,
                    Some(DragEvent::End {
                        active_id,
                        over_id,
                        reordered,
                    }),
                )
            }
            (
                DragState::Dragging { active_id, .. },
                InputEvent::Cancel
                | InputEvent::KeyDown {
                    key: Key::Escape,
                    ..
                },
            ) => {
                debug!(active = %active_id, "drag cancelled");
                (DragState::Idle, Some(DragEvent::Cancel { active_id }))
            }

            // Anything else is out of sequence for the current state
            (state, _) => (state, None),
        };

        self.state = next;
        emitted
    }

    /// Arrow keys move the focused item one slot towards its neighbour
    fn keyboard_move(&mut self, focused_id: &str, key: Key, target: &mut impl ReorderTarget) -> Option<DragEvent> {
        let index = self.slot_index(focused_id)?;
        let neighbour = match key {
            Key::ArrowUp => index.checked_sub(1)?,
            Key::ArrowDown if index + 1 < self.slots.len() => index + 1,
            _ => return None,
        };

        let over_id = self.slots[neighbour].id.clone();
        let reordered = self.commit_move(focused_id, &over_id, target);
        Some(DragEvent::End {
            active_id: focused_id.to_string(),
            over_id,
            reordered,
        })
    }

    /// Issue the reorder and mirror it into the local layout
    fn commit_move(&mut self, active_id: &str, over_id: &str, target: &mut impl ReorderTarget) -> bool {
        match target.reorder(&self.category_id, active_id, over_id) {
            Ok(()) => {
                // Geometry stays put; ids shift into their new slots
                let ids: Vec<String> = self.slots.iter().map(|s| s.id.clone()).collect();
                let ids = ordering::reorder(&ids, active_id, over_id);
                for (slot, id) in self.slots.iter_mut().zip(ids) {
                    slot.id = id;
                }
                debug!(active = %active_id, over = %over_id, "drop committed");
                true
            }
            Err(e) => {
                warn!(active = %active_id, over = %over_id, error = %e, "drop rejected by store");
                false
            }
        }
    }
}
