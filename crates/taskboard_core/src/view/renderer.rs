//! Visible list projection of the task store.
//!
//! # Responsibility
//! - Keep one visible item per rendered task, in collection order.
//! - Own the rendered-item-to-task association used by click delegation.
//!
//! # Invariants
//! - `ItemKey` values are never reused within one renderer.
//! - The renderer never reads from or writes to the store.

use crate::model::task::{Task, TaskId};
use std::fmt::{Display, Formatter};

/// Opaque handle for one rendered item, carried by click events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(u64);

impl ItemKey {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl Display for ItemKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

/// Action affordance attached to every visible item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemAction {
    ToggleDone,
    Edit,
    Delete,
}

impl ItemAction {
    /// All affordances in display order.
    pub const ALL: [ItemAction; 3] = [Self::ToggleDone, Self::Edit, Self::Delete];

    /// Markup class name for this affordance.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::ToggleDone => "finish-todo",
            Self::Edit => "edit-todo",
            Self::Delete => "remove-todo",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "finish-todo" => Some(Self::ToggleDone),
            "edit-todo" => Some(Self::Edit),
            "remove-todo" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// On-screen representation of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleItem {
    pub key: ItemKey,
    pub task_id: TaskId,
    pub label: String,
    /// The "done" visual marker.
    pub done: bool,
    /// Set by view filters; hidden items stay rendered.
    pub hidden: bool,
}

impl VisibleItem {
    pub fn affordances(&self) -> [ItemAction; 3] {
        ItemAction::ALL
    }
}

/// Retained list of visible items.
#[derive(Debug, Default)]
pub struct Renderer {
    items: Vec<VisibleItem>,
    next_key: u64,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the list and renders every task in order.
    pub fn render_all(&mut self, tasks: &[Task]) {
        self.items.clear();
        for task in tasks {
            self.render_one(task);
        }
    }

    /// Appends one item for `task` and returns its key.
    pub fn render_one(&mut self, task: &Task) -> ItemKey {
        self.next_key += 1;
        let key = ItemKey(self.next_key);
        self.items.push(VisibleItem {
            key,
            task_id: task.id,
            label: task.text.clone(),
            done: task.done,
            hidden: false,
        });
        key
    }

    /// Updates the label in place. Returns `false` when no item shows `id`.
    pub fn update_text(&mut self, id: TaskId, new_text: &str) -> bool {
        match self.item_mut(id) {
            Some(item) => {
                item.label = new_text.to_string();
                true
            }
            None => false,
        }
    }

    /// Removes the item showing `id`. Missing items are a no-op.
    pub fn remove_visible(&mut self, id: TaskId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.task_id != id);
        self.items.len() != before
    }

    /// Toggles the done marker. Returns the new marker state.
    pub fn toggle_visible_done(&mut self, id: TaskId) -> Option<bool> {
        self.item_mut(id).map(|item| {
            item.done = !item.done;
            item.done
        })
    }

    /// Resolves a click target to the task it represents.
    pub fn resolve(&self, key: ItemKey) -> Option<TaskId> {
        self.items
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.task_id)
    }

    pub fn item(&self, id: TaskId) -> Option<&VisibleItem> {
        self.items.iter().find(|item| item.task_id == id)
    }

    pub fn items(&self) -> &[VisibleItem] {
        &self.items
    }

    pub(crate) fn items_mut(&mut self) -> &mut [VisibleItem] {
        &mut self.items
    }

    /// Items not hidden by filters, in display order.
    pub fn visible_items(&self) -> impl Iterator<Item = &VisibleItem> {
        self.items.iter().filter(|item| !item.hidden)
    }

    fn item_mut(&mut self, id: TaskId) -> Option<&mut VisibleItem> {
        self.items.iter_mut().find(|item| item.task_id == id)
    }
}
