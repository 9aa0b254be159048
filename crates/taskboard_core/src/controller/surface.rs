//! Host surface contract consumed by the interaction controller.
//!
//! A host (terminal, Flutter shell, test fake) implements [`TaskView`] and
//! feeds [`UiEvent`] values into the controller.

use crate::view::renderer::{ItemAction, ItemKey, VisibleItem};

/// Which form pair is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    /// Add form and list visible, edit form hidden.
    #[default]
    Add,
    /// Edit form visible, add form and list hidden.
    Edit,
}

impl FormMode {
    pub fn add_form_visible(self) -> bool {
        self == Self::Add
    }

    pub fn edit_form_visible(self) -> bool {
        self == Self::Edit
    }

    pub fn list_visible(self) -> bool {
        self == Self::Add
    }
}

/// User gesture delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    AddSubmitted,
    ItemClicked { key: ItemKey, action: ItemAction },
    EditSubmitted,
    EditCancelled,
    /// Raw search input value, sent on every keystroke.
    SearchInput(String),
    SearchCleared,
    /// Raw filter control value (`all`, `done`, `pending`).
    FilterChanged(String),
}

/// Capabilities the controller needs from the host surface.
pub trait TaskView {
    /// Current value of the add form input.
    fn add_input(&self) -> String;
    fn clear_add_input(&mut self);
    fn focus_add_input(&mut self);

    /// Current value of the edit form input.
    fn edit_input(&self) -> String;
    fn set_edit_input(&mut self, text: &str);

    fn clear_search_input(&mut self);

    /// Applies visibility of add form, edit form and list for `mode`.
    fn show_form(&mut self, mode: FormMode);

    /// Repaints the list. Hidden items are included with `hidden = true`.
    fn paint_list(&mut self, items: &[VisibleItem]);

    /// Blocks on a yes/no prompt.
    fn confirm(&mut self, prompt: &str) -> bool;
}
