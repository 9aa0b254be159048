//! Interaction controller binding host gestures to store, renderer and filters.
//!
//! # Responsibility
//! - Translate [`UiEvent`] values into store mutations and view updates.
//! - Own the add/edit form state machine and delete confirmation.
//!
//! # Invariants
//! - Store mutation happens before the matching renderer update.
//! - Filters are re-applied after every list change.
//! - Store errors are logged and never surfaced to the host.
//! - The edit target is carried by id, so duplicate texts cannot be confused.

use crate::controller::surface::{FormMode, TaskView, UiEvent};
use crate::model::task::TaskId;
use crate::repo::kv_repo::KeyValueRepository;
use crate::service::task_store::{StoreError, TaskStore};
use crate::view::filter::{StatusFilter, ViewFilter};
use crate::view::renderer::{ItemAction, ItemKey, Renderer};
use log::{debug, error, warn};

/// Prompt shown before deleting a task.
pub const DELETE_CONFIRM_PROMPT: &str = "Are you sure you want to delete this task?";

/// Task currently open in the edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditTarget {
    pub task_id: TaskId,
}

/// Event-driven controller for one task list surface.
pub struct TaskController<R: KeyValueRepository, V: TaskView> {
    store: TaskStore<R>,
    renderer: Renderer,
    filter: ViewFilter,
    view: V,
    editing: Option<EditTarget>,
}

impl<R: KeyValueRepository, V: TaskView> TaskController<R, V> {
    /// Wires an already-loaded store to a host view. Call [`Self::start`] next.
    pub fn new(store: TaskStore<R>, view: V) -> Self {
        Self {
            store,
            renderer: Renderer::new(),
            filter: ViewFilter::new(),
            view,
            editing: None,
        }
    }

    /// Renders the whole store and shows the add form.
    pub fn start(&mut self) {
        self.renderer.render_all(self.store.tasks());
        self.filter.apply(&mut self.renderer);
        self.view.show_form(FormMode::Add);
        self.repaint();
    }

    /// Handles one user gesture to completion.
    pub fn handle(&mut self, event: UiEvent) {
        match event {
            UiEvent::AddSubmitted => self.on_add_submitted(),
            UiEvent::ItemClicked { key, action } => self.on_item_clicked(key, action),
            UiEvent::EditSubmitted => self.on_edit_submitted(),
            UiEvent::EditCancelled => self.leave_edit_mode(),
            UiEvent::SearchInput(term) => {
                self.filter.search(&mut self.renderer, &term);
            }
            UiEvent::SearchCleared => {
                self.view.clear_search_input();
                self.filter.clear_search(&mut self.renderer);
            }
            UiEvent::FilterChanged(value) => self.on_filter_changed(&value),
        }
        self.repaint();
    }

    pub fn mode(&self) -> FormMode {
        if self.editing.is_some() {
            FormMode::Edit
        } else {
            FormMode::Add
        }
    }

    pub fn editing(&self) -> Option<&EditTarget> {
        self.editing.as_ref()
    }

    pub fn store(&self) -> &TaskStore<R> {
        &self.store
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn filter(&self) -> &ViewFilter {
        &self.filter
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    fn on_add_submitted(&mut self) {
        let input = self.view.add_input();
        let text = input.trim();
        if text.is_empty() {
            self.view.focus_add_input();
            return;
        }

        match self.store.add(text) {
            Ok(task) => {
                self.renderer.render_one(&task);
                self.filter.apply(&mut self.renderer);
            }
            Err(err) => self.recover_from_store_error("add", err),
        }
        self.view.clear_add_input();
        self.view.focus_add_input();
    }

    fn on_item_clicked(&mut self, key: ItemKey, action: ItemAction) {
        if self.editing.is_some() {
            debug!("event=item_click module=controller status=ignored reason=edit_mode key={key}");
            return;
        }
        let Some(id) = self.renderer.resolve(key) else {
            debug!("event=item_click module=controller status=ignored reason=stale_key key={key}");
            return;
        };

        match action {
            ItemAction::ToggleDone => match self.store.toggle_done(id) {
                Ok(Some(_)) => {
                    self.renderer.toggle_visible_done(id);
                    self.filter.apply(&mut self.renderer);
                }
                Ok(None) => {}
                Err(err) => self.recover_from_store_error("toggle", err),
            },
            ItemAction::Edit => self.enter_edit_mode(id),
            ItemAction::Delete => {
                if !self.view.confirm(DELETE_CONFIRM_PROMPT) {
                    debug!("event=task_remove module=controller status=cancelled task_id={id}");
                    return;
                }
                match self.store.remove(id) {
                    Ok(_) => {
                        self.renderer.remove_visible(id);
                    }
                    Err(err) => self.recover_from_store_error("remove", err),
                }
            }
        }
    }

    fn enter_edit_mode(&mut self, id: TaskId) {
        let Some(item) = self.renderer.item(id) else {
            return;
        };
        let label = item.label.clone();
        self.view.set_edit_input(&label);
        self.view.show_form(FormMode::Edit);
        self.editing = Some(EditTarget { task_id: id });
    }

    fn on_edit_submitted(&mut self) {
        let Some(target) = self.editing.as_ref() else {
            debug!("event=edit_submit module=controller status=ignored reason=not_editing");
            return;
        };
        let input = self.view.edit_input();
        let text = input.trim();
        if text.is_empty() {
            return;
        }

        let id = target.task_id;
        match self.store.update(id, text) {
            Ok(true) => {
                self.renderer.update_text(id, text);
                self.filter.apply(&mut self.renderer);
            }
            Ok(false) => {
                debug!("event=edit_submit module=controller status=missing task_id={id}");
            }
            Err(err) => self.recover_from_store_error("update", err),
        }
        self.leave_edit_mode();
    }

    fn leave_edit_mode(&mut self) {
        self.editing = None;
        self.view.show_form(FormMode::Add);
    }

    fn on_filter_changed(&mut self, value: &str) {
        match StatusFilter::parse(value) {
            Some(mode) => {
                self.filter.filter_by_status(&mut self.renderer, mode);
            }
            None => {
                warn!("event=filter_change module=controller status=ignored value={value:?}");
            }
        }
    }

    /// Logs the failure and resyncs the rendered list with the store.
    fn recover_from_store_error(&mut self, operation: &str, err: StoreError) {
        error!("event=store_mutation module=controller status=error op={operation} error={err}");
        self.renderer.render_all(self.store.tasks());
        self.filter.apply(&mut self.renderer);
    }

    fn repaint(&mut self) {
        self.view.paint_list(self.renderer.items());
    }
}
