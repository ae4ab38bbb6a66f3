//! The single owned state container a todo UI renders from.
//!
//! # Overview
//! `TodoApp` owns the list store, the mutation coordinator, the create form,
//! one selection per modal (edit, delete) and the pending user-visible
//! notice. Views read from it and report user intents back to it; nothing is
//! shared behind their back.
//!
//! # Driving it
//! Every network step comes in two halves so an event loop can suspend in
//! between:
//!
//! ```text
//! submit_update() -> PendingWrite ──host runs request──> complete_write()
//!                                                           │ Ok(reload)
//!                        complete_load() <──host runs reload┘
//! ```
//!
//! Hosts that are fine blocking call [`TodoApp::load`], [`TodoApp::create`],
//! [`TodoApp::update`] or [`TodoApp::delete`] with a [`Transport`] instead.

use crate::client::TodoClient;
use crate::config::{ClientConfig, ValidationPolicy};
use crate::coordinator::{MutationCoordinator, PendingWrite};
use crate::error::{ApiError, SyncError};
use crate::http::{HttpRequest, HttpResponse};
use crate::selection::Selection;
use crate::store::ListStore;
use crate::transport::Transport;
use crate::types::{Operation, Todo, TodoDraft, TodoId};

/// A failure the user has to acknowledge, shown as a blocking alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub operation: Operation,
    pub message: String,
}

#[derive(Debug)]
pub struct TodoApp {
    client: TodoClient,
    store: ListStore,
    coordinator: MutationCoordinator,
    form: TodoDraft,
    editing: Selection,
    deleting: Selection,
    notice: Option<Notice>,
}

impl TodoApp {
    pub fn new(client: TodoClient, policy: ValidationPolicy) -> Self {
        Self {
            client,
            store: ListStore::new(),
            coordinator: MutationCoordinator::new(policy),
            form: TodoDraft::default(),
            editing: Selection::default(),
            deleting: Selection::default(),
            notice: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(TodoClient::new(&config.base_url), config.validation)
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub fn store(&self) -> &ListStore {
        &self.store
    }

    pub fn todos(&self) -> &[Todo] {
        self.store.todos()
    }

    pub fn form(&self) -> &TodoDraft {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut TodoDraft {
        &mut self.form
    }

    pub fn editing(&self) -> &Selection {
        &self.editing
    }

    pub fn deleting(&self) -> &Selection {
        &self.deleting
    }

    /// The edit modal's draft, if the modal is open.
    pub fn edit_draft_mut(&mut self) -> Option<&mut TodoDraft> {
        self.editing.draft_mut()
    }

    pub fn is_in_flight(&self, op: Operation) -> bool {
        self.coordinator.is_in_flight(op)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Hand the pending notice to the UI, clearing it.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    // --- selection ---

    /// Open the edit modal on the stored todo with `id`.
    pub fn begin_edit(&mut self, id: TodoId) -> Result<(), SyncError> {
        let todo = self.store.find(id).ok_or(SyncError::NoTarget(Operation::Update))?;
        self.editing.begin(todo)
    }

    /// Open the delete modal on the stored todo with `id`.
    pub fn begin_delete(&mut self, id: TodoId) -> Result<(), SyncError> {
        let todo = self.store.find(id).ok_or(SyncError::NoTarget(Operation::Delete))?;
        self.deleting.begin(todo)
    }

    pub fn cancel_edit(&mut self) {
        self.editing.cancel();
    }

    pub fn cancel_delete(&mut self) {
        self.deleting.cancel();
    }

    // --- load ---

    pub fn begin_load(&mut self) -> HttpRequest {
        self.store.begin_load(&self.client)
    }

    /// Apply a list response. Failures are logged and kept on the store, never
    /// raised as a notice.
    pub fn complete_load(&mut self, outcome: Result<HttpResponse, ApiError>) -> Result<(), ApiError> {
        self.store.complete_load(&self.client, outcome)
    }

    // --- writes ---

    pub fn submit_create(&mut self) -> Result<PendingWrite, SyncError> {
        let result = self.coordinator.begin_create(&self.client, &self.form);
        self.note_failure(Operation::Create, result)
    }

    pub fn submit_update(&mut self) -> Result<PendingWrite, SyncError> {
        let result = self.coordinator.begin_update(&self.client, &self.editing);
        self.note_failure(Operation::Update, result)
    }

    pub fn submit_delete(&mut self) -> Result<PendingWrite, SyncError> {
        let result = self.coordinator.begin_delete(&self.client, &self.deleting);
        self.note_failure(Operation::Delete, result)
    }

    /// Finish a write. On success the form is cleared or the matching modal
    /// closed, and the returned request must be run and fed to
    /// [`complete_load`](Self::complete_load). On failure the form and modals
    /// are left exactly as they were and a notice is raised.
    pub fn complete_write(
        &mut self,
        pending: PendingWrite,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Result<HttpRequest, SyncError> {
        let op = pending.operation();
        let target = pending.target();
        let result = self
            .coordinator
            .complete(&self.client, &mut self.store, pending, outcome);
        let reload = self.note_failure(op, result)?;

        match op {
            Operation::Create => self.form.clear(),
            Operation::Update => close_if_targeting(&mut self.editing, target),
            Operation::Delete => close_if_targeting(&mut self.deleting, target),
        }
        Ok(reload)
    }

    fn note_failure<T>(&mut self, op: Operation, result: Result<T, SyncError>) -> Result<T, SyncError> {
        if let Err(err) = &result {
            let message = match err {
                SyncError::Validation(invalid) => Some(invalid.to_string()),
                SyncError::Api { .. } => Some(format!("failed to {op} todo")),
                SyncError::Busy(_) | SyncError::NoTarget(_) | SyncError::AlreadyTargeting => None,
            };
            if let Some(message) = message {
                self.notice = Some(Notice { operation: op, message });
            }
        }
        result
    }

    // --- blocking drivers ---

    pub fn load<T: Transport>(&mut self, transport: &T) -> Result<(), ApiError> {
        self.store.load(&self.client, transport)
    }

    pub fn create<T: Transport>(&mut self, transport: &T) -> Result<(), SyncError> {
        let pending = self.submit_create()?;
        self.run_write(transport, pending)
    }

    pub fn update<T: Transport>(&mut self, transport: &T) -> Result<(), SyncError> {
        let pending = self.submit_update()?;
        self.run_write(transport, pending)
    }

    pub fn delete<T: Transport>(&mut self, transport: &T) -> Result<(), SyncError> {
        let pending = self.submit_delete()?;
        self.run_write(transport, pending)
    }

    fn run_write<T: Transport>(&mut self, transport: &T, pending: PendingWrite) -> Result<(), SyncError> {
        let outcome = transport.execute(pending.request());
        let reload = self.complete_write(pending, outcome)?;
        // The write already succeeded; a failed reload stays on the store.
        let _ = self.complete_load(transport.execute(&reload));
        Ok(())
    }
}

/// The modal may have been cancelled, or reopened on another todo, while the
/// write was out.
fn close_if_targeting(selection: &mut Selection, target: Option<TodoId>) {
    if selection.target_id() == target {
        selection.on_success();
    }
}
