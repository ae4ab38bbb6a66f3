//! Turns a confirmed intent into exactly one remote write.
//!
//! # Design
//! Each write is split like the client calls it wraps: `begin_*` validates,
//! builds the request and raises the operation's in-flight flag; `complete`
//! lowers the flag and, only when the write succeeded, hands back the list
//! request that reloads the store. A reload can therefore never be issued
//! before its write's response is known.
//!
//! There is one flag per operation and no queue. Create, update and delete
//! do not wait on each other.

use crate::client::TodoClient;
use crate::config::ValidationPolicy;
use crate::error::{ApiError, SyncError};
use crate::http::{HttpRequest, HttpResponse};
use crate::selection::Selection;
use crate::store::ListStore;
use crate::types::{Operation, TodoDraft, TodoId};

/// A write that has been handed to the host and not yet completed.
#[derive(Debug)]
#[must_use = "a pending write keeps its operation in flight until completed"]
pub struct PendingWrite {
    op: Operation,
    target: Option<TodoId>,
    request: HttpRequest,
}

impl PendingWrite {
    pub fn operation(&self) -> Operation {
        self.op
    }

    /// The todo being updated or deleted; `None` for create.
    pub fn target(&self) -> Option<TodoId> {
        self.target
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }
}

#[derive(Debug, Default)]
pub struct MutationCoordinator {
    policy: ValidationPolicy,
    creating: bool,
    updating: bool,
    deleting: bool,
}

impl MutationCoordinator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Whether the control triggering `op` should be disabled.
    pub fn is_in_flight(&self, op: Operation) -> bool {
        match op {
            Operation::Create => self.creating,
            Operation::Update => self.updating,
            Operation::Delete => self.deleting,
        }
    }

    fn flag_mut(&mut self, op: Operation) -> &mut bool {
        match op {
            Operation::Create => &mut self.creating,
            Operation::Update => &mut self.updating,
            Operation::Delete => &mut self.deleting,
        }
    }

    fn ensure_idle(&self, op: Operation) -> Result<(), SyncError> {
        if self.is_in_flight(op) {
            return Err(SyncError::Busy(op));
        }
        Ok(())
    }

    fn start(
        &mut self,
        op: Operation,
        target: Option<TodoId>,
        request: Result<HttpRequest, ApiError>,
    ) -> Result<PendingWrite, SyncError> {
        let request = request.map_err(|source| SyncError::Api { op, source })?;
        *self.flag_mut(op) = true;
        tracing::debug!(%op, id = ?target.map(TodoId::get), "write started");
        Ok(PendingWrite {
            op,
            target,
            request,
        })
    }

    pub fn begin_create(&mut self, client: &TodoClient, form: &TodoDraft) -> Result<PendingWrite, SyncError> {
        let op = Operation::Create;
        self.ensure_idle(op)?;
        self.policy.check(form)?;
        self.start(op, None, client.build_create_todo(form))
    }

    pub fn begin_update(&mut self, client: &TodoClient, editing: &Selection) -> Result<PendingWrite, SyncError> {
        let op = Operation::Update;
        self.ensure_idle(op)?;
        let (id, draft) = targeted(editing, op)?;
        self.policy.check(draft)?;
        self.start(op, Some(id), client.build_update_todo(id, draft))
    }

    /// Delete is not validated; the draft is only sent along as the body.
    pub fn begin_delete(&mut self, client: &TodoClient, deleting: &Selection) -> Result<PendingWrite, SyncError> {
        let op = Operation::Delete;
        self.ensure_idle(op)?;
        let (id, draft) = targeted(deleting, op)?;
        self.start(op, Some(id), client.build_delete_todo(id, draft))
    }

    /// Finish `pending` with the transport outcome.
    ///
    /// Returns the reload request on success. On failure nothing but the
    /// in-flight flag changes.
    pub fn complete(
        &mut self,
        client: &TodoClient,
        store: &mut ListStore,
        pending: PendingWrite,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Result<HttpRequest, SyncError> {
        let PendingWrite { op, target, .. } = pending;
        *self.flag_mut(op) = false;

        let parsed = outcome.and_then(|response| match op {
            Operation::Create => client.parse_create_todo(response),
            Operation::Update => client.parse_update_todo(response),
            Operation::Delete => client.parse_delete_todo(response),
        });

        match parsed {
            Ok(()) => {
                tracing::info!(%op, id = ?target.map(TodoId::get), "write succeeded, reloading");
                Ok(store.begin_load(client))
            }
            Err(source) => {
                tracing::warn!(
                    %op,
                    id = ?target.map(TodoId::get),
                    rejected = source.is_rejection(),
                    error = %source,
                    "write failed"
                );
                Err(SyncError::Api { op, source })
            }
        }
    }
}

fn targeted(selection: &Selection, op: Operation) -> Result<(TodoId, &TodoDraft), SyncError> {
    match selection {
        Selection::Targeting { target, draft } => Ok((target.id, draft)),
        Selection::Idle => Err(SyncError::NoTarget(op)),
    }
}
