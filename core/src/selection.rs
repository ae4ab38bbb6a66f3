//! The todo targeted by an edit or delete modal, plus its draft.
//!
//! One `Selection` backs one modal: `Idle → Targeting → Idle`. Editing and
//! deleting each get their own instance, so both can be active at once.

use crate::error::SyncError;
use crate::types::{Todo, TodoDraft, TodoId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Targeting {
        target: Todo,
        draft: TodoDraft,
    },
}

impl Selection {
    /// Target `todo` and prefill the draft from it.
    ///
    /// Both the target and the draft are copies; editing the draft never
    /// touches the list store.
    pub fn begin(&mut self, todo: &Todo) -> Result<(), SyncError> {
        if self.is_active() {
            return Err(SyncError::AlreadyTargeting);
        }
        *self = Selection::Targeting {
            target: todo.clone(),
            draft: TodoDraft::from(todo),
        };
        Ok(())
    }

    /// Drop the target and its draft without sending anything.
    pub fn cancel(&mut self) {
        *self = Selection::Idle;
    }

    /// Called once the write for this target succeeded.
    pub fn on_success(&mut self) {
        self.cancel();
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Selection::Targeting { .. })
    }

    pub fn target(&self) -> Option<&Todo> {
        match self {
            Selection::Idle => None,
            Selection::Targeting { target, .. } => Some(target),
        }
    }

    pub fn target_id(&self) -> Option<TodoId> {
        self.target().map(|todo| todo.id)
    }

    pub fn draft(&self) -> Option<&TodoDraft> {
        match self {
            Selection::Idle => None,
            Selection::Targeting { draft, .. } => Some(draft),
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut TodoDraft> {
        match self {
            Selection::Idle => None,
            Selection::Targeting { draft, .. } => Some(draft),
        }
    }
}
