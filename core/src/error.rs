//! Error types for the synchronization layer.
//!
//! # Design
//! `ApiError` covers everything that can go wrong on the wire and is `Clone`
//! so the list store can keep the last load failure around for inspection.
//! `NotFound` keeps a dedicated variant because callers distinguish "the todo
//! is gone" from any other rejection. `SyncError` is what the state container
//! hands back from an operation boundary.

use thiserror::Error;

use crate::types::Operation;

/// Errors produced while building requests, executing them, or parsing the
/// responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// The server answered, but not with a 2xx.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::NotFound | ApiError::Rejected { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
}

/// Client-side rejection of a draft, raised before any request is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("there are empty fields")]
    BlankDraft,

    #[error("{0:?} must not be empty")]
    MissingField(Field),
}

/// Failure of a state-container operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A request for this operation is already outstanding.
    #[error("{0} already in flight")]
    Busy(Operation),

    /// Update or delete was submitted with no selected todo.
    #[error("nothing selected to {0}")]
    NoTarget(Operation),

    /// `begin` was called on a selection that already has a target.
    #[error("selection already has a target")]
    AlreadyTargeting,

    #[error("{op} failed: {source}")]
    Api {
        op: Operation,
        #[source]
        source: ApiError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_covers_only_server_answers() {
        assert!(ApiError::NotFound.is_rejection());
        assert!(ApiError::Rejected {
            status: 500,
            body: String::new()
        }
        .is_rejection());
        assert!(!ApiError::Transport("refused".to_string()).is_rejection());
        assert!(!ApiError::Deserialization("eof".to_string()).is_rejection());
    }

    #[test]
    fn api_error_message_names_the_operation() {
        let err = SyncError::Api {
            op: Operation::Update,
            source: ApiError::NotFound,
        };
        assert_eq!(err.to_string(), "update failed: resource not found");
    }
}
