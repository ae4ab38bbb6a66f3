//! Client-side state synchronization for the `/v1/todo` service.
//!
//! # Overview
//! Keeps an in-memory todo list consistent with a remote store across
//! create, read, update and delete. The remote service stays the single
//! source of truth: every successful write is followed by a full reload, and
//! nothing is patched into the list locally.
//!
//! # Design
//! - `TodoClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse` (host-does-IO).
//! - `ListStore` caches the collection and is only written by a completed load.
//! - `MutationCoordinator` owns one in-flight flag per write and only yields
//!   a reload request once its write succeeded.
//! - `Selection` tracks the todo targeted by the edit or delete modal and a
//!   detached draft of its fields.
//! - `TodoApp` owns all of the above plus the create form and the pending
//!   notice, and is what a UI renders from.
//! - `Transport` / `UreqTransport` run requests for hosts that block.

pub mod app;
pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod http;
pub mod selection;
pub mod store;
pub mod transport;
pub mod types;

pub use app::{Notice, TodoApp};
pub use client::TodoClient;
pub use config::{ClientConfig, ConfigError, ValidationPolicy};
pub use coordinator::{MutationCoordinator, PendingWrite};
pub use error::{ApiError, Field, SyncError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use selection::Selection;
pub use store::ListStore;
pub use transport::{Transport, UreqTransport};
pub use types::{Operation, Todo, TodoDraft, TodoId};
