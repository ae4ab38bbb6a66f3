//! Client-side cache of the full todo collection.
//!
//! # Design
//! The store is written only by a completed load, and a completed load always
//! replaces the whole sequence. Loads are not guarded against overlap; each
//! completion is applied as it arrives, so the last one to finish wins.

use std::collections::HashSet;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{Todo, TodoId};

#[derive(Debug, Default)]
pub struct ListStore {
    todos: Vec<Todo>,
    loads_in_flight: usize,
    last_error: Option<ApiError>,
}

impl ListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The todos as of the last successful load, in server order.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn find(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loads_in_flight > 0
    }

    /// The failure of the most recent load, cleared by the next success.
    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    pub fn begin_load(&mut self, client: &TodoClient) -> HttpRequest {
        self.loads_in_flight += 1;
        client.build_list_todos()
    }

    /// Apply the outcome of a list request.
    ///
    /// On failure the current sequence is kept and the error recorded.
    pub fn complete_load(
        &mut self,
        client: &TodoClient,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Result<(), ApiError> {
        self.loads_in_flight = self.loads_in_flight.saturating_sub(1);

        match outcome.and_then(|response| client.parse_list_todos(response)) {
            Ok(todos) => {
                self.todos = dedup_by_id(todos);
                self.last_error = None;
                tracing::debug!(count = self.todos.len(), "todo list reloaded");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, kept = self.todos.len(), "failed to load todos");
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Issue a list request through `transport` and apply the result.
    pub fn load<T: Transport>(&mut self, client: &TodoClient, transport: &T) -> Result<(), ApiError> {
        let request = self.begin_load(client);
        let outcome = transport.execute(&request);
        self.complete_load(client, outcome)
    }
}

fn dedup_by_id(todos: Vec<Todo>) -> Vec<Todo> {
    let mut seen = HashSet::with_capacity(todos.len());
    todos
        .into_iter()
        .filter(|todo| {
            let fresh = seen.insert(todo.id);
            if !fresh {
                tracing::warn!(id = %todo.id, "dropping duplicate todo id from list response");
            }
            fresh
        })
        .collect()
}
