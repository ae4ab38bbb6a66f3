//! Stateless HTTP request builder and response parser for `/v1/todo`.
//!
//! # Design
//! `TodoClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. Write responses are only checked for a 2xx
//! status: after a write the client reloads the list instead of trusting the
//! echoed body.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Todo, TodoDraft, TodoId};

const COLLECTION: &str = "/v1/todo";

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}{COLLECTION}", self.base_url)
    }

    fn item_url(&self, id: TodoId) -> String {
        format!("{}{COLLECTION}/{id}", self.base_url)
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.collection_url(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_todo(&self, input: &TodoDraft) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Post, self.collection_url(), input)
    }

    pub fn build_update_todo(&self, id: TodoId, input: &TodoDraft) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Put, self.item_url(id), input)
    }

    /// The server ignores the body, but it is sent for compatibility with
    /// deployments that expect one.
    pub fn build_delete_todo(&self, id: TodoId, input: &TodoDraft) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Delete, self.item_url(id), input)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

fn json_request(method: HttpMethod, path: String, input: &TodoDraft) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
    Ok(HttpRequest {
        method,
        path,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Rejected {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:3000")
    }

    #[test]
    fn build_list_todos_produces_correct_request() {
        let req = client().build_list_todos();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/v1/todo");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_create_todo_produces_correct_request() {
        let input = TodoDraft::new("Buy milk", "2 litres");
        let req = client().build_create_todo(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/v1/todo");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "Buy milk");
        assert_eq!(body["description"], "2 litres");
    }

    #[test]
    fn build_update_todo_targets_the_item() {
        let req = client()
            .build_update_todo(TodoId::new(9), &TodoDraft::new("Renamed", ""))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/v1/todo/9");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "Renamed");
        assert_eq!(body["description"], "");
    }

    #[test]
    fn build_delete_todo_still_sends_a_body() {
        let req = client()
            .build_delete_todo(TodoId::new(3), &TodoDraft::new("a", "b"))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/v1/todo/3");
        assert!(req.body.is_some());
    }

    #[test]
    fn parse_list_todos_keeps_server_order() {
        let response = HttpResponse::new(
            200,
            r#"[{"id":2,"title":"B","description":""},{"id":1,"title":"A","description":"x"}]"#,
        );
        let todos = client().parse_list_todos(response).unwrap();
        let ids: Vec<u64> = todos.iter().map(|t| t.id.get()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn parse_list_todos_bad_json() {
        let err = client()
            .parse_list_todos(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn writes_accept_any_2xx_and_ignore_the_body() {
        let c = client();
        assert!(c.parse_create_todo(HttpResponse::new(201, "")).is_ok());
        assert!(c.parse_create_todo(HttpResponse::new(200, "garbage")).is_ok());
        assert!(c.parse_update_todo(HttpResponse::new(204, "")).is_ok());
        assert!(c.parse_delete_todo(HttpResponse::new(200, "{}")).is_ok());
    }

    #[test]
    fn parse_update_todo_not_found() {
        let err = client()
            .parse_update_todo(HttpResponse::new(404, ""))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_create_todo_wrong_status() {
        let err = client()
            .parse_create_todo(HttpResponse::new(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 500, .. }));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:3000/");
        let req = client.build_list_todos();
        assert_eq!(req.path, "http://localhost:3000/v1/todo");
    }
}
