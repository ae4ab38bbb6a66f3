//! In-memory implementation of the `/v1/todo` REST contract.
//!
//! Ids are assigned sequentially from 1 and never reused. Listing returns
//! todos in id order. Update overlays only the fields present in the body;
//! delete ignores whatever body the client sends.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod logging;

/// Origin of the browser dev server allowed through CORS.
pub const DEV_ORIGIN: &str = "http://localhost:5173";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub description: String,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default)]
pub struct Table {
    next_id: u64,
    rows: BTreeMap<u64, Todo>,
}

impl Table {
    fn insert(&mut self, input: CreateTodo) -> Todo {
        self.next_id += 1;
        let todo = Todo {
            id: self.next_id,
            title: input.title,
            description: input.description,
        };
        self.rows.insert(todo.id, todo.clone());
        todo
    }
}

pub type Db = Arc<RwLock<Table>>;

pub fn app() -> Router {
    router(Db::default())
}

/// Build the router over an existing table, so callers can seed or inspect it.
pub fn router(db: Db) -> Router {
    Router::new()
        .route("/v1/todo", get(list_todos).post(create_todo))
        .route(
            "/v1/todo/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(HeaderValue::from_static(DEV_ORIGIN))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::HEAD,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(12 * 60 * 60))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let table = db.read().await;
    Json(table.rows.values().cloned().collect())
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> (StatusCode, Json<Todo>) {
    let todo = db.write().await.insert(input);
    tracing::info!(id = todo.id, "created todo");
    (StatusCode::CREATED, Json(todo))
}

async fn get_todo(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Todo>, StatusCode> {
    let table = db.read().await;
    table.rows.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, StatusCode> {
    let mut table = db.write().await;
    let todo = table.rows.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(description) = input.description {
        todo.description = description;
    }
    tracing::info!(id, "updated todo");
    Ok(Json(todo.clone()))
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Todo>, StatusCode> {
    let mut table = db.write().await;
    let removed = table.rows.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    tracing::info!(id, "deleted todo");
    Ok(Json(removed))
}
