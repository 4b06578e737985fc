//! Demo todo service the dispatch tests run against
//!
//! One POST route assembled through the pipeline, with a counter recording
//! how often the business handler actually ran. The title "boom" fails with
//! an unclassified error; re-using a title fails with 409 Conflict wrapping
//! the duplicate key.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{Router, routing::post_service};
use myelin::{
    Bind, BoxError, Handler, Pipeline, Reply, RequestContext, StatusError, Validate, Violations,
};
use serde::{Deserialize, Serialize};

/// Request body for creating a todo
#[derive(Debug, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub priority: u8,
}

impl Bind for CreateTodo {}

impl Validate for CreateTodo {
    fn validate(&self, _cx: &RequestContext) -> Result<(), Violations> {
        let mut violations = Violations::new();
        if self.title.is_empty() {
            violations.add("title", "must not be empty");
        }
        if self.priority > 5 {
            violations.add("priority", format!("must be at most 5, got {}", self.priority));
        }
        violations.finish()
    }
}

/// A stored todo, also the success response body
#[derive(Debug, Clone, Serialize)]
pub struct Todo {
    pub id: u64,
    pub title: String,
}

impl Reply for Todo {}

/// In-memory todo service with canned failure modes
pub struct TodoApp {
    store: Arc<Store>,
}

struct Store {
    handled: AtomicU32,
    next_id: AtomicU64,
    todos: Mutex<Vec<Todo>>,
}

impl TodoApp {
    pub fn new() -> Self {
        Self {
            store: Arc::new(Store {
                handled: AtomicU32::new(0),
                next_id: AtomicU64::new(1),
                todos: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Router serving the app through `pipeline`
    pub fn router(&self, pipeline: &Pipeline) -> Router {
        let create = CreateHandler { store: Arc::clone(&self.store) };
        Router::new().route("/todos", post_service(pipeline.endpoint(create)))
    }

    /// Number of requests that actually reached the business handler
    pub fn handled_count(&self) -> u32 {
        self.store.handled.load(Ordering::SeqCst)
    }
}

struct CreateHandler {
    store: Arc<Store>,
}

#[async_trait]
impl Handler<CreateTodo, Todo> for CreateHandler {
    async fn handle(&self, _cx: RequestContext, req: CreateTodo) -> Result<Todo, BoxError> {
        self.store.handled.fetch_add(1, Ordering::SeqCst);

        if req.title == "boom" {
            return Err(anyhow::anyhow!("database connection lost").into());
        }

        let mut todos = self.store.todos.lock().unwrap();
        if todos.iter().any(|todo| todo.title == req.title) {
            let duplicate = format!("duplicate key: todos.title={:?}", req.title);
            return Err(StatusError::CONFLICT.with_internal(duplicate).into());
        }

        let todo = Todo {
            id: self.store.next_id.fetch_add(1, Ordering::SeqCst),
            title: req.title,
        };
        todos.push(todo.clone());
        Ok(todo)
    }
}
