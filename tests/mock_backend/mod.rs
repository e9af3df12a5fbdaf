//! In-process household backend for integration tests
//!
//! Serves `/api/inventory` and `/api/tasks` from memory with the same status
//! codes as the real backend, and counts reads so tests can tell whether a
//! reload happened.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Default)]
pub struct BackendState {
    pub inventory: Vec<Value>,
    pub tasks: Vec<Value>,
    pub inventory_reads: usize,
    pub task_reads: usize,
    pub fail_reads: bool,
    pub fail_writes: bool,
    next_id: u64,
}

type Shared = Arc<Mutex<BackendState>>;

pub struct MockBackend {
    pub addr: SocketAddr,
    state: Shared,
}

#[allow(dead_code)]
impl MockBackend {
    pub async fn start(inventory: Vec<Value>, tasks: Vec<Value>) -> Self {
        let state = Arc::new(Mutex::new(BackendState {
            next_id: inventory.len() as u64,
            inventory,
            tasks,
            ..Default::default()
        }));

        let app = Router::new()
            .route(
                "/api/inventory",
                get(list_inventory)
                    .post(create_item)
                    .put(update_item)
                    .delete(delete_item),
            )
            .route("/api/tasks", get(list_tasks).delete(delete_task))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Small delay to let the server start
        tokio::time::sleep(Duration::from_millis(50)).await;

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn inventory_reads(&self) -> usize {
        self.state.lock().unwrap().inventory_reads
    }

    pub fn task_reads(&self) -> usize {
        self.state.lock().unwrap().task_reads
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    pub fn inventory(&self) -> Vec<Value> {
        self.state.lock().unwrap().inventory.clone()
    }
}

pub fn item(id: &str, name: &str, quantity: u32, threshold: u32) -> Value {
    json!({"_id": id, "name": name, "quantity": quantity, "threshold": threshold})
}

pub fn task(id: &str, title: &str) -> Value {
    json!({"id": id, "title": title})
}

async fn list_inventory(State(state): State<Shared>) -> Result<Json<Vec<Value>>, StatusCode> {
    let mut state = state.lock().unwrap();
    state.inventory_reads += 1;
    if state.fail_reads {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(state.inventory.clone()))
}

async fn create_item(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let mut state = state.lock().unwrap();
    if state.fail_writes {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    state.next_id += 1;
    let created = json!({
        "_id": format!("id-{}", state.next_id),
        "name": body["name"],
        "quantity": body["quantity"],
        "threshold": body["threshold"],
    });
    state.inventory.push(created.clone());
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_item(State(state): State<Shared>, Json(body): Json<Value>) -> StatusCode {
    let mut state = state.lock().unwrap();
    if state.fail_writes {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    let position = state
        .inventory
        .iter()
        .position(|i| !body["_id"].is_null() && i["_id"] == body["_id"])
        .or_else(|| {
            state
                .inventory
                .iter()
                .position(|i| i["name"] == body["originalName"])
        });

    match position {
        Some(p) => {
            let id = state.inventory[p]["_id"].clone();
            state.inventory[p] = json!({
                "_id": id,
                "name": body["name"],
                "quantity": body["quantity"],
                "threshold": body["threshold"],
            });
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn delete_item(State(state): State<Shared>, Json(body): Json<Value>) -> StatusCode {
    let mut state = state.lock().unwrap();
    match state.inventory.iter().position(|i| i["name"] == body["name"]) {
        Some(p) => {
            state.inventory.remove(p);
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn list_tasks(State(state): State<Shared>) -> Json<Vec<Value>> {
    let mut state = state.lock().unwrap();
    state.task_reads += 1;
    Json(state.tasks.clone())
}

async fn delete_task(State(state): State<Shared>, Json(body): Json<Value>) -> StatusCode {
    let mut state = state.lock().unwrap();
    match state.tasks.iter().position(|t| t["title"] == body["name"]) {
        Some(p) => {
            state.tasks.remove(p);
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}
