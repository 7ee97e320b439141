#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::{Duration, Local};
use serde_json::{Value, json};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

/// In-process stand-in for the remote energy API.
#[derive(Clone, Default)]
pub struct MockState {
    entries: Arc<Mutex<Vec<Value>>>,
    posted: Arc<Mutex<Vec<Value>>>,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

impl MockState {
    pub fn seeded() -> Self {
        let state = Self::default();
        *state.entries.lock().unwrap() = vec![
            mock_entry(40, 1, "W01", "January"),
            mock_entry(10, 2, "W02", "February"),
            mock_entry(5, 3, "W03", "March"),
            mock_entry(2, 4, "W03", "March"),
            mock_entry(0, 5, "W04", "March"),
            json!({ "date": "not a date", "score": 5, "thoughts": "lost" }),
        ];
        state
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn posted(&self) -> Vec<Value> {
        self.posted.lock().unwrap().clone()
    }

    pub fn push_entry(&self, entry: Value) {
        self.entries.lock().unwrap().push(entry);
    }

    pub fn entry_count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

pub fn mock_entry(days_ago: i64, score: u8, week: &str, month: &str) -> Value {
    let date = Local::now().date_naive() - Duration::days(days_ago);
    json!({
        "date": date.format("%d.%m.%Y").to_string(),
        "score": score,
        "thoughts": format!("{days_ago} days ago"),
        "category": "",
        "week": week,
        "month": month,
    })
}

pub struct MockApi {
    pub base_url: String,
    pub state: MockState,
}

impl MockApi {
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Serves the mock on the current runtime.
    pub async fn start() -> MockApi {
        let state = MockState::seeded();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock api");
        let addr = listener.local_addr().unwrap();
        let app = mock_router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock api crashed");
        });

        MockApi {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Serves the mock on its own thread so it outlives any single test runtime.
    pub fn start_detached() -> MockApi {
        let state = MockState::seeded();
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind mock api");
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();
        let app = mock_router(state.clone());

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .expect("mock runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, app).await.expect("mock api crashed");
            });
        });

        MockApi {
            base_url: format!("http://{addr}"),
            state,
        }
    }
}

fn mock_router(state: MockState) -> Router {
    Router::new()
        .route("/energy", get(read_entries).post(write_entry))
        .route("/readonly", get(read_entries).post(method_not_allowed))
        .route("/rejecting", post(reject_entry))
        .route("/slow", post(slow_write))
        .route("/broken", get(broken))
        .route("/lagging", get(lagging_read))
        .route("/sparse", get(sparse_read))
        .with_state(state)
}

async fn read_entries(State(state): State<MockState>) -> Json<Value> {
    state.reads.fetch_add(1, Ordering::SeqCst);
    let entries = state.entries.lock().unwrap().clone();
    // Deliberately disagrees with the entries.
    Json(json!({
        "entries": entries,
        "stats": { "good": 0, "neutral": 0, "bad": 0, "average": 0.0, "total": 99 },
    }))
}

async fn write_entry(
    State(state): State<MockState>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.writes.fetch_add(1, Ordering::SeqCst);
    let today = Local::now().date_naive().format("%d.%m.%Y").to_string();
    state.entries.lock().unwrap().push(json!({
        "date": today,
        "score": payload["score"],
        "thoughts": payload["thoughts"],
    }));
    state.posted.lock().unwrap().push(payload);
    (StatusCode::CREATED, Json(json!({ "ok": true })))
}

async fn method_not_allowed(State(state): State<MockState>) -> (StatusCode, Json<Value>) {
    state.writes.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}

async fn reject_entry(State(state): State<MockState>) -> (StatusCode, Json<Value>) {
    state.writes.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "score is required" })),
    )
}

async fn slow_write(State(state): State<MockState>) -> (StatusCode, &'static str) {
    state.writes.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    (StatusCode::CREATED, "saved")
}

/// The first read snapshots the entries, then answers late.
async fn lagging_read(State(state): State<MockState>) -> Json<Value> {
    let first = state.reads.fetch_add(1, Ordering::SeqCst) == 0;
    let entries = state.entries.lock().unwrap().clone();
    if first {
        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    }
    Json(json!({ "entries": entries }))
}

/// Nulls and missing fields, the way some deployments answer.
async fn sparse_read(State(state): State<MockState>) -> Json<Value> {
    state.reads.fetch_add(1, Ordering::SeqCst);
    let today = Local::now().date_naive().format("%d.%m.%Y").to_string();
    Json(json!({
        "entries": [
            { "date": today, "score": 4, "thoughts": null, "category": null, "week": null, "month": null },
            { "date": today, "score": 2 },
        ],
        "stats": { "total": 2 },
    }))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}
