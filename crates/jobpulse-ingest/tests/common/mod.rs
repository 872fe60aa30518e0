//! Local stand-in for the job board API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

pub struct JobBoard {
    /// `pages[n - 1]` is the `data` array served for `?page=n`; later pages are empty.
    pages: Vec<Vec<Value>>,
    hits: Mutex<Vec<u32>>,
}

impl JobBoard {
    pub fn hits(&self) -> Vec<u32> {
        self.hits.lock().unwrap().clone()
    }
}

pub fn vacancy(url: &str, title: &str, location: &str) -> Value {
    json!({
        "slug": url.rsplit('/').next().unwrap_or_default(),
        "company_name": "Acme",
        "title": title,
        "description": "<p>Join us.</p>",
        "remote": false,
        "url": url,
        "tags": ["rust"],
        "job_types": ["full-time"],
        "location": location,
        "created_at": 1_719_840_000
    })
}

async fn board_page(
    State(board): State<Arc<JobBoard>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let page: u32 = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    board.hits.lock().unwrap().push(page);
    let data = (page as usize)
        .checked_sub(1)
        .and_then(|idx| board.pages.get(idx))
        .cloned()
        .unwrap_or_default();
    Json(json!({ "data": data, "links": {}, "meta": {} }))
}

/// Serve `router` on an ephemeral local port and return `http://127.0.0.1:<port>`.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Start a well-behaved job board at `<base>/api/job-board-api`.
pub async fn spawn_board(pages: Vec<Vec<Value>>) -> (String, Arc<JobBoard>) {
    let board = Arc::new(JobBoard {
        pages,
        hits: Mutex::new(Vec::new()),
    });
    let router = Router::new()
        .route("/api/job-board-api", get(board_page))
        .with_state(Arc::clone(&board));
    let base = spawn(router).await;
    (format!("{base}/api/job-board-api"), board)
}

/// Start an endpoint that answers every request with `status` and `body`.
pub async fn spawn_fixed(status: StatusCode, body: &'static str) -> String {
    let router = Router::new().route(
        "/api",
        get(move || async move { (status, body).into_response() }),
    );
    format!("{}/api", spawn(router).await)
}

/// Start an endpoint that never answers within `delay`.
pub async fn spawn_slow(delay: std::time::Duration) -> String {
    let router = Router::new().route(
        "/api",
        get(move || async move {
            tokio::time::sleep(delay).await;
            Response::new(axum::body::Body::from(r#"{"data": []}"#))
        }),
    );
    format!("{}/api", spawn(router).await)
}
