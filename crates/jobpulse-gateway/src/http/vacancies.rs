//! Read API over the stored listings.
//!
//! | Route                       | Body                                      |
//! |-----------------------------|-------------------------------------------|
//! | `GET /vacancies?page=N`     | page envelope, newest listing first       |
//! | `GET /vacancies/city-counts`| `{location: count}`, largest count first  |
//! | `GET /top-popular-titles`   | `[{title: count}]`, at most ten           |
//!
//! An empty result is a 404 on every route.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use jobpulse_core::{config::TOP_TITLES_LIMIT, JobpulseError, ListingPage};
use jobpulse_store::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::error;

use crate::app::AppState;

#[derive(Deserialize)]
pub struct PageQuery {
    /// 1-based page number.
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: &'static str,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

fn reject(
    status: StatusCode,
    code: &'static str,
    msg: impl Into<String>,
) -> (StatusCode, Json<ApiError>) {
    (
        status,
        Json(ApiError {
            error: msg.into(),
            code,
        }),
    )
}

fn store_failure(route: &str, e: StoreError) -> (StatusCode, Json<ApiError>) {
    let e = JobpulseError::from(e);
    error!(route, code = e.code(), error = %e, "store read failed");
    reject(StatusCode::INTERNAL_SERVER_ERROR, e.code(), e.to_string())
}

/// GET /vacancies?page=N
pub async fn list_vacancies(
    State(state): State<Arc<AppState>>,
    Query(q): Query<PageQuery>,
) -> ApiResult<ListingPage> {
    if q.page == 0 {
        return Err(reject(StatusCode::BAD_REQUEST, "BAD_REQUEST", "page is 1-based"));
    }

    let page = state
        .store
        .paginated(q.page - 1, state.config.api.page_size)
        .map_err(|e| store_failure("/vacancies", e))?;

    if page.is_empty() {
        return Err(reject(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("no vacancies on page {}", q.page),
        ));
    }
    Ok(Json(page))
}

/// GET /vacancies/city-counts
pub async fn city_counts(State(state): State<Arc<AppState>>) -> ApiResult<Map<String, Value>> {
    let counts = state
        .store
        .city_counts()
        .map_err(|e| store_failure("/vacancies/city-counts", e))?;

    if counts.is_empty() {
        return Err(reject(StatusCode::NOT_FOUND, "NOT_FOUND", "no vacancies stored"));
    }

    // serde_json is built with preserve_order, so the map keeps the store's ordering
    let body = counts
        .into_iter()
        .map(|c| (c.location, Value::from(c.count)))
        .collect();
    Ok(Json(body))
}

/// GET /top-popular-titles
pub async fn popular_titles(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Value>> {
    let titles = state
        .store
        .popular_titles(TOP_TITLES_LIMIT)
        .map_err(|e| store_failure("/top-popular-titles", e))?;

    if titles.is_empty() {
        return Err(reject(StatusCode::NOT_FOUND, "NOT_FOUND", "no recurring titles"));
    }

    let body = titles
        .into_iter()
        .map(|t| {
            let mut entry = Map::new();
            entry.insert(t.title, Value::from(t.count));
            Value::Object(entry)
        })
        .collect();
    Ok(Json(body))
}
