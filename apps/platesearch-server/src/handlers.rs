//! Request handlers. Each one runs the blocking search service on the
//! blocking pool and always answers `200` with a JSON body; failures inside
//! the service have already been degraded to empty results.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;
use tracing::error;

use platesearch_core::collation::{SortOption, SORT_OPTIONS};
use platesearch_core::service::{PlateLookup, PlateSearch};
use platesearch_core::types::{DetailEnvelope, ResultEnvelope};

use crate::params::{PageParams, SearchParams};
use crate::router::AppState;

/// Response body for the health endpoint.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn sort_options() -> Json<Vec<SortOption>> {
    Json(SORT_OPTIONS.to_vec())
}

/// Run `op` against the service off the async workers. A panicked or
/// cancelled task yields `fallback`.
async fn run_blocking<T, F>(state: &AppState, fallback: T, op: F) -> T
where
    T: Send + 'static,
    F: FnOnce(&PlateSearch) -> T + Send + 'static,
{
    let search = state.search.clone();
    match tokio::task::spawn_blocking(move || op(&search)).await {
        Ok(value) => value,
        Err(e) => {
            error!(error = %e, "search task failed");
            fallback
        }
    }
}

/// `GET /`: filtered, sorted and paginated plate search.
pub async fn search_plates(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<ResultEnvelope> {
    let skip = params.skip;
    let limit = params.limit.unwrap_or(state.default_limit);
    let filter = params.to_filter();
    let envelope =
        run_blocking(&state, ResultEnvelope::empty(skip, limit), move |s| s.search(&filter, skip, limit)).await;
    Json(envelope)
}

/// `GET /archives`
pub async fn list_archives(State(state): State<AppState>, Query(page): Query<PageParams>) -> Json<ResultEnvelope> {
    let limit = page.limit.unwrap_or(state.default_limit);
    let skip = page.skip;
    Json(run_blocking(&state, ResultEnvelope::empty(skip, limit), move |s| s.list_archives(skip, limit)).await)
}

/// `GET /archives/{archive_id}`
pub async fn archive_details(State(state): State<AppState>, Path(archive_id): Path<String>) -> Json<DetailEnvelope> {
    Json(run_blocking(&state, DetailEnvelope::default(), move |s| s.archive_details(&archive_id)).await)
}

/// `GET /{archive_id}`
pub async fn plates_in_archive(
    State(state): State<AppState>,
    Path(archive_id): Path<String>,
    Query(page): Query<PageParams>,
) -> Json<ResultEnvelope> {
    let limit = page.limit.unwrap_or(state.default_limit);
    let skip = page.skip;
    Json(
        run_blocking(&state, ResultEnvelope::empty(skip, limit), move |s| s.plates_in_archive(&archive_id, skip, limit))
            .await,
    )
}

/// `GET /{archive_id}/{plate_id}`: the bare plate record, or `{"results": []}`.
pub async fn plate_details(
    State(state): State<AppState>,
    Path((archive_id, plate_id)): Path<(String, String)>,
) -> Json<PlateLookup> {
    let missing = PlateLookup::Missing(DetailEnvelope::default());
    Json(run_blocking(&state, missing, move |s| s.plate_details(&archive_id, &plate_id)).await)
}
