//! Axum router construction.

use axum::{routing::get, Router};
use std::sync::Arc;

use platesearch_core::service::PlateSearch;

use crate::handlers;

/// Shared application state passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<PlateSearch>,
    /// Page size used when a request omits `limit`.
    pub default_limit: u64,
}

/// Build the Axum application router.
///
/// Fixed paths take priority over the `{archive_id}` captures, so an archive
/// literally named `archives` or `sorts` is only reachable through search.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::search_plates))
        .route("/healthz", get(handlers::health))
        .route("/sorts", get(handlers::sort_options))
        .route("/archives", get(handlers::list_archives))
        .route("/archives/{archive_id}", get(handlers::archive_details))
        .route("/{archive_id}", get(handlers::plates_in_archive))
        .route("/{archive_id}/{plate_id}", get(handlers::plate_details))
        .with_state(state)
}
