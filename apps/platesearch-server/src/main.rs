//! Plate catalogue search server entry point.

use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use platesearch_core::config::{Config, Settings};
use platesearch_core::service::PlateSearch;
use platesearch_core::types::Collection;
use platesearch_server::router::{build_router, AppState};
use platesearch_store::MemoryStore;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}

// The Sesame resolver owns a blocking HTTP client, which must be built
// before the async runtime starts.
fn main() -> anyhow::Result<()> {
    init_tracing();
    let settings = Config::load()?.settings()?;

    let plates = settings.data.plates_dir();
    let archives = settings.data.archives_dir();
    let store = MemoryStore::open(&plates, &archives).context("failed to load catalogue")?;
    info!(
        plates = store.len(Collection::Plates),
        archives = store.len(Collection::Archives),
        path = %plates.display(),
        "catalogue loaded"
    );

    let resolver = platesearch_resolve::from_config(&settings.resolver)?;
    let search = PlateSearch::new(Arc::new(store), resolver, settings.search.builder_options());
    let state = AppState { search: Arc::new(search), default_limit: settings.search.default_limit };

    tokio::runtime::Runtime::new()?.block_on(serve(&settings, state))
}

async fn serve(settings: &Settings, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&settings.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.server.bind_addr))?;
    info!(addr = %settings.server.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}
