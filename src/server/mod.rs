use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::data::CharacterStore;

pub mod api;
pub mod routes;
pub mod state;

pub use state::AppState;

/// Serve the HTTP API until ctrl-c. Blocks the calling thread.
pub fn run_server(config: AppConfig) -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(config))
}

pub async fn serve(config: AppConfig) -> std::io::Result<()> {
    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(CharacterStore::new(), Arc::new(config));
    let router = routes::create_router(state);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "skirmish server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
}
