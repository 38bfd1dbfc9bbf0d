//! SED tracker server: loads settings, opens (or creates) the SQLite database, mounts routes.
//!
//! `server`          run the HTTP service
//! `server init-db`  create the database and tables, then exit

use sed_tracker::{app, AppState, EntryStore, Settings};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sed_tracker=info,server=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let store = EntryStore::connect(&settings.database_url, settings.max_connections).await?;

    if std::env::args().nth(1).as_deref() == Some("init-db") {
        tracing::info!("initialized the database");
        return Ok(());
    }

    let router = app(AppState::new(store), &settings);
    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
