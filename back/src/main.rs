mod config;
mod db;
mod error;
mod todos;
mod v1;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use axum_server::{tls_rustls::RustlsConfig, Handle};
use clap::Parser;
use eyre::WrapErr;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::{config::Config, db::Db};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::parse();

    let db = Db::connect(&config.database_url, config.max_connections)
        .await
        .wrap_err_with(|| format!("failed to open database {}", config.database_url))?;
    let state = Arc::new(AppState { db });

    let handle = Handle::new();
    tokio::spawn(shutdown_on_ctrl_c(handle.clone()));

    let addr = SocketAddr::from(([0; 4], config.port));
    let app = app(state.clone());

    match config.tls() {
        Some((cert, key)) => {
            let tls = RustlsConfig::from_pem_file(cert, key).await?;

            info!(%addr, "listening (tls)");
            axum_server::bind_rustls(addr, tls)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            info!(%addr, "listening");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
    }

    state.db.close().await;
    info!("database closed");

    Ok(())
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/v1", v1::router())
        .with_state(state)
}

async fn shutdown_on_ctrl_c(handle: Handle) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for ctrl-c: {:?}", err);
        return;
    }

    info!("shutting down");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}

#[derive(Debug)]
pub struct AppState {
    pub db: Db,
}
