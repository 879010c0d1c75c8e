//! Admin server proxying a browser front-end to a static-hosting
//! deployment API, with session auth, CSRF protection, an
//! archive-to-deployment pipeline, and protected bulk deletion.

mod config;
mod error;
mod limit;
mod routes;
mod session;
mod state;
mod uploads;
mod validate;

use std::net::{Ipv4Addr, SocketAddr};

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Configuration is settled before anything depends on it; the
    // session secret in particular exists before the session store.
    let config = Config::from_env().context("loading configuration")?;
    let state = AppState::new(config)?;
    let app = routes::router(state.clone());

    let listener =
        tokio::net::TcpListener::bind((Ipv4Addr::UNSPECIFIED, state.config.port)).await?;
    info!(port = state.config.port, "siteferry admin server listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
