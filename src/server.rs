use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tokio::sync::Mutex;

use crate::{
    Res,
    api::{self, ApiState},
    config, info,
    types::PkceToken,
};

type SharedPkce = Arc<Mutex<Option<PkceToken>>>;

/// Health check and OAuth callback only. Used while `vibelist auth` waits.
pub fn callback_router(pkce: SharedPkce) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(pkce)))
}

/// The full surface: health, callback and the `/api` endpoints.
pub fn api_router(pkce: SharedPkce, state: ApiState) -> Router {
    Router::new()
        .route("/api/candidates", post(api::candidates))
        .route("/api/playlist", post(api::playlist))
        .with_state(state)
        .merge(callback_router(pkce))
}

pub async fn start_callback_server(pkce: SharedPkce) -> Res<()> {
    serve(callback_router(pkce)).await
}

pub async fn start_api_server(pkce: SharedPkce, state: ApiState) -> Res<()> {
    serve(api_router(pkce, state)).await
}

async fn serve(app: Router) -> Res<()> {
    let addr = SocketAddr::from_str(&config::server_addr()?)
        .map_err(|e| format!("Failed to parse server address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
