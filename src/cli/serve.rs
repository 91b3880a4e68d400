use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{api::ApiState, error, server};

pub async fn serve() {
    let pkce = Arc::new(Mutex::new(None));
    if let Err(e) = server::start_api_server(pkce, ApiState::from_env()).await {
        error!("Server stopped: {}", e);
    }
}
