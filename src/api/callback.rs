use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{spotify::auth::exchange_code_pkce, types::PkceToken, warning};

/// GET /callback
///
/// Exchanges the authorization code with the verifier stored by
/// [`crate::spotify::auth::auth`] and hands the token back through the shared
/// state.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<PkceToken>>>>,
) -> Html<&'static str> {
    if let Some(reason) = params.get("error") {
        warning!("Authorization was declined: {}", reason);
        return Html("<h4>Authorization declined.</h4>");
    }

    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let mut state = shared_state.lock().await;
    let Some(pkce_state) = state.as_mut() else {
        return Html("<h4>No login in progress. Run vibelist auth first.</h4>");
    };

    match exchange_code_pkce(code, &pkce_state.code_verifier).await {
        Ok(token) => {
            pkce_state.token = Some(token);
            Html("<h2>Authentication successful.</h2><p>You can close this window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            Html("<h4>Login failed.</h4>")
        }
    }
}
