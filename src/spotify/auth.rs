use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::Utc;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    Res, config,
    management::TokenManager,
    server::start_callback_server,
    success,
    types::{PkceToken, Token, TokenResponse},
    utils, warning,
};

const CALLBACK_WAIT: Duration = Duration::from_secs(120);

/// Runs the OAuth 2.0 authorization-code flow with PKCE.
///
/// 1. Generates a code verifier and its S256 challenge.
/// 2. Starts the local callback server in the background.
/// 3. Stores the verifier in `shared_state` for the callback handler.
/// 4. Opens the authorization URL in the default browser, or prints it.
/// 5. Waits up to two minutes for the callback to deposit a token.
/// 6. Persists the token through [`TokenManager`].
///
/// # Errors
///
/// Fails when a required configuration key is missing, when no token arrives
/// in time, or when the token cannot be written to the cache.
pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Res<()> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let auth_url = format!(
        "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&code_challenge={code_challenge}&code_challenge_method=S256&scope={scope}",
        auth_url = config::spotify_apiauth_url()?,
        client_id = urlencoding::encode(&config::spotify_client_id()?),
        redirect_uri = urlencoding::encode(&config::spotify_redirect_uri()?),
        code_challenge = code_challenge,
        scope = urlencoding::encode(&config::spotify_scope()?),
    );

    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier,
            token: None,
        });
    }

    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        if let Err(e) = start_callback_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        );
    }

    let token = wait_for_token(shared_state)
        .await
        .ok_or("Authentication failed or timed out")?;

    TokenManager::new(token).persist().await?;
    success!("Authentication successful!");
    Ok(())
}

async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    let start = Instant::now();

    while start.elapsed() < CALLBACK_WAIT {
        {
            let lock = shared_state.lock().await;
            if let Some(token) = lock.as_ref().and_then(|pkce| pkce.token.as_ref()) {
                return Some(token.clone());
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges an authorization code and the matching verifier for a token.
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Res<Token> {
    let client_id = config::spotify_client_id()?;
    let redirect_uri = config::spotify_redirect_uri()?;

    let response = request_token(&[
        ("grant_type", "authorization_code"),
        ("client_id", client_id.as_str()),
        ("code", code),
        ("code_verifier", verifier),
        ("redirect_uri", redirect_uri.as_str()),
    ])
    .await?;

    Ok(into_token(response, ""))
}

/// Trades a refresh token for a new access token. Spotify may rotate the
/// refresh token; when it does not, the old one is kept.
pub async fn refresh_token(refresh_token: &str) -> Res<Token> {
    let client_id = config::spotify_client_id()?;

    let response = request_token(&[
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", client_id.as_str()),
    ])
    .await?;

    Ok(into_token(response, refresh_token))
}

async fn request_token(form: &[(&str, &str)]) -> Res<TokenResponse> {
    let response = Client::new()
        .post(config::spotify_apitoken_url()?)
        .form(form)
        .send()
        .await?
        .error_for_status()?;

    Ok(response.json::<TokenResponse>().await?)
}

fn into_token(response: TokenResponse, previous_refresh: &str) -> Token {
    Token {
        access_token: response.access_token,
        refresh_token: response
            .refresh_token
            .unwrap_or_else(|| previous_refresh.to_string()),
        scope: response.scope.unwrap_or_default(),
        expires_in: response.expires_in,
        obtained_at: Utc::now().timestamp().max(0) as u64,
    }
}
