use std::path::PathBuf;

use chrono::Utc;

use crate::{Res, config, spotify::auth, types::Token};

/// Seconds before expiry at which a token counts as stale.
const REFRESH_MARGIN_SECS: u64 = 240;

pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager { token }
    }

    pub async fn load() -> Res<Self> {
        let content = async_fs::read_to_string(Self::token_path()).await?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self { token })
    }

    pub async fn persist(&self) -> Res<()> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    /// Access token, refreshed and re-persisted first when it is about to expire.
    pub async fn get_valid_token(&mut self) -> Res<String> {
        if self.is_expired() {
            self.token = auth::refresh_token(&self.token.refresh_token).await?;
            self.persist().await?;
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp().max(0) as u64;
        now + REFRESH_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }

    fn token_path() -> PathBuf {
        config::data_dir().join("cache").join("token.json")
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
