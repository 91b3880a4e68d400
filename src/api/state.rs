use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    api::ApiError,
    management::TokenManager,
    spotify::SpotifyClient,
    vibe::{
        KeywordSceneClassifier, LookupTables, PipelineSettings, SceneClassifier, VibeDescriptor,
        VibePipeline,
    },
};

/// Shared by the `/api` handlers. Each request gets its own pipeline and pool.
#[derive(Clone)]
pub struct ApiState {
    pub tables: Arc<LookupTables>,
    pub classifier: Arc<dyn SceneClassifier>,
    pub settings: PipelineSettings,
    tokens: Arc<Mutex<Option<TokenManager>>>,
}

impl ApiState {
    pub fn new(
        tables: Arc<LookupTables>,
        classifier: Arc<dyn SceneClassifier>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            tables,
            classifier,
            settings,
            tokens: Arc::new(Mutex::new(None)),
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            Arc::new(LookupTables::builtin()),
            Arc::new(KeywordSceneClassifier::default()),
            PipelineSettings::from_env(),
        )
    }

    /// Applies defaults and fills a missing scene category.
    pub fn prepare_vibe(&self, vibe: VibeDescriptor) -> VibeDescriptor {
        vibe.with_defaults().classify_scene(self.classifier.as_ref())
    }

    /// Loads the cached token on first use and refreshes it when stale. A
    /// failed load is retried on the next request, after `vibelist auth`.
    pub async fn access_token(&self) -> Result<String, ApiError> {
        let mut guard = self.tokens.lock().await;
        if guard.is_none() {
            let manager = TokenManager::load()
                .await
                .map_err(|e| ApiError::Unauthorized(format!("no cached token ({})", e)))?;
            *guard = Some(manager);
        }

        match guard.as_mut() {
            Some(manager) => manager
                .get_valid_token()
                .await
                .map_err(|e| ApiError::Unauthorized(format!("token refresh failed ({})", e))),
            None => Err(ApiError::Unauthorized("no cached token".to_string())),
        }
    }

    pub async fn client(&self) -> Result<SpotifyClient, ApiError> {
        let token = self.access_token().await?;
        SpotifyClient::from_config(token).map_err(|e| ApiError::Config(e.to_string()))
    }

    pub async fn pipeline(&self) -> Result<VibePipeline<SpotifyClient>, ApiError> {
        Ok(VibePipeline::new(
            self.client().await?,
            Arc::clone(&self.tables),
            self.settings.clone(),
        ))
    }
}
