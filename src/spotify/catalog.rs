use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::{types::TrackCandidate, vibe::RecommendationSeed};

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("catalog rejected the access token ({0})")]
    Unauthorized(StatusCode),
    #[error("catalog rate limit hit, retry after {retry_after:?}s")]
    RateLimited { retry_after: Option<u64> },
    #[error("catalog server error ({0})")]
    Server(StatusCode),
    #[error("unexpected catalog status {0}")]
    Status(StatusCode),
    #[error("catalog call timed out")]
    Timeout,
    #[error("catalog network error: {0}")]
    Network(String),
    #[error("malformed catalog response: {0}")]
    Malformed(String),
}

impl CatalogError {
    /// Authentication failures cannot be fixed by retrying and abort the
    /// pipeline.
    pub fn is_auth(&self) -> bool {
        matches!(self, CatalogError::Unauthorized(_))
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CatalogError::RateLimited { .. }
                | CatalogError::Server(_)
                | CatalogError::Timeout
                | CatalogError::Network(_)
        )
    }

    pub fn from_status(status: StatusCode, retry_after: Option<u64>) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CatalogError::Unauthorized(status),
            StatusCode::TOO_MANY_REQUESTS => CatalogError::RateLimited { retry_after },
            s if s.is_server_error() => CatalogError::Server(s),
            s => CatalogError::Status(s),
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout
        } else if err.is_decode() {
            CatalogError::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            CatalogError::from_status(status, None)
        } else {
            CatalogError::Network(err.to_string())
        }
    }
}

/// The remote music catalog the candidate pipeline reads from.
///
/// Implementations must be cheap to call concurrently: the aggregator resolves
/// several artists at once through a shared reference.
#[async_trait]
pub trait MusicCatalog: Send + Sync {
    /// One page of track search results.
    async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<TrackCandidate>, CatalogError>;

    /// Best-match artist id for a name, if any.
    async fn search_artist(&self, name: &str) -> Result<Option<String>, CatalogError>;

    async fn recommendations(
        &self,
        seed: &RecommendationSeed,
        limit: u32,
    ) -> Result<Vec<TrackCandidate>, CatalogError>;
}
