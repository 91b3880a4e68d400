use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{CONTENT_TYPE, RETRY_AFTER},
};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    config::{self, ConfigError},
    spotify::{
        catalog::{CatalogError, MusicCatalog},
        playlist::PlaylistService,
    },
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, RecommendationsResponse, SearchArtistsResponse,
        SearchTracksResponse, TrackCandidate,
    },
    vibe::RecommendationSeed,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const BAD_GATEWAY_PAUSE: Duration = Duration::from_millis(500);
const MAX_SEARCH_LIMIT: u32 = 50;
const MAX_RECOMMENDATION_LIMIT: u32 = 100;

/// Bearer-token client for the Spotify Web API.
///
/// Implements [`MusicCatalog`] for the candidate pipeline and
/// [`PlaylistService`] for playlist materialization. A client is bound to one
/// access token; build a new one after a refresh.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    base_url: String,
    token: String,
    market: Option<String>,
}

impl SpotifyClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            market: None,
        }
    }

    /// Client against `SPOTIFY_API_URL`, restricted to `SPOTIFY_MARKET` if set.
    pub fn from_config(token: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self::new(config::spotify_apiurl()?, token).with_market(config::spotify_market()))
    }

    pub fn with_market(mut self, market: Option<String>) -> Self {
        self.market = market;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn market_param(&self, params: &mut Vec<(String, String)>) {
        if let Some(market) = &self.market {
            params.push(("market".to_string(), market.clone()));
        }
    }

    /// Sends the request built by `build`, retrying a single 502 once.
    ///
    /// Non-success statuses are mapped through [`CatalogError::from_status`];
    /// a 429 carries its `Retry-After` value but is not waited on here.
    async fn send(&self, build: impl Fn() -> RequestBuilder) -> Result<Response, CatalogError> {
        let mut retried = false;
        loop {
            let response = build().bearer_auth(&self.token).send().await?;
            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            if status == StatusCode::BAD_GATEWAY && !retried {
                retried = true;
                sleep(BAD_GATEWAY_PAUSE).await;
                continue;
            }

            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok());
            return Err(CatalogError::from_status(status, retry_after));
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, CatalogError> {
        let url = self.url(path);
        let response = self.send(|| self.http.get(&url).query(params)).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl MusicCatalog for SpotifyClient {
    async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<TrackCandidate>, CatalogError> {
        let mut params = vec![
            ("q".to_string(), query.to_string()),
            ("type".to_string(), "track".to_string()),
            ("limit".to_string(), limit.clamp(1, MAX_SEARCH_LIMIT).to_string()),
            ("offset".to_string(), offset.to_string()),
        ];
        self.market_param(&mut params);

        let response: SearchTracksResponse = self.get_json("search", &params).await?;
        Ok(response
            .tracks
            .items
            .into_iter()
            .filter_map(|track| track.into_candidate())
            .collect())
    }

    async fn search_artist(&self, name: &str) -> Result<Option<String>, CatalogError> {
        let params = vec![
            ("q".to_string(), name.to_string()),
            ("type".to_string(), "artist".to_string()),
            ("limit".to_string(), "5".to_string()),
        ];

        let response: SearchArtistsResponse = self.get_json("search", &params).await?;
        let wanted = name.trim().to_lowercase();
        let exact = response
            .artists
            .items
            .iter()
            .find(|artist| artist.name.to_lowercase() == wanted)
            .map(|artist| artist.id.clone());

        Ok(exact.or_else(|| response.artists.items.first().map(|artist| artist.id.clone())))
    }

    async fn recommendations(
        &self,
        seed: &RecommendationSeed,
        limit: u32,
    ) -> Result<Vec<TrackCandidate>, CatalogError> {
        let mut params = vec![(
            "limit".to_string(),
            limit.clamp(1, MAX_RECOMMENDATION_LIMIT).to_string(),
        )];
        if !seed.artist_ids.is_empty() {
            params.push(("seed_artists".to_string(), seed.artist_ids.join(",")));
        }
        if !seed.genres.is_empty() {
            params.push(("seed_genres".to_string(), seed.genres.join(",")));
        }
        for (key, value) in seed.targets.iter() {
            params.push((key.to_string(), value.to_string()));
        }
        self.market_param(&mut params);

        let response: RecommendationsResponse = self.get_json("recommendations", &params).await?;
        Ok(response
            .tracks
            .into_iter()
            .filter_map(|track| track.into_candidate())
            .collect())
    }
}

#[async_trait]
impl PlaylistService for SpotifyClient {
    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, CatalogError> {
        let url = self.url(&format!("users/{}/playlists", urlencoding::encode(user_id)));
        let response = self.send(|| self.http.post(&url).json(request)).await?;
        response
            .json::<CreatePlaylistResponse>()
            .await
            .map_err(|e| CatalogError::Malformed(e.to_string()))
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<String, CatalogError> {
        let url = self.url(&format!("playlists/{}/tracks", playlist_id));
        let body = AddTrackToPlaylistRequest {
            uris: uris.to_vec(),
        };
        let response = self.send(|| self.http.post(&url).json(&body)).await?;
        let snapshot = response
            .json::<AddTrackToPlaylistResponse>()
            .await
            .map_err(|e| CatalogError::Malformed(e.to_string()))?;
        Ok(snapshot.snapshot_id)
    }

    async fn upload_cover(&self, playlist_id: &str, jpeg_base64: &str) -> Result<(), CatalogError> {
        let url = self.url(&format!("playlists/{}/images", playlist_id));
        self.send(|| {
            self.http
                .put(&url)
                .header(CONTENT_TYPE, "image/jpeg")
                .body(jpeg_base64.to_string())
        })
        .await?;
        Ok(())
    }
}
