use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// Body of the accounts service token endpoint. A refresh may omit
/// `refresh_token`, in which case the previous one stays valid.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// A track as the candidate pipeline sees it.
///
/// Identity is `id`: two candidates with the same id are the same track even if
/// other fields differ between catalog responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackCandidate {
    pub id: String,
    pub title: String,
    pub primary_artist: String,
    pub all_artists: Vec<String>,
    pub album: String,
    pub duration_ms: u64,
    pub popularity: u8,
    pub preview_url: Option<String>,
    pub external_url: Option<String>,
    pub uri: String,
}

impl TrackCandidate {
    pub fn has_preview(&self) -> bool {
        self.preview_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub title: String,
    pub artists: String,
    pub popularity: u8,
    pub preview: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyArtistRef {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyAlbumRef {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub popularity: Option<u8>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub artists: Vec<SpotifyArtistRef>,
    pub album: Option<SpotifyAlbumRef>,
}

impl SpotifyTrack {
    /// Converts a catalog record into a candidate.
    ///
    /// Local files and other records without an id cannot be added to a
    /// playlist by id and yield `None`.
    pub fn into_candidate(self) -> Option<TrackCandidate> {
        let id = self.id.filter(|id| !id.is_empty())?;
        let all_artists: Vec<String> = self.artists.into_iter().map(|a| a.name).collect();

        Some(TrackCandidate {
            id,
            title: self.name,
            primary_artist: all_artists.first().cloned().unwrap_or_default(),
            all_artists,
            album: self.album.map(|a| a.name).unwrap_or_default(),
            duration_ms: self.duration_ms,
            popularity: self.popularity.unwrap_or(0).min(100),
            preview_url: self.preview_url,
            external_url: self.external_urls.spotify,
            uri: self.uri,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTracksResponse {
    pub tracks: Paging<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchArtistsResponse {
    pub artists: Paging<SpotifyArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(default)]
    pub tracks: Vec<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}
