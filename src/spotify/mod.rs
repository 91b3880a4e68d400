//! # Spotify Integration Module
//!
//! Everything vibelist needs from the Spotify Web API: authentication, the
//! catalog queries that feed the candidate pipeline, and playlist creation.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI, HTTP API)
//!          ↓
//! Candidate Pipeline (crate::vibe)        Playlist Materializer
//!          ↓ MusicCatalog                          ↓ PlaylistService
//! SpotifyClient (reqwest, bearer token, status mapping)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! ### Catalog Module
//!
//! [`catalog`] - The seam between the pipeline and the remote catalog:
//! - **[`MusicCatalog`]**: keyword track search, artist lookup and seed-based
//!   recommendations. The pipeline only ever talks to this trait, so tests can
//!   substitute an in-memory catalog.
//! - **[`CatalogError`]**: one error taxonomy for every call. Authentication
//!   failures are distinguished from everything else because they are the only
//!   errors the pipeline propagates.
//!
//! ### Client Module
//!
//! [`client`] - [`SpotifyClient`], the reqwest implementation:
//! - `GET /search?type=track` for keyword searches, paginated by offset
//! - `GET /search?type=artist` for artist-name resolution, exact name preferred
//! - `GET /recommendations` with seed artists, seed genres and audio-feature
//!   targets
//! - Optional market restriction from `SPOTIFY_MARKET`
//!
//! ### Authentication Module
//!
//! [`auth`] - OAuth 2.0 authorization-code flow with PKCE:
//! - **No Client Secret**: the verifier/challenge pair replaces it
//! - **Browser Integration**: opens the authorization URL, or prints it
//! - **Local Callback Server**: receives the code on `/callback`
//! - **Refresh**: trades the refresh token for a new access token
//!
//! ### Playlist Module
//!
//! [`playlist`] - Turns a finalized track list into a Spotify playlist:
//! - **Naming**: name and description derived from the vibe unless given
//! - **Ordering**: tracks are added in chunks of 100, in list order
//! - **Cover Image**: optional base64 JPEG, validated against the 256 KB limit
//!   before the playlist is created
//!
//! ## Error Handling
//!
//! ### Status Mapping
//! - `401`/`403` → [`CatalogError::Unauthorized`]
//! - `429` → [`CatalogError::RateLimited`] with the `Retry-After` value
//! - `5xx` → [`CatalogError::Server`]
//! - anything else non-2xx → [`CatalogError::Status`]
//!
//! ### Retries
//! A `502 Bad Gateway` is retried once after a short pause. Nothing else is
//! retried inside the client: the aggregator treats a failed call as an empty
//! result and moves on to the next query, which keeps the number of remote
//! calls per request bounded.
//!
//! ### Timeouts
//! Each HTTP request carries a client-level timeout; the aggregator wraps every
//! call in its own, shorter deadline as well.
//!
//! ## Thread Safety
//!
//! [`SpotifyClient`] is `Clone + Send + Sync` and shares one connection pool
//! between clones. It is bound to a single access token: after a refresh,
//! build a new client.
//!
//! ## Configuration Integration
//!
//! Endpoints, client id, redirect URI and scopes come from [`crate::config`].
//! Playlist cover upload needs the `ugc-image-upload` scope.

pub mod auth;
pub mod catalog;
pub mod client;
pub mod playlist;

pub use catalog::{CatalogError, MusicCatalog};
pub use client::SpotifyClient;
pub use playlist::{
    MaterializedPlaylist, PlaylistError, PlaylistMaterializer, PlaylistOptions, PlaylistService,
};
