//! # API Module
//!
//! HTTP endpoints served by `vibelist serve`, built on [axum](https://docs.rs/axum).
//!
//! ## Endpoints
//!
//! | Method | Path              | Handler        | Success |
//! |--------|-------------------|----------------|---------|
//! | GET    | `/health`         | [`health`]     | 200 `{status, service, version}` |
//! | GET    | `/callback`       | [`callback`]   | HTML page after the PKCE code exchange |
//! | POST   | `/api/candidates` | [`candidates`] | 200 `{tracks, requested, returned, shortfall, pinned}` |
//! | POST   | `/api/playlist`   | [`playlist`]   | 201 `{id, name, url, track_count, cover_uploaded}` |
//!
//! ## Errors
//!
//! JSON endpoints answer failures with `{"error": "..."}` through [`ApiError`]:
//!
//! - `400` invalid vibe or request body content
//! - `401` no cached token, or Spotify rejected it
//! - `404` the catalog produced no candidates at all
//! - `502` Spotify failed while creating a playlist
//!
//! Candidate requests never fail because of individual catalog calls: those
//! are absorbed by the pipeline and show up as a `shortfall`.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::{get, post}};
//! use vibelist::api::{self, ApiState};
//!
//! let app = Router::new()
//!     .route("/health", get(api::health))
//!     .route("/api/candidates", post(api::candidates))
//!     .with_state(ApiState::from_env());
//! ```

mod callback;
mod candidates;
mod error;
mod health;
mod playlist;
mod state;

pub use callback::callback;
pub use candidates::{CandidatesRequest, CandidatesResponse, candidates};
pub use error::ApiError;
pub use health::health;
pub use playlist::{PlaylistRequest, playlist};
pub use state::ApiState;
