//! Vibelist Library
//!
//! This library turns "vibe" metadata derived from a photo (genres, mood,
//! energy, tempo, keywords, artists, an optional landmark) into a Spotify track
//! list and, on request, a playlist. The heart of the crate is the candidate
//! pipeline in [`vibe`]: plan catalog queries, aggregate a deduplicated pool,
//! apply a popularity policy and finalize a diverse, fixed-size list.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the callback and candidate API
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `management` - Token caching
//! - `server` - Local HTTP server (OAuth callback and JSON API)
//! - `spotify` - Spotify Web API client, auth and playlist materialization
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//! - `vibe` - Track-candidate selection and ranking pipeline
//!
//! # Example
//!
//! ```
//! use vibelist::{config, vibe::{PopularityPolicy, VibePipeline}};
//!
//! #[tokio::main]
//! async fn main() -> vibelist::Res<()> {
//!     config::load_env().await?;
//!     // Build a catalog and a pipeline, then ask for candidates...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod vibe;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the CLI and glue layers. Library seams with a meaningful error
/// taxonomy (catalog calls, the pipeline, playlist creation) carry their own
/// `thiserror` types instead.
///
/// # Example
///
/// ```
/// use vibelist::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational line with a blue `o` bullet.
///
/// Accepts the same arguments as `println!`.
///
/// ```
/// info!("Planned {} catalog queries", plan.len());
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success line with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error line with a red `!` and exits the process with code 1.
///
/// Only the CLI layer calls this. Library code returns errors or degrades
/// through [`warning!`] instead.
///
/// ```
/// error!("Failed to load vibe file: {}", e);
/// // not reached
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning line with a yellow `!`.
///
/// The pipeline reports absorbed catalog failures, backfill rounds and
/// shortfalls through this macro.
///
/// ```
/// warning!("Search '{}' failed, continuing: {}", query, err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
