mod auth;
mod candidates;
mod plan;
mod playlist;
mod serve;
mod session;

pub use auth::auth;
pub use candidates::candidates;
pub use plan::plan;
pub use playlist::playlist;
pub use serve::serve;
