pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod sessions;
pub mod ucs;

use config::Config;
use sessions::SessionStore;

/// Application state shared across web handlers
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub templates: tera::Tera,
}
