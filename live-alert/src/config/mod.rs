//! Configuration: daemon settings from the environment and the credentials
//! file holding the watch-list.

pub mod app_config;
pub mod store;
pub mod validation;

pub use app_config::{DaemonConfig, NotifierKind};
pub use store::{ChannelConfig, ConfigStore, Credentials};

/// Load .env from multiple candidate paths.
pub fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}
