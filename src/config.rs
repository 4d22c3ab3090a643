//! Configuration loading
//!
//! Zero-config startup: everything comes from environment variables with
//! compiled defaults, resolved once in `main`.

use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_BIND: &str = "127.0.0.1:5780";
pub const DEFAULT_ODESLI_URL: &str = "https://api.song.link/v1-alpha.1";
pub const DEFAULT_GEO_URL: &str = "http://ip-api.com/json";

/// Which store backend persists link records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// SQLite database via sqlx
    Sqlite,
    /// Single flat JSON document
    File,
}

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address
    pub bind: String,
    /// Host used when composing shareable URLs; falls back to the request
    /// Host header when unset
    pub public_host: Option<String>,
    /// Store backend selection
    pub backend: StoreBackend,
    /// Data path: SQLite db file or JSON document, per backend
    pub data_path: PathBuf,
    /// Base URL of the link-aggregation lookup API
    pub odesli_url: String,
    /// Base URL of the IP geolocation API
    pub geo_url: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `TUNELINK_STORE` selects the backend (`sqlite` or `file`); when unset
    /// or unrecognized a warning is logged and the flat-file backend is used.
    pub fn from_env() -> Config {
        let backend = match std::env::var("TUNELINK_STORE").ok().as_deref() {
            Some("sqlite") => StoreBackend::Sqlite,
            Some("file") => StoreBackend::File,
            Some(other) => {
                warn!(
                    "TUNELINK_STORE={:?} not recognized (expected \"sqlite\" or \"file\"); \
                     falling back to flat-file store",
                    other
                );
                StoreBackend::File
            }
            None => {
                warn!("TUNELINK_STORE not set; falling back to flat-file store");
                StoreBackend::File
            }
        };

        let data_path = std::env::var("TUNELINK_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|_| match backend {
                StoreBackend::Sqlite => PathBuf::from("tunelink.db"),
                StoreBackend::File => PathBuf::from("db.json"),
            });

        Config {
            bind: env_or("TUNELINK_BIND", DEFAULT_BIND),
            public_host: std::env::var("TUNELINK_PUBLIC_HOST").ok(),
            backend,
            data_path,
            odesli_url: env_or("TUNELINK_ODESLI_URL", DEFAULT_ODESLI_URL),
            geo_url: env_or("TUNELINK_GEO_URL", DEFAULT_GEO_URL),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
