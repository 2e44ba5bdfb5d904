use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::platform;
use crate::types::generation::endpoint_url;

/// Default generator location when nothing else is configured.
pub const DEFAULT_BASE_PATH: &str = "http://127.0.0.1:5069/";

/// Default HTTP timeout for a generation round trip.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration for the client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Prefix for the `generate-password` endpoint, normally ending in `/`.
    pub base_path: String,
    pub request_timeout: Duration,
    /// SQLite file holding the cookie jar.
    pub database_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            database_path: platform::get_data_dir().join("pwgen.db"),
        }
    }
}

impl ClientConfig {
    /// Builds a config from defaults overridden by `PWGEN_BASE_PATH`,
    /// `PWGEN_TIMEOUT_SECS` and `PWGEN_DATA_DIR`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base) = env::var("PWGEN_BASE_PATH") {
            if !base.trim().is_empty() {
                config.base_path = base;
            }
        }

        if let Ok(secs) = env::var("PWGEN_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(n) if n > 0 => config.request_timeout = Duration::from_secs(n),
                _ => tracing::warn!("ignoring invalid PWGEN_TIMEOUT_SECS={:?}", secs),
            }
        }

        if let Ok(dir) = env::var("PWGEN_DATA_DIR") {
            config.database_path = PathBuf::from(dir).join("pwgen.db");
        }

        config
    }

    /// Full URL of the generation endpoint.
    pub fn generate_url(&self) -> String {
        endpoint_url(&self.base_path)
    }
}
