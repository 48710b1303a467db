//! Origin resolution for the gateway.
//!
//! The base URL is resolved once and injected into `Gateway` at construction,
//! so nothing here reads process state after startup.

use std::env;

use tracing::{info, warn};

/// Origin used outside production.
pub const DEV_ORIGIN: &str = "http://localhost:8080";

/// Environment variable selecting the runtime mode.
pub const ENV_MODE: &str = "MYRUNES_ENV";

/// Environment variable carrying the page origin in production.
pub const ENV_ORIGIN: &str = "MYRUNES_ORIGIN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Production,
    Development,
}

impl Mode {
    /// `"production"` selects production; every other value is development.
    pub fn from_flag(flag: &str) -> Self {
        if flag == "production" {
            Mode::Production
        } else {
            Mode::Development
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Production resolves to the page origin, or `""` for same-origin
    /// relative requests. Any other mode resolves to [`DEV_ORIGIN`].
    pub fn resolve(mode: Mode, page_origin: Option<&str>) -> Self {
        match mode {
            Mode::Production => Self::new(page_origin.unwrap_or("")),
            Mode::Development => Self::development(),
        }
    }

    pub fn development() -> Self {
        Self::new(DEV_ORIGIN)
    }

    /// Read [`ENV_MODE`] and, in production, [`ENV_ORIGIN`].
    pub fn from_env() -> Self {
        let mode = match env::var(ENV_MODE) {
            Ok(flag) => Mode::from_flag(&flag),
            Err(_) => {
                info!("{ENV_MODE} not set, using development origin");
                Mode::Development
            }
        };

        let origin = match mode {
            Mode::Production => env::var(ENV_ORIGIN)
                .map_err(|_| warn!("{ENV_ORIGIN} not set, using same-origin requests"))
                .ok(),
            Mode::Development => None,
        };

        let config = Self::resolve(mode, origin.as_deref());
        info!(base_url = %config.base_url, ?mode, "resolved API origin");
        config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::development()
    }
}
