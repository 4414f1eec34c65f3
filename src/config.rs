//! Cellar configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// User id recorded on journal entries when no caller identity is known.
pub const DEFAULT_USER_ID: &str = "local";

/// Builder-style configuration shared by the library and the server binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellarConfig {
    /// Directory holding one `<collection>.json` file per collection.
    /// `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    /// Acting user for operations that carry no explicit identity.
    pub default_user_id: String,
    pub host: String,
    pub port: u16,
}

impl Default for CellarConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_user_id: DEFAULT_USER_ID.to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl CellarConfig {
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_default_user(mut self, user_id: impl Into<String>) -> Self {
        self.default_user_id = user_id.into();
        self
    }

    #[must_use]
    pub fn with_bind(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    /// `host:port` as a socket address, if the host is an IP literal.
    pub fn bind_addr(&self) -> Option<SocketAddr> {
        format!("{}:{}", self.host, self.port).parse().ok()
    }
}
