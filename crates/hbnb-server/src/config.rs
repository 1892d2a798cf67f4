use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use hbnb_places::SearchOptions;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Host override, as used by the HBnB API deployment scripts.
pub const ENV_HOST: &str = "HBNB_API_HOST";
/// Port override.
pub const ENV_PORT: &str = "HBNB_API_PORT";

pub const DEFAULT_PORT: u16 = 5000;

/// Server configuration, loadable from TOML:
///
/// ```toml
/// bind_addr = "0.0.0.0:5000"
/// data_file = "file.json"
///
/// [search]
/// dedup_location_union = true
/// ```
///
/// Every key is optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// JSON file backing the store. `None` keeps everything in memory.
    pub data_file: Option<PathBuf>,
    pub search: SearchOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            data_file: None,
            search: SearchOptions::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Apply `HBNB_API_HOST` / `HBNB_API_PORT` from the process environment.
    pub fn apply_env(&mut self) -> ServerResult<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply host and port overrides from `lookup`. Either may be set alone.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> ServerResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            let ip: IpAddr = host
                .trim()
                .parse()
                .map_err(|_| ServerError::Config(format!("{ENV_HOST}: invalid address {host:?}")))?;
            self.bind_addr.set_ip(ip);
        }
        if let Some(port) = lookup(ENV_PORT) {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|_| ServerError::Config(format!("{ENV_PORT}: invalid port {port:?}")))?;
            self.bind_addr.set_port(port);
        }
        Ok(())
    }
}
