//! Server settings loaded via OrthoConfig.

use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use poi_backend::domain::PoiIndexConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_INDEX_NAME: &str = "poi kdcache";

/// Configuration values for the HTTP listener and the POI index.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "POI")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Documents requested per cursor batch during index cycles.
    #[ortho_config(default = 128)]
    pub index_batch_size: usize,
    /// Seconds between background index refreshes.
    #[ortho_config(default = 10)]
    pub index_refresh_seconds: u64,
    /// Name reported in index log lines.
    pub index_name: Option<String>,
}

impl ServerSettings {
    /// Parse the configured bind address, falling back to the default.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .trim()
            .parse()
    }

    /// Build the index configuration, clamping zero values to one.
    pub fn index_config(&self) -> PoiIndexConfig {
        PoiIndexConfig {
            name: self
                .index_name
                .clone()
                .unwrap_or_else(|| DEFAULT_INDEX_NAME.to_owned()),
            batch_size: self.index_batch_size.max(1),
            refresh_period: Duration::from_secs(self.index_refresh_seconds.max(1)),
        }
    }
}
