//! Runtime settings loaded via OrthoConfig.
//!
//! Every value may come from the command line, a configuration file, or a
//! `SCHEMAFORGE_`-prefixed environment variable. Unset values fall back to the
//! defaults below.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::openapi::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_EXPANDED_NODES, DEFAULT_MAX_EXTERNAL_DOCUMENTS,
    DEFAULT_MAX_REFERENCE_DEPTH,
};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_RELAY_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REFERENCE_TIMEOUT_SECS: u64 = 10;

/// Service settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SCHEMAFORGE")]
pub struct AppSettings {
    /// Address to bind; defaults to all interfaces.
    pub host: Option<IpAddr>,
    /// Port to bind.
    pub port: Option<u16>,
    /// PostgreSQL connection string. Without it the persistence ports are
    /// served by in-memory fixtures.
    pub database_url: Option<String>,
    /// Upper bound for relayed requests, in seconds.
    pub relay_timeout_secs: Option<u64>,
    /// Upper bound for fetching one external `$ref` document, in seconds.
    pub reference_timeout_secs: Option<u64>,
    /// Longest `$ref` chain followed before giving up.
    pub reference_max_depth: Option<usize>,
    /// Most nodes a dereferenced document may hold.
    pub reference_max_nodes: Option<usize>,
    /// Most distinct external documents loaded for one conversion.
    pub reference_max_documents: Option<usize>,
    /// Deepest object nesting inferred from synthesis examples.
    pub synthesis_max_depth: Option<usize>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    pub fn relay_timeout(&self) -> Duration {
        Duration::from_secs(
            self.relay_timeout_secs
                .unwrap_or(DEFAULT_RELAY_TIMEOUT_SECS),
        )
    }

    pub fn reference_timeout(&self) -> Duration {
        Duration::from_secs(
            self.reference_timeout_secs
                .unwrap_or(DEFAULT_REFERENCE_TIMEOUT_SECS),
        )
    }

    pub fn reference_max_depth(&self) -> usize {
        self.reference_max_depth
            .unwrap_or(DEFAULT_MAX_REFERENCE_DEPTH)
    }

    pub fn reference_max_nodes(&self) -> usize {
        self.reference_max_nodes
            .unwrap_or(DEFAULT_MAX_EXPANDED_NODES)
    }

    pub fn reference_max_documents(&self) -> usize {
        self.reference_max_documents
            .unwrap_or(DEFAULT_MAX_EXTERNAL_DOCUMENTS)
    }

    pub fn synthesis_max_depth(&self) -> usize {
        self.synthesis_max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }
}
