//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use schemaforge::domain::openapi::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_EXPANDED_NODES, DEFAULT_MAX_EXTERNAL_DOCUMENTS,
    DEFAULT_MAX_REFERENCE_DEPTH,
};
use schemaforge::outbound::persistence::DbPool;
use schemaforge::settings::AppSettings;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Timeouts and resource bounds handed to the outbound adapters and pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterSettings {
    pub relay_timeout: Duration,
    pub reference_timeout: Duration,
    pub reference_max_depth: usize,
    pub reference_max_nodes: usize,
    pub reference_max_documents: usize,
    pub synthesis_max_depth: usize,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            relay_timeout: Duration::from_secs(30),
            reference_timeout: Duration::from_secs(10),
            reference_max_depth: DEFAULT_MAX_REFERENCE_DEPTH,
            reference_max_nodes: DEFAULT_MAX_EXPANDED_NODES,
            reference_max_documents: DEFAULT_MAX_EXTERNAL_DOCUMENTS,
            synthesis_max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl From<&AppSettings> for AdapterSettings {
    fn from(settings: &AppSettings) -> Self {
        Self {
            relay_timeout: settings.relay_timeout(),
            reference_timeout: settings.reference_timeout(),
            reference_max_depth: settings.reference_max_depth(),
            reference_max_nodes: settings.reference_max_nodes(),
            reference_max_documents: settings.reference_max_documents(),
            synthesis_max_depth: settings.synthesis_max_depth(),
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) adapters: AdapterSettings,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a configuration binding `bind_addr` with default adapter limits.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            adapters: AdapterSettings::default(),
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without a pool the project and documentation ports are served by
    /// fixtures.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Replace the adapter timeouts and depth bounds.
    #[must_use]
    pub fn with_adapter_settings(mut self, adapters: AdapterSettings) -> Self {
        self.adapters = adapters;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
