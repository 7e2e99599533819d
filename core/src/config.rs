//! Gateway configuration and the composition root.
//!
//! The mode is resolved once from the environment and fixed for the
//! lifetime of the gateway returned by `build_gateway`.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::client::HealthEventClient;
use crate::error::ConfigError;
use crate::gateway::{HealthEventGateway, MockGateway, MockLatency, MockStore, RemoteGateway};
use crate::transport::UreqTransport;

pub const BASE_URL_VAR: &str = "HEALTH_API_BASE_URL";
pub const USE_MOCK_VAR: &str = "HEALTH_USE_MOCK_API";
pub const MOCK_LATENCY_VAR: &str = "HEALTH_MOCK_LATENCY_MS";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub use_mock: bool,
    pub mock_latency: MockLatency,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            use_mock: false,
            mock_latency: MockLatency::default(),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve the config through `lookup`. Mock mode is enabled only by the
    /// exact value `"true"`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|v| !v.is_empty()) {
            config.base_url = base_url;
        }
        config.use_mock = lookup(USE_MOCK_VAR).as_deref() == Some("true");
        if let Some(raw) = lookup(MOCK_LATENCY_VAR) {
            let millis = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidLatency {
                name: MOCK_LATENCY_VAR,
                value: raw.clone(),
            })?;
            config.mock_latency = MockLatency::uniform(Duration::from_millis(millis));
        }
        Ok(config)
    }
}

/// Wire the gateway selected by `config`. Mock mode keeps a remote gateway
/// as passthrough for the lookups that have no offline data.
pub fn build_gateway(config: &GatewayConfig) -> Arc<dyn HealthEventGateway> {
    let remote = Arc::new(RemoteGateway::new(
        HealthEventClient::new(&config.base_url),
        UreqTransport::new(),
    ));
    if config.use_mock {
        info!(base_url = %config.base_url, "health events served from mock store");
        Arc::new(MockGateway::new(Arc::new(MockStore::seeded()), remote).with_latency(config.mock_latency))
    } else {
        info!(base_url = %config.base_url, "health events served from remote API");
        remote
    }
}
