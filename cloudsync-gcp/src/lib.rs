//! Google Cloud management API gateways.
//!
//! - [`QueueGateway`]: Cloud Tasks v2 queues
//! - [`BucketGateway`]: Cloud Storage JSON API v1 buckets
//!
//! Both share an [`HttpTransport`] built from a [`GatewayConfig`]. No
//! credentials are discovered here: pass a bearer token in
//! [`GatewayConfig::access_token`] or requests go out unauthenticated (useful
//! against emulators and test servers).

pub mod http;
pub mod storage;
pub mod tasks;

use std::time::Duration;

pub use http::HttpTransport;
pub use storage::BucketGateway;
pub use tasks::QueueGateway;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings shared by every gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL override; `None` uses the provider's public endpoint.
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
    /// Applies to each request as a whole (connect + read + write).
    /// `Duration::ZERO` disables it.
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            access_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GatewayConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}
