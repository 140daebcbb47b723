//! The remote resource capability the reconciler converges against.

use async_trait::async_trait;
use thiserror::Error;

use cloudsync_wire::WireResource;

/// Result of an existence check.
///
/// "Does not exist" is an expected answer, not a fault, so it lives here
/// rather than in [`TransportFault`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<R> {
    Found(R),
    NotFound,
}

impl<R> Lookup<R> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

/// Any failure of a remote call other than "not found": auth, quota, a request
/// the provider rejected, network trouble, an unreadable response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFault {
    /// The provider answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never got a response (DNS, connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered but the body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// One resource kind's management API.
///
/// Implementations are shared between every concurrently-reconciling
/// resource of their kind and must not keep per-call mutable state.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    type Spec: WireResource + Send + Sync;
    type Resource: Send;

    /// Fetch the live resource called `name`.
    async fn get(&self, name: &str) -> Result<Lookup<Self::Resource>, TransportFault>;

    /// Create `spec` under `spec.parent()`.
    async fn create(&self, spec: &Self::Spec) -> Result<(), TransportFault>;

    /// Replace the live resource `spec.resource_name()` with `spec`.
    async fn update(&self, spec: &Self::Spec) -> Result<(), TransportFault>;
}
