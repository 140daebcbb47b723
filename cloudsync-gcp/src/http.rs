//! Blocking `ureq` transport, driven from the async gateways through
//! `spawn_blocking`.
//!
//! Response classification:
//!
//! | Provider answer          | Result                                 |
//! |--------------------------|----------------------------------------|
//! | 2xx                      | success (body decoded for `fetch`)     |
//! | 404 on `fetch`           | `Lookup::NotFound`                     |
//! | any other status         | `TransportFault::Status`               |
//! | no answer                | `TransportFault::Transport`            |
//! | undecodable 2xx body     | `TransportFault::Decode`               |

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use cloudsync_engine::{Lookup, TransportFault};

use crate::GatewayConfig;

const NOT_FOUND: u16 = 404;

/// Shared HTTP plumbing for one provider API.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
    base: String,
    token: Option<String>,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base", &self.base)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl HttpTransport {
    /// `default_base` is used unless `config.endpoint` overrides it.
    pub fn new(default_base: &str, config: &GatewayConfig) -> Self {
        let mut agent = ureq::AgentBuilder::new();
        if !config.timeout.is_zero() {
            agent = agent.timeout(config.timeout);
        }
        let agent = agent.build();
        let base = config
            .endpoint
            .as_deref()
            .unwrap_or(default_base)
            .trim_end_matches('/')
            .to_string();
        Self {
            agent,
            base,
            token: config.access_token.clone(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    /// `GET path`, decoding the body as `T`.
    pub async fn fetch<T>(&self, path: String) -> Result<Lookup<T>, TransportFault>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let transport = self.clone();
        run_blocking(move || match transport.execute("GET", &path, &[], None) {
            Ok(response) => response
                .into_json::<T>()
                .map(Lookup::Found)
                .map_err(|e| TransportFault::Decode(e.to_string())),
            Err(TransportFault::Status {
                status: NOT_FOUND, ..
            }) => Ok(Lookup::NotFound),
            Err(fault) => Err(fault),
        })
        .await
    }

    /// Send `body` as JSON. Any 2xx is success; the response body is ignored.
    pub async fn send<B>(
        &self,
        method: &'static str,
        path: String,
        query: Vec<(&'static str, String)>,
        body: &B,
    ) -> Result<(), TransportFault>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)
            .map_err(|e| TransportFault::Decode(format!("cannot encode request body: {e}")))?;
        let transport = self.clone();
        run_blocking(move || {
            transport
                .execute(method, &path, &query, Some(&body))
                .map(|_| ())
        })
        .await
    }

    fn execute(
        &self,
        method: &str,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<ureq::Response, TransportFault> {
        let url = self.url(path);
        debug!(%method, %url, "request");

        let mut request = self.agent.request(method, &url);
        for (key, value) in query {
            request = request.query(key, value);
        }
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };
        match result {
            Ok(response) => Ok(response),
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                debug!(%method, %url, status, "request rejected");
                Err(TransportFault::Status {
                    status,
                    message: error_message(&body),
                })
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(TransportFault::Transport(transport.to_string()))
            }
        }
    }
}

async fn run_blocking<T, F>(call: F) -> Result<T, TransportFault>
where
    F: FnOnce() -> Result<T, TransportFault> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| TransportFault::Transport(format!("request task failed: {e}")))?
}

/// Google APIs wrap failures as `{"error": {"message": ...}}`; fall back to
/// the raw body otherwise.
fn error_message(body: &str) -> String {
    let structured = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.pointer("/error/message")
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    match structured {
        Some(message) => message,
        None if body.trim().is_empty() => "empty response body".to_string(),
        None => body.trim().to_string(),
    }
}
