//! Cloud Storage JSON API bucket gateway.
//!
//! | Operation | Request                          |
//! |-----------|----------------------------------|
//! | get       | `GET  b/{name}`                  |
//! | create    | `POST b?project={project}`       |
//! | update    | `PUT  b/{name}`                  |

use async_trait::async_trait;

use cloudsync_engine::{Lookup, RemoteGateway, TransportFault};
use cloudsync_wire::{WireBucket, WireResource};

use crate::http::HttpTransport;
use crate::GatewayConfig;

pub const STORAGE_ENDPOINT: &str = "https://storage.googleapis.com/storage/v1/";

#[derive(Debug, Clone)]
pub struct BucketGateway {
    http: HttpTransport,
}

impl BucketGateway {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            http: HttpTransport::new(STORAGE_ENDPOINT, config),
        }
    }
}

#[async_trait]
impl RemoteGateway for BucketGateway {
    type Spec = WireBucket;
    type Resource = WireBucket;

    async fn get(&self, name: &str) -> Result<Lookup<WireBucket>, TransportFault> {
        self.http.fetch(format!("b/{name}")).await
    }

    async fn create(&self, spec: &WireBucket) -> Result<(), TransportFault> {
        let query = vec![("project", spec.parent().to_string())];
        self.http.send("POST", "b".to_string(), query, spec).await
    }

    async fn update(&self, spec: &WireBucket) -> Result<(), TransportFault> {
        let path = format!("b/{}", spec.resource_name());
        self.http.send("PUT", path, Vec::new(), spec).await
    }
}
