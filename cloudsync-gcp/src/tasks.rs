//! Cloud Tasks v2 queue gateway.
//!
//! | Operation | Request                          |
//! |-----------|----------------------------------|
//! | get       | `GET   v2/{name}`                |
//! | create    | `POST  v2/{parent}/queues`       |
//! | update    | `PATCH v2/{name}`                |

use async_trait::async_trait;

use cloudsync_engine::{Lookup, RemoteGateway, TransportFault};
use cloudsync_wire::{WireQueue, WireResource};

use crate::http::HttpTransport;
use crate::GatewayConfig;

pub const TASKS_ENDPOINT: &str = "https://cloudtasks.googleapis.com/";

#[derive(Debug, Clone)]
pub struct QueueGateway {
    http: HttpTransport,
}

impl QueueGateway {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            http: HttpTransport::new(TASKS_ENDPOINT, config),
        }
    }
}

#[async_trait]
impl RemoteGateway for QueueGateway {
    type Spec = WireQueue;
    type Resource = WireQueue;

    async fn get(&self, name: &str) -> Result<Lookup<WireQueue>, TransportFault> {
        self.http.fetch(format!("v2/{name}")).await
    }

    async fn create(&self, spec: &WireQueue) -> Result<(), TransportFault> {
        let path = format!("v2/{}/queues", spec.parent());
        self.http.send("POST", path, Vec::new(), spec).await
    }

    async fn update(&self, spec: &WireQueue) -> Result<(), TransportFault> {
        let path = format!("v2/{}", spec.resource_name());
        self.http.send("PATCH", path, Vec::new(), spec).await
    }
}
