//! In-memory gateway shared by the engine's integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use cloudsync_core::{DesiredBucket, DesiredQueue, ProjectId, Region, ResourceName};
use cloudsync_engine::{Lookup, RemoteGateway, TransportFault};
use cloudsync_wire::WireResource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get(String),
    Create(String),
    Update(String),
}

/// Records every call. A successful `create` makes the resource exist for
/// later lookups, like the real provider.
pub struct MemoryGateway<S> {
    existing: Mutex<HashSet<String>>,
    fail_get: HashSet<String>,
    fail_create: HashSet<String>,
    fail_update: HashSet<String>,
    panic_on_get: HashSet<String>,
    calls: Mutex<Vec<Call>>,
    sent: Mutex<Vec<S>>,
}

impl<S> Default for MemoryGateway<S> {
    fn default() -> Self {
        Self {
            existing: Mutex::new(HashSet::new()),
            fail_get: HashSet::new(),
            fail_create: HashSet::new(),
            fail_update: HashSet::new(),
            panic_on_get: HashSet::new(),
            calls: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }
}

impl<S: Clone> MemoryGateway<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_existing(self, name: &str) -> Self {
        self.existing.lock().unwrap().insert(name.to_string());
        self
    }

    pub fn failing_get(mut self, name: &str) -> Self {
        self.fail_get.insert(name.to_string());
        self
    }

    pub fn failing_create(mut self, name: &str) -> Self {
        self.fail_create.insert(name.to_string());
        self
    }

    pub fn failing_update(mut self, name: &str) -> Self {
        self.fail_update.insert(name.to_string());
        self
    }

    pub fn panicking_get(mut self, name: &str) -> Self {
        self.panic_on_get.insert(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn creates(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Update(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    /// Specs passed to `create` / `update`, in call order.
    pub fn sent(&self) -> Vec<S> {
        self.sent.lock().unwrap().clone()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.existing.lock().unwrap().contains(name)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn rejected(name: &str) -> TransportFault {
    TransportFault::Status {
        status: 400,
        message: format!("{name} rejected"),
    }
}

#[async_trait]
impl<S> RemoteGateway for MemoryGateway<S>
where
    S: WireResource + Clone + Send + Sync + 'static,
{
    type Spec = S;
    type Resource = String;

    async fn get(&self, name: &str) -> Result<Lookup<String>, TransportFault> {
        self.record(Call::Get(name.to_string()));
        if self.panic_on_get.contains(name) {
            panic!("gateway blew up on {name}");
        }
        if self.fail_get.contains(name) {
            return Err(TransportFault::Transport(format!("{name}: connection reset")));
        }
        if self.exists(name) {
            Ok(Lookup::Found(name.to_string()))
        } else {
            Ok(Lookup::NotFound)
        }
    }

    async fn create(&self, spec: &S) -> Result<(), TransportFault> {
        let name = spec.resource_name().to_string();
        self.record(Call::Create(name.clone()));
        self.sent.lock().unwrap().push(spec.clone());
        if self.fail_create.contains(&name) {
            return Err(rejected(&name));
        }
        self.existing.lock().unwrap().insert(name);
        Ok(())
    }

    async fn update(&self, spec: &S) -> Result<(), TransportFault> {
        let name = spec.resource_name().to_string();
        self.record(Call::Update(name.clone()));
        self.sent.lock().unwrap().push(spec.clone());
        if self.fail_update.contains(&name) {
            return Err(rejected(&name));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub const Q1_PATH: &str = "projects/proj/locations/us-central1/queues/q1";

pub fn q1() -> DesiredQueue {
    DesiredQueue {
        name: ResourceName::from("q1"),
        region: Region::from("us-central1"),
        project_id: ProjectId::from("proj"),
        min_backoff: Some("1s".to_string()),
        max_backoff: Some("10s".to_string()),
        max_concurrent_dispatches: Some(1000),
        max_dispatches_per_second: Some(500.0),
        ..DesiredQueue::default()
    }
}

pub fn queue_path(name: &str) -> String {
    format!("projects/proj/locations/us-central1/queues/{name}")
}

/// `count` queues named `q0..q{count-1}`, otherwise identical to [`q1`].
pub fn queues(count: usize) -> BTreeMap<String, DesiredQueue> {
    (0..count)
        .map(|i| {
            let name = format!("q{i}");
            let queue = DesiredQueue {
                name: ResourceName::from(name.as_str()),
                ..q1()
            };
            (name, queue)
        })
        .collect()
}

pub fn buckets(names: &[&str]) -> BTreeMap<String, DesiredBucket> {
    names
        .iter()
        .map(|name| {
            let bucket = DesiredBucket {
                name: ResourceName::from(*name),
                region: Region::from("us-east1"),
                project_id: ProjectId::from("proj"),
                ..DesiredBucket::default()
            };
            (name.to_string(), bucket)
        })
        .collect()
}
