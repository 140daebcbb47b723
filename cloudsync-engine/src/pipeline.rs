//! Shared convergence entrypoint used by the CLI.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use cloudsync_core::{Config, ResourceKind};
use cloudsync_wire::{WireBucket, WireQueue};

use crate::error::ReconcileError;
use crate::fanout::{reconcile_all, ResourceReport, RunReport};
use crate::gateway::RemoteGateway;
use crate::reconciler::{Mode, Outcome};

/// Which resource kinds a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    All,
    Tasks,
    Storage,
}

impl Scope {
    pub fn includes(&self, kind: ResourceKind) -> bool {
        matches!(
            (self, kind),
            (Scope::All, _)
                | (Scope::Tasks, ResourceKind::Queue)
                | (Scope::Storage, ResourceKind::Bucket)
        )
    }
}

/// One gateway per resource kind.
pub struct Gateways<Q, B> {
    pub queues: Arc<Q>,
    pub buckets: Arc<B>,
}

impl<Q, B> Gateways<Q, B> {
    pub fn new(queues: Q, buckets: B) -> Self {
        Self {
            queues: Arc::new(queues),
            buckets: Arc::new(buckets),
        }
    }
}

/// Per-kind run reports for one configuration.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub queues: RunReport,
    pub buckets: RunReport,
}

impl PipelineReport {
    /// Every resource outcome, sorted by kind then name.
    pub fn resources(&self) -> Vec<&ResourceReport> {
        let mut all: Vec<_> = self
            .queues
            .reports
            .iter()
            .chain(self.buckets.reports.iter())
            .collect();
        all.sort_by(|a, b| (a.kind, &a.name).cmp(&(b.kind, &b.name)));
        all
    }

    pub fn is_success(&self) -> bool {
        self.queues.is_success() && self.buckets.is_success()
    }

    pub fn failure_count(&self) -> usize {
        self.queues.failures().count() + self.buckets.failures().count()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.queues.count(outcome) + self.buckets.count(outcome)
    }

    /// `Ok(self)` if everything converged; otherwise the queue set's first
    /// failure, else the bucket set's.
    pub fn into_result(self) -> Result<Self, ReconcileError> {
        let err = self
            .queues
            .failures()
            .chain(self.buckets.failures())
            .next()
            .cloned();
        match err {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

/// Converge every resource kind in `config` that `scope` selects.
///
/// Kinds run concurrently with each other, and every resource within a kind
/// runs concurrently too.
pub async fn run<Q, B>(
    config: Config,
    gateways: &Gateways<Q, B>,
    scope: Scope,
    mode: Mode,
) -> PipelineReport
where
    Q: RemoteGateway<Spec = WireQueue> + 'static,
    B: RemoteGateway<Spec = WireBucket> + 'static,
{
    let queues = select(config.task_queues, scope.includes(ResourceKind::Queue));
    let buckets = select(config.storage_buckets, scope.includes(ResourceKind::Bucket));
    info!(
        queues = queues.len(),
        buckets = buckets.len(),
        dry_run = mode == Mode::DryRun,
        "converging"
    );

    let (queues, buckets) = tokio::join!(
        reconcile_all(Arc::clone(&gateways.queues), Arc::new(queues), mode),
        reconcile_all(Arc::clone(&gateways.buckets), Arc::new(buckets), mode),
    );
    PipelineReport { queues, buckets }
}

fn select<D>(entries: BTreeMap<String, D>, included: bool) -> BTreeMap<String, D> {
    if included {
        entries
    } else {
        BTreeMap::new()
    }
}
