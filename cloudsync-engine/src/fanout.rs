//! Converge a set of independent resources concurrently.
//!
//! One task per resource is spawned on a [`JoinSet`] before any is awaited.
//! The coordinator then joins every task: a failing resource never cancels its
//! siblings, and work already done on other resources is kept.
//!
//! When more than one resource fails, [`RunReport::into_result`] surfaces the
//! failure that *completed* first. That order depends on network timing and is
//! not stable between runs; callers needing every failure should read
//! [`RunReport::failures`] instead.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{error, info_span, Instrument};

use cloudsync_core::{ResourceKind, ResourceName};
use cloudsync_wire::BuildWire;

use crate::error::ReconcileError;
use crate::gateway::RemoteGateway;
use crate::reconciler::{reconcile, Mode, Outcome};

/// Outcome of one resource within a run.
#[derive(Debug, Clone)]
pub struct ResourceReport {
    pub kind: ResourceKind,
    pub name: ResourceName,
    pub result: Result<Outcome, ReconcileError>,
}

/// Every resource's outcome, in completion order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub reports: Vec<ResourceReport>,
}

impl RunReport {
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn is_success(&self) -> bool {
        self.reports.iter().all(|r| r.result.is_ok())
    }

    /// All failures, in completion order.
    pub fn failures(&self) -> impl Iterator<Item = &ReconcileError> {
        self.reports.iter().filter_map(|r| r.result.as_ref().err())
    }

    /// Count of successful resources that took `outcome`.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(&r.result, Ok(o) if *o == outcome))
            .count()
    }

    /// `Ok(self)` if every resource converged, otherwise the first failure to
    /// complete.
    pub fn into_result(self) -> Result<Self, ReconcileError> {
        let first = self.failures().next().cloned();
        match first {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

/// Reconcile every entry of `resources` concurrently and wait for all of them.
///
/// Entries are keyed by resource name; the map and the gateway are shared
/// read-only with every task.
pub async fn reconcile_all<G, D>(
    gateway: Arc<G>,
    resources: Arc<BTreeMap<String, D>>,
    mode: Mode,
) -> RunReport
where
    G: RemoteGateway + 'static,
    D: BuildWire<Wire = G::Spec> + Send + Sync + 'static,
{
    let mut tasks = JoinSet::new();
    let mut names = HashMap::new();

    for key in resources.keys() {
        let gateway = Arc::clone(&gateway);
        let resources = Arc::clone(&resources);
        let name = key.clone();
        let span = info_span!("reconcile", kind = %D::KIND, resource = %name);

        let handle = tasks.spawn(
            async move {
                let desired = &resources[&name];
                let result = reconcile(gateway.as_ref(), desired, mode).await;
                (desired.name().clone(), result)
            }
            .instrument(span),
        );
        names.insert(handle.id(), ResourceName::from(key.as_str()));
    }

    let mut report = RunReport::default();
    while let Some(joined) = tasks.join_next().await {
        let (name, result) = match joined {
            Ok(done) => done,
            Err(join_err) => {
                let name = names.remove(&join_err.id()).unwrap_or_default();
                error!(
                    kind = %D::KIND,
                    resource = %name,
                    error = %join_err,
                    "reconciliation task aborted"
                );
                let err = ReconcileError::TaskAborted {
                    kind: D::KIND,
                    resource: name.clone(),
                    reason: join_err.to_string(),
                };
                (name, Err(err))
            }
        };
        report.reports.push(ResourceReport {
            kind: D::KIND,
            name,
            result,
        });
    }
    report
}

/// [`reconcile_all`], reduced to a single result.
pub async fn run<G, D>(
    gateway: Arc<G>,
    resources: Arc<BTreeMap<String, D>>,
    mode: Mode,
) -> Result<RunReport, ReconcileError>
where
    G: RemoteGateway + 'static,
    D: BuildWire<Wire = G::Spec> + Send + Sync + 'static,
{
    reconcile_all(gateway, resources, mode).await.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Operation;
    use crate::gateway::TransportFault;

    fn report(name: &str, result: Result<Outcome, ReconcileError>) -> ResourceReport {
        ResourceReport {
            kind: ResourceKind::Bucket,
            name: ResourceName::from(name),
            result,
        }
    }

    fn failed(name: &str) -> Result<Outcome, ReconcileError> {
        Err(ReconcileError::Remote {
            kind: ResourceKind::Bucket,
            resource: ResourceName::from(name),
            operation: Operation::Update,
            source: TransportFault::Transport("timed out".to_string()),
        })
    }

    #[test]
    fn empty_report_is_success() {
        assert!(RunReport::default().into_result().is_ok());
    }

    #[test]
    fn successful_report_is_returned_intact() {
        let run = RunReport {
            reports: vec![
                report("a", Ok(Outcome::Created)),
                report("b", Ok(Outcome::Updated)),
            ],
        };
        let run = run.into_result().expect("all converged");
        assert_eq!(run.len(), 2);
        assert_eq!(run.count(Outcome::Updated), 1);
    }

    #[test]
    fn first_completed_failure_is_surfaced() {
        let run = RunReport {
            reports: vec![
                report("a", Ok(Outcome::Created)),
                report("b", failed("b")),
                report("c", failed("c")),
            ],
        };
        assert_eq!(run.failures().count(), 2);
        assert_eq!(run.count(Outcome::Created), 1);
        let err = run.into_result().unwrap_err();
        assert_eq!(err.resource().as_str(), "b");
    }
}
