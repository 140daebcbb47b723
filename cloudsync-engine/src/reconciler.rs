//! Converge a single resource.
//!
//! ```text
//! Unknown ──get──► NotFound ──create──► Done | Failed
//!    │
//!    ├────────────► Found ─────update──► Done | Failed
//!    │
//!    └────────────► fault ─────────────► Failed
//! ```
//!
//! At most one mutating call is issued per resource per run, and none at all
//! when the existence check itself faults. There is no retry; re-running the
//! whole pass is always safe because `get` picks the branch.

use serde::Serialize;
use tracing::{debug, error, info, warn};

use cloudsync_wire::{BuildWire, WireResource};

use crate::error::{Operation, ReconcileError};
use crate::gateway::{Lookup, RemoteGateway, TransportFault};

/// Whether mutating calls are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Apply,
    /// Look up only; report which branch would be taken.
    DryRun,
}

/// The branch a successful reconciliation took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Created,
    Updated,
    WouldCreate,
    WouldUpdate,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Created => "created",
            Outcome::Updated => "updated",
            Outcome::WouldCreate => "would create",
            Outcome::WouldUpdate => "would update",
        }
    }
}

/// Bring one resource's remote state in line with `desired`.
pub async fn reconcile<G, D>(
    gateway: &G,
    desired: &D,
    mode: Mode,
) -> Result<Outcome, ReconcileError>
where
    G: RemoteGateway + ?Sized,
    D: BuildWire<Wire = G::Spec>,
{
    let spec = desired.build_wire();
    let name = spec.resource_name();
    let fault = |operation: Operation, source: TransportFault| {
        error!(
            kind = %D::KIND,
            resource = %name,
            %operation,
            error = %source,
            "remote call failed"
        );
        ReconcileError::Remote {
            kind: D::KIND,
            resource: desired.name().clone(),
            operation,
            source,
        }
    };

    debug!(kind = %D::KIND, resource = %name, "looking up");
    let existing = gateway
        .get(name)
        .await
        .map_err(|e| fault(Operation::Get, e))?;

    match (existing, mode) {
        (Lookup::NotFound, Mode::Apply) => {
            info!(kind = %D::KIND, resource = %name, "creating");
            gateway
                .create(&spec)
                .await
                .map_err(|e| fault(Operation::Create, e))?;
            Ok(Outcome::Created)
        }
        (Lookup::Found(_), Mode::Apply) => {
            info!(kind = %D::KIND, resource = %name, "updating");
            gateway
                .update(&spec)
                .await
                .map_err(|e| fault(Operation::Update, e))?;
            Ok(Outcome::Updated)
        }
        (Lookup::NotFound, Mode::DryRun) => {
            warn!(kind = %D::KIND, resource = %name, "[dry-run] would create");
            Ok(Outcome::WouldCreate)
        }
        (Lookup::Found(_), Mode::DryRun) => {
            warn!(kind = %D::KIND, resource = %name, "[dry-run] would update");
            Ok(Outcome::WouldUpdate)
        }
    }
}
