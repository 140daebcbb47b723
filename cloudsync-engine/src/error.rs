//! Error types for cloudsync-engine.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use cloudsync_core::{ResourceKind, ResourceName};

use crate::gateway::TransportFault;

/// The gateway call a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Get,
    Create,
    Update,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Get => write!(f, "get"),
            Operation::Create => write!(f, "create"),
            Operation::Update => write!(f, "update"),
        }
    }
}

/// A single resource failed to converge.
///
/// Always names the resource and its kind, so the fault stays attributable
/// after it is surfaced as the whole run's error.
#[derive(Debug, Clone, Error)]
pub enum ReconcileError {
    /// A gateway call faulted. The original fault is the `source()`.
    #[error("{kind} '{resource}': {operation} failed: {source}")]
    Remote {
        kind: ResourceKind,
        resource: ResourceName,
        operation: Operation,
        #[source]
        source: TransportFault,
    },

    /// The reconciliation task panicked or was torn down before reporting.
    #[error("{kind} '{resource}': reconciliation task aborted: {reason}")]
    TaskAborted {
        kind: ResourceKind,
        resource: ResourceName,
        reason: String,
    },
}

impl ReconcileError {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ReconcileError::Remote { kind, .. } | ReconcileError::TaskAborted { kind, .. } => *kind,
        }
    }

    pub fn resource(&self) -> &ResourceName {
        match self {
            ReconcileError::Remote { resource, .. }
            | ReconcileError::TaskAborted { resource, .. } => resource,
        }
    }

    /// `None` for aborted tasks.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            ReconcileError::Remote { operation, .. } => Some(*operation),
            ReconcileError::TaskAborted { .. } => None,
        }
    }
}
