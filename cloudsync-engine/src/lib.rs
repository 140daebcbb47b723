//! # cloudsync-engine
//!
//! Get-then-create-or-update convergence for named remote resources.
//!
//! - [`gateway`]: the [`RemoteGateway`] capability every resource kind implements
//! - [`reconciler`]: converge one resource ([`reconcile`])
//! - [`fanout`]: converge a whole set concurrently ([`reconcile_all`], [`run`])
//! - [`pipeline`]: converge every kind in a [`cloudsync_core::Config`]

pub mod error;
pub mod fanout;
pub mod gateway;
pub mod pipeline;
pub mod reconciler;

pub use error::{Operation, ReconcileError};
pub use fanout::{reconcile_all, run, ResourceReport, RunReport};
pub use gateway::{Lookup, RemoteGateway, TransportFault};
pub use reconciler::{reconcile, Mode, Outcome};
