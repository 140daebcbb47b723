//! # cloudsync-wire
//!
//! Pure mapping from desired-state entries to the provider's wire-level
//! resource representation.
//!
//! Building is total and deterministic: the same desired entry always yields
//! an identical wire spec, so the reconciler can rebuild it freely.
//!
//! ## Usage
//!
//! ```rust
//! use cloudsync_core::{DesiredQueue, ProjectId, Region, ResourceName};
//! use cloudsync_wire::{BuildWire, WireResource};
//!
//! let queue = DesiredQueue {
//!     name: ResourceName::from("q1"),
//!     region: Region::from("us-central1"),
//!     project_id: ProjectId::from("proj"),
//!     ..DesiredQueue::default()
//! };
//! let wire = queue.build_wire();
//! assert_eq!(wire.resource_name(), "projects/proj/locations/us-central1/queues/q1");
//! ```

pub mod bucket;
pub mod queue;

use cloudsync_core::{ResourceKind, ResourceName};

pub use bucket::WireBucket;
pub use queue::{RateLimits, RetryConfig, WireQueue};

/// A provider-level resource body.
pub trait WireResource {
    /// Identifier used for `get` and `update`.
    fn resource_name(&self) -> &str;

    /// Scope a `create` request is issued against.
    fn parent(&self) -> &str;
}

/// A desired-state entry that can be turned into a wire spec.
pub trait BuildWire {
    type Wire: WireResource;

    const KIND: ResourceKind;

    /// The entry's short name, as written in the configuration.
    fn name(&self) -> &ResourceName;

    fn build_wire(&self) -> Self::Wire;
}
