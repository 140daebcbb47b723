//! cloudsync core library: desired-state types, configuration loading, errors.
//!
//! Public API surface:
//! - [`types`]: newtypes and desired-state structs
//! - [`error`]: [`ConfigError`]
//! - [`config`]: load / validate / resolve

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::ConfigError;
pub use types::{
    ClientName, DesiredBucket, DesiredQueue, ProjectId, Region, ResourceKind, ResourceName,
};
