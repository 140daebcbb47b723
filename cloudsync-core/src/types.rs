//! Desired-state types for cloudsync.
//!
//! Every struct here is produced by [`crate::config`] and is immutable for the
//! duration of a reconciliation run. Field names serialize as camelCase to
//! match the configuration file.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

string_newtype!(
    /// Name of a managed resource, unique within its kind and owning client.
    ResourceName
);
string_newtype!(
    /// Provider project identifier (`projects/{project_id}/...`).
    ProjectId
);
string_newtype!(
    /// Provider region / location, e.g. `us-central1`.
    Region
);
string_newtype!(
    /// The client a configuration file belongs to.
    ClientName
);

// ---------------------------------------------------------------------------
// Resource kinds
// ---------------------------------------------------------------------------

/// The kinds of resource cloudsync knows how to converge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Queue,
    Bucket,
}

impl ResourceKind {
    /// Top-level key of this kind's section in the configuration file.
    pub fn section(&self) -> &'static str {
        match self {
            ResourceKind::Queue => "cloudTasks",
            ResourceKind::Bucket => "cloudStorage",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Queue => write!(f, "queue"),
            ResourceKind::Bucket => write!(f, "bucket"),
        }
    }
}

// ---------------------------------------------------------------------------
// Desired state
// ---------------------------------------------------------------------------

/// A Cloud Tasks queue as the operator wants it to exist.
///
/// All tunables are optional; an absent tunable is left to the provider's
/// default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesiredQueue {
    /// Overwritten with the map key on load.
    #[serde(default)]
    pub name: ResourceName,
    #[serde(default)]
    pub region: Region,
    #[serde(default)]
    pub project_id: ProjectId,
    /// Duration string, e.g. `"1s"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_backoff: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_backoff: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent_dispatches: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_dispatches_per_second: Option<f64>,
    #[serde(skip)]
    pub client_name: ClientName,
}

/// A Cloud Storage bucket as the operator wants it to exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesiredBucket {
    /// Overwritten with the map key on load.
    #[serde(default)]
    pub name: ResourceName,
    #[serde(default)]
    pub region: Region,
    #[serde(default)]
    pub project_id: ProjectId,
    /// Explicit storage class; wins over `multi_region`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
    #[serde(default = "default_multi_region")]
    pub multi_region: bool,
    #[serde(skip)]
    pub client_name: ClientName,
}

fn default_multi_region() -> bool {
    true
}

impl Default for DesiredBucket {
    fn default() -> Self {
        Self {
            name: ResourceName::default(),
            region: Region::default(),
            project_id: ProjectId::default(),
            storage_class: None,
            multi_region: default_multi_region(),
            client_name: ClientName::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
