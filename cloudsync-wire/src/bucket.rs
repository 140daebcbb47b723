//! Cloud Storage bucket wire representation.
//!
//! Bucket names live in a single global namespace, so the bucket's identifier
//! is its plain name; `create` is scoped to the owning project instead.

use serde::{Deserialize, Serialize};

use cloudsync_core::{DesiredBucket, ResourceKind, ResourceName};

use crate::{BuildWire, WireResource};

pub const MULTI_REGIONAL: &str = "MULTI_REGIONAL";
pub const REGIONAL: &str = "REGIONAL";

/// Bucket body as sent to (and returned by) the Cloud Storage JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireBucket {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
    /// Owning project id; sent as the `project` query parameter on create.
    #[serde(skip)]
    pub project: String,
}

impl WireResource for WireBucket {
    fn resource_name(&self) -> &str {
        &self.name
    }

    fn parent(&self) -> &str {
        &self.project
    }
}

impl BuildWire for DesiredBucket {
    type Wire = WireBucket;

    const KIND: ResourceKind = ResourceKind::Bucket;

    fn name(&self) -> &ResourceName {
        &self.name
    }

    fn build_wire(&self) -> WireBucket {
        let storage_class = match (&self.storage_class, self.multi_region) {
            (Some(class), _) => class.clone(),
            (None, true) => MULTI_REGIONAL.to_string(),
            (None, false) => REGIONAL.to_string(),
        };

        WireBucket {
            name: self.name.to_string(),
            location: Some(self.region.to_string()),
            storage_class: Some(storage_class),
            project: self.project_id.to_string(),
        }
    }
}
