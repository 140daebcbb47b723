//! Cloud Tasks queue wire representation.
//!
//! | Field                                | Source                          |
//! |--------------------------------------|---------------------------------|
//! | `name`                               | `projects/{p}/locations/{r}/queues/{name}` |
//! | `rateLimits.maxDispatchesPerSecond`  | `maxDispatchesPerSecond`        |
//! | `rateLimits.maxConcurrentDispatches` | `maxConcurrentDispatches`       |
//! | `retryConfig.minBackoff`             | `minBackoff`                    |
//! | `retryConfig.maxBackoff`             | `maxBackoff`                    |

use serde::{Deserialize, Serialize};

use cloudsync_core::{DesiredQueue, ProjectId, Region, ResourceKind, ResourceName};

use crate::{BuildWire, WireResource};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_dispatches_per_second: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent_dispatches: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_backoff: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_backoff: Option<String>,
}

/// Queue body as sent to (and returned by) the Cloud Tasks API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireQueue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limits: Option<RateLimits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_config: Option<RetryConfig>,
    /// `projects/{p}/locations/{r}`; not part of the body.
    #[serde(skip)]
    pub parent: String,
}

/// `projects/{project}/locations/{region}`
pub fn location_path(project: &ProjectId, region: &Region) -> String {
    format!("projects/{project}/locations/{region}")
}

/// `projects/{project}/locations/{region}/queues/{name}`
pub fn queue_path(project: &ProjectId, region: &Region, name: &ResourceName) -> String {
    format!("{}/queues/{name}", location_path(project, region))
}

impl WireResource for WireQueue {
    fn resource_name(&self) -> &str {
        &self.name
    }

    fn parent(&self) -> &str {
        &self.parent
    }
}

impl BuildWire for DesiredQueue {
    type Wire = WireQueue;

    const KIND: ResourceKind = ResourceKind::Queue;

    fn name(&self) -> &ResourceName {
        &self.name
    }

    fn build_wire(&self) -> WireQueue {
        let rate_limits = RateLimits {
            max_dispatches_per_second: self.max_dispatches_per_second,
            max_concurrent_dispatches: self.max_concurrent_dispatches,
        };
        let retry_config = RetryConfig {
            min_backoff: self.min_backoff.clone(),
            max_backoff: self.max_backoff.clone(),
        };

        WireQueue {
            name: queue_path(&self.project_id, &self.region, &self.name),
            rate_limits: (rate_limits != RateLimits::default()).then_some(rate_limits),
            retry_config: (retry_config != RetryConfig::default()).then_some(retry_config),
            parent: location_path(&self.project_id, &self.region),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn q1() -> DesiredQueue {
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

    #[test]
    fn builds_fully_qualified_name_and_parent() {
        let wire = q1().build_wire();
        assert_eq!(wire.name, "projects/proj/locations/us-central1/queues/q1");
        assert_eq!(wire.parent(), "projects/proj/locations/us-central1");
    }

    #[test]
    fn copies_tunables_into_nested_fields() {
        let wire = q1().build_wire();
        let limits = wire.rate_limits.expect("rate limits");
        assert_eq!(limits.max_dispatches_per_second, Some(500.0));
        assert_eq!(limits.max_concurrent_dispatches, Some(1000));
        let retry = wire.retry_config.expect("retry config");
        assert_eq!(retry.min_backoff.as_deref(), Some("1s"));
        assert_eq!(retry.max_backoff.as_deref(), Some("10s"));
    }

    #[test]
    fn body_json_shape() {
        let body = serde_json::to_value(q1().build_wire()).expect("serialize");
        assert_eq!(
            body,
            json!({
                "name": "projects/proj/locations/us-central1/queues/q1",
                "rateLimits": { "maxDispatchesPerSecond": 500.0, "maxConcurrentDispatches": 1000 },
                "retryConfig": { "minBackoff": "1s", "maxBackoff": "10s" }
            })
        );
    }

    #[test]
    fn absent_tunables_are_omitted() {
        let queue = DesiredQueue {
            max_backoff: None,
            max_concurrent_dispatches: None,
            min_backoff: None,
            ..q1()
        };
        let body = serde_json::to_value(queue.build_wire()).expect("serialize");
        assert_eq!(
            body,
            json!({
                "name": "projects/proj/locations/us-central1/queues/q1",
                "rateLimits": { "maxDispatchesPerSecond": 500.0 }
            })
        );
    }

    #[test]
    fn building_twice_is_byte_identical() {
        let queue = q1();
        let a = serde_json::to_string(&queue.build_wire()).expect("a");
        let b = serde_json::to_string(&queue.build_wire()).expect("b");
        assert_eq!(a, b);
    }
}
