//! Configuration loading and validation.
//!
//! # File format
//!
//! ```yaml
//! cloudTasks:
//!   queue1:
//!     region: us-central1
//!     projectId: some-project
//!     minBackoff: 1s
//!     maxBackoff: 10s
//!     maxConcurrentDispatches: 1000
//!     maxDispatchesPerSecond: 500.0
//! cloudStorage:
//!   my-bucket:
//!     region: northamerica-northeast1
//!     projectId: some-project
//! ```
//!
//! # Lookup order
//!
//! 1. an explicit `--config` path
//! 2. `./cloudsync.yaml`
//! 3. `~/.cloudsync/config.yaml`
//!
//! As with the rest of the crate, path resolution has an `_at` form that takes
//! explicit directories (used in tests with `TempDir`) and a plain form that
//! derives them from the process.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;
use crate::types::{ClientName, DesiredBucket, DesiredQueue, ResourceKind, ResourceName};

pub const LOCAL_CONFIG_FILE: &str = "cloudsync.yaml";

/// A whole configuration file: every desired resource, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "cloudTasks", default, deserialize_with = "null_as_empty")]
    pub task_queues: BTreeMap<String, DesiredQueue>,
    #[serde(rename = "cloudStorage", default, deserialize_with = "null_as_empty")]
    pub storage_buckets: BTreeMap<String, DesiredBucket>,
}

impl Config {
    /// Total number of desired resources across all kinds.
    pub fn len(&self) -> usize {
        self.task_queues.len() + self.storage_buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Client name derived from a config file's stem (`acme.yaml` → `acme`).
    pub fn default_client_name(path: &Path) -> ClientName {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
            .into()
    }
}

/// An empty section (`cloudTasks:` with nothing under it) is an empty map.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<BTreeMap<String, T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// 1. Parse / load
// ---------------------------------------------------------------------------

/// Parse a configuration document.
///
/// Every entry's `name` is replaced by its map key and `client_name` is set to
/// `client`. `origin` is only used to annotate parse errors.
pub fn from_yaml_str(
    yaml: &str,
    client: &ClientName,
    origin: &Path,
) -> Result<Config, ConfigError> {
    if yaml.trim().is_empty() {
        return Ok(Config::default());
    }
    let mut config: Config = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
        path: origin.to_path_buf(),
        source: e,
    })?;

    for (key, queue) in config.task_queues.iter_mut() {
        queue.name = ResourceName::from(key.as_str());
        queue.client_name = client.clone();
    }
    for (key, bucket) in config.storage_buckets.iter_mut() {
        bucket.name = ResourceName::from(key.as_str());
        bucket.client_name = client.clone();
    }
    Ok(config)
}

/// Load the configuration file at `path`.
///
/// Returns `ConfigError::ConfigNotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(path: &Path, client: &ClientName) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    from_yaml_str(&contents, client, path)
}

// ---------------------------------------------------------------------------
// 2. Validate
// ---------------------------------------------------------------------------

/// Check every entry; the first violation (sections in kind order, entries in
/// key order, fields in declaration order) is returned.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    for (key, queue) in &config.task_queues {
        let field = |name: &str| format!("{}[{key}].{name}", ResourceKind::Queue.section());

        check_required(field("name"), queue.name.is_empty())?;
        check_required(field("region"), queue.region.is_empty())?;
        check_required(field("projectId"), queue.project_id.is_empty())?;
        check_charset(field("name"), queue.name.as_str())?;
        check_charset(field("region"), queue.region.as_str())?;
        check_charset(field("projectId"), queue.project_id.as_str())?;
        if queue.max_concurrent_dispatches.is_some_and(|n| n < 0) {
            return Err(violation(field("maxConcurrentDispatches"), "gte"));
        }
        if queue
            .max_dispatches_per_second
            .is_some_and(|r| !r.is_finite() || r < 0.0)
        {
            return Err(violation(field("maxDispatchesPerSecond"), "gte"));
        }
    }

    for (key, bucket) in &config.storage_buckets {
        let field = |name: &str| format!("{}[{key}].{name}", ResourceKind::Bucket.section());

        check_required(field("name"), bucket.name.is_empty())?;
        check_required(field("region"), bucket.region.is_empty())?;
        check_required(field("projectId"), bucket.project_id.is_empty())?;
        check_charset(field("name"), bucket.name.as_str())?;
        check_charset(field("region"), bucket.region.as_str())?;
        check_charset(field("projectId"), bucket.project_id.as_str())?;
    }
    Ok(())
}

fn check_required(field: String, missing: bool) -> Result<(), ConfigError> {
    if missing {
        return Err(violation(field, "required"));
    }
    Ok(())
}

/// Identifiers end up as URL path segments: letters, digits, `-`, `_`, `.`.
fn check_charset(field: String, value: &str) -> Result<(), ConfigError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.');
    if value.chars().all(allowed) {
        return Ok(());
    }
    Err(violation(field, "charset"))
}

fn violation(field: String, rule: &'static str) -> ConfigError {
    ConfigError::Validation { field, rule }
}

// ---------------------------------------------------------------------------
// 3. Path resolution
// ---------------------------------------------------------------------------

/// `<home>/.cloudsync/config.yaml`. Pure, no I/O.
pub fn home_config_path_at(home: &Path) -> PathBuf {
    home.join(".cloudsync").join("config.yaml")
}

/// Pick the config file to load. Pure apart from an existence check on
/// `<cwd>/cloudsync.yaml`.
pub fn resolve_path_at(cwd: &Path, home: &Path, explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let local = cwd.join(LOCAL_CONFIG_FILE);
    if local.exists() {
        return local;
    }
    home_config_path_at(home)
}

/// `resolve_path_at` convenience wrapper.
pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir()?;
    let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
    Ok(resolve_path_at(&cwd, &home, None))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::types::{ProjectId, Region};

    fn client() -> ClientName {
        ClientName::from("some-client")
    }

    fn queue(name: &str) -> DesiredQueue {
        DesiredQueue {
            name: ResourceName::from(name),
            region: Region::from("us-central1"),
            project_id: ProjectId::from("mock-project"),
            min_backoff: Some("1s".to_string()),
            max_backoff: Some("100s".to_string()),
            max_concurrent_dispatches: Some(100),
            max_dispatches_per_second: Some(100.0),
            client_name: client(),
        }
    }

    #[test]
    fn empty_document_is_empty_config() {
        let config = from_yaml_str("  \n", &client(), Path::new("x.yaml")).expect("parse");
        assert!(config.is_empty());
    }

    #[test]
    fn empty_section_is_empty_map() {
        let config =
            from_yaml_str("cloudTasks:\ncloudStorage:\n", &client(), Path::new("x.yaml"))
                .expect("parse");
        assert!(config.task_queues.is_empty());
        assert!(config.storage_buckets.is_empty());
    }

    #[test]
    fn keys_become_names_and_client_is_stamped() {
        let yaml = "cloudStorage:\n  b1:\n    region: us\n    projectId: p\n    name: ignored\n";
        let config = from_yaml_str(yaml, &client(), Path::new("x.yaml")).expect("parse");
        let bucket = &config.storage_buckets["b1"];
        assert_eq!(bucket.name.as_str(), "b1");
        assert_eq!(bucket.client_name, client());
    }

    #[test]
    fn valid_queue_passes() {
        let mut config = Config::default();
        config.task_queues.insert("foooo".into(), queue("foooo"));
        validate(&config).expect("valid");
    }

    #[test]
    fn negative_dispatches_fail_gte() {
        let mut q = queue("foooo");
        q.max_concurrent_dispatches = Some(-1);
        let mut config = Config::default();
        config.task_queues.insert("foooo".into(), q);
        let err = validate(&config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cloudTasks[foooo].maxConcurrentDispatches validate failed on the gte rule"
        );
    }

    #[test]
    fn infinite_rate_fails_gte() {
        let mut q = queue("foooo");
        q.max_dispatches_per_second = Some(f64::INFINITY);
        let mut config = Config::default();
        config.task_queues.insert("foooo".into(), q);
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation { rule: "gte", .. })
        ));
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nope.yaml");
        assert!(matches!(
            load_at(&path, &client()),
            Err(ConfigError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn explicit_path_wins() {
        let cwd = TempDir::new().expect("cwd");
        let home = TempDir::new().expect("home");
        std::fs::write(cwd.path().join(LOCAL_CONFIG_FILE), "").expect("write");
        let explicit = PathBuf::from("/etc/cloudsync/acme.yaml");
        assert_eq!(
            resolve_path_at(cwd.path(), home.path(), Some(&explicit)),
            explicit
        );
    }

    #[test]
    fn local_file_beats_home_file() {
        let cwd = TempDir::new().expect("cwd");
        let home = TempDir::new().expect("home");
        assert_eq!(
            resolve_path_at(cwd.path(), home.path(), None),
            home.path().join(".cloudsync/config.yaml")
        );
        std::fs::write(cwd.path().join(LOCAL_CONFIG_FILE), "").expect("write");
        assert_eq!(
            resolve_path_at(cwd.path(), home.path(), None),
            cwd.path().join(LOCAL_CONFIG_FILE)
        );
    }

    #[test]
    fn client_name_from_file_stem() {
        assert_eq!(
            Config::default_client_name(Path::new("/configs/acme.yaml")).as_str(),
            "acme"
        );
    }
}
