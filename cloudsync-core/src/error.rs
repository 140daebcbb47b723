//! Error types for cloudsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error on load, with file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A desired-state entry broke a validation rule.
    ///
    /// `field` is the dotted location, e.g. `cloudTasks[queue1].region`.
    #[error("{field} validate failed on the {rule} rule")]
    Validation { field: String, rule: &'static str },

    /// `dirs::home_dir()` returned `None`; cannot locate `~/.cloudsync/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// The config file did not exist at the expected path.
    #[error("config not found at {path}")]
    ConfigNotFound { path: PathBuf },
}
