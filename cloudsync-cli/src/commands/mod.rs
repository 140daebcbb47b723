pub mod apply;
pub mod render;
pub mod validate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing::info;

use cloudsync_core::{config, ClientName, Config};
use cloudsync_engine::pipeline::Scope;

/// Where the configuration comes from; shared by every subcommand.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Config file (default: ./cloudsync.yaml, then ~/.cloudsync/config.yaml).
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Client name stamped on every resource (default: the config file stem).
    #[arg(long)]
    pub client: Option<String>,
}

/// A loaded, validated configuration and where it came from.
pub struct Loaded {
    pub path: PathBuf,
    pub client: ClientName,
    pub config: Config,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<Loaded> {
        let path =
            config::resolve_path(self.config.as_deref()).context("could not locate config file")?;
        let client = match &self.client {
            Some(name) => ClientName::from(name.as_str()),
            None => Config::default_client_name(&path),
        };
        let config = config::load_at(&path, &client)
            .with_context(|| format!("failed to load '{}'", path.display()))?;
        config::validate(&config)
            .with_context(|| format!("invalid configuration in '{}'", path.display()))?;
        info!(
            path = %path.display(),
            client = %client,
            queues = config.task_queues.len(),
            buckets = config.storage_buckets.len(),
            "configuration loaded"
        );
        Ok(Loaded {
            path,
            client,
            config,
        })
    }
}

/// `--only` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Only {
    /// Cloud Tasks queues.
    Tasks,
    /// Cloud Storage buckets.
    Storage,
}

pub fn scope(only: Option<Only>) -> Scope {
    match only {
        None => Scope::All,
        Some(Only::Tasks) => Scope::Tasks,
        Some(Only::Storage) => Scope::Storage,
    }
}
