//! `cloudsync validate`: load and check the configuration offline.

use anyhow::Result;
use clap::Args;

use super::ConfigArgs;

/// Arguments for `cloudsync validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: ConfigArgs,
}

impl ValidateArgs {
    pub fn run(self) -> Result<()> {
        let loaded = self.source.load()?;
        println!(
            "✓ '{}' is valid ({} queues, {} buckets, client '{}')",
            loaded.path.display(),
            loaded.config.task_queues.len(),
            loaded.config.storage_buckets.len(),
            loaded.client,
        );
        Ok(())
    }
}
