//! `cloudsync render`: print the request bodies without contacting the
//! provider.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use serde_json::Value;

use cloudsync_core::ResourceKind;
use cloudsync_wire::{BuildWire, WireResource};

use super::{scope, ConfigArgs, Only};

/// Arguments for `cloudsync render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: ConfigArgs,

    /// Render only one resource kind.
    #[arg(long, value_enum)]
    pub only: Option<Only>,
}

#[derive(Serialize)]
struct RenderedJson {
    #[serde(rename = "cloudTasks", skip_serializing_if = "Vec::is_empty")]
    queues: Vec<RenderedResource>,
    #[serde(rename = "cloudStorage", skip_serializing_if = "Vec::is_empty")]
    buckets: Vec<RenderedResource>,
}

#[derive(Serialize)]
struct RenderedResource {
    name: String,
    parent: String,
    body: Value,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let loaded = self.source.load()?;
        let scope = scope(self.only);

        let mut rendered = RenderedJson {
            queues: Vec::new(),
            buckets: Vec::new(),
        };
        if scope.includes(ResourceKind::Queue) {
            rendered.queues = render_set(&loaded.config.task_queues)?;
        }
        if scope.includes(ResourceKind::Bucket) {
            rendered.buckets = render_set(&loaded.config.storage_buckets)?;
        }

        println!(
            "{}",
            serde_json::to_string_pretty(&rendered).context("failed to serialize rendered specs")?
        );
        Ok(())
    }
}

fn render_set<D>(entries: &BTreeMap<String, D>) -> Result<Vec<RenderedResource>>
where
    D: BuildWire,
    D::Wire: Serialize,
{
    entries
        .values()
        .map(|desired| {
            let wire = desired.build_wire();
            let body = serde_json::to_value(&wire)
                .with_context(|| format!("failed to encode {} '{}'", D::KIND, desired.name()))?;
            Ok(RenderedResource {
                name: wire.resource_name().to_string(),
                parent: wire.parent().to_string(),
                body,
            })
        })
        .collect()
}
