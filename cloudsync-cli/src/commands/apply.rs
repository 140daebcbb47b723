//! `cloudsync apply`: converge every configured resource.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;

use cloudsync_engine::pipeline::{self, Gateways, PipelineReport};
use cloudsync_engine::{Mode, Operation, Outcome, ResourceReport};
use cloudsync_gcp::{BucketGateway, GatewayConfig, QueueGateway, DEFAULT_TIMEOUT};

use super::{scope, ConfigArgs, Only};

/// Arguments for `cloudsync apply`.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub source: ConfigArgs,

    /// Converge only one resource kind.
    #[arg(long, value_enum)]
    pub only: Option<Only>,

    /// Look resources up and report what would change, without changing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,

    /// Cloud Tasks API base URL.
    #[arg(long, value_name = "URL")]
    pub tasks_endpoint: Option<String>,

    /// Cloud Storage JSON API base URL.
    #[arg(long, value_name = "URL")]
    pub storage_endpoint: Option<String>,

    /// OAuth2 bearer token sent with every request.
    #[arg(long, env = "CLOUDSYNC_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(
        long,
        default_value_t = DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub timeout_secs: u64,
}

impl ApplyArgs {
    pub fn run(self) -> Result<()> {
        let loaded = self.source.load()?;
        let mode = if self.dry_run { Mode::DryRun } else { Mode::Apply };
        debug!(
            tasks_endpoint = self.tasks_endpoint.as_deref().unwrap_or("default"),
            storage_endpoint = self.storage_endpoint.as_deref().unwrap_or("default"),
            authenticated = self.access_token.is_some(),
            timeout_secs = self.timeout_secs,
            "gateway settings"
        );

        let gateways = Gateways::new(
            QueueGateway::new(&self.gateway_config(self.tasks_endpoint.clone())),
            BucketGateway::new(&self.gateway_config(self.storage_endpoint.clone())),
        );
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;
        let report = runtime.block_on(pipeline::run(
            loaded.config,
            &gateways,
            scope(self.only),
            mode,
        ));

        if self.json {
            print_json(&report, self.dry_run)?;
        } else {
            print_table(&report, self.dry_run);
        }

        let failed = report.failure_count();
        let total = report.resources().len();
        if let Err(first) = report.into_result() {
            return Err(first).context(format!("{failed} of {total} resources failed"));
        }
        Ok(())
    }

    fn gateway_config(&self, endpoint: Option<String>) -> GatewayConfig {
        GatewayConfig {
            endpoint,
            access_token: self.access_token.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Serialize)]
struct ApplyReportJson {
    dry_run: bool,
    summary: ApplySummaryJson,
    resources: Vec<ResourceJson>,
}

#[derive(Serialize)]
struct ApplySummaryJson {
    resources: usize,
    created: usize,
    updated: usize,
    would_create: usize,
    would_update: usize,
    failed: usize,
}

#[derive(Serialize)]
struct ResourceJson {
    kind: String,
    name: String,
    outcome: Option<Outcome>,
    operation: Option<Operation>,
    error: Option<String>,
}

#[derive(Tabled)]
struct ApplyTableRow {
    #[tabled(rename = "kind")]
    kind: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "result")]
    result: String,
    #[tabled(rename = "detail")]
    detail: String,
}

fn print_json(report: &PipelineReport, dry_run: bool) -> Result<()> {
    let resources = report.resources();
    let payload = ApplyReportJson {
        dry_run,
        summary: ApplySummaryJson {
            resources: resources.len(),
            created: report.count(Outcome::Created),
            updated: report.count(Outcome::Updated),
            would_create: report.count(Outcome::WouldCreate),
            would_update: report.count(Outcome::WouldUpdate),
            failed: report.failure_count(),
        },
        resources: resources.into_iter().map(resource_json).collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize apply report")?
    );
    Ok(())
}

fn resource_json(resource: &ResourceReport) -> ResourceJson {
    let (outcome, operation, error) = match &resource.result {
        Ok(outcome) => (Some(*outcome), None, None),
        Err(err) => (None, err.operation(), Some(err.to_string())),
    };
    ResourceJson {
        kind: resource.kind.to_string(),
        name: resource.name.to_string(),
        outcome,
        operation,
        error,
    }
}

fn print_table(report: &PipelineReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let resources = report.resources();
    if resources.is_empty() {
        println!("{prefix}Nothing configured.");
        return;
    }

    let rows: Vec<ApplyTableRow> = resources
        .iter()
        .map(|resource| ApplyTableRow {
            kind: resource.kind.to_string(),
            name: resource.name.to_string(),
            result: result_label(resource),
            detail: match &resource.result {
                Ok(_) => String::new(),
                Err(err) => match err.operation() {
                    Some(operation) => format!("{operation}: {}", fault_detail(&err.to_string())),
                    None => err.to_string(),
                },
            },
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    let failed = report.failure_count();
    if failed == 0 {
        println!("{prefix}✓ {} resources converged", resources.len());
    } else {
        println!(
            "{prefix}{} {failed} of {} resources failed",
            "✗".red().bold(),
            resources.len()
        );
    }
}

fn result_label(resource: &ResourceReport) -> String {
    match &resource.result {
        Ok(outcome @ (Outcome::Created | Outcome::Updated)) => {
            outcome.label().green().bold().to_string()
        }
        Ok(outcome) => outcome.label().yellow().to_string(),
        Err(_) => "failed".red().bold().to_string(),
    }
}

/// `"queue 'q': create failed: HTTP 403: denied"` -> `"HTTP 403: denied"`.
fn fault_detail(message: &str) -> &str {
    message
        .split_once(" failed: ")
        .map(|(_, detail)| detail)
        .unwrap_or(message)
}
