//! cloudsync: converge Cloud Tasks queues and Cloud Storage buckets to a
//! YAML description.
//!
//! # Usage
//!
//! ```text
//! cloudsync apply [--config <path>] [--client <name>] [--only tasks|storage] [--dry-run] [--json]
//! cloudsync validate [--config <path>]
//! cloudsync render [--config <path>] [--only tasks|storage]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{apply::ApplyArgs, render::RenderArgs, validate::ValidateArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "cloudsync",
    version,
    about = "Provision Cloud Tasks queues and Cloud Storage buckets from a config file",
    long_about = None,
)]
struct Cli {
    /// Emit log lines as JSON on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or update every configured resource.
    Apply(ApplyArgs),

    /// Load and validate the configuration without contacting the provider.
    Validate(ValidateArgs),

    /// Print the request bodies that `apply` would send.
    Render(RenderArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    match cli.command {
        Commands::Apply(args) => args.run(),
        Commands::Validate(args) => args.run(),
        Commands::Render(args) => args.run(),
    }
}

/// Logs go to stderr; stdout carries command output only.
fn init_tracing(json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
