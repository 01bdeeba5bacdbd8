use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pgvec_provision_core::DatabaseConfig;
use pgvec_provision_service::{PgExecutorFactory, ProvisioningService};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pgvec-provision")]
#[command(about = "Provision a pgvector table, schema and HNSW index from an invocation event", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP invocation endpoint
    Serve {
        #[arg(short, long, default_value = "37780")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Run a single invocation and print the response envelope
    Invoke {
        /// Event JSON file; reads stdin when omitted or `-`
        #[arg(short, long)]
        event: Option<PathBuf>,
    },
    /// Print the statements an event would execute, without connecting
    Sql {
        /// Event JSON file; reads stdin when omitted or `-`
        #[arg(short, long)]
        event: Option<PathBuf>,
    },
}

pub(crate) fn read_event(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(p) if p.as_os_str() != "-" => std::fs::read_to_string(p)
            .with_context(|| format!("cannot read event file {}", p.display())),
        _ => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw).context("cannot read event from stdin")?;
            Ok(raw)
        },
    }
}

/// Load startup configuration and wire the PostgreSQL-backed service.
pub(crate) fn build_service() -> Result<ProvisioningService> {
    let config = DatabaseConfig::from_env()?;
    tracing::info!(
        resource = %config.resource_url,
        database = %config.database_name,
        secret = %config.secret_file.display(),
        "database configuration loaded"
    );
    Ok(ProvisioningService::new(Arc::new(PgExecutorFactory::new(config))))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(port, host).await,
        Commands::Invoke { event } => commands::invoke::run(event.as_ref()).await,
        Commands::Sql { event } => commands::sql::run(event.as_ref()),
    }
}
