//! Directory process entry point: configuration, backend wiring, admin
//! commands, and the HTTP server.

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use account_directory::server::{self, DirectoryHandles, ServiceConfig};

/// Command-line surface for the directory binary.
#[derive(Debug, Parser)]
#[command(about = "Account directory service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the stored legacy names and exit.
    ListNames,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let config = ServiceConfig::from_env().map_err(std::io::Error::other)?;
    let handles = server::connect(&config).map_err(std::io::Error::other)?;

    match cli.command {
        Some(Command::ListNames) => list_names(&handles).await,
        None => server::run(config, handles).await,
    }
}

/// Administrative listing of the legacy name records.
async fn list_names(handles: &DirectoryHandles) -> std::io::Result<()> {
    let entries = handles.names.list().await.map_err(std::io::Error::other)?;
    for entry in entries {
        println!("{} {}", entry.first_name, entry.last_name);
    }
    Ok(())
}
