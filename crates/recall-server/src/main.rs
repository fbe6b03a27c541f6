//! CLI entry point for the recall knowledge graph server.
//!
//! Speaks MCP on stdin/stdout; all logging goes to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use recall_core::config::{executable_dir, MemoryConfig};
use recall_graph::KnowledgeGraphManager;
use recall_server::{Dispatcher, McpServer};

#[derive(Parser)]
#[command(name = "recall")]
#[command(about = "Persistent knowledge graph memory served over MCP stdio")]
struct Cli {
    /// Store file path (overrides MEMORY_FILE_PATH and the config file).
    #[arg(short, long)]
    memory_file: Option<PathBuf>,

    /// Config file prefix (default: recall).
    #[arg(short, long, default_value = "recall")]
    config: String,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let logs = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if cli.log_json {
        logs.json().init();
    } else {
        logs.init();
    }

    let memory_path = resolve_memory_path(&cli)?;
    tracing::info!(path = %memory_path.display(), "Using knowledge graph store");

    let manager = Arc::new(KnowledgeGraphManager::open(memory_path));
    let server = McpServer::new(Dispatcher::new(manager));

    tracing::info!("Knowledge graph server running on stdio");
    server.serve_stdio().await?;

    Ok(())
}

/// The `--memory-file` flag is taken as given; configured paths resolve
/// relative to the executable.
fn resolve_memory_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    if let Some(path) = &cli.memory_file {
        return Ok(path.clone());
    }
    let config = MemoryConfig::load(&cli.config)?;
    Ok(config.resolve_memory_path(&executable_dir()?))
}
