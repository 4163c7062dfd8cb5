//! resource-viewer - builds a health-annotated graph of related Kubernetes objects
//!
//! Objects are read from a manifest file or listed from a namespace, linked
//! through their owner references, and printed as a graph document for a
//! rendering layer to draw.

mod cli;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cli::{ConfigSubcommand, GraphArgs};
use resource_viewer::config::ConfigLoader;

/// Build a dependency graph of Kubernetes resources
#[derive(Parser, Debug)]
#[command(name = "resource-viewer")]
#[command(about = "Build a health-annotated dependency graph of Kubernetes resources", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Build and print a resource graph
    Graph(GraphArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(log_path) = cli::init_logging(args.debug)? {
        eprintln!("Debug logging to {}", log_path.display());
    }

    let config =
        ConfigLoader::load(args.config.as_deref()).context("Failed to load configuration")?;

    match args.command {
        Command::Graph(graph_args) => cli::handle_graph_command(graph_args, config).await,
        Command::Config { subcommand } => cli::handle_config_command(subcommand, &config),
    }
}
