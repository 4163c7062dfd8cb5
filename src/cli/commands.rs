//! CLI command handlers

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use kube::core::DynamicObject;

use resource_viewer::config::{Config, OutputFormat, paths};
use resource_viewer::services::{ConditionStatusResolver, PathLinker};
use resource_viewer::viewer::{Collector, ResourceViewer, find_object, related_objects, walk};

/// Arguments of the `graph` command
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Read objects from a YAML/JSON manifest file
    #[arg(long, short = 'f', conflicts_with = "namespace")]
    pub file: Option<PathBuf>,

    /// List objects from this namespace of the current cluster
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    /// Kubeconfig context to use with --namespace
    #[arg(long, requires = "namespace")]
    pub context: Option<String>,

    /// Root object (uid or name); only objects related to it are graphed
    #[arg(long, short = 's')]
    pub select: Option<String>,

    /// Show every pod as its own node
    #[arg(long)]
    pub no_group_pods: bool,

    /// Output format (json or yaml)
    #[arg(long, short = 'o')]
    pub format: Option<OutputFormat>,
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    Show,
    /// Show configuration file path
    Path,
}

/// Build and print a resource graph
pub async fn handle_graph_command(args: GraphArgs, config: Config) -> Result<()> {
    let objects = load_objects(&args).await?;

    let (objects, selected) = match args.select.as_deref() {
        Some(selector) => {
            let root = find_object(&objects, selector)
                .with_context(|| format!("No object matches {}", selector))?;
            let uid = root
                .metadata
                .uid
                .clone()
                .with_context(|| format!("Object {} has no uid", selector))?;
            (related_objects(&objects, &uid), uid)
        }
        None => (objects.iter().collect(), String::new()),
    };

    let group_pods = config.viewer.group_pods && !args.no_group_pods;
    let collector = Collector::builder(
        Arc::new(ConditionStatusResolver::new()),
        Arc::new(PathLinker::new(config.viewer.link_prefix.clone())),
    )
    .group_pods(group_pods)
    .build();

    let report = walk(&collector, &objects).await;
    tracing::info!(
        "Collected {} objects ({} skipped, {} failed)",
        report.registered,
        report.skipped,
        report.failed
    );
    if report.failed > 0 {
        eprintln!(
            "warning: {} objects or relationships could not be processed",
            report.failed
        );
    }

    let viewer = collector.component(&selected).await;
    print_viewer(&viewer, args.format.unwrap_or(config.output.format))
}

async fn load_objects(args: &GraphArgs) -> Result<Vec<DynamicObject>> {
    if let Some(path) = &args.file {
        return resource_viewer::kube::load_manifest_file(path);
    }

    if let Some(namespace) = &args.namespace {
        let client = resource_viewer::kube::create_client(args.context.as_deref()).await?;
        return resource_viewer::kube::list_namespace_objects(&client, namespace).await;
    }

    anyhow::bail!("Either --file or --namespace is required")
}

fn print_viewer(viewer: &ResourceViewer, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(viewer).context("Failed to serialize graph to JSON")?
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(viewer).context("Failed to serialize graph to YAML")?
        }
    };
    println!("{}", rendered);
    Ok(())
}

/// Handle configuration subcommands
pub fn handle_config_command(cmd: ConfigSubcommand, config: &Config) -> Result<()> {
    match cmd {
        ConfigSubcommand::Show => {
            let yaml =
                serde_yaml::to_string(config).context("Failed to serialize configuration")?;
            print!("{}", yaml);
        }
        ConfigSubcommand::Path => {
            println!("{}", paths::root_config_path().display());
        }
    }
    Ok(())
}
