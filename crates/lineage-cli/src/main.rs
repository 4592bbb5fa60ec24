//! Lineage CLI - Command-line interface for lineage graph analytics
//!
//! Loads a lineage snapshot exported by the canvas and runs the same
//! highlight, search, clustering and viewport computations against it.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "lineage")]
#[command(author = "Lineage Contributors")]
#[command(version)]
#[command(about = "Column-level lineage analytics", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Snapshot file with `nodes` and `edges` arrays
    #[arg(short, long, global = true, default_value = "lineage-graph.json")]
    graph: PathBuf,

    /// Config file (defaults to .lineage/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config to .lineage/config.json
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show snapshot statistics
    Stats {
        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Show the upstream and downstream lineage of a node
    Highlight {
        /// Node or column id
        node: String,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Search columns by name
    Search {
        /// Search query
        query: String,

        /// Maximum results to return (overrides config)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// List per-database clusters
    Clusters {
        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Compute the initial viewport
    Viewport {
        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let inputs = commands::Inputs {
        graph: cli.graph,
        config: cli.config,
    };

    let result = match cli.command {
        Commands::Init { path } => commands::init(&path),
        Commands::Stats { json } => commands::stats(&inputs, json),
        Commands::Highlight { node, json } => commands::highlight(&inputs, &node, json),
        Commands::Search { query, limit, json } => commands::search(&inputs, &query, limit, json),
        Commands::Clusters { json } => commands::clusters(&inputs, json),
        Commands::Viewport { json } => commands::viewport(&inputs, json),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
