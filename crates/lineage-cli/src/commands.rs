//! CLI command implementations.

use colored::Colorize;
use lineage_core::GraphSnapshot;
use lineage_graph::{
    ClusterBuilder, Highlight, LineageConfig, LineageDirection, LineageHop, ReachabilityIndex,
    SearchIndex, ViewportPlanner, CONFIG_DIR, CONFIG_FILE,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Files every analysis command reads.
pub struct Inputs {
    pub graph: PathBuf,
    pub config: Option<PathBuf>,
}

impl Inputs {
    fn load(&self) -> Result<(GraphSnapshot, LineageConfig)> {
        let config = match &self.config {
            Some(path) => LineageConfig::load(path)?,
            None => LineageConfig::load_or_default(Path::new(CONFIG_DIR).join(CONFIG_FILE))?,
        };

        let snapshot = GraphSnapshot::load(&self.graph)?;
        debug!(
            "Loaded {} ({} nodes, {} edges)",
            self.graph.display(),
            snapshot.nodes().len(),
            snapshot.edges().len()
        );

        Ok((snapshot, config))
    }
}

/// Write a default config file.
pub fn init(path: &Path) -> Result<()> {
    let config_dir = path.join(CONFIG_DIR);
    let config_path = config_dir.join(CONFIG_FILE);

    if config_path.exists() {
        println!("{} Already initialized", "✓".green());
        return Ok(());
    }

    fs::create_dir_all(&config_dir)?;
    LineageConfig::default().save(&config_path)?;

    println!("{} Wrote {}", "✓".green(), config_path.display());
    Ok(())
}

/// Show snapshot statistics.
pub fn stats(inputs: &Inputs, json_output: bool) -> Result<()> {
    let (snapshot, _) = inputs.load()?;
    let stats = snapshot.stats();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Lineage Snapshot".cyan().bold());
    println!("  Nodes:     {}", stats.node_count);
    println!("    tables:  {}", stats.table_count);
    println!("    columns: {}", stats.column_count);
    println!("  Edges:     {}", stats.edge_count);
    println!("  Databases: {}", stats.database_count);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HighlightOutput<'a> {
    node: &'a str,
    upstream: Vec<LineageHop>,
    downstream: Vec<LineageHop>,
    #[serde(flatten)]
    highlight: Highlight,
}

/// Show the lineage of a node.
pub fn highlight(inputs: &Inputs, node: &str, json_output: bool) -> Result<()> {
    let (snapshot, _) = inputs.load()?;
    let index = ReachabilityIndex::build(snapshot.edges());

    let output = HighlightOutput {
        node,
        upstream: index.lineage(node, LineageDirection::Upstream),
        downstream: index.lineage(node, LineageDirection::Downstream),
        highlight: index.highlight_path(node),
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if !index.contains(node) && snapshot.get_node(node).is_none() {
        println!("{} '{}' is not in the graph", "⚠".yellow(), node);
        return Ok(());
    }

    println!("{} {}", "Lineage of".bold(), node.cyan());
    print_hops(LineageDirection::Upstream, &output.upstream);
    print_hops(LineageDirection::Downstream, &output.downstream);
    println!(
        "Highlighted: {} nodes, {} edges",
        output.highlight.highlighted_nodes.len().to_string().bold(),
        output.highlight.highlighted_edges.len().to_string().bold()
    );
    Ok(())
}

fn print_hops(direction: LineageDirection, hops: &[LineageHop]) {
    println!();
    println!("{} ({}):", direction.to_string().yellow(), hops.len());
    if hops.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for hop in hops {
        println!("  • {} {}", hop.id, format!("({} hop)", hop.depth).dimmed());
    }
    println!();
}

/// Search columns by name.
pub fn search(inputs: &Inputs, query: &str, limit: Option<usize>, json_output: bool) -> Result<()> {
    let (snapshot, mut config) = inputs.load()?;
    if let Some(limit) = limit {
        config.search.max_results = limit;
    }

    let index = SearchIndex::with_config(snapshot.nodes(), config.search);
    let results = index.search(query);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No matches found for \"{}\"", query);
        return Ok(());
    }

    println!("Found {} matches:\n", results.len());
    for result in &results {
        println!(
            "  {:.2} {} {}",
            result.match_score,
            result.name.cyan(),
            format!(
                "({}.{}, {})",
                result.parent_database, result.parent_table, result.data_type
            )
            .dimmed()
        );
    }
    Ok(())
}

/// List per-database clusters.
pub fn clusters(inputs: &Inputs, json_output: bool) -> Result<()> {
    let (snapshot, _) = inputs.load()?;
    let clusters = ClusterBuilder::new().build(snapshot.nodes());

    if json_output {
        println!("{}", serde_json::to_string_pretty(&clusters)?);
        return Ok(());
    }

    if clusters.is_empty() {
        println!("No table nodes carry a database name");
        return Ok(());
    }

    for cluster in &clusters {
        println!(
            "{} {} tables {}",
            cluster.database_name.cyan().bold(),
            cluster.member_table_ids.len(),
            cluster.tint.dimmed()
        );
        match cluster.bounds {
            Some(b) => println!(
                "  bounds: x={:.1} y={:.1} w={:.1} h={:.1}",
                b.x, b.y, b.width, b.height
            ),
            None => println!("  bounds: {}", "unpositioned".dimmed()),
        }
    }
    Ok(())
}

/// Compute the initial viewport.
pub fn viewport(inputs: &Inputs, json_output: bool) -> Result<()> {
    let (snapshot, config) = inputs.load()?;
    let viewport = ViewportPlanner::new(config.viewport).plan(snapshot.nodes());

    if json_output {
        println!("{}", serde_json::to_string_pretty(&viewport)?);
        return Ok(());
    }

    match viewport {
        Some(v) => println!(
            "zoom {:.3}, offset ({:.1}, {:.1})",
            v.zoom, v.offset_x, v.offset_y
        ),
        None => println!("{}", "No positioned nodes; viewport unchanged".dimmed()),
    }
    Ok(())
}
