//! Per-database clusters of table nodes.
//!
//! Table nodes that name their database are grouped by it, in the order
//! databases are first encountered. Each group gets a background tint and a
//! bounding box around its positioned members.

use lineage_core::{GraphNode, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ptr;
use tracing::debug;

/// Prefix of every cluster id.
pub const CLUSTER_ID_PREFIX: &str = "cluster-";

/// Tints for well-known database engines, matched case-insensitively.
const KNOWN_TINTS: &[(&str, &str)] = &[
    ("snowflake", "rgba(41, 181, 232, 0.08)"),
    ("postgres", "rgba(51, 103, 145, 0.08)"),
    ("postgresql", "rgba(51, 103, 145, 0.08)"),
    ("mysql", "rgba(0, 117, 143, 0.08)"),
    ("bigquery", "rgba(66, 133, 244, 0.08)"),
    ("redshift", "rgba(140, 79, 255, 0.08)"),
    ("databricks", "rgba(255, 54, 33, 0.08)"),
    ("oracle", "rgba(199, 70, 52, 0.08)"),
    ("sqlserver", "rgba(165, 29, 45, 0.08)"),
];

/// Tints handed out to other databases, cycling when exhausted.
const FALLBACK_TINTS: &[&str] = &[
    "rgba(31, 119, 180, 0.08)",
    "rgba(255, 127, 14, 0.08)",
    "rgba(44, 160, 44, 0.08)",
    "rgba(214, 39, 40, 0.08)",
    "rgba(148, 103, 189, 0.08)",
    "rgba(140, 86, 75, 0.08)",
    "rgba(227, 119, 194, 0.08)",
    "rgba(188, 189, 34, 0.08)",
    "rgba(23, 190, 207, 0.08)",
];

/// Axis-aligned bounding box in graph coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A visual group of the table nodes of one database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// `cluster-<databaseName>`; identical across rebuilds.
    pub id: String,
    pub database_name: String,
    pub tint: String,
    /// Member table ids in snapshot order, without repeats.
    pub member_table_ids: Vec<String>,
    /// `None` when no member has a position.
    pub bounds: Option<Bounds>,
}

/// Groups table nodes into clusters and assigns tints.
///
/// The builder remembers the order in which unknown databases were first
/// seen, so a database keeps its tint across rebuilds for the lifetime of
/// the builder.
#[derive(Debug, Clone, Default)]
pub struct ClusterBuilder {
    /// Unknown database names in first-seen order.
    first_seen: Vec<String>,
}

impl ClusterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds clusters for every database that owns at least one table node.
    pub fn build(&mut self, nodes: &[GraphNode]) -> Vec<Cluster> {
        // Later duplicates shadow earlier ones.
        let mut by_id: HashMap<&str, &GraphNode> = HashMap::with_capacity(nodes.len());
        for node in nodes {
            by_id.insert(node.id.as_str(), node);
        }

        let mut order: Vec<&str> = Vec::new();
        let mut members: HashMap<&str, Vec<&GraphNode>> = HashMap::new();

        for node in nodes {
            if node.kind() != NodeKind::TableNode {
                continue;
            }
            if !by_id
                .get(node.id.as_str())
                .is_some_and(|winner| ptr::eq(*winner, node))
            {
                continue;
            }
            let Some(database) = node.database_name().filter(|name| !name.is_empty()) else {
                continue;
            };

            members
                .entry(database)
                .or_insert_with(|| {
                    order.push(database);
                    Vec::new()
                })
                .push(node);
        }

        let mut clusters = Vec::with_capacity(order.len());
        for database in order {
            let group = members.get(database).map(Vec::as_slice).unwrap_or_default();
            clusters.push(Cluster {
                id: format!("{}{}", CLUSTER_ID_PREFIX, database),
                database_name: database.to_string(),
                tint: self.database_color(database).to_string(),
                member_table_ids: group.iter().map(|node| node.id.clone()).collect(),
                bounds: compute_bounds(group),
            });
        }

        debug!("Built {} clusters from {} nodes", clusters.len(), nodes.len());
        clusters
    }

    /// Tint for a database name.
    ///
    /// Well-known engines get their own color. Any other database takes the
    /// next fallback slot the first time this builder sees it, whether through
    /// a lookup or a build, and keeps that slot afterwards.
    pub fn database_color(&mut self, database: &str) -> &'static str {
        if let Some(tint) = known_tint(database) {
            return tint;
        }

        let slot = match self.first_seen.iter().position(|seen| seen == database) {
            Some(slot) => slot,
            None => {
                self.first_seen.push(database.to_string());
                self.first_seen.len() - 1
            }
        };
        FALLBACK_TINTS[slot % FALLBACK_TINTS.len()]
    }
}

fn known_tint(database: &str) -> Option<&'static str> {
    let lower = database.to_lowercase();
    KNOWN_TINTS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, tint)| *tint)
}

/// Bounding box of the positioned nodes, using default sizes when unmeasured.
pub fn compute_bounds(nodes: &[&GraphNode]) -> Option<Bounds> {
    let mut positioned = nodes
        .iter()
        .filter_map(|node| node.position.map(|pos| (pos, node.size())))
        .peekable();
    positioned.peek()?;

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);

    for (pos, size) in positioned {
        min_x = min_x.min(pos.x);
        min_y = min_y.min(pos.y);
        max_x = max_x.max(pos.x + size.width);
        max_y = max_y.max(pos.y + size.height);
    }

    Some(Bounds {
        x: min_x,
        y: min_y,
        width: max_x - min_x,
        height: max_y - min_y,
    })
}
