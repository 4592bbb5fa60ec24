//! Immutable graph snapshots.
//!
//! A snapshot is the unit of replacement: the fetch layer hands over a whole
//! new node and edge list, never a patch. Every snapshot gets a fresh version
//! number on construction, and derived structures key their caches on it.

use crate::edge::GraphEdge;
use crate::error::{LineageError, Result};
use crate::node::{GraphNode, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

fn next_version() -> u64 {
    NEXT_VERSION.fetch_add(1, Ordering::Relaxed)
}

/// A read-only set of nodes and edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "WireSnapshot", into = "WireSnapshot")]
pub struct GraphSnapshot {
    version: u64,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

impl Default for GraphSnapshot {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl GraphSnapshot {
    /// Creates a snapshot with a new identity.
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self {
            version: next_version(),
            nodes,
            edges,
        }
    }

    /// Parses a snapshot from a JSON document with `nodes` and `edges` arrays.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| LineageError::io(path, e))?;
        Self::from_json(&json)
    }

    /// Identity of this snapshot. Two snapshots never share a version.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Builds an id lookup table.
    ///
    /// Ids are expected to be unique. When they are not, the later node
    /// shadows the earlier one.
    pub fn node_index(&self) -> HashMap<&str, &GraphNode> {
        let mut index = HashMap::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if index.insert(node.id.as_str(), node).is_some() {
                warn!("Duplicate node id in snapshot: {}", node.id);
            }
        }
        index
    }

    /// Looks up a node by id, with the same shadowing rule as `node_index`.
    pub fn get_node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().rev().find(|node| node.id == id)
    }

    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        let count_kind = |kind: NodeKind| self.nodes.iter().filter(|n| n.kind() == kind).count();
        let databases: HashSet<&str> = self
            .nodes
            .iter()
            .filter_map(|n| n.database_name())
            .filter(|name| !name.is_empty())
            .collect();

        GraphStats {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            table_count: count_kind(NodeKind::TableNode),
            column_count: count_kind(NodeKind::ColumnNode),
            database_count: databases.len(),
        }
    }
}

/// Graph statistics for summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub table_count: usize,
    pub column_count: usize,
    pub database_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WireSnapshot {
    #[serde(default)]
    nodes: Vec<GraphNode>,
    #[serde(default)]
    edges: Vec<GraphEdge>,
}

impl From<WireSnapshot> for GraphSnapshot {
    fn from(wire: WireSnapshot) -> Self {
        Self::new(wire.nodes, wire.edges)
    }
}

impl From<GraphSnapshot> for WireSnapshot {
    fn from(snapshot: GraphSnapshot) -> Self {
        Self {
            nodes: snapshot.nodes,
            edges: snapshot.edges,
        }
    }
}
