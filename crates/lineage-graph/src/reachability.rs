//! Upstream and downstream reachability over lineage edges.
//!
//! The index is keyed by column-granularity ids: an edge contributes its
//! logical endpoints when it has them and its physical endpoints otherwise.
//! Queries walk the graph breadth-first with an explicit queue and visited
//! set, so cycles terminate and deep chains never touch the call stack.

use lineage_core::GraphEdge;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use tracing::debug;

/// Which way to follow edges from a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineageDirection {
    /// Producers: follow edges backward.
    Upstream,
    /// Consumers: follow edges forward.
    Downstream,
}

impl LineageDirection {
    fn as_petgraph(self) -> Direction {
        match self {
            LineageDirection::Upstream => Direction::Incoming,
            LineageDirection::Downstream => Direction::Outgoing,
        }
    }
}

impl std::fmt::Display for LineageDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineageDirection::Upstream => write!(f, "upstream"),
            LineageDirection::Downstream => write!(f, "downstream"),
        }
    }
}

/// A node reached from a start node, with its hop distance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageHop {
    pub id: String,
    /// Number of edges on the shortest path from the start node.
    pub depth: usize,
}

/// Nodes and edges to emphasize for a selected element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub highlighted_nodes: BTreeSet<String>,
    pub highlighted_edges: BTreeSet<String>,
}

impl Highlight {
    pub fn contains_node(&self, id: &str) -> bool {
        self.highlighted_nodes.contains(id)
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.highlighted_edges.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.highlighted_nodes.is_empty() && self.highlighted_edges.is_empty()
    }
}

/// An edge reduced to its lineage endpoints.
#[derive(Debug, Clone)]
struct IndexedEdge {
    id: String,
    source: String,
    target: String,
}

/// Directed adjacency over lineage endpoints.
#[derive(Debug, Default)]
pub struct ReachabilityIndex {
    /// Node weights are endpoint ids; edge weights index into `edges`.
    graph: DiGraph<String, usize>,

    /// Maps endpoint ids to graph node indexes.
    id_index: HashMap<String, NodeIndex>,

    /// Every edge in snapshot order. Parallel edges are kept.
    edges: Vec<IndexedEdge>,
}

impl ReachabilityIndex {
    /// Builds the index from a snapshot's edges in O(E).
    pub fn build(edges: &[GraphEdge]) -> Self {
        let mut index = Self::default();

        for edge in edges {
            let source = edge.lineage_source();
            let target = edge.lineage_target();

            let from = index.intern(source);
            let to = index.intern(target);
            index.graph.add_edge(from, to, index.edges.len());
            index.edges.push(IndexedEdge {
                id: edge.id.clone(),
                source: source.to_string(),
                target: target.to_string(),
            });
        }

        debug!(
            "Built reachability index: {} endpoints, {} edges",
            index.graph.node_count(),
            index.edges.len()
        );

        index
    }

    fn intern(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.id_index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.to_string());
        self.id_index.insert(id.to_string(), idx);
        idx
    }

    /// Returns the number of distinct endpoints.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of indexed edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if the id is an endpoint of any edge.
    pub fn contains(&self, id: &str) -> bool {
        self.id_index.contains_key(id)
    }

    /// Every node reachable from `id` in one direction, with hop distances.
    ///
    /// The start node is never part of the result, even when a cycle leads
    /// back to it. Results are ordered by depth, then id.
    pub fn lineage(&self, id: &str, direction: LineageDirection) -> Vec<LineageHop> {
        let Some(&start) = self.id_index.get(id) else {
            return Vec::new();
        };

        let mut result = Vec::new();
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::new();

        visited.insert(start);
        queue.push_back((start, 0));

        while let Some((current, depth)) = queue.pop_front() {
            for neighbor in self
                .graph
                .neighbors_directed(current, direction.as_petgraph())
            {
                if visited.insert(neighbor) {
                    result.push(LineageHop {
                        id: self.graph[neighbor].clone(),
                        depth: depth + 1,
                    });
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }

        result.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.id.cmp(&b.id)));
        result
    }

    /// All producers of `id`, excluding `id` itself.
    pub fn upstream_nodes(&self, id: &str) -> BTreeSet<String> {
        self.reachable(id, LineageDirection::Upstream)
    }

    /// All consumers of `id`, excluding `id` itself.
    pub fn downstream_nodes(&self, id: &str) -> BTreeSet<String> {
        self.reachable(id, LineageDirection::Downstream)
    }

    fn reachable(&self, id: &str, direction: LineageDirection) -> BTreeSet<String> {
        self.lineage(id, direction)
            .into_iter()
            .map(|hop| hop.id)
            .collect()
    }

    /// `id` together with its full upstream and downstream lineage.
    ///
    /// The id itself is always included, so selecting a node with no edges
    /// still highlights that node.
    pub fn connected_nodes(&self, id: &str) -> BTreeSet<String> {
        let mut nodes = self.upstream_nodes(id);
        nodes.extend(self.downstream_nodes(id));
        nodes.insert(id.to_string());
        nodes
    }

    /// Edges whose both endpoints lie in `connected_nodes(id)`.
    pub fn connected_edges(&self, id: &str) -> BTreeSet<String> {
        let nodes = self.connected_nodes(id);
        self.edges_within(&nodes)
    }

    fn edges_within(&self, nodes: &BTreeSet<String>) -> BTreeSet<String> {
        self.edges
            .iter()
            .filter(|edge| nodes.contains(&edge.source) && nodes.contains(&edge.target))
            .map(|edge| edge.id.clone())
            .collect()
    }

    /// Highlight set for a selected node.
    ///
    /// An id that appears in no edge is not an empty result: it highlights
    /// just itself, with no edges.
    pub fn highlight_path(&self, id: &str) -> Highlight {
        let highlighted_nodes = self.connected_nodes(id);
        let highlighted_edges = self.edges_within(&highlighted_nodes);
        Highlight {
            highlighted_nodes,
            highlighted_edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    /// A → B → C → D, plus B → E.
    fn chain_with_branch() -> ReachabilityIndex {
        ReachabilityIndex::build(&[
            GraphEdge::new("a-b", "A", "B"),
            GraphEdge::new("b-c", "B", "C"),
            GraphEdge::new("c-d", "C", "D"),
            GraphEdge::new("b-e", "B", "E"),
        ])
    }

    #[test]
    fn test_upstream_of_chain_end() {
        let index = chain_with_branch();
        assert_eq!(index.upstream_nodes("D"), set(&["A", "B", "C"]));
    }

    #[test]
    fn test_downstream_of_chain_start() {
        let index = chain_with_branch();
        assert_eq!(index.downstream_nodes("A"), set(&["B", "C", "D", "E"]));
    }

    #[test]
    fn test_connected_nodes_of_middle() {
        let index = chain_with_branch();
        assert_eq!(index.connected_nodes("B"), set(&["A", "B", "C", "D", "E"]));
    }

    #[test]
    fn test_highlight_excludes_side_branch() {
        let index = chain_with_branch();
        let highlight = index.highlight_path("C");

        assert_eq!(highlight.highlighted_nodes, set(&["A", "B", "C", "D"]));
        assert_eq!(highlight.highlighted_edges, set(&["a-b", "b-c", "c-d"]));
        assert!(!highlight.contains_edge("b-e"));
        assert!(!highlight.contains_node("E"));
    }

    #[test]
    fn test_two_cycle_terminates() {
        let index = ReachabilityIndex::build(&[
            GraphEdge::new("ab", "A", "B"),
            GraphEdge::new("ba", "B", "A"),
        ]);

        let upstream = index.upstream_nodes("A");
        assert_eq!(upstream.len(), 1);
        assert_eq!(upstream, set(&["B"]));
        assert_eq!(index.downstream_nodes("A"), set(&["B"]));
    }

    #[test]
    fn test_longer_cycle_excludes_start() {
        // A → B → C → A
        let index = ReachabilityIndex::build(&[
            GraphEdge::new("ab", "A", "B"),
            GraphEdge::new("bc", "B", "C"),
            GraphEdge::new("ca", "C", "A"),
        ]);

        assert_eq!(index.downstream_nodes("A"), set(&["B", "C"]));
        assert_eq!(index.upstream_nodes("A"), set(&["B", "C"]));
        assert_eq!(index.connected_edges("A"), set(&["ab", "bc", "ca"]));
    }

    #[test]
    fn test_self_loop() {
        let index = ReachabilityIndex::build(&[
            GraphEdge::new("loop", "A", "A"),
            GraphEdge::new("ab", "A", "B"),
        ]);

        assert_eq!(index.downstream_nodes("A"), set(&["B"]));
        assert!(index.upstream_nodes("A").is_empty());
        assert_eq!(index.connected_edges("A"), set(&["ab", "loop"]));
    }

    #[test]
    fn test_unknown_node_is_empty() {
        let index = chain_with_branch();
        assert!(index.upstream_nodes("Z").is_empty());
        assert!(index.downstream_nodes("Z").is_empty());
        assert!(index.lineage("Z", LineageDirection::Upstream).is_empty());
        assert_eq!(index.connected_nodes("Z"), set(&["Z"]));
        assert!(index.connected_edges("Z").is_empty());
    }

    #[test]
    fn test_isolated_selection_highlights_itself() {
        let index = chain_with_branch();
        let highlight = index.highlight_path("lonely");

        assert_eq!(highlight.highlighted_nodes, set(&["lonely"]));
        assert!(highlight.highlighted_edges.is_empty());
        assert!(!highlight.is_empty());
    }

    #[test]
    fn test_empty_index() {
        let index = ReachabilityIndex::build(&[]);
        assert_eq!(index.node_count(), 0);
        assert_eq!(index.edge_count(), 0);
        assert!(index.upstream_nodes("A").is_empty());
    }

    #[test]
    fn test_logical_endpoints_drive_traversal() {
        // Both edges are drawn between table nodes but connect columns.
        let index = ReachabilityIndex::build(&[
            GraphEdge::new("e1", "orders", "daily").with_logical("orders.id", "daily.order_id"),
            GraphEdge::new("e2", "daily", "report").with_logical("daily.order_id", "report.orders"),
        ]);

        assert!(!index.contains("orders"));
        assert_eq!(
            index.downstream_nodes("orders.id"),
            set(&["daily.order_id", "report.orders"])
        );
        assert_eq!(index.upstream_nodes("report.orders").len(), 2);
    }

    #[test]
    fn test_parallel_edges_are_both_kept() {
        let index = ReachabilityIndex::build(&[
            GraphEdge::new("direct", "A", "B"),
            GraphEdge::new("agg", "A", "B")
                .with_transformation("AGGREGATION")
                .with_confidence(0.4),
        ]);

        assert_eq!(index.edge_count(), 2);
        assert_eq!(index.downstream_nodes("A"), set(&["B"]));
        assert_eq!(index.connected_edges("A"), set(&["agg", "direct"]));
    }

    #[test]
    fn test_lineage_depths() {
        let index = chain_with_branch();
        let hops = index.lineage("A", LineageDirection::Downstream);

        let pairs: Vec<(&str, usize)> = hops.iter().map(|h| (h.id.as_str(), h.depth)).collect();
        assert_eq!(pairs, vec![("B", 1), ("C", 2), ("E", 2), ("D", 3)]);
    }

    #[test]
    fn test_diamond_visits_once() {
        //     A
        //    / \
        //   B   C
        //    \ /
        //     D
        let index = ReachabilityIndex::build(&[
            GraphEdge::new("ab", "A", "B"),
            GraphEdge::new("ac", "A", "C"),
            GraphEdge::new("bd", "B", "D"),
            GraphEdge::new("cd", "C", "D"),
        ]);

        let hops = index.lineage("A", LineageDirection::Downstream);
        assert_eq!(hops.len(), 3);
        assert_eq!(hops.last().map(|h| h.depth), Some(2));
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let edges: Vec<GraphEdge> = (0..20_000)
            .map(|i| GraphEdge::new(format!("e{}", i), format!("n{}", i), format!("n{}", i + 1)))
            .collect();
        let index = ReachabilityIndex::build(&edges);

        assert_eq!(index.downstream_nodes("n0").len(), 20_000);
        assert_eq!(index.upstream_nodes("n20000").len(), 20_000);
    }
}
