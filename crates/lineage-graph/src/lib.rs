//! Lineage Graph - Analytics over a lineage snapshot
//!
//! This crate computes everything the lineage canvas derives from a
//! snapshot: which nodes and edges to highlight for a selection, ranked
//! column search with a keyboard cursor, per-database background clusters,
//! and the initial camera.
//!
//! # Architecture
//!
//! Each component reads the immutable snapshot and owns its output:
//! - `ReachabilityIndex` - petgraph adjacency over lineage endpoints, with
//!   iterative upstream/downstream traversal
//! - `SearchIndex` - scored matching on column, table and qualified names
//! - `ClusterBuilder` - table grouping, tints and bounding boxes
//! - `ViewportPlanner` - zoom and offset from node count and positions
//!
//! `LineageView` caches all of them per snapshot version.
//!
//! # Example
//!
//! ```
//! use lineage_core::{GraphEdge, GraphSnapshot};
//! use lineage_graph::ReachabilityIndex;
//!
//! let snapshot = GraphSnapshot::new(
//!     Vec::new(),
//!     vec![GraphEdge::new("e1", "a", "b"), GraphEdge::new("e2", "b", "c")],
//! );
//!
//! let index = ReachabilityIndex::build(snapshot.edges());
//! assert_eq!(index.upstream_nodes("c").len(), 2);
//! ```

mod cluster;
mod config;
mod reachability;
mod search;
mod state;
mod view;
mod viewport;

pub use cluster::{compute_bounds, Bounds, Cluster, ClusterBuilder, CLUSTER_ID_PREFIX};
pub use config::{LineageConfig, CONFIG_DIR, CONFIG_FILE};
pub use reachability::{Highlight, LineageDirection, LineageHop, ReachabilityIndex};
pub use search::{
    field_score, SearchConfig, SearchEntity, SearchIndex, SearchResult, MIN_QUERY_LEN,
};
pub use state::{DetailTab, LineageSelection, UiState};
pub use view::{LineageView, Memo};
pub use viewport::{Viewport, ViewportOptions, ViewportPlanner};
