//! Lineage Core - Graph model for column-level lineage
//!
//! This crate defines the snapshot every lineage computation reads: table and
//! column nodes positioned by an external layout, and the directed
//! transformations between them.
//!
//! Snapshots are immutable. A new fetch produces a new snapshot with a new
//! version, and everything derived from the old one is thrown away.
//!
//! # Example
//!
//! ```
//! use lineage_core::{GraphEdge, GraphNode, GraphSnapshot};
//!
//! let snapshot = GraphSnapshot::new(
//!     vec![
//!         GraphNode::table("orders", "sales_db", "orders").at(0.0, 0.0),
//!         GraphNode::table("daily", "analytics_db", "daily_orders").at(400.0, 0.0),
//!     ],
//!     vec![GraphEdge::new("e1", "orders", "daily").with_transformation("AGGREGATION")],
//! );
//!
//! assert_eq!(snapshot.stats().table_count, 2);
//! ```

mod edge;
mod error;
mod node;
mod snapshot;

pub use edge::{GraphEdge, DEFAULT_TRANSFORMATION};
pub use error::{LineageError, Result};
pub use node::{
    ColumnAttributes, GraphNode, NodeData, NodeKind, Position, Size, TableAttributes,
    DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH,
};
pub use snapshot::{GraphSnapshot, GraphStats};
