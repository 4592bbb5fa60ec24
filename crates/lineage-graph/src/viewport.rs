//! Initial camera placement for the lineage canvas.
//!
//! Small graphs open at full size; large graphs open zoomed out so more of
//! them fits on screen, with a linear ramp in between. The offset pins the
//! top-left-most node near the top-left corner of the viewport.

use lineage_core::GraphNode;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Thresholds and zoom levels for viewport planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportOptions {
    /// At or below this many nodes, use `small_graph_zoom`.
    pub small_graph_threshold: usize,
    /// At or above this many nodes, use `large_graph_zoom`.
    pub large_graph_threshold: usize,
    pub small_graph_zoom: f64,
    pub large_graph_zoom: f64,
    /// Screen-space gap between the viewport corner and the nearest node.
    pub padding: f64,
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self {
            small_graph_threshold: 20,
            large_graph_threshold: 50,
            small_graph_zoom: 1.0,
            large_graph_zoom: 0.5,
            padding: 20.0,
        }
    }
}

/// A camera transform: screen = world * zoom + offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub zoom: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Chooses the initial viewport for a node set.
#[derive(Debug, Clone, Default)]
pub struct ViewportPlanner {
    options: ViewportOptions,
}

impl ViewportPlanner {
    pub fn new(options: ViewportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ViewportOptions {
        &self.options
    }

    /// Zoom level for a graph of `node_count` nodes.
    pub fn zoom_for(&self, node_count: usize) -> f64 {
        let opts = &self.options;

        if node_count <= opts.small_graph_threshold {
            opts.small_graph_zoom
        } else if node_count >= opts.large_graph_threshold {
            opts.large_graph_zoom
        } else {
            let span = (opts.large_graph_threshold - opts.small_graph_threshold) as f64;
            let ratio = (node_count - opts.small_graph_threshold) as f64 / span;
            opts.small_graph_zoom - ratio * (opts.small_graph_zoom - opts.large_graph_zoom)
        }
    }

    /// Plans a viewport, or `None` when there is nothing to frame.
    ///
    /// Zoom depends on the total node count. The offset only considers nodes
    /// that have a position; if none do, no viewport is produced.
    pub fn plan(&self, nodes: &[GraphNode]) -> Option<Viewport> {
        if nodes.is_empty() {
            return None;
        }

        let (min_x, min_y) = nodes
            .iter()
            .filter_map(|node| node.position)
            .fold(None, |acc: Option<(f64, f64)>, pos| match acc {
                Some((x, y)) => Some((x.min(pos.x), y.min(pos.y))),
                None => Some((pos.x, pos.y)),
            })?;

        let zoom = self.zoom_for(nodes.len());
        let viewport = Viewport {
            zoom,
            offset_x: -min_x * zoom + self.options.padding,
            offset_y: -min_y * zoom + self.options.padding,
        };

        debug!(
            "Planned viewport for {} nodes: zoom {:.3}, offset ({:.1}, {:.1})",
            nodes.len(),
            viewport.zoom,
            viewport.offset_x,
            viewport.offset_y
        );
        Some(viewport)
    }
}
