//! Node types for the lineage graph.
//!
//! Nodes arrive from the layout layer already positioned. Each node is either
//! a table, a column, or something else the canvas draws (annotations, group
//! headers). The attribute record is tied to the kind, so a column's data type
//! or a table's database only exist where they make sense.

use serde::{Deserialize, Serialize};

/// Width used for nodes the canvas has not measured yet.
pub const DEFAULT_NODE_WIDTH: f64 = 280.0;

/// Height used for nodes the canvas has not measured yet.
pub const DEFAULT_NODE_HEIGHT: f64 = 100.0;

/// A point in graph (world) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rendered dimensions of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: DEFAULT_NODE_WIDTH,
            height: DEFAULT_NODE_HEIGHT,
        }
    }
}

/// The kind of visual node, without its attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    TableNode,
    ColumnNode,
    Other,
}

impl NodeKind {
    /// Returns the wire name used by the canvas.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::TableNode => "tableNode",
            NodeKind::ColumnNode => "columnNode",
            NodeKind::Other => "other",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attributes carried by a table node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableAttributes {
    pub database_name: Option<String>,
    pub table_name: Option<String>,
}

/// Attributes carried by a column node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnAttributes {
    pub database_name: Option<String>,
    pub table_name: Option<String>,
    pub column_name: Option<String>,
    pub data_type: Option<String>,
}

/// Kind-specific attributes of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Table(TableAttributes),
    Column(ColumnAttributes),
    Other,
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Table(_) => NodeKind::TableNode,
            NodeData::Column(_) => NodeKind::ColumnNode,
            NodeData::Other => NodeKind::Other,
        }
    }
}

/// A node in a lineage graph snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireNode", into = "WireNode")]
pub struct GraphNode {
    /// Unique identifier within a snapshot.
    pub id: String,
    /// Kind and attributes.
    pub data: NodeData,
    /// Layout-supplied position, if the node has been placed.
    pub position: Option<Position>,
    /// Size measured by the canvas, if any.
    pub measured_size: Option<Size>,
}

impl GraphNode {
    /// Creates an unpositioned table node.
    pub fn table(
        id: impl Into<String>,
        database_name: impl Into<String>,
        table_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            data: NodeData::Table(TableAttributes {
                database_name: Some(database_name.into()),
                table_name: Some(table_name.into()),
            }),
            position: None,
            measured_size: None,
        }
    }

    /// Creates an unpositioned column node.
    pub fn column(
        id: impl Into<String>,
        database_name: impl Into<String>,
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            data: NodeData::Column(ColumnAttributes {
                database_name: Some(database_name.into()),
                table_name: Some(table_name.into()),
                column_name: Some(column_name.into()),
                data_type: Some(data_type.into()),
            }),
            position: None,
            measured_size: None,
        }
    }

    /// Creates a node of some other kind with no attributes.
    pub fn other(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: NodeData::Other,
            position: None,
            measured_size: None,
        }
    }

    /// Places the node at the given coordinates.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position::new(x, y));
        self
    }

    /// Records the measured size of the node.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.measured_size = Some(Size::new(width, height));
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    /// Measured size, or the default 280x100 when unmeasured.
    pub fn size(&self) -> Size {
        self.measured_size.unwrap_or_default()
    }

    /// The owning database, for kinds that have one.
    pub fn database_name(&self) -> Option<&str> {
        match &self.data {
            NodeData::Table(attrs) => attrs.database_name.as_deref(),
            NodeData::Column(attrs) => attrs.database_name.as_deref(),
            NodeData::Other => None,
        }
    }

    /// The owning (or own) table name, for kinds that have one.
    pub fn table_name(&self) -> Option<&str> {
        match &self.data {
            NodeData::Table(attrs) => attrs.table_name.as_deref(),
            NodeData::Column(attrs) => attrs.table_name.as_deref(),
            NodeData::Other => None,
        }
    }
}

/// Flat on-the-wire shape of a node, as produced by the canvas front end.
///
/// `type` selects the variant; the `data` bag holds every attribute any kind
/// may carry, and only the ones relevant to the kind are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireNode {
    id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    measured: Option<Size>,
    #[serde(default)]
    data: WireAttributes,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    database_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    table_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    column_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_type: Option<String>,
}

impl From<WireNode> for GraphNode {
    fn from(wire: WireNode) -> Self {
        let attrs = wire.data;
        let data = match wire.kind.as_deref() {
            Some("tableNode") => NodeData::Table(TableAttributes {
                database_name: attrs.database_name,
                table_name: attrs.table_name,
            }),
            Some("columnNode") => NodeData::Column(ColumnAttributes {
                database_name: attrs.database_name,
                table_name: attrs.table_name,
                column_name: attrs.column_name,
                data_type: attrs.data_type,
            }),
            _ => NodeData::Other,
        };

        Self {
            id: wire.id,
            data,
            position: wire.position,
            measured_size: wire.measured,
        }
    }
}

impl From<GraphNode> for WireNode {
    fn from(node: GraphNode) -> Self {
        let (kind, data) = match node.data {
            NodeData::Table(attrs) => (
                Some(NodeKind::TableNode.as_str().to_string()),
                WireAttributes {
                    database_name: attrs.database_name,
                    table_name: attrs.table_name,
                    ..Default::default()
                },
            ),
            NodeData::Column(attrs) => (
                Some(NodeKind::ColumnNode.as_str().to_string()),
                WireAttributes {
                    database_name: attrs.database_name,
                    table_name: attrs.table_name,
                    column_name: attrs.column_name,
                    data_type: attrs.data_type,
                },
            ),
            NodeData::Other => (None, WireAttributes::default()),
        };

        Self {
            id: node.id,
            kind,
            position: node.position,
            measured: node.measured_size,
            data,
        }
    }
}
