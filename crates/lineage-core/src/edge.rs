//! Edge types for the lineage graph.
//!
//! An edge is drawn between two visual nodes (its physical endpoints) but may
//! stand for a relationship between two columns inside them (its logical
//! endpoints). Lineage semantics always use the logical endpoints when they
//! are present.

use serde::{Deserialize, Serialize};

/// Transformation tag used when the producer does not supply one.
pub const DEFAULT_TRANSFORMATION: &str = "DIRECT";

fn default_transformation() -> String {
    DEFAULT_TRANSFORMATION.to_string()
}

/// A directed column-to-column transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    /// Unique identifier within a snapshot.
    pub id: String,

    /// Visual node the edge is drawn from.
    #[serde(rename = "source")]
    pub physical_source: String,

    /// Visual node the edge is drawn to.
    #[serde(rename = "target")]
    pub physical_target: String,

    /// Column the edge logically starts at, overriding `physical_source`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_source_column_id: Option<String>,

    /// Column the edge logically ends at, overriding `physical_target`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_target_column_id: Option<String>,

    /// Kind of transformation, e.g. DIRECT or AGGREGATION.
    #[serde(default = "default_transformation")]
    pub transformation_type: String,

    /// Confidence in the relationship, between 0.0 and 1.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
}

impl GraphEdge {
    /// Creates a DIRECT edge between two physical nodes.
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            physical_source: source.into(),
            physical_target: target.into(),
            logical_source_column_id: None,
            logical_target_column_id: None,
            transformation_type: default_transformation(),
            confidence_score: None,
        }
    }

    /// Sets the logical column endpoints.
    pub fn with_logical(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.logical_source_column_id = Some(source.into());
        self.logical_target_column_id = Some(target.into());
        self
    }

    /// Sets the transformation tag.
    pub fn with_transformation(mut self, kind: impl Into<String>) -> Self {
        self.transformation_type = kind.into();
        self
    }

    /// Sets the confidence score, clamped to [0.0, 1.0].
    pub fn with_confidence(mut self, score: f64) -> Self {
        self.confidence_score = Some(score.clamp(0.0, 1.0));
        self
    }

    /// The endpoint lineage starts from: logical if present, else physical.
    pub fn lineage_source(&self) -> &str {
        self.logical_source_column_id
            .as_deref()
            .unwrap_or(&self.physical_source)
    }

    /// The endpoint lineage ends at: logical if present, else physical.
    pub fn lineage_target(&self) -> &str {
        self.logical_target_column_id
            .as_deref()
            .unwrap_or(&self.physical_target)
    }
}
