//! Ranked free-text search over column names.
//!
//! Every column node in a snapshot becomes one searchable entity. A query is
//! scored against the column name, the table name and the fully qualified
//! `database.table.column` name, and the best weighted field wins.
//!
//! The index also owns a cursor into the current results so a results list
//! can be navigated with the keyboard.

use lineage_core::{GraphNode, NodeData};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Score for a case-insensitive exact match.
const EXACT_SCORE: f64 = 1.0;
/// Score for a case-insensitive prefix match.
const PREFIX_SCORE: f64 = 0.8;
/// Score for a case-insensitive substring match.
const SUBSTRING_SCORE: f64 = 0.5;

/// Queries shorter than this never match, whatever the configuration says.
pub const MIN_QUERY_LEN: usize = 2;

/// Weight applied to the table-name score.
const TABLE_WEIGHT: f64 = 0.7;
/// Weight applied to the fully-qualified-name score.
const QUALIFIED_WEIGHT: f64 = 0.9;

/// Search tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    /// Queries shorter than this (in characters) match nothing. Values below
    /// `MIN_QUERY_LEN` are raised to it.
    pub min_query_len: usize,
    /// Maximum number of results kept after ranking.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: MIN_QUERY_LEN,
            max_results: 10,
        }
    }
}

/// A column extracted from the snapshot for searching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntity {
    pub id: String,
    pub name: String,
    pub table: String,
    pub database: String,
    pub data_type: String,
}

impl SearchEntity {
    /// Extracts an entity from a column node. Other kinds yield `None`.
    pub fn from_node(node: &GraphNode) -> Option<Self> {
        let NodeData::Column(attrs) = &node.data else {
            return None;
        };

        Some(Self {
            id: node.id.clone(),
            name: attrs.column_name.clone().unwrap_or_default(),
            table: attrs.table_name.clone().unwrap_or_default(),
            database: attrs.database_name.clone().unwrap_or_default(),
            data_type: attrs.data_type.clone().unwrap_or_default(),
        })
    }

    /// `database.table.column`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}.{}", self.database, self.table, self.name)
    }

    /// Composite score of this entity against a lowercased query.
    pub fn score(&self, query_lower: &str) -> f64 {
        let column = field_score(&self.name, query_lower);
        let table = field_score(&self.table, query_lower) * TABLE_WEIGHT;
        let qualified = field_score(&self.qualified_name(), query_lower) * QUALIFIED_WEIGHT;
        column.max(table).max(qualified)
    }
}

/// Scores one field against a lowercased query.
///
/// Exact beats prefix beats substring; anything else scores zero.
pub fn field_score(field: &str, query_lower: &str) -> f64 {
    let field = field.to_lowercase();
    if field == query_lower {
        EXACT_SCORE
    } else if field.starts_with(query_lower) {
        PREFIX_SCORE
    } else if field.contains(query_lower) {
        SUBSTRING_SCORE
    } else {
        0.0
    }
}

/// A ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub entity_id: String,
    pub name: String,
    pub parent_table: String,
    pub parent_database: String,
    pub data_type: String,
    /// Composite score in (0.0, 1.0].
    pub match_score: f64,
}

impl SearchResult {
    fn new(entity: &SearchEntity, match_score: f64) -> Self {
        Self {
            entity_id: entity.id.clone(),
            name: entity.name.clone(),
            parent_table: entity.table.clone(),
            parent_database: entity.database.clone(),
            data_type: entity.data_type.clone(),
            match_score,
        }
    }
}

/// Searchable columns of one snapshot, plus the current query and cursor.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    config: SearchConfig,
    entities: Vec<SearchEntity>,
    query: String,
    results: Vec<SearchResult>,
    selected_index: usize,
}

impl SearchIndex {
    /// Builds an index with the default configuration.
    pub fn build(nodes: &[GraphNode]) -> Self {
        Self::with_config(nodes, SearchConfig::default())
    }

    /// Builds an index with a custom configuration.
    pub fn with_config(nodes: &[GraphNode], config: SearchConfig) -> Self {
        let mut index = Self {
            config,
            ..Self::default()
        };
        index.rebuild(nodes);
        index
    }

    /// Replaces the entity list with one extracted from `nodes`.
    ///
    /// The current query is evaluated again against the new entities and the
    /// cursor returns to the top.
    pub fn rebuild(&mut self, nodes: &[GraphNode]) {
        self.entities = nodes.iter().filter_map(SearchEntity::from_node).collect();
        debug!("Built search index: {} columns", self.entities.len());

        self.results = self.search(&self.query);
        self.selected_index = 0;
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn entities(&self) -> &[SearchEntity] {
        &self.entities
    }

    /// Ranks entities against a query without touching the cursor.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        if query.chars().count() < self.config.min_query_len.max(MIN_QUERY_LEN) {
            return Vec::new();
        }

        let query_lower = query.to_lowercase();
        let mut results: Vec<SearchResult> = self
            .entities
            .iter()
            .filter_map(|entity| {
                let score = entity.score(&query_lower);
                (score > 0.0).then(|| SearchResult::new(entity, score))
            })
            .collect();

        // sort_by is stable, so equal scores keep extraction order.
        results.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(Ordering::Equal)
        });
        results.truncate(self.config.max_results);

        debug!("Search '{}': {} results", query, results.len());
        results
    }

    /// Sets the query, recomputes results and resets the cursor.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.results = self.search(&self.query);
        self.selected_index = 0;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// The result under the cursor, if there are any results.
    pub fn selected(&self) -> Option<&SearchResult> {
        self.results.get(self.selected_index)
    }

    /// Moves the cursor down one result. No-op on the last result.
    pub fn select_next(&mut self) {
        if self.selected_index + 1 < self.results.len() {
            self.selected_index += 1;
        }
    }

    /// Moves the cursor up one result. No-op on the first result.
    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_index = self.results.len().saturating_sub(1);
    }

    /// Moves the cursor to `index`, clamped to the result range.
    pub fn set_selected_index(&mut self, index: usize) {
        self.selected_index = index.min(self.results.len().saturating_sub(1));
    }

    /// Empties the query and results and resets the cursor.
    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
        self.selected_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<GraphNode> {
        vec![
            GraphNode::table("t-orders", "sales_db", "orders"),
            GraphNode::column("c1", "sales_db", "orders", "order_customer_id", "INTEGER"),
            GraphNode::column("c2", "sales_db", "customers", "customer_id_hash", "VARCHAR"),
            GraphNode::column("c3", "sales_db", "customers", "customer_id", "INTEGER"),
            GraphNode::column("c4", "analytics_db", "daily", "revenue", "DECIMAL"),
            GraphNode::other("note"),
        ]
    }

    fn ids(results: &[SearchResult]) -> Vec<&str> {
        results.iter().map(|r| r.entity_id.as_str()).collect()
    }

    #[test]
    fn test_extracts_only_columns() {
        let index = SearchIndex::build(&corpus());
        assert_eq!(index.entities().len(), 4);
        assert!(index.entities().iter().all(|e| e.id.starts_with('c')));
    }

    #[test]
    fn test_exact_match_ranks_first() {
        let mut index = SearchIndex::build(&corpus());
        index.set_query("customer_id");

        let results = index.results();
        assert_eq!(ids(results), vec!["c3", "c2", "c1"]);
        assert_eq!(results[0].match_score, 1.0);
        assert_eq!(results[1].match_score, 0.8);
        assert_eq!(results[2].match_score, 0.5);
        assert_eq!(results[0].parent_table, "customers");
        assert_eq!(results[0].parent_database, "sales_db");
        assert_eq!(results[0].data_type, "INTEGER");
    }

    #[test]
    fn test_case_insensitive() {
        let mut index = SearchIndex::build(&corpus());
        index.set_query("REVENUE");
        assert_eq!(ids(index.results()), vec!["c4"]);
        assert_eq!(index.results()[0].match_score, 1.0);
    }

    #[test]
    fn test_single_character_query_is_empty() {
        let mut index = SearchIndex::build(&corpus());
        index.set_query("c");
        assert!(index.results().is_empty());

        index.set_query("r");
        assert!(index.results().is_empty());
    }

    #[test]
    fn test_configured_minimum_cannot_go_below_two() {
        for min_query_len in [0, 1] {
            let config = SearchConfig {
                min_query_len,
                ..SearchConfig::default()
            };
            let mut index = SearchIndex::with_config(&corpus(), config);

            index.set_query("a");
            assert!(index.results().is_empty());

            index.set_query("");
            assert!(index.results().is_empty());

            index.set_query("revenue");
            assert_eq!(ids(index.results()), vec!["c4"]);
        }
    }

    #[test]
    fn test_configured_minimum_can_be_raised() {
        let config = SearchConfig {
            min_query_len: 4,
            ..SearchConfig::default()
        };
        let mut index = SearchIndex::with_config(&corpus(), config);

        index.set_query("rev");
        assert!(index.results().is_empty());

        index.set_query("reve");
        assert_eq!(ids(index.results()), vec!["c4"]);
    }

    #[test]
    fn test_no_match() {
        let mut index = SearchIndex::build(&corpus());
        index.set_query("zzzzz");
        assert!(index.results().is_empty());
        assert!(index.selected().is_none());
    }

    #[test]
    fn test_table_name_is_weighted() {
        let mut index = SearchIndex::build(&corpus());
        index.set_query("daily");

        // Exact table match (1.0 * 0.7) beats the substring match on the
        // qualified name (0.5 * 0.9).
        assert_eq!(ids(index.results()), vec!["c4"]);
        assert!((index.results()[0].match_score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_qualified_name_match() {
        let mut index = SearchIndex::build(&corpus());
        index.set_query("analytics_db.daily.revenue");
        assert_eq!(ids(index.results()), vec!["c4"]);
        assert!((index.results()[0].match_score - 0.9).abs() < 1e-9);

        index.set_query("analytics_db.da");
        assert!((index.results()[0].match_score - 0.72).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_extraction_order() {
        let nodes = vec![
            GraphNode::column("z", "db", "t", "amount_total", "INT"),
            GraphNode::column("a", "db", "t", "amount_net", "INT"),
            GraphNode::column("m", "db", "t", "amount_tax", "INT"),
        ];
        let mut index = SearchIndex::build(&nodes);
        index.set_query("amount");
        assert_eq!(ids(index.results()), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_results_are_truncated() {
        let nodes: Vec<GraphNode> = (0..25)
            .map(|i| GraphNode::column(format!("c{}", i), "db", "t", format!("col_{}", i), "INT"))
            .collect();

        let mut index = SearchIndex::build(&nodes);
        index.set_query("col_");
        assert_eq!(index.results().len(), 10);

        let config = SearchConfig {
            max_results: 3,
            ..SearchConfig::default()
        };
        let mut small = SearchIndex::with_config(&nodes, config);
        small.set_query("col_");
        assert_eq!(ids(small.results()), vec!["c0", "c1", "c2"]);
    }

    #[test]
    fn test_missing_attributes_default_to_empty() {
        let mut node = GraphNode::column("c1", "db", "t", "name", "INT");
        if let NodeData::Column(attrs) = &mut node.data {
            attrs.database_name = None;
            attrs.data_type = None;
        }

        let entity = SearchEntity::from_node(&node).unwrap();
        assert_eq!(entity.database, "");
        assert_eq!(entity.data_type, "");
        assert_eq!(entity.qualified_name(), ".t.name");
    }

    #[test]
    fn test_cursor_clamps_at_boundaries() {
        let mut index = SearchIndex::build(&corpus());
        index.set_query("customer");
        assert_eq!(index.results().len(), 3);
        assert_eq!(index.selected_index(), 0);

        index.select_previous();
        assert_eq!(index.selected_index(), 0);

        index.select_next();
        index.select_next();
        assert_eq!(index.selected_index(), 2);

        index.select_next();
        assert_eq!(index.selected_index(), 2);

        index.select_first();
        assert_eq!(index.selected_index(), 0);

        index.select_last();
        assert_eq!(index.selected_index(), 2);

        index.set_selected_index(99);
        assert_eq!(index.selected_index(), 2);

        index.set_selected_index(1);
        assert_eq!(index.selected().map(|r| r.entity_id.as_str()), Some("c3"));
    }

    #[test]
    fn test_cursor_on_empty_results() {
        let mut index = SearchIndex::build(&corpus());
        index.select_next();
        index.select_last();
        index.set_selected_index(4);
        assert_eq!(index.selected_index(), 0);
    }

    #[test]
    fn test_changing_query_resets_cursor() {
        let mut index = SearchIndex::build(&corpus());
        index.set_query("customer");
        index.select_next();
        assert_eq!(index.selected_index(), 1);

        index.set_query("customer_id");
        assert_eq!(index.selected_index(), 0);
    }

    #[test]
    fn test_clear() {
        let mut index = SearchIndex::build(&corpus());
        index.set_query("customer");
        index.select_next();
        index.clear();

        assert_eq!(index.query(), "");
        assert!(index.results().is_empty());
        assert_eq!(index.selected_index(), 0);
    }

    #[test]
    fn test_rebuild_reapplies_query() {
        let mut index = SearchIndex::build(&corpus());
        index.set_query("revenue");
        index.rebuild(&[GraphNode::column("n1", "db", "t", "net_revenue", "DECIMAL")]);

        assert_eq!(index.query(), "revenue");
        assert_eq!(ids(index.results()), vec!["n1"]);
        assert_eq!(index.results()[0].match_score, 0.5);
    }

    #[test]
    fn test_search_is_idempotent() {
        let index = SearchIndex::build(&corpus());
        assert_eq!(index.search("customer"), index.search("customer"));

        let rebuilt = SearchIndex::build(&corpus());
        assert_eq!(index.search("customer"), rebuilt.search("customer"));
    }
}
