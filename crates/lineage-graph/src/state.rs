//! View state containers.
//!
//! Chrome state (panels, tabs) and lineage selection state are separate
//! values owned by whoever drives the view. Neither is global, and changing
//! one never touches the other.

use crate::reachability::Highlight;
use serde::{Deserialize, Serialize};

/// Tabs of the detail panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailTab {
    #[default]
    Overview,
    Columns,
    Lineage,
    Transformations,
}

/// Application chrome state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub sidebar_open: bool,
    pub search_open: bool,
    pub active_tab: DetailTab,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            search_open: false,
            active_tab: DetailTab::Overview,
        }
    }
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn open_search(&mut self) {
        self.search_open = true;
    }

    pub fn close_search(&mut self) {
        self.search_open = false;
    }

    pub fn set_active_tab(&mut self, tab: DetailTab) {
        self.active_tab = tab;
    }
}

/// The selected lineage element and what it highlights.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageSelection {
    selected_node: Option<String>,
    highlight: Highlight,
}

impl LineageSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_node(&self) -> Option<&str> {
        self.selected_node.as_deref()
    }

    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }

    /// Selects a node together with its precomputed highlight.
    pub fn select(&mut self, id: impl Into<String>, highlight: Highlight) {
        self.selected_node = Some(id.into());
        self.highlight = highlight;
    }

    /// Replaces the highlight, keeping the selected node.
    pub fn set_highlight(&mut self, highlight: Highlight) {
        self.highlight = highlight;
    }

    pub fn clear(&mut self) {
        self.selected_node = None;
        self.highlight = Highlight::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_defaults() {
        let ui = UiState::new();
        assert!(ui.sidebar_open);
        assert!(!ui.search_open);
        assert_eq!(ui.active_tab, DetailTab::Overview);
    }

    #[test]
    fn test_states_are_independent() {
        let mut ui = UiState::new();
        let mut selection = LineageSelection::new();

        let mut highlight = Highlight::default();
        highlight.highlighted_nodes.insert("A".into());
        selection.select("A", highlight);

        assert_eq!(ui, UiState::default());

        ui.toggle_sidebar();
        ui.open_search();
        ui.set_active_tab(DetailTab::Lineage);

        assert_eq!(selection.selected_node(), Some("A"));
        assert!(selection.highlight().contains_node("A"));

        selection.clear();
        assert!(!ui.sidebar_open);
        assert!(ui.search_open);
        assert_eq!(ui.active_tab, DetailTab::Lineage);
    }

    #[test]
    fn test_separate_instances_do_not_share_state() {
        let mut a = LineageSelection::new();
        let b = LineageSelection::new();
        a.select("X", Highlight::default());

        assert_eq!(a.selected_node(), Some("X"));
        assert_eq!(b.selected_node(), None);
    }

    #[test]
    fn test_clear_selection() {
        let mut selection = LineageSelection::new();
        let mut highlight = Highlight::default();
        highlight.highlighted_edges.insert("e1".into());
        selection.select("A", highlight);

        selection.clear();
        assert!(selection.selected_node().is_none());
        assert!(selection.highlight().is_empty());
    }
}
