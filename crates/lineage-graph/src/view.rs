//! Snapshot-keyed caching of derived lineage structures.
//!
//! Derived structures are rebuilt in full when the snapshot is replaced and
//! reused otherwise. Selection and query changes only run the cheap query
//! step against the cached structures.

use crate::cluster::{Cluster, ClusterBuilder};
use crate::config::LineageConfig;
use crate::reachability::{Highlight, ReachabilityIndex};
use crate::search::{SearchIndex, SearchResult};
use crate::state::LineageSelection;
use crate::viewport::{Viewport, ViewportOptions, ViewportPlanner};
use lineage_core::GraphSnapshot;
use std::sync::Arc;
use tracing::debug;

/// A value derived from one snapshot, identified by the snapshot's version.
#[derive(Debug, Clone)]
pub struct Memo<T> {
    version: Option<u64>,
    value: Option<T>,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self {
            version: None,
            value: None,
        }
    }

    /// Returns the cached value for `snapshot`, building it if the cache is
    /// empty or holds a value for a different snapshot.
    pub fn get_or_build<F>(&mut self, snapshot: &GraphSnapshot, build: F) -> &T
    where
        F: FnOnce(&GraphSnapshot) -> T,
    {
        let version = snapshot.version();
        if self.version != Some(version) {
            self.value = None;
            self.version = Some(version);
        }
        self.value.get_or_insert_with(|| build(snapshot))
    }

    /// Cached value, if it was built for `snapshot`.
    pub fn get(&self, snapshot: &GraphSnapshot) -> Option<&T> {
        if self.version == Some(snapshot.version()) {
            self.value.as_ref()
        } else {
            None
        }
    }

    /// Drops the cached value.
    pub fn invalidate(&mut self) {
        self.version = None;
        self.value = None;
    }
}

/// All derived lineage state for the current snapshot.
#[derive(Debug)]
pub struct LineageView {
    snapshot: Arc<GraphSnapshot>,
    reachability: Memo<ReachabilityIndex>,
    clusters: Memo<Vec<Cluster>>,
    viewport: Memo<Option<Viewport>>,
    cluster_builder: ClusterBuilder,
    planner: ViewportPlanner,
    search: SearchIndex,
    selection: LineageSelection,
}

impl LineageView {
    pub fn new(snapshot: Arc<GraphSnapshot>, config: LineageConfig) -> Self {
        let search = SearchIndex::with_config(snapshot.nodes(), config.search);
        Self {
            snapshot,
            reachability: Memo::new(),
            clusters: Memo::new(),
            viewport: Memo::new(),
            cluster_builder: ClusterBuilder::new(),
            planner: ViewportPlanner::new(config.viewport),
            search,
            selection: LineageSelection::new(),
        }
    }

    pub fn snapshot(&self) -> &GraphSnapshot {
        &self.snapshot
    }

    /// Switches to `snapshot`. Returns false if it is the current snapshot.
    ///
    /// The search query is kept and evaluated against the new columns. The
    /// selection is kept if the selected node still exists, and cleared
    /// otherwise.
    pub fn sync(&mut self, snapshot: Arc<GraphSnapshot>) -> bool {
        if snapshot.version() == self.snapshot.version() {
            return false;
        }

        debug!(
            "Snapshot replaced: version {} -> {}",
            self.snapshot.version(),
            snapshot.version()
        );
        self.snapshot = snapshot;
        self.search.rebuild(self.snapshot.nodes());

        if let Some(id) = self.selection.selected_node().map(str::to_string) {
            let known = self.snapshot.get_node(&id).is_some() || self.reachability().contains(&id);
            if known {
                let highlight = self.reachability().highlight_path(&id);
                self.selection.set_highlight(highlight);
            } else {
                self.selection.clear();
            }
        }
        true
    }

    pub fn reachability(&mut self) -> &ReachabilityIndex {
        self.reachability
            .get_or_build(&self.snapshot, |s| ReachabilityIndex::build(s.edges()))
    }

    pub fn clusters(&mut self) -> &[Cluster] {
        let builder = &mut self.cluster_builder;
        self.clusters
            .get_or_build(&self.snapshot, |s| builder.build(s.nodes()))
    }

    /// Tint lookup that agrees with the tints of the built clusters.
    pub fn database_color(&mut self, database: &str) -> &'static str {
        self.clusters();
        self.cluster_builder.database_color(database)
    }

    /// The initial viewport, or `None` when there is nothing to frame.
    pub fn viewport(&mut self) -> Option<Viewport> {
        let planner = &self.planner;
        *self
            .viewport
            .get_or_build(&self.snapshot, |s| planner.plan(s.nodes()))
    }

    /// Changes viewport options; the next `viewport()` call replans.
    pub fn set_viewport_options(&mut self, options: ViewportOptions) {
        self.planner = ViewportPlanner::new(options);
        self.viewport.invalidate();
    }

    /// Selects a node, or clears the selection with `None`.
    pub fn select_node(&mut self, id: Option<&str>) -> &Highlight {
        match id {
            Some(id) => {
                let highlight = self.reachability().highlight_path(id);
                self.selection.select(id, highlight);
            }
            None => self.selection.clear(),
        }
        self.selection.highlight()
    }

    pub fn selection(&self) -> &LineageSelection {
        &self.selection
    }

    pub fn search(&self) -> &SearchIndex {
        &self.search
    }

    /// Mutable access for cursor navigation.
    pub fn search_mut(&mut self) -> &mut SearchIndex {
        &mut self.search
    }

    /// Runs a search query against the current snapshot's columns.
    pub fn set_query(&mut self, query: impl Into<String>) -> &[SearchResult] {
        self.search.set_query(query);
        self.search.results()
    }
}
