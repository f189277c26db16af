//! Per-node collapse state
//!
//! Expanded/collapsed flags live in one map owned by the container rather
//! than inside each rendered node. Renderers read it; only [`CollapseState::toggle`]
//! and [`CollapseState::reset`] change it.

use std::collections::HashMap;

/// Nodes at this depth or deeper start collapsed.
pub const AUTO_COLLAPSE_DEPTH: usize = 5;

/// Map from node path to an explicit collapsed flag.
///
/// Paths without an entry use the depth default, so a freshly adopted tree
/// needs no initialization pass.
#[derive(Debug, Clone, Default)]
pub struct CollapseState {
    overrides: HashMap<String, bool>,
}

impl CollapseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial state for a node that has never been toggled.
    pub fn default_for_depth(depth: usize) -> bool {
        depth >= AUTO_COLLAPSE_DEPTH
    }

    /// Effective collapsed flag for the node at `path`.
    pub fn is_collapsed(&self, path: &str, depth: usize) -> bool {
        self.overrides
            .get(path)
            .copied()
            .unwrap_or_else(|| Self::default_for_depth(depth))
    }

    /// Flip the node's flag and return the new value.
    ///
    /// Collapsing unmounts the subtree, so overrides below `path` are
    /// dropped and re-expanded descendants come back at their depth default.
    pub fn toggle(&mut self, path: &str, depth: usize) -> bool {
        let collapsed = !self.is_collapsed(path, depth);
        self.overrides.insert(path.to_string(), collapsed);
        if collapsed {
            self.forget_below(path);
        }
        collapsed
    }

    /// Drop overrides for every strict descendant of `path`.
    pub fn forget_below(&mut self, path: &str) {
        let prefix = descendant_prefix(path);
        self.overrides.retain(|key, _| !key.starts_with(&prefix));
    }

    /// Pin the node at `path` to the given state, overriding the depth default.
    pub fn set(&mut self, path: &str, collapsed: bool) {
        self.overrides.insert(path.to_string(), collapsed);
    }

    /// Drop all overrides; called whenever a new tree is adopted.
    pub fn reset(&mut self) {
        self.overrides.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

/// `"{path}/"`, the prefix shared by all paths strictly below `path`.
pub fn descendant_prefix(path: &str) -> String {
    format!("{}/", path.trim_end_matches('/'))
}
