//! Recursive tree renderer
//!
//! Projects a [`Node`] subtree plus the container's [`ViewState`] into a flat
//! list of [`Row`]s. The projection is pure: the terminal UI draws the rows,
//! the `show` command prints them, and tests inspect them directly. Anything
//! under a collapsed node is absent from the output, not hidden.

use crate::tree::{child_path, descendant_prefix, CollapseState, Node, PropertyValue};
use crate::view::property::{is_high, property_text};
use crate::view::time_since::{absolute_time, time_since};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Columns of indentation per depth level.
pub const INDENT_UNIT: usize = 2;

pub const COLLAPSED_GLYPH: &str = "▶";
pub const EXPANDED_GLYPH: &str = "▼";

/// One rendered line.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    /// `"{glyph} {name}"`; selecting it toggles collapse.
    Header {
        depth: usize,
        path: String,
        id: i64,
        name: String,
        collapsed: bool,
    },
    /// Age of the node plus its delete control.
    Meta {
        depth: usize,
        path: String,
        id: i64,
        name: String,
        age: Option<String>,
        absolute: Option<String>,
    },
    Property {
        depth: usize,
        key: String,
        value: PropertyValue,
        high: bool,
    },
}

impl Row {
    pub fn depth(&self) -> usize {
        match self {
            Row::Header { depth, .. } | Row::Meta { depth, .. } | Row::Property { depth, .. } => {
                *depth
            }
        }
    }

    pub fn indent(&self) -> usize {
        self.depth() * INDENT_UNIT
    }

    /// Path and identity of the node this row belongs to, if it is a
    /// node-level row.
    pub fn node_ref(&self) -> Option<(&str, i64, &str)> {
        match self {
            Row::Header { path, id, name, .. } | Row::Meta { path, id, name, .. } => {
                Some((path.as_str(), *id, name.as_str()))
            }
            Row::Property { .. } => None,
        }
    }

    /// Unindented display text.
    pub fn text(&self) -> String {
        match self {
            Row::Header {
                name, collapsed, ..
            } => {
                let glyph = if *collapsed {
                    COLLAPSED_GLYPH
                } else {
                    EXPANDED_GLYPH
                };
                format!("{} {}", glyph, name)
            }
            Row::Meta { age, absolute, .. } => {
                let mut text = match age {
                    Some(age) => format!("Created {}", age),
                    None => "Created (unknown)".to_string(),
                };
                if let Some(absolute) = absolute {
                    text.push_str(&format!(" ({})", absolute));
                }
                text
            }
            Row::Property { key, value, .. } => property_text(key, value),
        }
    }
}

/// Display state owned by the tree container: collapse flags and the
/// per-node absolute-time toggle. Both are keyed by node path and cleared
/// whenever a new tree is adopted.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub collapse: CollapseState,
    absolute_times: HashSet<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collapsing also clears the absolute-time toggles of everything below.
    pub fn toggle_collapse(&mut self, path: &str, depth: usize) -> bool {
        let collapsed = self.collapse.toggle(path, depth);
        if collapsed {
            let prefix = descendant_prefix(path);
            self.absolute_times.retain(|key| !key.starts_with(&prefix));
        }
        collapsed
    }

    /// Flip the absolute-time display for a node; returns the new value.
    pub fn toggle_absolute(&mut self, path: &str) -> bool {
        if self.absolute_times.remove(path) {
            false
        } else {
            self.absolute_times.insert(path.to_string());
            true
        }
    }

    pub fn shows_absolute(&self, path: &str) -> bool {
        self.absolute_times.contains(path)
    }

    /// Expand every node in `root`, including those past the auto-collapse depth.
    pub fn expand_all(&mut self, root: &Node) {
        fn walk(state: &mut CollapseState, node: &Node, parent: &str) {
            let path = display_path(node, parent);
            state.set(&path, false);
            for child in &node.descendants {
                walk(state, child, &path);
            }
        }
        walk(&mut self.collapse, root, "");
    }

    pub fn reset(&mut self) {
        self.collapse.reset();
        self.absolute_times.clear();
    }
}

/// Path used as the node's state key: the server path when present,
/// otherwise derived from the ancestors' names.
pub fn display_path(node: &Node, parent: &str) -> String {
    if node.path.is_empty() {
        child_path(parent, &node.name)
    } else {
        node.path.clone()
    }
}

/// Render `root` at depth 0.
pub fn render_tree(root: &Node, state: &ViewState, now: DateTime<Utc>) -> Vec<Row> {
    let mut rows = Vec::new();
    render_node(root, 0, "", state, now, &mut rows);
    rows
}

fn render_node(
    node: &Node,
    depth: usize,
    parent: &str,
    state: &ViewState,
    now: DateTime<Utc>,
    rows: &mut Vec<Row>,
) {
    let path = display_path(node, parent);
    let collapsed = state.collapse.is_collapsed(&path, depth);

    rows.push(Row::Header {
        depth,
        path: path.clone(),
        id: node.id,
        name: node.name.clone(),
        collapsed,
    });
    if collapsed {
        return;
    }

    let absolute = if state.shows_absolute(&path) {
        node.created_at.map(absolute_time)
    } else {
        None
    };
    rows.push(Row::Meta {
        depth,
        path: path.clone(),
        id: node.id,
        name: node.name.clone(),
        age: node.created_at.map(|created| time_since(created, now)),
        absolute,
    });

    for (key, value) in &node.properties {
        rows.push(Row::Property {
            depth,
            key: key.clone(),
            value: value.clone(),
            high: is_high(value),
        });
    }

    for descendant in &node.descendants {
        render_node(descendant, depth + 1, &path, state, now, rows);
    }
}
