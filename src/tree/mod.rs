//! Entity tree data model and per-node collapse state.

pub mod collapse;
pub mod node;

pub use collapse::{descendant_prefix, CollapseState, AUTO_COLLAPSE_DEPTH};
pub use node::{child_path, normalize_query, parent_path, Node, PropertyValue};
