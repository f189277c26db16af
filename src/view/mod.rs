//! View model: pure projections of the tree into displayable rows.

pub mod confirm;
pub mod property;
pub mod time_since;
pub mod tree_view;

pub use confirm::{
    delete_button, Answer, ButtonStyle, ConfirmButton, Confirmer, DeleteSink, DialoguerConfirmer,
    LoggingDeleteSink,
};
pub use property::{is_high, property_text, HIGH_VALUE_THRESHOLD};
pub use time_since::{absolute_time, time_since};
pub use tree_view::{display_path, render_tree, Row, ViewState, INDENT_UNIT};
