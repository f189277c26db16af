//! Filesystem locations for config and state.

pub mod xdg_root;
