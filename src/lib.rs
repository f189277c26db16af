//! Entitree: Terminal Browser for Entity Trees
//!
//! Fetches a subtree of named entities (rockets, stages, engines, ...) by
//! slash-delimited path from an HTTP endpoint and renders it as a
//! collapsible tree with properties, creation ages and a confirm-gated
//! delete action.

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod search;
pub mod theme;
pub mod tree;
pub mod view;
