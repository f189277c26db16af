//! Integration tests for the entity tree browser

mod cli_contracts;
mod client_fetch;
mod parse_matrix;
mod search_flow;
mod support;
