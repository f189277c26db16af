//! CLI Tooling
//!
//! Command-line surface for the tree browser: the interactive terminal UI
//! plus one-shot `show` and `delete` commands against the same endpoint.

use crate::app::{self, App};
use crate::client::{FetchOutcome, HttpTreeSource, TreeSource};
use crate::config::{ConfigLoader, EntitreeConfig};
use crate::error::ApiError;
use crate::logging::{init_logging, LogOverrides};
use crate::search::{SearchInput, SearchResult};
use crate::theme::PreferencesStore;
use crate::tree::Node;
use crate::view::{
    delete_button, display_path, render_tree, Answer, Confirmer, DeleteSink, DialoguerConfirmer,
    LoggingDeleteSink, Row, ViewState,
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Entitree - browse a remote entity hierarchy by path
#[derive(Parser, Debug)]
#[command(name = "entitree")]
#[command(about = "Browse a hierarchy of named entities served over HTTP")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path (layered over the global config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the tree endpoint
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// The subcommand to run; `browse` when none was given.
    pub fn resolved_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Browse { path: None })
    }

    /// Fold command-line flags into the loaded configuration.
    ///
    /// Logging flags are kept apart (see [`Cli::log_overrides`]) because
    /// they must also beat the `ENTITREE_LOG*` variables.
    pub fn apply_overrides(&self, config: &mut EntitreeConfig) {
        if let Some(url) = &self.base_url {
            config.api.base_url = url.clone();
        }
    }

    pub fn log_overrides(&self) -> LogOverrides {
        LogOverrides {
            level: self.log_level.clone(),
            format: self.log_format.clone(),
            output: self.log_output.clone(),
            file: self.log_file.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive terminal browser (default)
    Browse {
        /// Initial path query
        #[arg(long)]
        path: Option<String>,
    },
    /// Fetch a subtree once and print it
    Show {
        /// Node path, e.g. Rocket/Stage1
        path: String,
        /// Output format (text, json, or table)
        #[arg(long, default_value = "text")]
        format: String,
        /// Expand nodes past the auto-collapse depth
        #[arg(long)]
        expand_all: bool,
    },
    /// Request deletion of the node at a path
    Delete {
        /// Node path, e.g. Rocket/Stage2
        path: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Shared state for executing commands.
pub struct CliContext {
    config: EntitreeConfig,
    source: Arc<dyn TreeSource>,
    delete_sink: Arc<dyn DeleteSink>,
}

impl CliContext {
    /// Load configuration, install logging and build the HTTP source.
    pub fn new(cli: &Cli) -> Result<Self, ApiError> {
        let mut config = match &cli.config {
            Some(path) => ConfigLoader::load_with_file(path)?,
            None => ConfigLoader::load()?,
        };
        cli.apply_overrides(&mut config);
        init_logging(Some(&config.logging), &cli.log_overrides())?;

        let source = HttpTreeSource::from_config(&config.api)?;
        info!(base_url = %source.base_url(), "Tree endpoint configured");
        Ok(Self::with_source(config, Arc::new(source)))
    }

    /// Context over an arbitrary source; logging is left to the caller.
    pub fn with_source(config: EntitreeConfig, source: Arc<dyn TreeSource>) -> Self {
        Self {
            config,
            source,
            delete_sink: Arc::new(LoggingDeleteSink),
        }
    }

    pub fn with_delete_sink(mut self, sink: Arc<dyn DeleteSink>) -> Self {
        self.delete_sink = sink;
        self
    }

    pub fn config(&self) -> &EntitreeConfig {
        &self.config
    }

    /// Execute a command; the returned text is printed by the binary.
    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Browse { path } => self.handle_browse(path.as_deref()).await,
            Commands::Show {
                path,
                format,
                expand_all,
            } => self.handle_show(path, format, *expand_all).await,
            Commands::Delete { path, force } => {
                if *force {
                    self.handle_delete(path, &Answer(true)).await
                } else {
                    self.handle_delete(path, &DialoguerConfirmer).await
                }
            }
        }
    }

    async fn handle_browse(&self, path: Option<&str>) -> Result<String, ApiError> {
        let preferences = PreferencesStore::default_location()?;
        let (app, rx) = self.browse_app(path, preferences);
        app::browse(app, rx).await?;
        Ok(String::new())
    }

    /// Build the browser state and schedule the initial search.
    ///
    /// Without `path` the empty query is searched, which lists the root.
    /// Must be called inside a tokio runtime.
    pub fn browse_app(
        &self,
        path: Option<&str>,
        preferences: PreferencesStore,
    ) -> (App, mpsc::UnboundedReceiver<SearchResult>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut search = SearchInput::new(
            Arc::clone(&self.source),
            Duration::from_millis(self.config.search.debounce_ms),
            tx,
        );
        search.set_query(path.unwrap_or_default());
        let app = App::new(search, preferences, Arc::clone(&self.delete_sink));
        (app, rx)
    }

    /// Handle show command
    pub async fn handle_show(
        &self,
        path: &str,
        format: &str,
        expand_all: bool,
    ) -> Result<String, ApiError> {
        if !matches!(format, "text" | "json" | "table") {
            return Err(ApiError::ConfigError(format!(
                "Invalid format: {} (must be 'text', 'json', or 'table')",
                format
            )));
        }

        let outcome = self.source.fetch(path).await;
        let note = fallback_note(&outcome);
        let node = found_node(outcome)?;

        if format == "json" {
            return serde_json::to_string_pretty(&node)
                .map_err(|e| ApiError::Decode(format!("Failed to serialize node: {}", e)));
        }

        let mut view = ViewState::new();
        if expand_all {
            view.expand_all(&node);
        }
        let rows = render_tree(&node, &view, Utc::now());

        let mut out = String::new();
        if let Some(note) = note {
            out.push_str(&format!("{}\n\n", note.yellow()));
        }
        if format == "table" {
            out.push_str(&format_rows_table(&rows));
        } else {
            out.push_str(&format_rows_text(&rows));
        }
        Ok(out)
    }

    /// Handle delete command
    pub async fn handle_delete(
        &self,
        path: &str,
        confirmer: &dyn Confirmer,
    ) -> Result<String, ApiError> {
        let outcome = self.source.fetch(path).await;
        if let FetchOutcome::Found {
            requested,
            resolved,
            ..
        } = &outcome
        {
            if requested != resolved {
                return Err(ApiError::FallbackRefused {
                    requested: requested.clone(),
                    resolved: resolved.clone(),
                });
            }
        }
        let node = found_node(outcome)?;

        let button = delete_button(&node.name);
        let sink = Arc::clone(&self.delete_sink);
        let confirmed = button.press(confirmer, || sink.request_delete(node.id, &node.name))?;
        if confirmed {
            Ok(format!(
                "Delete requested for '{}' (id {}) at {}",
                node.name,
                node.id,
                display_path(&node, "")
            ))
        } else {
            Ok("Deletion cancelled".to_string())
        }
    }
}

fn fallback_note(outcome: &FetchOutcome) -> Option<String> {
    match outcome {
        FetchOutcome::Found {
            requested,
            resolved,
            ..
        } if requested != resolved => Some(format!(
            "No node at '{}'; showing nearest ancestor '{}'",
            requested, resolved
        )),
        _ => None,
    }
}

fn found_node(outcome: FetchOutcome) -> Result<Node, ApiError> {
    match outcome {
        FetchOutcome::Found { node, .. } => Ok(node),
        FetchOutcome::NotFound { requested } => Err(ApiError::NotFound(requested)),
        FetchOutcome::Failed { requested, reason } => Err(ApiError::FetchFailed {
            path: requested,
            reason,
        }),
    }
}

/// Rendered rows as indented text, headers bold and high values green.
pub fn format_rows_text(rows: &[Row]) -> String {
    let mut out = String::new();
    for row in rows {
        let indent = " ".repeat(row.indent());
        let line = match row {
            Row::Header { .. } => format!("{}", row.text().bold()),
            Row::Meta { .. } => format!("{}", row.text().dimmed()),
            Row::Property {
                key, value, high, ..
            } => {
                if *high {
                    format!("{}: {}", key, value.to_string().green())
                } else {
                    format!("{}: {}", key, value)
                }
            }
        };
        out.push_str(&indent);
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// One table row per visible property, keyed by its node's path.
pub fn format_rows_table(rows: &[Row]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Path", "Property", "Value"]);

    let mut current_path = "";
    for row in rows {
        match row {
            Row::Header { path, .. } => current_path = path.as_str(),
            Row::Property { key, value, .. } => {
                table.add_row(vec![current_path.to_string(), key.clone(), value.to_string()]);
            }
            Row::Meta { .. } => {}
        }
    }
    format!("{}\n", table)
}
