//! Tree container and terminal event loop
//!
//! `App` composes the search box and the fetched tree. It owns every piece
//! of display state (collapse flags, absolute-time toggles, cursor, theme)
//! and is the only place that state changes. Only non-empty search results
//! replace the displayed tree; anything else leaves it as it was.

use crate::error::ApiError;
use crate::render::ui;
use crate::search::{SearchInput, SearchResult};
use crate::theme::{Preferences, PreferencesStore, Theme, ThemeName};
use crate::tree::Node;
use crate::view::{delete_button, render_tree, Answer, ConfirmButton, DeleteSink, Row, ViewState};
use chrono::Utc;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Spinner frame interval while a search is in flight.
const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Tree,
}

/// Delete awaiting a yes/no answer from the modal.
#[derive(Debug, Clone)]
pub struct PendingDelete {
    pub button: ConfirmButton,
    pub id: i64,
    pub name: String,
}

/// Node-level row under the cursor (properties resolve to their node).
#[derive(Debug, Clone, PartialEq)]
struct SelectedNode {
    path: String,
    id: i64,
    name: String,
    depth: usize,
}

pub struct App {
    pub search: SearchInput,
    pub tree: Option<Node>,
    pub view: ViewState,
    pub cursor: usize,
    pub focus: Focus,
    pub theme_name: ThemeName,
    pub theme: Theme,
    pub pending_delete: Option<PendingDelete>,
    pub notice: Option<String>,
    pub should_quit: bool,
    pub spinner_tick: usize,
    preferences: PreferencesStore,
    delete_sink: Arc<dyn DeleteSink>,
}

impl App {
    pub fn new(
        search: SearchInput,
        preferences: PreferencesStore,
        delete_sink: Arc<dyn DeleteSink>,
    ) -> Self {
        let theme_name = preferences.load().theme;
        Self {
            search,
            tree: None,
            view: ViewState::new(),
            cursor: 0,
            focus: Focus::Search,
            theme_name,
            theme: Theme::for_name(theme_name),
            pending_delete: None,
            notice: None,
            should_quit: false,
            spinner_tick: 0,
            preferences,
            delete_sink,
        }
    }

    /// Current rows of the displayed tree.
    pub fn rows(&self) -> Vec<Row> {
        match &self.tree {
            Some(tree) => render_tree(tree, &self.view, Utc::now()),
            None => Vec::new(),
        }
    }

    /// Replace the displayed tree; all per-node display state starts over.
    pub fn adopt(&mut self, node: Node) {
        info!(name = %node.name, nodes = node.subtree_len(), "Displaying subtree");
        self.view.reset();
        self.tree = Some(node);
        self.cursor = 0;
    }

    pub fn on_search_result(&mut self, result: SearchResult) {
        if let Some(node) = self.search.complete(result) {
            self.adopt(node);
        }
    }

    pub fn on_tick(&mut self) {
        if self.search.is_loading() {
            self.spinner_tick = self.spinner_tick.wrapping_add(1);
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.pending_delete.is_some() {
            self.on_confirm_key(key);
            return;
        }
        if key.code == KeyCode::Tab || key.code == KeyCode::BackTab {
            self.focus = match self.focus {
                Focus::Search => Focus::Tree,
                Focus::Tree => Focus::Search,
            };
            return;
        }
        match self.focus {
            Focus::Search => self.on_search_key(key),
            Focus::Tree => self.on_tree_key(key),
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => self.search.push_char(c),
            KeyCode::Backspace => self.search.pop_char(),
            KeyCode::Enter | KeyCode::Down => self.focus = Focus::Tree,
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn on_tree_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.rows().len();
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            KeyCode::Home | KeyCode::Char('g') => self.cursor = 0,
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('a') => self.toggle_absolute_selected(),
            KeyCode::Char('d') => self.request_delete_selected(),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn on_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => self.resolve_delete(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.resolve_delete(false),
            _ => {}
        }
    }

    fn selected_node(&self) -> Option<SelectedNode> {
        let rows = self.rows();
        let upto = self.cursor.min(rows.len().checked_sub(1)?);
        rows[..=upto].iter().rev().find_map(|row| {
            row.node_ref().map(|(path, id, name)| SelectedNode {
                path: path.to_string(),
                id,
                name: name.to_string(),
                depth: row.depth(),
            })
        })
    }

    fn clamp_cursor(&mut self) {
        let len = self.rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn toggle_selected(&mut self) {
        let Some(selected) = self.selected_node() else {
            return;
        };
        self.view.toggle_collapse(&selected.path, selected.depth);
        // Move onto the toggled header so collapsing from a child row
        // does not leave the cursor past the end.
        if let Some(idx) = self
            .rows()
            .iter()
            .position(|row| matches!(row, Row::Header { path, .. } if *path == selected.path))
        {
            self.cursor = idx;
        }
        self.clamp_cursor();
    }

    pub fn toggle_absolute_selected(&mut self) {
        if let Some(selected) = self.selected_node() {
            self.view.toggle_absolute(&selected.path);
        }
    }

    pub fn request_delete_selected(&mut self) {
        if let Some(selected) = self.selected_node() {
            self.pending_delete = Some(PendingDelete {
                button: delete_button(&selected.name),
                id: selected.id,
                name: selected.name,
            });
        }
    }

    /// Apply the modal's answer. Only a yes reaches the delete sink; the
    /// displayed tree is left untouched either way.
    pub fn resolve_delete(&mut self, confirmed: bool) {
        let Some(pending) = self.pending_delete.take() else {
            return;
        };
        let sink = Arc::clone(&self.delete_sink);
        match pending
            .button
            .press(&Answer(confirmed), || sink.request_delete(pending.id, &pending.name))
        {
            Ok(true) => {
                self.notice = Some(format!(
                    "Delete requested for '{}' (id {})",
                    pending.name, pending.id
                ))
            }
            Ok(false) => self.notice = Some("Deletion cancelled".to_string()),
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme_name = self.theme_name.toggled();
        self.theme = Theme::for_name(self.theme_name);
        let preferences = Preferences {
            theme: self.theme_name,
        };
        if let Err(e) = self.preferences.save(&preferences) {
            warn!(error = %e, "Failed to persist theme preference");
            self.notice = Some(format!("Could not save theme: {}", e));
        }
    }
}

/// Put the terminal into raw alternate-screen mode.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Drive the UI until the user quits.
pub async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    mut results: mpsc::UnboundedReceiver<SearchResult>,
) -> Result<(), ApiError> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK);

    loop {
        terminal
            .draw(|frame| ui(frame, &app))
            .map_err(|e| ApiError::Terminal(e.to_string()))?;

        tokio::select! {
            _ = ticker.tick() => app.on_tick(),
            Some(result) = results.recv() => app.on_search_result(result),
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => app.on_key(key),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(ApiError::Terminal(e.to_string())),
                None => break,
            },
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Interactive entry point: set up the terminal, run, and always restore it.
pub async fn browse(
    app: App,
    results: mpsc::UnboundedReceiver<SearchResult>,
) -> Result<(), ApiError> {
    let mut terminal = setup_terminal().map_err(|e| ApiError::Terminal(e.to_string()))?;
    let result = run_app(&mut terminal, app, results).await;
    restore_terminal(&mut terminal).map_err(|e| ApiError::Terminal(e.to_string()))?;
    result
}
