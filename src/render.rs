//! Terminal drawing of the container state.

use crate::app::{App, Focus};
use crate::search::PLACEHOLDER;
use crate::view::{ButtonStyle, Row};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Draw the whole screen: search box, tree pane, status bar and, when a
/// delete is pending, the confirmation modal.
pub fn ui(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(app.theme.base), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_search(frame, chunks[0], app);
    render_tree_pane(frame, chunks[1], app);
    render_status_bar(frame, chunks[2], app);

    if app.pending_delete.is_some() {
        render_confirm(frame, area, app);
    }
}

fn render_search(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let accent = app.theme.search_accent(app.search.status());
    let mut title = String::from(" Path ");
    if app.search.is_loading() {
        title.push_str(SPINNER[app.spinner_tick % SPINNER.len()]);
        title.push(' ');
    }
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(accent);

    let content = if app.search.query().is_empty() {
        Line::from(Span::styled(PLACEHOLDER, app.theme.meta))
    } else {
        Line::from(app.search.query().to_string())
    };
    frame.render_widget(Paragraph::new(content).block(block), area);

    if app.focus == Focus::Search && app.pending_delete.is_none() {
        let x = area.x + 1 + app.search.query().chars().count() as u16;
        frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn row_line<'a>(row: &Row, app: &'a App) -> Line<'a> {
    let indent = " ".repeat(row.indent());
    match row {
        Row::Header { .. } => Line::from(vec![
            Span::raw(indent),
            Span::styled(row.text(), app.theme.header),
        ]),
        Row::Meta { .. } => Line::from(vec![
            Span::raw(indent),
            Span::styled(row.text(), app.theme.meta),
            Span::raw("  "),
            Span::styled("[Delete]", app.theme.danger),
        ]),
        Row::Property {
            key, value, high, ..
        } => {
            let value_style = if *high {
                app.theme.property_high
            } else {
                app.theme.property_value
            };
            Line::from(vec![
                Span::raw(indent),
                Span::styled(format!("{}: ", key), app.theme.property_key),
                Span::styled(value.to_string(), value_style),
            ])
        }
    }
}

fn render_tree_pane(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let border = if app.focus == Focus::Tree {
        app.theme.search_info
    } else {
        app.theme.border
    };
    let block = Block::default()
        .title(" Tree ")
        .borders(Borders::ALL)
        .border_style(border);

    let rows = app.rows();
    if rows.is_empty() {
        let empty = Paragraph::new(Span::styled("No data", app.theme.meta)).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| ListItem::new(row_line(row, app)))
        .collect();
    let highlight = if app.focus == Focus::Tree {
        app.theme.selection
    } else {
        Style::default()
    };
    let list = List::new(items).block(block).highlight_style(highlight);
    let mut state = ListState::default().with_selected(Some(app.cursor));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_status_bar(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let hints = match app.focus {
        Focus::Search => "Tab: tree  Enter: tree  Esc: quit".to_string(),
        Focus::Tree => format!(
            "↑↓ move  Enter toggle  a time  d delete  t {}  /: search  q quit",
            app.theme_name.toggle_label()
        ),
    };
    let text = match &app.notice {
        Some(notice) => format!("{}  |  {}", notice, hints),
        None => hints,
    };
    frame.render_widget(Paragraph::new(Span::styled(text, app.theme.status)), area);
}

fn render_confirm(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let Some(pending) = &app.pending_delete else {
        return;
    };
    let popup = centered(area, 60, 7);
    let button_style = match pending.button.style {
        ButtonStyle::Danger => app.theme.danger,
        ButtonStyle::Primary => app.theme.search_info,
    };
    let body = vec![
        Line::from(pending.button.message.clone()),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("[y] {}", pending.button.label), button_style),
            Span::raw("   "),
            Span::raw("[n] Cancel"),
        ]),
    ];
    let modal = Paragraph::new(body)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Confirm ")
                .borders(Borders::ALL)
                .border_style(button_style),
        )
        .style(app.theme.base);
    frame.render_widget(Clear, popup);
    frame.render_widget(modal, popup);
}

/// Rect of `width_pct` percent width and fixed `height`, centered in `area`.
fn centered(area: Rect, width_pct: u16, height: u16) -> Rect {
    let scaled = u32::from(area.width) * u32::from(width_pct) / 100;
    let width = u16::try_from(scaled)
        .unwrap_or(u16::MAX)
        .max(20)
        .min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
