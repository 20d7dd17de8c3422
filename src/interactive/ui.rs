//! Main UI rendering logic

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::app::{App, AppMode};
use super::utils::{get_message_style, label_style};
use super::{details, timeline};

/// Main draw function
pub fn draw(f: &mut Frame, app: &App) {
    let size = f.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Timeline
            Constraint::Length(1), // Legend
            Constraint::Length(5), // Selection
            Constraint::Length(4), // Messages
            Constraint::Length(3), // Footer
        ])
        .split(size);

    render_header(f, app, chunks[0]);

    let grid = app.grid();
    if app.mode == AppMode::Help {
        render_help(f, chunks[1]);
    } else {
        timeline::render(f, app, &grid, chunks[1]);
    }
    timeline::render_legend(f, chunks[2]);
    details::render(f, app, &grid, chunks[3]);
    render_messages(f, app, chunks[4]);
    render_footer(f, app, chunks[5]);

    if app.mode == AppMode::Details {
        details::render_popup(f, app, &grid, chunks[1]);
    }
}

/// Header: title, search box, and active filters
fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Staff Allocation ")
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let searching = app.mode == AppMode::Search;
    let search_style = if searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    let placeholder = app.search_input.value().is_empty() && !searching;

    let mut spans = vec![
        Span::styled("Search: ", label_style()),
        if placeholder {
            Span::styled("press / to search", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(app.search_input.value().to_string(), search_style)
        },
        Span::raw("   "),
        Span::styled("Role: ", label_style()),
        Span::raw(app.filter.role.clone().unwrap_or_else(|| "All".to_string())),
        Span::raw("   "),
        Span::styled("Members: ", label_style()),
        Span::raw(format!(
            "{}/{}",
            app.filter.apply(&app.roster.members).len(),
            app.roster.members.len()
        )),
    ];
    if !app.filter.is_empty() {
        spans.push(Span::styled(
            "   [r] reset filters",
            Style::default().fg(Color::DarkGray),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), inner);

    if searching {
        // "Search: " is eight columns wide
        let offset = 8 + app.search_input.visual_cursor() as u16;
        f.set_cursor(
            (inner.x + offset).min(inner.right().saturating_sub(1)),
            inner.y,
        );
    }
}

fn render_help(f: &mut Frame, area: Rect) {
    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        ))
    };

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::Cyan),
        )),
        Line::from(""),
        section("Navigation:"),
        Line::from("  ←/→ or h/l    Move between periods"),
        Line::from("  ↑/↓ or j/k    Move between rows"),
        Line::from("  Tab/Shift+Tab Next / previous month, quarter, or year"),
        Line::from("  Home          Back to the starting period"),
        Line::from("  1 2 3         Monthly, quarterly, annual view"),
        Line::from(""),
        section("Grid:"),
        Line::from("  Space         Expand or collapse the member's projects"),
        Line::from("  Enter         Show the allocations behind the cell"),
        Line::from("  g             Toggle first-match / aggregate cells"),
        Line::from(""),
        section("Filters:"),
        Line::from("  /             Search by name or role"),
        Line::from("  f             Cycle role filter"),
        Line::from("  r             Reset filters"),
        Line::from(""),
        section("General:"),
        Line::from("  q             Quit application"),
        Line::from("  ?             Show this help"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to return...",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(paragraph, area);
}

/// Render the messages pane
fn render_messages(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    // Show recent messages (last 2)
    let recent: Vec<_> = app
        .messages
        .iter()
        .rev()
        .filter(|m| !m.is_expired())
        .take(2)
        .collect();

    for msg in recent.iter().rev() {
        let style = get_message_style(msg.message_type);
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", msg.icon()), style),
            Span::styled(msg.text.as_str(), style),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Ready",
            Style::default().fg(Color::Gray),
        )));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Messages ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(paragraph, area);
}

/// Render the footer with keyboard shortcuts
fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.mode {
        AppMode::Normal => {
            "[Tab] Next  [Shift+Tab] Prev  [←→↑↓] Move  [Space] Expand  [Enter] Details  [1/2/3] View  [/] Search  [f] Role  [g] Aggregate  [?] help  [q]uit"
        }
        AppMode::Search => "Type to filter  [Enter] Done  [Esc] Clear search",
        AppMode::Details => "[Esc/Enter] Close",
        AppMode::Help => "Press any key to return",
    };

    let footer = Paragraph::new(shortcuts)
        .style(Style::default().fg(Color::Gray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

    f.render_widget(footer, area);
}
