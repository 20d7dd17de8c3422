//! Selection panel and allocation details popup

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::app::App;
use super::utils::{centered_rect, label_style};
use crate::grid::{Grid, GridCell};
use crate::model::{Allocation, LOAD_EPSILON};
use crate::utils::{format_date_range, format_hours_per_day, format_percentage};

/// Render the panel describing the selected member and cell
pub fn render(f: &mut Frame, app: &App, grid: &Grid<'_>, area: Rect) {
    let mut lines = Vec::new();

    let peak = app
        .selected_row_ref(grid)
        .and_then(|r| grid.rows.get(r.member_index()))
        .map(|row| row.peak_load())
        .unwrap_or(0.0);

    match (app.selected_member(grid), app.selected_date(grid)) {
        (Some(member), Some(date)) => {
            lines.push(Line::from(vec![
                Span::styled("Member: ", label_style()),
                Span::styled(
                    format!("{} ({})", member.name, member.initials()),
                    Style::default().fg(Color::White),
                ),
                Span::raw("  "),
                Span::styled("Role: ", label_style()),
                Span::raw(member.role.clone()),
                Span::raw("  "),
                Span::styled("Grade: ", label_style()),
                Span::raw(member.grade.clone().unwrap_or_else(|| "-".to_string())),
                Span::raw("  "),
                Span::styled("Projects: ", label_style()),
                Span::raw(member.project_count().to_string()),
                Span::raw("  "),
                Span::styled("Peak: ", label_style()),
                Span::styled(format_percentage(peak), peak_style(peak)),
            ]));

            let cell_text = match app.selected_cell(grid) {
                Some(GridCell::NonWorking) => "Weekend or holiday".to_string(),
                Some(GridCell::Empty) | None => "Available".to_string(),
                Some(cell) => {
                    let allocations = cell.allocations();
                    let names: Vec<&str> =
                        allocations.iter().map(|a| a.project_name.as_str()).collect();
                    format!(
                        "{} on {}",
                        format_percentage(cell.percentage().unwrap_or(0.0)),
                        names.join(", ")
                    )
                }
            };
            lines.push(Line::from(vec![
                Span::styled("Selected: ", label_style()),
                Span::styled(
                    date.format("%a %b %-d, %Y").to_string(),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw("  "),
                Span::raw(cell_text),
            ]));

            let mut flags = Vec::new();
            if member.has_warning {
                flags.push(Span::styled(
                    "⚠ Allocation needs attention  ",
                    Style::default().fg(Color::Red),
                ));
            }
            if member.is_idle {
                flags.push(Span::styled(
                    "~ Idle: no current assignment",
                    Style::default().fg(Color::Yellow),
                ));
            }
            if !flags.is_empty() {
                lines.push(Line::from(flags));
            }
        }
        _ => {
            lines.push(Line::from(Span::styled(
                "No member selected",
                Style::default().fg(Color::Gray),
            )));
        }
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Selection ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(paragraph, area);
}

/// Render the popup listing every allocation behind the selected cell
pub fn render_popup(f: &mut Frame, app: &App, grid: &Grid<'_>, area: Rect) {
    let allocations = app.selected_allocations(grid);
    let member = app
        .selected_member(grid)
        .map(|m| m.name.as_str())
        .unwrap_or("-");

    let mut lines = vec![Line::from(Span::styled(
        member.to_string(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ))];
    lines.push(Line::from(""));

    for (i, allocation) in allocations.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.extend(allocation_lines(allocation));
    }

    if let Some(cell) = app.selected_cell(grid) {
        if allocations.len() > 1 {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Total: ", label_style()),
                Span::raw(format_percentage(cell.percentage().unwrap_or(0.0))),
            ]));
        }
    }

    let height = (lines.len() as u16 + 2).max(8);
    let popup = centered_rect(60, height, area);
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Allocation Details ")
                .border_style(Style::default().fg(Color::Cyan))
                .style(Style::default().bg(Color::Black)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

/// Highest load in the visible period; red above a full day
fn peak_style(peak: f64) -> Style {
    if peak > 1.0 + LOAD_EPSILON {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

fn allocation_lines(allocation: &Allocation) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Project: ", label_style()),
            Span::styled(
                allocation.project_name.clone(),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled("Client: ", label_style()),
            Span::raw(allocation.client.clone().unwrap_or_else(|| "-".to_string())),
        ]),
        Line::from(vec![
            Span::styled("Period: ", label_style()),
            Span::raw(format_date_range(allocation.start_date, allocation.end_date)),
        ]),
        Line::from(vec![
            Span::styled("Load: ", label_style()),
            Span::styled(
                format!(
                    "{} ({}), {}",
                    format_hours_per_day(allocation.hours_per_day),
                    format_percentage(allocation.percentage()),
                    allocation.effective_status()
                ),
                Style::default().fg(Color::Yellow),
            ),
        ]),
    ];
    if allocation.is_pending {
        lines.push(Line::from(Span::styled(
            "Pending approval",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}
