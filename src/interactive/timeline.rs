//! Timeline table: one row per member, one column per period

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::app::{App, RowRef};
use super::utils::shade_style;
use crate::grid::{CellMode, Grid, GridCell, LEGEND};
use crate::model::ViewMode;
use crate::utils::{format_percentage, truncate_width};

const NAME_WIDTH: u16 = 26;

fn column_width(view: ViewMode) -> u16 {
    match view {
        ViewMode::Monthly => 4,
        ViewMode::Quarterly | ViewMode::Annual => 6,
    }
}

/// Number of period columns that fit next to the name column
fn visible_columns(area_width: u16, view: ViewMode) -> usize {
    let usable = area_width.saturating_sub(NAME_WIDTH + 4);
    (usable / (column_width(view) + 1)).max(1) as usize
}

/// First period column to draw so the selected one stays on screen
fn first_column(selected: usize, fit: usize) -> usize {
    if selected >= fit {
        selected + 1 - fit
    } else {
        0
    }
}

/// Render the timeline table
pub fn render(f: &mut Frame, app: &App, grid: &Grid<'_>, area: Rect) {
    let fit = visible_columns(area.width, grid.view);
    let first = first_column(app.selected_column, fit);
    let last = (first + fit).min(grid.periods.len());
    let width = column_width(grid.view);

    let monthly = grid.view == ViewMode::Monthly;
    let mut header_cells = vec![Cell::from("Team Member")];
    for (i, period) in grid.periods[first..last].iter().enumerate() {
        let text = match &period.sub_label {
            Some(sub) if monthly => {
                format!("{}\n{}", truncate_width(sub, width as usize - 1), period.label)
            }
            _ => period.label.clone(),
        };
        let mut style = if period.is_non_working() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        if first + i == app.selected_column {
            style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
        }
        header_cells.push(Cell::from(text).style(style));
    }
    let header = Row::new(header_cells)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .height(if monthly { 2 } else { 1 });

    let visible = app.visible_rows(grid);
    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .filter_map(|(index, row_ref)| {
            let selected = index == app.selected_row;
            let (label, cells) = match *row_ref {
                RowRef::Member(i) => {
                    let row = grid.rows.get(i)?;
                    let marker = if app.expanded.contains(&row.member.id) {
                        "▾"
                    } else {
                        "▸"
                    };
                    let mut spans = vec![
                        Span::raw(format!("{} ", marker)),
                        Span::styled(
                            truncate_width(&row.member.name, NAME_WIDTH as usize - 6),
                            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                        ),
                    ];
                    if row.member.has_warning {
                        spans.push(Span::styled(" !", Style::default().fg(Color::Red)));
                    }
                    if row.member.is_idle {
                        spans.push(Span::styled(" ~", Style::default().fg(Color::Yellow)));
                    }
                    (Line::from(spans), &row.cells)
                }
                RowRef::Project(i, j) => {
                    let project = grid.rows.get(i)?.projects.get(j)?;
                    let label = format!(
                        "   {} {}",
                        truncate_width(project.project_name, NAME_WIDTH as usize - 9),
                        format_percentage(project.header_percentage)
                    );
                    (
                        Line::from(Span::styled(label, Style::default().fg(Color::Gray))),
                        &project.cells,
                    )
                }
            };

            let mut row_cells = vec![Cell::from(label)];
            for (column, cell) in cells.iter().enumerate().take(last).skip(first) {
                row_cells.push(render_cell(
                    cell,
                    grid.view,
                    selected && column == app.selected_column,
                ));
            }
            Some(Row::new(row_cells))
        })
        .collect();

    let mut widths = vec![Constraint::Length(NAME_WIDTH)];
    widths.extend((first..last).map(|_| Constraint::Length(width)));

    let mode = match grid.mode {
        CellMode::FirstMatch => "first match",
        CellMode::Aggregate => "aggregate",
    };
    let title = format!(" {} · {} view · {} ", grid.title, grid.view, mode);

    let empty = rows.is_empty();
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .column_spacing(1)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));

    let mut state = TableState::default();
    if !empty {
        state.select(Some(app.selected_row));
    }
    f.render_stateful_widget(table, area, &mut state);

    if empty {
        let inner = Rect {
            x: area.x + 2,
            y: area.y + area.height / 2,
            width: area.width.saturating_sub(4),
            height: 1.min(area.height),
        };
        f.render_widget(
            Paragraph::new("No team members match the current filters")
                .style(Style::default().fg(Color::Gray)),
            inner,
        );
    }
}

/// Format one grid cell
fn render_cell(cell: &GridCell<'_>, view: ViewMode, is_selected: bool) -> Cell<'static> {
    let mut text = match cell {
        GridCell::NonWorking => "·".to_string(),
        _ => cell.display_value(view),
    };
    if cell.is_pending() {
        text.push('*');
    }

    let mut style = shade_style(cell.shade());
    if is_selected {
        style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
        if text.is_empty() {
            text = "··".to_string();
        }
    }
    Cell::from(text).style(style)
}

/// Render the colour legend on one line
pub fn render_legend(f: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    for (shade, label) in LEGEND {
        spans.push(Span::styled("  ", shade_style(shade)));
        spans.push(Span::raw(format!(" {}   ", label)));
    }
    spans.push(Span::styled("* pending", Style::default().fg(Color::Gray)));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
