//! Application state and logic for the interactive dashboard

use std::collections::HashSet;

use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;
use tui_input::backend::crossterm::EventHandler as InputHandler;
use tui_input::Input;

use crate::calendar::{self, Direction};
use crate::filter::MemberFilter;
use crate::grid::{CellMode, Grid, GridCell};
use crate::model::{Allocation, TeamMember, ViewMode};
use crate::roster::Roster;

use super::messages::{Message, MessageType};

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Normal viewing/navigation mode
    Normal,
    /// Typing into the search box
    Search,
    /// Inspecting the allocations behind the selected cell
    Details,
    /// Help screen
    Help,
}

/// A line of the grid as drawn: a member, or one of their projects when expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRef {
    Member(usize),
    Project(usize, usize),
}

impl RowRef {
    pub fn member_index(&self) -> usize {
        match self {
            RowRef::Member(i) | RowRef::Project(i, _) => *i,
        }
    }
}

/// Main application state
pub struct App {
    pub roster: Roster,
    pub view: ViewMode,
    /// Any date inside the displayed period
    pub anchor: NaiveDate,
    /// Anchor to return to with Home
    pub home_anchor: NaiveDate,
    pub cell_mode: CellMode,
    pub filter: MemberFilter,
    pub search_input: Input,
    /// Index into the roster's roles used by the role filter, None for all roles
    pub role_filter_index: Option<usize>,
    /// Member ids whose project rows are shown
    pub expanded: HashSet<String>,
    pub selected_row: usize,
    pub selected_column: usize,
    pub mode: AppMode,
    pub messages: Vec<Message>,
}

impl App {
    pub fn new(roster: Roster, view: ViewMode, anchor: NaiveDate, cell_mode: CellMode) -> Self {
        let members = roster.members.len();
        let mut app = App {
            roster,
            view,
            anchor,
            home_anchor: anchor,
            cell_mode,
            filter: MemberFilter::new(),
            search_input: Input::default(),
            role_filter_index: None,
            expanded: HashSet::new(),
            selected_row: 0,
            selected_column: 0,
            mode: AppMode::Normal,
            messages: Vec::new(),
        };
        app.info(format!("Loaded {} team members", members));
        app
    }

    /// Grid for the current view, filter, and cell mode
    pub fn grid(&self) -> Grid<'_> {
        Grid::build(&self.roster, self.view, self.anchor, &self.filter, self.cell_mode)
    }

    /// Rows in display order, with project rows under expanded members
    pub fn visible_rows(&self, grid: &Grid<'_>) -> Vec<RowRef> {
        let mut rows = Vec::new();
        for (i, row) in grid.rows.iter().enumerate() {
            rows.push(RowRef::Member(i));
            if self.expanded.contains(&row.member.id) {
                rows.extend((0..row.projects.len()).map(|j| RowRef::Project(i, j)));
            }
        }
        rows
    }

    pub fn selected_row_ref(&self, grid: &Grid<'_>) -> Option<RowRef> {
        self.visible_rows(grid).get(self.selected_row).copied()
    }

    pub fn selected_member<'g>(&self, grid: &'g Grid<'_>) -> Option<&'g TeamMember> {
        self.selected_row_ref(grid)
            .and_then(|r| grid.rows.get(r.member_index()))
            .map(|row| row.member)
    }

    /// Cell under the cursor, from either a member row or a project row
    pub fn selected_cell<'g, 'a>(&self, grid: &'g Grid<'a>) -> Option<&'g GridCell<'a>> {
        match self.selected_row_ref(grid)? {
            RowRef::Member(i) => grid.cell(i, self.selected_column),
            RowRef::Project(i, j) => grid
                .rows
                .get(i)?
                .projects
                .get(j)?
                .cells
                .get(self.selected_column),
        }
    }

    pub fn selected_allocations<'a>(&self, grid: &Grid<'a>) -> Vec<&'a Allocation> {
        self.selected_cell(grid)
            .map(|cell| cell.allocations())
            .unwrap_or_default()
    }

    pub fn selected_date(&self, grid: &Grid<'_>) -> Option<NaiveDate> {
        grid.periods.get(self.selected_column).map(|p| p.date)
    }

    /// Handle keyboard events; returns false when the app should exit
    pub fn handle_event(&mut self, event: KeyEvent) -> Result<bool> {
        self.messages.retain(|m| !m.is_expired());
        match self.mode {
            AppMode::Normal => self.handle_normal_mode(event),
            AppMode::Search => Ok(self.handle_search_mode(event)),
            AppMode::Details => Ok(self.handle_details_mode(event)),
            AppMode::Help => {
                self.mode = AppMode::Normal;
                Ok(true)
            }
        }
    }

    fn handle_normal_mode(&mut self, event: KeyEvent) -> Result<bool> {
        match event.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                return Ok(false);
            }
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(false);
            }
            KeyCode::Char('?') => {
                self.mode = AppMode::Help;
            }
            // View modes
            KeyCode::Char('1') => self.set_view(ViewMode::Monthly),
            KeyCode::Char('2') => self.set_view(ViewMode::Quarterly),
            KeyCode::Char('3') => self.set_view(ViewMode::Annual),
            // Tab: Navigate periods
            KeyCode::Tab => {
                if event.modifiers.contains(KeyModifiers::SHIFT) {
                    self.shift_period(Direction::Previous);
                } else {
                    self.shift_period(Direction::Next);
                }
            }
            KeyCode::BackTab => self.shift_period(Direction::Previous),
            KeyCode::Home => {
                self.anchor = self.home_anchor;
                self.selected_column = 0;
                self.info(format!("Back to {}", calendar::period_title(self.view, self.anchor)));
            }
            // Arrow keys: move the cell cursor
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.selected_column += 1;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_row = self.selected_row.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_row += 1;
            }
            KeyCode::Char(' ') => self.toggle_expanded(),
            KeyCode::Enter => self.open_details(),
            KeyCode::Char('/') => {
                self.mode = AppMode::Search;
            }
            KeyCode::Char('f') | KeyCode::Char('F') => self.cycle_role_filter(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset_filters(),
            KeyCode::Char('g') | KeyCode::Char('G') => self.toggle_cell_mode(),
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.push_message(
                    MessageType::Warning,
                    "New allocations cannot be saved: the roster is read-only".to_string(),
                );
            }
            _ => {}
        }
        self.clamp_selection();
        Ok(true)
    }

    fn handle_search_mode(&mut self, event: KeyEvent) -> bool {
        match event.code {
            KeyCode::Enter => {
                self.mode = AppMode::Normal;
            }
            KeyCode::Esc => {
                self.search_input.reset();
                self.filter.search = None;
                self.mode = AppMode::Normal;
            }
            _ => {
                self.search_input.handle_event(&Event::Key(event));
                let value = self.search_input.value().to_string();
                self.filter.search = if value.is_empty() { None } else { Some(value) };
                self.selected_row = 0;
            }
        }
        self.clamp_selection();
        true
    }

    fn handle_details_mode(&mut self, event: KeyEvent) -> bool {
        match event.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                self.mode = AppMode::Normal;
            }
            _ => {}
        }
        true
    }

    fn set_view(&mut self, view: ViewMode) {
        if self.view != view {
            debug!(from = %self.view, to = %view, "Switching view");
            self.view = view;
            self.selected_column = 0;
            self.info(format!(
                "{} view: {}",
                capitalize(view.label()),
                calendar::period_title(view, self.anchor)
            ));
        }
    }

    fn shift_period(&mut self, direction: Direction) {
        self.anchor = calendar::shift(self.view, self.anchor, direction);
        self.info(format!("Showing {}", calendar::period_title(self.view, self.anchor)));
    }

    fn toggle_expanded(&mut self) {
        let grid = self.grid();
        let Some(row_ref) = self.selected_row_ref(&grid) else {
            return;
        };
        let Some(row) = grid.rows.get(row_ref.member_index()) else {
            return;
        };
        let id = row.member.id.clone();
        let member_row = self
            .visible_rows(&grid)
            .iter()
            .position(|r| *r == RowRef::Member(row_ref.member_index()))
            .unwrap_or(self.selected_row);
        drop(grid);

        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
        // collapsing from a project row puts the cursor back on the member
        self.selected_row = member_row;
    }

    fn open_details(&mut self) {
        let grid = self.grid();
        let has_allocations = !self.selected_allocations(&grid).is_empty();
        drop(grid);

        if has_allocations {
            self.mode = AppMode::Details;
        } else {
            self.info("No allocation in this cell".to_string());
        }
    }

    fn cycle_role_filter(&mut self) {
        let roles: Vec<String> = self.roster.roles().into_iter().map(String::from).collect();
        self.role_filter_index = match self.role_filter_index {
            None if !roles.is_empty() => Some(0),
            Some(i) if i + 1 < roles.len() => Some(i + 1),
            _ => None,
        };
        self.filter.role = self.role_filter_index.and_then(|i| roles.get(i).cloned());
        self.selected_row = 0;
        let label = self.filter.role.as_deref().unwrap_or("all roles").to_string();
        self.info(format!("Role filter: {}", label));
    }

    fn reset_filters(&mut self) {
        self.filter.reset();
        self.search_input.reset();
        self.role_filter_index = None;
        self.info("Filters reset".to_string());
    }

    fn toggle_cell_mode(&mut self) {
        self.cell_mode = match self.cell_mode {
            CellMode::FirstMatch => CellMode::Aggregate,
            CellMode::Aggregate => CellMode::FirstMatch,
        };
        let text = match self.cell_mode {
            CellMode::FirstMatch => "Cells show the earliest matching allocation",
            CellMode::Aggregate => "Cells show the summed load of all allocations",
        };
        self.info(text.to_string());
    }

    /// Keep the cursor inside the grid after anything that changes its shape
    pub fn clamp_selection(&mut self) {
        let grid = self.grid();
        let rows = self.visible_rows(&grid).len();
        let columns = grid.periods.len();
        drop(grid);

        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
        self.selected_column = self.selected_column.min(columns.saturating_sub(1));
    }

    fn info(&mut self, text: String) {
        self.push_message(MessageType::Info, text);
    }

    fn push_message(&mut self, message_type: MessageType, text: String) {
        self.messages.push(Message::new(message_type, text));
        if self.messages.len() > 20 {
            self.messages.remove(0);
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Allocation, AllocationStatus};
    use crossterm::event::KeyEventKind;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    fn alloc(id: &str, project: &str, start: NaiveDate, end: NaiveDate, hours: f64) -> Allocation {
        Allocation {
            id: id.to_string(),
            project_id: project.to_lowercase(),
            project_name: project.to_string(),
            client: None,
            start_date: start,
            end_date: end,
            hours_per_day: hours,
            status: AllocationStatus::Full,
            is_pending: false,
        }
    }

    fn member(id: &str, name: &str, role: &str, allocations: Vec<Allocation>) -> TeamMember {
        TeamMember {
            id: id.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            grade: None,
            allocations,
            has_warning: false,
            is_idle: false,
        }
    }

    fn app() -> App {
        let roster = Roster {
            members: vec![
                member(
                    "1",
                    "Lucas Ferreira",
                    "Engineering",
                    vec![alloc("a1", "Nexus Platform", date(2, 12), date(2, 16), 8.0)],
                ),
                member(
                    "4",
                    "Priya Nair",
                    "Backend",
                    vec![
                        alloc("a11", "Stratos Migration", date(2, 8), date(2, 9), 8.0),
                        alloc("a13", "Helix API", date(2, 19), date(2, 23), 8.0),
                    ],
                ),
            ],
            holidays: vec![date(2, 14)],
        };
        App::new(roster, ViewMode::Monthly, date(2, 1), CellMode::FirstMatch)
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        assert!(!app.handle_event(key(KeyCode::Char('q'))).unwrap());
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut app = app();
        for _ in 0..40 {
            app.handle_event(key(KeyCode::Right)).unwrap();
        }
        assert_eq!(app.selected_column, 28);
        for _ in 0..5 {
            app.handle_event(key(KeyCode::Down)).unwrap();
        }
        assert_eq!(app.selected_row, 1);
        app.handle_event(key(KeyCode::Up)).unwrap();
        app.handle_event(key(KeyCode::Up)).unwrap();
        assert_eq!(app.selected_row, 0);
    }

    #[test]
    fn test_switch_view_and_period() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('2'))).unwrap();
        assert_eq!(app.view, ViewMode::Quarterly);
        app.handle_event(key(KeyCode::Tab)).unwrap();
        assert_eq!(app.anchor, date(5, 1));
        app.handle_event(key(KeyCode::BackTab)).unwrap();
        app.handle_event(key(KeyCode::BackTab)).unwrap();
        assert_eq!(app.anchor, NaiveDate::from_ymd_opt(2023, 11, 1).unwrap());
        app.handle_event(key(KeyCode::Home)).unwrap();
        assert_eq!(app.anchor, date(2, 1));
    }

    #[test]
    fn test_expand_adds_project_rows() {
        let mut app = app();
        app.handle_event(key(KeyCode::Down)).unwrap();
        app.handle_event(key(KeyCode::Char(' '))).unwrap();
        assert!(app.expanded.contains("4"));

        let grid = app.grid();
        let rows = app.visible_rows(&grid);
        assert_eq!(
            rows,
            vec![RowRef::Member(0), RowRef::Member(1), RowRef::Project(1, 0), RowRef::Project(1, 1)]
        );
        drop(grid);

        // collapse from a project row returns to the member row
        app.handle_event(key(KeyCode::Down)).unwrap();
        app.handle_event(key(KeyCode::Char(' '))).unwrap();
        assert!(!app.expanded.contains("4"));
        assert_eq!(app.selected_row, 1);
    }

    #[test]
    fn test_details_only_for_allocated_cells() {
        let mut app = app();
        // Feb 1 is empty for Lucas
        app.handle_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.mode, AppMode::Normal);

        // Feb 12 is allocated
        app.selected_column = 11;
        app.handle_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.mode, AppMode::Details);
        let grid = app.grid();
        let ids: Vec<String> = app
            .selected_allocations(&grid)
            .iter()
            .map(|a| a.id.clone())
            .collect();
        assert_eq!(ids, vec!["a1".to_string()]);
        drop(grid);

        app.handle_event(key(KeyCode::Esc)).unwrap();
        assert_eq!(app.mode, AppMode::Normal);

        // Feb 14 is a holiday
        app.selected_column = 13;
        app.handle_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_search_and_reset() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('/'))).unwrap();
        assert_eq!(app.mode, AppMode::Search);
        for c in "priya".chars() {
            app.handle_event(key(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(app.filter.search.as_deref(), Some("priya"));
        assert_eq!(app.grid().rows.len(), 1);

        app.handle_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.mode, AppMode::Normal);

        app.handle_event(key(KeyCode::Char('r'))).unwrap();
        assert!(app.filter.is_empty());
        assert_eq!(app.search_input.value(), "");
        assert_eq!(app.grid().rows.len(), 2);
    }

    #[test]
    fn test_role_filter_cycles() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('f'))).unwrap();
        assert_eq!(app.filter.role.as_deref(), Some("Engineering"));
        app.handle_event(key(KeyCode::Char('f'))).unwrap();
        assert_eq!(app.filter.role.as_deref(), Some("Backend"));
        app.handle_event(key(KeyCode::Char('f'))).unwrap();
        assert_eq!(app.filter.role, None);
    }

    #[test]
    fn test_cell_mode_toggle_and_new_allocation_notice() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('g'))).unwrap();
        assert_eq!(app.cell_mode, CellMode::Aggregate);

        app.handle_event(key(KeyCode::Char('n'))).unwrap();
        let last = app.messages.last().unwrap();
        assert_eq!(last.message_type, MessageType::Warning);
        assert!(last.text.contains("read-only"));
    }
}
