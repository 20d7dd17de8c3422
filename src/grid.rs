//! Grid view model: team members against the time axis
//!
//! [`Grid::build`] is recomputed for every render from the immutable roster;
//! both the text renderer and the interactive dashboard draw from it.

use chrono::NaiveDate;

use crate::calendar::{self, Period};
use crate::filter::MemberFilter;
use crate::model::{Allocation, AllocationStatus, TeamMember, ViewMode};
use crate::resolver::{self, AggregateLoad, LoadStatus, SingleMatch};
use crate::roster::Roster;
use crate::utils::{format_percentage, pad_width};

/// How a member's main-row cells are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellMode {
    /// Show the earliest-starting matching allocation
    #[default]
    FirstMatch,
    /// Sum every matching allocation and classify the total load
    Aggregate,
}

/// Colour class of a cell, shared by the legend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellShade {
    NonWorking,
    Empty,
    Full,
    Partial,
    Vacation,
    Reserved,
    Overload,
}

/// Legend entries in display order
pub const LEGEND: [(CellShade, &str); 6] = [
    (CellShade::Full, "Full 100%"),
    (CellShade::Partial, "Partial"),
    (CellShade::Overload, "Overload"),
    (CellShade::Reserved, "Reserved for a project"),
    (CellShade::Vacation, "Vacation"),
    (CellShade::NonWorking, "Weekend or Holiday"),
];

#[derive(Debug, Clone, PartialEq)]
pub enum GridCell<'a> {
    NonWorking,
    Empty,
    Single(SingleMatch<'a>),
    Aggregate(AggregateLoad<'a>),
}

impl<'a> GridCell<'a> {
    fn resolve<I>(allocations: I, period: &Period, view: ViewMode, mode: CellMode) -> Self
    where
        I: IntoIterator<Item = &'a Allocation>,
    {
        if period.is_non_working() {
            return GridCell::NonWorking;
        }
        let granularity = view.granularity();
        match mode {
            CellMode::FirstMatch => resolver::resolve_single(allocations, granularity, period.date)
                .map(GridCell::Single)
                .unwrap_or(GridCell::Empty),
            CellMode::Aggregate => {
                resolver::resolve_aggregate(allocations, granularity, period.date)
                    .map(GridCell::Aggregate)
                    .unwrap_or(GridCell::Empty)
            }
        }
    }

    pub fn shade(&self) -> CellShade {
        match self {
            GridCell::NonWorking => CellShade::NonWorking,
            GridCell::Empty => CellShade::Empty,
            GridCell::Single(hit) => shade_for_status(hit.status()),
            GridCell::Aggregate(load) => match load.status {
                LoadStatus::Vacation => CellShade::Vacation,
                LoadStatus::Overload => CellShade::Overload,
                _ if load
                    .allocations
                    .iter()
                    .all(|a| a.effective_status() == AllocationStatus::Reserved) =>
                {
                    CellShade::Reserved
                }
                LoadStatus::Full => CellShade::Full,
                LoadStatus::Partial => CellShade::Partial,
            },
        }
    }

    /// Allocations behind the cell, earliest start first
    pub fn allocations(&self) -> Vec<&'a Allocation> {
        match self {
            GridCell::Single(hit) => vec![hit.allocation],
            GridCell::Aggregate(load) => load.allocations.clone(),
            GridCell::NonWorking | GridCell::Empty => Vec::new(),
        }
    }

    pub fn percentage(&self) -> Option<f64> {
        match self {
            GridCell::Single(hit) => Some(hit.percentage),
            GridCell::Aggregate(load) => Some(load.percentage),
            GridCell::NonWorking | GridCell::Empty => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        match self {
            GridCell::Single(hit) => hit.allocation.is_pending,
            GridCell::Aggregate(load) => load.has_pending,
            GridCell::NonWorking | GridCell::Empty => false,
        }
    }

    /// Text shown inside the cell: "1.0" in the monthly view, "50%" otherwise, "V" for vacation
    pub fn display_value(&self, view: ViewMode) -> String {
        let Some(percentage) = self.percentage() else {
            return String::new();
        };
        if self.shade() == CellShade::Vacation {
            return "V".to_string();
        }
        let mut value = match view {
            ViewMode::Monthly => format!("{:.1}", percentage),
            ViewMode::Quarterly | ViewMode::Annual => format_percentage(percentage),
        };
        if self.shade() == CellShade::Overload {
            value.push('!');
        }
        value
    }
}

fn shade_for_status(status: AllocationStatus) -> CellShade {
    match status {
        AllocationStatus::Full => CellShade::Full,
        AllocationStatus::Partial => CellShade::Partial,
        AllocationStatus::Vacation => CellShade::Vacation,
        AllocationStatus::Reserved => CellShade::Reserved,
    }
}

/// One project's allocations for a member, shown when the member row is expanded
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRow<'a> {
    pub project_name: &'a str,
    pub allocations: Vec<&'a Allocation>,
    /// Load of the group's first allocation, shown next to the project name
    pub header_percentage: f64,
    pub cells: Vec<GridCell<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberRow<'a> {
    pub member: &'a TeamMember,
    pub cells: Vec<GridCell<'a>>,
    pub projects: Vec<ProjectRow<'a>>,
}

impl MemberRow<'_> {
    /// Highest cell load in the visible range
    pub fn peak_load(&self) -> f64 {
        self.cells
            .iter()
            .filter_map(GridCell::percentage)
            .fold(0.0, f64::max)
    }
}

/// Counts shown under the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridSummary {
    pub members: usize,
    pub allocated_cells: usize,
    pub overloaded_cells: usize,
    pub vacation_cells: usize,
    pub pending_cells: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid<'a> {
    pub view: ViewMode,
    pub anchor: NaiveDate,
    pub mode: CellMode,
    pub title: String,
    pub periods: Vec<Period>,
    pub rows: Vec<MemberRow<'a>>,
}

impl<'a> Grid<'a> {
    pub fn build(
        roster: &'a Roster,
        view: ViewMode,
        anchor: NaiveDate,
        filter: &MemberFilter,
        mode: CellMode,
    ) -> Self {
        let periods = calendar::periods(view, anchor, &roster.holidays);

        let rows = filter
            .apply(&roster.members)
            .into_iter()
            .map(|member| build_row(member, &periods, view, mode))
            .collect();

        Grid {
            view,
            anchor,
            mode,
            title: calendar::period_title(view, anchor),
            periods,
            rows,
        }
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&GridCell<'a>> {
        self.rows.get(row).and_then(|r| r.cells.get(column))
    }

    pub fn summary(&self) -> GridSummary {
        let mut summary = GridSummary {
            members: self.rows.len(),
            ..Default::default()
        };
        for cell in self.rows.iter().flat_map(|r| r.cells.iter()) {
            if cell.percentage().is_none() {
                continue;
            }
            summary.allocated_cells += 1;
            match cell.shade() {
                CellShade::Overload => summary.overloaded_cells += 1,
                CellShade::Vacation => summary.vacation_cells += 1,
                _ => {}
            }
            if cell.is_pending() {
                summary.pending_cells += 1;
            }
        }
        summary
    }
}

fn build_row<'a>(
    member: &'a TeamMember,
    periods: &[Period],
    view: ViewMode,
    mode: CellMode,
) -> MemberRow<'a> {
    let cells = periods
        .iter()
        .map(|period| GridCell::resolve(&member.allocations, period, view, mode))
        .collect();

    let projects = member
        .project_groups()
        .into_iter()
        .map(|(project_name, allocations)| {
            let cells = periods
                .iter()
                .map(|period| {
                    GridCell::resolve(
                        allocations.iter().copied(),
                        period,
                        view,
                        CellMode::FirstMatch,
                    )
                })
                .collect();
            ProjectRow {
                project_name,
                header_percentage: allocations
                    .first()
                    .map(|a| a.percentage())
                    .unwrap_or(0.0),
                allocations,
                cells,
            }
        })
        .collect();

    MemberRow {
        member,
        cells,
        projects,
    }
}

// ===== TEXT RENDERING =====

const NAME_WIDTH: usize = 24;

fn column_width(view: ViewMode) -> usize {
    match view {
        ViewMode::Monthly => 4,
        ViewMode::Quarterly | ViewMode::Annual => 6,
    }
}

fn text_cell(cell: &GridCell<'_>, view: ViewMode, width: usize) -> String {
    let value = match cell {
        GridCell::NonWorking => "·".to_string(),
        _ => {
            let mut v = cell.display_value(view);
            if cell.is_pending() {
                v.push('*');
            }
            v
        }
    };
    format!("{:>width$}", value, width = width)
}

/// Render the grid as a plain-text table, optionally with per-project rows
pub fn render_text(grid: &Grid<'_>, expand: bool) -> String {
    let width = column_width(grid.view);
    let mut out = String::new();

    out.push_str(&format!("{} ({} view)\n", grid.title, grid.view));

    if grid.view == ViewMode::Monthly {
        out.push_str(&pad_width("", NAME_WIDTH));
        for period in &grid.periods {
            let sub: String = period
                .sub_label
                .as_deref()
                .unwrap_or("")
                .chars()
                .take(width - 1)
                .collect();
            out.push_str(&format!("{:>width$}", sub, width = width));
        }
        out.push('\n');
    }

    out.push_str(&pad_width("Team Member", NAME_WIDTH));
    for period in &grid.periods {
        out.push_str(&format!("{:>width$}", period.label, width = width));
    }
    out.push('\n');

    for row in &grid.rows {
        let mut name = row.member.name.clone();
        if row.member.has_warning {
            name.push_str(" !");
        }
        if row.member.is_idle {
            name.push_str(" ~");
        }
        out.push_str(&pad_width(&name, NAME_WIDTH));
        for cell in &row.cells {
            out.push_str(&text_cell(cell, grid.view, width));
        }
        out.push('\n');

        if expand {
            for project in &row.projects {
                let label = format!(
                    "  {} {}",
                    project.project_name,
                    format_percentage(project.header_percentage)
                );
                out.push_str(&pad_width(&label, NAME_WIDTH));
                for cell in &project.cells {
                    out.push_str(&text_cell(cell, grid.view, width));
                }
                out.push('\n');
            }
        }
    }

    if grid.rows.is_empty() {
        out.push_str("No team members match the current filters\n");
    }

    let summary = grid.summary();
    out.push_str(&format!(
        "\n{} members, {} allocated cells, {} overloaded, {} vacation, {} pending approval (*)\n",
        summary.members,
        summary.allocated_cells,
        summary.overloaded_cells,
        summary.vacation_cells,
        summary.pending_cells
    ));
    out
}
