// Grid, filter, and loading behaviour through the public API

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    use staffgrid::grid::{render_text, CellShade, GridCell};
    use staffgrid::{CellMode, Grid, MemberFilter, Roster, StaffgridError, ViewMode};

    fn demo_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/roster.json")
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn row_of(grid: &Grid<'_>, name: &str) -> usize {
        grid.rows
            .iter()
            .position(|r| r.member.name == name)
            .unwrap_or_else(|| panic!("{} not in grid", name))
    }

    #[test]
    fn test_monthly_grid_over_demo_roster() {
        let roster = Roster::load(&demo_path()).unwrap();
        let grid = Grid::build(
            &roster,
            ViewMode::Monthly,
            date(2, 20),
            &MemberFilter::new(),
            CellMode::FirstMatch,
        );

        assert_eq!(grid.title, "Feb 2024");
        assert_eq!(grid.periods.len(), 29);
        assert_eq!(grid.rows.len(), 12);

        let lucas = row_of(&grid, "Lucas Ferreira");
        // Feb 12 full, Feb 14 holiday, Feb 17 Saturday
        assert_eq!(grid.cell(lucas, 11).unwrap().display_value(ViewMode::Monthly), "1.0");
        assert_eq!(grid.cell(lucas, 13), Some(&GridCell::NonWorking));
        assert_eq!(grid.cell(lucas, 16), Some(&GridCell::NonWorking));
        assert_eq!(grid.cell(lucas, 0), Some(&GridCell::Empty));

        let priya = row_of(&grid, "Priya Nair");
        let reserved = grid.cell(priya, 12).unwrap();
        assert_eq!(reserved.shade(), CellShade::Reserved);
        assert!(reserved.is_pending());
    }

    #[test]
    fn test_aggregate_grid_flags_overload_and_vacation() {
        let roster = Roster::load(&demo_path()).unwrap();
        let grid = Grid::build(
            &roster,
            ViewMode::Monthly,
            date(2, 1),
            &MemberFilter::new(),
            CellMode::Aggregate,
        );

        let marcus = row_of(&grid, "Marcus Webb");
        assert_eq!(grid.cell(marcus, 12).unwrap().shade(), CellShade::Overload);
        assert_eq!(grid.cell(marcus, 26).unwrap().display_value(ViewMode::Monthly), "V");

        let clara = row_of(&grid, "Clara Mendes");
        assert_eq!(grid.cell(clara, 0).unwrap().shade(), CellShade::Vacation);

        let summary = grid.summary();
        assert_eq!(summary.members, 12);
        assert!(summary.overloaded_cells >= 2);
        assert!(summary.pending_cells > 0);
    }

    #[test]
    fn test_expanded_project_rows() {
        let roster = Roster::load(&demo_path()).unwrap();
        let grid = Grid::build(
            &roster,
            ViewMode::Annual,
            date(2, 1),
            &MemberFilter::new(),
            CellMode::FirstMatch,
        );

        let clara = &grid.rows[row_of(&grid, "Clara Mendes")];
        let names: Vec<&str> = clara.projects.iter().map(|p| p.project_name).collect();
        assert_eq!(
            names,
            vec!["Vega Design System", "Pulse Mobile App", "Insight Dashboard"]
        );
        // Header shows the first allocation of the group: a15 is 0h
        assert_eq!(clara.projects[0].header_percentage, 0.0);
        assert_eq!(clara.projects[2].cells[1].display_value(ViewMode::Annual), "100%");
    }

    #[test]
    fn test_filters_narrow_the_grid() {
        let roster = Roster::load(&demo_path()).unwrap();

        let engineering = MemberFilter::new().with_role("engineering");
        let names: Vec<&str> = engineering
            .apply(&roster.members)
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["Lucas Ferreira", "Jordan Blake"]);

        let frontend = MemberFilter::new().with_search("front");
        assert_eq!(frontend.apply(&roster.members).len(), 2);

        let helix = MemberFilter {
            project: Some("helix".to_string()),
            ..Default::default()
        };
        let names: Vec<&str> = helix
            .apply(&roster.members)
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["Priya Nair", "Marcus Webb"]);

        let grid = Grid::build(&roster, ViewMode::Quarterly, date(2, 1), &helix, CellMode::FirstMatch);
        assert_eq!(grid.rows.len(), 2);
        assert_eq!(grid.title, "Q1 2024");
    }

    #[test]
    fn test_render_text_output() {
        let roster = Roster::load(&demo_path()).unwrap();
        let grid = Grid::build(
            &roster,
            ViewMode::Monthly,
            date(2, 1),
            &MemberFilter::new().with_search("marcus"),
            CellMode::FirstMatch,
        );
        let text = render_text(&grid, true);

        assert!(text.starts_with("Feb 2024 (monthly view)"));
        assert!(text.contains("Marcus Webb !"));
        assert!(text.contains("  Orbit Commerce 100%"));
        assert!(text.contains("1 members"));
        assert!(!text.contains("Lucas"));
    }

    #[test]
    fn test_invalid_roster_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("roster.json");
        fs::write(
            &path,
            r#"{ "members": [ { "id": "1", "name": "A", "role": "QA", "allocations": [
                { "id": "x", "projectId": "p", "projectName": "P",
                  "startDate": "2024-02-16", "endDate": "2024-02-12",
                  "hoursPerDay": 8, "status": "full" } ] } ] }"#,
        )
        .unwrap();

        assert!(matches!(
            Roster::load(&path),
            Err(StaffgridError::Validation(_))
        ));
        assert!(matches!(
            Roster::load(&dir.path().join("missing.json")),
            Err(StaffgridError::Io(_))
        ));
    }
}
