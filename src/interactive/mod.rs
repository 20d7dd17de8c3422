//! Interactive terminal dashboard for the allocation grid
//!
//! Shows the roster as a timeline table with period navigation, search and
//! role filters, expandable project rows, and a details panel for the
//! allocations behind the selected cell.

pub mod app;
pub mod details;
pub mod events;
pub mod messages;
pub mod timeline;
pub mod ui;
pub mod utils;

pub use app::App;
pub use events::EventHandler;

use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{error, info};

use crate::error::StaffgridError;
use crate::grid::CellMode;
use crate::model::ViewMode;
use crate::roster::Roster;

/// Run the interactive dashboard until the user quits
pub fn run_interactive(
    roster: Roster,
    view: ViewMode,
    anchor: NaiveDate,
    mode: CellMode,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode().map_err(terminal_error("enable raw mode"))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(terminal_error("enter alternate screen"))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(terminal_error("create terminal"))?;

    let mut app = App::new(roster, view, anchor, mode);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().map_err(terminal_error("disable raw mode"))?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .map_err(terminal_error("leave alternate screen"))?;
    terminal
        .show_cursor()
        .map_err(terminal_error("show cursor"))?;

    if let Err(err) = res {
        error!(error = %err, "Dashboard exited with an error");
        eprintln!("Error: {:?}", err);
    } else {
        info!("Dashboard closed");
    }

    Ok(())
}

/// Main application loop
fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let event_handler = EventHandler::new();

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Some(event) = event_handler.next()? {
            if !app.handle_event(event)? {
                break;
            }
        }
    }

    Ok(())
}

/// Wrap a crossterm failure with the step that was being attempted
fn terminal_error(action: &'static str) -> impl Fn(io::Error) -> StaffgridError {
    move |err| StaffgridError::Terminal(format!("{}: {}", action, err))
}
