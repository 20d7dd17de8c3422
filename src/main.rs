use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::{debug, info};

use staffgrid::config::Config;
use staffgrid::grid::{render_text, CellMode, Grid};
use staffgrid::resolver::{self, CellResolution};
use staffgrid::utils::{self, format_date_range, format_hours_per_day, format_percentage, Timer};
use staffgrid::{interactive, logging, MemberFilter, Roster, ViewMode};

#[derive(Parser)]
#[command(name = "staffgrid")]
#[command(about = "Team allocation grid: who is committed to what, day by day", long_about = None)]
#[command(version, long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"))]
struct Cli {
    /// Roster JSON file (overrides roster_path in the config file)
    #[arg(short, long, global = true)]
    roster: Option<PathBuf>,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Case-insensitive search on name or role
    #[arg(short, long)]
    search: Option<String>,

    /// Exact role (case-insensitive)
    #[arg(long)]
    role: Option<String>,

    /// Exact grade (case-insensitive)
    #[arg(long)]
    grade: Option<String>,

    /// Members allocated to a project whose name contains this text
    #[arg(long)]
    project: Option<String>,

    /// Members working for a client whose name contains this text
    #[arg(long)]
    client: Option<String>,

    /// Members with an allocation ending on or after this date
    #[arg(long, value_parser = parse_date_arg)]
    from: Option<NaiveDate>,

    /// Members with an allocation starting on or before this date
    #[arg(long, value_parser = parse_date_arg)]
    to: Option<NaiveDate>,
}

impl From<FilterArgs> for MemberFilter {
    fn from(args: FilterArgs) -> Self {
        MemberFilter {
            search: args.search,
            role: args.role,
            grade: args.grade,
            project: args.project,
            client: args.client,
            date_from: args.from,
            date_to: args.to,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the allocation grid
    Grid {
        /// View: monthly, quarterly or annual
        #[arg(long)]
        view: Option<ViewMode>,

        /// Any date inside the period to show (YYYY-MM-DD, YYYY.MM.DD, or YYYY/MM/DD)
        #[arg(short = 'D', long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,

        /// Show one row per project under each member
        #[arg(short, long)]
        expand: bool,

        /// Sum overlapping allocations instead of showing the earliest one
        #[arg(short, long)]
        aggregate: bool,

        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Explain how a single cell resolves
    Cell {
        /// Team member id
        #[arg(short, long)]
        member: String,

        /// Date inside the bucket
        #[arg(short = 'D', long, value_parser = parse_date_arg)]
        date: NaiveDate,

        /// View: monthly, quarterly or annual
        #[arg(long)]
        view: Option<ViewMode>,
    },
    /// List team members
    Members {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Load and validate the roster file
    Validate,
    /// Open the interactive dashboard
    Ui {
        /// View: monthly, quarterly or annual
        #[arg(long)]
        view: Option<ViewMode>,

        /// Any date inside the period to show first
        #[arg(short = 'D', long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },
}

fn parse_date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    utils::parse_date(s).map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(_) => (),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default()?;

    let Some(command) = cli.command else {
        println!("No command specified. Use --help for available commands.");
        return Ok(());
    };

    // The dashboard owns the terminal; everything else logs to stderr
    let _log_guard = if matches!(command, Commands::Ui { .. }) {
        if config.log_to_file || cli.verbose {
            logging::init_with_file("staffgrid.log", cli.verbose)
                .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
                .map(Some)?
        } else {
            None
        }
    } else {
        logging::init(cli.verbose);
        None
    };

    let roster_path = config.roster_path(cli.roster)?;
    let roster = Roster::load(&roster_path)
        .with_context(|| format!("Failed to load roster {}", roster_path.display()))?;

    match command {
        Commands::Grid {
            view,
            date,
            expand,
            aggregate,
            filter,
        } => {
            let view = config.view(view);
            let anchor = resolve_anchor(date, &config, &roster);
            let mode = if aggregate || config.aggregate_cells {
                CellMode::Aggregate
            } else {
                CellMode::FirstMatch
            };
            let filter = MemberFilter::from(filter);
            debug!(?view, %anchor, ?mode, ?filter, "Building grid");

            let timer = Timer::new("Grid build");
            let grid = Grid::build(&roster, view, anchor, &filter, mode);
            timer.stop_and_log();

            print!("{}", render_text(&grid, expand));
        }
        Commands::Cell { member, date, view } => {
            let view = config.view(view);
            explain_cell(&roster, &member, date, view)?;
        }
        Commands::Members { filter } => {
            list_members(&roster, &MemberFilter::from(filter));
        }
        Commands::Validate => {
            println!("✅ Roster {} is valid", roster_path.display());
            println!("   Members:     {}", roster.members.len());
            println!("   Allocations: {}", roster.allocation_count());
            println!("   Holidays:    {}", roster.holidays.len());
        }
        Commands::Ui { view, date } => {
            let view = config.view(view);
            let anchor = resolve_anchor(date, &config, &roster);
            let mode = if config.aggregate_cells {
                CellMode::Aggregate
            } else {
                CellMode::FirstMatch
            };
            info!(?view, %anchor, "Starting interactive dashboard");
            interactive::run_interactive(roster, view, anchor, mode)?;
        }
    }

    Ok(())
}

/// Anchor precedence: flag, config file, earliest allocation in the roster, today
fn resolve_anchor(flag: Option<NaiveDate>, config: &Config, roster: &Roster) -> NaiveDate {
    flag.or(config.anchor_date)
        .or_else(|| roster.first_allocation_date())
        .unwrap_or_else(utils::today)
}

fn explain_cell(roster: &Roster, member_id: &str, date: NaiveDate, view: ViewMode) -> Result<()> {
    let member = roster.member(member_id)?;
    let granularity = view.granularity();
    let (start, end) = resolver::bucket_range(granularity, date);
    let non_working = view == ViewMode::Monthly
        && (staffgrid::calendar::is_weekend(date) || roster.is_holiday(date));

    println!("\n=== {} ({}) ===", member.name, member.role);
    println!(
        "Bucket: {} ({} view)",
        if start == end {
            start.format("%a %b %-d, %Y").to_string()
        } else {
            format_date_range(start, end)
        },
        view
    );

    match resolver::resolve_cell(&member.allocations, granularity, date, non_working) {
        CellResolution::NonWorking => {
            println!("Weekend or holiday: no allocations apply");
        }
        CellResolution::Empty => {
            println!("No allocation covers this bucket");
        }
        CellResolution::Allocated(load) => {
            println!("\nMatching allocations (earliest start first):");
            for (i, allocation) in load.allocations.iter().enumerate() {
                println!(
                    "  {}. {} [{}]{}",
                    i + 1,
                    allocation.project_name,
                    allocation.id,
                    if i == 0 { "  <- displayed" } else { "" }
                );
                println!(
                    "     Client: {}",
                    allocation.client.as_deref().unwrap_or("-")
                );
                println!(
                    "     Period: {}",
                    format_date_range(allocation.start_date, allocation.end_date)
                );
                println!(
                    "     Load:   {} ({}), {}",
                    format_hours_per_day(allocation.hours_per_day),
                    format_percentage(allocation.percentage()),
                    allocation.effective_status()
                );
                if allocation.is_pending {
                    println!("     Status: Pending approval");
                }
            }
            println!(
                "\nTotal: {} ({}) -> {}",
                format_hours_per_day(load.total_hours),
                format_percentage(load.percentage),
                load.status.label()
            );
        }
    }
    Ok(())
}

fn list_members(roster: &Roster, filter: &MemberFilter) {
    let members = filter.apply(&roster.members);
    println!(
        "\n{:<6} {:<24} {:<14} {:<14} {:>8}  Flags",
        "ID", "Name", "Role", "Grade", "Projects"
    );
    println!("{}", "-".repeat(78));
    for member in &members {
        let mut flags = Vec::new();
        if member.has_warning {
            flags.push("warning");
        }
        if member.is_idle {
            flags.push("idle");
        }
        println!(
            "{:<6} {} {} {} {:>8}  {}",
            member.id,
            utils::pad_width(&member.name, 24),
            utils::pad_width(&member.role, 14),
            utils::pad_width(member.grade.as_deref().unwrap_or("-"), 14),
            member.project_count(),
            flags.join(", ")
        );
    }
    println!("\n{} of {} members shown", members.len(), roster.members.len());
}
