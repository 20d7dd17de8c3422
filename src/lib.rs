//! staffgrid: team capacity against a calendar
//!
//! Loads a roster of team members and their project allocations, buckets the
//! calendar into days, weeks or months, and resolves how much of each person's
//! capacity is committed in every bucket.

pub mod calendar;
pub mod config;
pub mod error;
pub mod filter;
pub mod grid;
pub mod interactive;
pub mod logging;
pub mod model;
pub mod resolver;
pub mod roster;
pub mod utils;

pub use error::{Result, StaffgridError};
pub use filter::MemberFilter;
pub use grid::{CellMode, Grid};
pub use model::{Allocation, AllocationStatus, TeamMember, ViewMode};
pub use roster::Roster;
