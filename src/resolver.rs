//! Period resolution: which allocations apply to a calendar bucket, and how loaded it is.
//!
//! Every function here is pure. A bucket is described by a granularity and a
//! representative date; [`bucket_range`] turns that into an inclusive date
//! interval.
//!
//! When several allocations match a bucket, the single-allocation view picks
//! the one with the earliest start date and falls back to list order, so the
//! result never depends on how the roster happened to be sorted beyond that.

use chrono::NaiveDate;

use crate::calendar::{month_bounds, week_start};
use crate::model::{Allocation, AllocationStatus, Granularity, FULL_DAY_HOURS, LOAD_EPSILON};

/// Aggregate classification of a bucket's summed load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadStatus {
    Vacation,
    Partial,
    Full,
    Overload,
}

impl LoadStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LoadStatus::Vacation => "vacation",
            LoadStatus::Partial => "partial",
            LoadStatus::Full => "full",
            LoadStatus::Overload => "overload",
        }
    }
}

/// Result of single-allocation resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleMatch<'a> {
    pub allocation: &'a Allocation,
    pub percentage: f64,
}

impl SingleMatch<'_> {
    pub fn status(&self) -> AllocationStatus {
        self.allocation.effective_status()
    }
}

/// Result of aggregate resolution over every matching allocation
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateLoad<'a> {
    /// Matching allocations, earliest start first
    pub allocations: Vec<&'a Allocation>,
    pub total_hours: f64,
    pub percentage: f64,
    pub status: LoadStatus,
    pub has_pending: bool,
}

/// Fully classified grid cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellResolution<'a> {
    /// Weekend or holiday: allocations are not looked up at all
    NonWorking,
    /// No allocation covers the bucket
    Empty,
    Allocated(AggregateLoad<'a>),
}

/// Inclusive date interval covered by the bucket containing `date`
pub fn bucket_range(granularity: Granularity, date: NaiveDate) -> (NaiveDate, NaiveDate) {
    match granularity {
        Granularity::Day => (date, date),
        Granularity::Week => {
            let start = week_start(date);
            let end = start
                .checked_add_signed(chrono::Duration::days(6))
                .unwrap_or(NaiveDate::MAX);
            (start, end)
        }
        Granularity::Month => month_bounds(date),
    }
}

/// Whether `allocation` applies to the bucket containing `date`
pub fn applies(allocation: &Allocation, granularity: Granularity, date: NaiveDate) -> bool {
    match granularity {
        Granularity::Day => allocation.covers(date),
        Granularity::Week | Granularity::Month => {
            let (start, end) = bucket_range(granularity, date);
            allocation.overlaps(start, end)
        }
    }
}

/// All allocations applying to the bucket, ordered by (start date, list position)
pub fn matching<'a, I>(allocations: I, granularity: Granularity, date: NaiveDate) -> Vec<&'a Allocation>
where
    I: IntoIterator<Item = &'a Allocation>,
{
    let mut matched: Vec<&Allocation> = allocations
        .into_iter()
        .filter(|a| applies(a, granularity, date))
        .collect();
    // stable sort keeps list order among equal start dates
    matched.sort_by_key(|a| a.start_date);
    matched
}

/// The single allocation displayed for a bucket
pub fn resolve_single<'a, I>(
    allocations: I,
    granularity: Granularity,
    date: NaiveDate,
) -> Option<SingleMatch<'a>>
where
    I: IntoIterator<Item = &'a Allocation>,
{
    matching(allocations, granularity, date)
        .into_iter()
        .next()
        .map(|allocation| SingleMatch {
            allocation,
            percentage: allocation.percentage(),
        })
}

/// Summed load of every allocation applying to a bucket; `None` when nothing applies
pub fn resolve_aggregate<'a, I>(
    allocations: I,
    granularity: Granularity,
    date: NaiveDate,
) -> Option<AggregateLoad<'a>>
where
    I: IntoIterator<Item = &'a Allocation>,
{
    let matched = matching(allocations, granularity, date);
    if matched.is_empty() {
        return None;
    }

    let total_hours: f64 = matched.iter().map(|a| a.hours_per_day).sum();
    let percentage = total_hours / FULL_DAY_HOURS;
    let has_pending = matched.iter().any(|a| a.is_pending);

    Some(AggregateLoad {
        allocations: matched,
        total_hours,
        percentage,
        status: classify_load(total_hours),
        has_pending,
    })
}

/// Classify a bucket by its summed hours per day
pub fn classify_load(total_hours: f64) -> LoadStatus {
    let percentage = total_hours / FULL_DAY_HOURS;
    if total_hours == 0.0 {
        LoadStatus::Vacation
    } else if percentage > 1.0 + LOAD_EPSILON {
        LoadStatus::Overload
    } else if (percentage - 1.0).abs() <= LOAD_EPSILON {
        LoadStatus::Full
    } else {
        LoadStatus::Partial
    }
}

/// Resolve a grid cell, short-circuiting weekends and holidays
pub fn resolve_cell<'a, I>(
    allocations: I,
    granularity: Granularity,
    date: NaiveDate,
    non_working: bool,
) -> CellResolution<'a>
where
    I: IntoIterator<Item = &'a Allocation>,
{
    if non_working {
        return CellResolution::NonWorking;
    }
    match resolve_aggregate(allocations, granularity, date) {
        Some(load) => CellResolution::Allocated(load),
        None => CellResolution::Empty,
    }
}
