//! Core data model: allocations, team members, and view modes

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Working hours that make up a full (100%) day.
pub const FULL_DAY_HOURS: f64 = 8.0;

/// Tolerance used when comparing load ratios against 100%.
pub const LOAD_EPSILON: f64 = 1e-9;

/// Declared status of a single allocation record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationStatus {
    Full,
    Partial,
    Vacation,
    Reserved,
}

impl AllocationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AllocationStatus::Full => "full",
            AllocationStatus::Partial => "partial",
            AllocationStatus::Vacation => "vacation",
            AllocationStatus::Reserved => "reserved",
        }
    }
}

impl fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A commitment of a person's time to a project over an inclusive date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub id: String,
    pub project_id: String,
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub hours_per_day: f64,
    pub status: AllocationStatus,
    #[serde(default)]
    pub is_pending: bool,
}

impl Allocation {
    /// Share of a full day committed, 1.0 meaning 100%
    pub fn percentage(&self) -> f64 {
        self.hours_per_day / FULL_DAY_HOURS
    }

    /// Status derived from the numbers rather than the declared label.
    ///
    /// Zero hours always means vacation. Reserved and pending allocations are
    /// tentative; everything else is full at 8h and partial below.
    pub fn effective_status(&self) -> AllocationStatus {
        if self.hours_per_day == 0.0 {
            AllocationStatus::Vacation
        } else if self.status == AllocationStatus::Reserved || self.is_pending {
            AllocationStatus::Reserved
        } else if (self.percentage() - 1.0).abs() < LOAD_EPSILON {
            AllocationStatus::Full
        } else {
            AllocationStatus::Partial
        }
    }

    /// Whether `date` falls within [start_date, end_date]
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Standard interval overlap test against an inclusive bucket.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        let starts_inside = self.start_date >= start && self.start_date <= end;
        let ends_inside = self.end_date >= start && self.end_date <= end;
        let spans = self.start_date <= start && self.end_date >= end;
        starts_inside || ends_inside || spans
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.start_date > self.end_date {
            return Err(ValidationError::InvalidDateRange {
                id: self.id.clone(),
                start: self.start_date,
                end: self.end_date,
            });
        }
        if !self.hours_per_day.is_finite()
            || self.hours_per_day < 0.0
            || self.hours_per_day > FULL_DAY_HOURS
        {
            return Err(ValidationError::InvalidHours {
                id: self.id.clone(),
                hours: self.hours_per_day,
            });
        }
        Ok(())
    }
}

/// A person on the roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default)]
    pub allocations: Vec<Allocation>,
    #[serde(default)]
    pub has_warning: bool,
    #[serde(default)]
    pub is_idle: bool,
}

impl TeamMember {
    /// Number of distinct projects this member is allocated to
    pub fn project_count(&self) -> usize {
        self.allocations
            .iter()
            .map(|a| a.project_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Uppercase initials, e.g. "Lucas Ferreira" -> "LF"
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Allocations grouped by project display name, in order of first appearance
    pub fn project_groups(&self) -> Vec<(&str, Vec<&Allocation>)> {
        let mut groups: Vec<(&str, Vec<&Allocation>)> = Vec::new();
        for allocation in &self.allocations {
            match groups
                .iter_mut()
                .find(|(name, _)| *name == allocation.project_name)
            {
                Some((_, members)) => members.push(allocation),
                None => groups.push((allocation.project_name.as_str(), vec![allocation])),
            }
        }
        groups
    }
}

/// Time-axis granularity of a grid column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Day,
    Week,
    Month,
}

/// Which calendar span the grid shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// One month, one column per day
    #[default]
    Monthly,
    /// One quarter, one column per week
    Quarterly,
    /// One year, one column per month
    Annual,
}

impl ViewMode {
    pub fn granularity(&self) -> Granularity {
        match self {
            ViewMode::Monthly => Granularity::Day,
            ViewMode::Quarterly => Granularity::Week,
            ViewMode::Annual => Granularity::Month,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Monthly => "monthly",
            ViewMode::Quarterly => "quarterly",
            ViewMode::Annual => "annual",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ViewMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" | "m" => Ok(ViewMode::Monthly),
            "quarterly" | "quarter" | "q" => Ok(ViewMode::Quarterly),
            "annual" | "yearly" | "year" | "y" => Ok(ViewMode::Annual),
            _ => Err(ValidationError::InvalidViewMode(s.to_string())),
        }
    }
}
