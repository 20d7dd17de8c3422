//! Roster loading and validation
//!
//! A roster is a JSON document holding the team and the holiday calendar:
//!
//! ```json
//! { "members": [ { "id": "1", "name": "...", "role": "...", "allocations": [] } ],
//!   "holidays": ["2024-02-14"] }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ValidationError};
use crate::model::TeamMember;

/// The team and holiday calendar the grid is rendered from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub members: Vec<TeamMember>,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
}

impl Roster {
    /// Read and validate a roster file
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Reading roster");
        let data = fs::read_to_string(path)?;
        let roster = Self::from_json(&data)?;
        info!(
            members = roster.members.len(),
            allocations = roster.allocation_count(),
            holidays = roster.holidays.len(),
            "Roster loaded from {}",
            path.display()
        );
        Ok(roster)
    }

    /// Parse and validate a roster document
    pub fn from_json(data: &str) -> Result<Self> {
        let roster: Roster = serde_json::from_str(data)?;
        roster.validate()?;
        Ok(roster)
    }

    /// Check every allocation and the uniqueness of member and allocation ids
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        let mut member_ids = HashSet::new();
        let mut allocation_ids = HashSet::new();

        for member in &self.members {
            if !member_ids.insert(member.id.as_str()) {
                return Err(ValidationError::DuplicateMemberId(member.id.clone()));
            }
            for allocation in &member.allocations {
                allocation.validate()?;
                if !allocation_ids.insert(allocation.id.as_str()) {
                    return Err(ValidationError::DuplicateAllocationId(
                        allocation.id.clone(),
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn member(&self, id: &str) -> std::result::Result<&TeamMember, ValidationError> {
        self.members
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| ValidationError::UnknownMember(id.to_string()))
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    pub fn allocation_count(&self) -> usize {
        self.members.iter().map(|m| m.allocations.len()).sum()
    }

    /// Earliest allocation start across the roster, used as a default anchor
    pub fn first_allocation_date(&self) -> Option<NaiveDate> {
        self.members
            .iter()
            .flat_map(|m| m.allocations.iter())
            .map(|a| a.start_date)
            .min()
    }

    /// Distinct roles in order of first appearance
    pub fn roles(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.members
            .iter()
            .map(|m| m.role.as_str())
            .filter(|role| seen.insert(*role))
            .collect()
    }
}
