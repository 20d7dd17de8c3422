//! Team member filtering

use chrono::NaiveDate;

use crate::model::TeamMember;
use crate::utils::is_blank;

/// Attribute filters applied to the roster before the grid is built.
///
/// Every field is optional; set fields are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberFilter {
    /// Substring of the member's name or role
    pub search: Option<String>,
    pub role: Option<String>,
    pub grade: Option<String>,
    /// Substring of a project the member is allocated to
    pub project: Option<String>,
    /// Substring of a client the member works for
    pub client: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl MemberFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, member: &TeamMember) -> bool {
        if let Some(search) = non_blank(&self.search) {
            let needle = search.to_lowercase();
            if !member.name.to_lowercase().contains(&needle)
                && !member.role.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if let Some(role) = non_blank(&self.role) {
            if !member.role.eq_ignore_ascii_case(role.trim()) {
                return false;
            }
        }

        if let Some(grade) = non_blank(&self.grade) {
            let matches_grade = member
                .grade
                .as_deref()
                .map(|g| g.eq_ignore_ascii_case(grade.trim()))
                .unwrap_or(false);
            if !matches_grade {
                return false;
            }
        }

        if let Some(project) = non_blank(&self.project) {
            let needle = project.to_lowercase();
            if !member
                .allocations
                .iter()
                .any(|a| a.project_name.to_lowercase().contains(&needle))
            {
                return false;
            }
        }

        if let Some(client) = non_blank(&self.client) {
            let needle = client.to_lowercase();
            if !member.allocations.iter().any(|a| {
                a.client
                    .as_deref()
                    .map(|c| c.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            }) {
                return false;
            }
        }

        if self.date_from.is_some() || self.date_to.is_some() {
            let from = self.date_from.unwrap_or(NaiveDate::MIN);
            let to = self.date_to.unwrap_or(NaiveDate::MAX);
            if !member.allocations.iter().any(|a| a.overlaps(from, to)) {
                return false;
            }
        }

        true
    }

    /// Members passing the filter, in roster order
    pub fn apply<'a>(&self, members: &'a [TeamMember]) -> Vec<&'a TeamMember> {
        members.iter().filter(|m| self.matches(m)).collect()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !is_blank(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Allocation, AllocationStatus};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn member(id: &str, name: &str, role: &str, grade: &str, project: &str, client: &str) -> TeamMember {
        TeamMember {
            id: id.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            grade: Some(grade.to_string()),
            allocations: vec![Allocation {
                id: format!("a{}", id),
                project_id: "p".to_string(),
                project_name: project.to_string(),
                client: Some(client.to_string()),
                start_date: date(2, 5),
                end_date: date(2, 9),
                hours_per_day: 8.0,
                status: AllocationStatus::Full,
                is_pending: false,
            }],
            has_warning: false,
            is_idle: false,
        }
    }

    fn team() -> Vec<TeamMember> {
        vec![
            member("1", "Lucas Ferreira", "Engineering", "Rookie", "Nexus Platform", "Acme Corp"),
            member("2", "Mia Thornton", "Design", "Experienced", "Pulse Mobile App", "TechStart Inc"),
            member("3", "Rafael Souza", "Frontend", "Intermediate", "Orbit Commerce", "GlobalTech"),
        ]
    }

    fn names<'a>(members: &[&'a TeamMember]) -> Vec<&'a str> {
        members.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everyone() {
        let team = team();
        let filter = MemberFilter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&team).len(), 3);
    }

    #[test]
    fn test_search_matches_name_or_role() {
        let team = team();
        let by_name = MemberFilter::new().with_search("thorn");
        assert_eq!(names(&by_name.apply(&team)), vec!["Mia Thornton"]);

        let by_role = MemberFilter::new().with_search("FRONT");
        assert_eq!(names(&by_role.apply(&team)), vec!["Rafael Souza"]);

        let blank = MemberFilter::new().with_search("   ");
        assert_eq!(blank.apply(&team).len(), 3);
    }

    #[test]
    fn test_attribute_filters_compose() {
        let team = team();
        let mut filter = MemberFilter::new().with_role("engineering");
        assert_eq!(names(&filter.apply(&team)), vec!["Lucas Ferreira"]);

        filter.grade = Some("experienced".to_string());
        assert!(filter.apply(&team).is_empty());

        filter.reset();
        filter.client = Some("globaltech".to_string());
        assert_eq!(names(&filter.apply(&team)), vec!["Rafael Souza"]);

        filter.reset();
        filter.project = Some("mobile".to_string());
        assert_eq!(names(&filter.apply(&team)), vec!["Mia Thornton"]);
    }

    #[test]
    fn test_date_window() {
        let team = team();
        let mut filter = MemberFilter::new();
        filter.date_from = Some(date(2, 9));
        assert_eq!(filter.apply(&team).len(), 3);

        filter.date_from = Some(date(2, 10));
        assert!(filter.apply(&team).is_empty());

        filter.date_from = None;
        filter.date_to = Some(date(2, 4));
        assert!(filter.apply(&team).is_empty());
    }
}
