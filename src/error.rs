//! Custom error types for staffgrid
//!
//! Library code returns these structured errors; the binary wraps them in
//! anyhow at the top level.

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for staffgrid
#[derive(Error, Debug)]
pub enum StaffgridError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Roster and input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Terminal setup or restore failed in the dashboard
    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No roster file configured. Pass --roster <PATH> or set roster_path in {0}")]
    RosterNotConfigured(String),

    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),
}

/// Validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid date format: {0}. Expected YYYY-MM-DD, YYYY.MM.DD, or YYYY/MM/DD")]
    InvalidDateFormat(String),

    #[error("Allocation {id}: start date {start} is after end date {end}")]
    InvalidDateRange {
        id: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Allocation {id}: invalid hours per day {hours}. Must be between 0 and 8")]
    InvalidHours { id: String, hours: f64 },

    #[error("Duplicate allocation id: {0}")]
    DuplicateAllocationId(String),

    #[error("Duplicate team member id: {0}")]
    DuplicateMemberId(String),

    #[error("Unknown team member: {0}")]
    UnknownMember(String),

    #[error("Invalid view mode: {0}. Expected monthly, quarterly, or annual")]
    InvalidViewMode(String),
}

/// Result type alias for staffgrid
pub type Result<T> = std::result::Result<T, StaffgridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StaffgridError::Config(ConfigError::RosterNotConfigured(
            "/tmp/config.json".to_string(),
        ));
        assert!(err.to_string().contains("No roster file configured"));

        let err = StaffgridError::Validation(ValidationError::InvalidHours {
            id: "a1".to_string(),
            hours: 9.0,
        });
        assert!(err.to_string().contains("invalid hours per day 9"));
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StaffgridError = io_err.into();
        assert!(matches!(err, StaffgridError::Io(_)));

        let err: StaffgridError = ValidationError::UnknownMember("99".to_string()).into();
        assert_eq!(err.to_string(), "Validation error: Unknown team member: 99");
    }

    #[test]
    fn test_validation_errors() {
        let err = ValidationError::InvalidDateRange {
            id: "a7".to_string(),
            start: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Allocation a7: start date 2024-02-10 is after end date 2024-02-01"
        );

        let err = ValidationError::InvalidViewMode("weekly".to_string());
        assert!(err.to_string().contains("monthly, quarterly, or annual"));
    }
}
