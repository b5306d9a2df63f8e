use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::shared::constants::{MAX_PRIORITY, MIN_PRIORITY};
use crate::shared::validation::REPORT_ID_REGEX;

use super::{InternalComment, ReportPhoto, ReportStatus};

/// Report category enum
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    Infrastructure,
    Safety,
    Environment,
    Utilities,
    Transportation,
    Other,
}

impl ReportCategory {
    pub const ALL: [ReportCategory; 6] = [
        ReportCategory::Infrastructure,
        ReportCategory::Safety,
        ReportCategory::Environment,
        ReportCategory::Utilities,
        ReportCategory::Transportation,
        ReportCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportCategory::Infrastructure => "infrastructure",
            ReportCategory::Safety => "safety",
            ReportCategory::Environment => "environment",
            ReportCategory::Utilities => "utilities",
            ReportCategory::Transportation => "transportation",
            ReportCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        ReportCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| AppError::invalid_filter("category", s))
    }
}

/// Municipal department handling a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    PublicWorks,
    Utilities,
    Parks,
    Transportation,
    Environmental,
}

impl Department {
    pub const ALL: [Department; 5] = [
        Department::PublicWorks,
        Department::Utilities,
        Department::Parks,
        Department::Transportation,
        Department::Environmental,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::PublicWorks => "public_works",
            Department::Utilities => "utilities",
            Department::Parks => "parks",
            Department::Transportation => "transportation",
            Department::Environmental => "environmental",
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Department {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        Department::ALL
            .into_iter()
            .find(|d| d.as_str() == normalized)
            .ok_or_else(|| AppError::invalid_filter("department", s))
    }
}

/// Urgency from 1 (minimal) to 5 (critical).
///
/// Out-of-range values are rejected, never clamped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub fn new(value: u8) -> Result<Self> {
        if (MIN_PRIORITY..=MAX_PRIORITY).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AppError::Validation(format!(
                "Priority must be between {} and {}, got {}",
                MIN_PRIORITY, MAX_PRIORITY, value
            )))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Priority {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> Self {
        p.0
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) || !(-180.0..=180.0).contains(&self.lng) {
            return Err(AppError::Validation(format!(
                "Coordinates out of range: ({}, {})",
                self.lat, self.lng
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportLocation {
    pub address: String,
    pub coordinates: Coordinates,
}

/// One entry of a report's append-only status history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatusHistoryEntry {
    pub status: ReportStatus,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub note: Option<String>,
    pub assigned_to: Option<String>,
}

/// In-memory model for a citizen report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub category: ReportCategory,
    pub status: ReportStatus,
    pub priority: Priority,
    pub description: String,
    pub location: ReportLocation,
    pub citizen_name: String,
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub department: Option<Department>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status_history: Vec<StatusHistoryEntry>,
    #[serde(default = "default_duplicate_count")]
    pub duplicate_count: u32,
    #[serde(default)]
    pub photos: Vec<ReportPhoto>,
    #[serde(default)]
    pub internal_comments: Vec<InternalComment>,
}

fn default_duplicate_count() -> u32 {
    1
}

/// Data for creating a new report
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub category: ReportCategory,
    pub priority: Priority,
    pub description: String,
    pub location: ReportLocation,
    pub citizen_name: String,
    pub department: Option<Department>,
}

impl Report {
    /// Build a freshly submitted report with its first history entry
    pub fn submitted(id: String, data: CreateReport, now: DateTime<Utc>) -> Result<Self> {
        let report = Self {
            id,
            category: data.category,
            status: ReportStatus::Submitted,
            priority: data.priority,
            description: data.description,
            location: data.location,
            citizen_name: data.citizen_name.clone(),
            assigned_to: None,
            department: data.department,
            created_at: now,
            updated_at: now,
            status_history: vec![StatusHistoryEntry {
                status: ReportStatus::Submitted,
                timestamp: now,
                actor: data.citizen_name,
                note: None,
                assigned_to: None,
            }],
            duplicate_count: 1,
            photos: Vec::new(),
            internal_comments: Vec::new(),
        };

        report.validate()?;
        Ok(report)
    }

    /// Check the structural invariants of a report record
    pub fn validate(&self) -> Result<()> {
        if !REPORT_ID_REGEX.is_match(&self.id) {
            return Err(AppError::Validation(format!(
                "Invalid report id: {}",
                self.id
            )));
        }

        if self.description.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "Report {} has an empty description",
                self.id
            )));
        }

        if self.citizen_name.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "Report {} has a blank citizen name",
                self.id
            )));
        }

        self.location.coordinates.validate()?;

        if self
            .status_history
            .iter()
            .any(|entry| entry.actor.trim().is_empty())
        {
            return Err(AppError::Validation(format!(
                "Report {} has a history entry without an actor",
                self.id
            )));
        }

        let last = self.status_history.last().ok_or_else(|| {
            AppError::Validation(format!("Report {} has no status history", self.id))
        })?;
        if last.status != self.status {
            return Err(AppError::Validation(format!(
                "Report {} status {} does not match last history entry {}",
                self.id, self.status, last.status
            )));
        }

        if self
            .status_history
            .windows(2)
            .any(|pair| pair[1].timestamp < pair[0].timestamp)
        {
            return Err(AppError::Validation(format!(
                "Report {} has out-of-order status history",
                self.id
            )));
        }

        if self.duplicate_count == 0 {
            return Err(AppError::Validation(format!(
                "Report {} has a zero duplicate count",
                self.id
            )));
        }

        Ok(())
    }

    pub fn last_history_timestamp(&self) -> Option<DateTime<Utc>> {
        self.status_history.last().map(|entry| entry.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::sample_report;

    #[test]
    fn test_priority_range() {
        assert!(Priority::new(0).is_err());
        assert!(Priority::new(6).is_err());
        assert_eq!(Priority::new(1).unwrap().value(), 1);
        assert_eq!(Priority::new(5).unwrap().value(), 5);
    }

    #[test]
    fn test_priority_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Priority>("3").is_ok());
        assert!(serde_json::from_str::<Priority>("9").is_err());
        assert!(serde_json::from_str::<Priority>("-1").is_err());
    }

    #[test]
    fn test_category_parse_case_insensitive() {
        assert_eq!(
            "Infrastructure".parse::<ReportCategory>(),
            Ok(ReportCategory::Infrastructure)
        );
        assert_eq!(
            "potholes".parse::<ReportCategory>(),
            Err(AppError::invalid_filter("category", "potholes"))
        );
    }

    #[test]
    fn test_department_parse() {
        assert_eq!(
            "PUBLIC_WORKS".parse::<Department>(),
            Ok(Department::PublicWorks)
        );
        assert!("police".parse::<Department>().is_err());
    }

    #[test]
    fn test_submitted_report_starts_history() {
        let now = Utc::now();
        let report = Report::submitted(
            "CR-2025-001".to_string(),
            CreateReport {
                category: ReportCategory::Safety,
                priority: Priority::new(4).unwrap(),
                description: "Broken streetlight".to_string(),
                location: ReportLocation {
                    address: "456 Oak Avenue".to_string(),
                    coordinates: Coordinates {
                        lat: 40.7589,
                        lng: -73.9851,
                    },
                },
                citizen_name: "Michael Chen".to_string(),
                department: None,
            },
            now,
        )
        .unwrap();

        assert_eq!(report.status, ReportStatus::Submitted);
        assert_eq!(report.status_history.len(), 1);
        assert_eq!(report.status_history[0].actor, "Michael Chen");
        assert_eq!(report.duplicate_count, 1);
        assert_eq!(report.created_at, now);
    }

    #[test]
    fn test_validate_rejects_history_mismatch() {
        let mut report = sample_report("CR-2025-001", ReportStatus::Assigned, 3);
        assert!(report.validate().is_ok());

        report.status = ReportStatus::Completed;
        assert!(matches!(report.validate(), Err(AppError::Validation(_))));

        report.status_history.clear();
        assert!(matches!(report.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_bad_id_and_coordinates() {
        let mut report = sample_report("CR-2025-001", ReportStatus::Submitted, 3);
        report.id = "report-1".to_string();
        assert!(report.validate().is_err());

        let mut report = sample_report("CR-2025-001", ReportStatus::Submitted, 3);
        report.location.coordinates.lat = 123.0;
        assert!(report.validate().is_err());
    }

    #[test]
    fn test_submitted_rejects_blank_citizen() {
        let result = Report::submitted(
            "CR-2025-001".to_string(),
            CreateReport {
                category: ReportCategory::Safety,
                priority: Priority::new(2).unwrap(),
                description: "Graffiti on underpass".to_string(),
                location: ReportLocation {
                    address: "9 Canal Street".to_string(),
                    coordinates: Coordinates {
                        lat: 40.7191,
                        lng: -74.0011,
                    },
                },
                citizen_name: "   ".to_string(),
                department: None,
            },
            Utc::now(),
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_blank_actor() {
        let mut report = sample_report("CR-2025-001", ReportStatus::Submitted, 3);
        report.status_history[0].actor = " ".to_string();
        assert!(matches!(report.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_deserialize_defaults_duplicate_count() {
        let report = sample_report("CR-2025-001", ReportStatus::Submitted, 3);
        let mut value = serde_json::to_value(&report).unwrap();
        let obj = value.as_object_mut().unwrap();
        obj.remove("duplicate_count");
        obj.remove("department");
        obj.remove("photos");
        obj.remove("internal_comments");

        let parsed: Report = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.duplicate_count, 1);
        assert_eq!(parsed.department, None);
        assert!(parsed.photos.is_empty());
        assert!(parsed.internal_comments.is_empty());
    }
}
