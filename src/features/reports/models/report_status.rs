use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::AppError;

/// Report lifecycle status.
///
/// Variants are declared in transition-table order, which is also the order
/// used when sorting by status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Submitted,
    UnderReview,
    Assigned,
    InProgress,
    OnHold,
    Completed,
    Rejected,
    Closed,
}

/// Static display metadata for a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInfo {
    pub status: ReportStatus,
    pub label: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 8] = [
        ReportStatus::Submitted,
        ReportStatus::UnderReview,
        ReportStatus::Assigned,
        ReportStatus::InProgress,
        ReportStatus::OnHold,
        ReportStatus::Completed,
        ReportStatus::Rejected,
        ReportStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Submitted => "submitted",
            ReportStatus::UnderReview => "under_review",
            ReportStatus::Assigned => "assigned",
            ReportStatus::InProgress => "in_progress",
            ReportStatus::OnHold => "on_hold",
            ReportStatus::Completed => "completed",
            ReportStatus::Rejected => "rejected",
            ReportStatus::Closed => "closed",
        }
    }

    /// Label, icon key and description shown next to a status badge
    pub fn describe(&self) -> StatusInfo {
        let (label, icon, description) = match self {
            ReportStatus::Submitted => (
                "Submitted",
                "FileText",
                "Report has been submitted and is awaiting review",
            ),
            ReportStatus::UnderReview => (
                "Under Review",
                "Eye",
                "Report is being reviewed by municipal staff",
            ),
            ReportStatus::Assigned => (
                "Assigned",
                "UserCheck",
                "Report has been assigned to field crew",
            ),
            ReportStatus::InProgress => ("In Progress", "Clock", "Work is currently in progress"),
            ReportStatus::OnHold => ("On Hold", "Pause", "Work has been temporarily paused"),
            ReportStatus::Completed => (
                "Completed",
                "CheckCircle",
                "Work has been completed successfully",
            ),
            ReportStatus::Rejected => (
                "Rejected",
                "XCircle",
                "Report was rejected or could not be processed",
            ),
            ReportStatus::Closed => ("Closed", "CheckCircle2", "Report has been closed"),
        };

        StatusInfo {
            status: *self,
            label,
            icon,
            description,
        }
    }

    /// Moving into these statuses needs a justification from the actor
    pub fn requires_comment(&self) -> bool {
        matches!(
            self,
            ReportStatus::Assigned
                | ReportStatus::InProgress
                | ReportStatus::Completed
                | ReportStatus::OnHold
                | ReportStatus::Rejected
        )
    }

    /// Still being worked on (not completed, closed or rejected)
    pub fn is_active(&self) -> bool {
        !matches!(
            self,
            ReportStatus::Completed | ReportStatus::Closed | ReportStatus::Rejected
        )
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        ReportStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| AppError::UnknownStatus(s.to_string()))
    }
}
