use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// When a photo was taken relative to the repair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PhotoStage {
    Before,
    After,
}

impl PhotoStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoStage::Before => "before",
            PhotoStage::After => "after",
        }
    }
}

impl std::fmt::Display for PhotoStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reference to a photo documenting a report. Only the URL is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportPhoto {
    pub id: Uuid,
    pub stage: PhotoStage,
    pub url: String,
    pub caption: Option<String>,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Data for attaching a photo reference to a report
#[derive(Debug, Clone)]
pub struct CreateReportPhoto {
    pub stage: PhotoStage,
    pub url: String,
    pub caption: Option<String>,
    pub uploaded_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_stage_serde() {
        assert_eq!(
            serde_json::to_string(&PhotoStage::After).unwrap(),
            "\"after\""
        );
        assert!(serde_json::from_str::<PhotoStage>("\"during\"").is_err());
    }
}
