use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Staff-only note attached to a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InternalComment {
    pub id: Uuid,
    pub author: String,
    pub role: Option<String>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Data for adding an internal comment
#[derive(Debug, Clone)]
pub struct CreateInternalComment {
    pub author: String,
    pub role: Option<String>,
    pub content: String,
}
