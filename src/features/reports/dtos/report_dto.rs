use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{
    Coordinates, CreateInternalComment, CreateReport, CreateReportPhoto, DateRangePreset,
    DateWindow, Department, FilterSpec, InternalComment, PhotoStage, Priority, Report,
    ReportCategory, ReportLocation, ReportPhoto, ReportStatus, SortDirection, SortField,
    SortSpec, StatusHistoryEntry, TransitionTable,
};
use crate::features::reports::services::{ReportLifecycle, TransitionRequest};

// =============================================================================
// RESPONSES
// =============================================================================

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: String,
    pub category: ReportCategory,
    pub status: ReportStatus,
    pub status_label: String,
    pub priority: u8,
    pub description: String,
    pub location: ReportLocation,
    pub citizen_name: String,
    pub assigned_to: Option<String>,
    pub department: Option<Department>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status_history: Vec<StatusHistoryEntry>,
    pub duplicate_count: u32,
    pub photos: Vec<ReportPhoto>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            category: r.category,
            status: r.status,
            status_label: r.status.describe().label.to_string(),
            priority: r.priority.value(),
            description: r.description,
            location: r.location,
            citizen_name: r.citizen_name,
            assigned_to: r.assigned_to,
            department: r.department,
            created_at: r.created_at,
            updated_at: r.updated_at,
            status_history: r.status_history,
            duplicate_count: r.duplicate_count,
            photos: r.photos,
        }
    }
}

/// Response DTO for report with the statuses it can move to next
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportDetailResponseDto {
    #[serde(flatten)]
    pub report: ReportResponseDto,
    pub available_statuses: Vec<StatusInfoDto>,
    /// Staff-only notes, oldest first
    pub internal_comments: Vec<InternalComment>,
}

impl From<Report> for ReportDetailResponseDto {
    fn from(r: Report) -> Self {
        let available_statuses = ReportLifecycle::available_transitions(&r)
            .iter()
            .copied()
            .map(StatusInfoDto::from)
            .collect();

        let internal_comments = r.internal_comments.clone();

        Self {
            report: r.into(),
            available_statuses,
            internal_comments,
        }
    }
}

/// Display metadata for a status, with its outgoing transitions
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusInfoDto {
    pub status: ReportStatus,
    pub label: String,
    pub icon: String,
    pub description: String,
    pub requires_comment: bool,
    pub next_statuses: Vec<ReportStatus>,
}

impl From<ReportStatus> for StatusInfoDto {
    fn from(status: ReportStatus) -> Self {
        let info = status.describe();
        Self {
            status,
            label: info.label.to_string(),
            icon: info.icon.to_string(),
            description: info.description.to_string(),
            requires_comment: status.requires_comment(),
            next_statuses: TransitionTable::next_statuses(status).to_vec(),
        }
    }
}

/// A report near another one, with its distance
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NearbyReportDto {
    #[serde(flatten)]
    pub report: ReportResponseDto,
    pub distance_meters: f64,
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Request DTO for submitting a new report
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReportDto {
    pub category: ReportCategory,

    #[validate(range(min = 1, max = 5, message = "Priority must be between 1 and 5"))]
    pub priority: u8,

    #[validate(length(
        min = 1,
        max = 2000,
        message = "Description must be between 1 and 2000 characters"
    ))]
    pub description: String,

    #[validate(length(
        min = 1,
        max = 500,
        message = "Address must be between 1 and 500 characters"
    ))]
    pub address: String,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lng: f64,

    #[validate(length(
        min = 1,
        max = 128,
        message = "Citizen name must be between 1 and 128 characters"
    ))]
    pub citizen_name: String,

    pub department: Option<Department>,
}

impl CreateReportDto {
    pub fn into_create_report(self) -> Result<CreateReport> {
        if self.citizen_name.trim().is_empty() {
            return Err(AppError::Validation(
                "Citizen name must not be blank".to_string(),
            ));
        }

        Ok(CreateReport {
            category: self.category,
            priority: Priority::new(self.priority)?,
            description: self.description.trim().to_string(),
            location: ReportLocation {
                address: self.address.trim().to_string(),
                coordinates: Coordinates {
                    lat: self.lat,
                    lng: self.lng,
                },
            },
            citizen_name: self.citizen_name.trim().to_string(),
            department: self.department,
        })
    }
}

/// Request DTO for updating report status
///
/// `status` is taken as a string so unknown values surface as an unknown
/// status rather than a JSON error.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateReportStatusDto {
    pub status: String,

    #[validate(length(max = 128, message = "Actor must not exceed 128 characters"))]
    pub actor: String,

    #[validate(length(max = 2000, message = "Comment must not exceed 2000 characters"))]
    pub comment: Option<String>,

    #[validate(length(max = 255, message = "Assignee must not exceed 255 characters"))]
    pub assigned_to: Option<String>,
}

impl UpdateReportStatusDto {
    pub fn into_request(self) -> Result<TransitionRequest> {
        Ok(TransitionRequest {
            target: self.status.parse()?,
            actor: self.actor,
            comment: self.comment,
            assigned_to: self.assigned_to,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdatePriorityDto {
    #[validate(range(min = 1, max = 5, message = "Priority must be between 1 and 5"))]
    pub priority: u8,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAssignmentDto {
    #[validate(length(max = 255, message = "Assignee must not exceed 255 characters"))]
    pub assigned_to: Option<String>,
    pub department: Option<Department>,
}

/// Request DTO for folding duplicate reports into the path report
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct MergeDuplicatesDto {
    #[validate(length(min = 1, message = "At least one duplicate report is required"))]
    pub duplicate_ids: Vec<String>,

    #[validate(length(
        min = 1,
        max = 128,
        message = "Actor must be between 1 and 128 characters"
    ))]
    pub actor: String,
}

/// Request DTO for a staff-only comment
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateInternalCommentDto {
    #[validate(length(
        min = 1,
        max = 128,
        message = "Author must be between 1 and 128 characters"
    ))]
    pub author: String,

    #[validate(length(max = 128, message = "Role must not exceed 128 characters"))]
    pub role: Option<String>,

    #[validate(length(
        min = 1,
        max = 2000,
        message = "Comment must be between 1 and 2000 characters"
    ))]
    pub content: String,
}

impl From<CreateInternalCommentDto> for CreateInternalComment {
    fn from(dto: CreateInternalCommentDto) -> Self {
        Self {
            author: dto.author,
            role: dto.role,
            content: dto.content,
        }
    }
}

/// Request DTO for attaching a photo reference
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReportPhotoDto {
    pub stage: PhotoStage,

    #[validate(url(message = "Photo url must be a valid URL"))]
    pub url: String,

    #[validate(length(max = 500, message = "Caption must not exceed 500 characters"))]
    pub caption: Option<String>,

    #[validate(length(
        min = 1,
        max = 128,
        message = "Uploader must be between 1 and 128 characters"
    ))]
    pub uploaded_by: String,
}

impl From<CreateReportPhotoDto> for CreateReportPhoto {
    fn from(dto: CreateReportPhotoDto) -> Self {
        Self {
            stage: dto.stage,
            url: dto.url,
            caption: dto.caption,
            uploaded_by: dto.uploaded_by,
        }
    }
}

// =============================================================================
// QUERY PARAMS
// =============================================================================

/// Filter and sort query parameters shared by report listings and dashboards.
///
/// Values are kept as raw strings and checked by [`ReportFilterParams::to_filter_spec`]
/// so that unsupported values are reported by field name.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ReportFilterParams {
    /// Category (`all` for no filter)
    pub category: Option<String>,
    /// Status (`all` for no filter)
    pub status: Option<String>,
    /// Exact priority 1-5 (`all` for no filter)
    pub priority: Option<String>,
    /// Department (`all` for no filter)
    pub department: Option<String>,
    /// Relative window: 1d, 7d, 30d, 90d or custom
    pub date_range: Option<String>,
    /// Start date for a custom range (YYYY-MM-DD)
    pub from: Option<String>,
    /// End date for a custom range (YYYY-MM-DD, inclusive)
    pub to: Option<String>,
    /// Search in id, description and address
    pub search: Option<String>,
    /// created_at, priority, status, category or address
    pub sort_by: Option<String>,
    /// asc or desc (default: desc)
    pub sort_direction: Option<String>,
}

/// `None` for absent, empty or `all`
fn selected(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::invalid_filter(field, value))
}

impl ReportFilterParams {
    pub fn to_filter_spec(&self, now: DateTime<Utc>) -> Result<FilterSpec> {
        let category = selected(&self.category)
            .map(str::parse::<ReportCategory>)
            .transpose()?;

        let status = selected(&self.status)
            .map(|v| {
                v.parse::<ReportStatus>()
                    .map_err(|_| AppError::invalid_filter("status", v))
            })
            .transpose()?;

        let priority = selected(&self.priority)
            .map(|v| {
                v.parse::<u8>()
                    .ok()
                    .and_then(|p| Priority::new(p).ok())
                    .ok_or_else(|| AppError::invalid_filter("priority", v))
            })
            .transpose()?;

        let department = selected(&self.department)
            .map(str::parse::<Department>)
            .transpose()?;

        let spec = FilterSpec {
            category,
            status,
            priority,
            department,
            date_range: self.date_window(now)?,
            search_query: None,
        };

        Ok(spec.with_search(self.search.as_deref().unwrap_or_default()))
    }

    fn date_window(&self, now: DateTime<Utc>) -> Result<Option<DateWindow>> {
        let preset = match selected(&self.date_range) {
            Some(raw) => raw.parse::<DateRangePreset>()?,
            None => return Ok(None),
        };

        if let Some(window) = preset.window(now) {
            return Ok(Some(window));
        }

        let from = selected(&self.from)
            .map(|v| parse_date("from", v))
            .transpose()?;
        let to = selected(&self.to).map(|v| parse_date("to", v)).transpose()?;

        if from.is_none() && to.is_none() {
            return Err(AppError::invalid_filter("date_range", "custom without from/to"));
        }
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(AppError::invalid_filter(
                    "date_range",
                    format!("{} > {}", from, to),
                ));
            }
        }

        let start = from
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|d| d.and_utc());
        let end = to
            .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
            .map(|d| d.and_utc());

        Ok(Some(DateWindow { start, end }))
    }

    pub fn to_sort_spec(&self) -> Result<SortSpec> {
        Ok(SortSpec {
            field: self
                .sort_by
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(str::parse::<SortField>)
                .transpose()?
                .unwrap_or_default(),
            direction: self
                .sort_direction
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(str::parse::<SortDirection>)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct NearbyQueryParams {
    /// Search radius in meters (defaults to the configured radius)
    pub radius_meters: Option<f64>,
}
