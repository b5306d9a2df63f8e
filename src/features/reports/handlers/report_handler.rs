use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::core::config::ReportsConfig;
use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::reports::dtos::{
    CreateInternalCommentDto, CreateReportDto, CreateReportPhotoDto, MergeDuplicatesDto,
    NearbyQueryParams, NearbyReportDto, ReportDetailResponseDto, ReportFilterParams,
    ReportResponseDto, StatusInfoDto, UpdateAssignmentDto, UpdatePriorityDto,
    UpdateReportStatusDto,
};
use crate::features::reports::models::{InternalComment, Priority, ReportPhoto, ReportStatus};
use crate::features::reports::services::ReportService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub config: ReportsConfig,
}

/// List reports with filters, sorting and pagination
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportFilterParams, PaginationQuery),
    responses(
        (status = 200, description = "Filtered list of reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 400, description = "Unsupported filter or sort value")
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(state): State<ReportState>,
    Query(params): Query<ReportFilterParams>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let filter = params.to_filter_spec(Utc::now())?;
    let sort = params.to_sort_spec()?;

    let reports = state.report_service.list(&filter, sort).await;
    let total = reports.len() as i64;
    let dtos: Vec<ReportResponseDto> = pagination
        .apply(reports)
        .into_iter()
        .map(|r| r.into())
        .collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Submit a new report
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report created", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "reports"
)]
pub async fn create_report(
    State(state): State<ReportState>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = state
        .report_service
        .create(dto.into_create_report()?)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report submitted".to_string()),
            None,
        )),
    ))
}

/// Get report by ID with the statuses it can move to next
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = String, Path, description = "Report ID, e.g. CR-2025-001")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportDetailResponseDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(state): State<ReportState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReportDetailResponseDto>>> {
    let report = state.report_service.get_by_id(&id).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Move a report to another lifecycle status
#[utoipa::path(
    patch,
    path = "/api/reports/{id}/status",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportDetailResponseDto>),
        (status = 400, description = "Unknown status, missing comment or missing actor"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Transition not allowed from the current status")
    ),
    tag = "reports"
)]
pub async fn update_report_status(
    State(state): State<ReportState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportDetailResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = state
        .report_service
        .transition(&id, dto.into_request()?)
        .await?;

    let message = format!("Status updated to {}", report.status.describe().label);
    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some(message),
        None,
    )))
}

/// Override a report's priority
#[utoipa::path(
    patch,
    path = "/api/reports/{id}/priority",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    request_body = UpdatePriorityDto,
    responses(
        (status = 200, description = "Priority updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Priority out of range"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Report is closed or rejected")
    ),
    tag = "reports"
)]
pub async fn update_report_priority(
    State(state): State<ReportState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdatePriorityDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = state
        .report_service
        .update_priority(&id, Priority::new(dto.priority)?)
        .await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Change who handles a report without changing its status
#[utoipa::path(
    patch,
    path = "/api/reports/{id}/assignment",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    request_body = UpdateAssignmentDto,
    responses(
        (status = 200, description = "Assignment updated", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Report is closed or rejected")
    ),
    tag = "reports"
)]
pub async fn update_report_assignment(
    State(state): State<ReportState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateAssignmentDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = state
        .report_service
        .update_assignment(&id, dto.assigned_to, dto.department)
        .await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Merge duplicate reports into this one
#[utoipa::path(
    post,
    path = "/api/reports/{id}/merge",
    params(
        ("id" = String, Path, description = "Primary report ID")
    ),
    request_body = MergeDuplicatesDto,
    responses(
        (status = 200, description = "Duplicates merged", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid duplicate list"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "A duplicate can no longer be rejected")
    ),
    tag = "reports"
)]
pub async fn merge_duplicates(
    State(state): State<ReportState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<MergeDuplicatesDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = state
        .report_service
        .merge_duplicates(&id, &dto.duplicate_ids, &dto.actor)
        .await?;

    let message = format!("Merged {} duplicate report(s)", dto.duplicate_ids.len());
    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some(message),
        None,
    )))
}

/// Reports close to this one, nearest first
#[utoipa::path(
    get,
    path = "/api/reports/{id}/nearby",
    params(
        ("id" = String, Path, description = "Report ID"),
        NearbyQueryParams
    ),
    responses(
        (status = 200, description = "Nearby reports", body = ApiResponse<Vec<NearbyReportDto>>),
        (status = 400, description = "Invalid radius"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn list_nearby_reports(
    State(state): State<ReportState>,
    Path(id): Path<String>,
    Query(params): Query<NearbyQueryParams>,
) -> Result<Json<ApiResponse<Vec<NearbyReportDto>>>> {
    let radius = params
        .radius_meters
        .unwrap_or(state.config.nearby_radius_meters);

    let nearby = state.report_service.find_nearby(&id, radius).await?;
    let total = nearby.len() as i64;
    let dtos: Vec<NearbyReportDto> = nearby
        .into_iter()
        .map(|(report, distance_meters)| NearbyReportDto {
            report: report.into(),
            distance_meters,
        })
        .collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Internal staff comments on a report, oldest first
#[utoipa::path(
    get,
    path = "/api/reports/{id}/comments",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Internal comments", body = ApiResponse<Vec<InternalComment>>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn list_internal_comments(
    State(state): State<ReportState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<InternalComment>>>> {
    let comments = state.report_service.list_internal_comments(&id).await?;
    let total = comments.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(comments),
        None,
        Some(Meta { total }),
    )))
}

/// Add an internal staff comment to a report
#[utoipa::path(
    post,
    path = "/api/reports/{id}/comments",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    request_body = CreateInternalCommentDto,
    responses(
        (status = 201, description = "Comment added", body = ApiResponse<InternalComment>),
        (status = 400, description = "Blank author or content"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn add_internal_comment(
    State(state): State<ReportState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<CreateInternalCommentDto>,
) -> Result<(StatusCode, Json<ApiResponse<InternalComment>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let comment = state
        .report_service
        .add_internal_comment(&id, dto.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(comment),
            Some("Comment added".to_string()),
            None,
        )),
    ))
}

/// Attach a photo reference to a report
#[utoipa::path(
    post,
    path = "/api/reports/{id}/photos",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    request_body = CreateReportPhotoDto,
    responses(
        (status = 201, description = "Photo attached", body = ApiResponse<ReportPhoto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Report is closed or rejected")
    ),
    tag = "reports"
)]
pub async fn add_report_photo(
    State(state): State<ReportState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<CreateReportPhotoDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportPhoto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let photo = state.report_service.add_photo(&id, dto.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(photo),
            Some("Photo attached".to_string()),
            None,
        )),
    ))
}

/// Remove a photo reference from a report
#[utoipa::path(
    delete,
    path = "/api/reports/{id}/photos/{photo_id}",
    params(
        ("id" = String, Path, description = "Report ID"),
        ("photo_id" = Uuid, Path, description = "Photo ID")
    ),
    responses(
        (status = 200, description = "Photo removed", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report or photo not found"),
        (status = 409, description = "Report is closed or rejected")
    ),
    tag = "reports"
)]
pub async fn delete_report_photo(
    State(state): State<ReportState>,
    Path((id, photo_id)): Path<(String, Uuid)>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.report_service.remove_photo(&id, photo_id).await?;
    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some("Photo removed".to_string()),
        None,
    )))
}

/// Status taxonomy and transition table
#[utoipa::path(
    get,
    path = "/api/statuses",
    responses(
        (status = 200, description = "All statuses with their next statuses", body = ApiResponse<Vec<StatusInfoDto>>)
    ),
    tag = "reports"
)]
pub async fn list_statuses() -> Json<ApiResponse<Vec<StatusInfoDto>>> {
    let statuses = ReportStatus::ALL
        .into_iter()
        .map(StatusInfoDto::from)
        .collect();
    Json(ApiResponse::success(Some(statuses), None, None))
}
