use utoipa::{Modify, OpenApi};

use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Reports
        reports_handlers::list_reports,
        reports_handlers::create_report,
        reports_handlers::get_report,
        reports_handlers::update_report_status,
        reports_handlers::update_report_priority,
        reports_handlers::update_report_assignment,
        reports_handlers::merge_duplicates,
        reports_handlers::list_nearby_reports,
        reports_handlers::list_internal_comments,
        reports_handlers::add_internal_comment,
        reports_handlers::add_report_photo,
        reports_handlers::delete_report_photo,
        reports_handlers::list_statuses,
        // Dashboard
        dashboard_handlers::get_summary,
        dashboard_handlers::get_counts,
        dashboard_handlers::get_clusters,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Reports
            reports_models::ReportStatus,
            reports_models::ReportCategory,
            reports_models::Department,
            reports_models::Coordinates,
            reports_models::ReportLocation,
            reports_models::StatusHistoryEntry,
            reports_models::InternalComment,
            reports_models::PhotoStage,
            reports_models::ReportPhoto,
            reports_dtos::ReportResponseDto,
            reports_dtos::ReportDetailResponseDto,
            reports_dtos::StatusInfoDto,
            reports_dtos::NearbyReportDto,
            reports_dtos::CreateReportDto,
            reports_dtos::UpdateReportStatusDto,
            reports_dtos::UpdatePriorityDto,
            reports_dtos::UpdateAssignmentDto,
            reports_dtos::MergeDuplicatesDto,
            reports_dtos::CreateInternalCommentDto,
            reports_dtos::CreateReportPhotoDto,
            ApiResponse<reports_models::InternalComment>,
            ApiResponse<Vec<reports_models::InternalComment>>,
            ApiResponse<reports_models::ReportPhoto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<reports_dtos::ReportDetailResponseDto>,
            ApiResponse<Vec<reports_dtos::NearbyReportDto>>,
            ApiResponse<Vec<reports_dtos::StatusInfoDto>>,
            // Dashboard
            dashboard_dtos::DashboardSummaryDto,
            dashboard_dtos::DashboardCountsDto,
            dashboard_dtos::ClusterMarkerDto,
            dashboard_dtos::DashboardClustersDto,
            ApiResponse<dashboard_dtos::DashboardSummaryDto>,
            ApiResponse<dashboard_dtos::DashboardCountsDto>,
            ApiResponse<dashboard_dtos::DashboardClustersDto>,
        )
    ),
    tags(
        (name = "reports", description = "Citizen reports and their lifecycle"),
        (name = "Dashboard", description = "Admin dashboard metrics and map clusters"),
    ),
    info(
        title = "CivicReport API",
        version = "0.1.0",
        description = "API documentation for CivicReport",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
