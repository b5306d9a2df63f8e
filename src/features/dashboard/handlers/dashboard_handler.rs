use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::dashboard::dtos::*;
use crate::features::dashboard::services::DashboardService;
use crate::features::reports::dtos::ReportFilterParams;
use crate::shared::types::ApiResponse;

// ============================================================================
// Summary
// ============================================================================

/// Get headline dashboard metrics
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = ApiResponse<DashboardSummaryDto>)
    )
)]
pub async fn get_summary(
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<DashboardSummaryDto>>, AppError> {
    let summary = service.get_summary(Utc::now()).await;
    Ok(Json(ApiResponse::success(Some(summary), None, None)))
}

// ============================================================================
// Counts
// ============================================================================

/// Count reports per category, status and priority
#[utoipa::path(
    get,
    path = "/api/dashboard/counts",
    tag = "Dashboard",
    params(ReportFilterParams),
    responses(
        (status = 200, description = "Aggregate counts over the filtered reports", body = ApiResponse<DashboardCountsDto>),
        (status = 400, description = "Unsupported filter value")
    )
)]
pub async fn get_counts(
    State(service): State<Arc<DashboardService>>,
    Query(params): Query<ReportFilterParams>,
) -> Result<Json<ApiResponse<DashboardCountsDto>>, AppError> {
    let filter = params.to_filter_spec(Utc::now())?;
    let counts = service.get_counts(&filter).await;
    Ok(Json(ApiResponse::success(Some(counts), None, None)))
}

// ============================================================================
// Map Clusters
// ============================================================================

/// Get map clusters for the filtered reports
#[utoipa::path(
    get,
    path = "/api/dashboard/clusters",
    tag = "Dashboard",
    params(ReportFilterParams, ClusterQueryParams),
    responses(
        (status = 200, description = "Map clusters", body = ApiResponse<DashboardClustersDto>),
        (status = 400, description = "Unsupported filter value or cell size")
    )
)]
pub async fn get_clusters(
    State(service): State<Arc<DashboardService>>,
    Query(params): Query<ReportFilterParams>,
    Query(cluster_params): Query<ClusterQueryParams>,
) -> Result<Json<ApiResponse<DashboardClustersDto>>, AppError> {
    let filter = params.to_filter_spec(Utc::now())?;
    let data = service
        .get_clusters(&filter, cluster_params.cell_size_degrees)
        .await?;
    Ok(Json(ApiResponse::success(Some(data), None, None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ReportsConfig;
    use crate::features::dashboard::routes;
    use crate::features::reports::services::ReportService;
    use crate::shared::test_helpers::dashboard_reports;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    fn server() -> TestServer {
        let reports = Arc::new(ReportService::with_reports(dashboard_reports()).unwrap());
        let service = DashboardService::new(reports, ReportsConfig::default());
        TestServer::new(routes(Arc::new(service))).unwrap()
    }

    #[tokio::test]
    async fn test_summary() {
        let body: Value = server().get("/api/dashboard/summary").await.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["total_reports"], 5);
        assert_eq!(body["data"]["active_count"], 4);
        assert_eq!(body["data"]["urgent_count"], 2);
    }

    #[tokio::test]
    async fn test_counts_with_filter() {
        let server = server();
        let response = server
            .get("/api/dashboard/counts")
            .add_query_param("status", "all")
            .add_query_param("search", "street")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        // Two street addresses plus the streetlight description
        assert_eq!(body["data"]["total"], 3);
        assert_eq!(body["data"]["by_category"]["transportation"], 0);

        server
            .get("/api/dashboard/counts")
            .add_query_param("department", "police")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_clusters() {
        let server = server();
        let response = server
            .get("/api/dashboard/clusters")
            .add_query_param("cell_size_degrees", "5")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["clusters"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["clusters"][0]["count"], 5);

        server
            .get("/api/dashboard/clusters")
            .add_query_param("cell_size_degrees", "-1")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
