use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::core::config::ReportsConfig;
use crate::features::reports::handlers::{self, ReportState};
use crate::features::reports::services::ReportService;

/// Create routes for the reports feature
pub fn routes(report_service: Arc<ReportService>, config: ReportsConfig) -> Router {
    let state = ReportState {
        report_service,
        config,
    };

    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route("/api/reports/{id}", get(handlers::get_report))
        .route(
            "/api/reports/{id}/status",
            patch(handlers::update_report_status),
        )
        .route(
            "/api/reports/{id}/priority",
            patch(handlers::update_report_priority),
        )
        .route(
            "/api/reports/{id}/assignment",
            patch(handlers::update_report_assignment),
        )
        .route("/api/reports/{id}/merge", post(handlers::merge_duplicates))
        .route(
            "/api/reports/{id}/nearby",
            get(handlers::list_nearby_reports),
        )
        .route(
            "/api/reports/{id}/comments",
            get(handlers::list_internal_comments).post(handlers::add_internal_comment),
        )
        .route("/api/reports/{id}/photos", post(handlers::add_report_photo))
        .route(
            "/api/reports/{id}/photos/{photo_id}",
            delete(handlers::delete_report_photo),
        )
        .route("/api/statuses", get(handlers::list_statuses))
        .with_state(state)
}
