use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::core::config::ReportsConfig;
use crate::core::error::Result;
use crate::features::dashboard::dtos::*;
use crate::features::reports::models::{FilterSpec, Report, ReportStatus};
use crate::features::reports::services::{ClusterAggregator, ReportQueryEngine, ReportService};
use crate::shared::constants::URGENT_PRIORITY;

/// Service for admin dashboard queries
pub struct DashboardService {
    report_service: Arc<ReportService>,
    config: ReportsConfig,
}

impl DashboardService {
    pub fn new(report_service: Arc<ReportService>, config: ReportsConfig) -> Self {
        Self {
            report_service,
            config,
        }
    }

    // ========================================================================
    // Summary
    // ========================================================================

    pub async fn get_summary(&self, now: DateTime<Utc>) -> DashboardSummaryDto {
        let reports = self.report_service.snapshot().await;
        summarize(&reports, now, Duration::days(self.config.overdue_after_days))
    }

    // ========================================================================
    // Counts
    // ========================================================================

    pub async fn get_counts(&self, filter: &FilterSpec) -> DashboardCountsDto {
        let reports = self.report_service.snapshot().await;
        let matching = ReportQueryEngine::filter(&reports, filter);
        ReportQueryEngine::aggregate_counts(&matching).into()
    }

    // ========================================================================
    // Map Clusters
    // ========================================================================

    pub async fn get_clusters(
        &self,
        filter: &FilterSpec,
        cell_size_degrees: Option<f64>,
    ) -> Result<DashboardClustersDto> {
        let cell_size_degrees = cell_size_degrees.unwrap_or(self.config.cluster_cell_size_degrees);

        let reports = self.report_service.snapshot().await;
        let matching = ReportQueryEngine::filter(&reports, filter);
        let clusters = ClusterAggregator::cluster(&matching, cell_size_degrees)?;

        let bounds = clusters.iter().fold(None, |acc: Option<[f64; 4]>, c| {
            let (lat, lng) = (c.center.lat, c.center.lng);
            Some(match acc {
                None => [lat, lng, lat, lng],
                Some([min_lat, min_lng, max_lat, max_lng]) => [
                    min_lat.min(lat),
                    min_lng.min(lng),
                    max_lat.max(lat),
                    max_lng.max(lng),
                ],
            })
        });

        Ok(DashboardClustersDto {
            clusters: clusters.into_iter().map(ClusterMarkerDto::from).collect(),
            total_reports: matching.len(),
            cell_size_degrees,
            bounds,
        })
    }
}

/// Headline metrics over `reports` as of `now`
pub fn summarize(reports: &[Report], now: DateTime<Utc>, overdue_after: Duration) -> DashboardSummaryDto {
    let today = now.date_naive();

    reports.iter().fold(DashboardSummaryDto::default(), |mut acc, r| {
        let active = r.status.is_active();

        acc.total_reports += 1;
        if active {
            acc.active_count += 1;
            if now - r.created_at > overdue_after {
                acc.overdue_count += 1;
            }
        }
        if r.priority.value() >= URGENT_PRIORITY {
            acc.urgent_count += 1;
        }
        if r.status == ReportStatus::Completed && r.updated_at.date_naive() == today {
            acc.completed_today += 1;
        }
        acc
    })
}
