use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::reports::models::{Coordinates, ReportCluster};
use crate::features::reports::services::AggregateCounts;

// ============================================================================
// Summary
// ============================================================================

/// Headline numbers for the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummaryDto {
    pub total_reports: usize,
    /// Not completed, closed or rejected
    pub active_count: usize,
    /// Priority 4 or 5
    pub urgent_count: usize,
    /// Active and older than the overdue threshold
    pub overdue_count: usize,
    /// Completed with their last update on the current UTC day
    pub completed_today: usize,
}

// ============================================================================
// Counts
// ============================================================================

/// Report counts per category, status and priority.
///
/// Every known key is present, with zero when nothing matches.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardCountsDto {
    pub total: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<String, usize>,
}

impl From<AggregateCounts> for DashboardCountsDto {
    fn from(c: AggregateCounts) -> Self {
        Self {
            total: c.total,
            by_category: c
                .by_category
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            by_status: c
                .by_status
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            by_priority: c
                .by_priority
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }
}

// ============================================================================
// Map Clusters
// ============================================================================

/// One map cluster
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClusterMarkerDto {
    /// Grid cell as `lat_index:lng_index`
    pub cell_key: String,
    pub center: Coordinates,
    pub count: usize,
    pub max_priority: u8,
    pub report_ids: Vec<String>,
}

impl From<ReportCluster> for ClusterMarkerDto {
    fn from(c: ReportCluster) -> Self {
        Self {
            cell_key: c.cell_key.to_string(),
            center: c.center,
            count: c.count,
            max_priority: c.max_priority.value(),
            report_ids: c.member_ids,
        }
    }
}

/// Map data response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardClustersDto {
    pub clusters: Vec<ClusterMarkerDto>,
    pub total_reports: usize,
    pub cell_size_degrees: f64,
    /// Bounding box [min_lat, min_lng, max_lat, max_lng] of the cluster centers
    pub bounds: Option<[f64; 4]>,
}

/// Query params for map clusters
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ClusterQueryParams {
    /// Grid cell size in degrees (defaults to the configured size)
    pub cell_size_degrees: Option<f64>,
}
