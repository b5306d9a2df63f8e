use std::collections::HashMap;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{CellKey, Coordinates, Report, ReportCluster};
use crate::shared::constants::EARTH_RADIUS_METERS;

/// Groups report coordinates for map display and proximity lookups
pub struct ClusterAggregator;

struct CellAccumulator {
    key: CellKey,
    lat_sum: f64,
    lng_sum: f64,
    reports: Vec<usize>,
}

impl ClusterAggregator {
    /// Calculate Haversine distance between two points in meters
    pub fn haversine_distance(a: &Coordinates, b: &Coordinates) -> f64 {
        let lat1_rad = a.lat.to_radians();
        let lat2_rad = b.lat.to_radians();
        let delta_lat = (b.lat - a.lat).to_radians();
        let delta_lng = (b.lng - a.lng).to_radians();

        let h = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * h.sqrt().asin();

        EARTH_RADIUS_METERS * c
    }

    /// Bin reports into square grid cells of `cell_size_degrees`.
    ///
    /// Clusters come back in the order their first member appears in
    /// `reports`; the center is the plain mean of member coordinates.
    pub fn cluster(reports: &[Report], cell_size_degrees: f64) -> Result<Vec<ReportCluster>> {
        // Cell indices must fit in i64 for every longitude in [-180, 180]
        if !cell_size_degrees.is_finite()
            || cell_size_degrees <= 0.0
            || 180.0 / cell_size_degrees >= i64::MAX as f64
        {
            return Err(AppError::invalid_filter(
                "cell_size",
                cell_size_degrees.to_string(),
            ));
        }

        let mut index: HashMap<CellKey, usize> = HashMap::new();
        let mut cells: Vec<CellAccumulator> = Vec::new();

        for (position, report) in reports.iter().enumerate() {
            let coordinates = &report.location.coordinates;
            let key = CellKey::for_coordinates(coordinates, cell_size_degrees);

            let slot = *index.entry(key).or_insert_with(|| {
                cells.push(CellAccumulator {
                    key,
                    lat_sum: 0.0,
                    lng_sum: 0.0,
                    reports: Vec::new(),
                });
                cells.len() - 1
            });

            let cell = &mut cells[slot];
            cell.lat_sum += coordinates.lat;
            cell.lng_sum += coordinates.lng;
            cell.reports.push(position);
        }

        let clusters = cells
            .into_iter()
            .filter_map(|cell| {
                let members: Vec<&Report> = cell.reports.iter().map(|i| &reports[*i]).collect();
                let max_priority = members.iter().map(|r| r.priority).max()?;
                let count = members.len();

                Some(ReportCluster {
                    cell_key: cell.key,
                    center: Coordinates {
                        lat: cell.lat_sum / count as f64,
                        lng: cell.lng_sum / count as f64,
                    },
                    count,
                    max_priority,
                    member_ids: members.iter().map(|r| r.id.clone()).collect(),
                })
            })
            .collect();

        Ok(clusters)
    }

    /// Other reports within `radius_meters` of `origin`, nearest first
    pub fn nearby<'a>(
        origin: &Report,
        reports: &'a [Report],
        radius_meters: f64,
    ) -> Vec<(&'a Report, f64)> {
        let mut found: Vec<(&Report, f64)> = reports
            .iter()
            .filter(|r| r.id != origin.id)
            .map(|r| {
                let distance = Self::haversine_distance(
                    &origin.location.coordinates,
                    &r.location.coordinates,
                );
                (r, distance)
            })
            .filter(|(_, distance)| *distance <= radius_meters)
            .collect();

        found.sort_by(|a, b| a.1.total_cmp(&b.1));
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::sample_report_at;
    use fake::Fake;

    #[test]
    fn test_haversine_distance() {
        // Test with known coordinates (Jakarta to Bandung, approx 116km by Haversine)
        let jakarta = Coordinates {
            lat: -6.2088,
            lng: 106.8456,
        };
        let bandung = Coordinates {
            lat: -6.9175,
            lng: 107.6191,
        };

        let distance = ClusterAggregator::haversine_distance(&jakarta, &bandung);

        assert!(distance > 110_000.0 && distance < 125_000.0);
    }

    #[test]
    fn test_haversine_same_point() {
        let point = Coordinates {
            lat: 40.7128,
            lng: -74.0060,
        };
        assert!(ClusterAggregator::haversine_distance(&point, &point) < 1.0);
    }

    #[test]
    fn test_cluster_two_cells() {
        let reports = vec![
            sample_report_at("CR-2025-001", 40.71, -74.00, 2),
            sample_report_at("CR-2025-002", 40.71, -74.00, 4),
            sample_report_at("CR-2025-003", 40.80, -73.90, 3),
        ];

        let clusters = ClusterAggregator::cluster(&reports, 0.05).unwrap();
        assert_eq!(clusters.len(), 2);

        assert_eq!(clusters[0].count, 2);
        assert!((clusters[0].center.lat - 40.71).abs() < 1e-9);
        assert!((clusters[0].center.lng + 74.00).abs() < 1e-9);
        assert_eq!(clusters[0].max_priority.value(), 4);
        assert_eq!(clusters[0].member_ids, vec!["CR-2025-001", "CR-2025-002"]);

        assert_eq!(clusters[1].count, 1);
        assert!((clusters[1].center.lat - 40.80).abs() < 1e-9);
        assert!((clusters[1].center.lng + 73.90).abs() < 1e-9);
    }

    #[test]
    fn test_cluster_center_is_mean() {
        let reports = vec![
            sample_report_at("CR-2025-001", 40.712, -74.004, 1),
            sample_report_at("CR-2025-002", 40.718, -74.008, 1),
        ];
        let clusters = ClusterAggregator::cluster(&reports, 0.05).unwrap();
        assert_eq!(clusters.len(), 1);
        assert!((clusters[0].center.lat - 40.715).abs() < 1e-9);
        assert!((clusters[0].center.lng + 74.006).abs() < 1e-9);
    }

    #[test]
    fn test_cluster_degenerate_inputs() {
        assert!(ClusterAggregator::cluster(&[], 0.01).unwrap().is_empty());

        let single = vec![sample_report_at("CR-2025-001", -6.2088, 106.8456, 5)];
        let clusters = ClusterAggregator::cluster(&single, 0.01).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].count, 1);
        assert_eq!(clusters[0].center, single[0].location.coordinates);
    }

    #[test]
    fn test_cluster_rejects_bad_cell_size() {
        let reports = vec![sample_report_at("CR-2025-001", 40.71, -74.00, 2)];
        for size in [0.0, -0.5, f64::NAN, f64::INFINITY, 1e-300, f64::MIN_POSITIVE] {
            assert!(matches!(
                ClusterAggregator::cluster(&reports, size),
                Err(AppError::InvalidFilterValue { .. })
            ));
        }
    }

    #[test]
    fn test_cluster_counts_sum_to_input() {
        let reports: Vec<Report> = (0..200)
            .map(|i| {
                let lat: f64 = (40.0..41.0).fake();
                let lng: f64 = (-74.5..-73.5).fake();
                let priority: u8 = (1u8..=5).fake();
                sample_report_at(&format!("CR-2025-{:03}", i), lat, lng, priority)
            })
            .collect();

        for size in [0.01, 0.1, 0.5, 5.0] {
            let clusters = ClusterAggregator::cluster(&reports, size).unwrap();
            let total: usize = clusters.iter().map(|c| c.count).sum();
            assert_eq!(total, reports.len());
        }
    }

    #[test]
    fn test_nearby_sorted_by_distance() {
        let origin = sample_report_at("CR-2025-001", 40.7128, -74.0060, 3);
        let reports = vec![
            origin.clone(),
            sample_report_at("CR-2025-002", 40.7140, -74.0060, 3), // ~130m
            sample_report_at("CR-2025-003", 40.7130, -74.0060, 3), // ~20m
            sample_report_at("CR-2025-004", 40.7589, -73.9851, 3), // ~5km
        ];

        let found = ClusterAggregator::nearby(&origin, &reports, 500.0);
        let ids: Vec<&str> = found.iter().map(|(r, _)| r.id.as_str()).collect();
        assert_eq!(ids, vec!["CR-2025-003", "CR-2025-002"]);
        assert!(found[0].1 < found[1].1);
    }

    #[test]
    fn test_cluster_fine_cells_keep_points_apart() {
        let reports = vec![
            sample_report_at("CR-2025-001", 40.71, -74.00, 2),
            sample_report_at("CR-2025-002", 40.80, -73.90, 3),
        ];

        let clusters = ClusterAggregator::cluster(&reports, 1e-9).unwrap();
        assert_eq!(clusters.len(), 2);
        assert_ne!(clusters[0].cell_key, clusters[1].cell_key);
        assert_ne!(clusters[0].cell_key.lat_index, i64::MAX);
    }
}
