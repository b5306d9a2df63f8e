#[cfg(test)]
use chrono::{DateTime, Duration, TimeZone, Utc};

#[cfg(test)]
use crate::features::reports::models::{
    Coordinates, Priority, Report, ReportCategory, ReportLocation, ReportStatus,
    StatusHistoryEntry,
};

#[cfg(test)]
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap()
}

/// Report sitting in `status` with a one-entry history, created at [`fixed_time`]
#[cfg(test)]
pub fn sample_report(id: &str, status: ReportStatus, priority: u8) -> Report {
    let created_at = fixed_time();
    Report {
        id: id.to_string(),
        category: ReportCategory::Infrastructure,
        status,
        priority: Priority::new(priority).unwrap(),
        description: format!("Sample issue {}", id),
        location: ReportLocation {
            address: "123 Main Street, Cityname".to_string(),
            coordinates: Coordinates {
                lat: 40.7128,
                lng: -74.0060,
            },
        },
        citizen_name: "Sarah Johnson".to_string(),
        assigned_to: None,
        department: None,
        created_at,
        updated_at: created_at,
        status_history: vec![StatusHistoryEntry {
            status,
            timestamp: created_at,
            actor: "Sarah Johnson".to_string(),
            note: None,
            assigned_to: None,
        }],
        duplicate_count: 1,
        photos: Vec::new(),
        internal_comments: Vec::new(),
    }
}

#[cfg(test)]
pub fn sample_report_at(id: &str, lat: f64, lng: f64, priority: u8) -> Report {
    let mut report = sample_report(id, ReportStatus::Submitted, priority);
    report.location.coordinates = Coordinates { lat, lng };
    report
}

/// Five reports mirroring the admin dashboard's sample data
#[cfg(test)]
pub fn dashboard_reports() -> Vec<Report> {
    let rows = [
        (
            "CR-2025-001",
            ReportCategory::Infrastructure,
            ReportStatus::InProgress,
            4,
            "Large pothole on Main Street causing traffic issues",
            "123 Main Street, Cityname, ST 12345",
            (40.7128, -74.0060),
            -90,
        ),
        (
            "CR-2025-002",
            ReportCategory::Safety,
            ReportStatus::Assigned,
            5,
            "Broken streetlight creating dangerous intersection conditions at night",
            "456 Oak Avenue, Cityname, ST 12345",
            (40.7589, -73.9851),
            -225,
        ),
        (
            "CR-2025-003",
            ReportCategory::Environment,
            ReportStatus::UnderReview,
            2,
            "Overflowing trash bin in Central Park needs attention",
            "789 Park Drive, Cityname, ST 12345",
            (40.7505, -73.9934),
            -280,
        ),
        (
            "CR-2025-004",
            ReportCategory::Utilities,
            ReportStatus::Completed,
            3,
            "Water pressure issues reported in residential area",
            "321 Elm Street, Cityname, ST 12345",
            (40.7282, -74.0776),
            -1155,
        ),
        (
            "CR-2025-005",
            ReportCategory::Infrastructure,
            ReportStatus::Submitted,
            3,
            "Sidewalk crack creating pedestrian hazard near school zone",
            "654 School Lane, Cityname, ST 12345",
            (40.7614, -73.9776),
            75,
        ),
    ];

    rows.into_iter()
        .map(
            |(id, category, status, priority, description, address, (lat, lng), offset_minutes)| {
                let mut report = sample_report(id, status, priority);
                let created_at = fixed_time() + Duration::minutes(offset_minutes);
                report.category = category;
                report.description = description.to_string();
                report.location = ReportLocation {
                    address: address.to_string(),
                    coordinates: Coordinates { lat, lng },
                };
                report.created_at = created_at;
                report.updated_at = created_at;
                report.status_history[0].timestamp = created_at;
                report
            },
        )
        .collect()
}
