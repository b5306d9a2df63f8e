use std::collections::HashSet;
use std::path::Path;

use chrono::{Datelike, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{
    CreateInternalComment, CreateReport, CreateReportPhoto, Department, FilterSpec,
    InternalComment, Priority, Report, ReportPhoto, ReportStatus, SortSpec, TransitionTable,
};
use crate::features::reports::services::{
    ClusterAggregator, ReportLifecycle, ReportQueryEngine, TransitionRequest,
};
use crate::shared::constants::REPORT_ID_PREFIX;

#[derive(Debug, Default)]
struct ReportStore {
    reports: Vec<Report>,
    next_sequence: u64,
}

impl ReportStore {
    fn position(&self, id: &str) -> Result<usize> {
        self.reports
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    fn insert(&mut self, report: Report) -> Result<()> {
        if self.reports.iter().any(|r| r.id == report.id) {
            return Err(AppError::Conflict(format!(
                "Report {} already exists",
                report.id
            )));
        }
        if let Some(next) = sequence_after(&report.id)? {
            self.next_sequence = self.next_sequence.max(next);
        }
        self.reports.push(report);
        Ok(())
    }

    /// Generate an identifier in format: CR-YYYY-NNN
    ///
    /// The sequence only advances once the report is inserted.
    fn next_id(&self) -> Result<String> {
        let year = Utc::now().year();
        let mut sequence = self.next_sequence.max(1);
        loop {
            let id = format!("{}-{}-{:03}", REPORT_ID_PREFIX, year, sequence);
            // The last sequence number is never handed out so insert can always advance
            if sequence < u64::MAX && !self.reports.iter().any(|r| r.id == id) {
                return Ok(id);
            }
            sequence = sequence
                .checked_add(1)
                .ok_or_else(|| AppError::Conflict("Report id sequence exhausted".to_string()))?;
        }
    }
}

/// Sequence the store continues from once `id` is taken (`CR-2025-042` -> 43)
fn sequence_after(id: &str) -> Result<Option<u64>> {
    match id.rsplit('-').next().and_then(|tail| tail.parse::<u64>().ok()) {
        Some(sequence) => sequence.checked_add(1).map(Some).ok_or_else(|| {
            AppError::Validation(format!("Report id {} is past the last sequence number", id))
        }),
        None => Ok(None),
    }
}

/// Owns the report collection and serialises every mutation behind one lock
pub struct ReportService {
    store: RwLock<ReportStore>,
}

impl Default for ReportService {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportService {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(ReportStore::default()),
        }
    }

    /// Build a service over existing records, validating each one
    pub fn with_reports(reports: Vec<Report>) -> Result<Self> {
        let mut store = ReportStore::default();
        for report in reports {
            report.validate()?;
            store.insert(report)?;
        }
        Ok(Self {
            store: RwLock::new(store),
        })
    }

    /// Load a JSON array of reports into the store. Returns how many were added.
    ///
    /// The whole file is validated before anything is inserted.
    pub async fn load_seed(&self, path: &Path) -> Result<usize> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            tracing::error!("Failed to read seed file {}: {:?}", path.display(), e);
            AppError::Internal(format!("Failed to read seed file {}", path.display()))
        })?;

        let reports: Vec<Report> = serde_json::from_str(&raw).map_err(|e| {
            AppError::Validation(format!("Invalid seed file {}: {}", path.display(), e))
        })?;

        let mut seen = HashSet::new();
        for report in &reports {
            report.validate()?;
            sequence_after(&report.id)?;
            if !seen.insert(report.id.as_str()) {
                return Err(AppError::Conflict(format!(
                    "Duplicate report id {} in seed file",
                    report.id
                )));
            }
        }

        let mut store = self.store.write().await;
        if let Some(existing) = reports
            .iter()
            .find(|r| store.reports.iter().any(|s| s.id == r.id))
        {
            return Err(AppError::Conflict(format!(
                "Report {} already exists",
                existing.id
            )));
        }

        let count = reports.len();
        for report in reports {
            store.insert(report)?;
        }

        tracing::info!("Loaded {} reports from {}", count, path.display());
        Ok(count)
    }

    /// Create a new report in `submitted` status
    pub async fn create(&self, data: CreateReport) -> Result<Report> {
        let mut store = self.store.write().await;
        let id = store.next_id()?;
        let report = Report::submitted(id, data, Utc::now())?;
        store.insert(report.clone())?;

        tracing::info!(
            "Created report: {} ({}, priority {})",
            report.id,
            report.category,
            report.priority
        );

        Ok(report)
    }

    /// Get report by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Report> {
        let store = self.store.read().await;
        let position = store.position(id)?;
        Ok(store.reports[position].clone())
    }

    /// Copy of every report in insertion order
    pub async fn snapshot(&self) -> Vec<Report> {
        self.store.read().await.reports.clone()
    }

    pub async fn list(&self, filter: &FilterSpec, sort: SortSpec) -> Vec<Report> {
        let store = self.store.read().await;
        ReportQueryEngine::query(&store.reports, filter, sort)
    }

    /// Apply a lifecycle transition to the stored report
    pub async fn transition(&self, id: &str, request: TransitionRequest) -> Result<Report> {
        let mut store = self.store.write().await;
        let position = store.position(id)?;
        let target = request.target;
        let actor = request.actor.clone();

        let updated = ReportLifecycle::transition(&store.reports[position], request, Utc::now())
            .inspect_err(|e| {
                tracing::warn!("Rejected status change on {} to {}: {}", id, target, e);
            })?;

        tracing::info!(
            "Report {} moved {} -> {} by {}",
            id,
            store.reports[position].status,
            updated.status,
            actor
        );

        store.reports[position] = updated.clone();
        Ok(updated)
    }

    /// Administrative priority override (not a lifecycle transition)
    pub async fn update_priority(&self, id: &str, priority: Priority) -> Result<Report> {
        let mut store = self.store.write().await;
        let position = store.position(id)?;
        let report = &mut store.reports[position];
        ensure_editable(report)?;

        report.priority = priority;
        report.updated_at = Utc::now().max(report.updated_at);

        tracing::info!("Report {} priority set to {}", id, priority);
        Ok(report.clone())
    }

    /// Administrative assignment edit (not a lifecycle transition)
    pub async fn update_assignment(
        &self,
        id: &str,
        assigned_to: Option<String>,
        department: Option<Department>,
    ) -> Result<Report> {
        let mut store = self.store.write().await;
        let position = store.position(id)?;
        let report = &mut store.reports[position];
        ensure_editable(report)?;

        report.assigned_to = assigned_to
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        report.department = department;
        report.updated_at = Utc::now().max(report.updated_at);

        tracing::info!(
            "Report {} assignment updated: {:?} / {:?}",
            id,
            report.assigned_to,
            report.department
        );
        Ok(report.clone())
    }

    /// Fold duplicate reports into `primary_id`.
    ///
    /// Every duplicate is rejected with a note pointing at the primary and the
    /// primary's duplicate count grows accordingly. If any duplicate cannot be
    /// rejected nothing is changed.
    pub async fn merge_duplicates(
        &self,
        primary_id: &str,
        duplicate_ids: &[String],
        actor: &str,
    ) -> Result<Report> {
        if duplicate_ids.is_empty() {
            return Err(AppError::Validation(
                "At least one duplicate report is required".to_string(),
            ));
        }

        let mut store = self.store.write().await;
        let primary_position = store.position(primary_id)?;
        ensure_editable(&store.reports[primary_position])?;

        let mut seen = HashSet::new();
        let mut merged = Vec::with_capacity(duplicate_ids.len());
        let now = Utc::now();

        for duplicate_id in duplicate_ids {
            if duplicate_id == primary_id {
                return Err(AppError::Validation(format!(
                    "Report {} cannot be merged into itself",
                    primary_id
                )));
            }
            if !seen.insert(duplicate_id.as_str()) {
                return Err(AppError::Validation(format!(
                    "Report {} listed more than once",
                    duplicate_id
                )));
            }

            let position = store.position(duplicate_id)?;
            let request = TransitionRequest {
                target: ReportStatus::Rejected,
                actor: actor.to_string(),
                comment: Some(format!("Merged into {}", primary_id)),
                assigned_to: None,
            };
            let rejected = ReportLifecycle::transition(&store.reports[position], request, now)?;
            merged.push((position, rejected));
        }

        let count = merged.len();
        for (position, rejected) in merged {
            store.reports[position] = rejected;
        }

        let primary = &mut store.reports[primary_position];
        primary.duplicate_count += count as u32;
        primary.updated_at = now.max(primary.updated_at);

        tracing::info!(
            "Merged {} duplicate(s) into {} by {} (duplicate count now {})",
            count,
            primary_id,
            actor,
            primary.duplicate_count
        );

        Ok(primary.clone())
    }

    /// Reports within `radius_meters` of the given report, nearest first
    pub async fn find_nearby(&self, id: &str, radius_meters: f64) -> Result<Vec<(Report, f64)>> {
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(AppError::invalid_filter("radius", radius_meters.to_string()));
        }

        let store = self.store.read().await;
        let position = store.position(id)?;
        let origin = &store.reports[position];

        Ok(ClusterAggregator::nearby(origin, &store.reports, radius_meters)
            .into_iter()
            .map(|(r, distance)| (r.clone(), distance))
            .collect())
    }

    // ========================================================================
    // Internal comments
    // ========================================================================

    /// Append a staff-only comment. Status, history and `updated_at` are untouched.
    pub async fn add_internal_comment(
        &self,
        id: &str,
        data: CreateInternalComment,
    ) -> Result<InternalComment> {
        let author = data.author.trim();
        let content = data.content.trim();
        if author.is_empty() {
            return Err(AppError::Validation(
                "Comment author must not be blank".to_string(),
            ));
        }
        if content.is_empty() {
            return Err(AppError::Validation(
                "Comment content must not be blank".to_string(),
            ));
        }

        let mut store = self.store.write().await;
        let position = store.position(id)?;
        let report = &mut store.reports[position];

        let timestamp = report
            .internal_comments
            .last()
            .map_or_else(Utc::now, |last| Utc::now().max(last.timestamp));

        let comment = InternalComment {
            id: Uuid::now_v7(),
            author: author.to_string(),
            role: data
                .role
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            content: content.to_string(),
            timestamp,
        };
        report.internal_comments.push(comment.clone());

        tracing::info!("Internal comment {} added to {} by {}", comment.id, id, author);
        Ok(comment)
    }

    /// Internal comments of a report, oldest first
    pub async fn list_internal_comments(&self, id: &str) -> Result<Vec<InternalComment>> {
        let store = self.store.read().await;
        let position = store.position(id)?;
        Ok(store.reports[position].internal_comments.clone())
    }

    // ========================================================================
    // Photo references
    // ========================================================================

    /// Attach a photo reference (administrative edit, not a lifecycle transition)
    pub async fn add_photo(&self, id: &str, data: CreateReportPhoto) -> Result<ReportPhoto> {
        let url = data.url.trim();
        let uploaded_by = data.uploaded_by.trim();
        if url.is_empty() || uploaded_by.is_empty() {
            return Err(AppError::Validation(
                "Photo url and uploader are required".to_string(),
            ));
        }

        let mut store = self.store.write().await;
        let position = store.position(id)?;
        let report = &mut store.reports[position];
        ensure_editable(report)?;

        let now = Utc::now().max(report.updated_at);
        let photo = ReportPhoto {
            id: Uuid::now_v7(),
            stage: data.stage,
            url: url.to_string(),
            caption: data
                .caption
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            uploaded_by: uploaded_by.to_string(),
            uploaded_at: now,
        };
        report.photos.push(photo.clone());
        report.updated_at = now;

        tracing::info!("Photo {} ({}) attached to {}", photo.id, photo.stage, id);
        Ok(photo)
    }

    /// Drop a photo reference from a report
    pub async fn remove_photo(&self, id: &str, photo_id: Uuid) -> Result<Report> {
        let mut store = self.store.write().await;
        let position = store.position(id)?;
        let report = &mut store.reports[position];
        ensure_editable(report)?;

        let photo_position = report
            .photos
            .iter()
            .position(|p| p.id == photo_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Photo {} not found on report {}", photo_id, id))
            })?;
        report.photos.remove(photo_position);
        report.updated_at = Utc::now().max(report.updated_at);

        tracing::info!("Photo {} removed from {}", photo_id, id);
        Ok(report.clone())
    }
}

fn ensure_editable(report: &Report) -> Result<()> {
    if TransitionTable::is_terminal(report.status) {
        return Err(AppError::Conflict(format!(
            "Report {} is {} and can no longer be edited",
            report.id, report.status
        )));
    }
    Ok(())
}
