use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::features::reports::models::{
    FilterSpec, Report, ReportCategory, ReportStatus, SortDirection, SortField, SortSpec,
};
use crate::shared::constants::{MAX_PRIORITY, MIN_PRIORITY};

/// Tallies over a set of reports. Every known key is present, zero if unused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateCounts {
    pub total: usize,
    pub by_category: BTreeMap<ReportCategory, usize>,
    pub by_status: BTreeMap<ReportStatus, usize>,
    pub by_priority: BTreeMap<u8, usize>,
}

/// Pure filtering, sorting and counting over an in-memory report collection
pub struct ReportQueryEngine;

impl ReportQueryEngine {
    /// Reports matching every present field of `spec`, in input order
    pub fn filter(reports: &[Report], spec: &FilterSpec) -> Vec<Report> {
        reports
            .iter()
            .filter(|r| Self::matches(r, spec))
            .cloned()
            .collect()
    }

    pub fn matches(report: &Report, spec: &FilterSpec) -> bool {
        if spec.category.is_some_and(|c| c != report.category) {
            return false;
        }
        if spec.status.is_some_and(|s| s != report.status) {
            return false;
        }
        if spec.priority.is_some_and(|p| p != report.priority) {
            return false;
        }
        if let Some(department) = spec.department {
            if report.department != Some(department) {
                return false;
            }
        }
        if spec
            .date_range
            .is_some_and(|window| !window.contains(report.created_at))
        {
            return false;
        }
        if let Some(query) = &spec.search_query {
            let hit = [
                report.id.as_str(),
                report.description.as_str(),
                report.location.address.as_str(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(query.as_str()));
            if !hit {
                return false;
            }
        }
        true
    }

    /// Stable sort: reports with equal keys keep their input order
    pub fn sort(reports: &[Report], spec: SortSpec) -> Vec<Report> {
        let mut sorted = reports.to_vec();
        sorted.sort_by(|a, b| {
            let ordering = Self::compare(a, b, spec.field);
            match spec.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        sorted
    }

    fn compare(a: &Report, b: &Report, field: SortField) -> Ordering {
        match field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Priority => a.priority.cmp(&b.priority),
            SortField::Status => a.status.cmp(&b.status),
            SortField::Category => a.category.as_str().cmp(b.category.as_str()),
            SortField::Address => a.location.address.cmp(&b.location.address),
        }
    }

    pub fn query(reports: &[Report], filter: &FilterSpec, sort: SortSpec) -> Vec<Report> {
        Self::sort(&Self::filter(reports, filter), sort)
    }

    pub fn aggregate_counts(reports: &[Report]) -> AggregateCounts {
        let mut by_category: BTreeMap<ReportCategory, usize> =
            ReportCategory::ALL.into_iter().map(|c| (c, 0)).collect();
        let mut by_status: BTreeMap<ReportStatus, usize> =
            ReportStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        let mut by_priority: BTreeMap<u8, usize> =
            (MIN_PRIORITY..=MAX_PRIORITY).map(|p| (p, 0)).collect();

        for report in reports {
            *by_category.entry(report.category).or_default() += 1;
            *by_status.entry(report.status).or_default() += 1;
            *by_priority.entry(report.priority.value()).or_default() += 1;
        }

        AggregateCounts {
            total: reports.len(),
            by_category,
            by_status,
            by_priority,
        }
    }
}
