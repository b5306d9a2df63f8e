use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};

use crate::core::error::{AppError, Result};

use super::{Department, Priority, ReportCategory, ReportStatus};

/// Inclusive window on `created_at`. Either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateWindow {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| at >= start) && self.end.is_none_or(|end| at <= end)
    }
}

/// Relative date-range presets offered by the dashboards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangePreset {
    LastDay,
    LastWeek,
    LastMonth,
    LastQuarter,
    Custom,
}

impl DateRangePreset {
    /// Window ending at `now`. `Custom` has no relative window.
    pub fn window(&self, now: DateTime<Utc>) -> Option<DateWindow> {
        let days = match self {
            DateRangePreset::LastDay => 1,
            DateRangePreset::LastWeek => 7,
            DateRangePreset::LastMonth => 30,
            DateRangePreset::LastQuarter => 90,
            DateRangePreset::Custom => return None,
        };

        Some(DateWindow {
            start: Some(now - Duration::days(days)),
            end: Some(now),
        })
    }
}

impl FromStr for DateRangePreset {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "1d" => Ok(DateRangePreset::LastDay),
            "7d" => Ok(DateRangePreset::LastWeek),
            "30d" => Ok(DateRangePreset::LastMonth),
            "90d" => Ok(DateRangePreset::LastQuarter),
            "custom" => Ok(DateRangePreset::Custom),
            _ => Err(AppError::invalid_filter("date_range", s)),
        }
    }
}

/// Which reports to include in a query result. `None` imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub category: Option<ReportCategory>,
    pub status: Option<ReportStatus>,
    pub priority: Option<Priority>,
    pub department: Option<Department>,
    pub date_range: Option<DateWindow>,
    /// Lowercased needle; build through [`FilterSpec::with_search`]
    pub search_query: Option<String>,
}

impl FilterSpec {
    pub fn with_search(mut self, query: &str) -> Self {
        let trimmed = query.trim();
        self.search_query = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        };
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    Priority,
    Status,
    Category,
    Address,
}

impl FromStr for SortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "created_at" | "createdat" => Ok(SortField::CreatedAt),
            "priority" => Ok(SortField::Priority),
            "status" => Ok(SortField::Status),
            "category" => Ok(SortField::Category),
            "address" | "location" | "location.address" => Ok(SortField::Address),
            _ => Err(AppError::invalid_filter("sort_by", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Desc,
    Asc,
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(AppError::invalid_filter("sort_direction", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}
