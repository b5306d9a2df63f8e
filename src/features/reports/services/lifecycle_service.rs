use chrono::{DateTime, Utc};

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{
    Report, ReportStatus, StatusHistoryEntry, TransitionTable,
};

/// A requested status change on a single report
#[derive(Debug, Clone)]
pub struct TransitionRequest {
    pub target: ReportStatus,
    pub actor: String,
    pub comment: Option<String>,
    /// New handler, recorded in history and copied onto the report
    pub assigned_to: Option<String>,
}

/// Applies status transitions to reports.
///
/// Transitions are checked in a fixed order (legality, then comment, then
/// actor) and either fully apply or fail before anything is changed.
pub struct ReportLifecycle;

impl ReportLifecycle {
    /// Return the report after moving it to `request.target`.
    ///
    /// The input is left untouched; the returned value carries the extra
    /// history entry. The entry timestamp is never earlier than the previous
    /// entry, so history stays ordered even if the clock steps backwards.
    pub fn transition(
        report: &Report,
        request: TransitionRequest,
        now: DateTime<Utc>,
    ) -> Result<Report> {
        let from = report.status;
        let to = request.target;

        if !TransitionTable::is_legal(from, to) {
            return Err(AppError::IllegalTransition { from, to });
        }

        let comment = request
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        if to.requires_comment() && comment.is_none() {
            return Err(AppError::MissingRequiredComment(to));
        }

        let actor = request.actor.trim();
        if actor.is_empty() {
            return Err(AppError::Validation(
                "An actor is required for status changes".to_string(),
            ));
        }

        let assigned_to = request
            .assigned_to
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());

        let timestamp = report
            .last_history_timestamp()
            .map_or(now, |last| last.max(now));

        let mut updated = report.clone();
        updated.status = to;
        updated.updated_at = timestamp;
        if let Some(handler) = &assigned_to {
            updated.assigned_to = Some(handler.clone());
        }
        updated.status_history.push(StatusHistoryEntry {
            status: to,
            timestamp,
            actor: actor.to_string(),
            note: comment,
            assigned_to,
        });

        Ok(updated)
    }

    /// Statuses an actor may move the report to next
    pub fn available_transitions(report: &Report) -> &'static [ReportStatus] {
        TransitionTable::next_statuses(report.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{fixed_time, sample_report};
    use chrono::Duration;

    fn request(target: ReportStatus, comment: Option<&str>) -> TransitionRequest {
        TransitionRequest {
            target,
            actor: "J.Smith".to_string(),
            comment: comment.map(String::from),
            assigned_to: None,
        }
    }

    #[test]
    fn test_illegal_jump_fails_before_comment_check() {
        let report = sample_report("CR-2025-001", ReportStatus::Submitted, 3);
        let result = ReportLifecycle::transition(
            &report,
            request(ReportStatus::InProgress, None),
            fixed_time(),
        );

        assert_eq!(
            result,
            Err(AppError::IllegalTransition {
                from: ReportStatus::Submitted,
                to: ReportStatus::InProgress,
            })
        );
    }

    #[test]
    fn test_assigned_to_in_progress_with_comment() {
        let report = sample_report("CR-2025-002", ReportStatus::Assigned, 3);
        let now = fixed_time() + Duration::hours(2);

        let updated = ReportLifecycle::transition(
            &report,
            request(ReportStatus::InProgress, Some("crew dispatched")),
            now,
        )
        .unwrap();

        assert_eq!(updated.status, ReportStatus::InProgress);
        assert_eq!(updated.updated_at, now);
        assert_eq!(updated.status_history.len(), report.status_history.len() + 1);

        let entry = updated.status_history.last().unwrap();
        assert_eq!(entry.status, ReportStatus::InProgress);
        assert_eq!(entry.note.as_deref(), Some("crew dispatched"));
        assert_eq!(entry.actor, "J.Smith");
        assert_eq!(entry.timestamp, now);

        // Input report is untouched
        assert_eq!(report.status, ReportStatus::Assigned);
        assert_eq!(report.status_history.len(), 1);
    }

    #[test]
    fn test_missing_comment() {
        let report = sample_report("CR-2025-001", ReportStatus::Submitted, 3);

        for comment in [None, Some(""), Some("   ")] {
            let result = ReportLifecycle::transition(
                &report,
                request(ReportStatus::Rejected, comment),
                fixed_time(),
            );
            assert_eq!(
                result,
                Err(AppError::MissingRequiredComment(ReportStatus::Rejected))
            );
        }
    }

    #[test]
    fn test_comment_optional_for_review_and_close() {
        let report = sample_report("CR-2025-001", ReportStatus::Submitted, 3);
        let reviewed = ReportLifecycle::transition(
            &report,
            request(ReportStatus::UnderReview, None),
            fixed_time(),
        )
        .unwrap();
        assert_eq!(reviewed.status_history.last().unwrap().note, None);

        let completed = sample_report("CR-2025-004", ReportStatus::Completed, 3);
        let closed = ReportLifecycle::transition(
            &completed,
            request(ReportStatus::Closed, None),
            fixed_time(),
        )
        .unwrap();
        assert_eq!(closed.status, ReportStatus::Closed);
    }

    #[test]
    fn test_blank_actor_rejected() {
        let report = sample_report("CR-2025-001", ReportStatus::Submitted, 3);
        let mut req = request(ReportStatus::UnderReview, None);
        req.actor = "  ".to_string();

        assert!(matches!(
            ReportLifecycle::transition(&report, req, fixed_time()),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_assignment_is_recorded() {
        let report = sample_report("CR-2025-001", ReportStatus::Submitted, 3);
        let mut req = request(ReportStatus::Assigned, Some("pothole crew"));
        req.assigned_to = Some("Public Works Crew #1".to_string());

        let updated = ReportLifecycle::transition(&report, req, fixed_time()).unwrap();
        assert_eq!(updated.assigned_to.as_deref(), Some("Public Works Crew #1"));
        assert_eq!(
            updated.status_history.last().unwrap().assigned_to.as_deref(),
            Some("Public Works Crew #1")
        );
    }

    #[test]
    fn test_timestamp_never_goes_backwards() {
        let report = sample_report("CR-2025-001", ReportStatus::Submitted, 3);
        let earlier = fixed_time() - Duration::hours(5);

        let updated = ReportLifecycle::transition(
            &report,
            request(ReportStatus::UnderReview, None),
            earlier,
        )
        .unwrap();

        let entry = updated.status_history.last().unwrap();
        assert_eq!(entry.timestamp, fixed_time());
        assert!(updated.validate().is_ok());
    }

    #[test]
    fn test_transition_succeeds_iff_table_allows() {
        for from in ReportStatus::ALL {
            for to in ReportStatus::ALL {
                let report = sample_report("CR-2025-001", from, 3);
                let result = ReportLifecycle::transition(
                    &report,
                    request(to, Some("note")),
                    fixed_time(),
                );

                if TransitionTable::is_legal(from, to) {
                    let updated = result.unwrap();
                    assert_eq!(updated.status, to);
                    assert_eq!(updated.status_history.len(), 2);
                } else {
                    assert_eq!(result, Err(AppError::IllegalTransition { from, to }));
                }
            }
        }
    }

    #[test]
    fn test_repeated_illegal_transition_is_stable() {
        let report = sample_report("CR-2025-001", ReportStatus::Closed, 3);
        let snapshot = report.clone();

        let first = ReportLifecycle::transition(
            &report,
            request(ReportStatus::InProgress, Some("reopen")),
            fixed_time(),
        );
        let second = ReportLifecycle::transition(
            &report,
            request(ReportStatus::InProgress, Some("reopen")),
            fixed_time(),
        );

        assert_eq!(first, second);
        assert!(matches!(first, Err(AppError::IllegalTransition { .. })));
        assert_eq!(report, snapshot);
    }

    #[test]
    fn test_available_transitions() {
        let report = sample_report("CR-2025-001", ReportStatus::InProgress, 3);
        assert_eq!(
            ReportLifecycle::available_transitions(&report),
            &[ReportStatus::Completed, ReportStatus::OnHold]
        );
    }
}
