use super::ReportStatus;

/// Legal status transitions for the report lifecycle.
pub struct TransitionTable;

impl TransitionTable {
    /// Statuses reachable in one step from `from`
    pub fn next_statuses(from: ReportStatus) -> &'static [ReportStatus] {
        use ReportStatus::*;

        match from {
            Submitted => &[UnderReview, Assigned, Rejected],
            UnderReview => &[Assigned, Rejected, OnHold],
            Assigned => &[InProgress, OnHold, Rejected],
            InProgress => &[Completed, OnHold],
            OnHold => &[InProgress, Assigned],
            Completed => &[Closed],
            Rejected | Closed => &[],
        }
    }

    pub fn is_legal(from: ReportStatus, to: ReportStatus) -> bool {
        Self::next_statuses(from).contains(&to)
    }

    pub fn is_terminal(status: ReportStatus) -> bool {
        Self::next_statuses(status).is_empty()
    }
}
