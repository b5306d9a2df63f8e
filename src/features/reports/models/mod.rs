mod internal_comment;
mod report;
mod report_attachment;
mod report_cluster;
mod report_query;
mod report_status;
mod transition_table;

pub use internal_comment::{CreateInternalComment, InternalComment};
pub use report::{
    Coordinates, CreateReport, Department, Priority, Report, ReportCategory, ReportLocation,
    StatusHistoryEntry,
};
pub use report_attachment::{CreateReportPhoto, PhotoStage, ReportPhoto};
pub use report_cluster::{CellKey, ReportCluster};
pub use report_query::{
    DateRangePreset, DateWindow, FilterSpec, SortDirection, SortField, SortSpec,
};
pub use report_status::ReportStatus;
pub use transition_table::TransitionTable;
