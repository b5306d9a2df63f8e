mod clustering_service;
mod lifecycle_service;
mod query_service;
mod report_service;

pub use clustering_service::ClusterAggregator;
pub use lifecycle_service::{ReportLifecycle, TransitionRequest};
pub use query_service::{AggregateCounts, ReportQueryEngine};
pub use report_service::ReportService;
