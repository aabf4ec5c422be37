//! Core domain logic for the strategic-performance scorecard.
//! This crate is the single source of truth for business invariants:
//! entity-graph consistency, the draft/final locking workflow and the
//! batch-import merge algorithm.

pub mod db;
pub mod guard;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use guard::{
    can_delete_manager, can_delete_objective, can_delete_perspective, IntegrityViolation,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    Bands, CalculationType, Graph, Indicator, IndicatorId, Manager, ManagerId, MonthlyValues,
    Objective, ObjectiveId, Perspective, PerspectiveId, Status, Target, TargetId,
    DEFAULT_ADMIN_SECRET,
};
pub use repo::snapshot_repo::{
    GraphStorage, SnapshotRepoError, SnapshotResult, SqliteGraphStorage, STORAGE_KEY,
};
pub use service::admin_service::{AdminService, AdminServiceError};
pub use service::import_service::{ImportError, ImportRow, ImportService};
pub use service::indicator_service::{FinalizeOutcome, IndicatorForm, IndicatorService};
pub use service::report_service::{
    filtered_indicators, indicator_csv, target_csv, IndicatorColumn, ReportFilter,
};
pub use service::target_service::{TargetForm, TargetService};
pub use service::{LifecycleError, SaveOutcome, Severity};
pub use store::{GraphStore, StoreError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
