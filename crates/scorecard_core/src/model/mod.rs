//! Domain model for the strategic-performance dataset.
//!
//! # Responsibility
//! - Define the canonical entity records and the whole-graph snapshot shape.
//! - Own the draft/final completeness predicates used by the lifecycle layer.
//!
//! # Invariants
//! - Every entity is identified by a stable id that is never reused.
//! - `Indicator` denormalized references are fixed at creation time and are
//!   never re-derived from the owning `Objective`.

pub mod entity;
pub mod graph;

pub use entity::{
    Bands, CalculationType, Indicator, IndicatorId, Manager, ManagerId, MonthlyValues, Objective,
    ObjectiveId, Perspective, PerspectiveId, Status, Target, TargetId,
};
pub use graph::{Graph, DEFAULT_ADMIN_SECRET};

/// Returns the current wall-clock time in unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
