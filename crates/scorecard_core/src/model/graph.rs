//! Whole-dataset snapshot shape.
//!
//! # Responsibility
//! - Define `Graph`, the single value that holds every entity list plus the
//!   admin secret.
//! - Provide read-only lookup helpers used by guards and services.
//!
//! # Invariants
//! - The graph is always replaced wholesale; no consumer observes a
//!   partially-applied mutation.

use super::entity::{
    Indicator, IndicatorId, Manager, ManagerId, Objective, ObjectiveId, Perspective,
    PerspectiveId, Target,
};
use serde::{Deserialize, Serialize};

/// Admin secret seeded into a fresh graph.
pub const DEFAULT_ADMIN_SECRET: &str = "lade2025";

/// The entire strategic-performance dataset as one snapshot value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    /// Shared admin secret, compared for plain equality.
    pub admin_secret: String,
    pub perspectives: Vec<Perspective>,
    pub objectives: Vec<Objective>,
    pub managers: Vec<Manager>,
    pub indicators: Vec<Indicator>,
    pub targets: Vec<Target>,
}

impl Default for Graph {
    fn default() -> Self {
        Self {
            admin_secret: DEFAULT_ADMIN_SECRET.to_string(),
            perspectives: Vec::new(),
            objectives: Vec::new(),
            managers: Vec::new(),
            indicators: Vec::new(),
            targets: Vec::new(),
        }
    }
}

impl Graph {
    pub fn manager(&self, id: ManagerId) -> Option<&Manager> {
        self.managers.iter().find(|manager| manager.id == id)
    }

    pub fn perspective(&self, id: PerspectiveId) -> Option<&Perspective> {
        self.perspectives.iter().find(|persp| persp.id == id)
    }

    pub fn objective(&self, id: ObjectiveId) -> Option<&Objective> {
        self.objectives.iter().find(|objective| objective.id == id)
    }

    pub fn indicator(&self, id: IndicatorId) -> Option<&Indicator> {
        self.indicators.iter().find(|indicator| indicator.id == id)
    }

    /// The at-most-one target bound to `indicator_id`.
    pub fn target_for_indicator(&self, indicator_id: IndicatorId) -> Option<&Target> {
        self.targets
            .iter()
            .find(|target| target.indicator_id == indicator_id)
    }
}
