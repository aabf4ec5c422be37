//! Entity records for perspectives, objectives, managers, indicators and targets.
//!
//! # Responsibility
//! - Define the five entity kinds and their constructors.
//! - Keep the finalize completeness predicates next to the data they inspect.
//!
//! # Invariants
//! - Ids are generated once and never mutated.
//! - `Indicator::new` copies the objective's perspective/manager ids; later
//!   objective edits must not rewrite existing indicators.

use super::now_epoch_ms;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a manager.
pub type ManagerId = Uuid;
/// Stable identifier for a perspective.
pub type PerspectiveId = Uuid;
/// Stable identifier for an objective.
pub type ObjectiveId = Uuid;
/// Stable identifier for an indicator.
pub type IndicatorId = Uuid;
/// Stable identifier for a target.
pub type TargetId = Uuid;

/// Two-state edit lock shared by indicators and targets.
///
/// `Final` is a write-lock: no field may change until an administrative
/// unlock resets the record to `Draft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Editable working state. Every record starts here.
    Draft,
    /// Locked state reached through an explicit finalize.
    Final,
}

impl Status {
    /// Returns whether the record is write-locked.
    pub fn is_final(self) -> bool {
        matches!(self, Self::Final)
    }
}

/// Aggregation rule for a target's monthly values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationType {
    /// Each month is read in isolation.
    Monthly,
    /// Months accumulate as a running sum.
    CumulativeSum,
    /// Months accumulate as a running mean.
    CumulativeMean,
}

/// A person responsible for objectives and indicators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manager {
    pub id: ManagerId,
    pub name: String,
}

impl Manager {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// A top-level strategic category (e.g. Financial).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perspective {
    pub id: PerspectiveId,
    pub name: String,
}

impl Perspective {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// A strategic intent owned by one manager under one perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub id: ObjectiveId,
    pub name: String,
    pub perspective_id: PerspectiveId,
    pub manager_id: ManagerId,
}

impl Objective {
    pub fn new(
        name: impl Into<String>,
        perspective_id: PerspectiveId,
        manager_id: ManagerId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            perspective_id,
            manager_id,
        }
    }
}

/// A named metric definition tracking progress toward an objective.
///
/// `perspective_id` and `manager_id` are denormalized copies of the owning
/// objective's values at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub id: IndicatorId,
    pub name: String,
    pub objective_id: ObjectiveId,
    pub perspective_id: PerspectiveId,
    pub manager_id: ManagerId,
    pub description: String,
    pub formula: String,
    pub unit: String,
    pub source: String,
    pub frequency: String,
    pub polarity: String,
    pub status: Status,
    /// Unix epoch milliseconds of the last write.
    pub updated_at: i64,
}

impl Indicator {
    /// Creates a draft indicator under `objective` with empty descriptive
    /// fields and denormalized references copied from the objective.
    pub fn new(name: impl Into<String>, objective: &Objective) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            objective_id: objective.id,
            perspective_id: objective.perspective_id,
            manager_id: objective.manager_id,
            description: String::new(),
            formula: String::new(),
            unit: String::new(),
            source: String::new(),
            frequency: String::new(),
            polarity: String::new(),
            status: Status::Draft,
            updated_at: now_epoch_ms(),
        }
    }

    /// Names of descriptive fields still blank, in stable order.
    ///
    /// An indicator may only be finalized when this is empty.
    pub fn missing_final_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for (label, value) in [
            ("description", &self.description),
            ("formula", &self.formula),
            ("unit", &self.unit),
            ("source", &self.source),
            ("frequency", &self.frequency),
            ("polarity", &self.polarity),
        ] {
            if value.trim().is_empty() {
                missing.push(label);
            }
        }
        missing
    }

    /// Returns whether the indicator satisfies the finalize predicate.
    pub fn is_complete(&self) -> bool {
        self.missing_final_fields().is_empty()
    }
}

/// Twelve monthly goal values, kept as free-text the way users enter them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyValues {
    pub jan: String,
    pub feb: String,
    pub mar: String,
    pub apr: String,
    pub may: String,
    pub jun: String,
    pub jul: String,
    pub aug: String,
    pub sep: String,
    pub oct: String,
    pub nov: String,
    pub dec: String,
}

impl MonthlyValues {
    /// Values in calendar order, for report rows.
    pub fn as_row(&self) -> [&str; 12] {
        [
            &self.jan, &self.feb, &self.mar, &self.apr, &self.may, &self.jun, &self.jul,
            &self.aug, &self.sep, &self.oct, &self.nov, &self.dec,
        ]
    }
}

/// Management-band thresholds classifying attainment against the goal.
///
/// Blue/green/yellow carry a from/to pair; red is a floor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bands {
    pub blue_from: String,
    pub blue_to: String,
    pub green_from: String,
    pub green_to: String,
    pub yellow_from: String,
    pub yellow_to: String,
    pub red_below: String,
}

impl Bands {
    /// Names of threshold fields still blank, in stable order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for (label, value) in [
            ("blue_from", &self.blue_from),
            ("blue_to", &self.blue_to),
            ("green_from", &self.green_from),
            ("green_to", &self.green_to),
            ("yellow_from", &self.yellow_from),
            ("yellow_to", &self.yellow_to),
            ("red_below", &self.red_below),
        ] {
            if value.trim().is_empty() {
                missing.push(label);
            }
        }
        missing
    }
}

/// Annual/monthly goals and management bands for one indicator in one year.
///
/// At most one target exists per indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub indicator_id: IndicatorId,
    pub year: Option<i32>,
    pub calculation_type: Option<CalculationType>,
    pub monthly: MonthlyValues,
    pub bands: Bands,
    /// Historical reference values, newest first (year-1, year-2, year-3).
    pub ref1: String,
    pub ref2: String,
    pub ref3: String,
    pub status: Status,
    /// Unix epoch milliseconds of the last write.
    pub updated_at: i64,
}

impl Target {
    /// Creates an empty draft target bound to `indicator_id`.
    pub fn new(indicator_id: IndicatorId) -> Self {
        Self {
            id: Uuid::new_v4(),
            indicator_id,
            year: None,
            calculation_type: None,
            monthly: MonthlyValues::default(),
            bands: Bands::default(),
            ref1: String::new(),
            ref2: String::new(),
            ref3: String::new(),
            status: Status::Draft,
            updated_at: now_epoch_ms(),
        }
    }

    /// Names of required fields still unset, in stable order.
    ///
    /// A target may only be finalized when `year` and `calculation_type` are
    /// set and every management-band threshold is non-empty.
    pub fn missing_final_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.year.is_none() {
            missing.push("year");
        }
        if self.calculation_type.is_none() {
            missing.push("calculation_type");
        }
        missing.extend(self.bands.missing_fields());
        missing
    }

    /// Returns whether the target satisfies the finalize predicate.
    pub fn is_complete(&self) -> bool {
        self.missing_final_fields().is_empty()
    }
}
