//! Target lifecycle controller.
//!
//! # Responsibility
//! - Upsert the at-most-one target of an indicator as draft or final.
//! - Enforce the finalize completeness predicate (year, calculation type,
//!   every management-band threshold).
//!
//! # Invariants
//! - A `final` target rejects every edit until an administrative unlock.
//! - Saving against a missing indicator id is a no-op, never an error.
//! - `indicator_id` stays unique among targets.

use crate::model::{
    now_epoch_ms, Bands, CalculationType, IndicatorId, MonthlyValues, Status, Target,
};
use crate::repo::snapshot_repo::GraphStorage;
use crate::service::{LifecycleError, SaveOutcome};
use crate::store::GraphStore;
use log::warn;

/// Editable fields of a target, as held by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetForm {
    pub year: Option<i32>,
    pub calculation_type: Option<CalculationType>,
    pub monthly: MonthlyValues,
    pub bands: Bands,
    pub ref1: String,
    pub ref2: String,
    pub ref3: String,
}

impl TargetForm {
    fn apply_to(&self, target: &mut Target) {
        target.year = self.year;
        target.calculation_type = self.calculation_type;
        target.monthly = self.monthly.clone();
        target.bands = self.bands.clone();
        target.ref1 = self.ref1.clone();
        target.ref2 = self.ref2.clone();
        target.ref3 = self.ref3.clone();
    }
}

/// Lifecycle operations facade for targets.
pub struct TargetService<'s, S: GraphStorage> {
    store: &'s mut GraphStore<S>,
}

impl<'s, S: GraphStorage> TargetService<'s, S> {
    pub fn new(store: &'s mut GraphStore<S>) -> Self {
        Self { store }
    }

    /// Upserts the target of `indicator_id` and keeps it draft.
    pub fn save_draft(
        &mut self,
        indicator_id: IndicatorId,
        form: &TargetForm,
    ) -> Result<SaveOutcome, LifecycleError> {
        self.save(indicator_id, form, Status::Draft)
    }

    /// Upserts the target of `indicator_id` and finalizes it.
    ///
    /// Rejected with a validation error while `year`, `calculation_type` or
    /// any band threshold is missing.
    pub fn save_final(
        &mut self,
        indicator_id: IndicatorId,
        form: &TargetForm,
    ) -> Result<SaveOutcome, LifecycleError> {
        self.save(indicator_id, form, Status::Final)
    }

    fn save(
        &mut self,
        indicator_id: IndicatorId,
        form: &TargetForm,
        status: Status,
    ) -> Result<SaveOutcome, LifecycleError> {
        let graph = self.store.graph();
        if graph.indicator(indicator_id).is_none() {
            warn!(
                "event=target_save module=lifecycle status=warn outcome=missing indicator={indicator_id}"
            );
            return Ok(SaveOutcome::Ignored);
        }

        let existing = graph.target_for_indicator(indicator_id);
        if let Some(target) = existing {
            if target.status.is_final() {
                return Err(LifecycleError::Locked(target.id));
            }
        }

        let mut target = match existing {
            Some(target) => target.clone(),
            None => Target::new(indicator_id),
        };
        form.apply_to(&mut target);

        if status.is_final() {
            let missing = target.missing_final_fields();
            if !missing.is_empty() {
                return Err(LifecycleError::Incomplete { missing });
            }
        }

        target.status = status;
        target.updated_at = now_epoch_ms();

        let mut next = graph.clone();
        next.targets
            .retain(|other| other.indicator_id != indicator_id);
        next.targets.push(target);

        self.store.replace(next)?;
        Ok(SaveOutcome::Saved)
    }
}
