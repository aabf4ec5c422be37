//! Indicator lifecycle controller.
//!
//! # Responsibility
//! - Save indicator descriptive fields as draft or final.
//! - Run the cascading finalize over every complete draft of the same
//!   manager.
//!
//! # Invariants
//! - A `final` indicator rejects every edit until an administrative unlock.
//! - Finalize requires all six descriptive fields to be non-empty.
//! - Saving against a missing id is a no-op, never an error.

use crate::model::{now_epoch_ms, Indicator, IndicatorId, Status};
use crate::repo::snapshot_repo::GraphStorage;
use crate::service::{LifecycleError, SaveOutcome};
use crate::store::GraphStore;
use log::{info, warn};

/// Editable descriptive fields of an indicator, as held by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorForm {
    pub description: String,
    pub formula: String,
    pub unit: String,
    pub source: String,
    pub frequency: String,
    pub polarity: String,
}

impl IndicatorForm {
    fn apply_to(&self, indicator: &mut Indicator) {
        indicator.description = self.description.clone();
        indicator.formula = self.formula.clone();
        indicator.unit = self.unit.clone();
        indicator.source = self.source.clone();
        indicator.frequency = self.frequency.clone();
        indicator.polarity = self.polarity.clone();
    }
}

/// Result of a finalize request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalizeOutcome {
    /// Whether the addressed indicator itself was finalized. `false` only
    /// when the id no longer exists in the graph.
    pub finalized: bool,
    /// Count of additionally finalized indicators of the same manager.
    pub cascaded: usize,
}

/// Lifecycle operations facade for indicators.
pub struct IndicatorService<'s, S: GraphStorage> {
    store: &'s mut GraphStore<S>,
}

impl<'s, S: GraphStorage> IndicatorService<'s, S> {
    pub fn new(store: &'s mut GraphStore<S>) -> Self {
        Self { store }
    }

    /// Merges form fields into a draft indicator and keeps it draft.
    ///
    /// Rejected with `LifecycleError::Locked` when the indicator is final.
    pub fn save_draft(
        &mut self,
        id: IndicatorId,
        form: &IndicatorForm,
    ) -> Result<SaveOutcome, LifecycleError> {
        let graph = self.store.graph();
        let Some(position) = graph.indicators.iter().position(|ind| ind.id == id) else {
            warn!("event=indicator_save module=lifecycle status=warn outcome=missing id={id}");
            return Ok(SaveOutcome::Ignored);
        };
        if graph.indicators[position].status.is_final() {
            return Err(LifecycleError::Locked(id));
        }

        let mut next = graph.clone();
        let indicator = &mut next.indicators[position];
        form.apply_to(indicator);
        indicator.updated_at = now_epoch_ms();

        self.store.replace(next)?;
        Ok(SaveOutcome::Saved)
    }

    /// Finalizes the indicator and cascades over its manager's ready work.
    ///
    /// After applying `form` to the addressed indicator, every *other* draft
    /// indicator with the same manager that already satisfies the
    /// completeness predicate is finalized in the same batch; incomplete
    /// drafts stay untouched. Returns how many were additionally finalized.
    pub fn finalize_and_cascade(
        &mut self,
        id: IndicatorId,
        form: &IndicatorForm,
    ) -> Result<FinalizeOutcome, LifecycleError> {
        let graph = self.store.graph();
        let Some(current) = graph.indicator(id) else {
            warn!("event=indicator_finalize module=lifecycle status=warn outcome=missing id={id}");
            return Ok(FinalizeOutcome {
                finalized: false,
                cascaded: 0,
            });
        };
        if current.status.is_final() {
            return Err(LifecycleError::Locked(id));
        }

        let mut candidate = current.clone();
        form.apply_to(&mut candidate);
        let missing = candidate.missing_final_fields();
        if !missing.is_empty() {
            return Err(LifecycleError::Incomplete { missing });
        }

        let manager_id = candidate.manager_id;
        let now = now_epoch_ms();
        let mut next = graph.clone();
        let mut cascaded = 0;

        for indicator in &mut next.indicators {
            if indicator.id == id {
                form.apply_to(indicator);
                indicator.status = Status::Final;
                indicator.updated_at = now;
            } else if indicator.manager_id == manager_id
                && !indicator.status.is_final()
                && indicator.is_complete()
            {
                indicator.status = Status::Final;
                indicator.updated_at = now;
                cascaded += 1;
            }
        }

        self.store.replace(next)?;
        info!(
            "event=indicator_finalize module=lifecycle status=ok id={id} manager={manager_id} cascaded={cascaded}"
        );
        Ok(FinalizeOutcome {
            finalized: true,
            cascaded,
        })
    }
}
