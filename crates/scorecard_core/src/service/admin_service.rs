//! Administrative structure service.
//!
//! # Responsibility
//! - Create and delete managers, perspectives, objectives and indicators.
//! - Apply the integrity guard before every structural delete.
//! - Own admin-secret verification/rotation and the final->draft unlock.
//!
//! # Invariants
//! - Deletes happen only when the guard allows them; on deny the graph is
//!   unchanged.
//! - Deleting an indicator always removes its target as well.
//! - Unlock never changes any field other than `status`.

use crate::guard::{self, IntegrityViolation};
use crate::model::{
    Indicator, IndicatorId, Manager, ManagerId, Objective, ObjectiveId, Perspective,
    PerspectiveId, Status,
};
use crate::repo::snapshot_repo::GraphStorage;
use crate::service::Severity;
use crate::store::{GraphStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from administrative structure operations.
#[derive(Debug)]
pub enum AdminServiceError {
    /// Name is blank after trim.
    InvalidName,
    /// New admin secret is blank.
    InvalidSecret,
    ManagerNotFound(ManagerId),
    PerspectiveNotFound(PerspectiveId),
    ObjectiveNotFound(ObjectiveId),
    IndicatorNotFound(IndicatorId),
    /// Delete denied by the integrity guard.
    Integrity(IntegrityViolation),
    /// Store-level failure.
    Store(StoreError),
}

impl AdminServiceError {
    pub fn severity(&self) -> Severity {
        match self {
            Self::Store(_) => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

impl Display for AdminServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "name must not be blank"),
            Self::InvalidSecret => write!(f, "admin secret must not be blank"),
            Self::ManagerNotFound(id) => write!(f, "manager not found: {id}"),
            Self::PerspectiveNotFound(id) => write!(f, "perspective not found: {id}"),
            Self::ObjectiveNotFound(id) => write!(f, "objective not found: {id}"),
            Self::IndicatorNotFound(id) => write!(f, "indicator not found: {id}"),
            Self::Integrity(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AdminServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Integrity(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<IntegrityViolation> for AdminServiceError {
    fn from(value: IntegrityViolation) -> Self {
        Self::Integrity(value)
    }
}

impl From<StoreError> for AdminServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Administrative operations facade over the entity store.
pub struct AdminService<'s, S: GraphStorage> {
    store: &'s mut GraphStore<S>,
}

impl<'s, S: GraphStorage> AdminService<'s, S> {
    pub fn new(store: &'s mut GraphStore<S>) -> Self {
        Self { store }
    }

    /// Creates a manager from a non-blank name.
    pub fn add_manager(&mut self, name: &str) -> Result<ManagerId, AdminServiceError> {
        let name = non_blank(name)?;
        let manager = Manager::new(name);
        let id = manager.id;

        let mut next = self.store.graph().clone();
        next.managers.push(manager);
        self.store.replace(next)?;
        Ok(id)
    }

    /// Creates a perspective from a non-blank name.
    pub fn add_perspective(&mut self, name: &str) -> Result<PerspectiveId, AdminServiceError> {
        let name = non_blank(name)?;
        let perspective = Perspective::new(name);
        let id = perspective.id;

        let mut next = self.store.graph().clone();
        next.perspectives.push(perspective);
        self.store.replace(next)?;
        Ok(id)
    }

    /// Creates an objective referencing an existing perspective and manager.
    pub fn add_objective(
        &mut self,
        name: &str,
        perspective_id: PerspectiveId,
        manager_id: ManagerId,
    ) -> Result<ObjectiveId, AdminServiceError> {
        let name = non_blank(name)?;
        let graph = self.store.graph();
        if graph.perspective(perspective_id).is_none() {
            return Err(AdminServiceError::PerspectiveNotFound(perspective_id));
        }
        if graph.manager(manager_id).is_none() {
            return Err(AdminServiceError::ManagerNotFound(manager_id));
        }

        let objective = Objective::new(name, perspective_id, manager_id);
        let id = objective.id;

        let mut next = graph.clone();
        next.objectives.push(objective);
        self.store.replace(next)?;
        Ok(id)
    }

    /// Creates a draft indicator under an existing objective.
    ///
    /// The objective's perspective/manager ids are copied onto the indicator
    /// at this point and never re-derived afterwards.
    pub fn add_indicator(
        &mut self,
        name: &str,
        objective_id: ObjectiveId,
    ) -> Result<IndicatorId, AdminServiceError> {
        let name = non_blank(name)?;
        let graph = self.store.graph();
        let objective = graph
            .objective(objective_id)
            .ok_or(AdminServiceError::ObjectiveNotFound(objective_id))?;

        let indicator = Indicator::new(name, objective);
        let id = indicator.id;

        let mut next = graph.clone();
        next.indicators.push(indicator);
        self.store.replace(next)?;
        Ok(id)
    }

    /// Deletes a manager when no objective or indicator references it.
    pub fn delete_manager(&mut self, id: ManagerId) -> Result<(), AdminServiceError> {
        let graph = self.store.graph();
        if graph.manager(id).is_none() {
            return Err(AdminServiceError::ManagerNotFound(id));
        }
        guard::can_delete_manager(graph, id)?;

        let mut next = graph.clone();
        next.managers.retain(|manager| manager.id != id);
        self.store.replace(next)?;
        Ok(())
    }

    /// Deletes a perspective when no objective or indicator references it.
    pub fn delete_perspective(&mut self, id: PerspectiveId) -> Result<(), AdminServiceError> {
        let graph = self.store.graph();
        if graph.perspective(id).is_none() {
            return Err(AdminServiceError::PerspectiveNotFound(id));
        }
        guard::can_delete_perspective(graph, id)?;

        let mut next = graph.clone();
        next.perspectives.retain(|persp| persp.id != id);
        self.store.replace(next)?;
        Ok(())
    }

    /// Deletes an objective when no indicator references it.
    pub fn delete_objective(&mut self, id: ObjectiveId) -> Result<(), AdminServiceError> {
        let graph = self.store.graph();
        if graph.objective(id).is_none() {
            return Err(AdminServiceError::ObjectiveNotFound(id));
        }
        guard::can_delete_objective(graph, id)?;

        let mut next = graph.clone();
        next.objectives.retain(|objective| objective.id != id);
        self.store.replace(next)?;
        Ok(())
    }

    /// Deletes an indicator and cascades to its target, if any.
    pub fn delete_indicator(&mut self, id: IndicatorId) -> Result<(), AdminServiceError> {
        let graph = self.store.graph();
        if graph.indicator(id).is_none() {
            return Err(AdminServiceError::IndicatorNotFound(id));
        }

        let mut next = graph.clone();
        next.indicators.retain(|indicator| indicator.id != id);
        next.targets.retain(|target| target.indicator_id != id);
        self.store.replace(next)?;

        info!("event=indicator_deleted module=admin status=ok id={id}");
        Ok(())
    }

    /// Unlocks a finalized indicator back to draft. No other field changes.
    pub fn unlock_indicator(&mut self, id: IndicatorId) -> Result<(), AdminServiceError> {
        let mut next = self.store.graph().clone();
        let indicator = next
            .indicators
            .iter_mut()
            .find(|indicator| indicator.id == id)
            .ok_or(AdminServiceError::IndicatorNotFound(id))?;

        indicator.status = Status::Draft;
        self.store.replace(next)?;
        Ok(())
    }

    /// Unlocks the finalized target of `indicator_id` back to draft.
    pub fn unlock_target(&mut self, indicator_id: IndicatorId) -> Result<(), AdminServiceError> {
        let mut next = self.store.graph().clone();
        let target = next
            .targets
            .iter_mut()
            .find(|target| target.indicator_id == indicator_id)
            .ok_or(AdminServiceError::IndicatorNotFound(indicator_id))?;

        target.status = Status::Draft;
        self.store.replace(next)?;
        Ok(())
    }

    /// Plain equality check against the stored admin secret.
    pub fn verify_secret(&self, input: &str) -> bool {
        self.store.graph().admin_secret == input
    }

    /// Replaces the admin secret with a non-blank value.
    pub fn change_secret(&mut self, new_secret: &str) -> Result<(), AdminServiceError> {
        if new_secret.trim().is_empty() {
            return Err(AdminServiceError::InvalidSecret);
        }

        let mut next = self.store.graph().clone();
        next.admin_secret = new_secret.to_string();
        self.store.replace(next)?;
        Ok(())
    }
}

fn non_blank(name: &str) -> Result<String, AdminServiceError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AdminServiceError::InvalidName);
    }
    Ok(trimmed.to_string())
}
