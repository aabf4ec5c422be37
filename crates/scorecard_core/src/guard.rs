//! Integrity guard: pure delete-legality predicates over the graph.
//!
//! # Responsibility
//! - Decide whether deleting a manager, perspective or objective is legal
//!   given the current reference graph.
//! - Carry a human-readable denial reason with every violation.
//!
//! # Invariants
//! - Guards never mutate state; callers apply the delete only on allow.
//! - Indicator deletion has no guard, but must cascade to its target.

use crate::model::{Graph, ManagerId, ObjectiveId, PerspectiveId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Denial reason for an attempted delete of a still-referenced entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityViolation {
    /// Objectives or indicators still reference the manager.
    ManagerReferenced(ManagerId),
    /// Objectives or indicators still reference the perspective.
    PerspectiveReferenced(PerspectiveId),
    /// Indicators still reference the objective.
    ObjectiveReferenced(ObjectiveId),
}

impl Display for IntegrityViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ManagerReferenced(id) => write!(
                f,
                "cannot delete manager {id}: objectives or indicators still reference it"
            ),
            Self::PerspectiveReferenced(id) => write!(
                f,
                "cannot delete perspective {id}: objectives or indicators still reference it"
            ),
            Self::ObjectiveReferenced(id) => write!(
                f,
                "cannot delete objective {id}: indicators still reference it"
            ),
        }
    }
}

impl Error for IntegrityViolation {}

/// Allows the delete unless any objective or indicator references the manager.
pub fn can_delete_manager(graph: &Graph, id: ManagerId) -> Result<(), IntegrityViolation> {
    let referenced = graph
        .objectives
        .iter()
        .any(|objective| objective.manager_id == id)
        || graph
            .indicators
            .iter()
            .any(|indicator| indicator.manager_id == id);

    if referenced {
        return Err(IntegrityViolation::ManagerReferenced(id));
    }
    Ok(())
}

/// Allows the delete unless any objective or indicator references the
/// perspective.
pub fn can_delete_perspective(graph: &Graph, id: PerspectiveId) -> Result<(), IntegrityViolation> {
    let referenced = graph
        .objectives
        .iter()
        .any(|objective| objective.perspective_id == id)
        || graph
            .indicators
            .iter()
            .any(|indicator| indicator.perspective_id == id);

    if referenced {
        return Err(IntegrityViolation::PerspectiveReferenced(id));
    }
    Ok(())
}

/// Allows the delete unless any indicator references the objective.
pub fn can_delete_objective(graph: &Graph, id: ObjectiveId) -> Result<(), IntegrityViolation> {
    if graph
        .indicators
        .iter()
        .any(|indicator| indicator.objective_id == id)
    {
        return Err(IntegrityViolation::ObjectiveReferenced(id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Indicator, Manager, Objective, Perspective};

    fn seeded_graph() -> (Graph, Manager, Perspective, Objective) {
        let mut graph = Graph::default();
        let manager = Manager::new("Maria Souza");
        let perspective = Perspective::new("Financial");
        let objective = Objective::new("Grow Revenue", perspective.id, manager.id);
        graph.managers.push(manager.clone());
        graph.perspectives.push(perspective.clone());
        graph.objectives.push(objective.clone());
        (graph, manager, perspective, objective)
    }

    #[test]
    fn manager_with_objective_reference_is_denied() {
        let (graph, manager, ..) = seeded_graph();
        let err = can_delete_manager(&graph, manager.id).unwrap_err();
        assert_eq!(err, IntegrityViolation::ManagerReferenced(manager.id));
    }

    #[test]
    fn manager_with_only_indicator_reference_is_denied() {
        let (mut graph, manager, _, objective) = seeded_graph();
        graph.indicators.push(Indicator::new("Churn", &objective));
        graph.objectives.clear();

        assert!(can_delete_manager(&graph, manager.id).is_err());
    }

    #[test]
    fn unreferenced_entities_are_allowed() {
        let (mut graph, manager, perspective, objective) = seeded_graph();
        graph.objectives.clear();

        assert!(can_delete_manager(&graph, manager.id).is_ok());
        assert!(can_delete_perspective(&graph, perspective.id).is_ok());
        assert!(can_delete_objective(&graph, objective.id).is_ok());
    }

    #[test]
    fn objective_with_indicator_reference_is_denied() {
        let (mut graph, _, _, objective) = seeded_graph();
        graph
            .indicators
            .push(Indicator::new("Conversion Rate", &objective));

        let err = can_delete_objective(&graph, objective.id).unwrap_err();
        assert_eq!(err, IntegrityViolation::ObjectiveReferenced(objective.id));
    }
}
