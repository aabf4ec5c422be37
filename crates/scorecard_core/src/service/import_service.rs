//! Batch import merge engine.
//!
//! # Responsibility
//! - Fold externally supplied rows into the graph, creating missing
//!   perspectives, managers, objectives and indicators.
//! - Skip exact duplicates so a re-import is idempotent.
//!
//! # Invariants
//! - Rows are processed in input order over working copies, so later rows
//!   see earlier rows' insertions within one batch.
//! - Name matching is case-insensitive exact; objectives additionally match
//!   on perspective, indicators on objective.
//! - The batch commits as one store replacement; an empty batch fails whole
//!   with no graph change. Targets are never touched.

use crate::model::{Indicator, Manager, Objective, Perspective};
use crate::repo::snapshot_repo::GraphStorage;
use crate::service::Severity;
use crate::store::{GraphStore, StoreError};
use log::info;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One already-parsed spreadsheet row: column label -> trimmed cell value.
pub type ImportRow = BTreeMap<String, String>;

/// Accepted column labels per logical field, two alternates each.
const PERSPECTIVE_LABELS: [&str; 2] = ["Perspective", "Strategic Perspective"];
const OBJECTIVE_LABELS: [&str; 2] = ["Objective", "Strategic Objective"];
const INDICATOR_LABELS: [&str; 2] = ["Indicator", "Performance Indicator"];
const MANAGER_LABELS: [&str; 2] = ["Manager", "Responsible Manager"];

/// Errors from batch import.
#[derive(Debug)]
pub enum ImportError {
    /// The batch carries no rows; nothing to merge.
    EmptyBatch,
    /// Store-level failure while committing the merged graph.
    Store(StoreError),
}

impl ImportError {
    pub fn severity(&self) -> Severity {
        match self {
            Self::EmptyBatch => Severity::Warning,
            Self::Store(_) => Severity::Error,
        }
    }
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBatch => write!(f, "import batch is empty or unreadable"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::EmptyBatch => None,
        }
    }
}

impl From<StoreError> for ImportError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Batch import facade over the entity store.
pub struct ImportService<'s, S: GraphStorage> {
    store: &'s mut GraphStore<S>,
}

impl<'s, S: GraphStorage> ImportService<'s, S> {
    pub fn new(store: &'s mut GraphStore<S>) -> Self {
        Self { store }
    }

    /// Merges `rows` into the graph and returns the count of newly created
    /// indicators.
    ///
    /// Rows with any blank logical field are skipped entirely. The four
    /// reference lists are written back atomically as one replacement.
    pub fn import_rows(&mut self, rows: &[ImportRow]) -> Result<usize, ImportError> {
        if rows.is_empty() {
            return Err(ImportError::EmptyBatch);
        }

        let graph = self.store.graph();
        let mut perspectives = graph.perspectives.clone();
        let mut managers = graph.managers.clone();
        let mut objectives = graph.objectives.clone();
        let mut indicators = graph.indicators.clone();

        let mut created = 0;

        for row in rows {
            let Some(fields) = RowFields::extract(row) else {
                continue;
            };

            let perspective_id =
                match find_by_name(&perspectives, &fields.perspective, |p: &Perspective| &p.name)
                {
                    Some(index) => perspectives[index].id,
                    None => {
                        let perspective = Perspective::new(fields.perspective.clone());
                        let id = perspective.id;
                        perspectives.push(perspective);
                        id
                    }
                };

            let manager_id = match find_by_name(&managers, &fields.manager, |m: &Manager| &m.name)
            {
                Some(index) => managers[index].id,
                None => {
                    let manager = Manager::new(fields.manager.clone());
                    let id = manager.id;
                    managers.push(manager);
                    id
                }
            };

            // Same objective name under a different perspective is distinct.
            let objective_index = objectives.iter().position(|objective| {
                objective.perspective_id == perspective_id
                    && same_name(&objective.name, &fields.objective)
            });
            let objective = match objective_index {
                Some(index) => objectives[index].clone(),
                None => {
                    let objective =
                        Objective::new(fields.objective.clone(), perspective_id, manager_id);
                    objectives.push(objective.clone());
                    objective
                }
            };

            let duplicate = indicators.iter().any(|indicator| {
                indicator.objective_id == objective.id
                    && same_name(&indicator.name, &fields.indicator)
            });
            if !duplicate {
                indicators.push(Indicator::new(fields.indicator.clone(), &objective));
                created += 1;
            }
        }

        let mut next = graph.clone();
        next.perspectives = perspectives;
        next.managers = managers;
        next.objectives = objectives;
        next.indicators = indicators;
        self.store.replace(next)?;

        info!(
            "event=import_batch module=import status=ok rows={} created={created}",
            rows.len()
        );
        Ok(created)
    }
}

struct RowFields {
    perspective: String,
    objective: String,
    indicator: String,
    manager: String,
}

impl RowFields {
    /// Pulls the four logical fields out of a row, honoring the alternate
    /// column labels. Returns `None` when any field trims to empty.
    fn extract(row: &ImportRow) -> Option<Self> {
        let perspective = field(row, &PERSPECTIVE_LABELS)?;
        let objective = field(row, &OBJECTIVE_LABELS)?;
        let indicator = field(row, &INDICATOR_LABELS)?;
        let manager = field(row, &MANAGER_LABELS)?;
        Some(Self {
            perspective,
            objective,
            indicator,
            manager,
        })
    }
}

fn field(row: &ImportRow, labels: &[&str]) -> Option<String> {
    for label in labels {
        if let Some(value) = row.get(*label) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

fn find_by_name<T>(items: &[T], name: &str, name_of: impl Fn(&T) -> &String) -> Option<usize> {
    items.iter().position(|item| same_name(name_of(item), name))
}

/// Case-insensitive exact name match, unicode-aware.
fn same_name(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}
