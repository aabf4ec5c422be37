//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate guard checks and store replacements into use-case APIs.
//! - Keep UI layers decoupled from graph mutation details.
//!
//! # Invariants
//! - Services mutate only through whole-graph store replacement.
//! - Validation failures leave the graph untouched.

use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod admin_service;
pub mod import_service;
pub mod indicator_service;
pub mod report_service;
pub mod target_service;

/// How an error should be presented by the invoking UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// User-correctable; shown as a warning message.
    Warning,
    /// Operational failure; shown as an error message.
    Error,
}

/// Result of a save that may be silently skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The record was written and committed.
    Saved,
    /// The targeted record no longer exists; nothing was changed.
    Ignored,
}

/// Errors shared by the indicator and target lifecycle controllers.
#[derive(Debug)]
pub enum LifecycleError {
    /// The record is `final`; edits are rejected until an unlock.
    Locked(Uuid),
    /// Finalize was attempted with required fields still blank.
    Incomplete { missing: Vec<&'static str> },
    /// The mutation is installed but could not be persisted, or the store
    /// failed outright.
    Store(StoreError),
}

impl LifecycleError {
    pub fn severity(&self) -> Severity {
        match self {
            Self::Locked(_) | Self::Incomplete { .. } => Severity::Warning,
            Self::Store(_) => Severity::Error,
        }
    }
}

impl Display for LifecycleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Locked(id) => write!(f, "record {id} is finalized and locked for editing"),
            Self::Incomplete { missing } => {
                write!(f, "cannot finalize, required fields missing: {}", missing.join(", "))
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LifecycleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for LifecycleError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
