//! Entity store: the single versioned holder of the graph snapshot.
//!
//! # Responsibility
//! - Own the in-memory graph and expose read access.
//! - Replace the graph wholesale and persist each replacement through the
//!   storage adapter.
//!
//! # Invariants
//! - Mutations are whole-graph replacements; consumers never observe a
//!   partially-applied graph.
//! - A persistence failure does not roll the in-memory graph back; it is
//!   surfaced as a distinct error kind instead.

use crate::model::Graph;
use crate::repo::snapshot_repo::{GraphStorage, SnapshotRepoError};
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error for entity-store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Initial load from the storage adapter failed.
    Load(SnapshotRepoError),
    /// The replacement is installed in memory but could not be persisted.
    Persistence(SnapshotRepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "failed to load graph snapshot: {err}"),
            Self::Persistence(err) => {
                write!(f, "graph replaced in memory but not persisted: {err}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) | Self::Persistence(err) => Some(err),
        }
    }
}

/// Versioned snapshot container backed by a storage adapter.
pub struct GraphStore<S: GraphStorage> {
    graph: Graph,
    storage: S,
    version: u64,
}

impl<S: GraphStorage> GraphStore<S> {
    /// Opens the store by loading the persisted snapshot (or a default
    /// graph when nothing usable is stored).
    pub fn open(storage: S) -> Result<Self, StoreError> {
        let graph = storage.load().map_err(StoreError::Load)?;
        Ok(Self {
            graph,
            storage,
            version: 0,
        })
    }

    /// Current graph snapshot.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Monotonic replacement counter, one tick per successful install.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Installs `next` as the current graph and persists it.
    ///
    /// The in-memory replacement always happens; when the storage adapter
    /// fails, `StoreError::Persistence` is returned and the new graph stays
    /// installed (fire-and-forget persistence policy).
    pub fn replace(&mut self, next: Graph) -> Result<(), StoreError> {
        self.graph = next;
        self.version += 1;

        if let Err(err) = self.storage.save(&self.graph) {
            error!("event=snapshot_save module=store status=error version={} error={err}",
                self.version);
            return Err(StoreError::Persistence(err));
        }
        Ok(())
    }
}
