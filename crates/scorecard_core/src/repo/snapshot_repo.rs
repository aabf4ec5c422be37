//! Graph snapshot storage contract and SQLite implementation.
//!
//! # Responsibility
//! - Load and save the whole graph as one opaque serialized payload keyed by
//!   a fixed storage key.
//! - Fall back to a default graph when no prior state exists or the payload
//!   is unparseable.
//!
//! # Invariants
//! - `load(save(graph)) == graph` for every valid graph.
//! - A corrupt payload is reported through logging, never as an error; the
//!   caller receives a fresh default graph instead.

use crate::db::DbError;
use crate::model::{now_epoch_ms, Graph};
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed key under which the one-and-only graph snapshot is stored.
pub const STORAGE_KEY: &str = "scorecard_graph_v3";

pub type SnapshotResult<T> = Result<T, SnapshotRepoError>;

/// Error for snapshot persistence operations.
#[derive(Debug)]
pub enum SnapshotRepoError {
    Db(DbError),
    Serialize(serde_json::Error),
}

impl Display for SnapshotRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize graph snapshot: {err}"),
        }
    }
}

impl Error for SnapshotRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<DbError> for SnapshotRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SnapshotRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for the whole-graph snapshot.
pub trait GraphStorage {
    /// Loads the persisted graph, or a default graph when nothing usable is
    /// stored.
    fn load(&self) -> SnapshotResult<Graph>;
    /// Persists the whole graph, replacing any previous snapshot.
    fn save(&self, graph: &Graph) -> SnapshotResult<()>;
}

/// SQLite-backed snapshot storage.
pub struct SqliteGraphStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGraphStorage<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl GraphStorage for SqliteGraphStorage<'_> {
    fn load(&self) -> SnapshotResult<Graph> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM snapshots WHERE storage_key = ?1;",
                [STORAGE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            info!("event=snapshot_load module=repo status=ok outcome=empty");
            return Ok(Graph::default());
        };

        match serde_json::from_str::<Graph>(&payload) {
            Ok(graph) => Ok(graph),
            Err(err) => {
                warn!(
                    "event=snapshot_load module=repo status=warn outcome=corrupt_payload error={err}"
                );
                Ok(Graph::default())
            }
        }
    }

    fn save(&self, graph: &Graph) -> SnapshotResult<()> {
        let payload = serde_json::to_string(graph).map_err(SnapshotRepoError::Serialize)?;
        self.conn.execute(
            "INSERT INTO snapshots (storage_key, payload, saved_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(storage_key) DO UPDATE SET
                payload = excluded.payload,
                saved_at = excluded.saved_at;",
            params![STORAGE_KEY, payload, now_epoch_ms()],
        )?;
        Ok(())
    }
}
