//! Persistence adapters for the graph snapshot.
//!
//! # Responsibility
//! - Keep serialization and SQL details inside the persistence boundary.
//! - Expose a storage contract the entity store can depend on without
//!   knowing the backend.

pub mod snapshot_repo;
