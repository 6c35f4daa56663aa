//! Snapshot store port
//!
//! Persistence of a [`PhaseSnapshot`] so a cancelled session can be resumed.

use async_trait::async_trait;
use magi_domain::PhaseSnapshot;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotStoreError {
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn save(&self, snapshot: &PhaseSnapshot) -> Result<(), SnapshotStoreError>;

    /// The stored snapshot, or `None` when nothing has been saved.
    async fn load(&self) -> Result<Option<PhaseSnapshot>, SnapshotStoreError>;

    /// Remove the stored snapshot; a missing snapshot is not an error.
    async fn clear(&self) -> Result<(), SnapshotStoreError>;
}
