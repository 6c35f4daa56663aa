//! [`PhaseSnapshot`] stored as a pretty-printed JSON file.
//!
//! Writes go to a sibling temporary file first and are renamed into place,
//! so an interrupted save never leaves a truncated snapshot behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use magi_application::{SnapshotStore, SnapshotStoreError};
use magi_domain::PhaseSnapshot;
use tokio::fs;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SnapshotStore for JsonSnapshotStore {
    async fn save(&self, snapshot: &PhaseSnapshot) -> Result<(), SnapshotStoreError> {
        let json = snapshot.to_json()?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.temp_path();
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), phase = %snapshot.phase, "Snapshot saved");
        Ok(())
    }

    async fn load(&self) -> Result<Option<PhaseSnapshot>, SnapshotStoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(json) => Ok(Some(PhaseSnapshot::from_json(&json)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self) -> Result<(), SnapshotStoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magi_domain::{Command, ExecutionHistory, Phase, RejectionRecord, ToolResult};

    fn sample() -> PhaseSnapshot {
        let plan = "| # | Task | Tool | Status |\n|---|---|---|---|\n| 1 | Build | executeCommand | done |\n";
        let mut snapshot = PhaseSnapshot::new(Phase::Execution, "build the project", plan);
        let cmd = Command::new("executeCommand", vec!["cargo build".into()], "build", "build it")
            .with_plan_snapshot(plan);
        let mut history = ExecutionHistory::new();
        history.push(ToolResult::error(&cmd, "Command exited with code 101").with_detail("error[E0425]"));
        snapshot.proposer_history = history;
        snapshot.set_rejection(Some(RejectionRecord::new(
            Some(cmd),
            Command::new("rejectExecution", vec!["fix the error first".into()], "no", "no"),
        )));
        snapshot
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("state/snapshot.json"));

        let snapshot = sample();
        store.save(&snapshot).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, snapshot);
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_persisted_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("snapshot.json"));
        store.save(&sample()).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["phase"], true);
        assert_eq!(raw["request"], "build the project");
        assert_eq!(raw["proposerHistory"][0]["outcome"], "error");
        assert_eq!(raw["rejectedCommand"]["tool"], "executeCommand");
        assert_eq!(raw["rejectionReason"]["tool"], "rejectExecution");
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("none.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_corrupt_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonSnapshotStore::new(&path);
        assert!(matches!(
            store.load().await,
            Err(SnapshotStoreError::Format(_))
        ));
    }

    #[tokio::test]
    async fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("snapshot.json"));
        store.save(&sample()).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
        // clearing twice is fine
        store.clear().await.unwrap();
    }
}
