//! Snapshot persistence: JSON file adapter for the `SnapshotStore` port.

mod json_store;

pub use json_store::JsonSnapshotStore;

