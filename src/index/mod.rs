//! Snapshot management: immutable automaton builds and the registry that
//! hands them out to scanners

pub mod registry;
pub mod snapshot;

pub use registry::SnapshotRegistry;
pub use snapshot::{fingerprint, AutomatonSnapshot, SnapshotStats};
