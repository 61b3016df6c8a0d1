// Filesystem abstraction layer
//
// Everything the navigator reads from disk goes through `FsBackend`, so tests
// can count or slow down calls without touching the tree logic.

pub mod backend;
pub mod local;
pub mod slow;

pub use backend::{FsBackend, FsEntry, FsEntryType, FsMetadata};
pub use local::LocalFsBackend;
pub use slow::{BackendMetrics, SlowFsBackend, SlowFsConfig};
