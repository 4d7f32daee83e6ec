//! Stream registry: shared state for descriptors, results, and alerts
//!
//! The registry is the single piece of shared mutable state in the crate.
//! Each stream has exactly one concurrent writer (its worker) and any number
//! of readers (query callers), so the storage is an outer `RwLock` map of
//! per-stream `Arc<RwLock<StreamEntry>>` cells:
//!
//! ```text
//!                    Arc<StreamRegistry>
//!               ┌────────────────────────────┐
//!               │ streams: HashMap<StreamId, │
//!               │   Arc<RwLock<StreamEntry>> │
//!               │ >                          │
//!               └────────────┬───────────────┘
//!                            │
//!          ┌─────────────────┼─────────────────┐
//!          ▼                 ▼                 ▼
//!     [Worker A]        [Worker B]       [Query callers]
//!     publish()         publish()        snapshot_*()
//! ```
//!
//! The outer lock is write-held only for `create`; everything else takes the
//! outer read lock plus one entry lock, so unrelated streams never serialize
//! against each other. A `publish` replaces a stream's result record and
//! alert list under one entry write lock, so readers never observe a torn
//! pair for a single stream. Snapshots of different maps are taken
//! independently and may straddle iterations; that skew is accepted.
//!
//! Entries are never removed: a stream ID refers to the same descriptor for
//! the life of the process, and `create` rejects any ID ever used before.

pub mod entry;
pub mod error;
pub mod store;

pub use entry::{StreamDescriptor, StreamEntry, StreamStats, StreamStatus};
pub use error::RegistryError;
pub use store::StreamRegistry;
