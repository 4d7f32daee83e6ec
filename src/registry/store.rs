//! Stream registry implementation
//!
//! The central registry holding every stream's descriptor, latest results,
//! and latest alerts, keyed by stream ID.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::entry::{StreamDescriptor, StreamEntry, StreamStats, StreamStatus};
use super::error::RegistryError;
use crate::analysis::ResultRecord;

/// Central registry for all streams, live and stopped
///
/// Thread-safe via a two-level `RwLock` scheme: the outer map lock is
/// write-held only while inserting a new entry, and every per-stream
/// operation locks just that stream's entry.
pub struct StreamRegistry {
    /// Map of stream ID to stream entry
    streams: RwLock<HashMap<String, Arc<RwLock<StreamEntry>>>>,
}

impl StreamRegistry {
    /// Create a new, empty stream registry
    pub fn new() -> Self {
        Self {
            streams: RwLock::new(HashMap::new()),
        }
    }

    /// Create a new stream entry in the `Running` state
    ///
    /// Atomic check-and-insert: concurrent `create` calls for the same ID
    /// cannot both succeed. IDs are never reused, even after the stream has
    /// stopped.
    pub async fn create(
        &self,
        stream_id: &str,
        path: String,
        steps: Vec<String>,
    ) -> Result<(), RegistryError> {
        let mut streams = self.streams.write().await;

        if streams.contains_key(stream_id) {
            return Err(RegistryError::AlreadyExists(stream_id.to_string()));
        }

        tracing::info!(
            stream = stream_id,
            path = %path,
            steps = ?steps,
            "Stream registered"
        );

        let entry = StreamEntry::new(path, steps);
        streams.insert(stream_id.to_string(), Arc::new(RwLock::new(entry)));

        Ok(())
    }

    /// Get a stream's current status, or `None` if the ID is unknown
    pub async fn status(&self, stream_id: &str) -> Option<StreamStatus> {
        let streams = self.streams.read().await;
        let entry_arc = streams.get(stream_id)?;
        let entry = entry_arc.read().await;
        Some(entry.descriptor.status)
    }

    /// Set a stream's status
    ///
    /// Idempotent and panic-free: an unknown ID is a logged no-op, and a
    /// stopped stream stays stopped (the reverse transition is ignored).
    pub async fn set_status(&self, stream_id: &str, status: StreamStatus) {
        let streams = self.streams.read().await;

        let Some(entry_arc) = streams.get(stream_id) else {
            tracing::debug!(stream = stream_id, "set_status on unknown stream, ignoring");
            return;
        };

        let mut entry = entry_arc.write().await;

        if entry.descriptor.status == StreamStatus::Stopped && status == StreamStatus::Running {
            tracing::warn!(stream = stream_id, "Ignoring attempt to restart a stopped stream");
            return;
        }

        if entry.descriptor.status != status {
            tracing::info!(stream = stream_id, status = %status, "Stream status changed");
        }
        entry.descriptor.status = status;
    }

    /// Publish one iteration's results and alerts for a stream
    ///
    /// Replaces the previous record and alert list wholesale, under a single
    /// entry lock, so a reader never observes a half-updated pair. Unknown
    /// IDs are a logged no-op.
    pub async fn publish(&self, stream_id: &str, results: ResultRecord, alerts: Vec<String>) {
        let streams = self.streams.read().await;

        let Some(entry_arc) = streams.get(stream_id) else {
            tracing::debug!(stream = stream_id, "publish for unknown stream, dropping");
            return;
        };

        let mut entry = entry_arc.write().await;

        tracing::debug!(
            stream = stream_id,
            steps = results.len(),
            alerts = alerts.len(),
            "Published iteration results"
        );

        entry.record_publish(results, alerts);
    }

    /// Point-in-time copy of every stream's descriptor
    pub async fn snapshot_streams(&self) -> HashMap<String, StreamDescriptor> {
        let streams = self.streams.read().await;

        let mut out = HashMap::with_capacity(streams.len());
        for (id, entry_arc) in streams.iter() {
            let entry = entry_arc.read().await;
            out.insert(id.clone(), entry.descriptor.clone());
        }
        out
    }

    /// Point-in-time copy of the latest result record per stream
    ///
    /// Streams that have not completed an iteration yet are absent; that is
    /// expected, not an error.
    pub async fn snapshot_results(&self) -> HashMap<String, ResultRecord> {
        let streams = self.streams.read().await;

        let mut out = HashMap::new();
        for (id, entry_arc) in streams.iter() {
            let entry = entry_arc.read().await;
            if let Some(ref results) = entry.latest_results {
                out.insert(id.clone(), results.clone());
            }
        }
        out
    }

    /// Point-in-time copy of the latest alert list per stream
    pub async fn snapshot_alerts(&self) -> HashMap<String, Vec<String>> {
        let streams = self.streams.read().await;

        let mut out = HashMap::new();
        for (id, entry_arc) in streams.iter() {
            let entry = entry_arc.read().await;
            if let Some(ref alerts) = entry.latest_alerts {
                out.insert(id.clone(), alerts.clone());
            }
        }
        out
    }

    /// Get statistics for one stream
    pub async fn stream_stats(&self, stream_id: &str) -> Option<StreamStats> {
        let streams = self.streams.read().await;
        let entry_arc = streams.get(stream_id)?;
        let entry = entry_arc.read().await;

        Some(StreamStats {
            status: entry.descriptor.status,
            frames_processed: entry.frames_processed,
            alerts_emitted: entry.alerts_emitted,
            uptime: entry.created_at.elapsed(),
        })
    }

    /// Total number of streams ever created
    pub async fn stream_count(&self) -> usize {
        self.streams.read().await.len()
    }

    /// Number of streams currently in the `Running` state
    pub async fn running_count(&self) -> usize {
        let streams = self.streams.read().await;

        let mut count = 0;
        for entry_arc in streams.values() {
            let entry = entry_arc.read().await;
            if entry.descriptor.status == StreamStatus::Running {
                count += 1;
            }
        }
        count
    }
}

impl Default for StreamRegistry {
    fn default() -> Self {
        Self::new()
    }
}
