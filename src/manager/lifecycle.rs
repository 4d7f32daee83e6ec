//! Stream manager
//!
//! The only component that spawns or signals workers. Validates incoming
//! requests, delegates uniqueness to the registry, spawns exactly one worker
//! task per accepted stream, and answers queries from registry snapshots.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::config::ManagerConfig;
use super::worker::StreamWorker;
use crate::analysis::{ResultRecord, StepRegistry};
use crate::error::{Error, Result};
use crate::registry::{StreamDescriptor, StreamRegistry, StreamStats, StreamStatus};
use crate::source::FrameSource;

/// Request to create a stream
///
/// Fields are optional on purpose: validation is key-presence only, exactly
/// what an API layer deserializing a JSON body needs. Empty strings and
/// empty model lists are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddStreamRequest {
    /// Unique stream ID (caller-supplied, immutable, never reused)
    pub stream_id: Option<String>,
    /// Source path, opaque to the manager
    pub path: Option<String>,
    /// Ordered pipeline of step names
    pub models: Option<Vec<String>>,
}

/// Acknowledgement returned by a successful `add_stream`
#[derive(Debug, Clone, Serialize)]
pub struct AddStreamAck {
    /// Human-readable confirmation
    pub message: String,
    /// The stream ID that was created
    pub id: String,
}

/// Acknowledgement returned by a successful `stop_stream`
#[derive(Debug, Clone, Serialize)]
pub struct StopAck {
    /// Human-readable confirmation
    pub message: String,
}

/// Health probe response; always ok, no state dependency
#[derive(Debug, Clone, Serialize)]
pub struct Health {
    /// Constant "ok"
    pub status: &'static str,
}

/// Orchestrates the registry and worker lifecycles
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct StreamManager {
    config: ManagerConfig,
    registry: Arc<StreamRegistry>,
    steps: Arc<StepRegistry>,
    source: Arc<dyn FrameSource>,
    /// Handles of spawned workers, kept so termination stays observable
    workers: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl StreamManager {
    /// Create a new manager over the given source and step registry
    pub fn new(
        config: ManagerConfig,
        source: Arc<dyn FrameSource>,
        steps: Arc<StepRegistry>,
    ) -> Self {
        Self {
            config,
            registry: Arc::new(StreamRegistry::new()),
            steps,
            source,
            workers: Mutex::new(HashMap::new()),
        }
    }

    /// Get a reference to the stream registry
    pub fn registry(&self) -> &Arc<StreamRegistry> {
        &self.registry
    }

    /// Get the manager configuration
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Validate a request, register the stream, and spawn its worker
    ///
    /// Returns as soon as the worker is spawned; the caller is never blocked
    /// on worker progress. On any error nothing is mutated and no worker is
    /// spawned.
    pub async fn add_stream(&self, request: AddStreamRequest) -> Result<AddStreamAck> {
        let stream_id = request.stream_id.ok_or(Error::MissingKeys)?;
        let path = request.path.ok_or(Error::MissingKeys)?;
        let steps = request.models.ok_or(Error::MissingKeys)?;

        // Best-effort limit; racing add_stream calls may briefly overshoot
        if self.config.max_streams > 0
            && self.registry.running_count().await >= self.config.max_streams
        {
            tracing::warn!(
                stream = %stream_id,
                limit = self.config.max_streams,
                "Stream rejected: running limit reached"
            );
            return Err(Error::CapacityExceeded {
                limit: self.config.max_streams,
            });
        }

        self.registry
            .create(&stream_id, path.clone(), steps.clone())
            .await?;

        let worker = StreamWorker::new(
            stream_id.clone(),
            path,
            steps,
            self.config.pacing,
            Arc::clone(&self.registry),
            Arc::clone(&self.steps),
            Arc::clone(&self.source),
        );
        let handle = tokio::spawn(worker.run());
        self.workers.lock().await.insert(stream_id.clone(), handle);

        tracing::info!(stream = %stream_id, "Stream added");

        Ok(AddStreamAck {
            message: "Stream added".to_string(),
            id: stream_id,
        })
    }

    /// Request a stream to stop
    ///
    /// Cooperative: the worker observes the status at its next iteration
    /// boundary, bounded by one pacing interval plus one frame pull and one
    /// pipeline pass. Idempotent for existing streams; unknown IDs fail.
    pub async fn stop_stream(&self, stream_id: &str) -> Result<StopAck> {
        if self.registry.status(stream_id).await.is_none() {
            return Err(Error::StreamNotFound(stream_id.to_string()));
        }

        self.registry
            .set_status(stream_id, StreamStatus::Stopped)
            .await;

        Ok(StopAck {
            message: format!("Stream {} stopped", stream_id),
        })
    }

    /// Snapshot of every stream's descriptor
    pub async fn list_streams(&self) -> HashMap<String, StreamDescriptor> {
        self.registry.snapshot_streams().await
    }

    /// Snapshot of the latest result record per stream
    pub async fn list_results(&self) -> HashMap<String, ResultRecord> {
        self.registry.snapshot_results().await
    }

    /// Snapshot of the latest alert list per stream
    pub async fn list_alerts(&self) -> HashMap<String, Vec<String>> {
        self.registry.snapshot_alerts().await
    }

    /// Statistics for one stream
    pub async fn stream_stats(&self, stream_id: &str) -> Option<StreamStats> {
        self.registry.stream_stats(stream_id).await
    }

    /// Health probe
    pub fn health(&self) -> Health {
        Health { status: "ok" }
    }

    /// Wait for a stream's worker task to finish
    ///
    /// Consumes the retained handle; a second call (or a call for an unknown
    /// ID) returns immediately. Mostly useful to embedders and tests that
    /// need a hard termination point rather than polling status.
    pub async fn join_stream(&self, stream_id: &str) {
        let handle = self.workers.lock().await.remove(stream_id);
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!(stream = stream_id, error = %e, "Worker task panicked");
            }
        }
    }
}
