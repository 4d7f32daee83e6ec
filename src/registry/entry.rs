//! Stream entry and state types
//!
//! This module defines the per-stream state stored in the registry.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::analysis::ResultRecord;

/// Status of a stream
///
/// The only transition is `Running` -> `Stopped`. A stopped stream is
/// terminal; resuming requires a new stream with a different ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamStatus {
    /// The stream's worker is (or is about to be) running
    Running,
    /// The worker has exited, or was told to stop
    Stopped,
}

impl std::fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamStatus::Running => write!(f, "running"),
            StreamStatus::Stopped => write!(f, "stopped"),
        }
    }
}

/// Public view of one stream's configuration and status
///
/// The `steps` field serializes as `models`, the name the external
/// request/response contract uses for the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct StreamDescriptor {
    /// Source path, opaque to the manager
    pub path: String,
    /// Ordered pipeline of step names (duplicates allowed)
    #[serde(rename = "models")]
    pub steps: Vec<String>,
    /// Current status
    pub status: StreamStatus,
}

/// Entry for a single stream in the registry
pub struct StreamEntry {
    /// Configuration and status
    pub descriptor: StreamDescriptor,

    /// Latest published result record (None until the first iteration)
    pub latest_results: Option<ResultRecord>,

    /// Alerts from the latest iteration only (None until the first iteration)
    pub latest_alerts: Option<Vec<String>>,

    /// Total frames processed by the worker
    pub frames_processed: u64,

    /// Total alerts emitted across all iterations
    pub alerts_emitted: u64,

    /// When the stream was created
    pub created_at: Instant,
}

impl StreamEntry {
    /// Create a new entry in the `Running` state with nothing published yet
    pub(super) fn new(path: String, steps: Vec<String>) -> Self {
        Self {
            descriptor: StreamDescriptor {
                path,
                steps,
                status: StreamStatus::Running,
            },
            latest_results: None,
            latest_alerts: None,
            frames_processed: 0,
            alerts_emitted: 0,
            created_at: Instant::now(),
        }
    }

    /// Replace the published record and alerts wholesale, bumping counters
    pub(super) fn record_publish(&mut self, results: ResultRecord, alerts: Vec<String>) {
        self.frames_processed += 1;
        self.alerts_emitted += alerts.len() as u64;
        self.latest_results = Some(results);
        self.latest_alerts = Some(alerts);
    }
}

/// Statistics for a stream
#[derive(Debug, Clone)]
pub struct StreamStats {
    /// Current status
    pub status: StreamStatus,
    /// Total frames processed
    pub frames_processed: u64,
    /// Total alerts emitted
    pub alerts_emitted: u64,
    /// Time since the stream was created
    pub uptime: Duration,
}
