//! Per-stream worker loop
//!
//! One `StreamWorker` runs per stream, as its own tokio task. Each iteration
//! it re-reads the stream's status (cooperative cancellation), pulls one
//! frame, runs the configured steps in order, derives alerts, publishes the
//! fresh record, and sleeps for the pacing delay.
//!
//! All exits funnel through the same tail: the frame stream is dropped and
//! the stream is settled to `Stopped`, whether the source failed to open,
//! exhausted, or a stop was requested.

use std::sync::Arc;
use std::time::Duration;

use crate::analysis::{ResultRecord, StepRegistry};
use crate::registry::{StreamRegistry, StreamStatus};
use crate::source::FrameSource;

/// Drives one stream's pipeline to completion or cancellation
pub(crate) struct StreamWorker {
    stream_id: String,
    path: String,
    steps: Vec<String>,
    pacing: Duration,
    registry: Arc<StreamRegistry>,
    step_registry: Arc<StepRegistry>,
    source: Arc<dyn FrameSource>,
}

impl StreamWorker {
    pub(crate) fn new(
        stream_id: String,
        path: String,
        steps: Vec<String>,
        pacing: Duration,
        registry: Arc<StreamRegistry>,
        step_registry: Arc<StepRegistry>,
        source: Arc<dyn FrameSource>,
    ) -> Self {
        Self {
            stream_id,
            path,
            steps,
            pacing,
            registry,
            step_registry,
            source,
        }
    }

    /// Run the worker loop until stop, exhaustion, or source failure
    pub(crate) async fn run(self) {
        tracing::debug!(stream = %self.stream_id, path = %self.path, "Worker starting");

        let mut frames = match self.source.open(&self.path) {
            Ok(frames) => frames,
            Err(e) => {
                // The add_stream caller already returned; the failure is
                // observable only as a Stopped stream with no results.
                tracing::warn!(stream = %self.stream_id, error = %e, "Frame source unavailable");
                self.registry
                    .set_status(&self.stream_id, StreamStatus::Stopped)
                    .await;
                return;
            }
        };

        loop {
            // Cooperative cancellation, checked once per iteration
            if self.registry.status(&self.stream_id).await != Some(StreamStatus::Running) {
                tracing::debug!(stream = %self.stream_id, "Stop observed, exiting loop");
                break;
            }

            let Some(frame) = frames.next_frame() else {
                tracing::info!(stream = %self.stream_id, "Frame source exhausted");
                break;
            };

            let mut results = ResultRecord::with_capacity(self.steps.len());
            let mut alerts = Vec::new();

            for step in &self.steps {
                let fields = self.step_registry.evaluate(step, &frame);
                if let Some(alert) = self.step_registry.check_alert(step, &self.stream_id, &fields)
                {
                    alerts.push(alert);
                }
                // Duplicate step names re-run the step; the last run wins
                results.insert(step.clone(), fields);
            }

            self.registry.publish(&self.stream_id, results, alerts).await;

            tokio::time::sleep(self.pacing).await;
        }

        drop(frames);
        self.registry
            .set_status(&self.stream_id, StreamStatus::Stopped)
            .await;
        tracing::info!(stream = %self.stream_id, "Worker exited");
    }
}
