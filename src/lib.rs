//! Streamlens: lifecycle management for per-stream frame analysis workers
//!
//! This crate manages a dynamic set of independently running stream workers.
//! Each worker pulls frames from a source, runs a configurable pipeline of
//! named analysis steps over every frame, and publishes the latest results
//! and alerts into a shared registry that any number of callers can query
//! concurrently.
//!
//! # Architecture
//!
//! ```text
//!   add_stream / stop_stream            list_streams / results / alerts
//!            │                                        │
//!            ▼                                        ▼
//!     ┌──────────────┐   create / set_status   ┌───────────────┐
//!     │ StreamManager│ ───────────────────────►│ StreamRegistry│
//!     └──────┬───────┘                         └───────▲───────┘
//!            │ tokio::spawn (one task per stream)      │ publish
//!            ▼                                         │
//!     ┌──────────────┐    next_frame    ┌──────────────┴──┐
//!     │ FrameSource  │ ───────────────► │  StreamWorker   │
//!     └──────────────┘                  │  (paced loop)   │
//!                                       └─────────────────┘
//! ```
//!
//! Workers are cooperative: each iteration re-reads the stream's status from
//! the registry and exits once it is no longer `Running`. Stopping a stream
//! is therefore bounded by one pacing interval plus one frame pull and one
//! pipeline pass, never an interrupt.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use streamlens::analysis::StepRegistry;
//! use streamlens::source::MemorySource;
//! use streamlens::{AddStreamRequest, ManagerConfig, StreamManager};
//!
//! # async fn doc() -> streamlens::Result<()> {
//! let source = Arc::new(MemorySource::new().with_frames("cam1", 100));
//! let steps = Arc::new(StepRegistry::with_builtins());
//! let manager = StreamManager::new(ManagerConfig::default(), source, steps);
//!
//! manager.add_stream(AddStreamRequest {
//!     stream_id: Some("cam1".into()),
//!     path: Some("cam1".into()),
//!     models: Some(vec!["defect_analysis".into()]),
//! }).await?;
//!
//! let streams = manager.list_streams().await;
//! manager.stop_stream("cam1").await?;
//! # let _ = streams;
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod error;
pub mod manager;
pub mod registry;
pub mod source;

pub use analysis::{ResultFields, ResultRecord, StepRegistry};
pub use error::{Error, Result};
pub use manager::{AddStreamAck, AddStreamRequest, Health, ManagerConfig, StopAck, StreamManager};
pub use registry::{StreamDescriptor, StreamRegistry, StreamStats, StreamStatus};
pub use source::{Frame, FrameSource, FrameStream, MemorySource, SourceError};
