//! Stream lifecycle management
//!
//! This module provides:
//! - [`StreamManager`]: validates requests, spawns one worker task per
//!   stream, signals stops, and answers queries
//! - `StreamWorker`: the per-stream execution loop (internal)
//! - [`ManagerConfig`]: pacing and capacity knobs

pub mod config;
pub mod lifecycle;
pub(crate) mod worker;

pub use config::ManagerConfig;
pub use lifecycle::{AddStreamAck, AddStreamRequest, Health, StopAck, StreamManager};
