//! Frame source abstraction
//!
//! The manager treats frame acquisition as an external capability: something
//! that can open a path and hand back a lazy, finite-or-infinite sequence of
//! frames. Real decoders (file, RTSP, device) implement [`FrameSource`]
//! outside this crate; [`MemorySource`] ships in-repo for tests and demos.
//!
//! Frames are opaque to the lifecycle layer. The payload is `bytes::Bytes`,
//! so cloning a frame only bumps a reference count.

pub mod memory;

pub use memory::MemorySource;

use bytes::Bytes;

/// One discrete unit of input pulled from a source
///
/// Cheap to clone due to `Bytes` reference counting.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Zero-based position of this frame within its stream
    pub index: u64,
    /// Frame payload (opaque to the manager)
    pub data: Bytes,
}

impl Frame {
    /// Create a new frame
    pub fn new(index: u64, data: Bytes) -> Self {
        Self { index, data }
    }
}

/// Factory for frame streams
///
/// `open` is called once per worker, inside the spawned task; a failure here
/// is not reported back to the caller that created the stream — the worker
/// settles the stream to `Stopped` with no results ever published.
pub trait FrameSource: Send + Sync {
    /// Open a path and return a stream of frames
    fn open(&self, path: &str) -> std::result::Result<Box<dyn FrameStream>, SourceError>;
}

/// A lazy sequence of frames
///
/// `None` means the source is exhausted; the worker treats that as a natural
/// end of stream. A blocking pull is an accepted suspension point bounded by
/// the external source's behavior.
pub trait FrameStream: Send {
    /// Pull the next frame, or `None` when the source is exhausted
    fn next_frame(&mut self) -> Option<Frame>;
}

/// Error type for frame source operations
#[derive(Debug, Clone)]
pub enum SourceError {
    /// The path could not be opened
    OpenFailed {
        /// The path that was requested
        path: String,
        /// Human-readable reason
        reason: String,
    },
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::OpenFailed { path, reason } => {
                write!(f, "Failed to open source {}: {}", path, reason)
            }
        }
    }
}

impl std::error::Error for SourceError {}
