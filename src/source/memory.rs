//! In-memory frame source
//!
//! Scripted source used by tests and demos: each registered path yields a
//! fixed number of synthetic frames, optionally looping forever. Opening an
//! unregistered path fails, which is how tests exercise the open-failure
//! exit of the worker loop.

use std::collections::HashMap;

use bytes::Bytes;

use super::{Frame, FrameSource, FrameStream, SourceError};

#[derive(Debug, Clone, Copy)]
struct Script {
    frame_count: u64,
    looping: bool,
}

/// Frame source backed by per-path scripts
#[derive(Debug, Default)]
pub struct MemorySource {
    scripts: HashMap<String, Script>,
}

impl MemorySource {
    /// Create an empty source (every open fails)
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a path producing `frame_count` frames, then exhausting
    pub fn with_frames(mut self, path: impl Into<String>, frame_count: u64) -> Self {
        self.scripts.insert(
            path.into(),
            Script {
                frame_count,
                looping: false,
            },
        );
        self
    }

    /// Register a path producing frames forever
    pub fn with_endless(mut self, path: impl Into<String>) -> Self {
        self.scripts.insert(
            path.into(),
            Script {
                frame_count: u64::MAX,
                looping: true,
            },
        );
        self
    }
}

impl FrameSource for MemorySource {
    fn open(&self, path: &str) -> Result<Box<dyn FrameStream>, SourceError> {
        let script = self
            .scripts
            .get(path)
            .ok_or_else(|| SourceError::OpenFailed {
                path: path.to_string(),
                reason: "no such source registered".to_string(),
            })?;

        Ok(Box::new(MemoryStream {
            next_index: 0,
            script: *script,
        }))
    }
}

struct MemoryStream {
    next_index: u64,
    script: Script,
}

impl FrameStream for MemoryStream {
    fn next_frame(&mut self) -> Option<Frame> {
        if !self.script.looping && self.next_index >= self.script.frame_count {
            return None;
        }

        let index = self.next_index;
        self.next_index = self.next_index.wrapping_add(1);

        // Payload carries the frame index so steps can tell frames apart
        Some(Frame::new(index, Bytes::from(index.to_be_bytes().to_vec())))
    }
}
