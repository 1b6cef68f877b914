//! Pending-record accumulator.
//!
//! Holds the bytes of the record currently being framed as a list of
//! segments. Appending is O(1) per chunk; the segments are joined once, when
//! the record resolves.

use bytes::{Bytes, BytesMut};

#[derive(Debug, Default)]
pub struct PendingBuffer {
    segments: Vec<Bytes>,
    len: usize,
}

impl PendingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment. Empty segments still mark the buffer as holding a
    /// record in progress.
    pub fn push(&mut self, segment: Bytes) {
        self.len += segment.len();
        self.segments.push(segment);
    }

    /// True once any segment has been pushed since the last clear, even an
    /// empty one.
    pub fn is_active(&self) -> bool {
        !self.segments.is_empty()
    }

    /// Total bytes held
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.len = 0;
    }

    /// Join `self` with an optional trailing slice and clear the buffer.
    pub fn take_with(&mut self, tail: &[u8]) -> Bytes {
        let out = match (self.segments.len(), tail.is_empty()) {
            (0, _) => Bytes::copy_from_slice(tail),
            (1, true) => self.segments.pop().unwrap_or_default(),
            _ => {
                let mut joined = BytesMut::with_capacity(self.len + tail.len());
                for segment in &self.segments {
                    joined.extend_from_slice(segment);
                }
                joined.extend_from_slice(tail);
                joined.freeze()
            }
        };
        self.clear();
        out
    }
}

// =============================================================================
// Tests
// =============================================================================
