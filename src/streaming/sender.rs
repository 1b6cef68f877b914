//! Writer side: values in, framed bytes out.

use crate::error::{JsonSeqError, Result};
use crate::streaming::channel::FrameStats;
use crate::streaming::finite::ensure_finite;
use crate::streaming::protocol::{Delimiters, FramingConfig};
use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;

/// Per-value framer. Every call is independent of the previous ones.
#[derive(Debug, Default)]
pub struct FrameWriter {
    delimiters: Delimiters,
    stats: FrameStats,
}

impl FrameWriter {
    pub fn new(delimiters: Delimiters) -> Self {
        Self {
            delimiters,
            stats: FrameStats::new(),
        }
    }

    pub fn from_config(config: &FramingConfig) -> Result<Self> {
        Ok(Self::new(config.delimiters()?))
    }

    pub fn delimiters(&self) -> Delimiters {
        self.delimiters
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Serialize `value` and wrap it in the configured delimiters.
    ///
    /// A delimiter of `0` is left out. Values holding `NaN` or infinite
    /// floats are rejected. On error nothing is produced and the writer stays
    /// usable for the next value.
    pub fn encode<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        self.encode_into(value, &mut buf)?;
        Ok(buf.freeze())
    }

    /// Encode into an existing buffer, for batching several records into one
    /// write. On error `out` is left as it was.
    pub fn encode_into<T: Serialize + ?Sized>(&mut self, value: &T, out: &mut BytesMut) -> Result<()> {
        let mark = out.len();
        if let Err(e) = self.write_record(value, out) {
            out.truncate(mark);
            self.stats.serialize_failures += 1;
            tracing::debug!("Failed to serialize value: {}", e);
            return Err(JsonSeqError::Serialize(e));
        }

        self.stats.records += 1;
        self.stats.bytes_out += (out.len() - mark) as u64;
        Ok(())
    }

    fn write_record<T: Serialize + ?Sized>(
        &self,
        value: &T,
        out: &mut BytesMut,
    ) -> serde_json::Result<()> {
        ensure_finite(value)?;
        if self.delimiters.writes_start() {
            out.put_u8(self.delimiters.start());
        }
        serde_json::to_writer((&mut *out).writer(), value)?;
        if self.delimiters.writes_end() {
            out.put_u8(self.delimiters.end());
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
