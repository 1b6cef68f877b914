//! Reader side: byte chunks in, JSON values out.
//!
//! A single forward scan per chunk. Bytes are copied only when a boundary
//! is confirmed (into the value parser) or when a record spills past the end
//! of the chunk (into the pending buffer).

use crate::streaming::buffer::PendingBuffer;
use crate::streaming::channel::{Anomaly, AnomalyHandler, AnomalyKind, FrameStats, ReadEvent};
use crate::streaming::protocol::{Delimiters, FramingConfig};
use crate::error::Result;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;

/// Incremental record reader.
///
/// Feed chunks with [`process`](Self::process) or
/// [`process_with`](Self::process_with). Calls must be sequential; the reader
/// keeps the bytes of an unterminated record between calls.
///
/// Anomalies (invalid or truncated records) never stop the stream. They are
/// passed to every handler registered with [`on_anomaly`](Self::on_anomaly)
/// and, for `process_with`, to the event callback as well.
pub struct FrameReader<T = serde_json::Value> {
    delimiters: Delimiters,
    max_record_bytes: Option<usize>,
    pending: PendingBuffer,
    handlers: Vec<AnomalyHandler>,
    stats: FrameStats,
    _value: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> FrameReader<T> {
    pub fn new(delimiters: Delimiters) -> Self {
        Self {
            delimiters,
            max_record_bytes: None,
            pending: PendingBuffer::new(),
            handlers: Vec::new(),
            stats: FrameStats::new(),
            _value: PhantomData,
        }
    }

    pub fn from_config(config: &FramingConfig) -> Result<Self> {
        let mut reader = Self::new(config.delimiters()?);
        reader.max_record_bytes = config.max_record_bytes;
        Ok(reader)
    }

    /// Cap the bytes of one record. A record longer than the cap is never
    /// parsed: it is reported as truncated with its first `max` bytes, and
    /// the rest of it, up to the next start delimiter, is skipped.
    pub fn with_max_record_bytes(mut self, max: usize) -> Self {
        self.max_record_bytes = Some(max);
        self
    }

    /// Register an anomaly observer. Handlers run inline, in registration
    /// order, for every dropped record.
    pub fn on_anomaly<F>(&mut self, handler: F)
    where
        F: FnMut(&Anomaly) + Send + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    pub fn delimiters(&self) -> Delimiters {
        self.delimiters
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Whether a record is in progress across chunk boundaries.
    pub fn has_pending(&self) -> bool {
        self.pending.is_active()
    }

    /// Bytes held for the record in progress.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drop the record in progress without reporting it.
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Process one chunk and return the values it completed.
    pub fn process(&mut self, chunk: &[u8]) -> Vec<T> {
        let mut values = Vec::new();
        self.process_with(chunk, |event| {
            if let ReadEvent::Value(v) = event {
                values.push(v);
            }
        });
        values
    }

    /// Process one chunk, passing every resolved record to `on_event` in
    /// stream order.
    pub fn process_with<F>(&mut self, chunk: &[u8], mut on_event: F)
    where
        F: FnMut(ReadEvent<T>),
    {
        let start = self.delimiters.start();
        let end = self.delimiters.end();
        self.stats.bytes_in += chunk.len() as u64;

        // Offset of the record that began in this chunk. Never set while the
        // pending buffer is active.
        let mut record_start: Option<usize> = None;

        for (i, &b) in chunk.iter().enumerate() {
            if b == start {
                if record_start.is_some() || self.pending.is_active() {
                    let from = record_start.unwrap_or(0);
                    let raw = self.pending.take_with(&chunk[from..i]);
                    if self.exceeds_cap(raw.len()) {
                        self.discard_oversized(raw, &mut on_event);
                    } else {
                        self.report(Anomaly::truncated(decode_lossy(&raw)), &mut on_event);
                    }
                }
                record_start = Some(i + 1);
            } else if b == end {
                if record_start.is_none() && !self.pending.is_active() {
                    continue;
                }
                let from = record_start.take().unwrap_or(0);
                let raw = self.pending.take_with(&chunk[from..i]);
                if self.exceeds_cap(raw.len()) {
                    self.discard_oversized(raw, &mut on_event);
                } else {
                    self.resolve(raw, &mut on_event);
                }
            }
        }

        let carry = match record_start {
            Some(from) => Some(from),
            None if self.pending.is_active() => Some(0),
            None => None,
        };
        if let Some(from) = carry {
            self.carry_over(&chunk[from..], &mut on_event);
        }
    }

    fn carry_over<F>(&mut self, tail: &[u8], on_event: &mut F)
    where
        F: FnMut(ReadEvent<T>),
    {
        if self.exceeds_cap(self.pending.len() + tail.len()) {
            let raw = self.pending.take_with(tail);
            self.discard_oversized(raw, on_event);
            return;
        }
        self.pending.push(Bytes::copy_from_slice(tail));
    }

    fn exceeds_cap(&self, len: usize) -> bool {
        self.max_record_bytes.is_some_and(|max| len > max)
    }

    /// Reported content of a record over the cap is its first `max` bytes,
    /// so the anomaly is the same wherever the chunks were split.
    fn within_cap(&self, raw: Bytes) -> Bytes {
        match self.max_record_bytes {
            Some(max) if raw.len() > max => raw.slice(..max),
            _ => raw,
        }
    }

    fn discard_oversized<F>(&mut self, raw: Bytes, on_event: &mut F)
    where
        F: FnMut(ReadEvent<T>),
    {
        let max = self.max_record_bytes.unwrap_or(0);
        tracing::warn!(
            "Discarding record of at least {} bytes (limit {} bytes)",
            raw.len(),
            max
        );
        let raw = self.within_cap(raw);
        self.report(Anomaly::truncated(decode_lossy(&raw)), on_event);
    }

    fn resolve<F>(&mut self, raw: Bytes, on_event: &mut F)
    where
        F: FnMut(ReadEvent<T>),
    {
        match serde_json::from_slice::<T>(&raw) {
            Ok(value) => {
                tracing::trace!("Parsed record of {} bytes", raw.len());
                self.stats.records += 1;
                on_event(ReadEvent::Value(value));
            }
            Err(e) => {
                tracing::debug!("Dropping invalid record of {} bytes: {}", raw.len(), e);
                self.report(Anomaly::invalid(decode_lossy(&raw)), on_event);
            }
        }
    }

    fn report<F>(&mut self, anomaly: Anomaly, on_event: &mut F)
    where
        F: FnMut(ReadEvent<T>),
    {
        if anomaly.kind == AnomalyKind::Truncated {
            tracing::debug!("Dropping truncated record of {} bytes", anomaly.content.len());
        }
        self.stats.record_anomaly(anomaly.kind);
        for handler in self.handlers.iter_mut() {
            handler(&anomaly);
        }
        on_event(ReadEvent::Anomaly(anomaly));
    }
}

impl<T: DeserializeOwned> Default for FrameReader<T> {
    fn default() -> Self {
        Self::new(Delimiters::default())
    }
}

impl<T> fmt::Debug for FrameReader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameReader")
            .field("delimiters", &self.delimiters)
            .field("max_record_bytes", &self.max_record_bytes)
            .field("pending", &self.pending)
            .field("handlers", &self.handlers.len())
            .field("stats", &self.stats)
            .finish()
    }
}

/// Malformed UTF-8 is replaced with U+FFFD in reported content.
fn decode_lossy(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

// =============================================================================
// Tests
// =============================================================================
