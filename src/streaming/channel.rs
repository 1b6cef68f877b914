//! Event and anomaly types passed out of the reader.
//!
//! Values go back to the caller of `process`; anomalies go to observers
//! registered on the reader. Both are delivered inline, in resolution order.

use std::fmt;

// =============================================================================
// Anomalies
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    /// Content between delimiters is not valid JSON (or is empty)
    Invalid,
    /// A new start delimiter arrived before the record was terminated
    Truncated,
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyKind::Invalid => write!(f, "invalid"),
            AnomalyKind::Truncated => write!(f, "truncated"),
        }
    }
}

/// A dropped record and its raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    /// Exact record content, without delimiters
    pub content: String,
}

impl Anomaly {
    pub fn invalid(content: impl Into<String>) -> Self {
        Self {
            kind: AnomalyKind::Invalid,
            content: content.into(),
        }
    }

    pub fn truncated(content: impl Into<String>) -> Self {
        Self {
            kind: AnomalyKind::Truncated,
            content: content.into(),
        }
    }
}

/// Observer callback for anomalies
pub type AnomalyHandler = Box<dyn FnMut(&Anomaly) + Send>;

// =============================================================================
// ReadEvent: reader -> caller
// =============================================================================

/// One resolved record.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadEvent<T> {
    Value(T),
    Anomaly(Anomaly),
}

impl<T> ReadEvent<T> {
    pub fn into_value(self) -> Option<T> {
        match self {
            ReadEvent::Value(v) => Some(v),
            ReadEvent::Anomaly(_) => None,
        }
    }

    pub fn anomaly(&self) -> Option<&Anomaly> {
        match self {
            ReadEvent::Value(_) => None,
            ReadEvent::Anomaly(a) => Some(a),
        }
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Counters for one reader or writer
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrameStats {
    /// Records parsed (reader) or framed (writer)
    pub records: u64,

    /// Records dropped as invalid JSON
    pub invalid: u64,

    /// Records dropped because a new start arrived first
    pub truncated: u64,

    /// Values the writer could not serialize
    pub serialize_failures: u64,

    /// Raw bytes consumed by the reader
    pub bytes_in: u64,

    /// Framed bytes produced by the writer
    pub bytes_out: u64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anomalies(&self) -> u64 {
        self.invalid + self.truncated
    }

    pub(crate) fn record_anomaly(&mut self, kind: AnomalyKind) {
        match kind {
            AnomalyKind::Invalid => self.invalid += 1,
            AnomalyKind::Truncated => self.truncated += 1,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
