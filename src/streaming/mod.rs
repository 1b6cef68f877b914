//! Record framing for JSON text sequences.
//!
//! Two independent stages, one per direction:
//!
//! ```text
//! bytes  --> FrameReader --> values (+ anomalies to observers)
//! values --> FrameWriter --> bytes
//! ```
//!
//! # Wire format
//!
//! `start | json | end`, one byte each side. Defaults are RS (0x1E) and LF
//! (0x0A). Bytes outside a record are ignored; a record cut short by a new
//! start byte is reported as truncated; a record that is not JSON is
//! reported as invalid. Neither stops the stream.

pub mod buffer;
pub mod channel;
mod finite;
pub mod pipeline;
pub mod protocol;
pub mod receiver;
pub mod sender;

pub use buffer::PendingBuffer;
pub use channel::{Anomaly, AnomalyHandler, AnomalyKind, FrameStats, ReadEvent};
pub use pipeline::{event_stream, read_stream, write_values, READ_CHUNK_SIZE, WRITE_BATCH_SIZE};
pub use protocol::{Delimiters, FramingConfig, LINE_FEED, RECORD_SEPARATOR, SUPPRESSED};
pub use receiver::FrameReader;
pub use sender::FrameWriter;
