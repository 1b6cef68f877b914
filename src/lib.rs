//! Framing of discrete JSON values over a continuous byte stream.
//!
//! ```
//! use jsonseq::{FrameReader, FrameWriter};
//! use serde_json::{json, Value};
//!
//! let mut writer = FrameWriter::default();
//! let bytes = writer.encode(&json!({"a": 1})).unwrap();
//!
//! let mut reader = FrameReader::<Value>::default();
//! assert_eq!(reader.process(&bytes), vec![json!({"a": 1})]);
//! ```

pub mod error;
pub mod streaming;

pub use error::{JsonSeqError, Result};
pub use streaming::{
    event_stream, read_stream, write_values, Anomaly, AnomalyKind, Delimiters, FrameReader,
    FrameStats, FrameWriter, FramingConfig, ReadEvent,
};
