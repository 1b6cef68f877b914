//! Delimiter definitions and framing configuration.
//!
//! Wire format: every record is a single start byte, UTF-8 JSON text and a
//! single end byte. With the defaults this is the RFC 7464 layout:
//!
//! ```text
//! 0x1E | json text | 0x0A
//! ```

use crate::error::{JsonSeqError, Result};
use serde::{Deserialize, Serialize};

/// ASCII Record Separator, the default start-of-record byte
pub const RECORD_SEPARATOR: u8 = 0x1E;

/// Line feed, the default end-of-record byte
pub const LINE_FEED: u8 = 0x0A;

/// Delimiter value that the writer treats as "emit nothing on this side"
pub const SUPPRESSED: u8 = 0;

// =============================================================================
// Delimiters
// =============================================================================

/// Start and end byte pair shared by readers and writers.
///
/// The two bytes always differ. Construct through [`Delimiters::new`] or
/// [`FramingConfig::delimiters`] to get that check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Delimiters {
    start: u8,
    end: u8,
}

impl Delimiters {
    pub fn new(start: u8, end: u8) -> Result<Self> {
        if start == end {
            return Err(JsonSeqError::SameDelimiters(start));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u8 {
        self.start
    }

    pub fn end(&self) -> u8 {
        self.end
    }

    /// Whether the writer emits a start byte.
    pub fn writes_start(&self) -> bool {
        self.start != SUPPRESSED
    }

    /// Whether the writer emits an end byte.
    pub fn writes_end(&self) -> bool {
        self.end != SUPPRESSED
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            start: RECORD_SEPARATOR,
            end: LINE_FEED,
        }
    }
}

// =============================================================================
// Config
// =============================================================================

/// User-facing framing options.
///
/// Field names follow the `charCodeStart` / `charCodeEnd` convention so the
/// same TOML or JSON document can configure both sides of a pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct FramingConfig {
    pub char_code_start: u8,
    pub char_code_end: u8,
    /// Upper bound for a single record's pending bytes. `None` means unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_record_bytes: Option<usize>,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            char_code_start: RECORD_SEPARATOR,
            char_code_end: LINE_FEED,
            max_record_bytes: None,
        }
    }
}

impl FramingConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn delimiters(&self) -> Result<Delimiters> {
        Delimiters::new(self.char_code_start, self.char_code_end)
    }
}

// =============================================================================
// Tests
// =============================================================================
