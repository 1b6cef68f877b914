//! Error types for framing and configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonSeqError {
    /// The value could not be represented as JSON text.
    #[error("Failed to serialize value: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Start and end delimiters must differ, otherwise no boundary can be told apart.
    #[error("Start and end delimiters are both {0:#04x}")]
    SameDelimiters(u8),

    #[error("Invalid framing config: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, JsonSeqError>;
