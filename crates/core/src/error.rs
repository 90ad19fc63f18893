//! Error types for the pdfdelta library.

use thiserror::Error;

/// Primary error type for decoding and comparison operations.
#[derive(Error, Debug)]
pub enum DeltaError {
    #[error("corrupt LZW stream: code {code} read with next free slot {next_free}")]
    CorruptLzwStream { code: u16, next_free: u16 },

    #[error("LZW code table exhausted (4096 entries) without a clear code")]
    LzwTableExhausted,

    #[error("type error: expected {expected}, got {got}")]
    TypeError {
        expected: &'static str,
        got: &'static str,
    },

    #[error("key not found: {0}")]
    KeyError(String),

    #[error("decode error: {0}")]
    DecodeError(String),

    #[error("queue closed")]
    QueueClosed,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convenience Result type alias for DeltaError.
pub type Result<T> = std::result::Result<T, DeltaError>;
