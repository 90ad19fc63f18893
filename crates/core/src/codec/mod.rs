//! Codec modules for compressed PDF stream data.
//!
//! This module contains:
//! - `bits`: bit-level input for variable-width codes
//! - `lzw`: streaming LZW decompression

pub mod bits;
pub mod lzw;

// Re-export main types for convenience
pub use bits::{BitReader, BitSource};
pub use lzw::{LzwDecoder, lzwdecode, lzwdecode_with_earlychange};
