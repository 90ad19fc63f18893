//! pdfdelta - PDF stream comparison built around a streaming LZW filter.

pub mod codec;
pub mod compare;
pub mod error;
pub mod model;

// Re-export codec modules for convenience
pub use codec::bits;
pub use codec::lzw;

// Re-export model modules for convenience
pub use model::objects as pdftypes;

pub use error::{DeltaError, Result};
