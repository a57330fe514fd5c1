//! Error types for telegram decoding and encoding

use thiserror::Error;

/// Errors that can occur while decoding or building a telegram
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The datagram does not start with the protocol magic number
    #[error("bad magic number 0x{0:08X}")]
    BadMagic(u32),

    /// The sender speaks a newer schema than we support
    #[error("unsupported schema version {0}")]
    UnsupportedSchema(u32),

    /// A field is cut off mid-way through the buffer
    #[error("datagram truncated: need {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    /// A string length prefix points past the end of the buffer
    #[error("string length {declared} exceeds remaining {remaining} bytes")]
    StringOverrun { declared: usize, remaining: usize },

    /// A string field does not hold valid UTF-8
    #[error("invalid UTF-8 in string field")]
    InvalidUtf8,

    /// A date-time carries a UTC offset without the offset time-spec, or
    /// the offset time-spec without an offset
    #[error("UTC offset must be present exactly when timespec is 2")]
    OffsetSpecMismatch,

    /// A present field follows an absent one; only a suffix of a payload
    /// may be left out
    #[error("field value present after an absent field")]
    TrailingField,
}
