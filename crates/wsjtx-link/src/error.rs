//! Error types for the UDP link

use thiserror::Error;

use wsjtx_protocol::FrameError;

#[derive(Debug, Error)]
pub enum LinkError {
    /// Socket-level failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An outgoing telegram could not be encoded
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),
}
