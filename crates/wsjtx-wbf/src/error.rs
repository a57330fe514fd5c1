//! Error types for log parsing and external contact sources

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WbfError {
    /// The ADIF text is structurally broken
    #[error("adif parse error: {0}")]
    Adif(String),

    /// A confirmed-contact source failed to deliver
    #[error("contact source error: {0}")]
    Source(String),
}
