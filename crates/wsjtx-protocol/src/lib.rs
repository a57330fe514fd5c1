//! WSJT-X UDP Telegram Codec
//!
//! This crate provides decoding and encoding for the UDP telegram protocol
//! that WSJT-X uses to talk to companion programs: length-prefixed,
//! type-tagged records with a fixed header and sixteen payload variants.
//!
//! # Wire format
//!
//! ```text
//! [magic u32] [schema u32] [kind u32] [client id utf8] [variant fields...]
//! ```
//!
//! All integers are big-endian. Strings are u32-length-prefixed UTF-8 with
//! `0xFFFFFFFF` marking the null string. Fields added by newer protocol
//! revisions appear at the end of a variant, so a datagram that ends at a
//! field boundary decodes those fields as absent; a datagram that ends in
//! the middle of a field is corrupt.
//!
//! # Example
//!
//! ```rust
//! use wsjtx_protocol::{Payload, Telegram};
//!
//! // A header-only Close telegram from an instance named "WSJT-X"
//! let bytes = b"\xad\xbc\xcb\xda\x00\x00\x00\x03\x00\x00\x00\x06\x00\x00\x00\x06WSJT-X";
//!
//! let tel = Telegram::decode(bytes).unwrap();
//! assert_eq!(tel.id.as_deref(), Some("WSJT-X"));
//! assert!(matches!(tel.payload, Payload::Close));
//! ```

pub mod element;
pub mod error;
pub mod telegram;

pub use element::{Color, DateTime};
pub use error::FrameError;
pub use telegram::{
    Clear, Configure, Decode, FreeText, HaltTx, Heartbeat, HighlightCallsign, Kind, Location,
    LoggedAdif, Payload, QsoLogged, Reply, Status, SwitchConfiguration, Telegram, WsprDecode,
};

/// Protocol magic number, first four bytes of every telegram
pub const MAGIC: u32 = 0xADBC_CBDA;

/// Highest schema version this implementation understands
pub const SCHEMA_VERSION: u32 = 3;

/// Largest datagram the protocol exchanges
pub const MAX_DATAGRAM: usize = 4096;
