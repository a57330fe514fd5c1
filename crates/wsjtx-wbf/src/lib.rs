//! Worked-Before Engine
//!
//! Classifies callsigns decoded off the air against the operator's
//! historical contact log: has this station been worked before, on this
//! band, and has its DXCC entity? The answer maps to the highlight color a
//! companion program pushes back into WSJT-X.
//!
//! The engine consumes its surroundings through narrow interfaces: an
//! [`entity::EntityMatcher`] resolves callsign prefixes and country names to
//! entity codes, [`adif`] turns log text into [`record::ContactRecord`]s,
//! and an optional [`engine::ConfirmedSource`] supplies LOTW-confirmed
//! contacts in place of the local log's entity information.
//!
//! # Example
//!
//! ```rust
//! use wsjtx_wbf::engine::{WorkedBefore, WorkedStatus};
//! use wsjtx_wbf::entity::PrefixTable;
//! use wsjtx_wbf::record::ContactRecord;
//!
//! let mut wbf = WorkedBefore::new(Box::new(PrefixTable::builtin()));
//! wbf.add_entry(&ContactRecord::new("OE3RSU", "40m"));
//!
//! assert_eq!(wbf.classify("40m", "OE3RSU"), WorkedStatus::WorkedBefore);
//! assert_eq!(wbf.classify("40m", "OE1ABC"), WorkedStatus::NewCall);
//! ```

pub mod adif;
pub mod engine;
pub mod entity;
pub mod error;
pub mod record;

pub use engine::{
    ColorPair, ColorScheme, ConfirmedSource, WorkedBefore, WorkedStatus, ALL_BANDS, PAIR_INVALID,
};
pub use entity::{EntityMatcher, PrefixTable};
pub use error::WbfError;
pub use record::ContactRecord;
