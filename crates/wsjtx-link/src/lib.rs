//! UDP Session for the WSJT-X companion protocol
//!
//! This crate owns the conversation with one WSJT-X instance:
//!
//! - [`session::Session`] is the pure state machine: peer binding,
//!   heartbeat keep-alive, band tracking, callsign coloring and the
//!   deferred flush of pending color changes. It performs no I/O; outbound
//!   telegrams collect in an event buffer.
//! - [`net::UdpLink`] is the blocking socket pump that feeds the session
//!   and drains its buffer after every datagram.
//! - [`message`] holds the callsign-extraction heuristic applied to decoded
//!   message text, and [`bandplan`] the dial-frequency-to-band table.

pub mod bandplan;
pub mod error;
pub mod message;
pub mod net;
pub mod session;

pub use bandplan::{Band, BandPlan};
pub use error::LinkError;
pub use net::{ShutdownHandle, UdpLink};
pub use session::{Session, SessionConfig};
