//! The UDP session state machine
//!
//! One session talks to one peer. The peer address is learned from the
//! first datagram received; later datagrams from other addresses are still
//! decoded and their client id recorded, but only the bound peer's telegrams
//! reach the handlers. Outbound telegrams accumulate in an event buffer that
//! the socket pump drains after every inbound datagram, so sends stay in
//! loop order without the session owning the socket.

use std::collections::HashMap;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use wsjtx_protocol::{
    Decode, FrameError, FreeText, Heartbeat, HighlightCallsign, LoggedAdif, Payload, Status,
    Telegram, SCHEMA_VERSION,
};
use wsjtx_wbf::{adif, ColorPair, WorkedBefore, PAIR_INVALID};

use crate::bandplan::BandPlan;
use crate::message::parse_message;

/// Session-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Client id we announce in outgoing telegrams
    pub client_id: String,
    /// The operator's callsign
    pub callsign: String,
    /// The operator's Maidenhead locator
    pub locator: String,
    /// Push a locator-exchange free-text message whenever the peer starts
    /// working a new station
    pub send_locator_message: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            client_id: "wsjt-server".to_string(),
            callsign: String::new(),
            locator: String::new(),
            send_locator_message: false,
        }
    }
}

/// One request/reply conversation with a WSJT-X instance
pub struct Session {
    config: SessionConfig,
    engine: WorkedBefore,
    bands: BandPlan,
    /// Current band name, tracked from status telegrams
    band: Option<String>,
    /// Station the peer is currently working
    dx_call: Option<String>,
    /// Client id -> source address for every instance heard
    peers: HashMap<String, SocketAddr>,
    /// The bound peer; None until the first datagram arrives
    peer: Option<SocketAddr>,
    /// A telegram from the peer has been answered with our heartbeat
    greeted: bool,
    /// Colors scheduled or shown in the remote application
    applied: HashMap<String, ColorPair>,
    /// Color changes computed but not yet sent
    pending: HashMap<String, ColorPair>,
    outbound: Vec<Telegram>,
    closed: bool,
}

impl Session {
    pub fn new(config: SessionConfig, engine: WorkedBefore, bands: BandPlan) -> Self {
        Self {
            config,
            engine,
            bands,
            band: None,
            dx_call: None,
            peers: HashMap::new(),
            peer: None,
            greeted: false,
            applied: HashMap::new(),
            pending: HashMap::new(),
            outbound: Vec::new(),
            closed: false,
        }
    }

    /// The bound peer address, if any
    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// Band currently tracked from the peer's status telegrams
    pub fn current_band(&self) -> Option<&str> {
        self.band.as_deref()
    }

    /// True once the peer announced its shutdown
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Re-bind the session to an already-heard instance
    pub fn set_peer(&mut self, client_id: &str) -> bool {
        match self.peers.get(client_id) {
            Some(addr) => {
                self.peer = Some(*addr);
                true
            }
            None => false,
        }
    }

    /// Decode one datagram and, when it comes from the bound peer, run the
    /// matching handler. The first sender becomes the bound peer.
    pub fn accept(&mut self, from: SocketAddr, datagram: &[u8]) -> Result<Telegram, FrameError> {
        let tel = Telegram::decode(datagram)?;
        if let Some(id) = &tel.id {
            self.peers.entry(id.clone()).or_insert(from);
        }
        if self.peer.is_none() {
            info!(%from, id = ?tel.id, "bound to peer");
            self.peer = Some(from);
        }
        if self.peer == Some(from) {
            self.handle(&tel);
        } else {
            debug!(%from, "ignoring datagram from non-peer address");
        }
        Ok(tel)
    }

    fn handle(&mut self, tel: &Telegram) {
        let is_heartbeat = matches!(tel.payload, Payload::Heartbeat(_));
        // Answer the first contact and echo every heartbeat afterwards
        if !self.greeted || is_heartbeat {
            self.push_heartbeat();
        }
        self.greeted = true;
        match &tel.payload {
            Payload::Status(status) => self.handle_status(status),
            Payload::Decode(decode) => self.handle_decode(decode),
            Payload::LoggedAdif(logged) => self.handle_logged(logged),
            Payload::Close => {
                info!(id = ?tel.id, "peer closed the session");
                self.closed = true;
            }
            _ => {}
        }
    }

    fn handle_status(&mut self, status: &Status) {
        if let Some(frq) = status.dial_frq {
            match self.bands.lookup(frq).map(|band| band.name.to_string()) {
                Some(name) if self.band.as_deref() != Some(name.as_str()) => {
                    info!(band = %name, "band change");
                    // Colors shown for the old band are stale now
                    self.decolor();
                    self.band = Some(name);
                }
                Some(_) => {}
                None => warn!(frq, "dial frequency outside the band plan"),
            }
        }
        if status.dx_call != self.dx_call {
            self.dx_call = status.dx_call.clone();
            if self.config.send_locator_message {
                if let Some(dx_call) = &self.dx_call {
                    let text = format!(
                        "<{}> <{}> 597373 {}",
                        dx_call, self.config.callsign, self.config.locator
                    );
                    info!(%text, "setting locator exchange free text");
                    self.outbound.push(Telegram::new(
                        &self.config.client_id,
                        Payload::FreeText(FreeText {
                            text: Some(text),
                            send: Some(false),
                        }),
                    ));
                }
            }
        }
        if status.decoding != Some(true) {
            self.flush_pending();
        }
    }

    fn handle_decode(&mut self, decode: &Decode) {
        if decode.off_air == Some(true) || decode.is_new != Some(true) {
            return;
        }
        let message = decode.message.as_deref().unwrap_or("");
        let call = parse_message(message);
        if message.is_empty() {
            debug!("empty decode message");
        } else if call.is_none() {
            info!(%message, "unknown message");
        }
        let call = call
            .unwrap_or("")
            .trim_start_matches('<')
            .trim_end_matches('>');
        if call.is_empty() || call == "..." {
            return;
        }
        let band = self.band.clone().unwrap_or_default();
        let pair = self.engine.color_for(&band, call);
        if self.applied.get(call) != Some(&pair) {
            self.update_color(call, pair);
        }
    }

    fn handle_logged(&mut self, logged: &LoggedAdif) {
        let Some(text) = logged.adif_txt.as_deref() else {
            warn!("logged ADIF telegram without text");
            return;
        };
        match adif::parse(text) {
            Ok(records) if records.len() == 1 => {
                debug!(call = %records[0].call, band = %records[0].band, "contact logged");
                self.engine.add_entry(&records[0]);
            }
            Ok(records) => {
                warn!(count = records.len(), "expected exactly one logged record")
            }
            Err(e) => warn!(error = %e, "unparseable logged ADIF text"),
        }
    }

    fn push_heartbeat(&mut self) {
        self.outbound.push(Telegram::new(
            &self.config.client_id,
            Payload::Heartbeat(Heartbeat {
                max_schema: Some(SCHEMA_VERSION),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
                revision: Some(String::new()),
            }),
        ));
    }

    fn update_color(&mut self, call: &str, pair: ColorPair) {
        self.applied.insert(call.to_owned(), pair);
        self.pending.insert(call.to_owned(), pair);
    }

    /// Schedule removal of all coloring. Needed on band change and when
    /// exiting; only schedules, the flush does the sending.
    fn decolor(&mut self) {
        for (call, pair) in self.applied.drain() {
            // Uncolored calls need no round trip
            if pair != PAIR_INVALID {
                self.pending.insert(call, PAIR_INVALID);
            }
        }
    }

    /// Turn every pending color change into a highlight telegram
    pub fn flush_pending(&mut self) {
        for (call, (fg, bg)) in self.pending.drain() {
            self.outbound.push(Telegram::new(
                &self.config.client_id,
                Payload::HighlightCallsign(HighlightCallsign {
                    callsign: Some(call),
                    bg_color: Some(bg),
                    fg_color: Some(fg),
                    highlight_last: Some(false),
                }),
            ));
        }
    }

    /// Leave the remote application without stale highlighting. Runs on the
    /// close-telegram path, on SIGINT and on pump errors.
    pub fn shutdown(&mut self) {
        self.decolor();
        self.flush_pending();
    }

    /// Take the telegrams queued for sending
    pub fn drain_outbound(&mut self) -> Vec<Telegram> {
        std::mem::take(&mut self.outbound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wsjtx_protocol::Color;
    use wsjtx_wbf::{ContactRecord, PrefixTable};

    fn addr(port: u16) -> SocketAddr {
        format!("127.0.0.1:{port}").parse().unwrap()
    }

    fn session() -> Session {
        let mut engine = WorkedBefore::new(Box::new(PrefixTable::builtin()));
        engine.add_entry(&ContactRecord::new("OE3RSU", "40m"));
        Session::new(SessionConfig::default(), engine, BandPlan::region1())
    }

    fn datagram(payload: Payload) -> Vec<u8> {
        Telegram::new("WSJT-X", payload).encode().unwrap()
    }

    fn status(dial_frq: u64, decoding: bool) -> Vec<u8> {
        datagram(Payload::Status(Status {
            dial_frq: Some(dial_frq),
            decoding: Some(decoding),
            ..Status::default()
        }))
    }

    fn decode_of(message: &str) -> Vec<u8> {
        datagram(Payload::Decode(Decode {
            is_new: Some(true),
            message: Some(message.to_string()),
            off_air: Some(false),
            ..Decode::default()
        }))
    }

    fn highlights(tels: &[Telegram]) -> Vec<(&str, &Color)> {
        tels.iter()
            .filter_map(|t| match &t.payload {
                Payload::HighlightCallsign(h) => {
                    Some((h.callsign.as_deref().unwrap(), h.bg_color.as_ref().unwrap()))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn first_sender_becomes_peer() {
        let mut s = session();
        s.accept(addr(1000), &status(7_074_000, true)).unwrap();
        assert_eq!(s.peer(), Some(addr(1000)));
        assert_eq!(s.current_band(), Some("40m"));

        // A second instance is recorded but not handled
        let other = Telegram::new("WSJT-X#2", Payload::Status(Status {
            dial_frq: Some(14_074_000),
            ..Status::default()
        }))
        .encode()
        .unwrap();
        s.accept(addr(2000), &other).unwrap();
        assert_eq!(s.current_band(), Some("40m"));

        // but can be bound explicitly
        assert!(s.set_peer("WSJT-X#2"));
        assert_eq!(s.peer(), Some(addr(2000)));
        assert!(!s.set_peer("nobody"));
    }

    #[test]
    fn heartbeat_on_first_contact_and_echo() {
        let mut s = session();
        s.accept(addr(1000), &status(7_074_000, true)).unwrap();
        let sent = s.drain_outbound();
        assert_eq!(sent.len(), 1);
        assert!(matches!(sent[0].payload, Payload::Heartbeat(_)));

        // no further heartbeat for ordinary telegrams...
        s.accept(addr(1000), &status(7_074_000, true)).unwrap();
        assert!(s.drain_outbound().is_empty());
        // ...until the peer heartbeats, which is echoed
        s.accept(addr(1000), &datagram(Payload::Heartbeat(Heartbeat::default())))
            .unwrap();
        let sent = s.drain_outbound();
        assert_eq!(sent.len(), 1);
        assert!(matches!(sent[0].payload, Payload::Heartbeat(_)));
    }

    #[test]
    fn decode_schedules_color_flushed_when_idle() {
        let mut s = session();
        // Status with decoding=true sets the band but flushes nothing
        s.accept(addr(1000), &status(7_074_000, true)).unwrap();
        s.accept(addr(1000), &decode_of("CQ OE1ABC JN88")).unwrap();
        assert!(highlights(&s.drain_outbound()).is_empty());

        // decoding stopped: the pending color goes out
        s.accept(addr(1000), &status(7_074_000, false)).unwrap();
        let sent = s.drain_outbound();
        let hl = highlights(&sent);
        assert_eq!(hl, vec![("OE1ABC", &Color::CYAN)]);
    }

    #[test]
    fn unchanged_color_is_not_resent() {
        let mut s = session();
        s.accept(addr(1000), &status(7_074_000, false)).unwrap();
        s.accept(addr(1000), &decode_of("CQ OE1ABC JN88")).unwrap();
        s.accept(addr(1000), &status(7_074_000, false)).unwrap();
        assert_eq!(highlights(&s.drain_outbound()).len(), 1);

        // same call, same classification: nothing new to send
        s.accept(addr(1000), &decode_of("CQ OE1ABC JN88")).unwrap();
        s.accept(addr(1000), &status(7_074_000, false)).unwrap();
        assert!(highlights(&s.drain_outbound()).is_empty());
    }

    #[test]
    fn band_change_schedules_decolor() {
        let mut s = session();
        s.accept(addr(1000), &status(7_074_000, false)).unwrap();
        s.accept(addr(1000), &decode_of("CQ OE1ABC JN88")).unwrap();
        s.accept(addr(1000), &status(7_074_000, false)).unwrap();
        assert_eq!(highlights(&s.drain_outbound()).len(), 1);

        // QSY to 20m: the applied color is scheduled for removal
        s.accept(addr(1000), &status(14_074_000, false)).unwrap();
        let sent = s.drain_outbound();
        assert_eq!(highlights(&sent), vec![("OE1ABC", &Color::INVALID)]);
        assert_eq!(s.current_band(), Some("20m"));
    }

    #[test]
    fn off_air_and_replayed_decodes_are_ignored() {
        let mut s = session();
        s.accept(addr(1000), &status(7_074_000, false)).unwrap();
        s.drain_outbound();

        let off_air = datagram(Payload::Decode(Decode {
            is_new: Some(true),
            message: Some("CQ OE1ABC JN88".into()),
            off_air: Some(true),
            ..Decode::default()
        }));
        s.accept(addr(1000), &off_air).unwrap();
        let replayed = datagram(Payload::Decode(Decode {
            is_new: Some(false),
            message: Some("CQ OE1ABC JN88".into()),
            off_air: Some(false),
            ..Decode::default()
        }));
        s.accept(addr(1000), &replayed).unwrap();

        s.accept(addr(1000), &status(7_074_000, false)).unwrap();
        assert!(highlights(&s.drain_outbound()).is_empty());
    }

    #[test]
    fn placeholder_calls_are_ignored() {
        let mut s = session();
        s.accept(addr(1000), &status(7_074_000, false)).unwrap();
        s.accept(addr(1000), &decode_of("TU; OE9XYZ -12")).unwrap();
        s.accept(addr(1000), &decode_of("OE9XYZ ...")).unwrap();
        s.accept(addr(1000), &status(7_074_000, false)).unwrap();
        assert!(highlights(&s.drain_outbound()).is_empty());
    }

    #[test]
    fn bracketed_call_is_stripped_before_classification() {
        let mut s = session();
        s.accept(addr(1000), &status(7_074_000, false)).unwrap();
        s.accept(addr(1000), &decode_of("TM50XXX <OE1ABC> RR73"))
            .unwrap();
        s.accept(addr(1000), &status(7_074_000, false)).unwrap();
        let sent = s.drain_outbound();
        assert_eq!(highlights(&sent), vec![("OE1ABC", &Color::CYAN)]);
    }

    #[test]
    fn logged_contact_updates_the_engine() {
        let mut s = session();
        s.accept(addr(1000), &status(7_074_000, false)).unwrap();
        s.drain_outbound();

        let logged = datagram(Payload::LoggedAdif(LoggedAdif {
            adif_txt: Some("<call:6>OE1ABC <band:3>40m <eor>".into()),
        }));
        s.accept(addr(1000), &logged).unwrap();

        // worked before now: the worked-before pair is the invalid pair,
        // which never reaches pending for a fresh call
        s.accept(addr(1000), &decode_of("CQ OE1ABC JN88")).unwrap();
        s.accept(addr(1000), &status(7_074_000, false)).unwrap();
        let sent = s.drain_outbound();
        assert_eq!(highlights(&sent), vec![("OE1ABC", &Color::INVALID)]);
    }

    #[test]
    fn locator_message_on_new_dx_call() {
        let config = SessionConfig {
            callsign: "OE3RSU".into(),
            locator: "JN88dg".into(),
            send_locator_message: true,
            ..SessionConfig::default()
        };
        let engine = WorkedBefore::new(Box::new(PrefixTable::builtin()));
        let mut s = Session::new(config, engine, BandPlan::region1());

        let st = datagram(Payload::Status(Status {
            dial_frq: Some(7_074_000),
            dx_call: Some("XAMPLE".into()),
            decoding: Some(true),
            ..Status::default()
        }));
        s.accept(addr(1000), &st).unwrap();
        let sent = s.drain_outbound();
        let texts: Vec<_> = sent
            .iter()
            .filter_map(|t| match &t.payload {
                Payload::FreeText(ft) => ft.text.as_deref(),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["<XAMPLE> <OE3RSU> 597373 JN88dg"]);

        // same dx call again: no repeat
        s.accept(addr(1000), &st).unwrap();
        assert!(s.drain_outbound().iter().all(|t| !matches!(
            t.payload,
            Payload::FreeText(_)
        )));
    }

    #[test]
    fn close_telegram_ends_the_session() {
        let mut s = session();
        s.accept(addr(1000), &status(7_074_000, false)).unwrap();
        assert!(!s.is_closed());
        s.accept(addr(1000), &datagram(Payload::Close)).unwrap();
        assert!(s.is_closed());
    }

    #[test]
    fn shutdown_decolors_everything() {
        let mut s = session();
        s.accept(addr(1000), &status(7_074_000, false)).unwrap();
        s.accept(addr(1000), &decode_of("CQ OE1ABC JN88")).unwrap();
        s.accept(addr(1000), &status(7_074_000, false)).unwrap();
        s.drain_outbound();

        s.shutdown();
        let sent = s.drain_outbound();
        assert_eq!(highlights(&sent), vec![("OE1ABC", &Color::INVALID)]);

        // a second shutdown has nothing left to undo
        s.shutdown();
        assert!(s.drain_outbound().is_empty());
    }
}
