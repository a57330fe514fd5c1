//! Telegram framing and the sixteen payload variants
//!
//! Every telegram starts with the same header: magic number, schema version,
//! kind discriminant and the sending instance's client id. The kind selects
//! one of the payload layouts below; an unrecognized kind is not an error and
//! decodes to a header-only [`Payload::Unknown`].
//!
//! Each variant keeps its field reader and writer adjacent so the field order
//! is declared once per direction pair. All payload fields are optional at
//! the type level because any suffix of a payload may be missing on the wire
//! (older senders simply stop early); see [`crate::element`] for the
//! truncation rules.

use std::fmt;

use crate::element::{Color, Cursor, DateTime, Writer};
use crate::error::FrameError;
use crate::{MAGIC, SCHEMA_VERSION};

/// Telegram kind discriminants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Heartbeat = 0,
    Status = 1,
    Decode = 2,
    Clear = 3,
    Reply = 4,
    QsoLogged = 5,
    Close = 6,
    Replay = 7,
    HaltTx = 8,
    FreeText = 9,
    WsprDecode = 10,
    Location = 11,
    LoggedAdif = 12,
    HighlightCallsign = 13,
    SwitchConfiguration = 14,
    Configure = 15,
}

impl Kind {
    /// Human-readable variant name
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Heartbeat => "Heartbeat",
            Kind::Status => "Status",
            Kind::Decode => "Decode",
            Kind::Clear => "Clear",
            Kind::Reply => "Reply",
            Kind::QsoLogged => "QsoLogged",
            Kind::Close => "Close",
            Kind::Replay => "Replay",
            Kind::HaltTx => "HaltTx",
            Kind::FreeText => "FreeText",
            Kind::WsprDecode => "WsprDecode",
            Kind::Location => "Location",
            Kind::LoggedAdif => "LoggedAdif",
            Kind::HighlightCallsign => "HighlightCallsign",
            Kind::SwitchConfiguration => "SwitchConfiguration",
            Kind::Configure => "Configure",
        }
    }
}

impl TryFrom<u32> for Kind {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, u32> {
        Ok(match value {
            0 => Kind::Heartbeat,
            1 => Kind::Status,
            2 => Kind::Decode,
            3 => Kind::Clear,
            4 => Kind::Reply,
            5 => Kind::QsoLogged,
            6 => Kind::Close,
            7 => Kind::Replay,
            8 => Kind::HaltTx,
            9 => Kind::FreeText,
            10 => Kind::WsprDecode,
            11 => Kind::Location,
            12 => Kind::LoggedAdif,
            13 => Kind::HighlightCallsign,
            14 => Kind::SwitchConfiguration,
            15 => Kind::Configure,
            other => return Err(other),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Heartbeat {
    pub max_schema: Option<u32>,
    pub version: Option<String>,
    pub revision: Option<String>,
}

impl Heartbeat {
    fn read(c: &mut Cursor) -> Result<Self, FrameError> {
        Ok(Self {
            max_schema: c.opt_u32()?,
            version: c.opt_utf8()?,
            revision: c.opt_utf8()?,
        })
    }

    fn write(&self, w: &mut Writer) -> Result<(), FrameError> {
        w.opt_u32(self.max_schema)?;
        w.opt_utf8(self.version.as_deref())?;
        w.opt_utf8(self.revision.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Status {
    pub dial_frq: Option<u64>,
    pub mode: Option<String>,
    pub dx_call: Option<String>,
    pub report: Option<String>,
    pub tx_mode: Option<String>,
    pub tx_enabled: Option<bool>,
    pub xmitting: Option<bool>,
    pub decoding: Option<bool>,
    pub rx_df: Option<u32>,
    pub tx_df: Option<u32>,
    pub de_call: Option<String>,
    pub de_grid: Option<String>,
    pub dx_grid: Option<String>,
    pub tx_watchdog: Option<bool>,
    pub sub_mode: Option<String>,
    pub fast_mode: Option<bool>,
    pub special_op: Option<u8>,
    pub frq_tolerance: Option<u32>,
    pub t_r_period: Option<u32>,
    pub config_name: Option<String>,
    pub tx_message: Option<String>,
}

impl Status {
    fn read(c: &mut Cursor) -> Result<Self, FrameError> {
        Ok(Self {
            dial_frq: c.opt_u64()?,
            mode: c.opt_utf8()?,
            dx_call: c.opt_utf8()?,
            report: c.opt_utf8()?,
            tx_mode: c.opt_utf8()?,
            tx_enabled: c.opt_bool()?,
            xmitting: c.opt_bool()?,
            decoding: c.opt_bool()?,
            rx_df: c.opt_u32()?,
            tx_df: c.opt_u32()?,
            de_call: c.opt_utf8()?,
            de_grid: c.opt_utf8()?,
            dx_grid: c.opt_utf8()?,
            tx_watchdog: c.opt_bool()?,
            sub_mode: c.opt_utf8()?,
            fast_mode: c.opt_bool()?,
            special_op: c.opt_u8()?,
            frq_tolerance: c.opt_u32()?,
            t_r_period: c.opt_u32()?,
            config_name: c.opt_utf8()?,
            tx_message: c.opt_utf8()?,
        })
    }

    fn write(&self, w: &mut Writer) -> Result<(), FrameError> {
        w.opt_u64(self.dial_frq)?;
        w.opt_utf8(self.mode.as_deref())?;
        w.opt_utf8(self.dx_call.as_deref())?;
        w.opt_utf8(self.report.as_deref())?;
        w.opt_utf8(self.tx_mode.as_deref())?;
        w.opt_bool(self.tx_enabled)?;
        w.opt_bool(self.xmitting)?;
        w.opt_bool(self.decoding)?;
        w.opt_u32(self.rx_df)?;
        w.opt_u32(self.tx_df)?;
        w.opt_utf8(self.de_call.as_deref())?;
        w.opt_utf8(self.de_grid.as_deref())?;
        w.opt_utf8(self.dx_grid.as_deref())?;
        w.opt_bool(self.tx_watchdog)?;
        w.opt_utf8(self.sub_mode.as_deref())?;
        w.opt_bool(self.fast_mode)?;
        w.opt_u8(self.special_op)?;
        w.opt_u32(self.frq_tolerance)?;
        w.opt_u32(self.t_r_period)?;
        w.opt_utf8(self.config_name.as_deref())?;
        w.opt_utf8(self.tx_message.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decode {
    pub is_new: Option<bool>,
    pub time: Option<u32>,
    pub snr: Option<i32>,
    pub delta_t: Option<f64>,
    pub delta_f: Option<u32>,
    pub mode: Option<String>,
    pub message: Option<String>,
    pub low_confidence: Option<bool>,
    pub off_air: Option<bool>,
}

impl Decode {
    fn read(c: &mut Cursor) -> Result<Self, FrameError> {
        Ok(Self {
            is_new: c.opt_bool()?,
            time: c.opt_u32()?,
            snr: c.opt_i32()?,
            delta_t: c.opt_f64()?,
            delta_f: c.opt_u32()?,
            mode: c.opt_utf8()?,
            message: c.opt_utf8()?,
            low_confidence: c.opt_bool()?,
            off_air: c.opt_bool()?,
        })
    }

    fn write(&self, w: &mut Writer) -> Result<(), FrameError> {
        w.opt_bool(self.is_new)?;
        w.opt_u32(self.time)?;
        w.opt_i32(self.snr)?;
        w.opt_f64(self.delta_t)?;
        w.opt_u32(self.delta_f)?;
        w.opt_utf8(self.mode.as_deref())?;
        w.opt_utf8(self.message.as_deref())?;
        w.opt_bool(self.low_confidence)?;
        w.opt_bool(self.off_air)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clear {
    /// Which window to clear; absent means all. The only place the protocol
    /// uses a zero-byte optional integer.
    pub window: Option<u8>,
}

impl Clear {
    fn read(c: &mut Cursor) -> Result<Self, FrameError> {
        Ok(Self {
            window: c.opt_u8()?,
        })
    }

    fn write(&self, w: &mut Writer) -> Result<(), FrameError> {
        w.opt_u8(self.window)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    pub time: Option<u32>,
    pub snr: Option<i32>,
    pub delta_t: Option<f64>,
    pub delta_f: Option<u32>,
    pub mode: Option<String>,
    pub message: Option<String>,
    pub low_confidence: Option<bool>,
    pub modifiers: Option<u8>,
}

impl Reply {
    fn read(c: &mut Cursor) -> Result<Self, FrameError> {
        Ok(Self {
            time: c.opt_u32()?,
            snr: c.opt_i32()?,
            delta_t: c.opt_f64()?,
            delta_f: c.opt_u32()?,
            mode: c.opt_utf8()?,
            message: c.opt_utf8()?,
            low_confidence: c.opt_bool()?,
            modifiers: c.opt_u8()?,
        })
    }

    fn write(&self, w: &mut Writer) -> Result<(), FrameError> {
        w.opt_u32(self.time)?;
        w.opt_i32(self.snr)?;
        w.opt_f64(self.delta_t)?;
        w.opt_u32(self.delta_f)?;
        w.opt_utf8(self.mode.as_deref())?;
        w.opt_utf8(self.message.as_deref())?;
        w.opt_bool(self.low_confidence)?;
        w.opt_u8(self.modifiers)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QsoLogged {
    pub time_off: Option<DateTime>,
    pub dx_call: Option<String>,
    pub dx_grid: Option<String>,
    pub tx_frq: Option<u64>,
    pub mode: Option<String>,
    pub report_sent: Option<String>,
    pub report_recv: Option<String>,
    pub tx_power: Option<String>,
    pub comments: Option<String>,
    pub name: Option<String>,
    pub time_on: Option<DateTime>,
    pub operator_call: Option<String>,
    pub my_call: Option<String>,
    pub my_grid: Option<String>,
    pub exchange_sent: Option<String>,
    pub exchange_recv: Option<String>,
    pub adif_propmode: Option<String>,
}

impl QsoLogged {
    fn read(c: &mut Cursor) -> Result<Self, FrameError> {
        Ok(Self {
            time_off: c.opt_datetime()?,
            dx_call: c.opt_utf8()?,
            dx_grid: c.opt_utf8()?,
            tx_frq: c.opt_u64()?,
            mode: c.opt_utf8()?,
            report_sent: c.opt_utf8()?,
            report_recv: c.opt_utf8()?,
            tx_power: c.opt_utf8()?,
            comments: c.opt_utf8()?,
            name: c.opt_utf8()?,
            time_on: c.opt_datetime()?,
            operator_call: c.opt_utf8()?,
            my_call: c.opt_utf8()?,
            my_grid: c.opt_utf8()?,
            exchange_sent: c.opt_utf8()?,
            exchange_recv: c.opt_utf8()?,
            adif_propmode: c.opt_utf8()?,
        })
    }

    fn write(&self, w: &mut Writer) -> Result<(), FrameError> {
        w.opt_datetime(self.time_off.as_ref())?;
        w.opt_utf8(self.dx_call.as_deref())?;
        w.opt_utf8(self.dx_grid.as_deref())?;
        w.opt_u64(self.tx_frq)?;
        w.opt_utf8(self.mode.as_deref())?;
        w.opt_utf8(self.report_sent.as_deref())?;
        w.opt_utf8(self.report_recv.as_deref())?;
        w.opt_utf8(self.tx_power.as_deref())?;
        w.opt_utf8(self.comments.as_deref())?;
        w.opt_utf8(self.name.as_deref())?;
        w.opt_datetime(self.time_on.as_ref())?;
        w.opt_utf8(self.operator_call.as_deref())?;
        w.opt_utf8(self.my_call.as_deref())?;
        w.opt_utf8(self.my_grid.as_deref())?;
        w.opt_utf8(self.exchange_sent.as_deref())?;
        w.opt_utf8(self.exchange_recv.as_deref())?;
        w.opt_utf8(self.adif_propmode.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HaltTx {
    pub auto_tx_only: Option<bool>,
}

impl HaltTx {
    fn read(c: &mut Cursor) -> Result<Self, FrameError> {
        Ok(Self {
            auto_tx_only: c.opt_bool()?,
        })
    }

    fn write(&self, w: &mut Writer) -> Result<(), FrameError> {
        w.opt_bool(self.auto_tx_only)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FreeText {
    pub text: Option<String>,
    pub send: Option<bool>,
}

impl FreeText {
    fn read(c: &mut Cursor) -> Result<Self, FrameError> {
        Ok(Self {
            text: c.opt_utf8()?,
            send: c.opt_bool()?,
        })
    }

    fn write(&self, w: &mut Writer) -> Result<(), FrameError> {
        w.opt_utf8(self.text.as_deref())?;
        w.opt_bool(self.send)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WsprDecode {
    pub is_new: Option<bool>,
    pub time: Option<u32>,
    pub snr: Option<i32>,
    pub delta_t: Option<f64>,
    pub frq: Option<u64>,
    pub drift: Option<i32>,
    pub callsign: Option<String>,
    pub grid: Option<String>,
    pub power: Option<i32>,
    pub off_air: Option<bool>,
}

impl WsprDecode {
    fn read(c: &mut Cursor) -> Result<Self, FrameError> {
        Ok(Self {
            is_new: c.opt_bool()?,
            time: c.opt_u32()?,
            snr: c.opt_i32()?,
            delta_t: c.opt_f64()?,
            frq: c.opt_u64()?,
            drift: c.opt_i32()?,
            callsign: c.opt_utf8()?,
            grid: c.opt_utf8()?,
            power: c.opt_i32()?,
            off_air: c.opt_bool()?,
        })
    }

    fn write(&self, w: &mut Writer) -> Result<(), FrameError> {
        w.opt_bool(self.is_new)?;
        w.opt_u32(self.time)?;
        w.opt_i32(self.snr)?;
        w.opt_f64(self.delta_t)?;
        w.opt_u64(self.frq)?;
        w.opt_i32(self.drift)?;
        w.opt_utf8(self.callsign.as_deref())?;
        w.opt_utf8(self.grid.as_deref())?;
        w.opt_i32(self.power)?;
        w.opt_bool(self.off_air)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    pub location: Option<String>,
}

impl Location {
    fn read(c: &mut Cursor) -> Result<Self, FrameError> {
        Ok(Self {
            location: c.opt_utf8()?,
        })
    }

    fn write(&self, w: &mut Writer) -> Result<(), FrameError> {
        w.opt_utf8(self.location.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoggedAdif {
    pub adif_txt: Option<String>,
}

impl LoggedAdif {
    fn read(c: &mut Cursor) -> Result<Self, FrameError> {
        Ok(Self {
            adif_txt: c.opt_utf8()?,
        })
    }

    fn write(&self, w: &mut Writer) -> Result<(), FrameError> {
        w.opt_utf8(self.adif_txt.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightCallsign {
    pub callsign: Option<String>,
    pub bg_color: Option<Color>,
    pub fg_color: Option<Color>,
    pub highlight_last: Option<bool>,
}

impl HighlightCallsign {
    fn read(c: &mut Cursor) -> Result<Self, FrameError> {
        Ok(Self {
            callsign: c.opt_utf8()?,
            bg_color: c.opt_color()?,
            fg_color: c.opt_color()?,
            highlight_last: c.opt_bool()?,
        })
    }

    fn write(&self, w: &mut Writer) -> Result<(), FrameError> {
        w.opt_utf8(self.callsign.as_deref())?;
        w.opt_color(self.bg_color.as_ref())?;
        w.opt_color(self.fg_color.as_ref())?;
        w.opt_bool(self.highlight_last)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwitchConfiguration {
    pub config_name: Option<String>,
}

impl SwitchConfiguration {
    fn read(c: &mut Cursor) -> Result<Self, FrameError> {
        Ok(Self {
            config_name: c.opt_utf8()?,
        })
    }

    fn write(&self, w: &mut Writer) -> Result<(), FrameError> {
        w.opt_utf8(self.config_name.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configure {
    pub mode: Option<String>,
    pub frq_tolerance: Option<u32>,
    pub sub_mode: Option<String>,
    pub fast_mode: Option<bool>,
    pub t_r_period: Option<u32>,
    pub rx_df: Option<u32>,
    pub dx_call: Option<String>,
    pub dx_grid: Option<String>,
    pub gen_messages: Option<bool>,
}

impl Configure {
    fn read(c: &mut Cursor) -> Result<Self, FrameError> {
        Ok(Self {
            mode: c.opt_utf8()?,
            frq_tolerance: c.opt_u32()?,
            sub_mode: c.opt_utf8()?,
            fast_mode: c.opt_bool()?,
            t_r_period: c.opt_u32()?,
            rx_df: c.opt_u32()?,
            dx_call: c.opt_utf8()?,
            dx_grid: c.opt_utf8()?,
            gen_messages: c.opt_bool()?,
        })
    }

    fn write(&self, w: &mut Writer) -> Result<(), FrameError> {
        w.opt_utf8(self.mode.as_deref())?;
        w.opt_u32(self.frq_tolerance)?;
        w.opt_utf8(self.sub_mode.as_deref())?;
        w.opt_bool(self.fast_mode)?;
        w.opt_u32(self.t_r_period)?;
        w.opt_u32(self.rx_df)?;
        w.opt_utf8(self.dx_call.as_deref())?;
        w.opt_utf8(self.dx_grid.as_deref())?;
        w.opt_bool(self.gen_messages)
    }
}

/// Variant payload of a telegram
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Heartbeat(Heartbeat),
    Status(Status),
    Decode(Decode),
    Clear(Clear),
    Reply(Reply),
    QsoLogged(QsoLogged),
    Close,
    Replay,
    HaltTx(HaltTx),
    FreeText(FreeText),
    WsprDecode(WsprDecode),
    Location(Location),
    LoggedAdif(LoggedAdif),
    HighlightCallsign(HighlightCallsign),
    SwitchConfiguration(SwitchConfiguration),
    Configure(Configure),
    /// Header-only telegram with a kind we do not know
    Unknown { kind: u32 },
}

impl Payload {
    /// The known kind, if any
    pub fn kind(&self) -> Option<Kind> {
        match self {
            Payload::Heartbeat(_) => Some(Kind::Heartbeat),
            Payload::Status(_) => Some(Kind::Status),
            Payload::Decode(_) => Some(Kind::Decode),
            Payload::Clear(_) => Some(Kind::Clear),
            Payload::Reply(_) => Some(Kind::Reply),
            Payload::QsoLogged(_) => Some(Kind::QsoLogged),
            Payload::Close => Some(Kind::Close),
            Payload::Replay => Some(Kind::Replay),
            Payload::HaltTx(_) => Some(Kind::HaltTx),
            Payload::FreeText(_) => Some(Kind::FreeText),
            Payload::WsprDecode(_) => Some(Kind::WsprDecode),
            Payload::Location(_) => Some(Kind::Location),
            Payload::LoggedAdif(_) => Some(Kind::LoggedAdif),
            Payload::HighlightCallsign(_) => Some(Kind::HighlightCallsign),
            Payload::SwitchConfiguration(_) => Some(Kind::SwitchConfiguration),
            Payload::Configure(_) => Some(Kind::Configure),
            Payload::Unknown { .. } => None,
        }
    }

    /// The raw wire discriminant
    pub fn kind_raw(&self) -> u32 {
        match self {
            Payload::Unknown { kind } => *kind,
            known => known.kind().map_or(0, |kind| kind as u32),
        }
    }
}

/// One protocol message, ready to be encoded or freshly decoded
#[derive(Debug, Clone, PartialEq)]
pub struct Telegram {
    /// Schema version the sender used
    pub version: u32,
    /// Client id of the sending application instance
    pub id: Option<String>,
    pub payload: Payload,
}

impl Telegram {
    /// Build a telegram for sending, using the current schema version
    pub fn new(id: &str, payload: Payload) -> Self {
        Self {
            version: SCHEMA_VERSION,
            id: Some(id.to_owned()),
            payload,
        }
    }

    /// Decode one datagram. Bad magic and a schema newer than ours are
    /// errors; an unknown kind is not.
    pub fn decode(buf: &[u8]) -> Result<Self, FrameError> {
        let mut c = Cursor::new(buf);
        let magic = c.u32()?;
        if magic != MAGIC {
            return Err(FrameError::BadMagic(magic));
        }
        let version = c.u32()?;
        if version > SCHEMA_VERSION {
            return Err(FrameError::UnsupportedSchema(version));
        }
        let kind = c.u32()?;
        let id = c.utf8()?;
        let payload = match Kind::try_from(kind) {
            Ok(Kind::Heartbeat) => Payload::Heartbeat(Heartbeat::read(&mut c)?),
            Ok(Kind::Status) => Payload::Status(Status::read(&mut c)?),
            Ok(Kind::Decode) => Payload::Decode(Decode::read(&mut c)?),
            Ok(Kind::Clear) => Payload::Clear(Clear::read(&mut c)?),
            Ok(Kind::Reply) => Payload::Reply(Reply::read(&mut c)?),
            Ok(Kind::QsoLogged) => Payload::QsoLogged(QsoLogged::read(&mut c)?),
            Ok(Kind::Close) => Payload::Close,
            Ok(Kind::Replay) => Payload::Replay,
            Ok(Kind::HaltTx) => Payload::HaltTx(HaltTx::read(&mut c)?),
            Ok(Kind::FreeText) => Payload::FreeText(FreeText::read(&mut c)?),
            Ok(Kind::WsprDecode) => Payload::WsprDecode(WsprDecode::read(&mut c)?),
            Ok(Kind::Location) => Payload::Location(Location::read(&mut c)?),
            Ok(Kind::LoggedAdif) => Payload::LoggedAdif(LoggedAdif::read(&mut c)?),
            Ok(Kind::HighlightCallsign) => {
                Payload::HighlightCallsign(HighlightCallsign::read(&mut c)?)
            }
            Ok(Kind::SwitchConfiguration) => {
                Payload::SwitchConfiguration(SwitchConfiguration::read(&mut c)?)
            }
            Ok(Kind::Configure) => Payload::Configure(Configure::read(&mut c)?),
            Err(raw) => Payload::Unknown { kind: raw },
        };
        Ok(Telegram {
            version,
            id,
            payload,
        })
    }

    /// Encode for sending
    pub fn encode(&self) -> Result<Vec<u8>, FrameError> {
        let mut w = Writer::new();
        w.u32(MAGIC);
        w.u32(self.version);
        w.u32(self.payload.kind_raw());
        w.utf8(self.id.as_deref());
        match &self.payload {
            Payload::Heartbeat(p) => p.write(&mut w)?,
            Payload::Status(p) => p.write(&mut w)?,
            Payload::Decode(p) => p.write(&mut w)?,
            Payload::Clear(p) => p.write(&mut w)?,
            Payload::Reply(p) => p.write(&mut w)?,
            Payload::QsoLogged(p) => p.write(&mut w)?,
            Payload::Close | Payload::Replay | Payload::Unknown { .. } => {}
            Payload::HaltTx(p) => p.write(&mut w)?,
            Payload::FreeText(p) => p.write(&mut w)?,
            Payload::WsprDecode(p) => p.write(&mut w)?,
            Payload::Location(p) => p.write(&mut w)?,
            Payload::LoggedAdif(p) => p.write(&mut w)?,
            Payload::HighlightCallsign(p) => p.write(&mut w)?,
            Payload::SwitchConfiguration(p) => p.write(&mut w)?,
            Payload::Configure(p) => p.write(&mut w)?,
        }
        Ok(w.into_bytes())
    }
}

// Display renders the variant name followed by its fields, absent ones as
// "None", matching what the server logs for out-of-routine telegrams.

struct Field<'a, T>(&'a str, &'a Option<T>);

impl<T: fmt::Display> fmt::Display for Field<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.1 {
            Some(v) => write!(f, " {}={}", self.0, v),
            None => write!(f, " {}=None", self.0),
        }
    }
}

impl fmt::Display for Telegram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Heartbeat(p) => {
                write!(f, "Heartbeat")?;
                write!(f, "{}", Field("max_schema", &p.max_schema))?;
                write!(f, "{}", Field("version", &p.version))?;
                write!(f, "{}", Field("revision", &p.revision))
            }
            Payload::Status(p) => {
                write!(f, "Status")?;
                write!(f, "{}", Field("dial_frq", &p.dial_frq))?;
                write!(f, "{}", Field("mode", &p.mode))?;
                write!(f, "{}", Field("dx_call", &p.dx_call))?;
                write!(f, "{}", Field("report", &p.report))?;
                write!(f, "{}", Field("tx_mode", &p.tx_mode))?;
                write!(f, "{}", Field("tx_enabled", &p.tx_enabled))?;
                write!(f, "{}", Field("xmitting", &p.xmitting))?;
                write!(f, "{}", Field("decoding", &p.decoding))?;
                write!(f, "{}", Field("rx_df", &p.rx_df))?;
                write!(f, "{}", Field("tx_df", &p.tx_df))?;
                write!(f, "{}", Field("de_call", &p.de_call))?;
                write!(f, "{}", Field("de_grid", &p.de_grid))?;
                write!(f, "{}", Field("dx_grid", &p.dx_grid))?;
                write!(f, "{}", Field("tx_watchdog", &p.tx_watchdog))?;
                write!(f, "{}", Field("sub_mode", &p.sub_mode))?;
                write!(f, "{}", Field("fast_mode", &p.fast_mode))?;
                write!(f, "{}", Field("special_op", &p.special_op))?;
                write!(f, "{}", Field("frq_tolerance", &p.frq_tolerance))?;
                write!(f, "{}", Field("t_r_period", &p.t_r_period))?;
                write!(f, "{}", Field("config_name", &p.config_name))?;
                write!(f, "{}", Field("tx_message", &p.tx_message))
            }
            Payload::Decode(p) => {
                write!(f, "Decode")?;
                write!(f, "{}", Field("is_new", &p.is_new))?;
                write!(f, "{}", Field("time", &p.time))?;
                write!(f, "{}", Field("snr", &p.snr))?;
                write!(f, "{}", Field("delta_t", &p.delta_t))?;
                write!(f, "{}", Field("delta_f", &p.delta_f))?;
                write!(f, "{}", Field("mode", &p.mode))?;
                write!(f, "{}", Field("message", &p.message))?;
                write!(f, "{}", Field("low_confidence", &p.low_confidence))?;
                write!(f, "{}", Field("off_air", &p.off_air))
            }
            Payload::Clear(p) => {
                write!(f, "Clear")?;
                write!(f, "{}", Field("window", &p.window))
            }
            Payload::Reply(p) => {
                write!(f, "Reply")?;
                write!(f, "{}", Field("time", &p.time))?;
                write!(f, "{}", Field("snr", &p.snr))?;
                write!(f, "{}", Field("mode", &p.mode))?;
                write!(f, "{}", Field("message", &p.message))
            }
            Payload::QsoLogged(p) => {
                write!(f, "QsoLogged")?;
                write!(f, "{}", Field("dx_call", &p.dx_call))?;
                write!(f, "{}", Field("dx_grid", &p.dx_grid))?;
                write!(f, "{}", Field("tx_frq", &p.tx_frq))?;
                write!(f, "{}", Field("mode", &p.mode))?;
                write!(f, "{}", Field("report_sent", &p.report_sent))?;
                write!(f, "{}", Field("report_recv", &p.report_recv))
            }
            Payload::Close => write!(f, "Close"),
            Payload::Replay => write!(f, "Replay"),
            Payload::HaltTx(p) => {
                write!(f, "HaltTx")?;
                write!(f, "{}", Field("auto_tx_only", &p.auto_tx_only))
            }
            Payload::FreeText(p) => {
                write!(f, "FreeText")?;
                write!(f, "{}", Field("text", &p.text))?;
                write!(f, "{}", Field("send", &p.send))
            }
            Payload::WsprDecode(p) => {
                write!(f, "WsprDecode")?;
                write!(f, "{}", Field("callsign", &p.callsign))?;
                write!(f, "{}", Field("grid", &p.grid))?;
                write!(f, "{}", Field("snr", &p.snr))?;
                write!(f, "{}", Field("frq", &p.frq))
            }
            Payload::Location(p) => {
                write!(f, "Location")?;
                write!(f, "{}", Field("location", &p.location))
            }
            Payload::LoggedAdif(p) => {
                write!(f, "LoggedAdif")?;
                write!(f, "{}", Field("adif_txt", &p.adif_txt))
            }
            Payload::HighlightCallsign(p) => {
                write!(f, "HighlightCallsign")?;
                write!(f, "{}", Field("callsign", &p.callsign))?;
                write!(f, "{}", Field("bg_color", &p.bg_color))?;
                write!(f, "{}", Field("fg_color", &p.fg_color))?;
                write!(f, "{}", Field("highlight_last", &p.highlight_last))
            }
            Payload::SwitchConfiguration(p) => {
                write!(f, "SwitchConfiguration")?;
                write!(f, "{}", Field("config_name", &p.config_name))
            }
            Payload::Configure(p) => {
                write!(f, "Configure")?;
                write!(f, "{}", Field("mode", &p.mode))?;
                write!(f, "{}", Field("dx_call", &p.dx_call))?;
                write!(f, "{}", Field("dx_grid", &p.dx_grid))
            }
            Payload::Unknown { kind } => write!(f, "Unknown kind={kind}"),
        }
    }
}
