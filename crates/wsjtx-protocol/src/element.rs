//! Wire-level protocol elements
//!
//! Every integer on the wire is big-endian. Strings carry a u32 length
//! prefix, with `0xFFFF_FFFF` marking the null string (distinct from a
//! zero-length one). Newer protocol revisions append fields at the end of a
//! telegram, so a buffer that is exhausted at a field boundary means "field
//! absent", while a field cut off mid-way is corruption.
//!
//! The [`Cursor`] reader and [`Writer`] are the two halves of that contract:
//! the `opt_*` reads return `None` on a clean end-of-buffer, and the `opt_*`
//! writes refuse a present value after an absent one.

use crate::error::FrameError;

/// Length prefix marking the null string
pub const NULL_STRING: u32 = 0xFFFF_FFFF;

/// Time-spec discriminant for a date-time with an explicit UTC offset
pub const TIMESPEC_OFFSET_FROM_UTC: u8 = 2;

/// A date-time as serialized by the protocol: Julian day number,
/// millisecond of day, time-spec discriminant and, for time-spec 2 only,
/// a UTC offset in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    day: i64,
    msec: u32,
    timespec: u8,
    offset: Option<i32>,
}

impl DateTime {
    /// Build a date-time, enforcing that the offset is present exactly when
    /// the time-spec says "offset from UTC".
    pub fn new(day: i64, msec: u32, timespec: u8, offset: Option<i32>) -> Result<Self, FrameError> {
        if (timespec == TIMESPEC_OFFSET_FROM_UTC) != offset.is_some() {
            return Err(FrameError::OffsetSpecMismatch);
        }
        Ok(Self {
            day,
            msec,
            timespec,
            offset,
        })
    }

    /// Julian day number
    pub fn day(&self) -> i64 {
        self.day
    }

    /// Milliseconds since midnight
    pub fn msec(&self) -> u32 {
        self.msec
    }

    /// Time-spec discriminant (0 local, 1 UTC, 2 offset from UTC)
    pub fn timespec(&self) -> u8 {
        self.timespec
    }

    /// UTC offset in seconds, present only for time-spec 2
    pub fn utc_offset(&self) -> Option<i32> {
        self.offset
    }
}

impl std::fmt::Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DateTime(day={} msec={} timespec={}",
            self.day, self.msec, self.timespec
        )?;
        if let Some(offset) = self.offset {
            write!(f, " offset={offset}")?;
        }
        write!(f, ")")
    }
}

/// An RGB color as serialized by the protocol: spec byte (0 invalid,
/// 1 RGB), four 16-bit components and a reserved pad word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub spec: u8,
    pub alpha: u16,
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl Color {
    /// Spec byte for an invalid (no-op) color
    pub const SPEC_INVALID: u8 = 0;
    /// Spec byte for an RGB color
    pub const SPEC_RGB: u8 = 1;
    /// Maximum component value
    pub const CMAX: u16 = 0xFFFF;

    /// Serialized size in bytes
    pub const WIRE_LEN: usize = 11;

    pub const INVALID: Color = Color {
        spec: Color::SPEC_INVALID,
        alpha: Color::CMAX,
        red: 0,
        green: 0,
        blue: 0,
    };
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(Color::CMAX, Color::CMAX, Color::CMAX);
    pub const RED: Color = Color::rgb(Color::CMAX, 0, 0);
    pub const GREEN: Color = Color::rgb(0, Color::CMAX, 0);
    pub const BLUE: Color = Color::rgb(0, 0, Color::CMAX);
    pub const CYAN: Color = Color::rgb(0, Color::CMAX, Color::CMAX);
    pub const CYAN1: Color = Color::rgb(0x9999, Color::CMAX, Color::CMAX);
    pub const PINK: Color = Color::rgb(Color::CMAX, 0, Color::CMAX);
    pub const PINK1: Color = Color::rgb(Color::CMAX, 0xAAAA, Color::CMAX);
    pub const ORANGE: Color = Color::rgb(Color::CMAX, 0xA0A0, 0);

    /// Fully opaque RGB color
    pub const fn rgb(red: u16, green: u16, blue: u16) -> Self {
        Self {
            spec: Color::SPEC_RGB,
            alpha: Color::CMAX,
            red,
            green,
            blue,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.spec == Color::SPEC_RGB
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.is_valid() {
            return write!(f, "Color(invalid)");
        }
        write!(
            f,
            "Color(alpha={} red={} green={} blue={})",
            self.alpha, self.red, self.green, self.blue
        )
    }
}

/// Reader over a received datagram
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// True when the buffer is fully consumed
    pub fn exhausted(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], FrameError> {
        if self.remaining() < n {
            return Err(FrameError::Truncated {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn u8(&mut self) -> Result<u8, FrameError> {
        Ok(self.take(1)?[0])
    }

    pub fn u32(&mut self) -> Result<u32, FrameError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn i32(&mut self) -> Result<i32, FrameError> {
        Ok(self.u32()? as i32)
    }

    pub fn u64(&mut self) -> Result<u64, FrameError> {
        let b = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(b);
        Ok(u64::from_be_bytes(raw))
    }

    pub fn i64(&mut self) -> Result<i64, FrameError> {
        Ok(self.u64()? as i64)
    }

    pub fn f64(&mut self) -> Result<f64, FrameError> {
        Ok(f64::from_bits(self.u64()?))
    }

    /// Length-prefixed UTF-8 string; `None` for the null sentinel
    pub fn utf8(&mut self) -> Result<Option<String>, FrameError> {
        let len = self.u32()?;
        if len == NULL_STRING {
            return Ok(None);
        }
        let len = len as usize;
        if self.remaining() < len {
            return Err(FrameError::StringOverrun {
                declared: len,
                remaining: self.remaining(),
            });
        }
        let bytes = self.take(len)?;
        let value = std::str::from_utf8(bytes).map_err(|_| FrameError::InvalidUtf8)?;
        Ok(Some(value.to_owned()))
    }

    // Absent-aware reads for payload fields: a clean end-of-buffer at the
    // field boundary decodes as "absent".

    pub fn opt_u8(&mut self) -> Result<Option<u8>, FrameError> {
        if self.exhausted() {
            return Ok(None);
        }
        self.u8().map(Some)
    }

    pub fn opt_bool(&mut self) -> Result<Option<bool>, FrameError> {
        Ok(self.opt_u8()?.map(|v| v != 0))
    }

    pub fn opt_u32(&mut self) -> Result<Option<u32>, FrameError> {
        if self.exhausted() {
            return Ok(None);
        }
        self.u32().map(Some)
    }

    pub fn opt_i32(&mut self) -> Result<Option<i32>, FrameError> {
        if self.exhausted() {
            return Ok(None);
        }
        self.i32().map(Some)
    }

    pub fn opt_u64(&mut self) -> Result<Option<u64>, FrameError> {
        if self.exhausted() {
            return Ok(None);
        }
        self.u64().map(Some)
    }

    pub fn opt_f64(&mut self) -> Result<Option<f64>, FrameError> {
        if self.exhausted() {
            return Ok(None);
        }
        self.f64().map(Some)
    }

    pub fn opt_utf8(&mut self) -> Result<Option<String>, FrameError> {
        if self.exhausted() {
            return Ok(None);
        }
        self.utf8()
    }

    pub fn opt_datetime(&mut self) -> Result<Option<DateTime>, FrameError> {
        if self.exhausted() {
            return Ok(None);
        }
        let day = self.i64()?;
        let msec = self.u32()?;
        let timespec = self.u8()?;
        let offset = if timespec == TIMESPEC_OFFSET_FROM_UTC {
            Some(self.i32()?)
        } else {
            None
        };
        DateTime::new(day, msec, timespec, offset).map(Some)
    }

    pub fn opt_color(&mut self) -> Result<Option<Color>, FrameError> {
        if self.exhausted() {
            return Ok(None);
        }
        let spec = self.u8()?;
        let alpha = self.u16()?;
        let red = self.u16()?;
        let green = self.u16()?;
        let blue = self.u16()?;
        let _pad = self.u16()?;
        Ok(Some(Color {
            spec,
            alpha,
            red,
            green,
            blue,
        }))
    }

    fn u16(&mut self) -> Result<u16, FrameError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }
}

/// Writer building an outgoing datagram
pub struct Writer {
    buf: Vec<u8>,
    absent: bool,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
            absent: false,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // Header fields are always present.

    pub fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    fn u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Length-prefixed UTF-8 string; `None` emits the null sentinel
    pub fn utf8(&mut self, v: Option<&str>) {
        match v {
            None => self.u32(NULL_STRING),
            Some(s) => {
                self.u32(s.len() as u32);
                self.buf.extend_from_slice(s.as_bytes());
            }
        }
    }

    // Payload fields: once one scalar field is absent the rest of the
    // payload must be absent too, mirroring the truncation rule on decode.

    fn gate<T>(&mut self, v: Option<T>) -> Result<Option<T>, FrameError> {
        match (self.absent, v) {
            (false, Some(v)) => Ok(Some(v)),
            (false, None) => {
                self.absent = true;
                Ok(None)
            }
            (true, None) => Ok(None),
            (true, Some(_)) => Err(FrameError::TrailingField),
        }
    }

    pub fn opt_u8(&mut self, v: Option<u8>) -> Result<(), FrameError> {
        if let Some(v) = self.gate(v)? {
            self.u8(v);
        }
        Ok(())
    }

    pub fn opt_bool(&mut self, v: Option<bool>) -> Result<(), FrameError> {
        self.opt_u8(v.map(u8::from))
    }

    pub fn opt_u32(&mut self, v: Option<u32>) -> Result<(), FrameError> {
        if let Some(v) = self.gate(v)? {
            self.u32(v);
        }
        Ok(())
    }

    pub fn opt_i32(&mut self, v: Option<i32>) -> Result<(), FrameError> {
        self.opt_u32(v.map(|v| v as u32))
    }

    pub fn opt_u64(&mut self, v: Option<u64>) -> Result<(), FrameError> {
        if let Some(v) = self.gate(v)? {
            self.u64(v);
        }
        Ok(())
    }

    pub fn opt_f64(&mut self, v: Option<f64>) -> Result<(), FrameError> {
        self.opt_u64(v.map(f64::to_bits))
    }

    /// A null string is still a present field; only a truncated buffer makes
    /// a string absent, so `None` emits the sentinel unless truncation has
    /// already begun.
    pub fn opt_utf8(&mut self, v: Option<&str>) -> Result<(), FrameError> {
        if self.absent {
            if v.is_some() {
                return Err(FrameError::TrailingField);
            }
            return Ok(());
        }
        self.utf8(v);
        Ok(())
    }

    pub fn opt_datetime(&mut self, v: Option<&DateTime>) -> Result<(), FrameError> {
        if let Some(v) = self.gate(v)? {
            self.buf.extend_from_slice(&v.day().to_be_bytes());
            self.u32(v.msec());
            self.u8(v.timespec());
            if let Some(offset) = v.utc_offset() {
                self.buf.extend_from_slice(&offset.to_be_bytes());
            }
        }
        Ok(())
    }

    pub fn opt_color(&mut self, v: Option<&Color>) -> Result<(), FrameError> {
        if let Some(v) = self.gate(v)? {
            self.u8(v.spec);
            self.u16(v.alpha);
            self.u16(v.red);
            self.u16(v.green);
            self.u16(v.blue);
            self.u16(0);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_roundtrip() {
        let mut w = Writer::new();
        w.utf8(Some("abcd"));
        let bytes = w.into_bytes();
        assert_eq!(bytes, b"\x00\x00\x00\x04abcd");

        let mut c = Cursor::new(&bytes);
        assert_eq!(c.utf8().unwrap().as_deref(), Some("abcd"));
        assert!(c.exhausted());
    }

    #[test]
    fn null_string_is_not_empty_string() {
        let mut w = Writer::new();
        w.utf8(None);
        w.utf8(Some(""));
        let bytes = w.into_bytes();
        assert_eq!(bytes, b"\xff\xff\xff\xff\x00\x00\x00\x00");

        let mut c = Cursor::new(&bytes);
        assert_eq!(c.utf8().unwrap(), None);
        assert_eq!(c.utf8().unwrap().as_deref(), Some(""));
    }

    #[test]
    fn string_overrun_is_an_error() {
        let mut c = Cursor::new(b"\x00\x00\x00\x10ab");
        assert!(matches!(
            c.utf8(),
            Err(FrameError::StringOverrun {
                declared: 16,
                remaining: 2
            })
        ));
    }

    #[test]
    fn partial_integer_is_an_error() {
        let mut c = Cursor::new(b"\x00\x01");
        assert!(matches!(c.opt_u32(), Err(FrameError::Truncated { .. })));
    }

    #[test]
    fn exhausted_buffer_reads_absent() {
        let mut c = Cursor::new(b"");
        assert_eq!(c.opt_u32().unwrap(), None);
        assert_eq!(c.opt_utf8().unwrap(), None);
        assert_eq!(c.opt_datetime().unwrap(), None);
        assert_eq!(c.opt_color().unwrap(), None);
    }

    #[test]
    fn datetime_roundtrip_with_offset() {
        let dt = DateTime::new(2_460_000, 43_200_000, 2, Some(3600)).unwrap();
        let mut w = Writer::new();
        w.opt_datetime(Some(&dt)).unwrap();
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), 17);

        let mut c = Cursor::new(&bytes);
        assert_eq!(c.opt_datetime().unwrap(), Some(dt));
    }

    #[test]
    fn datetime_roundtrip_utc() {
        let dt = DateTime::new(2_460_000, 1000, 1, None).unwrap();
        let mut w = Writer::new();
        w.opt_datetime(Some(&dt)).unwrap();
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), 13);

        let mut c = Cursor::new(&bytes);
        assert_eq!(c.opt_datetime().unwrap(), Some(dt));
    }

    #[test]
    fn datetime_offset_spec_enforced() {
        assert_eq!(
            DateTime::new(0, 0, 2, None),
            Err(FrameError::OffsetSpecMismatch)
        );
        assert_eq!(
            DateTime::new(0, 0, 1, Some(3600)),
            Err(FrameError::OffsetSpecMismatch)
        );
    }

    #[test]
    fn color_roundtrip() {
        for color in [Color::ORANGE, Color::INVALID, Color::rgb(1, 2, 3)] {
            let mut w = Writer::new();
            w.opt_color(Some(&color)).unwrap();
            let bytes = w.into_bytes();
            assert_eq!(bytes.len(), Color::WIRE_LEN);

            let mut c = Cursor::new(&bytes);
            assert_eq!(c.opt_color().unwrap(), Some(color));
        }
    }

    #[test]
    fn present_after_absent_is_rejected() {
        let mut w = Writer::new();
        w.opt_u32(None).unwrap();
        assert_eq!(w.opt_u32(Some(1)), Err(FrameError::TrailingField));

        let mut w = Writer::new();
        w.opt_u32(None).unwrap();
        assert_eq!(w.opt_utf8(Some("x")), Err(FrameError::TrailingField));
        // an absent string after truncation is fine
        w.opt_utf8(None).unwrap();
    }
}
