//! Property-based round-trip tests for the telegram codec

use proptest::prelude::*;
use wsjtx_protocol::{
    Clear, Color, DateTime, Decode, FreeText, Heartbeat, HighlightCallsign, Payload, Status,
    Telegram,
};

fn utf8_field() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[ -~]{1,24}".prop_map(Some),
        // non-ASCII is legal in free text fields
        Just(Some("73 de OE3RSU ÄÖÜ".to_string())),
    ]
}

fn color() -> impl Strategy<Value = Color> {
    prop_oneof![
        Just(Color::INVALID),
        (any::<u16>(), any::<u16>(), any::<u16>()).prop_map(|(r, g, b)| Color::rgb(r, g, b)),
    ]
}

fn datetime() -> impl Strategy<Value = DateTime> {
    (any::<i64>(), any::<u32>(), prop_oneof![Just(0u8), Just(1), Just(2)]).prop_map(
        |(day, msec, timespec)| {
            let offset = (timespec == 2).then_some(3600);
            DateTime::new(day, msec, timespec, offset).unwrap()
        },
    )
}

fn status() -> impl Strategy<Value = Status> {
    (
        (
            any::<u64>(),
            utf8_field(),
            utf8_field(),
            utf8_field(),
            utf8_field(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
        ),
        (
            any::<u32>(),
            any::<u32>(),
            utf8_field(),
            utf8_field(),
            utf8_field(),
            any::<bool>(),
            utf8_field(),
            any::<bool>(),
        ),
        (
            any::<u8>(),
            any::<u32>(),
            any::<u32>(),
            utf8_field(),
            utf8_field(),
        ),
    )
        .prop_map(|(a, b, c)| Status {
            dial_frq: Some(a.0),
            mode: a.1,
            dx_call: a.2,
            report: a.3,
            tx_mode: a.4,
            tx_enabled: Some(a.5),
            xmitting: Some(a.6),
            decoding: Some(a.7),
            rx_df: Some(b.0),
            tx_df: Some(b.1),
            de_call: b.2,
            de_grid: b.3,
            dx_grid: b.4,
            tx_watchdog: Some(b.5),
            sub_mode: b.6,
            fast_mode: Some(b.7),
            special_op: Some(c.0),
            frq_tolerance: Some(c.1),
            t_r_period: Some(c.2),
            config_name: c.3,
            tx_message: c.4,
        })
}

fn roundtrip(tel: &Telegram) -> Telegram {
    let bytes = tel.encode().expect("payload encodes");
    Telegram::decode(&bytes).expect("payload decodes")
}

proptest! {
    #[test]
    fn heartbeat_roundtrips(max_schema: u32, version in utf8_field(), revision in utf8_field()) {
        let tel = Telegram::new(
            "prop",
            Payload::Heartbeat(Heartbeat { max_schema: Some(max_schema), version, revision }),
        );
        prop_assert_eq!(roundtrip(&tel), tel);
    }

    #[test]
    fn status_roundtrips(st in status()) {
        let tel = Telegram::new("prop", Payload::Status(st));
        prop_assert_eq!(roundtrip(&tel), tel);
    }

    #[test]
    fn decode_roundtrips(
        time: u32,
        snr: i32,
        delta_t: f64,
        delta_f: u32,
        mode in utf8_field(),
        message in utf8_field(),
    ) {
        prop_assume!(!delta_t.is_nan());
        let tel = Telegram::new(
            "prop",
            Payload::Decode(Decode {
                is_new: Some(true),
                time: Some(time),
                snr: Some(snr),
                delta_t: Some(delta_t),
                delta_f: Some(delta_f),
                mode,
                message,
                low_confidence: Some(false),
                off_air: Some(false),
            }),
        );
        prop_assert_eq!(roundtrip(&tel), tel);
    }

    #[test]
    fn clear_roundtrips(window in prop_oneof![Just(None), any::<u8>().prop_map(Some)]) {
        let tel = Telegram::new("prop", Payload::Clear(Clear { window }));
        prop_assert_eq!(roundtrip(&tel), tel);
    }

    #[test]
    fn highlight_roundtrips(
        callsign in utf8_field(),
        bg in color(),
        fg in color(),
        last: bool,
    ) {
        let tel = Telegram::new(
            "prop",
            Payload::HighlightCallsign(HighlightCallsign {
                callsign,
                bg_color: Some(bg),
                fg_color: Some(fg),
                highlight_last: Some(last),
            }),
        );
        prop_assert_eq!(roundtrip(&tel), tel);
    }

    #[test]
    fn free_text_roundtrips(text in utf8_field(), send: bool) {
        let tel = Telegram::new(
            "prop",
            Payload::FreeText(FreeText { text, send: Some(send) }),
        );
        prop_assert_eq!(roundtrip(&tel), tel);
    }

    #[test]
    fn datetime_fields_roundtrip(dt in datetime()) {
        use wsjtx_protocol::QsoLogged;
        let tel = Telegram::new(
            "prop",
            Payload::QsoLogged(QsoLogged {
                time_off: Some(dt),
                ..QsoLogged::default()
            }),
        );
        prop_assert_eq!(roundtrip(&tel), tel);
    }

    /// Cutting an encoded telegram anywhere must never panic: it either
    /// decodes with an absent suffix or reports a frame error.
    #[test]
    fn truncation_never_panics(st in status(), cut in 16usize..400) {
        let tel = Telegram::new("prop", Payload::Status(st));
        let mut bytes = tel.encode().unwrap();
        if cut < bytes.len() {
            bytes.truncate(cut);
        }
        let _ = Telegram::decode(&bytes);
    }
}
