//! Minimal ADIF log parsing
//!
//! Parses the subset of ADIF the engine needs: `<field:length>` tags up to
//! each `<eor>`, with an optional header terminated by `<eoh>`. Tag names
//! are case-insensitive; unknown fields are skipped. Only `call`, `band`,
//! `dxcc`, `country` and `country_intl` are extracted.

use tracing::debug;

use crate::error::WbfError;
use crate::record::ContactRecord;

/// Parse ADIF text into contact records
pub fn parse(text: &str) -> Result<Vec<ContactRecord>, WbfError> {
    let mut records = Vec::new();
    let mut current = ContactRecord::default();
    let mut has_fields = false;
    let mut rest = text;

    // Anything before <eoh> is header; a log without a header starts with
    // a tag right away.
    loop {
        let Some(open) = rest.find('<') else {
            break;
        };
        rest = &rest[open + 1..];
        let close = rest
            .find('>')
            .ok_or_else(|| WbfError::Adif("unterminated tag".into()))?;
        let tag = &rest[..close];
        rest = &rest[close + 1..];

        let mut parts = tag.splitn(3, ':');
        let name = parts.next().unwrap_or_default().to_ascii_lowercase();

        match name.as_str() {
            "eoh" => {
                // Discard anything collected from header junk
                current = ContactRecord::default();
                has_fields = false;
                continue;
            }
            "eor" => {
                if has_fields {
                    if current.call.is_empty() {
                        debug!("skipping adif record without a callsign");
                    } else {
                        records.push(std::mem::take(&mut current));
                    }
                }
                current = ContactRecord::default();
                has_fields = false;
                continue;
            }
            _ => {}
        }

        let Some(len) = parts.next() else {
            // A bare tag that is neither <eoh> nor <eor>; ignore it
            continue;
        };
        let len: usize = len
            .trim()
            .parse()
            .map_err(|_| WbfError::Adif(format!("bad length in tag <{tag}>")))?;
        if rest.len() < len {
            return Err(WbfError::Adif(format!(
                "field <{tag}> runs past the end of the text"
            )));
        }
        let value = &rest[..len];
        rest = &rest[len..];

        match name.as_str() {
            "call" => current.call = value.trim().to_owned(),
            "band" => current.band = value.trim().to_ascii_lowercase(),
            "dxcc" => current.dxcc = Some(value.trim().to_owned()),
            "country" => current.country = Some(value.trim().to_owned()),
            "country_intl" => current.country_intl = Some(value.trim().to_owned()),
            _ => {}
        }
        has_fields = true;
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_record() {
        let text = "<call:6>OE3RSU <band:3>40m <mode:3>FT8 <eor>";
        let recs = parse(text).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].call, "OE3RSU");
        assert_eq!(recs[0].band, "40m");
        assert_eq!(recs[0].dxcc, None);
    }

    #[test]
    fn skips_header() {
        let text = "WSJT-X ADIF Export<adif_ver:5>3.1.0<eoh>\n\
                    <call:5>YL2XX <band:3>20M <dxcc:3>145 <eor>\n\
                    <call:5>9H1XX <band:3>15m <country:5>Malta <eor>\n";
        let recs = parse(text).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].band, "20m");
        assert_eq!(recs[0].dxcc.as_deref(), Some("145"));
        assert_eq!(recs[1].country.as_deref(), Some("Malta"));
    }

    #[test]
    fn tag_with_type_suffix() {
        let text = "<call:4:S>D1XX <band:3>10m <eor>";
        let recs = parse(text).unwrap();
        assert_eq!(recs[0].call, "D1XX");
    }

    #[test]
    fn record_without_call_is_dropped() {
        let text = "<band:3>40m <eor><call:4>F1XX <band:3>40m <eor>";
        let recs = parse(text).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].call, "F1XX");
    }

    #[test]
    fn overlong_field_is_an_error() {
        assert!(matches!(parse("<call:99>D1X"), Err(WbfError::Adif(_))));
    }

    #[test]
    fn empty_text_yields_no_records() {
        assert_eq!(parse("").unwrap(), Vec::new());
    }
}
