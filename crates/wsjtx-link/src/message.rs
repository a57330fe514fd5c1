//! Callsign extraction from decoded message text
//!
//! FT8/FT4 messages are short space-separated exchanges like
//! `CQ PD0XXX JO22` or `JA1XXX YL2XXX R-18`. The sender's callsign is
//! usually the second token, but CQ calls, contest prefixes, low-confidence
//! markers and free text all bend that rule, so extraction is a heuristic:
//! a fixed ladder of shape checks that gives up rather than guess.

/// Maidenhead locator: two field letters, two digits, optionally a
/// subsquare and an extended square (`JN88`, `JN88dg`, `JN88dg12`)
pub fn is_locator(s: &str) -> bool {
    let b = s.as_bytes();
    if !matches!(b.len(), 4 | 6 | 8) {
        return false;
    }
    if !(b[0].is_ascii_uppercase() && b[0] <= b'R' && b[1].is_ascii_uppercase() && b[1] <= b'R') {
        return false;
    }
    if !(b[2].is_ascii_digit() && b[3].is_ascii_digit()) {
        return false;
    }
    if b.len() >= 6 {
        let sub = |c: u8| c.is_ascii_alphabetic() && c.to_ascii_uppercase() <= b'X';
        if !(sub(b[4]) && sub(b[5])) {
            return false;
        }
    }
    if b.len() == 8 && !(b[6].is_ascii_digit() && b[7].is_ascii_digit()) {
        return false;
    }
    true
}

/// Signal report: optional `R`, a sign, two digits (`-02`, `+20`, `R+20`)
pub fn is_report(s: &str) -> bool {
    let s = s.strip_prefix('R').unwrap_or(s);
    let b = s.as_bytes();
    b.len() == 3
        && (b[0] == b'+' || b[0] == b'-')
        && b[1].is_ascii_digit()
        && b[2].is_ascii_digit()
}

/// Standard callsign: a one-or-two character prefix (letter, letter+
/// alphanumeric, or digit+letter), one digit, one to three letters
pub fn is_std_callsign(s: &str) -> bool {
    let b = s.as_bytes();
    for plen in [1usize, 2] {
        if b.len() < plen + 2 || b.len() > plen + 4 {
            continue;
        }
        let prefix_ok = match plen {
            1 => b[0].is_ascii_uppercase(),
            _ => {
                (b[0].is_ascii_uppercase() && (b[1].is_ascii_uppercase() || b[1].is_ascii_digit()))
                    || (b[0].is_ascii_digit() && b[1].is_ascii_uppercase())
            }
        };
        if !prefix_ok || !b[plen].is_ascii_digit() {
            continue;
        }
        let suffix = &b[plen + 1..];
        if (1..=3).contains(&suffix.len()) && suffix.iter().all(|c| c.is_ascii_uppercase()) {
            return true;
        }
    }
    false
}

/// Extract the sender's callsign from a decoded message
///
/// Returns `None` for anything that does not look like a standard exchange;
/// the caller decides whether that is worth logging. Compound callsigns keep
/// their angle brackets, stripping is up to the caller.
pub fn parse_message(message: &str) -> Option<&str> {
    if message.is_empty() || message.contains(';') {
        return None;
    }
    let mut l: Vec<&str> = message.split_whitespace().collect();
    // Strip off marginal decode info ("a1") and a trailing "?"
    if l.last()?.starts_with('a') {
        l.pop();
    }
    if l.last() == Some(&"?") {
        l.pop();
    }
    if l.is_empty() {
        return None;
    }
    if l[0] == "CQ" || l[0] == "QRZ" {
        // CQ DX or similar
        if l.len() == 4 && l[2].len() >= 3 {
            return Some(l[2]);
        }
        // CQ DX or something without a locator
        if l.len() == 3 && l[2].len() != 4 && l[1].len() <= 4 && l[2].len() >= 3 {
            return Some(l[2]);
        }
        if l.len() >= 2 && l[1].len() >= 3 {
            return Some(l[1]);
        }
    }
    if l.len() == 2 && l[1].len() >= 3 {
        return Some(l[1]);
    }
    if l.len() < 2 {
        return None;
    }
    if l.len() == 4 && l[2] == "R" && l[1].len() >= 3 {
        return Some(l[1]);
    }
    if l.len() == 3 && l[1].len() >= 3 {
        if l[1].len() > 3 || is_std_callsign(l[1]) {
            return Some(l[1]);
        }
        if is_locator(l[2]) || is_report(l[2]) {
            return Some(l[1]);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locator_shapes() {
        assert!(!is_locator("-2"));
        assert!(is_locator("JN88"));
        assert!(is_locator("JN88aq"));
        assert!(is_locator("JN88aq01"));
        assert!(!is_locator("kk77"));
        assert!(!is_locator("AA00AAA"));
        assert!(!is_locator("ZZ00"));
        assert!(is_locator("JO22"));
    }

    #[test]
    fn report_shapes() {
        assert!(!is_report("-2"));
        assert!(is_report("-02"));
        assert!(is_report("+20"));
        assert!(is_report("R+20"));
        assert!(!is_report("R+20foo"));
        assert!(!is_report("73"));
    }

    #[test]
    fn std_callsign_shapes() {
        assert!(is_std_callsign("D1X"));
        assert!(!is_std_callsign("JN88"));
        assert!(is_std_callsign("OE3RSU"));
        assert!(is_std_callsign("9H1XX"));
        assert!(!is_std_callsign("EFHW"));
        assert!(!is_std_callsign("50W"));
    }

    #[test]
    fn standard_exchanges() {
        assert_eq!(parse_message("JA1XXX YL2XXX R-18"), Some("YL2XXX"));
        assert_eq!(parse_message("UB9XXX OH1XXX KP20"), Some("OH1XXX"));
        assert_eq!(parse_message("RZ6XXX DL9XXX -06"), Some("DL9XXX"));
        assert_eq!(parse_message("IZ7XXX EW4XXX 73"), Some("EW4XXX"));
        assert_eq!(parse_message("OK1XXX F4IXXX -07"), Some("F4IXXX"));
        assert_eq!(parse_message("9H1XX EA8XX IL18"), Some("EA8XX"));
    }

    #[test]
    fn cq_messages() {
        assert_eq!(parse_message("CQ II0XXXX"), Some("II0XXXX"));
        assert_eq!(parse_message("CQ PD0XXX JO22"), Some("PD0XXX"));
        assert_eq!(parse_message("CQ NA PD0XXX JO22"), Some("PD0XXX"));
        assert_eq!(parse_message("CQ DX IK2XX"), Some("IK2XX"));
    }

    #[test]
    fn marginal_decode_markers_are_stripped() {
        assert_eq!(parse_message("CQ E73XXX JN94     a1"), Some("E73XXX"));
        assert_eq!(parse_message("CQ E73XXX OI32     ? a1"), Some("E73XXX"));
    }

    #[test]
    fn compound_calls_keep_brackets() {
        assert_eq!(parse_message("TM50XXX <F6XXX> RR73"), Some("<F6XXX>"));
    }

    #[test]
    fn short_second_tokens() {
        assert_eq!(parse_message("F1XXX D1X KN87"), Some("D1X"));
        assert_eq!(parse_message("F1XXX D1X R+03"), Some("D1X"));
        assert_eq!(parse_message("F1XXX D1X 73"), Some("D1X"));
        assert_eq!(parse_message("F1XXX D1X RR73"), Some("D1X"));
    }

    #[test]
    fn rejected_messages() {
        assert_eq!(parse_message("E73XXX 73"), None);
        assert_eq!(parse_message("EFHW 50W 73"), None);
        assert_eq!(parse_message("OZ1XXX 0"), None);
        assert_eq!(parse_message(""), None);
        assert_eq!(parse_message("KA1ABC; DE KA5XYZ"), None);
    }

    #[test]
    fn four_tokens_with_rogers() {
        assert_eq!(parse_message("JA1XXX YL2XXX R -18"), Some("YL2XXX"));
    }
}
