//! Contact log records

/// One logged contact, as extracted from an ADIF record
///
/// Only the fields the worked-before engine consumes are kept: the callsign,
/// the band, and whatever country information the log carries (an explicit
/// DXCC entity number, or a country name in ASCII or UTF-8).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactRecord {
    pub call: String,
    /// Band name, lowercase ("40m"); empty when the log omits it
    pub band: String,
    /// ADIF DXCC entity number, when present
    pub dxcc: Option<String>,
    pub country: Option<String>,
    pub country_intl: Option<String>,
}

impl ContactRecord {
    pub fn new(call: &str, band: &str) -> Self {
        Self {
            call: call.to_owned(),
            band: band.to_ascii_lowercase(),
            ..Self::default()
        }
    }
}
