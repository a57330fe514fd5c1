//! Server settings
//!
//! Loaded from `settings.json` in the XDG config directory, then overridden
//! by the `WBF_*` environment variables. There is no command-line parsing;
//! everything the process recognizes is listed here.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Listen address for the UDP socket
    pub listen: String,
    /// ADIF log to replay at startup
    pub adif_path: PathBuf,
    /// Character encoding of the log file ("utf-8" or "latin-1")
    #[serde(default = "default_encoding")]
    pub encoding: String,
    /// The operator's callsign
    pub callsign: String,
    /// The operator's Maidenhead locator
    pub locator: String,
    /// DXCC entities to highlight even when only a new call on band;
    /// an entry may carry a contact-count threshold after which the
    /// highlighting stops
    #[serde(default)]
    pub highlight: HashMap<String, Option<u32>>,
    /// QSO database with LOTW confirmations; when set together with
    /// `db_user`, the entity index comes from there instead of the log
    #[serde(default)]
    pub db_url: Option<String>,
    #[serde(default)]
    pub db_user: Option<String>,
    #[serde(default)]
    pub db_password: Option<String>,
    /// Push a locator-exchange free-text message on each new worked station
    #[serde(default)]
    pub set_locator_message: bool,
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        let adif_path = dirs::home_dir()
            .unwrap_or_default()
            .join(".local/share/WSJTX/wsjtx_log.adi");
        Self {
            listen: "127.0.0.1:2237".to_string(),
            adif_path,
            encoding: default_encoding(),
            callsign: "N0CALL".to_string(),
            locator: "JJ00aa".to_string(),
            highlight: HashMap::new(),
            db_url: None,
            db_user: None,
            db_password: None,
            set_locator_message: false,
        }
    }
}

impl Settings {
    /// $XDG_CONFIG_HOME/wsjtx-server, falling back to ~/.config/wsjtx-server
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("wsjtx-server"));
            }
        }
        dirs::home_dir().map(|h| h.join(".config").join("wsjtx-server"))
    }

    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Settings file if present, defaults otherwise, environment on top
    pub fn load() -> Self {
        let mut settings: Self = Self::settings_path()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|text| match serde_json::from_str(&text) {
                Ok(s) => Some(s),
                Err(e) => {
                    warn!(error = %e, "ignoring unreadable settings file");
                    None
                }
            })
            .unwrap_or_default();
        settings.apply_env();
        settings
    }

    fn apply_env(&mut self) {
        if let Ok(v) = env::var("WBF_PATH") {
            self.adif_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("WBF_CALL") {
            self.callsign = v;
        }
        if let Ok(v) = env::var("WBF_LOC") {
            self.locator = v;
        }
        if let Ok(v) = env::var("WBF_USER") {
            self.db_user = Some(v);
        }
        if let Ok(v) = env::var("WBF_DBURL") {
            self.db_url = Some(v);
        }
        if let Ok(v) = env::var("WBF_PASSWORD") {
            self.db_password = Some(v);
        }
        if let Ok(v) = env::var("WBF_HIGHLIGHT") {
            self.highlight = parse_highlight(&v);
        }
    }
}

/// Parse a highlight list: comma-separated entity codes, each optionally
/// `code:count`. Codes are normalized to three digits.
pub fn parse_highlight(text: &str) -> HashMap<String, Option<u32>> {
    let mut highlight = HashMap::new();
    for item in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (code, threshold) = match item.split_once(':') {
            Some((code, count)) => match count.trim().parse::<u32>() {
                Ok(n) => (code, Some(n)),
                Err(_) => {
                    warn!(item, "ignoring bad highlight threshold");
                    (code, None)
                }
            },
            None => (item, None),
        };
        let code = match code.trim().parse::<u32>() {
            Ok(n) => format!("{n:03}"),
            Err(_) => {
                warn!(item, "ignoring non-numeric highlight entity");
                continue;
            }
        };
        highlight.insert(code, threshold);
    }
    highlight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_list_parsing() {
        let parsed = parse_highlight("206,501:5, 54");
        assert_eq!(parsed.get("206"), Some(&None));
        assert_eq!(parsed.get("501"), Some(&Some(5)));
        assert_eq!(parsed.get("054"), Some(&None));
    }

    #[test]
    fn bad_highlight_entries_are_skipped() {
        let parsed = parse_highlight("abc,206");
        assert_eq!(parsed.len(), 1);
        assert!(parsed.contains_key("206"));
    }

    #[test]
    fn defaults_round_trip_through_json() {
        let settings = Settings::default();
        let json = serde_json::to_string_pretty(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
