//! QSO database client
//!
//! Fetches LOTW-confirmed contacts from a QSO tracker's REST interface.
//! The operator's station record is found by locator, then its QSL list is
//! filtered to LOTW confirmations with entity code and band attached. Used
//! to seed the confirmed-only engine variant at startup.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use wsjtx_wbf::{ConfirmedSource, WbfError};

pub struct QsoDbClient {
    base: String,
    username: String,
    password: Option<String>,
    http: reqwest::blocking::Client,
}

impl QsoDbClient {
    pub fn new(url: &str, username: &str, password: Option<&str>) -> Result<Self, WbfError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| WbfError::Source(e.to_string()))?;
        Ok(Self {
            base: url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.map(str::to_string),
            http,
        })
    }

    fn get(&self, path_and_query: &str) -> Result<Value, WbfError> {
        let url = format!("{}/{}", self.base, path_and_query);
        debug!(%url, "qso database request");
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.username, self.password.as_deref())
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| WbfError::Source(e.to_string()))?;
        response
            .json::<Value>()
            .map_err(|e| WbfError::Source(e.to_string()))
    }
}

/// The tracker returns ids either as numbers or strings
fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl ConfirmedSource for QsoDbClient {
    fn confirmed_entities(&self, locator: &str) -> Result<Vec<(String, String)>, WbfError> {
        let reply = self.get(&format!("ham_call?gridsquare={locator}"))?;
        let stations = reply["data"]["collection"]
            .as_array()
            .cloned()
            .unwrap_or_default();
        if stations.len() != 1 {
            return Err(WbfError::Source(format!(
                "ham call with locator {locator}: got {} entries",
                stations.len()
            )));
        }
        let owner = id_text(&stations[0]["id"])
            .ok_or_else(|| WbfError::Source("station record without id".into()))?;

        let reply = self.get(&format!(
            "qsl?qsl_type=LOTW&qso.owner={owner}\
             &@fields=qso.dxcc_entity.code,qso.band.name&@sort=qso.band.name"
        ))?;
        let qsls = reply["data"]["collection"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        let mut entities = Vec::with_capacity(qsls.len());
        for qsl in &qsls {
            let band = qsl["qso.band.name"].as_str();
            let code = id_text(&qsl["qso.dxcc_entity.code"]);
            if let (Some(band), Some(code)) = (band, code) {
                entities.push((band.to_ascii_lowercase(), code));
            }
        }
        debug!(confirmed = entities.len(), "fetched confirmed contacts");
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_text_accepts_numbers_and_strings() {
        assert_eq!(id_text(&Value::from(17)).as_deref(), Some("17"));
        assert_eq!(id_text(&Value::from("17")).as_deref(), Some("17"));
        assert_eq!(id_text(&Value::Null), None);
    }
}
