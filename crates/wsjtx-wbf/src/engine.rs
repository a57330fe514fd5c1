//! Worked-before classification
//!
//! Two index families are kept per band plus the catch-all "ALL" scope: one
//! keyed by literal callsign, one keyed by resolved DXCC entity code. They
//! are replayed from the station log at startup, optionally seeded from a
//! confirmed-contact source, and grown as contacts are logged during the
//! session. They never shrink while the program runs.

use std::collections::HashMap;

use tracing::debug;
use wsjtx_protocol::Color;

use crate::entity::EntityMatcher;
use crate::error::WbfError;
use crate::record::ContactRecord;

/// Scope key meaning "any band"
pub const ALL_BANDS: &str = "ALL";

/// Foreground/background color pair sent with a highlight telegram
pub type ColorPair = (Color, Color);

/// The pair that removes any existing highlighting
pub const PAIR_INVALID: ColorPair = (Color::INVALID, Color::INVALID);

/// Worked-before status of one callsign on one band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkedStatus {
    /// Already worked on this band
    WorkedBefore,
    /// Entity worked on this band, callsign never worked anywhere
    NewCall,
    /// Entity worked on this band, callsign worked on another band only
    NewCallOnBand,
    /// Entity never worked on any band (or unknown)
    NewDxcc,
    /// Entity worked on another band, not on this one
    NewDxccOnBand,
    /// Entity is on the operator's watch list
    Highlight,
}

impl WorkedStatus {
    /// Human-readable description
    pub fn label(&self) -> &'static str {
        match self {
            WorkedStatus::WorkedBefore => "Worked before",
            WorkedStatus::NewCall => "New Call",
            WorkedStatus::NewCallOnBand => "New Call on Band",
            WorkedStatus::NewDxcc => "New DXCC",
            WorkedStatus::NewDxccOnBand => "New DXCC on Band",
            WorkedStatus::Highlight => "Highlight",
        }
    }
}

/// Status-to-color mapping, overridable by the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScheme {
    pub worked_before: ColorPair,
    pub new_call: ColorPair,
    pub new_call_band: ColorPair,
    pub new_dxcc: ColorPair,
    pub new_dxcc_band: ColorPair,
    pub highlight: ColorPair,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            worked_before: PAIR_INVALID,
            new_call: (Color::BLACK, Color::CYAN),
            new_call_band: (Color::BLACK, Color::CYAN1),
            new_dxcc: (Color::BLACK, Color::PINK),
            new_dxcc_band: (Color::BLACK, Color::PINK1),
            highlight: (Color::BLACK, Color::ORANGE),
        }
    }
}

impl ColorScheme {
    pub fn pair(&self, status: WorkedStatus) -> ColorPair {
        match status {
            WorkedStatus::WorkedBefore => self.worked_before,
            WorkedStatus::NewCall => self.new_call,
            WorkedStatus::NewCallOnBand => self.new_call_band,
            WorkedStatus::NewDxcc => self.new_dxcc,
            WorkedStatus::NewDxccOnBand => self.new_dxcc_band,
            WorkedStatus::Highlight => self.highlight,
        }
    }
}

/// External source of confirmed contacts, keyed by the operator's locator
pub trait ConfirmedSource {
    /// (band, entity code) pairs for every confirmed contact
    fn confirmed_entities(&self, locator: &str) -> Result<Vec<(String, String)>, WbfError>;
}

/// Occurrence counters per scope (a band name or [`ALL_BANDS`])
#[derive(Debug, Default)]
struct ScopeIndex {
    scopes: HashMap<String, HashMap<String, u32>>,
}

impl ScopeIndex {
    /// Count the item under the band and under ALL
    fn add(&mut self, band: &str, item: &str) {
        for scope in [band, ALL_BANDS] {
            *self
                .scopes
                .entry(scope.to_owned())
                .or_default()
                .entry(item.to_owned())
                .or_insert(0) += 1;
        }
    }

    /// Count the item under one scope only
    fn add_scoped(&mut self, scope: &str, item: &str) {
        *self
            .scopes
            .entry(scope.to_owned())
            .or_default()
            .entry(item.to_owned())
            .or_insert(0) += 1;
    }

    fn count(&self, scope: &str, item: &str) -> u32 {
        self.scopes
            .get(scope)
            .and_then(|index| index.get(item))
            .copied()
            .unwrap_or(0)
    }

    fn has_scope(&self, scope: &str) -> bool {
        self.scopes.contains_key(scope)
    }
}

/// The worked-before engine
pub struct WorkedBefore {
    calls: ScopeIndex,
    entities: ScopeIndex,
    matcher: Box<dyn EntityMatcher + Send>,
    /// Entity code -> optional contact-count threshold. `None` highlights
    /// forever; `Some(n)` highlights until n contacts are in the log.
    highlight: HashMap<String, Option<u32>>,
    scheme: ColorScheme,
    /// When set, the entity index only reflects the confirmed-contact
    /// source; locally logged contacts update the callsign index alone.
    confirmed_only: bool,
}

impl WorkedBefore {
    pub fn new(matcher: Box<dyn EntityMatcher + Send>) -> Self {
        Self {
            calls: ScopeIndex::default(),
            entities: ScopeIndex::default(),
            matcher,
            highlight: HashMap::new(),
            scheme: ColorScheme::default(),
            confirmed_only: false,
        }
    }

    /// Engine variant whose entity index is fed exclusively by
    /// [`WorkedBefore::seed_confirmed`]
    pub fn confirmed_only(matcher: Box<dyn EntityMatcher + Send>) -> Self {
        Self {
            confirmed_only: true,
            ..Self::new(matcher)
        }
    }

    pub fn set_scheme(&mut self, scheme: ColorScheme) {
        self.scheme = scheme;
    }

    pub fn set_highlight(&mut self, highlight: HashMap<String, Option<u32>>) {
        self.highlight = highlight;
    }

    /// Replay a historical log; records without a band are skipped
    pub fn replay<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = ContactRecord>,
    {
        let mut n = 0usize;
        for rec in records {
            if rec.band.is_empty() {
                continue;
            }
            self.add_entry(&rec);
            n += 1;
        }
        debug!(records = n, "replayed historical log");
    }

    /// Seed the entity index from a confirmed-contact listing
    pub fn seed_confirmed(&mut self, entries: &[(String, String)]) {
        for (band, code) in entries {
            self.entities.add_scoped(band, code);
            self.entities.add_scoped(ALL_BANDS, code);
        }
        debug!(entries = entries.len(), "seeded confirmed entities");
    }

    /// Record one logged contact under its band and under ALL
    pub fn add_entry(&mut self, rec: &ContactRecord) {
        self.calls.add(&rec.band, &rec.call);
        if self.confirmed_only {
            return;
        }
        if let Some(code) = self.resolve_dxcc(rec) {
            self.entities.add(&rec.band, &code);
        }
    }

    /// Resolve a record's entity code: explicit DXCC number first, then a
    /// country-name lookup, then a fuzzy prefix match accepted only when it
    /// yields exactly one candidate.
    fn resolve_dxcc(&self, rec: &ContactRecord) -> Option<String> {
        if let Some(dxcc) = rec.dxcc.as_deref() {
            if let Ok(n) = dxcc.trim().parse::<u32>() {
                return Some(format!("{n:03}"));
            }
        }
        for name in [rec.country.as_deref(), rec.country_intl.as_deref()]
            .into_iter()
            .flatten()
        {
            if let Some(code) = self.matcher.code_for_name(name) {
                return Some(code);
            }
        }
        let candidates = self.matcher.match_prefix(&rec.call);
        match candidates.as_slice() {
            [code] => Some(code.clone()),
            _ => None,
        }
    }

    /// Classify a callsign for a band
    ///
    /// A callsign matching several entities is treated as matched only when
    /// all candidates agree per tier (band, then ALL); a disagreement falls
    /// through to the less-worked classification.
    pub fn classify(&self, band: &str, call: &str) -> WorkedStatus {
        if !self.calls.has_scope(band) && !self.entities.has_scope(band) {
            // Nothing ever worked on this band
            return WorkedStatus::NewDxcc;
        }
        if self.calls.count(band, call) > 0 {
            return WorkedStatus::WorkedBefore;
        }
        let candidates = self.matcher.match_prefix(call);
        if candidates.is_empty() {
            return WorkedStatus::NewDxcc;
        }

        let mut max_count = 0;
        let mut all_on_band = true;
        for code in &candidates {
            let count = self.entities.count(band, code);
            if count == 0 {
                all_on_band = false;
            } else if count > max_count {
                max_count = count;
            }
        }

        if all_on_band {
            for code in &candidates {
                match self.highlight.get(code) {
                    Some(None) => return WorkedStatus::Highlight,
                    Some(Some(threshold)) if *threshold > max_count => {
                        return WorkedStatus::Highlight
                    }
                    _ => {}
                }
            }
            return if self.calls.count(ALL_BANDS, call) > 0 {
                WorkedStatus::NewCallOnBand
            } else {
                WorkedStatus::NewCall
            };
        }

        let all_any_band = candidates
            .iter()
            .all(|code| self.entities.count(ALL_BANDS, code) > 0);
        if all_any_band {
            WorkedStatus::NewDxccOnBand
        } else {
            WorkedStatus::NewDxcc
        }
    }

    /// Color pair for a callsign on a band
    pub fn color_for(&self, band: &str, call: &str) -> ColorPair {
        self.scheme.pair(self.classify(band, call))
    }

    /// Human-readable worked-before status
    pub fn verbose(&self, band: &str, call: &str) -> &'static str {
        self.classify(band, call).label()
    }
}
